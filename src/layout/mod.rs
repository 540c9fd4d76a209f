// Thu Oct 15 2026 - Alex

pub mod alignment;
pub mod builder;
pub mod cache;
pub mod layout;
pub mod order;
pub mod path;
pub mod validator;

pub use alignment::Alignment;
pub use builder::LayoutBuilder;
pub use cache::LayoutCache;
pub use layout::{EntryKind, Layout, LayoutEntry, Subobject};
pub use order::{construction_order, destruction_order, ConstructionStep};
pub use path::SubobjectPath;
pub use validator::LayoutValidator;
