// Thu Oct 15 2026 - Alex

pub mod config;
pub mod dispatch;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod output;
pub mod ui;
pub mod utils;
pub mod vtable;

pub use config::Config;
pub use dispatch::{CallTarget, Dispatch, PathStep};
pub use error::{ModelError, ModelResult};
pub use hierarchy::{ClassBuilder, ClassId, ClassRegistry, DataMember, HierarchyDescription};
pub use layout::{Layout, LayoutBuilder, SubobjectPath};
pub use model::ObjectModel;
pub use output::{JsonSerializer, ReportGenerator};
pub use vtable::{ThisAdjustment, VtableBuilder, VtableSpec};
