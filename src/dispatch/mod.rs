// Fri Oct 16 2026 - Alex

pub mod resolver;
pub mod target;

pub use resolver::DispatchResolver;
pub use target::{CallTarget, Dispatch, PathStep};
