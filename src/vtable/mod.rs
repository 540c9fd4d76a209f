// Fri Oct 16 2026 - Alex

pub mod builder;
pub mod spec;

pub use builder::VtableBuilder;
pub use spec::{signed_hex, ThisAdjustment, VtableSlot, VtableSpec};
