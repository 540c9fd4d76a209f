// Fri Oct 16 2026 - Alex

pub mod object_model;

pub use object_model::ObjectModel;
