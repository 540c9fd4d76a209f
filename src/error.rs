// Thu Oct 15 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Inheritance cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("Duplicate base {base} in {class}")]
    DuplicateBase { class: String, base: String },
    #[error("{class}::{method} is marked override but no base declares it virtual")]
    UnresolvedOverride { class: String, method: String },
    #[error("Ambiguous method {method} in {class}: {}", .candidates.join(", "))]
    AmbiguousMethod {
        class: String,
        method: String,
        candidates: Vec<String>,
    },
    #[error("No method {method} reachable from {class}")]
    NoSuchMethod { class: String, method: String },
    #[error("Unknown class: {0}")]
    UnknownClass(String),
    #[error("Class already defined: {0}")]
    DuplicateClass(String),
    #[error("Class {class} depends on incomplete class {incomplete}")]
    IncompleteClass { class: String, incomplete: String },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Layout violation: {0}")]
    LayoutViolation(String),
    #[error("Invalid description: {0}")]
    Description(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cycle(_) => "CycleError",
            Self::DuplicateBase { .. } => "DuplicateBaseError",
            Self::UnresolvedOverride { .. } => "UnresolvedOverrideError",
            Self::AmbiguousMethod { .. } => "AmbiguousMethodError",
            Self::NoSuchMethod { .. } => "NoSuchMethodError",
            Self::UnknownClass(_) => "UnknownClassError",
            Self::DuplicateClass(_) => "DuplicateClassError",
            Self::IncompleteClass { .. } => "IncompleteClassError",
            Self::InvalidPath(_) => "InvalidPathError",
            Self::LayoutViolation(_) => "LayoutViolationError",
            Self::Description(_) => "DescriptionError",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
        }
    }
}
