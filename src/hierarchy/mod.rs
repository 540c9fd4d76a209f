// Thu Oct 15 2026 - Alex

pub mod builder;
pub mod class;
pub mod description;
pub mod fixture;
pub mod member;
pub mod registry;

pub use builder::{ClassBuilder, MethodSpec};
pub use class::{BaseRef, ClassDef, ClassId, MethodDecl};
pub use description::{BaseDescription, ClassDescription, HierarchyDescription, MemberDescription, MethodDescription};
pub use fixture::{define_reference_hierarchy, ReferenceHierarchy};
pub use member::{DataMember, MemberKind, PrimitiveType};
pub use registry::ClassRegistry;
