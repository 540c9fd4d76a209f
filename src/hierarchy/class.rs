// Thu Oct 15 2026 - Alex

use crate::hierarchy::DataMember;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena index of a class in a [`ClassRegistry`](crate::hierarchy::ClassRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRef {
    pub class: ClassId,
    pub is_virtual: bool,
    /// Position in the base-specifier list.
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub is_virtual: bool,
    /// Mirrors the `override` specifier; checked against the bases when the class is defined.
    pub is_override: bool,
    pub owner: ClassId,
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            write!(f, "virtual ")?;
        }
        write!(f, "void {}()", self.name)?;
        if self.is_override {
            write!(f, " override")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: String,
    pub bases: Vec<BaseRef>,
    pub methods: Vec<MethodDecl>,
    pub members: Vec<DataMember>,
    pub(crate) defined: bool,
}

impl ClassDef {
    pub(crate) fn forward(id: ClassId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            bases: Vec::new(),
            methods: Vec::new(),
            members: Vec::new(),
            defined: false,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    pub fn non_virtual_bases(&self) -> impl Iterator<Item = &BaseRef> {
        self.bases.iter().filter(|b| !b.is_virtual)
    }

    pub fn direct_virtual_bases(&self) -> impl Iterator<Item = &BaseRef> {
        self.bases.iter().filter(|b| b.is_virtual)
    }

    /// Classes this one needs complete before it can be laid out.
    pub fn dependencies(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.bases
            .iter()
            .map(|b| b.class)
            .chain(self.members.iter().filter_map(|m| m.object_class()))
    }
}
