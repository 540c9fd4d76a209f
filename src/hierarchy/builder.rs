// Thu Oct 15 2026 - Alex

use crate::hierarchy::{ClassId, DataMember};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: String,
    pub is_virtual: bool,
    pub is_override: bool,
}

/// Collects a class definition before it is committed to the registry.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) bases: Vec<(ClassId, bool)>,
    pub(crate) methods: Vec<MethodSpec>,
    pub(crate) members: Vec<DataMember>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bases: Vec::new(),
            methods: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_base(mut self, class: ClassId, is_virtual: bool) -> Self {
        self.bases.push((class, is_virtual));
        self
    }

    pub fn base(self, class: ClassId) -> Self {
        self.with_base(class, false)
    }

    pub fn virtual_base(self, class: ClassId) -> Self {
        self.with_base(class, true)
    }

    pub fn with_method(mut self, name: &str, is_virtual: bool, is_override: bool) -> Self {
        self.methods.push(MethodSpec {
            name: name.to_string(),
            is_virtual,
            is_override,
        });
        self
    }

    /// Plain member function; still overrides when a base declares it virtual.
    pub fn method(self, name: &str) -> Self {
        self.with_method(name, false, false)
    }

    pub fn virtual_method(self, name: &str) -> Self {
        self.with_method(name, true, false)
    }

    pub fn override_method(self, name: &str) -> Self {
        self.with_method(name, false, true)
    }

    pub fn member(mut self, member: DataMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn field(self, name: &str, size: usize, align: usize) -> Self {
        self.member(DataMember::scalar(name, size, align))
    }

    pub fn object(self, name: &str, class: ClassId) -> Self {
        self.member(DataMember::object(name, class))
    }
}
