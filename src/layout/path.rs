// Thu Oct 15 2026 - Alex

use crate::hierarchy::{ClassId, ClassRegistry};

/// Identifies a sub-object within a complete object.
///
/// `classes[0]` is the class the layout was built for and every further step
/// is a direct base. Virtual bases are shared, so a sub-object inside one is
/// always addressed as `[root, V, ...]` with `virtual_base` set, no matter how
/// many inheritance paths reach `V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubobjectPath {
    classes: Vec<ClassId>,
    virtual_base: bool,
}

impl SubobjectPath {
    pub fn root(class: ClassId) -> Self {
        Self {
            classes: vec![class],
            virtual_base: false,
        }
    }

    pub fn virtual_root(root: ClassId, base: ClassId) -> Self {
        Self {
            classes: vec![root, base],
            virtual_base: true,
        }
    }

    pub fn child(&self, base: ClassId) -> Self {
        let mut classes = self.classes.clone();
        classes.push(base);
        Self {
            classes,
            virtual_base: self.virtual_base,
        }
    }

    /// Re-root a base-subobject path, whose first class must be the last class of `self`.
    pub fn join(&self, tail: &SubobjectPath) -> Self {
        let mut classes = self.classes.clone();
        classes.extend(tail.classes.iter().skip(1));
        Self {
            classes,
            virtual_base: self.virtual_base,
        }
    }

    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub fn class(&self) -> ClassId {
        self.classes[self.classes.len() - 1]
    }

    pub fn most_derived(&self) -> ClassId {
        self.classes[0]
    }

    pub fn depth(&self) -> usize {
        self.classes.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.classes.len() == 1
    }

    /// The shared virtual base this sub-object lives in, if any.
    pub fn enclosing_virtual_base(&self) -> Option<ClassId> {
        if self.virtual_base {
            Some(self.classes[1])
        } else {
            None
        }
    }

    pub fn render(&self, registry: &ClassRegistry) -> String {
        let mut out = String::new();
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                out.push_str(" > ");
                if i == 1 && self.virtual_base {
                    out.push_str("virtual ");
                }
            }
            out.push_str(&registry.name_of(*class));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keeps_virtual_flag() {
        let (e, a, s) = (ClassId::new(0), ClassId::new(1), ClassId::new(2));
        let vbase = SubobjectPath::virtual_root(e, a);
        let tail = SubobjectPath::root(a).child(s);

        let joined = vbase.join(&tail);
        assert_eq!(joined.classes(), &[e, a, s]);
        assert_eq!(joined.enclosing_virtual_base(), Some(a));
        assert_ne!(joined, SubobjectPath::root(e).child(a).child(s));
    }
}
