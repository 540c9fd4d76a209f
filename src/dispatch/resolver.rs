// Fri Oct 16 2026 - Alex

use crate::dispatch::{CallTarget, Dispatch};
use crate::error::{ModelError, ModelResult};
use crate::hierarchy::{ClassId, ClassRegistry};
use crate::layout::Layout;
use crate::vtable::VtableSpec;
use log::debug;

/// Resolves calls made through a sub-object of one complete object.
///
/// `layout` and `vtables` belong to the dynamic most-derived type, so both the
/// view-to-declaration offsets and the slot contents reflect the actual object
/// rather than the static view type.
pub struct DispatchResolver<'a> {
    registry: &'a ClassRegistry,
    layout: &'a Layout,
    vtables: &'a [VtableSpec],
}

impl<'a> DispatchResolver<'a> {
    pub fn new(registry: &'a ClassRegistry, layout: &'a Layout, vtables: &'a [VtableSpec]) -> Self {
        Self {
            registry,
            layout,
            vtables,
        }
    }

    pub fn resolve(&self, view: usize, method: &str, qualified_on: Option<ClassId>) -> ModelResult<CallTarget> {
        let view_offset = self.layout.subobject(view).offset as isize;

        if let Some(qualifier) = qualified_on {
            let start = self.unique_base(view, qualifier, method)?;
            let decl = self.lookup(start, method)?;
            let decl_sub = self.layout.subobject(decl);
            return Ok(CallTarget {
                target_class: decl_sub.class,
                method: method.to_string(),
                this_adjustment: decl_sub.offset as isize - view_offset,
                dispatch: Dispatch::Direct,
            });
        }

        let decl = self.lookup(view, method)?;
        let decl_sub = self.layout.subobject(decl);

        if !self.registry.is_virtual_method(decl_sub.class, method)? {
            return Ok(CallTarget {
                target_class: decl_sub.class,
                method: method.to_string(),
                this_adjustment: decl_sub.offset as isize - view_offset,
                dispatch: Dispatch::Direct,
            });
        }

        let vtable = self
            .vtables
            .iter()
            .find(|v| v.shares_pointer_with(&decl_sub.path))
            .ok_or_else(|| ModelError::InvalidPath(format!(
                "no vtable pointer serves {}",
                decl_sub.path.render(self.registry)
            )))?;
        let slot = vtable
            .find_slot(method)
            .ok_or_else(|| ModelError::UnresolvedOverride {
                class: self.registry.name_of(decl_sub.class),
                method: method.to_string(),
            })?;

        let owner_offset = self.layout.find_subobject(&vtable.owner)
            .map(|i| self.layout.subobject(i).offset as isize)
            .unwrap_or(vtable.vptr_offset as isize);
        let this_adjustment = owner_offset - view_offset + slot.adjustment.resolved;

        debug!(
            "{}::{} via slot {} of {} -> {}",
            self.registry.name_of(self.layout.subobject(view).class),
            method,
            slot.index,
            vtable.owner.render(self.registry),
            self.registry.name_of(slot.implementor)
        );

        Ok(CallTarget {
            target_class: slot.implementor,
            method: method.to_string(),
            this_adjustment,
            dispatch: Dispatch::Virtual {
                vtable_owner: vtable.owner.clone(),
                vptr_offset: vtable.vptr_offset as isize - view_offset,
                slot: slot.index,
                thunk: slot.adjustment,
            },
        })
    }

    /// Name lookup: the sub-objects reachable from `start` that declare
    /// `method` and are not hidden by a declaration in a derived sub-object.
    pub fn lookup(&self, start: usize, method: &str) -> ModelResult<usize> {
        let reachable = self.layout.reachable_from(start);
        let mut declaring: Vec<usize> = reachable
            .into_iter()
            .filter(|&i| {
                self.registry
                    .get(self.layout.subobject(i).class)
                    .map(|c| c.declares(method))
                    .unwrap_or(false)
            })
            .collect();
        declaring.sort_unstable();

        let visible: Vec<usize> = declaring
            .iter()
            .copied()
            .filter(|&d| !declaring.iter().any(|&other| other != d && self.layout.reaches(other, d)))
            .collect();

        match visible.as_slice() {
            [] => Err(ModelError::NoSuchMethod {
                class: self.registry.name_of(self.layout.subobject(start).class),
                method: method.to_string(),
            }),
            [single] => Ok(*single),
            many => Err(ModelError::AmbiguousMethod {
                class: self.registry.name_of(self.layout.subobject(start).class),
                method: method.to_string(),
                candidates: many
                    .iter()
                    .map(|&i| self.layout.subobject(i).path.render(self.registry))
                    .collect(),
            }),
        }
    }

    fn unique_base(&self, view: usize, qualifier: ClassId, method: &str) -> ModelResult<usize> {
        let mut matches: Vec<usize> = self
            .layout
            .reachable_from(view)
            .into_iter()
            .filter(|&i| self.layout.subobject(i).class == qualifier)
            .collect();
        matches.sort_unstable();

        match matches.as_slice() {
            [] => Err(ModelError::NoSuchMethod {
                class: self.registry.name_of(self.layout.subobject(view).class),
                method: format!("{}::{}", self.registry.name_of(qualifier), method),
            }),
            [single] => Ok(*single),
            many => Err(ModelError::AmbiguousMethod {
                class: self.registry.name_of(self.layout.subobject(view).class),
                method: format!("{}::{}", self.registry.name_of(qualifier), method),
                candidates: many
                    .iter()
                    .map(|&i| self.layout.subobject(i).path.render(self.registry))
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hierarchy::ClassBuilder;
    use crate::layout::LayoutBuilder;
    use crate::vtable::VtableBuilder;

    fn resolve(registry: &ClassRegistry, class: ClassId, method: &str) -> ModelResult<CallTarget> {
        let config = Config::default();
        let layout = LayoutBuilder::new(registry, &config).build(class, true)?;
        let vtables = VtableBuilder::new(registry, &layout).build()?;
        DispatchResolver::new(registry, &layout, &vtables).resolve(0, method, None)
    }

    #[test]
    fn test_non_virtual_call_is_direct() {
        let mut registry = ClassRegistry::new();
        let a = registry.define(ClassBuilder::new("A").field("x", 4, 4).method("s")).unwrap();
        let b = registry.define(ClassBuilder::new("B").field("y", 8, 8).base(a)).unwrap();

        let target = resolve(&registry, b, "s").unwrap();
        assert_eq!(target.target_class, a);
        assert_eq!(target.dispatch, Dispatch::Direct);
        assert_eq!(target.this_adjustment, 0);
    }

    #[test]
    fn test_unrelated_declarations_are_ambiguous() {
        let mut registry = ClassRegistry::new();
        let left = registry.define(ClassBuilder::new("Left").field("l", 4, 4).method("m")).unwrap();
        let right = registry.define(ClassBuilder::new("Right").field("r", 4, 4).method("m")).unwrap();
        let both = registry.define(ClassBuilder::new("Both").base(left).base(right)).unwrap();

        let err = resolve(&registry, both, "m").unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousMethod { .. }));
    }

    #[test]
    fn test_missing_method() {
        let mut registry = ClassRegistry::new();
        let a = registry.define(ClassBuilder::new("A").virtual_method("f")).unwrap();
        let err = resolve(&registry, a, "nope").unwrap_err();
        assert!(matches!(err, ModelError::NoSuchMethod { .. }));
    }

    #[test]
    fn test_derived_declaration_hides_base() {
        let mut registry = ClassRegistry::new();
        let left = registry.define(ClassBuilder::new("Left").method("m")).unwrap();
        let mid = registry.define(ClassBuilder::new("Mid").base(left).method("m")).unwrap();
        let right = registry.define(ClassBuilder::new("Right").field("r", 4, 4)).unwrap();
        let top = registry.define(ClassBuilder::new("Top").base(right).base(mid)).unwrap();

        let target = resolve(&registry, top, "m").unwrap();
        assert_eq!(target.target_class, mid);
        assert_eq!(target.this_adjustment, 4);
    }
}
