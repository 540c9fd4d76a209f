// Fri Oct 16 2026 - Alex

use crate::error::{ModelError, ModelResult};
use crate::hierarchy::{ClassId, ClassRegistry};
use crate::layout::Layout;
use crate::vtable::{ThisAdjustment, VtableSlot, VtableSpec};
use log::trace;
use std::collections::HashSet;

/// Builds every vtable of a most-derived layout, one per vtable pointer.
pub struct VtableBuilder<'a> {
    registry: &'a ClassRegistry,
    layout: &'a Layout,
    reach: Vec<HashSet<usize>>,
}

impl<'a> VtableBuilder<'a> {
    pub fn new(registry: &'a ClassRegistry, layout: &'a Layout) -> Self {
        let reach = (0..layout.subobjects().len())
            .map(|i| layout.reachable_from(i))
            .collect();
        Self { registry, layout, reach }
    }

    pub fn build(&self) -> ModelResult<Vec<VtableSpec>> {
        let mut vtables = Vec::new();
        for vptr in self.layout.vtable_pointers() {
            let root = self
                .layout
                .find_subobject(&vptr.path)
                .ok_or_else(|| ModelError::InvalidPath(vptr.path.render(self.registry)))?;
            vtables.push(self.build_one(root, vptr.offset)?);
        }
        Ok(vtables)
    }

    /// Sub-objects sharing the vtable pointer owned by `root`, base to derived.
    fn chain(&self, root: usize) -> ModelResult<Vec<usize>> {
        let mut chain = vec![root];
        let mut current = root;
        while let Some(parent) = self.layout.non_virtual_parent(current) {
            let parent_class = self.layout.subobject(parent).class;
            if self.registry.primary_base(parent_class)? != Some(self.layout.subobject(current).class) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    fn build_one(&self, root: usize, vptr_offset: usize) -> ModelResult<VtableSpec> {
        let chain = self.chain(root)?;
        let owner = chain[chain.len() - 1];
        let owner_sub = self.layout.subobject(owner);

        // (method, introducing sub-object), in slot order
        let mut introduced: Vec<(String, usize)> = Vec::new();
        for &node in &chain {
            let class = self.layout.subobject(node).class;
            for method in self.registry.virtual_methods(class)? {
                if method.is_override && !self.registry.inherits_virtual(class, &method.name)? {
                    return Err(ModelError::UnresolvedOverride {
                        class: self.registry.name_of(class),
                        method: method.name.clone(),
                    });
                }
                if !introduced.iter().any(|(name, _)| name == &method.name) {
                    introduced.push((method.name.clone(), node));
                }
            }
        }

        let mut slots = Vec::with_capacity(introduced.len());
        for (index, (method, introducer)) in introduced.into_iter().enumerate() {
            let implementor = self.final_overrider(introducer, &method)?;
            let adjustment = self.adjustment(owner, implementor);
            let implementor_sub = self.layout.subobject(implementor);
            slots.push(VtableSlot {
                index,
                method,
                introduced_by: self.layout.subobject(introducer).class,
                implementor: implementor_sub.class,
                implementor_path: implementor_sub.path.clone(),
                adjustment,
            });
        }

        trace!(
            "vtable for {} in {}: {} slots",
            owner_sub.path.render(self.registry),
            self.registry.name_of(self.layout.class()),
            slots.len()
        );

        Ok(VtableSpec {
            class: self.layout.class(),
            owner: owner_sub.path.clone(),
            vptr_offset,
            chain: chain
                .iter()
                .map(|&i| self.layout.subobject(i).path.clone())
                .collect(),
            offset_to_top: -(owner_sub.offset as isize),
            slots,
        })
    }

    /// Among sub-objects containing `introducer` that declare `method`
    /// virtual, the one that contains all the others.
    pub fn final_overrider(&self, introducer: usize, method: &str) -> ModelResult<usize> {
        let mut candidates = Vec::new();
        for (i, sub) in self.layout.subobjects().iter().enumerate() {
            if self.reach[i].contains(&introducer) && self.registry.is_virtual_method(sub.class, method)? {
                candidates.push(i);
            }
        }

        candidates
            .iter()
            .copied()
            .find(|&c| candidates.iter().all(|other| self.reach[c].contains(other)))
            .ok_or_else(|| ModelError::AmbiguousMethod {
                class: self.registry.name_of(self.layout.class()),
                method: method.to_string(),
                candidates: candidates
                    .iter()
                    .map(|&c| self.layout.subobject(c).path.render(self.registry))
                    .collect(),
            })
    }

    fn adjustment(&self, owner: usize, implementor: usize) -> ThisAdjustment {
        let owner_sub = self.layout.subobject(owner);
        let impl_sub = self.layout.subobject(implementor);
        let resolved = impl_sub.offset as isize - owner_sub.offset as isize;

        match owner_sub.path.enclosing_virtual_base() {
            Some(vbase) if impl_sub.path.enclosing_virtual_base() != Some(vbase) => {
                let vbase_offset = self.layout.virtual_base_offset(vbase).unwrap_or(owner_sub.offset);
                ThisAdjustment::via_virtual_base(
                    vbase,
                    self.virtual_base_pointer(implementor, vbase),
                    vbase_offset as isize - owner_sub.offset as isize,
                    resolved,
                )
            }
            _ => ThisAdjustment::fixed(resolved),
        }
    }

    /// First virtual-base-pointer slot to `vbase` held by a sub-object the
    /// implementor contains.
    fn virtual_base_pointer(&self, implementor: usize, vbase: ClassId) -> Option<usize> {
        self.layout
            .virtual_base_pointers()
            .filter(|e| e.virtual_base_pointer_target() == Some(vbase))
            .find(|e| {
                self.layout
                    .find_subobject(&e.path)
                    .map(|holder| self.reach[implementor].contains(&holder))
                    .unwrap_or(false)
            })
            .map(|e| e.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hierarchy::ClassBuilder;
    use crate::layout::LayoutBuilder;

    fn vtables(registry: &ClassRegistry, class: ClassId) -> ModelResult<Vec<VtableSpec>> {
        let config = Config::default();
        let layout = LayoutBuilder::new(registry, &config).build(class, true)?;
        VtableBuilder::new(registry, &layout).build()
    }

    #[test]
    fn test_override_keeps_slot_index() {
        let mut registry = ClassRegistry::new();
        let base = registry
            .define(ClassBuilder::new("Base").virtual_method("f").virtual_method("g"))
            .unwrap();
        let derived = registry
            .define(ClassBuilder::new("Derived").base(base).virtual_method("h").method("g"))
            .unwrap();

        let base_tables = vtables(&registry, base).unwrap();
        let tables = vtables(&registry, derived).unwrap();
        assert_eq!(tables.len(), 1);

        let g = tables[0].find_slot("g").unwrap();
        assert_eq!(g.index, base_tables[0].find_slot("g").unwrap().index);
        assert_eq!(g.implementor, derived);
        assert_eq!(g.introduced_by, base);
        assert_eq!(tables[0].find_slot("h").unwrap().index, 2);
        assert_eq!(tables[0].chain_classes(), vec![base, derived]);
    }

    #[test]
    fn test_secondary_vtable_thunks_to_overrider() {
        let mut registry = ClassRegistry::new();
        let left = registry.define(ClassBuilder::new("Left").virtual_method("f")).unwrap();
        let right = registry
            .define(ClassBuilder::new("Right").virtual_method("g").field("r", 4, 4))
            .unwrap();
        let both = registry
            .define(ClassBuilder::new("Both").base(left).base(right).method("g"))
            .unwrap();

        let tables = vtables(&registry, both).unwrap();
        assert_eq!(tables.len(), 2);

        let secondary = tables.iter().find(|t| !t.is_primary()).unwrap();
        assert_eq!(secondary.vptr_offset, 8);
        let g = secondary.find_slot("g").unwrap();
        assert_eq!(g.implementor, both);
        assert_eq!(g.adjustment, ThisAdjustment::fixed(-8));

        // the overrider of a secondary-base method also gets a primary slot
        let primary = tables.iter().find(|t| t.is_primary()).unwrap();
        assert_eq!(primary.find_slot("g").unwrap().index, 1);
        assert!(!primary.find_slot("g").unwrap().is_thunk());
    }

    #[test]
    fn test_ambiguous_final_overrider() {
        let mut registry = ClassRegistry::new();
        let top = registry.define(ClassBuilder::new("Top").virtual_method("f")).unwrap();
        let x = registry.define(ClassBuilder::new("X").virtual_base(top).method("f")).unwrap();
        let y = registry.define(ClassBuilder::new("Y").virtual_base(top).method("f")).unwrap();
        let z = registry.define(ClassBuilder::new("Z").base(x).base(y)).unwrap();

        let err = vtables(&registry, z).unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousMethod { .. }));

        let resolved = registry.define(ClassBuilder::new("W").base(x).base(y).method("f")).unwrap();
        assert!(vtables(&registry, resolved).is_ok());
    }

    #[test]
    fn test_virtual_base_thunk_reads_pointer_slot() {
        let mut registry = ClassRegistry::new();
        let v = registry.define(ClassBuilder::new("V").virtual_method("f").virtual_method("g")).unwrap();
        let x = registry.define(ClassBuilder::new("X").virtual_base(v).method("f")).unwrap();

        let tables = vtables(&registry, x).unwrap();
        assert_eq!(tables.len(), 2);

        let shared = tables.iter().find(|t| t.owner_class() == v).unwrap();
        assert_eq!(shared.vptr_offset, 16);
        let f = shared.find_slot("f").unwrap();
        assert_eq!(f.implementor, x);
        assert_eq!(f.adjustment, ThisAdjustment::via_virtual_base(v, Some(8), 0, -16));
        assert!(!shared.find_slot("g").unwrap().is_thunk());
    }
}
