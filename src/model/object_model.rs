// Fri Oct 16 2026 - Alex

use crate::config::Config;
use crate::dispatch::{CallTarget, DispatchResolver, PathStep};
use crate::error::{ModelError, ModelResult};
use crate::hierarchy::{ClassBuilder, ClassDef, ClassId, ClassRegistry, DataMember};
use crate::layout::{
    construction_order, destruction_order, ConstructionStep, EntryKind, Layout, LayoutBuilder, LayoutCache,
    LayoutValidator,
};
use crate::vtable::{VtableBuilder, VtableSpec};
use log::{debug, info};
use std::sync::Arc;

/// Owns a class registry and answers layout, vtable and dispatch queries
/// against it. Any definition invalidates everything computed so far.
pub struct ObjectModel {
    registry: ClassRegistry,
    config: Config,
    cache: LayoutCache,
}

impl ObjectModel {
    pub fn new(config: Config) -> Self {
        Self {
            registry: ClassRegistry::new(),
            config,
            cache: LayoutCache::new(),
        }
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn declare(&mut self, name: &str) -> ClassId {
        self.registry.declare(name)
    }

    pub fn define(&mut self, builder: ClassBuilder) -> ModelResult<ClassId> {
        let id = self.registry.define(builder)?;
        self.cache.clear();
        info!("Defined class {}", self.registry.name_of(id));
        Ok(id)
    }

    /// Flat form: `bases` are `(class, is_virtual)`, `methods` are `(name, is_virtual)`.
    pub fn define_class(
        &mut self,
        name: &str,
        bases: &[(ClassId, bool)],
        methods: &[(&str, bool)],
        members: Vec<DataMember>,
    ) -> ModelResult<ClassId> {
        let mut builder = ClassBuilder::new(name);
        for &(class, is_virtual) in bases {
            builder = builder.with_base(class, is_virtual);
        }
        for &(method, is_virtual) in methods {
            builder = builder.with_method(method, is_virtual, false);
        }
        for member in members {
            builder = builder.member(member);
        }
        self.define(builder)
    }

    pub fn class_id(&self, name: &str) -> ModelResult<ClassId> {
        self.registry.by_name(name)
    }

    pub fn class(&self, id: ClassId) -> ModelResult<&ClassDef> {
        self.registry.get(id)
    }

    pub fn name_of(&self, id: ClassId) -> String {
        self.registry.name_of(id)
    }

    fn layout_builder(&self) -> LayoutBuilder<'_> {
        let builder = LayoutBuilder::new(&self.registry, &self.config);
        if self.config.cache_layouts {
            builder.with_cache(&self.cache)
        } else {
            builder
        }
    }

    pub fn layout_of(&self, class: ClassId, as_most_derived: bool) -> ModelResult<Arc<Layout>> {
        let layout = self.layout_builder().build(class, as_most_derived)?;
        if self.config.validate_layouts {
            LayoutValidator::new().validate(&layout)?;
        }
        Ok(layout)
    }

    pub fn vtables_of(&self, class: ClassId) -> ModelResult<Arc<Vec<VtableSpec>>> {
        if self.config.cache_layouts {
            if let Some(cached) = self.cache.get_vtables(class) {
                return Ok(cached);
            }
        }

        let layout = self.layout_of(class, true)?;
        let vtables = Arc::new(VtableBuilder::new(&self.registry, &layout).build()?);
        debug!("Built {} vtables for {}", vtables.len(), self.name_of(class));

        if self.config.cache_layouts {
            self.cache.insert_vtables(class, vtables.clone());
        }
        Ok(vtables)
    }

    /// Resolve a call through a `view`, treating the view type as the
    /// dynamic type of the object.
    pub fn resolve_call(&self, view: ClassId, method: &str, qualified_on: Option<ClassId>) -> ModelResult<CallTarget> {
        self.resolve_in(view, &[], method, qualified_on)
    }

    /// Resolve a call on a complete `object` made through the sub-object
    /// reached by `path`. Member steps switch the dynamic type to the
    /// member's class.
    pub fn resolve_in(
        &self,
        object: ClassId,
        path: &[PathStep],
        method: &str,
        qualified_on: Option<ClassId>,
    ) -> ModelResult<CallTarget> {
        let mut dynamic = object;
        let mut layout = self.layout_of(dynamic, true)?;
        let mut node = 0;

        for step in path {
            match step {
                PathStep::Base(base) => {
                    let current = layout.subobject(node);
                    node = current
                        .bases
                        .iter()
                        .copied()
                        .find(|&b| layout.subobject(b).class == *base)
                        .ok_or_else(|| {
                            ModelError::InvalidPath(format!(
                                "{} is not a direct base of {}",
                                self.name_of(*base),
                                current.path.render(&self.registry)
                            ))
                        })?;
                }
                PathStep::Member(name) => {
                    let owner = &layout.subobject(node).path;
                    let entry = layout.member_entry(owner, name).ok_or_else(|| {
                        ModelError::InvalidPath(format!("{} has no member {}", owner.render(&self.registry), name))
                    })?;
                    dynamic = match entry.kind {
                        EntryKind::Object { class, .. } => class,
                        _ => {
                            return Err(ModelError::InvalidPath(format!(
                                "{}.{} is not an object",
                                owner.render(&self.registry),
                                name
                            )))
                        }
                    };
                    layout = self.layout_of(dynamic, true)?;
                    node = 0;
                }
            }
        }

        let vtables = self.vtables_of(dynamic)?;
        DispatchResolver::new(&self.registry, &layout, &vtables).resolve(node, method, qualified_on)
    }

    pub fn construction_order(&self, class: ClassId) -> ModelResult<Vec<ConstructionStep>> {
        let layout = self.layout_of(class, true)?;
        construction_order(&self.registry, &layout)
    }

    pub fn destruction_order(&self, class: ClassId) -> ModelResult<Vec<ConstructionStep>> {
        let layout = self.layout_of(class, true)?;
        destruction_order(&self.registry, &layout)
    }

    /// Build and validate the layouts and vtables of every defined class.
    pub fn check_all(&self) -> ModelResult<usize> {
        let mut count = 0;
        for def in self.registry.iter().filter(|c| c.is_defined()) {
            let layout = self.layout_of(def.id, true)?;
            LayoutValidator::new().validate(&layout)?;
            self.vtables_of(def.id)?;
            count += 1;
        }
        Ok(count)
    }
}

impl Default for ObjectModel {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatch;
    use crate::hierarchy::{define_reference_hierarchy, ReferenceHierarchy};
    use crate::vtable::ThisAdjustment;

    fn reference(config: Config) -> (ObjectModel, ReferenceHierarchy) {
        let mut model = ObjectModel::new(config);
        let ids = define_reference_hierarchy(&mut model).unwrap();
        (model, ids)
    }

    #[test]
    fn test_reference_sizes() {
        let (model, r) = reference(Config::default());
        let sizes: Vec<usize> = [r.simple, r.a, r.second, r.third, r.b, r.d, r.c, r.e]
            .iter()
            .map(|&c| model.layout_of(c, true).unwrap().size())
            .collect();
        assert_eq!(sizes, vec![8, 24, 16, 8, 48, 48, 48, 200]);
    }

    #[test]
    fn test_diamond_shares_virtual_base() {
        let (model, r) = reference(Config::default());
        let layout = model.layout_of(r.e, true).unwrap();

        assert_eq!(layout.subobjects_of_class(r.a).len(), 1);
        assert_eq!(layout.virtual_base_offset(r.a), Some(160));
        assert_eq!(layout.virtual_base_offset(r.second), Some(184));
        assert_eq!(layout.member_offset("c"), Some(56));
        assert_eq!(layout.member_offset("b"), Some(104));
        assert_eq!(layout.member_offset("ie1"), Some(152));

        let a = layout.subobjects_of_class(r.a)[0];
        let b = layout.subobjects_of_class(r.b)[0];
        let d = layout.subobjects_of_class(r.d)[0];
        assert!(layout.reaches(b, a));
        assert!(layout.reaches(d, a));
    }

    #[test]
    fn test_base_subobject_leaves_virtual_bases_out() {
        let (model, r) = reference(Config::default());
        let layout = model.layout_of(r.b, false).unwrap();
        assert_eq!(layout.size(), 24);
        assert_eq!(layout.virtual_bases(), &[r.a]);
        assert!(layout.subobjects_of_class(r.a).is_empty());
    }

    #[test]
    fn test_every_reference_class_validates() {
        let (model, _) = reference(Config::default());
        assert_eq!(model.check_all().unwrap(), 8);
    }

    #[test]
    fn test_cached_layouts_match_uncached() {
        let (cached, r) = reference(Config::default());
        let (uncached, _) = reference(Config::default().with_cache(false));

        for class in [r.a, r.b, r.c, r.d, r.e] {
            for most_derived in [false, true] {
                let first = cached.layout_of(class, most_derived).unwrap();
                let again = cached.layout_of(class, most_derived).unwrap();
                assert!(Arc::ptr_eq(&first, &again));
                assert_eq!(*first, *uncached.layout_of(class, most_derived).unwrap());
            }
            assert_eq!(*cached.vtables_of(class).unwrap(), *uncached.vtables_of(class).unwrap());
        }
        assert_eq!(uncached.cache().size(), 0);
    }

    #[test]
    fn test_define_clears_cache() {
        let (mut model, r) = reference(Config::default());
        model.vtables_of(r.e).unwrap();
        assert!(model.cache().size() > 0);

        model.define_class("Late", &[(r.a, false)], &[("f", false)], Vec::new()).unwrap();
        assert_eq!(model.cache().size(), 0);
    }

    #[test]
    fn test_reference_vtables() {
        let (model, r) = reference(Config::default());
        let vtables = model.vtables_of(r.e).unwrap();
        let offsets: Vec<usize> = vtables.iter().map(|v| v.vptr_offset).collect();
        assert_eq!(offsets, vec![0, 24, 168, 184]);

        let primary = &vtables[0];
        assert!(primary.is_primary());
        assert_eq!(primary.chain_classes(), vec![r.b, r.e]);
        assert_eq!(primary.find_slot("f").unwrap().implementor, r.e);

        let d = &vtables[1];
        let names: Vec<&str> = d.slots.iter().map(|s| s.method.as_str()).collect();
        assert_eq!(names, vec!["i", "j", "f", "h"]);
        let f = d.find_slot("f").unwrap();
        assert_eq!(f.implementor, r.e);
        assert_eq!(f.adjustment, ThisAdjustment::fixed(-24));

        let a = &vtables[2];
        let f = a.find_slot("f").unwrap();
        assert_eq!(f.implementor, r.e);
        assert_eq!(f.adjustment, ThisAdjustment::via_virtual_base(r.a, Some(8), 0, -160));
        assert_eq!(a.find_slot("g").unwrap().implementor, r.a);
        assert_eq!(a.offset_to_top, -160);
    }

    #[test]
    fn test_override_keeps_reference_slots() {
        let (model, r) = reference(Config::default());
        let base = model.vtables_of(r.a).unwrap();
        let derived = model.vtables_of(r.c).unwrap();
        for method in ["f", "g", "h"] {
            assert_eq!(
                base[0].find_slot(method).unwrap().index,
                derived[0].find_slot(method).unwrap().index
            );
        }
        assert_eq!(derived[0].find_slot("f").unwrap().implementor, r.c);
        assert_eq!(derived[0].find_slot("g").unwrap().implementor, r.a);
    }

    #[test]
    fn test_secondary_base_call() {
        let (model, r) = reference(Config::default());
        let target = model.resolve_call(r.c, "u", None).unwrap();
        assert_eq!(target.target_class, r.second);
        assert_eq!(target.this_adjustment, 24);
        match target.dispatch {
            Dispatch::Virtual { vptr_offset, thunk, .. } => {
                assert_eq!(vptr_offset, 24);
                assert!(thunk.is_zero());
            }
            Dispatch::Direct => panic!("u is virtual"),
        }
    }

    #[test]
    fn test_call_reaches_virtual_base() {
        let (model, r) = reference(Config::default());
        let target = model.resolve_call(r.e, "g", None).unwrap();
        assert_eq!(target.target_class, r.a);
        assert_eq!(target.this_adjustment, 160);
        assert_eq!(target.slot(), Some(1));
    }

    #[test]
    fn test_qualified_call_is_direct() {
        let (model, r) = reference(Config::default());
        let target = model.resolve_call(r.b, "f", Some(r.a)).unwrap();
        assert_eq!(target.target_class, r.a);
        assert_eq!(target.dispatch, Dispatch::Direct);
        assert_eq!(target.this_adjustment, 24);

        let err = model.resolve_call(r.b, "f", Some(r.c)).unwrap_err();
        assert!(matches!(err, ModelError::NoSuchMethod { .. }));
    }

    #[test]
    fn test_dynamic_type_decides_target() {
        let (model, r) = reference(Config::default());

        let shared = model
            .resolve_in(r.e, &[PathStep::Base(r.b), PathStep::Base(r.a)], "f", None)
            .unwrap();
        assert_eq!(shared.target_class, r.e);
        assert_eq!(shared.this_adjustment, -160);

        let embedded = model
            .resolve_in(
                r.e,
                &[PathStep::Member("b".to_string()), PathStep::Base(r.a)],
                "f",
                None,
            )
            .unwrap();
        assert_eq!(embedded.target_class, r.b);
        assert_eq!(embedded.this_adjustment, -24);
    }

    #[test]
    fn test_diamond_paths_agree() {
        let (model, r) = reference(Config::default());
        let layout = model.layout_of(r.e, true).unwrap();
        let a_offset = layout.virtual_base_offset(r.a).unwrap() as isize;

        for method in ["f", "g"] {
            let via_b = model
                .resolve_in(r.e, &[PathStep::Base(r.b), PathStep::Base(r.a)], method, None)
                .unwrap();
            let via_d = model
                .resolve_in(r.e, &[PathStep::Base(r.d), PathStep::Base(r.a)], method, None)
                .unwrap();

            assert_eq!(via_b.target_class, via_d.target_class);
            assert_eq!(a_offset + via_b.this_adjustment, a_offset + via_d.this_adjustment);
            assert_eq!(via_b.slot(), via_d.slot());
        }

        let f = model
            .resolve_in(r.e, &[PathStep::Base(r.d), PathStep::Base(r.a)], "f", None)
            .unwrap();
        assert_eq!((f.target_class, a_offset + f.this_adjustment), (r.e, 0));
        let g = model
            .resolve_in(r.e, &[PathStep::Base(r.d), PathStep::Base(r.a)], "g", None)
            .unwrap();
        assert_eq!((g.target_class, a_offset + g.this_adjustment), (r.a, 160));
    }

    #[test]
    fn test_virtual_base_pointer_slots() {
        let (model, r) = reference(Config::default());
        let layout = model.layout_of(r.b, true).unwrap();

        let slots: Vec<(usize, EntryKind)> = layout
            .entries()
            .iter()
            .filter(|e| e.path.is_root() && e.name().is_none() && e.is_leaf())
            .map(|e| (e.offset, e.kind.clone()))
            .collect();
        assert_eq!(
            slots,
            vec![(0, EntryKind::VtablePointer), (8, EntryKind::VirtualBasePointer { base: r.a })]
        );
        let vbptr = layout.virtual_base_pointers().next().unwrap();
        assert_eq!(layout.virtual_base_pointer_value(vbptr), Some(16));
        assert_eq!(layout.member_offset("ib1"), Some(16));
        assert_eq!(layout.virtual_base_offset(r.a), Some(24));

        // C has no virtual bases
        assert_eq!(model.layout_of(r.c, true).unwrap().virtual_base_pointers().count(), 0);
    }

    #[test]
    fn test_bad_paths() {
        let (model, r) = reference(Config::default());
        let err = model.resolve_in(r.e, &[PathStep::Base(r.a)], "f", None).unwrap_err();
        assert!(matches!(err, ModelError::InvalidPath(_)));

        let err = model
            .resolve_in(r.e, &[PathStep::Member("ie1".to_string())], "f", None)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidPath(_)));
    }

    #[test]
    fn test_construction_order() {
        let (model, r) = reference(Config::default());
        let order = model.construction_order(r.e).unwrap();
        let classes: Vec<ClassId> = order.iter().map(|s| s.class()).collect();
        assert_eq!(classes, vec![r.simple, r.a, r.second, r.b, r.third, r.d, r.c, r.b, r.e]);
        assert!(matches!(&order[6], ConstructionStep::Member { name, .. } if name == "c"));

        let mut destruction = model.destruction_order(r.e).unwrap();
        destruction.reverse();
        assert_eq!(destruction, order);
    }

    #[test]
    fn test_ilp32_layout() {
        let (model, r) = reference(Config::ilp32());
        let layout = model.layout_of(r.a, true).unwrap();
        assert_eq!(layout.member_offset("is1"), Some(0));
        assert_eq!(layout.vtable_pointers().next().map(|v| v.offset), Some(8));
        assert_eq!(layout.member_offset("ia1"), Some(12));
        assert_eq!(layout.size(), 20);

        let b = model.layout_of(r.b, true).unwrap();
        let vbptr = b.virtual_base_pointers().next().unwrap();
        assert_eq!(vbptr.offset, 4);
        assert_eq!(b.member_offset("ib1"), Some(8));
        assert_eq!(b.virtual_base_offset(r.a), Some(16));
        assert_eq!(b.size(), 36);
    }

    #[test]
    fn test_stacked_diamonds_lay_out_linearly() {
        let mut model = ObjectModel::default();
        let mut x = model.define(ClassBuilder::new("X0").virtual_method("f")).unwrap();
        for i in 1..=32 {
            let l = model.define(ClassBuilder::new(&format!("L{}", i)).virtual_base(x)).unwrap();
            let r = model.define(ClassBuilder::new(&format!("R{}", i)).virtual_base(x)).unwrap();
            x = model
                .define(ClassBuilder::new(&format!("X{}", i)).base(l).base(r))
                .unwrap();
        }

        let layout = model.layout_of(x, true).unwrap();
        assert_eq!(layout.virtual_bases().len(), 32);
        assert_eq!(layout.subobjects().len(), 97);
        assert_eq!(model.vtables_of(x).unwrap().len(), 1);
        assert_eq!(model.resolve_call(x, "f", None).unwrap().target_class, model.class_id("X0").unwrap());
    }

    #[test]
    fn test_incomplete_base() {
        let mut model = ObjectModel::default();
        let later = model.declare("Later");
        let user = model.define_class("User", &[(later, false)], &[], Vec::new()).unwrap();
        let err = model.layout_of(user, true).unwrap_err();
        assert!(matches!(err, ModelError::IncompleteClass { .. }));
    }
}
