// Thu Oct 15 2026 - Alex

use crate::config::Config;
use crate::error::ModelResult;
use crate::hierarchy::{ClassId, ClassRegistry, MemberKind};
use crate::layout::{Alignment, EntryKind, Layout, LayoutCache, LayoutEntry, Subobject, SubobjectPath};
use log::trace;
use std::sync::Arc;

/// Computes base-subobject and most-derived layouts.
///
/// A base-subobject layout holds the non-virtual bases in declaration order,
/// then the vtable pointer the class owns (if any), one virtual-base pointer
/// per direct virtual base, and finally its own members. A most-derived
/// layout appends one instance of every distinct virtual base after that.
pub struct LayoutBuilder<'a> {
    registry: &'a ClassRegistry,
    config: &'a Config,
    cache: Option<&'a LayoutCache>,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(registry: &'a ClassRegistry, config: &'a Config) -> Self {
        Self {
            registry,
            config,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: &'a LayoutCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(&self, class: ClassId, most_derived: bool) -> ModelResult<Arc<Layout>> {
        if let Some(cached) = self.cache.and_then(|c| c.get_layout(class, most_derived)) {
            return Ok(cached);
        }

        self.registry.ensure_complete(class)?;
        let layout = if most_derived {
            self.most_derived(class)?
        } else {
            self.base_subobject(class)?
        };
        trace!(
            "laid out {} (most derived: {}): size {} align {}",
            self.registry.name_of(class),
            most_derived,
            layout.size,
            layout.align
        );

        let layout = Arc::new(layout);
        if let Some(cache) = self.cache {
            cache.insert_layout(layout.clone());
        }
        Ok(layout)
    }

    fn base_subobject(&self, class: ClassId) -> ModelResult<Layout> {
        let def = self.registry.get(class)?;
        let root = SubobjectPath::root(class);

        let mut layout = Layout {
            class,
            most_derived: false,
            entries: Vec::new(),
            subobjects: vec![Subobject {
                path: root.clone(),
                class,
                offset: 0,
                size: 0,
                is_virtual: false,
                bases: Vec::new(),
            }],
            size: 0,
            align: 1,
            nv_size: 0,
            nv_align: 1,
            virtual_bases: self.registry.virtual_bases(class)?,
        };

        let mut cursor = 0;
        let mut align = Alignment::default();

        for base in def.non_virtual_bases() {
            let base_layout = self.build(base.class, false)?;
            let base_align = Alignment::new(base_layout.nv_align);
            cursor = base_align.align(cursor);
            splice(&mut layout, &root.child(base.class), &base_layout, cursor, false);
            cursor += base_layout.nv_size;
            align = align.max(base_align);
        }

        let ptr_align = Alignment::new(self.config.pointer_alignment);
        let mut pointers = Vec::new();
        if self.registry.owns_vptr(class)? {
            pointers.push(EntryKind::VtablePointer);
        }
        for vbase in self.registry.direct_virtual_bases(class)? {
            pointers.push(EntryKind::VirtualBasePointer { base: vbase });
        }
        for kind in pointers {
            cursor = ptr_align.align(cursor);
            layout.entries.push(LayoutEntry {
                path: root.clone(),
                offset: cursor,
                size: self.config.pointer_size,
                align: ptr_align.as_usize(),
                kind,
            });
            cursor += self.config.pointer_size;
            align = align.max(ptr_align);
        }

        for member in &def.members {
            let (size, member_align, kind) = match &member.kind {
                MemberKind::Scalar { size, align } => (
                    *size,
                    Alignment::new(*align),
                    EntryKind::Field {
                        name: member.name.clone(),
                    },
                ),
                MemberKind::Object(object) => {
                    let object_layout = self.build(*object, true)?;
                    (
                        object_layout.size,
                        Alignment::new(object_layout.align),
                        EntryKind::Object {
                            name: member.name.clone(),
                            class: *object,
                        },
                    )
                }
            };
            cursor = member_align.align(cursor);
            layout.entries.push(LayoutEntry {
                path: root.clone(),
                offset: cursor,
                size,
                align: member_align.as_usize(),
                kind,
            });
            cursor += size;
            align = align.max(member_align);
        }

        let nv_size = align.align(cursor);
        layout.subobjects[0].size = nv_size;
        layout.size = nv_size;
        layout.align = align.as_usize();
        layout.nv_size = nv_size;
        layout.nv_align = align.as_usize();
        link(&mut layout, self.registry)?;
        Ok(layout)
    }

    fn most_derived(&self, class: ClassId) -> ModelResult<Layout> {
        let non_virtual = self.build(class, false)?;
        let mut layout = (*non_virtual).clone();
        layout.most_derived = true;

        let mut cursor = layout.nv_size;
        let mut align = Alignment::new(layout.nv_align);

        for vbase in layout.virtual_bases.clone() {
            let base_layout = self.build(vbase, false)?;
            let base_align = Alignment::new(base_layout.nv_align);
            cursor = base_align.align(cursor);
            splice(
                &mut layout,
                &SubobjectPath::virtual_root(class, vbase),
                &base_layout,
                cursor,
                true,
            );
            cursor += base_layout.nv_size;
            align = align.max(base_align);
        }

        // A complete object is never empty.
        layout.size = align.align(cursor.max(1));
        layout.align = align.as_usize();
        link(&mut layout, self.registry)?;
        Ok(layout)
    }
}

/// Copy a base-subobject layout into `layout` at `at`, re-rooted under `prefix`.
fn splice(layout: &mut Layout, prefix: &SubobjectPath, base: &Layout, at: usize, is_virtual: bool) {
    layout.entries.push(LayoutEntry {
        path: prefix.clone(),
        offset: at,
        size: base.nv_size,
        align: base.nv_align,
        kind: EntryKind::Base {
            class: base.class,
            is_virtual,
        },
    });

    for entry in &base.entries {
        layout.entries.push(LayoutEntry {
            path: prefix.join(&entry.path),
            offset: at + entry.offset,
            ..entry.clone()
        });
    }

    for (i, sub) in base.subobjects.iter().enumerate() {
        layout.subobjects.push(Subobject {
            path: prefix.join(&sub.path),
            class: sub.class,
            offset: at + sub.offset,
            size: sub.size,
            is_virtual: is_virtual && i == 0,
            bases: Vec::new(),
        });
    }
}

/// Rebuild base edges; virtual edges resolve to the shared node when it is placed.
fn link(layout: &mut Layout, registry: &ClassRegistry) -> ModelResult<()> {
    let index = layout.path_index();
    let root = layout.class;

    for i in 0..layout.subobjects.len() {
        let sub = &layout.subobjects[i];
        let mut bases = Vec::new();
        for base in &registry.get(sub.class)?.bases {
            let path = if base.is_virtual {
                SubobjectPath::virtual_root(root, base.class)
            } else {
                sub.path.child(base.class)
            };
            if let Some(&j) = index.get(&path) {
                bases.push(j);
            }
        }
        layout.subobjects[i].bases = bases;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::ClassBuilder;

    fn build(registry: &ClassRegistry, class: ClassId, most_derived: bool) -> Arc<Layout> {
        LayoutBuilder::new(registry, &Config::default())
            .build(class, most_derived)
            .unwrap()
    }

    #[test]
    fn test_plain_struct_has_no_vptr() {
        let mut registry = ClassRegistry::new();
        let simple = registry
            .define(ClassBuilder::new("Simple").field("is1", 4, 4).method("s").field("is2", 4, 4))
            .unwrap();

        let layout = build(&registry, simple, true);
        assert!(!layout.has_vtable_pointer());
        assert_eq!(layout.size(), 8);
        assert_eq!(layout.member_offset("is2"), Some(4));
    }

    #[test]
    fn test_vptr_follows_base_content() {
        let mut registry = ClassRegistry::new();
        let simple = registry
            .define(ClassBuilder::new("Simple").field("is1", 4, 4).field("is2", 4, 4))
            .unwrap();
        let a = registry
            .define(
                ClassBuilder::new("A")
                    .base(simple)
                    .field("ia1", 4, 4)
                    .virtual_method("f")
                    .field("ia2", 4, 4),
            )
            .unwrap();

        let layout = build(&registry, a, true);
        let vptrs: Vec<_> = layout.vtable_pointers().collect();
        assert_eq!(vptrs.len(), 1);
        assert_eq!(vptrs[0].offset, 8);
        assert_eq!(vptrs[0].path, SubobjectPath::root(a));
        assert_eq!(layout.member_offset("is1"), Some(0));
        assert_eq!(layout.member_offset("ia1"), Some(16));
        assert_eq!(layout.size(), 24);
    }

    #[test]
    fn test_override_only_reuses_primary_slot() {
        let mut registry = ClassRegistry::new();
        let base = registry.define(ClassBuilder::new("Base").virtual_method("f")).unwrap();
        let derived = registry
            .define(ClassBuilder::new("Derived").base(base).method("f").field("x", 4, 4))
            .unwrap();

        let layout = build(&registry, derived, true);
        assert_eq!(layout.vtable_pointers().count(), 1);
        assert_eq!(layout.vtable_pointers().next().unwrap().path, SubobjectPath::root(derived).child(base));
        assert_eq!(layout.member_offset("x"), Some(8));
    }

    #[test]
    fn test_bases_keep_declaration_order() {
        let mut registry = ClassRegistry::new();
        let plain = registry.define(ClassBuilder::new("Plain").field("p", 4, 4)).unwrap();
        let poly = registry.define(ClassBuilder::new("Poly").virtual_method("f")).unwrap();
        let c = registry.define(ClassBuilder::new("C").base(plain).base(poly).virtual_method("g")).unwrap();

        let layout = build(&registry, c, false);
        let plain_offset = layout.subobjects()[layout.subobjects_of_class(plain)[0]].offset;
        let poly_offset = layout.subobjects()[layout.subobjects_of_class(poly)[0]].offset;
        assert_eq!(plain_offset, 0);
        assert_eq!(poly_offset, 8);

        // C shares the pointer of Poly, its first base with one
        let vptrs: Vec<_> = layout.vtable_pointers().collect();
        assert_eq!(vptrs.len(), 1);
        assert_eq!(vptrs[0].offset, 8);
        assert_eq!(vptrs[0].path, SubobjectPath::root(c).child(poly));
    }

    #[test]
    fn test_base_layout_leaves_virtual_bases_symbolic() {
        let mut registry = ClassRegistry::new();
        let v = registry.define(ClassBuilder::new("V").virtual_method("f").field("v", 4, 4)).unwrap();
        let b = registry.define(ClassBuilder::new("B").virtual_base(v).field("b", 4, 4)).unwrap();

        let base = build(&registry, b, false);
        assert_eq!(base.virtual_bases(), &[v]);
        assert_eq!(base.virtual_base_offset(v), None);
        assert_eq!(base.size(), 16);
        assert!(!base.has_vtable_pointer());

        let vbptr = base.virtual_base_pointers().next().unwrap();
        assert_eq!((vbptr.offset, vbptr.virtual_base_pointer_target()), (0, Some(v)));
        assert_eq!(base.virtual_base_pointer_value(vbptr), None);
        assert_eq!(base.member_offset("b"), Some(8));

        let full = build(&registry, b, true);
        assert_eq!(full.virtual_base_offset(v), Some(16));
        assert_eq!(full.size(), 32);
        assert!(full.reaches(0, full.subobjects_of_class(v)[0]));

        let vbptr = full.virtual_base_pointers().next().unwrap();
        assert_eq!(full.virtual_base_pointer_value(vbptr), Some(16));
    }

    #[test]
    fn test_vptr_precedes_virtual_base_pointers() {
        let mut registry = ClassRegistry::new();
        let v = registry.define(ClassBuilder::new("V").virtual_method("f")).unwrap();
        let w = registry.define(ClassBuilder::new("W").field("w", 4, 4)).unwrap();
        let x = registry
            .define(
                ClassBuilder::new("X")
                    .virtual_base(v)
                    .virtual_base(w)
                    .method("f")
                    .field("x", 4, 4),
            )
            .unwrap();

        let layout = build(&registry, x, true);
        let slots: Vec<(usize, EntryKind)> = layout
            .entries()
            .iter()
            .filter(|e| e.path.is_root() && e.name().is_none() && e.is_leaf())
            .map(|e| (e.offset, e.kind.clone()))
            .collect();
        assert_eq!(
            slots,
            vec![
                (0, EntryKind::VtablePointer),
                (8, EntryKind::VirtualBasePointer { base: v }),
                (16, EntryKind::VirtualBasePointer { base: w }),
            ]
        );
        assert_eq!(layout.member_offset("x"), Some(24));
        assert_eq!(layout.virtual_base_offset(v), Some(32));
        assert_eq!(layout.virtual_base_offset(w), Some(40));
        assert_eq!(layout.size(), 48);
    }

    #[test]
    fn test_empty_class_occupies_a_byte() {
        let mut registry = ClassRegistry::new();
        let empty = registry.define(ClassBuilder::new("Empty")).unwrap();
        let holder = registry.define(ClassBuilder::new("Holder").base(empty).field("x", 4, 4)).unwrap();

        assert_eq!(build(&registry, empty, true).size(), 1);
        assert_eq!(build(&registry, holder, true).member_offset("x"), Some(0));
    }
}
