// Thu Oct 15 2026 - Alex

use crate::hierarchy::ClassId;
use crate::layout::SubobjectPath;
use std::collections::{HashMap, HashSet};

/// A node of the sub-object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subobject {
    pub path: SubobjectPath,
    pub class: ClassId,
    pub offset: usize,
    /// Non-virtual size of the class at this position.
    pub size: usize,
    pub is_virtual: bool,
    /// Direct base sub-objects in declaration order. A virtual edge points at
    /// the shared node, so the graph is a DAG rather than a tree.
    pub bases: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Base { class: ClassId, is_virtual: bool },
    VtablePointer,
    /// Holds the offset from this slot to `base` in the most-derived object.
    VirtualBasePointer { base: ClassId },
    Field { name: String },
    Object { name: String, class: ClassId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    /// For a base, the base sub-object itself; otherwise the sub-object that
    /// owns the slot or declares the member.
    pub path: SubobjectPath,
    pub offset: usize,
    pub size: usize,
    pub align: usize,
    pub kind: EntryKind,
}

impl LayoutEntry {
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Leaf entries occupy bytes of their own; base entries only group them.
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, EntryKind::Base { .. })
    }

    pub fn is_vtable_pointer(&self) -> bool {
        matches!(self.kind, EntryKind::VtablePointer)
    }

    pub fn virtual_base_pointer_target(&self) -> Option<ClassId> {
        match self.kind {
            EntryKind::VirtualBasePointer { base } => Some(base),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Field { name } | EntryKind::Object { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub(crate) class: ClassId,
    pub(crate) most_derived: bool,
    pub(crate) entries: Vec<LayoutEntry>,
    pub(crate) subobjects: Vec<Subobject>,
    pub(crate) size: usize,
    pub(crate) align: usize,
    pub(crate) nv_size: usize,
    pub(crate) nv_align: usize,
    pub(crate) virtual_bases: Vec<ClassId>,
}

impl Layout {
    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn is_most_derived(&self) -> bool {
        self.most_derived
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn subobjects(&self) -> &[Subobject] {
        &self.subobjects
    }

    /// Full size for a most-derived layout, non-virtual size otherwise.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alignment(&self) -> usize {
        self.align
    }

    pub fn non_virtual_size(&self) -> usize {
        self.nv_size
    }

    pub fn non_virtual_alignment(&self) -> usize {
        self.nv_align
    }

    /// Virtual bases in allocation order. In a base-subobject layout they are
    /// not placed: their offsets depend on the most-derived type.
    pub fn virtual_bases(&self) -> &[ClassId] {
        &self.virtual_bases
    }

    pub fn root(&self) -> &Subobject {
        &self.subobjects[0]
    }

    pub fn subobject(&self, index: usize) -> &Subobject {
        &self.subobjects[index]
    }

    pub fn find_subobject(&self, path: &SubobjectPath) -> Option<usize> {
        self.subobjects.iter().position(|s| &s.path == path)
    }

    pub fn subobjects_of_class(&self, class: ClassId) -> Vec<usize> {
        self.subobjects
            .iter()
            .enumerate()
            .filter(|(_, s)| s.class == class)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn virtual_base_offset(&self, class: ClassId) -> Option<usize> {
        self.subobjects
            .iter()
            .find(|s| s.is_virtual && s.class == class)
            .map(|s| s.offset)
    }

    pub fn vtable_pointers(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.entries.iter().filter(|e| e.is_vtable_pointer())
    }

    pub fn has_vtable_pointer(&self) -> bool {
        self.vtable_pointers().next().is_some()
    }

    pub fn virtual_base_pointers(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.entries.iter().filter(|e| e.virtual_base_pointer_target().is_some())
    }

    /// Value stored in a virtual-base-pointer slot: the distance from the slot
    /// to its virtual base. Only known once the base has been placed.
    pub fn virtual_base_pointer_value(&self, entry: &LayoutEntry) -> Option<isize> {
        let base = entry.virtual_base_pointer_target()?;
        let offset = self.virtual_base_offset(base)?;
        Some(offset as isize - entry.offset as isize)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.entries.iter().filter(|e| e.is_leaf())
    }

    /// Offset of the first member called `name`, searching the most-derived
    /// class first and then bases in placement order.
    pub fn member_offset(&self, name: &str) -> Option<usize> {
        self.leaves()
            .filter(|e| e.name() == Some(name))
            .min_by_key(|e| e.path.depth())
            .map(|e| e.offset)
    }

    pub fn member_entry(&self, owner: &SubobjectPath, name: &str) -> Option<&LayoutEntry> {
        self.leaves().find(|e| &e.path == owner && e.name() == Some(name))
    }

    /// Sub-objects reachable from `index` through base edges, including itself.
    pub fn reachable_from(&self, index: usize) -> HashSet<usize> {
        let mut seen = HashSet::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            if seen.insert(current) {
                stack.extend(self.subobjects[current].bases.iter().copied());
            }
        }
        seen
    }

    pub fn reaches(&self, from: usize, to: usize) -> bool {
        self.reachable_from(from).contains(&to)
    }

    /// Parent whose non-virtual edge leads to `index`.
    pub fn non_virtual_parent(&self, index: usize) -> Option<usize> {
        let child = &self.subobjects[index];
        if child.is_virtual {
            return None;
        }
        self.subobjects
            .iter()
            .position(|p| p.bases.contains(&index) && p.path.child(child.class) == child.path)
    }

    pub(crate) fn path_index(&self) -> HashMap<SubobjectPath, usize> {
        self.subobjects
            .iter()
            .enumerate()
            .map(|(i, s)| (s.path.clone(), i))
            .collect()
    }
}
