// Thu Oct 15 2026 - Alex

use crate::error::{ModelError, ModelResult};
use crate::layout::{Alignment, Layout};

/// Checks that every vtable pointer, field and embedded object is aligned,
/// inside the object, and disjoint from every other one.
pub struct LayoutValidator;

impl LayoutValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, layout: &Layout) -> ModelResult<()> {
        let mut leaves: Vec<_> = layout.leaves().filter(|e| e.size > 0).collect();

        for entry in &leaves {
            if !Alignment::new(entry.align).is_aligned(entry.offset) {
                return Err(ModelError::LayoutViolation(format!(
                    "{:?} at 0x{:x} is not {}-byte aligned",
                    entry.kind, entry.offset, entry.align
                )));
            }
            if entry.end() > layout.size() {
                return Err(ModelError::LayoutViolation(format!(
                    "{:?} ends at 0x{:x}, past object size 0x{:x}",
                    entry.kind,
                    entry.end(),
                    layout.size()
                )));
            }
        }

        leaves.sort_by_key(|e| e.offset);
        for pair in leaves.windows(2) {
            if pair[0].end() > pair[1].offset {
                return Err(ModelError::LayoutViolation(format!(
                    "{:?} at 0x{:x} overlaps {:?} at 0x{:x}",
                    pair[0].kind, pair[0].offset, pair[1].kind, pair[1].offset
                )));
            }
        }

        for sub in layout.subobjects() {
            if sub.offset + sub.size > layout.size() {
                return Err(ModelError::LayoutViolation(format!(
                    "sub-object at 0x{:x} exceeds object size 0x{:x}",
                    sub.offset,
                    layout.size()
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::ClassId;
    use crate::layout::{EntryKind, LayoutEntry, Subobject, SubobjectPath};

    fn layout_with(entries: Vec<LayoutEntry>, size: usize) -> Layout {
        let class = ClassId::new(0);
        Layout {
            class,
            most_derived: true,
            entries,
            subobjects: vec![Subobject {
                path: SubobjectPath::root(class),
                class,
                offset: 0,
                size,
                is_virtual: false,
                bases: Vec::new(),
            }],
            size,
            align: 4,
            nv_size: size,
            nv_align: 4,
            virtual_bases: Vec::new(),
        }
    }

    fn field(name: &str, offset: usize, size: usize) -> LayoutEntry {
        LayoutEntry {
            path: SubobjectPath::root(ClassId::new(0)),
            offset,
            size,
            align: 4,
            kind: EntryKind::Field { name: name.to_string() },
        }
    }

    #[test]
    fn test_accepts_disjoint_fields() {
        let layout = layout_with(vec![field("a", 0, 4), field("b", 4, 4)], 8);
        assert!(LayoutValidator::new().validate(&layout).is_ok());
    }

    #[test]
    fn test_rejects_overlap_and_overflow() {
        let overlapping = layout_with(vec![field("a", 0, 8), field("b", 4, 4)], 8);
        assert!(LayoutValidator::new().validate(&overlapping).is_err());

        let overflowing = layout_with(vec![field("a", 4, 8)], 8);
        assert!(LayoutValidator::new().validate(&overflowing).is_err());
    }
}
