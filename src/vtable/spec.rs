// Fri Oct 16 2026 - Alex

use crate::hierarchy::{ClassId, ClassRegistry};
use crate::layout::SubobjectPath;
use std::fmt;

/// Receiver pointer correction from the vtable's owner to the implementor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThisAdjustment {
    /// Part known from the static sub-hierarchy alone.
    pub static_delta: isize,
    /// Virtual base whose offset in the most-derived object contributes the
    /// rest.
    pub virtual_base: Option<ClassId>,
    /// Offset, in the most-derived object, of the virtual-base-pointer slot
    /// the thunk reads that offset from.
    pub virtual_base_pointer: Option<usize>,
    /// Total delta for the most-derived type the vtable was built for.
    pub resolved: isize,
}

impl ThisAdjustment {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn fixed(delta: isize) -> Self {
        Self {
            static_delta: delta,
            virtual_base: None,
            virtual_base_pointer: None,
            resolved: delta,
        }
    }

    pub fn via_virtual_base(
        virtual_base: ClassId,
        pointer: Option<usize>,
        static_delta: isize,
        resolved: isize,
    ) -> Self {
        Self {
            static_delta,
            virtual_base: Some(virtual_base),
            virtual_base_pointer: pointer,
            resolved,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.resolved == 0 && self.virtual_base.is_none()
    }

    pub fn needs_thunk(&self) -> bool {
        !self.is_zero()
    }
}

impl fmt::Display for ThisAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", signed_hex(self.resolved))?;
        if let Some(vbase) = self.virtual_base {
            write!(f, " [static {}, via vbase {}", signed_hex(self.static_delta), vbase)?;
            if let Some(pointer) = self.virtual_base_pointer {
                write!(f, " at vbptr 0x{:x}", pointer)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

pub fn signed_hex(value: isize) -> String {
    if value < 0 {
        format!("-0x{:x}", value.unsigned_abs())
    } else {
        format!("+0x{:x}", value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtableSlot {
    pub index: usize,
    pub method: String,
    /// First class in the chain that declared the method.
    pub introduced_by: ClassId,
    /// Final overrider.
    pub implementor: ClassId,
    pub implementor_path: SubobjectPath,
    pub adjustment: ThisAdjustment,
}

impl VtableSlot {
    pub fn is_thunk(&self) -> bool {
        self.adjustment.needs_thunk()
    }

    pub fn is_overridden(&self) -> bool {
        self.introduced_by != self.implementor
    }
}

/// One vtable of a most-derived class: the table its vtable pointer at
/// `vptr_offset` points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtableSpec {
    pub class: ClassId,
    /// Outermost sub-object sharing the vtable pointer.
    pub owner: SubobjectPath,
    pub vptr_offset: usize,
    /// Sub-objects sharing the pointer, base to derived.
    pub chain: Vec<SubobjectPath>,
    pub offset_to_top: isize,
    pub slots: Vec<VtableSlot>,
}

impl VtableSpec {
    pub fn owner_class(&self) -> ClassId {
        self.owner.class()
    }

    pub fn chain_classes(&self) -> Vec<ClassId> {
        self.chain.iter().map(|p| p.class()).collect()
    }

    pub fn is_primary(&self) -> bool {
        self.owner.is_root()
    }

    pub fn shares_pointer_with(&self, path: &SubobjectPath) -> bool {
        self.chain.contains(path)
    }

    pub fn slot(&self, index: usize) -> Option<&VtableSlot> {
        self.slots.get(index)
    }

    pub fn find_slot(&self, method: &str) -> Option<&VtableSlot> {
        self.slots.iter().find(|s| s.method == method)
    }

    pub fn thunk_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_thunk()).count()
    }

    pub fn render(&self, registry: &ClassRegistry) -> String {
        let mut out = format!(
            "vtable for {} in {} @ vptr 0x{:x} (offset-to-top {})\n",
            self.owner.render(registry),
            registry.name_of(self.class),
            self.vptr_offset,
            signed_hex(self.offset_to_top)
        );
        for slot in &self.slots {
            out.push_str(&format!(
                "  [{}] {} -> {}::{}",
                slot.index,
                slot.method,
                registry.name_of(slot.implementor),
                slot.method
            ));
            if slot.is_thunk() {
                out.push_str(&format!(" (thunk {})", slot.adjustment));
            }
            out.push('\n');
        }
        out
    }
}
