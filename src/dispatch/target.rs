// Fri Oct 16 2026 - Alex

use crate::hierarchy::{ClassId, ClassRegistry};
use crate::layout::SubobjectPath;
use crate::vtable::{signed_hex, ThisAdjustment};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Qualified or non-virtual call; no vtable involved.
    Direct,
    Virtual {
        /// Sub-object whose vtable pointer is loaded.
        vtable_owner: SubobjectPath,
        /// Offset of that vtable pointer from the view pointer.
        vptr_offset: isize,
        slot: usize,
        /// Adjustment the slot's thunk applies after the load.
        thunk: ThisAdjustment,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    pub target_class: ClassId,
    pub method: String,
    /// Delta from the view pointer to the receiver the target expects.
    pub this_adjustment: isize,
    pub dispatch: Dispatch,
}

impl CallTarget {
    pub fn is_virtual(&self) -> bool {
        matches!(self.dispatch, Dispatch::Virtual { .. })
    }

    pub fn slot(&self) -> Option<usize> {
        match self.dispatch {
            Dispatch::Virtual { slot, .. } => Some(slot),
            Dispatch::Direct => None,
        }
    }

    pub fn render(&self, registry: &ClassRegistry) -> String {
        let target = format!("{}::{}", registry.name_of(self.target_class), self.method);
        match &self.dispatch {
            Dispatch::Direct => format!("{} (direct, this {})", target, signed_hex(self.this_adjustment)),
            Dispatch::Virtual {
                vtable_owner,
                vptr_offset,
                slot,
                thunk,
            } => format!(
                "{} (virtual via {} vptr {} slot {}, thunk {}, this {})",
                target,
                vtable_owner.render(registry),
                signed_hex(*vptr_offset),
                slot,
                thunk,
                signed_hex(self.this_adjustment)
            ),
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{} {}", self.target_class, self.method, signed_hex(self.this_adjustment))
    }
}

/// One step from an object to the sub-object a call is made through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Convert to a direct base of the current sub-object.
    Base(ClassId),
    /// Enter an embedded member object of the current sub-object's class.
    Member(String),
}

impl PathStep {
    /// `.name` is a member step, anything else names a base class.
    pub fn parse(text: &str, registry: &ClassRegistry) -> crate::error::ModelResult<Self> {
        match text.strip_prefix('.') {
            Some(member) => Ok(Self::Member(member.to_string())),
            None => Ok(Self::Base(registry.by_name(text)?)),
        }
    }
}
