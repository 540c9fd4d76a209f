// Fri Oct 16 2026 - Alex

pub mod json;
pub mod report;

pub use json::JsonSerializer;
pub use report::ReportGenerator;

use crate::dispatch::{CallTarget, Dispatch};
use crate::error::ModelResult;
use crate::hierarchy::{ClassId, ClassRegistry};
use crate::layout::{EntryKind, Layout, LayoutEntry};
use crate::model::ObjectModel;
use crate::vtable::{VtableSlot, VtableSpec};
use serde::{Deserialize, Serialize};

/// Everything the CLI exports, keyed by class name rather than id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelOutput {
    pub version: String,
    pub pointer_size: usize,
    pub classes: Vec<ClassOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<CallOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassOutput {
    pub name: String,
    pub size: usize,
    pub align: usize,
    pub non_virtual_size: usize,
    pub primary_base: Option<String>,
    pub virtual_bases: Vec<String>,
    pub entries: Vec<EntryOutput>,
    pub vtables: Vec<VtableOutput>,
    pub construction_order: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryOutput {
    pub path: String,
    pub offset: usize,
    pub size: usize,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Distance to the virtual base, for a virtual-base pointer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<isize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VtableOutput {
    pub owner: String,
    pub vptr_offset: usize,
    pub offset_to_top: isize,
    pub chain: Vec<String>,
    pub slots: Vec<SlotOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotOutput {
    pub index: usize,
    pub method: String,
    pub introduced_by: String,
    pub implementor: String,
    pub adjustment: isize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_virtual_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_base_pointer: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOutput {
    pub call: String,
    pub target: String,
    pub this_adjustment: isize,
    pub dispatch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vptr_offset: Option<isize>,
}

impl ModelOutput {
    pub fn new(model: &ObjectModel) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            pointer_size: model.config().pointer_size,
            classes: Vec::new(),
            calls: Vec::new(),
        }
    }
}

impl ClassOutput {
    pub fn collect(model: &ObjectModel, class: ClassId) -> ModelResult<Self> {
        let registry = model.registry();
        let layout = model.layout_of(class, true)?;
        let vtables = model.vtables_of(class)?;
        let order = model.construction_order(class)?;

        Ok(Self {
            name: registry.name_of(class),
            size: layout.size(),
            align: layout.alignment(),
            non_virtual_size: layout.non_virtual_size(),
            primary_base: registry.primary_base(class)?.map(|b| registry.name_of(b)),
            virtual_bases: layout.virtual_bases().iter().map(|&v| registry.name_of(v)).collect(),
            entries: entries(registry, &layout),
            vtables: vtables.iter().map(|v| VtableOutput::from_spec(registry, v)).collect(),
            construction_order: order.iter().map(|s| s.render(registry)).collect(),
        })
    }
}

fn entries(registry: &ClassRegistry, layout: &Layout) -> Vec<EntryOutput> {
    layout
        .entries()
        .iter()
        .map(|e| EntryOutput::from_entry(registry, layout, e))
        .collect()
}

impl EntryOutput {
    fn from_entry(registry: &ClassRegistry, layout: &Layout, entry: &LayoutEntry) -> Self {
        let (kind, class) = match &entry.kind {
            EntryKind::Base { class, is_virtual: true } => ("virtual_base", Some(*class)),
            EntryKind::Base { class, .. } => ("base", Some(*class)),
            EntryKind::VtablePointer => ("vptr", None),
            EntryKind::VirtualBasePointer { base } => ("vbptr", Some(*base)),
            EntryKind::Field { .. } => ("field", None),
            EntryKind::Object { class, .. } => ("object", Some(*class)),
        };
        Self {
            path: entry.path.render(registry),
            offset: entry.offset,
            size: entry.size,
            kind: kind.to_string(),
            name: entry.name().map(str::to_string),
            class: class.map(|c| registry.name_of(c)),
            value: layout.virtual_base_pointer_value(entry),
        }
    }
}

impl VtableOutput {
    fn from_spec(registry: &ClassRegistry, spec: &VtableSpec) -> Self {
        Self {
            owner: spec.owner.render(registry),
            vptr_offset: spec.vptr_offset,
            offset_to_top: spec.offset_to_top,
            chain: spec.chain_classes().iter().map(|&c| registry.name_of(c)).collect(),
            slots: spec.slots.iter().map(|s| SlotOutput::from_slot(registry, s)).collect(),
        }
    }
}

impl SlotOutput {
    fn from_slot(registry: &ClassRegistry, slot: &VtableSlot) -> Self {
        Self {
            index: slot.index,
            method: slot.method.clone(),
            introduced_by: registry.name_of(slot.introduced_by),
            implementor: registry.name_of(slot.implementor),
            adjustment: slot.adjustment.resolved,
            via_virtual_base: slot.adjustment.virtual_base.map(|v| registry.name_of(v)),
            virtual_base_pointer: slot.adjustment.virtual_base_pointer,
        }
    }
}

impl CallOutput {
    pub fn from_target(registry: &ClassRegistry, call: &str, target: &CallTarget) -> Self {
        let (dispatch, vptr_offset) = match &target.dispatch {
            Dispatch::Direct => ("direct", None),
            Dispatch::Virtual { vptr_offset, .. } => ("virtual", Some(*vptr_offset)),
        };
        Self {
            call: call.to_string(),
            target: format!("{}::{}", registry.name_of(target.target_class), target.method),
            this_adjustment: target.this_adjustment,
            dispatch: dispatch.to_string(),
            slot: target.slot(),
            vptr_offset,
        }
    }
}
