// Fri Oct 16 2026 - Alex

use crate::dispatch::{CallTarget, Dispatch};
use crate::hierarchy::ClassRegistry;
use crate::layout::{ConstructionStep, EntryKind, Layout};
use crate::output::ClassOutput;
use crate::utils::format_offset;
use crate::vtable::{signed_hex, VtableSpec};
use colored::*;
use itertools::Itertools;
use std::fmt::Write;

/// Text rendering of layouts, vtables and call resolutions. Colors follow
/// the global `colored` override.
pub struct ReportGenerator {
    show_subobjects: bool,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self { show_subobjects: false }
    }

    pub fn with_subobjects(mut self, show: bool) -> Self {
        self.show_subobjects = show;
        self
    }

    /// C++-style record dump: one line per entry, indented by base depth.
    pub fn layout(&self, registry: &ClassRegistry, layout: &Layout) -> String {
        let mut out = String::new();
        let name = registry.name_of(layout.class());
        let _ = writeln!(
            out,
            "{} {}  {}",
            "class".blue(),
            name.bold(),
            format!(
                "(size {}, align {}, nvsize {})",
                layout.size(),
                layout.alignment(),
                layout.non_virtual_size()
            )
            .dimmed()
        );

        let max = layout.size();
        for entry in layout.entries() {
            let depth = entry.path.depth() + usize::from(entry.is_leaf());
            let indent = "  ".repeat(depth);
            let text = match &entry.kind {
                EntryKind::Base { class, is_virtual } => {
                    let label = if *is_virtual { "virtual base" } else { "base" };
                    format!("{} {}", label.cyan(), registry.name_of(*class).bold())
                }
                EntryKind::VtablePointer => format!("{}", "vptr".magenta()),
                EntryKind::VirtualBasePointer { base } => match layout.virtual_base_pointer_value(entry) {
                    Some(value) => format!("{} {} ({})", "vbptr".magenta(), registry.name_of(*base), signed_hex(value)),
                    None => format!("{} {}", "vbptr".magenta(), registry.name_of(*base)),
                },
                EntryKind::Field { name } => format!("{} ({} bytes)", name, entry.size),
                EntryKind::Object { name, class } => format!("{} {}", registry.name_of(*class).yellow(), name),
            };
            let _ = writeln!(out, "  {} {}{}", format_offset(entry.offset, max).dimmed(), indent, text);
        }

        if self.show_subobjects {
            let _ = writeln!(out, "  {}", "sub-objects:".underline());
            for sub in layout.subobjects() {
                let bases = sub
                    .bases
                    .iter()
                    .map(|&b| registry.name_of(layout.subobject(b).class))
                    .join(", ");
                let _ = writeln!(
                    out,
                    "    {} {} -> [{}]",
                    format_offset(sub.offset, max),
                    sub.path.render(registry),
                    bases
                );
            }
        }
        out
    }

    pub fn vtables(&self, registry: &ClassRegistry, vtables: &[VtableSpec]) -> String {
        let mut out = String::new();
        for spec in vtables {
            let chain = spec.chain_classes().iter().map(|&c| registry.name_of(c)).join(" <- ");
            let _ = writeln!(
                out,
                "{} {} @ {}  {}",
                "vtable".blue(),
                spec.owner.render(registry).bold(),
                format_offset(spec.vptr_offset, spec.vptr_offset),
                format!("(offset-to-top {}, chain {})", signed_hex(spec.offset_to_top), chain).dimmed()
            );
            for slot in &spec.slots {
                let target = format!("{}::{}", registry.name_of(slot.implementor), slot.method);
                let target = if slot.is_overridden() {
                    target.green().to_string()
                } else {
                    target
                };
                let mut line = format!("    [{}] {}", slot.index, target);
                if slot.is_thunk() {
                    let _ = write!(line, "  {}", format!("thunk {}", slot.adjustment).yellow());
                }
                let _ = writeln!(out, "{}", line);
            }
        }
        out
    }

    pub fn call(&self, registry: &ClassRegistry, call: &str, target: &CallTarget) -> String {
        let resolved = format!("{}::{}", registry.name_of(target.target_class), target.method);
        match &target.dispatch {
            Dispatch::Direct => format!(
                "{} -> {}  {} this {}",
                call,
                resolved.green().bold(),
                "direct".cyan(),
                signed_hex(target.this_adjustment)
            ),
            Dispatch::Virtual {
                vtable_owner,
                vptr_offset,
                slot,
                thunk,
            } => format!(
                "{} -> {}  {} via {} (vptr {}, slot {}, thunk {}) this {}",
                call,
                resolved.green().bold(),
                "virtual".magenta(),
                vtable_owner.render(registry),
                signed_hex(*vptr_offset),
                slot,
                thunk,
                signed_hex(target.this_adjustment)
            ),
        }
    }

    pub fn construction(&self, registry: &ClassRegistry, steps: &[ConstructionStep]) -> String {
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("  {:>2}. {}", i + 1, step.render(registry)))
            .join("\n")
    }

    pub fn summary(&self, classes: &[ClassOutput]) -> String {
        let width = classes.iter().map(|c| c.name.len()).max().unwrap_or(5).max(5);
        let mut out = format!(
            "{:<width$}  {:>5}  {:>6}  {:>7}  {}\n",
            "class",
            "size",
            "nvsize",
            "vtables",
            "primary base",
            width = width
        )
        .bold()
        .to_string();
        for class in classes {
            let _ = writeln!(
                out,
                "{:<width$}  {:>5}  {:>6}  {:>7}  {}",
                class.name,
                class.size,
                class.non_virtual_size,
                class.vtables.len(),
                class.primary_base.as_deref().unwrap_or("-"),
                width = width
            );
        }
        out
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
