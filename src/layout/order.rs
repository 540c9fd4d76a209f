// Thu Oct 15 2026 - Alex

use crate::error::{ModelError, ModelResult};
use crate::hierarchy::{ClassId, ClassRegistry};
use crate::layout::{Layout, SubobjectPath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionStep {
    /// The constructor body of the class at this sub-object runs.
    Subobject { path: SubobjectPath, class: ClassId },
    /// An embedded member object is constructed as a complete object.
    Member {
        owner: SubobjectPath,
        name: String,
        class: ClassId,
    },
}

impl ConstructionStep {
    pub fn class(&self) -> ClassId {
        match self {
            Self::Subobject { class, .. } | Self::Member { class, .. } => *class,
        }
    }

    pub fn render(&self, registry: &ClassRegistry) -> String {
        match self {
            Self::Subobject { path, .. } => path.render(registry),
            Self::Member { owner, name, class } => {
                format!("{}.{} ({})", owner.render(registry), name, registry.name_of(*class))
            }
        }
    }
}

/// Virtual bases first, each once, in post-order; then the non-virtual part
/// recursively: bases in declaration order, member objects, own body.
pub fn construction_order(registry: &ClassRegistry, layout: &Layout) -> ModelResult<Vec<ConstructionStep>> {
    if !layout.is_most_derived() {
        return Err(ModelError::InvalidPath(
            "construction order needs a most-derived layout".to_string(),
        ));
    }

    let root = layout.class();
    let mut steps = Vec::new();
    for vbase in registry.virtual_bases_postorder(root)? {
        construct(registry, &SubobjectPath::virtual_root(root, vbase), &mut steps)?;
    }
    construct(registry, &SubobjectPath::root(root), &mut steps)?;
    Ok(steps)
}

pub fn destruction_order(registry: &ClassRegistry, layout: &Layout) -> ModelResult<Vec<ConstructionStep>> {
    let mut steps = construction_order(registry, layout)?;
    steps.reverse();
    Ok(steps)
}

fn construct(registry: &ClassRegistry, path: &SubobjectPath, steps: &mut Vec<ConstructionStep>) -> ModelResult<()> {
    let def = registry.get(path.class())?;
    for base in def.non_virtual_bases() {
        construct(registry, &path.child(base.class), steps)?;
    }
    for member in &def.members {
        if let Some(class) = member.object_class() {
            steps.push(ConstructionStep::Member {
                owner: path.clone(),
                name: member.name.clone(),
                class,
            });
        }
    }
    steps.push(ConstructionStep::Subobject {
        path: path.clone(),
        class: def.id,
    });
    Ok(())
}
