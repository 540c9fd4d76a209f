// Fri Oct 16 2026 - Alex

use crate::error::{ModelError, ModelResult};
use crate::hierarchy::{ClassBuilder, ClassId, DataMember, PrimitiveType};
use crate::model::ObjectModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A hierarchy written by class name. Classes may refer to classes that
/// appear later in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyDescription {
    pub classes: Vec<ClassDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDescription {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<BaseDescription>,
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
    #[serde(default)]
    pub members: Vec<MemberDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseDescription {
    pub class: String,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescription {
    pub name: String,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default, rename = "override")]
    pub is_override: bool,
}

/// Exactly one of `type`, `size` or `class` describes the member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDescription {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl HierarchyDescription {
    pub fn from_json(text: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> ModelResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Declare every named class, then define them in file order.
    pub fn load_into(&self, model: &mut ObjectModel) -> ModelResult<Vec<ClassId>> {
        for class in &self.classes {
            model.declare(&class.name);
        }

        let mut defined = Vec::with_capacity(self.classes.len());
        for class in &self.classes {
            let builder = self.builder_for(class, model)?;
            defined.push(model.define(builder)?);
        }
        Ok(defined)
    }

    fn builder_for(&self, class: &ClassDescription, model: &ObjectModel) -> ModelResult<ClassBuilder> {
        let mut builder = ClassBuilder::new(&class.name);

        for base in &class.bases {
            builder = builder.with_base(model.class_id(&base.class)?, base.is_virtual);
        }
        for method in &class.methods {
            builder = builder.with_method(&method.name, method.is_virtual, method.is_override);
        }
        for member in &class.members {
            builder = builder.member(member.resolve(&class.name, model)?);
        }
        Ok(builder)
    }
}

impl MemberDescription {
    fn resolve(&self, owner: &str, model: &ObjectModel) -> ModelResult<DataMember> {
        match (&self.ty, self.size, &self.class) {
            (Some(ty), None, None) => {
                let primitive = PrimitiveType::parse(ty).ok_or_else(|| {
                    ModelError::Description(format!("{}::{} has unknown type '{}'", owner, self.name, ty))
                })?;
                Ok(DataMember::primitive(&self.name, primitive, model.config()))
            }
            (None, Some(size), None) => Ok(DataMember::scalar(&self.name, size, self.align.unwrap_or(size))),
            (None, None, Some(class)) => Ok(DataMember::object(&self.name, model.class_id(class)?)),
            _ => Err(ModelError::Description(format!(
                "{}::{} needs exactly one of type, size or class",
                owner, self.name
            ))),
        }
    }
}
