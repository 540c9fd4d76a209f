// Fri Oct 16 2026 - Alex

use crate::error::ModelResult;
use serde::Serialize;
use serde_json::{to_string, to_string_pretty};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonSerializer {
    pretty_print: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn serialize<T: Serialize>(&self, value: &T) -> ModelResult<String> {
        let text = if self.pretty_print {
            to_string_pretty(value)?
        } else {
            to_string(value)?
        };
        Ok(text)
    }

    pub fn serialize_to_file<T: Serialize, P: AsRef<Path>>(&self, value: &T, path: P) -> ModelResult<()> {
        let text = self.serialize(value)?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::define_reference_hierarchy;
    use crate::model::ObjectModel;
    use crate::output::{ClassOutput, ModelOutput};

    #[test]
    fn test_compact_json() {
        let mut model = ObjectModel::default();
        let r = define_reference_hierarchy(&mut model).unwrap();
        let mut output = ModelOutput::new(&model);
        output.classes.push(ClassOutput::collect(&model, r.simple).unwrap());

        let text = JsonSerializer::new().with_pretty_print(false).serialize(&output).unwrap();
        assert!(!text.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["classes"][0]["name"], "Simple");
        assert_eq!(value["classes"][0]["size"], 8);
        assert!(value.get("calls").is_none());
    }
}
