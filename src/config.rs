// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pointer_size: usize,
    pub pointer_alignment: usize,
    pub int_size: usize,
    pub long_size: usize,
    pub cache_layouts: bool,
    pub validate_layouts: bool,
    pub enable_verbose_output: bool,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pointer_size: 8,
            pointer_alignment: 8,
            int_size: 4,
            long_size: 8,
            cache_layouts: true,
            validate_layouts: true,
            enable_verbose_output: false,
            pretty_json: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// 32-bit targets: 4-byte pointers and longs.
    pub fn ilp32() -> Self {
        Self {
            pointer_size: 4,
            pointer_alignment: 4,
            long_size: 4,
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    pub fn with_pointer_size(mut self, size: usize) -> Self {
        self.pointer_size = size;
        self.pointer_alignment = size;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_layouts = enabled;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.enable_verbose_output = verbose;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.pointer_size == 0 || !self.pointer_size.is_power_of_two() {
            return Err("pointer_size must be a non-zero power of two".to_string());
        }
        if self.pointer_alignment == 0 || !self.pointer_alignment.is_power_of_two() {
            return Err("pointer_alignment must be a non-zero power of two".to_string());
        }
        if self.int_size == 0 || !self.int_size.is_power_of_two() {
            return Err("int_size must be a non-zero power of two".to_string());
        }
        if self.long_size < self.int_size || !self.long_size.is_power_of_two() {
            return Err("long_size must be a power of two no smaller than int_size".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::ilp32().validate().is_ok());
    }

    #[test]
    fn test_rejects_odd_pointer_size() {
        let config = Config::new().with_pointer_size(6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "pointer_size": 4, "pointer_alignment": 4 }"#).unwrap();
        assert_eq!(config.pointer_size, 4);
        assert_eq!(config.int_size, 4);
        assert!(config.cache_layouts);
    }
}
