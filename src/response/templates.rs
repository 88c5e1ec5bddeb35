//! Embedded response template bank.
//!
//! Templates are stored in a nested map, `register -> key -> template`, and
//! rendered with tera. A custom bank can be loaded from a JSON file to
//! re-skin the tutor without recompiling.

use std::collections::HashMap;

/// Embedded default templates (used when no custom file is provided).
const EMBEDDED_TEMPLATES_JSON: &str = include_str!("templates.json");

/// Handles loading and retrieving response templates.
#[derive(Debug, Clone)]
pub struct TemplateBank {
    /// The loaded templates, keyed by register then by key.
    templates: HashMap<String, HashMap<String, String>>,
}

impl Default for TemplateBank {
    fn default() -> Self {
        let templates = serde_json::from_str(EMBEDDED_TEMPLATES_JSON)
            .expect("Error decoding embedded response templates.");
        Self { templates }
    }
}

impl TemplateBank {
    /// Load a template bank from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let templates = serde_json::from_str(&content)?;
        Ok(Self { templates })
    }

    /// Retrieve a template by register and key, if present.
    pub fn get(&self, register: &str, key: &str) -> Option<&str> {
        self.templates
            .get(register)
            .and_then(|section| section.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_bank_has_all_registers() {
        let bank = TemplateBank::default();
        for register in ["novice", "intermediate", "advanced", "expert"] {
            assert!(bank.get(register, "answer").is_some(), "{register}");
            assert!(bank.get(register, "fallback").is_some(), "{register}");
            assert!(bank.get(register, "probe").is_some(), "{register}");
        }
        assert!(bank.get("shared", "hedge").is_some());
    }

    #[test]
    fn test_unknown_key_is_none() {
        let bank = TemplateBank::default();
        assert!(bank.get("novice", "missing").is_none());
        assert!(bank.get("missing", "answer").is_none());
    }
}
