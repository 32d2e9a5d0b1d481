//! Per-group index overrides.
//!
//! Two-widget button groups are assumed to be laid out "No" first, "Yes"
//! second. Documents that break that convention get an entry here:
//!
//! ```json
//! { "Q12_Diagnosis": { "truthy_index": 0, "falsy_index": 1 } }
//! ```
//!
//! Either key may be omitted, in which case the built-in default applies.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Index mapping for one button group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IndexOverride {
    /// Widget selected for a "yes" answer
    #[serde(default)]
    pub truthy_index: Option<usize>,
    /// Widget selected for a "no" answer
    #[serde(default)]
    pub falsy_index: Option<usize>,
}

impl IndexOverride {
    /// Override both indexes.
    pub fn new(truthy_index: usize, falsy_index: usize) -> Self {
        Self {
            truthy_index: Some(truthy_index),
            falsy_index: Some(falsy_index),
        }
    }
}

/// Override entries keyed by logical field name.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: IndexMap<String, IndexOverride>,
}

impl OverrideTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a JSON file; a missing file yields an empty table.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No override table at {}", path.display());
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&text)?;
        log::info!("Loaded {} button overrides from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a table from JSON text.
    ///
    /// Entries that are not `{truthy_index, falsy_index}` objects with
    /// non-negative integers are skipped with a warning.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(raw) = root else {
            return Err(Error::InvalidOverrides(
                "top-level JSON value must be an object".to_string(),
            ));
        };

        let mut entries = IndexMap::with_capacity(raw.len());
        for (name, value) in raw {
            match serde_json::from_value::<IndexOverride>(value) {
                Ok(entry) => {
                    entries.insert(name, entry);
                },
                Err(e) => log::warn!("Ignoring override for '{}': {}", name, e),
            }
        }
        Ok(Self { entries })
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: IndexOverride) {
        self.entries.insert(name.into(), entry);
    }

    /// Entry for a logical field.
    pub fn get(&self, name: &str) -> Option<&IndexOverride> {
        self.entries.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let table = OverrideTable::from_json_str(
            r#"{
                "swapped": {"truthy_index": 0, "falsy_index": 1},
                "partial": {"truthy_index": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("swapped"), Some(&IndexOverride::new(0, 1)));
        assert_eq!(
            table.get("partial"),
            Some(&IndexOverride {
                truthy_index: Some(2),
                falsy_index: None
            })
        );
        assert!(table.get("absent").is_none());
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let table = OverrideTable::from_json_str(
            r#"{"neg": {"truthy_index": -1}, "str": "yes", "ok": {"falsy_index": 3}}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("ok").and_then(|o| o.falsy_index), Some(3));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            OverrideTable::from_json_str("[]"),
            Err(Error::InvalidOverrides(_))
        ));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let table = OverrideTable::from_file("no/such/button_overrides.json").unwrap();
        assert!(table.is_empty());
    }
}
