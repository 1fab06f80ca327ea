//! Live data records that forms read from and write to.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use survey_model::{Attribute, attribute_column};
use tracing::warn;

use crate::value::FieldValue;

/// A mutable row keyed by storage column name (`A_<attribute>`).
pub trait Record {
    fn get(&self, key: &str) -> Option<&FieldValue>;

    /// Store `value` under `key`; `None` clears it.
    fn set(&mut self, key: &str, value: Option<FieldValue>);

    fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// A record held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MemoryRecord {
    values: BTreeMap<String, FieldValue>,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object keyed by attribute name. Keys that
    /// name no attribute, or values that do not fit the attribute's type, are
    /// dropped with a warning.
    pub fn from_json(object: &Map<String, Value>, attributes: &[Attribute]) -> Self {
        let mut record = Self::new();
        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            let Some(attribute) = survey_model::find_attribute(attributes, key) else {
                warn!(key = %key, "record key names no attribute; dropped");
                continue;
            };
            let storage_type = attribute.attribute_type.storage_type();
            match FieldValue::from_json(value, storage_type) {
                Some(parsed) => {
                    record.set(&attribute_column(attribute.name.as_str()), Some(parsed));
                }
                None => {
                    warn!(key = %key, storage_type = %storage_type, "record value does not fit; dropped");
                }
            }
        }
        record
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Record for MemoryRecord {
    fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Option<FieldValue>) {
        match value {
            Some(value) => {
                self.values.insert(key.to_string(), value);
            }
            None => {
                self.values.remove(key);
            }
        }
    }
}
