//! Typed, path-aware access to the fields of one JSON object.
//!
//! `null` is treated exactly like an absent field.

use std::str::FromStr;

use serde_json::{Map, Value};
use survey_model::ModelError;

use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn wrong_type(path: FieldPath, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::new(
        path,
        SchemaErrorKind::WrongType {
            expected,
            found: type_name(value),
        },
    )
}

pub(crate) fn as_object<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(path.clone(), "object", value))
}

pub(crate) fn as_array<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| wrong_type(path.clone(), "array", value))
}

pub(crate) fn as_str<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| wrong_type(path.clone(), "string", value))
}

pub(crate) fn as_f64(value: &Value, path: &FieldPath) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| wrong_type(path.clone(), "number", value))
}

/// Integers may be written as `3` or `3.0`, never `3.5`.
pub(crate) fn as_i64(value: &Value, path: &FieldPath) -> Result<i64> {
    if let Some(integer) = value.as_i64() {
        return Ok(integer);
    }
    match value.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 9.0e15 => Ok(float as i64),
        _ => Err(wrong_type(path.clone(), "integer", value)),
    }
}

/// Booleans may also be written as `0` or `1`.
pub(crate) fn as_bool(value: &Value, path: &FieldPath) -> Result<bool> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) if number.as_i64() == Some(0) => Ok(false),
        Value::Number(number) if number.as_i64() == Some(1) => Ok(true),
        _ => Err(wrong_type(path.clone(), "boolean", value)),
    }
}

pub(crate) fn parse_str<T>(value: &Value, path: &FieldPath) -> Result<T>
where
    T: FromStr<Err = ModelError>,
{
    let text = as_str(value, path)?;
    text.parse::<T>()
        .map_err(|error| SchemaError::new(path.clone(), error))
}

pub(crate) struct ObjectReader<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> ObjectReader<'a> {
    pub(crate) fn new(value: &'a Value, path: FieldPath) -> Result<Self> {
        let map = as_object(value, &path)?;
        Ok(Self { map, path })
    }

    pub(crate) fn from_map(map: &'a Map<String, Value>, path: FieldPath) -> Self {
        Self { map, path }
    }

    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn field_path(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn required(&self, key: &str) -> Result<&'a Value> {
        self.get(key)
            .ok_or_else(|| SchemaError::new(self.field_path(key), SchemaErrorKind::MissingField))
    }

    pub(crate) fn required_str(&self, key: &str) -> Result<&'a str> {
        as_str(self.required(key)?, &self.field_path(key))
    }

    pub(crate) fn optional_str(&self, key: &str) -> Result<Option<&'a str>> {
        self.get(key)
            .map(|value| as_str(value, &self.field_path(key)))
            .transpose()
    }

    pub(crate) fn optional_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.optional_str(key)?.map(str::to_string))
    }

    pub(crate) fn optional_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key)
            .map(|value| as_bool(value, &self.field_path(key)))
            .transpose()
    }

    pub(crate) fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.optional_bool(key)?.unwrap_or(default))
    }

    pub(crate) fn required_f64(&self, key: &str) -> Result<f64> {
        as_f64(self.required(key)?, &self.field_path(key))
    }

    pub(crate) fn optional_f64(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|value| as_f64(value, &self.field_path(key)))
            .transpose()
    }

    pub(crate) fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.optional_f64(key)?.unwrap_or(default))
    }

    pub(crate) fn required_i64(&self, key: &str) -> Result<i64> {
        as_i64(self.required(key)?, &self.field_path(key))
    }

    pub(crate) fn optional_i64(&self, key: &str) -> Result<Option<i64>> {
        self.get(key)
            .map(|value| as_i64(value, &self.field_path(key)))
            .transpose()
    }

    pub(crate) fn required_array(&self, key: &str) -> Result<&'a Vec<Value>> {
        as_array(self.required(key)?, &self.field_path(key))
    }

    pub(crate) fn optional_array(&self, key: &str) -> Result<Option<&'a Vec<Value>>> {
        self.get(key)
            .map(|value| as_array(value, &self.field_path(key)))
            .transpose()
    }

    pub(crate) fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr<Err = ModelError>,
    {
        match self.get(key) {
            Some(value) => parse_str(value, &self.field_path(key)),
            None => Ok(default),
        }
    }

    pub(crate) fn optional_parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = ModelError>,
    {
        self.get(key)
            .map(|value| parse_str(value, &self.field_path(key)))
            .transpose()
    }

    /// Reject the first non-null field (in key order) not listed in `allowed`.
    pub(crate) fn deny_unknown(&self, allowed: &[&str], owner: &str) -> Result<()> {
        let unknown = self
            .map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, _)| key)
            .find(|key| !allowed.contains(&key.as_str()));
        match unknown {
            Some(key) => Err(SchemaError::new(
                self.field_path(key),
                SchemaErrorKind::UnexpectedField {
                    owner: owner.to_string(),
                },
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_is_absent() {
        let value = json!({"title": null});
        let reader = ObjectReader::new(&value, FieldPath::root()).unwrap();
        assert!(!reader.has("title"));
        assert_eq!(reader.optional_string("title").unwrap(), None);
    }

    #[test]
    fn integers_reject_fractions() {
        let path = FieldPath::root();
        assert_eq!(as_i64(&json!(3.0), &path).unwrap(), 3);
        assert!(as_i64(&json!(3.5), &path).is_err());
    }

    #[test]
    fn booleans_accept_zero_and_one() {
        let path = FieldPath::root();
        assert!(as_bool(&json!(1), &path).unwrap());
        assert!(!as_bool(&json!(0), &path).unwrap());
        assert!(as_bool(&json!(2), &path).is_err());
    }

    #[test]
    fn unknown_fields_are_reported_with_path() {
        let value = json!({"type": "QBooleanElement", "placeholder": "x"});
        let reader = ObjectReader::new(&value, FieldPath::root().key("element")).unwrap();
        let error = reader
            .deny_unknown(&["type", "boolValue"], "QBooleanElement")
            .unwrap_err();
        assert_eq!(error.path.to_string(), "element.placeholder");
    }

    #[test]
    fn null_unknown_fields_are_absent() {
        let value = json!({"type": "QBooleanElement", "bind": "boolValue:Seen", "items": null});
        let reader = ObjectReader::new(&value, FieldPath::root()).unwrap();
        assert!(
            reader
                .deny_unknown(&["type", "bind", "boolValue"], "QBooleanElement")
                .is_ok()
        );
    }
}
