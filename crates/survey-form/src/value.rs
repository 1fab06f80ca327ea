//! Typed values held in a data record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::Serialize;
use serde_json::Value;
use survey_model::StorageType;

/// One attribute value, shaped by the attribute's storage type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Blob(Vec<u8>),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Integers, and decimals with no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Decimal(value) if value.fract().is_zero() => value.to_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Decimal(value) => value.to_f64(),
            FieldValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Store an integer in a column of `storage_type`. `None` when the value
    /// does not fit.
    pub fn from_integer(value: i64, storage_type: StorageType) -> Option<Self> {
        if let Some((min, max)) = storage_type.integer_bounds() {
            return (min..=max)
                .contains(&value)
                .then_some(FieldValue::Integer(value));
        }
        match storage_type {
            StorageType::Decimal => Some(FieldValue::Decimal(Decimal::from(value))),
            StorageType::Double | StorageType::Float => Some(FieldValue::Double(value as f64)),
            _ => None,
        }
    }

    /// Store a number in a column of `storage_type`. `None` when the value is
    /// not finite, not integral for an integer column, or out of range.
    pub fn from_number(value: f64, storage_type: StorageType) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if let Some((min, max)) = storage_type.integer_bounds() {
            let in_range = value >= min as f64 && value <= max as f64;
            return (value.fract() == 0.0 && in_range).then(|| FieldValue::Integer(value as i64));
        }
        match storage_type {
            StorageType::Decimal => Decimal::from_f64(value).map(FieldValue::Decimal),
            StorageType::Double | StorageType::Float => {
                let limit = storage_type.float_limit().unwrap_or(f64::MAX);
                (value.abs() <= limit).then_some(FieldValue::Double(value))
            }
            _ => None,
        }
    }

    /// Read a JSON value as a value of `storage_type`.
    pub fn from_json(value: &Value, storage_type: StorageType) -> Option<Self> {
        match (storage_type, value) {
            (StorageType::Boolean, Value::Bool(flag)) => Some(FieldValue::Bool(*flag)),
            (StorageType::Text, Value::String(text)) => Some(FieldValue::Text(text.clone())),
            (StorageType::Timestamp, Value::String(text)) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|time| FieldValue::Timestamp(time.with_timezone(&Utc))),
            (StorageType::Decimal, Value::String(text)) => {
                Decimal::from_str(text).ok().map(FieldValue::Decimal)
            }
            (StorageType::Binary, Value::Array(items)) => items
                .iter()
                .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(FieldValue::Blob),
            (_, Value::Number(number)) => match number.as_i64() {
                Some(integer) => Self::from_integer(integer, storage_type),
                None => number
                    .as_f64()
                    .and_then(|float| Self::from_number(float, storage_type)),
            },
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(flag) => write!(f, "{flag}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Decimal(value) => write!(f, "{value}"),
            FieldValue::Double(value) => write!(f, "{value}"),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Timestamp(time) => f.write_str(&time.to_rfc3339()),
            FieldValue::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn integers_respect_column_width() {
        assert_eq!(
            FieldValue::from_integer(32_767, StorageType::Int16),
            Some(FieldValue::Integer(32_767))
        );
        assert_eq!(FieldValue::from_integer(32_768, StorageType::Int16), None);
        assert_eq!(FieldValue::from_integer(1, StorageType::Text), None);
    }

    #[test]
    fn numbers_into_integer_columns_must_be_whole() {
        assert_eq!(
            FieldValue::from_number(3.0, StorageType::Int32),
            Some(FieldValue::Integer(3))
        );
        assert_eq!(FieldValue::from_number(3.5, StorageType::Int32), None);
        assert_eq!(FieldValue::from_number(f64::NAN, StorageType::Double), None);
        assert_eq!(FieldValue::from_number(1.0e39, StorageType::Float), None);
    }

    #[test]
    fn decimal_columns_hold_exact_values() {
        let value = FieldValue::from_json(&json!("12.50"), StorageType::Decimal).unwrap();
        assert_eq!(value.to_string(), "12.50");
        assert_eq!(value.as_f64(), Some(12.5));
    }

    #[test]
    fn json_values_follow_storage_type() {
        assert_eq!(
            FieldValue::from_json(&json!(true), StorageType::Boolean),
            Some(FieldValue::Bool(true))
        );
        assert_eq!(FieldValue::from_json(&json!("x"), StorageType::Int16), None);
        let time = FieldValue::from_json(&json!("2024-05-14T08:30:00Z"), StorageType::Timestamp)
            .unwrap();
        assert_eq!(time.to_string(), "2024-05-14T08:30:00+00:00");
        assert_eq!(
            FieldValue::from_json(&json!([1, 2]), StorageType::Binary),
            Some(FieldValue::Blob(vec![1, 2]))
        );
    }
}
