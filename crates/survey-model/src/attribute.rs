//! Attribute definitions and the attribute→storage type mapping.
//!
//! Attribute type codes are part of every deployed protocol document and of
//! every survey database created from one; they must never be renumbered.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{AttributeName, ModelError};

/// Declared type of an attribute, carried on the wire as a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeType {
    /// Auto-assigned identifier (code 0).
    Id,
    Int16,
    Int32,
    Int64,
    Decimal,
    Double,
    Float,
    String,
    Boolean,
    DateTime,
    Blob,
}

impl AttributeType {
    pub const ALL: [AttributeType; 11] = [
        AttributeType::Id,
        AttributeType::Int16,
        AttributeType::Int32,
        AttributeType::Int64,
        AttributeType::Decimal,
        AttributeType::Double,
        AttributeType::Float,
        AttributeType::String,
        AttributeType::Boolean,
        AttributeType::DateTime,
        AttributeType::Blob,
    ];

    /// Wire code as it appears in protocol documents.
    pub fn code(&self) -> u16 {
        match self {
            AttributeType::Id => 0,
            AttributeType::Int16 => 100,
            AttributeType::Int32 => 200,
            AttributeType::Int64 => 300,
            AttributeType::Decimal => 400,
            AttributeType::Double => 500,
            AttributeType::Float => 600,
            AttributeType::String => 700,
            AttributeType::Boolean => 800,
            AttributeType::DateTime => 900,
            AttributeType::Blob => 1000,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|ty| i64::from(ty.code()) == code)
            .ok_or(ModelError::UnknownAttributeType(code))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Id => "id",
            AttributeType::Int16 => "int16",
            AttributeType::Int32 => "int32",
            AttributeType::Int64 => "int64",
            AttributeType::Decimal => "decimal",
            AttributeType::Double => "double",
            AttributeType::Float => "float",
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
            AttributeType::DateTime => "datetime",
            AttributeType::Blob => "blob",
        }
    }

    /// True for the id type and every fixed-width integer.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            AttributeType::Id | AttributeType::Int16 | AttributeType::Int32 | AttributeType::Int64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, AttributeType::Double | AttributeType::Float)
    }

    /// Column type used for this attribute in the survey database.
    pub fn storage_type(&self) -> StorageType {
        match self {
            AttributeType::Id | AttributeType::Int32 => StorageType::Int32,
            AttributeType::Int16 => StorageType::Int16,
            AttributeType::Int64 => StorageType::Int64,
            AttributeType::Decimal => StorageType::Decimal,
            AttributeType::Double => StorageType::Double,
            AttributeType::Float => StorageType::Float,
            AttributeType::String => StorageType::Text,
            AttributeType::Boolean => StorageType::Boolean,
            AttributeType::DateTime => StorageType::Timestamp,
            AttributeType::Blob => StorageType::Binary,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

impl Serialize for AttributeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

/// Column type in a storage schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Int16,
    Int32,
    Int64,
    Decimal,
    Double,
    Float,
    Text,
    Boolean,
    Timestamp,
    Binary,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Int16 => "int16",
            StorageType::Int32 => "int32",
            StorageType::Int64 => "int64",
            StorageType::Decimal => "decimal",
            StorageType::Double => "double",
            StorageType::Float => "float",
            StorageType::Text => "text",
            StorageType::Boolean => "boolean",
            StorageType::Timestamp => "timestamp",
            StorageType::Binary => "binary",
        }
    }

    /// Inclusive value bounds for the integer column types.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self {
            StorageType::Int16 => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
            StorageType::Int32 => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            StorageType::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Largest finite magnitude for the floating column types.
    pub fn float_limit(&self) -> Option<f64> {
        match self {
            StorageType::Float => Some(f64::from(f32::MAX)),
            StorageType::Double => Some(f64::MAX),
            _ => None,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int16" => Ok(StorageType::Int16),
            "int32" => Ok(StorageType::Int32),
            "int64" => Ok(StorageType::Int64),
            "decimal" => Ok(StorageType::Decimal),
            "double" => Ok(StorageType::Double),
            "float" => Ok(StorageType::Float),
            "text" => Ok(StorageType::Text),
            "boolean" => Ok(StorageType::Boolean),
            "timestamp" => Ok(StorageType::Timestamp),
            "binary" => Ok(StorageType::Binary),
            _ => Err(ModelError::UnknownValue {
                kind: "storage type",
                value: s.to_string(),
            }),
        }
    }
}

/// A named, typed value recorded for a feature or the mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: AttributeName,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Attribute {
    pub fn new(name: AttributeName, attribute_type: AttributeType) -> Self {
        Self {
            name,
            attribute_type,
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Find an attribute by name, ignoring ASCII case.
pub fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes
        .iter()
        .find(|attribute| attribute.name.eq_ignore_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for ty in AttributeType::ALL {
            assert_eq!(AttributeType::from_code(i64::from(ty.code())).unwrap(), ty);
        }
        assert!(AttributeType::from_code(150).is_err());
    }

    #[test]
    fn id_maps_to_int32() {
        assert_eq!(AttributeType::Id.storage_type(), StorageType::Int32);
        assert_eq!(AttributeType::Float.storage_type(), StorageType::Float);
        assert_eq!(AttributeType::DateTime.storage_type(), StorageType::Timestamp);
    }

    #[test]
    fn integral_and_floating() {
        assert!(AttributeType::Id.is_integral());
        assert!(AttributeType::Int64.is_integral());
        assert!(!AttributeType::Decimal.is_integral());
        assert!(!AttributeType::Decimal.is_floating());
        assert!(AttributeType::Float.is_floating());
    }

    #[test]
    fn storage_type_parses() {
        assert_eq!("Int16".parse::<StorageType>().unwrap(), StorageType::Int16);
        assert!("varchar".parse::<StorageType>().is_err());
    }
}
