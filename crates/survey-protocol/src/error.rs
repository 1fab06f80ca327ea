use std::fmt;

use serde::Serialize;
use survey_model::{AttributeType, BindKind, ElementKind, LocationMethodKind, ModelError};

use crate::path::FieldPath;

/// Broad class of a document error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed or missing field, wrong scalar type, unknown enum value.
    Structural,
    /// Names that do not line up between attributes, dialogs and totalizers.
    CrossReference,
    /// Numeric bounds and indexes out of range.
    Range,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::Structural => "structural",
            ErrorCategory::CrossReference => "cross-reference",
            ErrorCategory::Range => "range",
        })
    }
}

/// An element whose bound attribute has the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindMismatch {
    pub attribute: String,
    pub attribute_type: String,
    pub element: String,
    pub bind: String,
}

impl BindMismatch {
    pub fn new(
        attribute: &str,
        attribute_type: AttributeType,
        element: ElementKind,
        bind: BindKind,
    ) -> Self {
        Self {
            attribute: attribute.to_string(),
            attribute_type: attribute_type.to_string(),
            element: element.to_string(),
            bind: bind.to_string(),
        }
    }
}

impl fmt::Display for BindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' of type {} cannot be edited by {} via {}",
            self.attribute, self.attribute_type, self.element, self.bind
        )
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum SchemaErrorKind {
    #[error("invalid JSON: {message}")]
    Syntax { message: String },

    #[error("missing required field")]
    MissingField,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("field is not permitted on {owner}")]
    UnexpectedField { owner: String },

    #[error("{message}")]
    Invalid { message: String },

    #[error("{element} requires a bind")]
    MissingBinding { element: String },

    #[error("{element} cannot bind through {bind}; expected {expected}")]
    BindKindMismatch {
        element: String,
        bind: String,
        expected: String,
    },

    #[error("list must not be empty")]
    EmptyList,

    #[error("unsupported meta-version {version}")]
    UnsupportedMetaVersion { version: i64 },

    #[error("duplicate name '{name}'")]
    DuplicateName { name: String },

    #[error("duplicate location method '{method}'")]
    DuplicateLocationMethod { method: String },

    #[error("totalizer requires a dialog")]
    TotalizerWithoutDialog,

    #[error("totalizer fields not bound in the dialog: {}", .names.join(", "))]
    TotalizerFieldsNotInDialog { names: Vec<String> },

    #[error("required attributes not bound in the dialog: {}", .names.join(", "))]
    RequiredAttributesNotInDialog { names: Vec<String> },

    #[error("dialog binds undefined attributes: {}", .names.join(", "))]
    UnknownBindAttributes { names: Vec<String> },

    #[error("dialog binds attributes of the wrong type: {}", join_mismatches(.mismatches))]
    BindTypeMismatches { mismatches: Vec<BindMismatch> },

    #[error("minimum {min} must be less than maximum {max}")]
    MinNotBelowMax { min: f64, max: f64 },

    #[error("default {value} is outside the bounds {}", describe_bounds(.min, .max))]
    DefaultOutOfRange {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("fraction digits {digits} outside [0, 8]")]
    FractionDigitsOutOfRange { digits: i64 },

    #[error("default index {index} outside [0, {count})")]
    DefaultIndexOutOfRange { index: i64, count: usize },

    #[error("must be greater than zero, found {value}")]
    NotPositive { value: f64 },
}

fn join_mismatches(mismatches: &[BindMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_bounds(min: &Option<f64>, max: &Option<f64>) -> String {
    let low = min.map_or_else(|| "-inf".to_string(), |v| v.to_string());
    let high = max.map_or_else(|| "inf".to_string(), |v| v.to_string());
    format!("[{low}, {high}]")
}

impl SchemaErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SchemaErrorKind::Syntax { .. }
            | SchemaErrorKind::MissingField
            | SchemaErrorKind::WrongType { .. }
            | SchemaErrorKind::UnknownValue { .. }
            | SchemaErrorKind::UnexpectedField { .. }
            | SchemaErrorKind::Invalid { .. }
            | SchemaErrorKind::MissingBinding { .. }
            | SchemaErrorKind::BindKindMismatch { .. }
            | SchemaErrorKind::EmptyList
            | SchemaErrorKind::UnsupportedMetaVersion { .. } => ErrorCategory::Structural,
            SchemaErrorKind::DuplicateName { .. }
            | SchemaErrorKind::DuplicateLocationMethod { .. }
            | SchemaErrorKind::TotalizerWithoutDialog
            | SchemaErrorKind::TotalizerFieldsNotInDialog { .. }
            | SchemaErrorKind::RequiredAttributesNotInDialog { .. }
            | SchemaErrorKind::UnknownBindAttributes { .. }
            | SchemaErrorKind::BindTypeMismatches { .. } => ErrorCategory::CrossReference,
            SchemaErrorKind::MinNotBelowMax { .. }
            | SchemaErrorKind::DefaultOutOfRange { .. }
            | SchemaErrorKind::FractionDigitsOutOfRange { .. }
            | SchemaErrorKind::DefaultIndexOutOfRange { .. }
            | SchemaErrorKind::NotPositive { .. } => ErrorCategory::Range,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SchemaErrorKind::Invalid {
            message: message.into(),
        }
    }

    pub(crate) fn duplicate_location(method: LocationMethodKind) -> Self {
        SchemaErrorKind::DuplicateLocationMethod {
            method: method.to_string(),
        }
    }
}

impl From<ModelError> for SchemaErrorKind {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnknownValue { kind, value } => SchemaErrorKind::UnknownValue { kind, value },
            ModelError::UnknownAttributeType(code) => SchemaErrorKind::UnknownValue {
                kind: "attribute type",
                value: code.to_string(),
            },
            other => SchemaErrorKind::invalid(other.to_string()),
        }
    }
}

/// The single error a failed decode reports: where, and what went wrong.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("{path}: {kind}")]
pub struct SchemaError {
    pub path: FieldPath,
    #[serde(flatten)]
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    pub fn new(path: FieldPath, kind: impl Into<SchemaErrorKind>) -> Self {
        Self {
            path,
            kind: kind.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            SchemaErrorKind::MissingField.category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            SchemaErrorKind::DuplicateName {
                name: "x".to_string()
            }
            .category(),
            ErrorCategory::CrossReference
        );
        assert_eq!(
            SchemaErrorKind::FractionDigitsOutOfRange { digits: 9 }.category(),
            ErrorCategory::Range
        );
    }

    #[test]
    fn display_includes_path() {
        let error = SchemaError::new(
            FieldPath::root().key("features").index(1).key("name"),
            SchemaErrorKind::DuplicateName {
                name: "Cabins".to_string(),
            },
        );
        insta::assert_snapshot!(error.to_string(), @"features[1].name: duplicate name 'Cabins'");
    }

    #[test]
    fn model_errors_convert() {
        let kind: SchemaErrorKind = ModelError::UnknownAttributeType(42).into();
        assert_eq!(
            kind,
            SchemaErrorKind::UnknownValue {
                kind: "attribute type",
                value: "42".to_string()
            }
        );
    }
}
