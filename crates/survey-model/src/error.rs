use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid attribute name '{name}': {reason}")]
    InvalidAttributeName { name: String, reason: &'static str },
    #[error("unknown attribute type code {0}")]
    UnknownAttributeType(i64),
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    #[error("invalid bind '{0}': expected '<bindKind>:<attributeName>'")]
    InvalidBind(String),
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
