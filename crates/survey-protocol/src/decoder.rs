use serde_json::Value;
use survey_model::ProtocolDocument;

use crate::decode;
use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;

/// Decoding switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// `None` derives the choice from `meta-version`: version 1 documents
    /// skip the cross-field rules. Version 2 documents are always validated,
    /// whatever this says.
    pub skip_validation: Option<bool>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = Some(skip);
        self
    }

    /// Whether the cross-field rules run for a document of `meta_version`.
    pub fn validates(&self, meta_version: u32) -> bool {
        if meta_version >= 2 {
            return true;
        }
        self.skip_validation == Some(false)
    }
}

/// Turns raw protocol documents into validated [`ProtocolDocument`]s.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn decode_slice(&self, bytes: &[u8]) -> Result<ProtocolDocument> {
        let value: Value = serde_json::from_slice(bytes).map_err(syntax_error)?;
        self.decode_value(&value)
    }

    pub fn decode_str(&self, text: &str) -> Result<ProtocolDocument> {
        let value: Value = serde_json::from_str(text).map_err(syntax_error)?;
        self.decode_value(&value)
    }

    pub fn decode_value(&self, value: &Value) -> Result<ProtocolDocument> {
        decode::document(value, &self.options)
    }
}

fn syntax_error(error: serde_json::Error) -> SchemaError {
    SchemaError::new(
        FieldPath::root(),
        SchemaErrorKind::Syntax {
            message: error.to_string(),
        },
    )
}

/// Decode a protocol document from raw bytes with default options.
pub fn decode_protocol(bytes: &[u8]) -> Result<ProtocolDocument> {
    Decoder::default().decode_slice(bytes)
}

/// Encode a document back into its wire shape. Decoding the result yields
/// an equal document.
pub fn encode_protocol(document: &ProtocolDocument) -> serde_json::Result<Value> {
    serde_json::to_value(document)
}
