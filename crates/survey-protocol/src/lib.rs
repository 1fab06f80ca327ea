//! Decoding, validation and symbology resolution for survey protocol
//! documents.
//!
//! [`decode_protocol`] is the usual entry point. It returns either a fully
//! checked [`survey_model::ProtocolDocument`] or the first [`SchemaError`]
//! found, with the path of the offending field.

#![deny(unsafe_code)]

mod decode;
pub mod decoder;
pub mod error;
mod normalize;
pub mod path;
mod reader;
pub mod symbology;
mod validate;

pub use crate::decoder::{DecodeOptions, Decoder, decode_protocol, encode_protocol};
pub use crate::error::{BindMismatch, ErrorCategory, Result, SchemaError, SchemaErrorKind};
pub use crate::path::{FieldPath, PathSegment};
pub use crate::symbology::{default_renderer, resolve};
