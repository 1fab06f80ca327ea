//! Storage schema compilation for survey protocols.
//!
//! A compiled [`StorageSchema`] is the fixed baseline plus the columns and
//! tables a protocol's attributes and features call for.

#![deny(unsafe_code)]

pub mod baseline;
pub mod compile;
pub mod error;
pub mod hash;
pub mod schema;

pub use crate::baseline::{BASELINE_ENV_VAR, Baseline, BaselineSource};
pub use crate::compile::{CompileOptions, compile, compile_with};
pub use crate::error::StorageError;
pub use crate::hash::fingerprint;
pub use crate::schema::{Column, DeleteRule, Relationship, StorageSchema, Table};
