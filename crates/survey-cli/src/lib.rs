//! Command-line front end for the survey protocol compiler.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;

use survey_protocol::SchemaError;

/// The protocol document was rejected.
pub const EXIT_DOCUMENT: i32 = 1;
/// Anything else: unreadable files, a bad baseline, unknown names.
pub const EXIT_ENVIRONMENT: i32 = 2;

pub fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<SchemaError>().is_some() {
        EXIT_DOCUMENT
    } else {
        EXIT_ENVIRONMENT
    }
}
