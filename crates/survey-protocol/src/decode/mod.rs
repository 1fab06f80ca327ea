//! Depth-first decoders, one module per document entity.
//!
//! Each decoder validates its own subtree before returning, so a parent only
//! ever sees fully checked children.

mod attribute;
mod dialog;
mod document;
mod element;
mod feature;
mod location;
mod totalizer;

use serde_json::Value;

pub(crate) use document::document;

use crate::error::Result;
use crate::path::FieldPath;

/// Decode every entry of a JSON array, tagging each with its index.
fn each<T>(
    values: &[Value],
    path: &FieldPath,
    mut decode: impl FnMut(&Value, FieldPath) -> Result<T>,
) -> Result<Vec<T>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| decode(value, path.index(index)))
        .collect()
}
