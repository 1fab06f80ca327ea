//! Seeding a new record with the defaults declared on dialog elements.

use survey_model::{Attribute, BindKind, Dialog, DialogElement};
use tracing::{debug, warn};

use crate::form::form_binding;
use crate::record::Record;
use crate::value::FieldValue;

/// Write each element's declared default into keys the record has not set.
/// Returns the number of keys written.
pub fn initialize_record<R: Record + ?Sized>(
    dialog: &Dialog,
    attributes: &[Attribute],
    record: &mut R,
) -> usize {
    let mut written = 0;
    for element in dialog.elements() {
        let Some(binding) = element.binding() else {
            continue;
        };
        let binding = form_binding(element.kind(), &binding, attributes);
        if record.is_set(&binding.key) {
            continue;
        }
        let Some(value) = default_value(element, binding.bind_kind, binding.storage_type) else {
            continue;
        };
        match value {
            Ok(value) => {
                record.set(&binding.key, Some(value));
                written += 1;
            }
            Err(default) => {
                warn!(key = %binding.key, default = %default, "default does not fit the column; left unset");
            }
        }
    }
    debug!(dialog = %dialog.title, written, "initialized record defaults");
    written
}

/// `None` when the element declares no default; `Err` carries a default
/// that cannot be stored.
fn default_value(
    element: &DialogElement,
    bind_kind: BindKind,
    storage_type: survey_model::StorageType,
) -> Option<Result<FieldValue, String>> {
    match element {
        DialogElement::Switch(e) => e.default.map(|flag| Ok(FieldValue::Bool(flag))),
        DialogElement::Decimal(e) => e.default.map(|value| {
            FieldValue::from_number(value, storage_type).ok_or_else(|| value.to_string())
        }),
        DialogElement::Integer(e) => e.default.map(|value| {
            FieldValue::from_integer(value, storage_type).ok_or_else(|| value.to_string())
        }),
        DialogElement::Radio(e) | DialogElement::Segmented(e) => {
            let index = e.default_index?;
            let item = e.items.get(index)?;
            Some(match bind_kind {
                BindKind::Item => Ok(FieldValue::Text(item.clone())),
                _ => i64::try_from(index)
                    .ok()
                    .and_then(|index| FieldValue::from_integer(index, storage_type))
                    .ok_or_else(|| index.to_string()),
            })
        }
        DialogElement::Entry(_) | DialogElement::Multiline(_) | DialogElement::Label(_) => None,
    }
}
