//! Cross-field rules shared by features and the mission.
//!
//! Rules run in a fixed order and stop at the first failing rule. Rules
//! that can fail on several names collect every offender before failing.

use survey_model::{Attribute, Dialog, MissionTotalizer, find_attribute};

use crate::error::{BindMismatch, Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;

/// The parts of a feature or mission the rules look at. `attributes` is
/// `None` when the document omits the list.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntityParts<'a> {
    pub(crate) attributes: Option<&'a [Attribute]>,
    pub(crate) dialog: Option<&'a Dialog>,
    pub(crate) totalizer: Option<&'a MissionTotalizer>,
}

pub(crate) fn entity(parts: EntityParts<'_>, path: &FieldPath) -> Result<()> {
    let attributes = parts.attributes.unwrap_or_default();
    if let Some(declared) = parts.attributes {
        unique_attributes(declared, &path.key("attributes"))?;
    }
    if let Some(totalizer) = parts.totalizer {
        totalizer_fields(totalizer, parts.dialog, &path.key("totalizer"))?;
    }
    let dialog_path = path.key("dialog");
    required_attributes_bound(attributes, parts.dialog, &dialog_path)?;
    if let Some(dialog) = parts.dialog {
        binds_defined(attributes, dialog, &dialog_path)?;
        binds_typed(attributes, dialog, &dialog_path)?;
    }
    Ok(())
}

/// Non-empty, and no two names equal ignoring case.
fn unique_attributes(attributes: &[Attribute], path: &FieldPath) -> Result<()> {
    if attributes.is_empty() {
        return Err(SchemaError::new(path.clone(), SchemaErrorKind::EmptyList));
    }
    for (index, attribute) in attributes.iter().enumerate() {
        if attributes[..index]
            .iter()
            .any(|earlier| earlier.name.eq_ignore_case(attribute.name.as_str()))
        {
            return Err(SchemaError::new(
                path.index(index).key("name"),
                SchemaErrorKind::DuplicateName {
                    name: attribute.name.to_string(),
                },
            ));
        }
    }
    Ok(())
}

/// Totalizer fields must be bound in the dialog, matching case exactly.
fn totalizer_fields(
    totalizer: &MissionTotalizer,
    dialog: Option<&Dialog>,
    path: &FieldPath,
) -> Result<()> {
    let Some(dialog) = dialog else {
        return Err(SchemaError::new(
            path.clone(),
            SchemaErrorKind::TotalizerWithoutDialog,
        ));
    };
    let names: Vec<String> = totalizer
        .fields
        .iter()
        .filter(|field| !dialog.binds(field))
        .cloned()
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(
            path.key("fields"),
            SchemaErrorKind::TotalizerFieldsNotInDialog { names },
        ))
    }
}

fn required_attributes_bound(
    attributes: &[Attribute],
    dialog: Option<&Dialog>,
    path: &FieldPath,
) -> Result<()> {
    let bound = dialog.map(Dialog::bound_attribute_names).unwrap_or_default();
    let names: Vec<String> = attributes
        .iter()
        .filter(|attribute| attribute.required)
        .filter(|attribute| !bound.iter().any(|name| attribute.name.eq_ignore_case(name)))
        .map(|attribute| attribute.name.to_string())
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(
            path.clone(),
            SchemaErrorKind::RequiredAttributesNotInDialog { names },
        ))
    }
}

fn binds_defined(attributes: &[Attribute], dialog: &Dialog, path: &FieldPath) -> Result<()> {
    let mut names: Vec<String> = Vec::new();
    for name in dialog.bound_attribute_names() {
        if find_attribute(attributes, name).is_none() && !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    if names.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(
            path.clone(),
            SchemaErrorKind::UnknownBindAttributes { names },
        ))
    }
}

fn binds_typed(attributes: &[Attribute], dialog: &Dialog, path: &FieldPath) -> Result<()> {
    let mismatches: Vec<BindMismatch> = dialog
        .elements()
        .filter_map(|element| {
            let binding = element.binding()?;
            let attribute = find_attribute(attributes, &binding.attribute)?;
            let kind = element.kind();
            (!kind.accepts(binding.kind, attribute.attribute_type)).then(|| {
                BindMismatch::new(
                    &binding.attribute,
                    attribute.attribute_type,
                    kind,
                    binding.kind,
                )
            })
        })
        .collect();
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(
            path.clone(),
            SchemaErrorKind::BindTypeMismatches { mismatches },
        ))
    }
}
