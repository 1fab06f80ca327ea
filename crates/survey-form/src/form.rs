//! Form derivation: a dialog, its attributes and a live record become an
//! ordered description of typed controls with values and input ranges.
//!
//! Compilation never fails. The dialog/attribute pairing was checked when
//! the protocol was decoded, so anything still inconsistent here (a record
//! without the expected column, a value of the wrong type) shows up as "no
//! value" rather than an error.

use serde::Serialize;
use survey_model::{
    Attribute, Autocorrection, BindKind, Binding, Capitalization, Dialog, DialogElement,
    DialogSection, ElementKind, KeyboardType, PickerBinding, PickerElement, StorageType,
    attribute_column, find_attribute,
};
use tracing::{debug, trace};

use crate::error::FormError;
use crate::range::{
    DecimalRange, IntegerRange, decimal_range, fallback_storage_type, integer_range,
};
use crate::record::Record;
use crate::value::FieldValue;

/// Shown beside a label whose bound attribute has no value yet.
pub const MISSING_VALUE: &str = "(no value)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDescription {
    pub title: String,
    pub grouped: bool,
    pub sections: Vec<FormSection>,
}

impl FormDescription {
    pub fn elements(&self) -> impl Iterator<Item = &FormElement> {
        self.sections
            .iter()
            .flat_map(|section| section.elements.iter())
    }

    /// The element bound to `attribute`, ignoring ASCII case.
    pub fn element_for(&self, attribute: &str) -> Option<&FormElement> {
        self.elements().find(|element| {
            element
                .binding
                .as_ref()
                .is_some_and(|binding| binding.attribute.eq_ignore_ascii_case(attribute))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub elements: Vec<FormElement>,
}

/// Where an element reads and writes its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormBinding {
    /// Record key, `A_<attribute>`.
    pub key: String,
    pub attribute: String,
    pub bind_kind: BindKind,
    pub storage_type: StorageType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormElement {
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<FormBinding>,
    #[serde(flatten)]
    pub control: Control,
}

/// Control state, one variant per presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Switch {
        value: Option<bool>,
    },
    Decimal {
        value: Option<f64>,
        range: DecimalRange,
        #[serde(skip_serializing_if = "Option::is_none")]
        fraction_digits: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Integer {
        value: Option<i64>,
        range: IntegerRange,
    },
    Text {
        value: String,
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        keyboard: Option<KeyboardType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        capitalization: Option<Capitalization>,
        #[serde(skip_serializing_if = "Option::is_none")]
        autocorrection: Option<Autocorrection>,
    },
    Label {
        text: String,
        missing_value: bool,
    },
    /// `selected: None` is an explicit "nothing chosen".
    Picker {
        items: Vec<String>,
        selected: Option<usize>,
        segmented: bool,
    },
}

impl Control {
    pub fn name(&self) -> &'static str {
        match self {
            Control::Switch { .. } => "switch",
            Control::Decimal { .. } => "decimal",
            Control::Integer { .. } => "integer",
            Control::Text { .. } => "text",
            Control::Label { .. } => "label",
            Control::Picker { .. } => "picker",
        }
    }
}

/// User input destined for a bound record key.
#[derive(Debug, Clone, PartialEq)]
pub enum FormInput {
    Bool(bool),
    Number(f64),
    Integer(i64),
    Text(String),
    /// Picker choice by position; `None` clears the selection.
    Selection(Option<usize>),
    Clear,
}

impl FormInput {
    pub fn name(&self) -> &'static str {
        match self {
            FormInput::Bool(_) => "boolean",
            FormInput::Number(_) => "number",
            FormInput::Integer(_) => "integer",
            FormInput::Text(_) => "text",
            FormInput::Selection(_) => "selection",
            FormInput::Clear => "clear",
        }
    }
}

impl FormElement {
    fn display_name(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.key.clone())
            .unwrap_or_else(|| self.kind.to_string())
    }

    /// Convert `input` into the bound attribute's storage type and store it.
    pub fn write<R: Record + ?Sized>(&self, record: &mut R, input: FormInput) -> Result<(), FormError> {
        let Some(binding) = &self.binding else {
            return Err(FormError::Unbound {
                element: self.display_name(),
            });
        };
        let storage_type = binding.storage_type;

        let value = match (&self.control, input) {
            (_, FormInput::Clear) => None,
            (Control::Switch { .. }, FormInput::Bool(flag)) => Some(FieldValue::Bool(flag)),
            (Control::Decimal { range, .. }, FormInput::Number(number)) => {
                Some(store_decimal(number, *range, storage_type)?)
            }
            (Control::Decimal { range, .. }, FormInput::Integer(integer)) => {
                Some(store_decimal(integer as f64, *range, storage_type)?)
            }
            (Control::Integer { range, .. }, FormInput::Integer(integer)) => {
                if !range.contains(integer) {
                    return Err(FormError::OutOfRange {
                        value: integer.to_string(),
                        min: range.min.to_string(),
                        max: range.max.to_string(),
                    });
                }
                Some(store_integer(integer, storage_type)?)
            }
            (Control::Text { .. }, FormInput::Text(text)) => Some(FieldValue::Text(text)),
            (Control::Picker { items, .. }, FormInput::Selection(selection)) => match selection {
                None => None,
                Some(index) => {
                    let Some(item) = items.get(index) else {
                        return Err(FormError::NoSuchItem {
                            index,
                            count: items.len(),
                        });
                    };
                    Some(match binding.bind_kind {
                        BindKind::Item => FieldValue::Text(item.clone()),
                        _ => store_integer(index_as_i64(index), storage_type)?,
                    })
                }
            },
            (control, input) => {
                return Err(FormError::InputMismatch {
                    control: control.name(),
                    input: input.name(),
                });
            }
        };

        trace!(key = %binding.key, cleared = value.is_none(), "form write-back");
        record.set(&binding.key, value);
        Ok(())
    }
}

fn store_decimal(value: f64, range: DecimalRange, storage_type: StorageType) -> Result<FieldValue, FormError> {
    if !range.contains(value) {
        return Err(FormError::OutOfRange {
            value: value.to_string(),
            min: range.min.to_string(),
            max: range.max.to_string(),
        });
    }
    FieldValue::from_number(value, storage_type).ok_or(FormError::NotStorable {
        value: value.to_string(),
        storage_type,
    })
}

fn store_integer(value: i64, storage_type: StorageType) -> Result<FieldValue, FormError> {
    FieldValue::from_integer(value, storage_type).ok_or(FormError::NotStorable {
        value: value.to_string(),
        storage_type,
    })
}

fn index_as_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// Derive the form for `dialog`, reading current values from `record`.
pub fn compile_form<R: Record + ?Sized>(
    dialog: &Dialog,
    attributes: &[Attribute],
    record: &R,
) -> FormDescription {
    let sections = dialog
        .sections
        .iter()
        .map(|section| compile_section(section, attributes, record))
        .collect::<Vec<_>>();
    debug!(
        dialog = %dialog.title,
        sections = sections.len(),
        "compiled form"
    );
    FormDescription {
        title: dialog.title.clone(),
        grouped: dialog.grouped,
        sections,
    }
}

fn compile_section<R: Record + ?Sized>(
    section: &DialogSection,
    attributes: &[Attribute],
    record: &R,
) -> FormSection {
    FormSection {
        title: section.title.clone(),
        footer: section.footer.clone(),
        elements: section
            .elements
            .iter()
            .map(|element| compile_element(element, attributes, record))
            .collect(),
    }
}

/// Resolve the record key and column type for an element's binding. An
/// attribute missing from `attributes` falls back to the element kind.
pub(crate) fn form_binding(
    kind: ElementKind,
    binding: &Binding,
    attributes: &[Attribute],
) -> FormBinding {
    match find_attribute(attributes, &binding.attribute) {
        Some(attribute) => FormBinding {
            key: attribute_column(attribute.name.as_str()),
            attribute: attribute.name.as_str().to_string(),
            bind_kind: binding.kind,
            storage_type: attribute.attribute_type.storage_type(),
        },
        None => {
            debug!(attribute = %binding.attribute, "bound attribute not declared; using element default");
            let storage_type = match binding.kind {
                BindKind::Item | BindKind::Text => StorageType::Text,
                _ => fallback_storage_type(kind),
            };
            FormBinding {
                key: attribute_column(&binding.attribute),
                attribute: binding.attribute.clone(),
                bind_kind: binding.kind,
                storage_type,
            }
        }
    }
}

fn compile_element<R: Record + ?Sized>(
    element: &DialogElement,
    attributes: &[Attribute],
    record: &R,
) -> FormElement {
    let kind = element.kind();
    let binding = element
        .binding()
        .map(|binding| form_binding(kind, &binding, attributes));
    let current = binding.as_ref().and_then(|binding| record.get(&binding.key));
    let storage_type = binding
        .as_ref()
        .map_or_else(|| fallback_storage_type(kind), |binding| binding.storage_type);
    let title = element.title().map(str::to_string);

    let control = match element {
        DialogElement::Switch(_) => Control::Switch {
            value: current.and_then(FieldValue::as_bool),
        },
        DialogElement::Decimal(e) => Control::Decimal {
            value: current.and_then(FieldValue::as_f64),
            range: decimal_range(e.minimum, e.maximum, storage_type),
            fraction_digits: e.fraction_digits,
            placeholder: e.placeholder.clone(),
        },
        DialogElement::Integer(e) => Control::Integer {
            value: current.and_then(FieldValue::as_i64),
            range: integer_range(e.minimum, e.maximum, storage_type),
        },
        DialogElement::Entry(e) | DialogElement::Multiline(e) => Control::Text {
            value: current
                .and_then(FieldValue::as_text)
                .unwrap_or_default()
                .to_string(),
            multiline: kind == ElementKind::Multiline,
            placeholder: e.placeholder.clone(),
            keyboard: e.keyboard,
            capitalization: e.capitalization,
            autocorrection: e.autocorrection,
        },
        DialogElement::Label(_) => label(title.as_deref().unwrap_or_default(), binding.is_some(), current),
        DialogElement::Radio(e) => picker(e, current, false),
        DialogElement::Segmented(e) => picker(e, current, true),
    };

    FormElement {
        kind,
        title,
        key: element.header().key.clone(),
        binding,
        control,
    }
}

fn label(title: &str, bound: bool, current: Option<&FieldValue>) -> Control {
    match (bound, current) {
        (true, Some(value)) => Control::Label {
            text: format!("{title}: {value}"),
            missing_value: false,
        },
        (true, None) => Control::Label {
            text: format!("{title} {MISSING_VALUE}").trim_start().to_string(),
            missing_value: true,
        },
        (false, _) => Control::Label {
            text: title.to_string(),
            missing_value: false,
        },
    }
}

/// Index `-1`, an index past the end, or text not among the items all mean
/// nothing is selected.
pub fn picker_selection(
    element: &PickerElement,
    current: Option<&FieldValue>,
) -> Option<usize> {
    let current = current?;
    match &element.binding {
        PickerBinding::Index(_) => current
            .as_i64()
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < element.items.len()),
        PickerBinding::Item(_) => {
            let text = current.as_text()?;
            element.items.iter().position(|item| item == text)
        }
    }
}

fn picker(element: &PickerElement, current: Option<&FieldValue>, segmented: bool) -> Control {
    Control::Picker {
        items: element.items.clone(),
        selected: picker_selection(element, current),
        segmented,
    }
}
