//! Dialog element decoding: kind dispatch, field exclusivity, bind kinds and
//! numeric range checks.

use serde_json::Value;
use survey_model::{
    BindKind, Binding, COMMON_ELEMENT_FIELDS, DecimalElement, DialogElement, ElementHeader,
    ElementKind, IntegerElement, LabelElement, PickerBinding, PickerElement, SwitchElement,
    TextElement,
};

use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;
use crate::reader::{ObjectReader, as_str, parse_str};

const MAX_FRACTION_DIGITS: i64 = 8;

pub(super) fn element(value: &Value, path: FieldPath) -> Result<DialogElement> {
    let reader = ObjectReader::new(value, path)?;
    let kind: ElementKind = parse_str(reader.required("type")?, &reader.field_path("type"))?;

    let allowed: Vec<&str> = COMMON_ELEMENT_FIELDS
        .iter()
        .chain(kind.optional_fields())
        .copied()
        .collect();
    reader.deny_unknown(&allowed, kind.as_str())?;

    let header = ElementHeader {
        title: reader.optional_string("title")?,
        key: reader.optional_string("key")?,
    };

    match kind {
        ElementKind::Switch => Ok(DialogElement::Switch(SwitchElement {
            header,
            attribute: required_binding(&reader, kind)?.attribute,
            default: reader.optional_bool("boolValue")?,
        })),
        ElementKind::Decimal => decimal(&reader, header).map(DialogElement::Decimal),
        ElementKind::Integer => integer(&reader, header).map(DialogElement::Integer),
        ElementKind::Entry => text(&reader, header, kind).map(DialogElement::Entry),
        ElementKind::Multiline => text(&reader, header, kind).map(DialogElement::Multiline),
        ElementKind::Label => Ok(DialogElement::Label(LabelElement {
            header,
            attribute: binding(&reader, kind)?.map(|binding| binding.attribute),
        })),
        ElementKind::Radio => picker(&reader, header, kind).map(DialogElement::Radio),
        ElementKind::Segmented => picker(&reader, header, kind).map(DialogElement::Segmented),
    }
}

/// Parse `bind` and check its kind against what the element accepts. A
/// missing `bind` is an error unless the kind may be left unbound.
fn binding(reader: &ObjectReader<'_>, kind: ElementKind) -> Result<Option<Binding>> {
    let Some(value) = reader.get("bind") else {
        if kind.requires_binding() {
            return Err(missing_binding(reader, kind));
        }
        return Ok(None);
    };
    let path = reader.field_path("bind");
    let binding: Binding = parse_str(value, &path)?;
    if !kind.bind_kinds().contains(&binding.kind) {
        let expected = kind
            .bind_kinds()
            .iter()
            .map(BindKind::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(SchemaError::new(
            path,
            SchemaErrorKind::BindKindMismatch {
                element: kind.to_string(),
                bind: binding.kind.to_string(),
                expected,
            },
        ));
    }
    Ok(Some(binding))
}

fn required_binding(reader: &ObjectReader<'_>, kind: ElementKind) -> Result<Binding> {
    binding(reader, kind)?.ok_or_else(|| missing_binding(reader, kind))
}

fn missing_binding(reader: &ObjectReader<'_>, kind: ElementKind) -> SchemaError {
    SchemaError::new(
        reader.field_path("bind"),
        SchemaErrorKind::MissingBinding {
            element: kind.to_string(),
        },
    )
}

/// `min < max` when both are set, then `min <= default <= max`.
fn check_bounds<T>(
    reader: &ObjectReader<'_>,
    min: Option<T>,
    max: Option<T>,
    default: Option<T>,
    widen: fn(T) -> f64,
) -> Result<()>
where
    T: PartialOrd + Copy,
{
    if let (Some(min), Some(max)) = (min, max)
        && min >= max
    {
        return Err(SchemaError::new(
            reader.field_path("minimumValue"),
            SchemaErrorKind::MinNotBelowMax {
                min: widen(min),
                max: widen(max),
            },
        ));
    }
    if let Some(value) = default {
        let below = min.is_some_and(|min| value < min);
        let above = max.is_some_and(|max| value > max);
        if below || above {
            return Err(SchemaError::new(
                reader.field_path("numberValue"),
                SchemaErrorKind::DefaultOutOfRange {
                    value: widen(value),
                    min: min.map(widen),
                    max: max.map(widen),
                },
            ));
        }
    }
    Ok(())
}

fn decimal(reader: &ObjectReader<'_>, header: ElementHeader) -> Result<DecimalElement> {
    let attribute = required_binding(reader, ElementKind::Decimal)?.attribute;
    let minimum = reader.optional_f64("minimumValue")?;
    let maximum = reader.optional_f64("maximumValue")?;
    let default = reader.optional_f64("numberValue")?;
    check_bounds(reader, minimum, maximum, default, |value| value)?;

    let fraction_digits = match reader.optional_i64("fractionDigits")? {
        Some(digits) if (0..=MAX_FRACTION_DIGITS).contains(&digits) => u8::try_from(digits).ok(),
        Some(digits) => {
            return Err(SchemaError::new(
                reader.field_path("fractionDigits"),
                SchemaErrorKind::FractionDigitsOutOfRange { digits },
            ));
        }
        None => None,
    };

    Ok(DecimalElement {
        header,
        attribute,
        minimum,
        maximum,
        default,
        fraction_digits,
        placeholder: reader.optional_string("placeholder")?,
    })
}

fn integer(reader: &ObjectReader<'_>, header: ElementHeader) -> Result<IntegerElement> {
    let attribute = required_binding(reader, ElementKind::Integer)?.attribute;
    let minimum = reader.optional_i64("minimumValue")?;
    let maximum = reader.optional_i64("maximumValue")?;
    let default = reader.optional_i64("numberValue")?;
    check_bounds(reader, minimum, maximum, default, |value| value as f64)?;
    Ok(IntegerElement {
        header,
        attribute,
        minimum,
        maximum,
        default,
    })
}

fn text(reader: &ObjectReader<'_>, header: ElementHeader, kind: ElementKind) -> Result<TextElement> {
    Ok(TextElement {
        header,
        attribute: required_binding(reader, kind)?.attribute,
        placeholder: reader.optional_string("placeholder")?,
        keyboard: reader.optional_parse("keyboardType")?,
        capitalization: reader.optional_parse("autocapitalizationType")?,
        autocorrection: reader.optional_parse("autocorrectionType")?,
    })
}

fn picker(
    reader: &ObjectReader<'_>,
    header: ElementHeader,
    kind: ElementKind,
) -> Result<PickerElement> {
    let binding = required_binding(reader, kind)?;
    let binding = match binding.kind {
        BindKind::Item => PickerBinding::Item(binding.attribute),
        _ => PickerBinding::Index(binding.attribute),
    };

    let items_path = reader.field_path("items");
    let items = reader
        .required_array("items")?
        .iter()
        .enumerate()
        .map(|(index, value)| as_str(value, &items_path.index(index)).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    if items.is_empty() {
        return Err(SchemaError::new(items_path, SchemaErrorKind::EmptyList));
    }

    let default_index = match reader.optional_i64("selected")? {
        Some(index) => match usize::try_from(index) {
            Ok(position) if position < items.len() => Some(position),
            _ => {
                return Err(SchemaError::new(
                    reader.field_path("selected"),
                    SchemaErrorKind::DefaultIndexOutOfRange {
                        index,
                        count: items.len(),
                    },
                ));
            }
        },
        None => None,
    };

    Ok(PickerElement {
        header,
        binding,
        items,
        default_index,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> Result<DialogElement> {
        element(&value, FieldPath::root().key("element"))
    }

    #[test]
    fn switch_with_bool_bind_and_no_extras() {
        let decoded = decode(json!({"type": "QBooleanElement", "bind": "boolValue:Seen"})).unwrap();
        assert_eq!(decoded.kind(), ElementKind::Switch);
        assert_eq!(decoded.bound_attribute(), Some("Seen"));
    }

    #[test]
    fn switch_rejects_number_bind() {
        let error =
            decode(json!({"type": "QBooleanElement", "bind": "numberValue:Seen"})).unwrap_err();
        assert_eq!(error.path.to_string(), "element.bind");
        assert!(matches!(error.kind, SchemaErrorKind::BindKindMismatch { .. }));
    }

    #[test]
    fn foreign_field_is_rejected() {
        let error = decode(json!({
            "type": "QBooleanElement",
            "bind": "boolValue:Seen",
            "items": ["a"]
        }))
        .unwrap_err();
        assert_eq!(error.path.to_string(), "element.items");
        assert!(matches!(error.kind, SchemaErrorKind::UnexpectedField { .. }));
    }

    #[test]
    fn missing_bind_only_allowed_on_labels() {
        assert!(decode(json!({"type": "QLabelElement", "title": "Note"})).is_ok());
        let error = decode(json!({"type": "QEntryElement"})).unwrap_err();
        assert!(matches!(error.kind, SchemaErrorKind::MissingBinding { .. }));
        for kind in ["QBooleanElement", "QDecimalElement", "QRadioElement"] {
            let error = decode(json!({"type": kind})).unwrap_err();
            assert_eq!(error.path.to_string(), "element.bind", "{kind}");
            assert!(matches!(error.kind, SchemaErrorKind::MissingBinding { .. }), "{kind}");
        }
    }

    #[test]
    fn decimal_range_checks() {
        let error = decode(json!({
            "type": "QDecimalElement",
            "bind": "numberValue:Depth",
            "minimumValue": 5.0,
            "maximumValue": 5.0
        }))
        .unwrap_err();
        assert!(matches!(error.kind, SchemaErrorKind::MinNotBelowMax { .. }));

        let error = decode(json!({
            "type": "QDecimalElement",
            "bind": "numberValue:Depth",
            "minimumValue": 0.0,
            "numberValue": -1.0
        }))
        .unwrap_err();
        assert_eq!(error.path.to_string(), "element.numberValue");

        let error = decode(json!({
            "type": "QDecimalElement",
            "bind": "numberValue:Depth",
            "fractionDigits": 9
        }))
        .unwrap_err();
        assert_eq!(
            error.kind,
            SchemaErrorKind::FractionDigitsOutOfRange { digits: 9 }
        );
    }

    #[test]
    fn integer_bounds_must_be_integral() {
        let error = decode(json!({
            "type": "QIntegerElement",
            "bind": "numberValue:Count",
            "minimumValue": 0.5
        }))
        .unwrap_err();
        assert_eq!(error.path.to_string(), "element.minimumValue");
    }

    #[test]
    fn picker_items_and_selection() {
        let decoded = decode(json!({
            "type": "QRadioElement",
            "bind": "selectedItem:Kind",
            "items": ["Adult", "Juvenile"],
            "selected": 1
        }))
        .unwrap();
        let DialogElement::Radio(picker) = decoded else {
            panic!("expected radio element");
        };
        assert_eq!(picker.binding, PickerBinding::Item("Kind".to_string()));
        assert_eq!(picker.default_index, Some(1));

        let error = decode(json!({
            "type": "QSegmentedElement",
            "bind": "selected:Kind",
            "items": ["A", "B"],
            "selected": 2
        }))
        .unwrap_err();
        assert_eq!(
            error.kind,
            SchemaErrorKind::DefaultIndexOutOfRange { index: 2, count: 2 }
        );

        let error = decode(json!({"type": "QRadioElement", "bind": "selected:Kind", "items": []}))
            .unwrap_err();
        assert_eq!(error.kind, SchemaErrorKind::EmptyList);
    }

    #[test]
    fn unknown_element_type() {
        let error = decode(json!({"type": "QDateTimeElement"})).unwrap_err();
        assert_eq!(error.path.to_string(), "element.type");
    }
}
