use serde_json::Value;
use survey_model::{Dialog, DialogSection};

use super::element::element;
use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;
use crate::reader::ObjectReader;

const ROOT_TYPE: &str = "QRootElement";
const SECTION_TYPE: &str = "QSection";

pub(super) fn dialog(value: &Value, path: FieldPath) -> Result<Dialog> {
    let reader = ObjectReader::new(value, path)?;
    expect_type(&reader, ROOT_TYPE, "dialog type")?;
    let sections = super::each(
        reader.required_array("sections")?,
        &reader.field_path("sections"),
        section,
    )?;
    Ok(Dialog {
        title: reader.required_str("title")?.to_string(),
        grouped: reader.bool_or("grouped", false)?,
        sections,
    })
}

fn section(value: &Value, path: FieldPath) -> Result<DialogSection> {
    let reader = ObjectReader::new(value, path)?;
    expect_type(&reader, SECTION_TYPE, "section type")?;
    let elements_path = reader.field_path("elements");
    let elements = super::each(reader.required_array("elements")?, &elements_path, element)?;

    let mut seen: Vec<&str> = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        let Some(name) = element.bound_attribute() else {
            continue;
        };
        if seen.iter().any(|other| other.eq_ignore_ascii_case(name)) {
            return Err(SchemaError::new(
                elements_path.index(index).key("bind"),
                SchemaErrorKind::DuplicateName {
                    name: name.to_string(),
                },
            ));
        }
        seen.push(name);
    }

    Ok(DialogSection {
        title: reader.optional_string("title")?,
        footer: reader.optional_string("footer")?,
        elements,
    })
}

/// An optional `type` tag that, when present, must name the expected kind.
fn expect_type(reader: &ObjectReader<'_>, expected: &str, kind: &'static str) -> Result<()> {
    match reader.optional_str("type")? {
        Some(found) if found != expected => Err(SchemaError::new(
            reader.field_path("type"),
            SchemaErrorKind::UnknownValue {
                kind,
                value: found.to_string(),
            },
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_sections_in_order() {
        let value = json!({
            "title": "Bird",
            "grouped": true,
            "type": "QRootElement",
            "sections": [
                {"type": "QSection", "title": "Counts", "elements": [
                    {"type": "QIntegerElement", "bind": "numberValue:Adults"},
                    {"type": "QIntegerElement", "bind": "numberValue:Young"}
                ]},
                {"elements": [{"type": "QLabelElement", "title": "Done"}]}
            ]
        });
        let dialog = dialog(&value, FieldPath::root().key("dialog")).unwrap();
        assert!(dialog.grouped);
        assert_eq!(dialog.sections.len(), 2);
        assert_eq!(dialog.bound_attribute_names(), vec!["Adults", "Young"]);
    }

    #[test]
    fn duplicate_binds_in_section_ignore_case() {
        let value = json!({
            "title": "Bird",
            "sections": [{"elements": [
                {"type": "QIntegerElement", "bind": "numberValue:Count"},
                {"type": "QEntryElement", "bind": "textValue:count"}
            ]}]
        });
        let error = dialog(&value, FieldPath::root().key("dialog")).unwrap_err();
        assert_eq!(
            error.path.to_string(),
            "dialog.sections[0].elements[1].bind"
        );
    }

    #[test]
    fn wrong_root_type() {
        let value = json!({"title": "x", "type": "QSection", "sections": []});
        let error = dialog(&value, FieldPath::root()).unwrap_err();
        assert_eq!(error.path.to_string(), "type");
    }
}
