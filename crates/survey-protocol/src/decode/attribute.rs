use serde_json::Value;
use survey_model::{Attribute, AttributeName, AttributeType};

use crate::error::{Result, SchemaError};
use crate::path::FieldPath;
use crate::reader::ObjectReader;

pub(super) fn attributes(values: &[Value], path: &FieldPath) -> Result<Vec<Attribute>> {
    super::each(values, path, attribute)
}

fn attribute(value: &Value, path: FieldPath) -> Result<Attribute> {
    let reader = ObjectReader::new(value, path)?;
    let name = AttributeName::new(reader.required_str("name")?)
        .map_err(|error| SchemaError::new(reader.field_path("name"), error))?;
    let attribute_type = AttributeType::from_code(reader.required_i64("type")?)
        .map_err(|error| SchemaError::new(reader.field_path("type"), error))?;
    Ok(Attribute::new(name, attribute_type).required(reader.bool_or("required", false)?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::SchemaErrorKind;

    #[test]
    fn decodes_type_codes() {
        let values = vec![
            json!({"name": "Count", "type": 100, "required": true}),
            json!({"name": "Notes", "type": 700}),
        ];
        let decoded = attributes(&values, &FieldPath::root().key("attributes")).unwrap();
        assert_eq!(decoded[0].attribute_type, AttributeType::Int16);
        assert!(decoded[0].required);
        assert_eq!(decoded[1].attribute_type, AttributeType::String);
        assert!(!decoded[1].required);
    }

    #[test]
    fn unknown_type_code_is_structural() {
        let values = vec![json!({"name": "Count", "type": 150})];
        let error = attributes(&values, &FieldPath::root().key("attributes")).unwrap_err();
        assert_eq!(error.path.to_string(), "attributes[0].type");
        assert!(matches!(error.kind, SchemaErrorKind::UnknownValue { .. }));
    }

    #[test]
    fn bad_name_reports_name_path() {
        let values = vec![json!({"name": "9lives", "type": 700})];
        let error = attributes(&values, &FieldPath::root().key("attributes")).unwrap_err();
        assert_eq!(error.path.to_string(), "attributes[0].name");
    }
}
