use serde_json::Value;
use survey_model::totalizer::DEFAULT_TOTALIZER_FONT_SIZE;
use survey_model::{MissionTotalizer, TotalizerUnits};

use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;
use crate::reader::{ObjectReader, as_str};

pub(super) fn totalizer(value: &Value, path: FieldPath) -> Result<MissionTotalizer> {
    let reader = ObjectReader::new(value, path)?;

    let fields_path = reader.field_path("fields");
    let fields = super::each(reader.required_array("fields")?, &fields_path, |value, path| {
        as_str(value, &path).map(str::to_string)
    })?;
    if fields.is_empty() {
        return Err(SchemaError::new(fields_path, SchemaErrorKind::EmptyList));
    }

    let font_size = reader.f64_or("fontsize", DEFAULT_TOTALIZER_FONT_SIZE)?;
    if font_size.is_nan() || font_size <= 0.0 {
        return Err(SchemaError::new(
            reader.field_path("fontsize"),
            SchemaErrorKind::NotPositive { value: font_size },
        ));
    }

    Ok(MissionTotalizer {
        fields,
        font_size,
        include_on: reader.bool_or("includeon", true)?,
        include_off: reader.bool_or("includeoff", false)?,
        include_total: reader.bool_or("includetotal", false)?,
        units: reader.parse_or("units", TotalizerUnits::default())?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let value = json!({"fields": ["Transect"]});
        let totalizer = totalizer(&value, FieldPath::root()).unwrap();
        assert_eq!(totalizer, MissionTotalizer::new(vec!["Transect".to_string()]));
    }

    #[test]
    fn fields_required_and_non_empty() {
        let error = totalizer(&json!({}), FieldPath::root().key("totalizer")).unwrap_err();
        assert_eq!(error.kind, SchemaErrorKind::MissingField);
        let error = totalizer(&json!({"fields": []}), FieldPath::root().key("totalizer"))
            .unwrap_err();
        assert_eq!(error.path.to_string(), "totalizer.fields");
    }

    #[test]
    fn units_parse() {
        let value = json!({"fields": ["T"], "units": "minutes", "includetotal": true});
        let totalizer = totalizer(&value, FieldPath::root()).unwrap();
        assert_eq!(totalizer.units, TotalizerUnits::Minutes);
        assert!(totalizer.include_total);
    }
}
