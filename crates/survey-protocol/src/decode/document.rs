use chrono::NaiveDate;
use serde_json::Value;
use survey_model::{Feature, PROTOCOL_META_NAME, ProtocolDocument, ProtocolVersion};
use tracing::{info, warn};

use super::feature::{feature, mission};
use crate::DecodeOptions;
use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::path::FieldPath;
use crate::reader::ObjectReader;

const DATE_FORMAT: &str = "%Y-%m-%d";
const SUPPORTED_META_VERSIONS: [i64; 2] = [1, 2];

pub(crate) fn document(value: &Value, options: &DecodeOptions) -> Result<ProtocolDocument> {
    let reader = ObjectReader::new(value, FieldPath::root())?;

    let meta_name = reader.required_str("meta-name")?;
    if meta_name != PROTOCOL_META_NAME {
        return Err(SchemaError::new(
            reader.field_path("meta-name"),
            SchemaErrorKind::UnknownValue {
                kind: "meta-name",
                value: meta_name.to_string(),
            },
        ));
    }

    let meta_version = reader.required_i64("meta-version")?;
    let meta_version = match u32::try_from(meta_version) {
        Ok(version) if SUPPORTED_META_VERSIONS.contains(&meta_version) => version,
        _ => {
            return Err(SchemaError::new(
                reader.field_path("meta-version"),
                SchemaErrorKind::UnsupportedMetaVersion {
                    version: meta_version,
                },
            ));
        }
    };
    let validate = options.validates(meta_version);
    if !validate {
        warn!(meta_version, "skipping cross-field validation");
    }

    let name = reader.required_str("name")?.to_string();
    let version = ProtocolVersion::new(reader.required_f64("version")?);
    let date = reader
        .optional_str("date")?
        .map(|text| {
            NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|error| {
                SchemaError::new(
                    reader.field_path("date"),
                    SchemaErrorKind::invalid(format!("date must be YYYY-MM-DD: {error}")),
                )
            })
        })
        .transpose()?;

    let mission = reader
        .get("mission")
        .map(|value| mission(value, reader.field_path("mission"), validate))
        .transpose()?;

    let features_path = reader.field_path("features");
    let raw_features = reader.required_array("features")?;
    if raw_features.is_empty() {
        return Err(SchemaError::new(features_path, SchemaErrorKind::EmptyList));
    }
    let mut features: Vec<Feature> = Vec::with_capacity(raw_features.len());
    for (index, raw) in raw_features.iter().enumerate() {
        let path = features_path.index(index);
        let decoded = feature(raw, path.clone(), validate)?;
        if features
            .iter()
            .any(|other| other.name.eq_ignore_ascii_case(&decoded.name))
        {
            return Err(SchemaError::new(
                path.key("name"),
                SchemaErrorKind::DuplicateName { name: decoded.name },
            ));
        }
        features.push(decoded);
    }

    let gps_interval = reader.optional_f64("gps_interval")?;
    if let Some(value) = gps_interval
        && (value.is_nan() || value <= 0.0)
    {
        return Err(SchemaError::new(
            reader.field_path("gps_interval"),
            SchemaErrorKind::NotPositive { value },
        ));
    }

    let document = ProtocolDocument {
        meta_name: meta_name.to_string(),
        meta_version,
        name,
        version,
        date,
        description: reader.optional_string("description")?,
        mission,
        features,
        gps_interval,
        csv: reader.get("csv").cloned(),
        observing: reader.optional_string("observing")?,
        not_observing: reader.optional_string("notobserving")?,
        cancel_on_top: reader.bool_or("cancel_on_top", false)?,
        status_message_fontsize: reader.optional_f64("status_message_fontsize")?,
    };
    info!(
        protocol = %document.name,
        version = %document.version,
        features = document.features.len(),
        validated = validate,
        "decoded protocol"
    );
    Ok(document)
}
