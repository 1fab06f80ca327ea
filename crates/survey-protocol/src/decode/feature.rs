//! Feature and mission decoding, each followed by the cross-field rules.

use serde_json::Value;
use survey_model::{Attribute, Feature, Label, Mission, SymbologyRole};
use tracing::debug;

use super::attribute::attributes;
use super::dialog::dialog;
use super::location::locations;
use super::totalizer::totalizer;
use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::normalize::{SymbologySources, symbology_by_key, symbology_by_shape};
use crate::path::FieldPath;
use crate::reader::{ObjectReader, as_object};
use crate::symbology::{resolve_label, resolve_sources};
use crate::validate::{self, EntityParts};

const GPS_SYMBOLOGY: (&str, &str) = ("gps_symbology", "gps-symbology");
const ON_SYMBOLOGY: (&str, &str) = ("on_symbology", "on-symbology");
const OFF_SYMBOLOGY: (&str, &str) = ("off_symbology", "off-symbology");

fn declared_attributes(reader: &ObjectReader<'_>) -> Result<Option<Vec<Attribute>>> {
    reader
        .optional_array("attributes")?
        .map(|values| attributes(values, &reader.field_path("attributes")))
        .transpose()
}

pub(super) fn feature(value: &Value, path: FieldPath, validate: bool) -> Result<Feature> {
    let reader = ObjectReader::new(value, path)?;

    let name = reader.required_str("name")?.trim();
    if name.is_empty() {
        return Err(SchemaError::new(
            reader.field_path("name"),
            SchemaErrorKind::invalid("feature name must not be empty"),
        ));
    }

    let declared = declared_attributes(&reader)?;
    let dialog = reader
        .get("dialog")
        .map(|value| dialog(value, reader.field_path("dialog")))
        .transpose()?;
    let location_methods = locations(
        reader.required_array("locations")?,
        &reader.field_path("locations"),
    )?;
    let label = reader
        .get("label")
        .map(|value| label(value, reader.field_path("label")))
        .transpose()?;
    let symbology = resolve_sources(
        SymbologyRole::FeatureMarker,
        &symbology_by_shape(reader.get("symbology"), reader.field_path("symbology")),
    )?;

    if validate {
        validate::entity(
            EntityParts {
                attributes: declared.as_deref(),
                dialog: dialog.as_ref(),
                totalizer: None,
            },
            reader.path(),
        )?;
    }

    let attributes = declared.unwrap_or_default();
    debug!(
        feature = name,
        attributes = attributes.len(),
        locations = location_methods.len(),
        "decoded feature"
    );
    Ok(Feature {
        name: name.to_string(),
        attributes,
        dialog,
        location_methods,
        label,
        allow_off_transect_observations: reader
            .bool_or("allow_off_transect_observations", false)?,
        symbology,
    })
}

fn label(value: &Value, path: FieldPath) -> Result<Label> {
    let map = as_object(value, &path)?;
    let reader = ObjectReader::from_map(map, path.clone());
    let sources = SymbologySources {
        current: reader
            .get("symbol")
            .map(|symbol| (symbol, reader.field_path("symbol"))),
        legacy: (reader.has("color") || reader.has("size")).then(|| (value, path)),
    };
    Ok(Label {
        field: reader.required_str("field")?.to_string(),
        symbol: resolve_label(&sources)?,
    })
}

pub(super) fn mission(value: &Value, path: FieldPath, validate: bool) -> Result<Mission> {
    let map = as_object(value, &path)?;
    let reader = ObjectReader::from_map(map, path.clone());

    let declared = declared_attributes(&reader)?;
    let dialog = reader
        .get("dialog")
        .map(|value| dialog(value, reader.field_path("dialog")))
        .transpose()?;
    let totalizer = reader
        .get("totalizer")
        .map(|value| totalizer(value, reader.field_path("totalizer")))
        .transpose()?;

    let keyed = |role: SymbologyRole, (current, legacy): (&str, &str)| {
        resolve_sources(role, &symbology_by_key(map, &path, current, legacy))
    };
    let gps_symbology = keyed(SymbologyRole::GpsPoints, GPS_SYMBOLOGY)?;
    let on_symbology = keyed(SymbologyRole::OnTransectTrack, ON_SYMBOLOGY)?;
    let off_symbology = keyed(SymbologyRole::OffTransectTrack, OFF_SYMBOLOGY)?;
    let symbology = resolve_sources(
        SymbologyRole::MissionMarker,
        &symbology_by_shape(reader.get("symbology"), reader.field_path("symbology")),
    )?;

    if validate {
        validate::entity(
            EntityParts {
                attributes: declared.as_deref(),
                dialog: dialog.as_ref(),
                totalizer: totalizer.as_ref(),
            },
            &path,
        )?;
    }

    let attributes = declared.unwrap_or_default();
    debug!(attributes = attributes.len(), "decoded mission");
    Ok(Mission {
        attributes,
        dialog,
        edit_at_start_recording: reader.bool_or("edit_at_start_recording", true)?,
        edit_at_start_first_observing: reader.bool_or("edit_at_start_first_observing", false)?,
        edit_at_start_reobserving: reader.bool_or("edit_at_start_reobserving", false)?,
        edit_prior_at_stop_observing: reader.bool_or("edit_prior_at_stop_observing", false)?,
        edit_at_stop_observing: reader.bool_or("edit_at_stop_observing", false)?,
        totalizer,
        symbology,
        gps_symbology,
        on_symbology,
        off_symbology,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use survey_model::{Color, Renderer, Symbol};

    use super::*;
    use crate::symbology::default_renderer;

    #[test]
    fn minimal_feature_defaults() {
        let value = json!({"name": "Birds", "locations": [{"type": "gps"}]});
        let feature = feature(&value, FieldPath::root().key("features").index(0), true).unwrap();
        assert_eq!(feature.name, "Birds");
        assert!(!feature.allow_off_transect_observations);
        assert!(feature.attributes.is_empty());
        assert_eq!(
            feature.symbology,
            default_renderer(SymbologyRole::FeatureMarker)
        );
    }

    #[test]
    fn blank_name_rejected() {
        let value = json!({"name": "  ", "locations": [{"type": "gps"}]});
        let error = feature(&value, FieldPath::root(), true).unwrap_err();
        assert_eq!(error.path.to_string(), "name");
    }

    #[test]
    fn legacy_feature_symbology() {
        let value = json!({
            "name": "Nests",
            "locations": [{"type": "gps"}],
            "symbology": {"color": "#00FF00", "size": 20}
        });
        let feature = feature(&value, FieldPath::root(), true).unwrap();
        let Symbol::Marker(marker) = feature.symbology.default_symbol() else {
            panic!("expected a marker");
        };
        assert_eq!(marker.color, Color::rgb(0, 255, 0));
        assert_eq!(marker.size, 20.0);
    }

    #[test]
    fn label_prefers_symbol_over_legacy() {
        let value = json!({
            "field": "Kind",
            "color": "#FF0000",
            "symbol": {"type": "text", "color": "#0000FF", "size": 9}
        });
        let label = label(&value, FieldPath::root().key("label")).unwrap();
        assert_eq!(label.field, "Kind");
        let Symbol::Text(text) = label.symbol else {
            panic!("expected a text symbol");
        };
        assert_eq!(text.color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn mission_reads_legacy_hyphenated_keys() {
        let value = json!({
            "gps-symbology": {"color": [255, 0, 255], "size": 3},
            "on_symbology": {"type": "simple", "symbol": {"type": "line", "width": 5}}
        });
        let mission = mission(&value, FieldPath::root().key("mission"), true).unwrap();
        assert!(mission.edit_at_start_recording);
        let Symbol::Marker(gps) = mission.gps_symbology.default_symbol() else {
            panic!("expected a marker");
        };
        assert_eq!(gps.color, Color::rgb(255, 0, 255));
        let Renderer::Simple { symbol: Symbol::Line(line) } = &mission.on_symbology else {
            panic!("expected a simple line renderer");
        };
        assert_eq!(line.width, 5.0);
        assert_eq!(
            mission.off_symbology,
            default_renderer(SymbologyRole::OffTransectTrack)
        );
    }

    #[test]
    fn skipped_validation_keeps_unbound_required_attribute() {
        let value = json!({
            "name": "Birds",
            "locations": [{"type": "gps"}],
            "attributes": [{"name": "Notes", "type": 700, "required": true}]
        });
        assert!(feature(&value, FieldPath::root(), true).is_err());
        assert!(feature(&value, FieldPath::root(), false).is_ok());
    }
}
