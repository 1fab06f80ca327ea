use serde_json::Value;
use survey_model::{Direction, DistanceUnits, LocationMethod, LocationMethodKind};

use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::normalize;
use crate::path::FieldPath;
use crate::reader::{ObjectReader, as_object, parse_str};

/// Decode a feature's `locations`: non-empty, at most one method per type.
pub(super) fn locations(values: &[Value], path: &FieldPath) -> Result<Vec<LocationMethod>> {
    if values.is_empty() {
        return Err(SchemaError::new(path.clone(), SchemaErrorKind::EmptyList));
    }
    let mut methods: Vec<LocationMethod> = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let method_path = path.index(index);
        let method = location(value, method_path.clone())?;
        if methods.iter().any(|other| other.kind == method.kind) {
            return Err(SchemaError::new(
                method_path.key("type"),
                SchemaErrorKind::duplicate_location(method.kind),
            ));
        }
        methods.push(method);
    }
    Ok(methods)
}

fn location(value: &Value, path: FieldPath) -> Result<LocationMethod> {
    let normalized = normalize::location_method(as_object(value, &path)?, &path);
    let reader = ObjectReader::from_map(&normalized, path);
    let kind: LocationMethodKind = parse_str(reader.required("type")?, &reader.field_path("type"))?;
    Ok(LocationMethod {
        kind,
        allow: reader.bool_or("allow", true)?,
        is_default: reader.bool_or("default", false)?,
        dead_ahead: reader.f64_or("deadAhead", 0.0)?,
        direction: reader.parse_or("direction", Direction::default())?,
        units: reader.parse_or("units", DistanceUnits::default())?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn applies_defaults_and_aliases() {
        let values = vec![json!({"type": "adhocTouch", "baseline": 180})];
        let methods = locations(&values, &FieldPath::root().key("locations")).unwrap();
        let method = &methods[0];
        assert_eq!(method.kind, LocationMethodKind::MapTouch);
        assert!(method.allow);
        assert!(!method.is_default);
        assert_eq!(method.dead_ahead, 180.0);
        assert_eq!(method.units, DistanceUnits::Meters);
    }

    #[test]
    fn alias_and_canonical_collide() {
        let values = vec![json!({"type": "mapTarget"}), json!({"type": "adhocTarget"})];
        let error = locations(&values, &FieldPath::root().key("locations")).unwrap_err();
        assert_eq!(error.path.to_string(), "locations[1].type");
        assert!(matches!(
            error.kind,
            SchemaErrorKind::DuplicateLocationMethod { .. }
        ));
    }

    #[test]
    fn empty_list_rejected() {
        let error = locations(&[], &FieldPath::root().key("locations")).unwrap_err();
        assert_eq!(error.kind, SchemaErrorKind::EmptyList);
    }

    #[test]
    fn unknown_units() {
        let values = vec![json!({"type": "angleDistance", "units": "furlongs"})];
        let error = locations(&values, &FieldPath::root().key("locations")).unwrap_err();
        assert_eq!(error.path.to_string(), "locations[0].units");
    }
}
