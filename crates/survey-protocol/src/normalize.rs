//! Rewrites deprecated document spellings into the current shape.
//!
//! Each function runs on one raw entity right before it is decoded, so the
//! decoders and the validator only ever see canonical field names and
//! values.

use serde_json::{Map, Value};
use tracing::warn;

use crate::path::FieldPath;

const LOCATION_ALIASES: &[(&str, &str)] =
    &[("adhocTarget", "mapTarget"), ("adhocTouch", "mapTouch")];

/// Canonicalize a raw location method object.
///
/// - `baseline` becomes `deadAhead` when `deadAhead` is absent, and is
///   dropped otherwise.
/// - `adhocTarget` / `adhocTouch` become `mapTarget` / `mapTouch`.
pub(crate) fn location_method(raw: &Map<String, Value>, path: &FieldPath) -> Map<String, Value> {
    let mut map = raw.clone();

    if let Some(baseline) = map.remove("baseline") {
        let has_dead_ahead = map.get("deadAhead").is_some_and(|value| !value.is_null());
        if has_dead_ahead {
            warn!(path = %path, "ignoring deprecated baseline; deadAhead is present");
        } else {
            warn!(path = %path, "reading deprecated baseline as deadAhead");
            map.insert("deadAhead".to_string(), baseline);
        }
    }

    let rewrite = map
        .get("type")
        .and_then(Value::as_str)
        .and_then(|kind| LOCATION_ALIASES.iter().find(|(alias, _)| *alias == kind))
        .copied();
    if let Some((alias, canonical)) = rewrite {
        warn!(path = %path, alias, canonical, "rewriting deprecated location method type");
        map.insert("type".to_string(), Value::String(canonical.to_string()));
    }

    map
}

/// The two generations of symbology an entity may carry for one role.
#[derive(Debug, Default, Clone)]
pub(crate) struct SymbologySources<'a> {
    pub(crate) current: Option<(&'a Value, FieldPath)>,
    pub(crate) legacy: Option<(&'a Value, FieldPath)>,
}

/// Split a `symbology`-style field whose generation is told apart by shape:
/// an object with a `type` tag is a current renderer, anything else is the
/// legacy `{color, size}` pair.
pub(crate) fn symbology_by_shape<'a>(
    value: Option<&'a Value>,
    path: FieldPath,
) -> SymbologySources<'a> {
    match value {
        Some(value) if value.get("type").is_some() => SymbologySources {
            current: Some((value, path)),
            legacy: None,
        },
        Some(value) => SymbologySources {
            current: None,
            legacy: Some((value, path)),
        },
        None => SymbologySources::default(),
    }
}

/// Pair a current field with its deprecated hyphenated twin, e.g.
/// `gps_symbology` with `gps-symbology`.
pub(crate) fn symbology_by_key<'a>(
    object: &'a Map<String, Value>,
    path: &FieldPath,
    current_key: &str,
    legacy_key: &str,
) -> SymbologySources<'a> {
    let present = |key: &str| object.get(key).filter(|value| !value.is_null());
    SymbologySources {
        current: present(current_key).map(|value| (value, path.key(current_key))),
        legacy: present(legacy_key).map(|value| (value, path.key(legacy_key))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn normalize(value: Value) -> Value {
        let map = value.as_object().unwrap().clone();
        Value::Object(location_method(&map, &FieldPath::root()))
    }

    #[test]
    fn baseline_becomes_dead_ahead() {
        let normalized = normalize(json!({"type": "angleDistance", "baseline": 90}));
        assert_eq!(normalized, json!({"type": "angleDistance", "deadAhead": 90}));
    }

    #[test]
    fn baseline_ignored_when_dead_ahead_present() {
        let normalized =
            normalize(json!({"type": "angleDistance", "baseline": 90, "deadAhead": 45}));
        assert_eq!(normalized, json!({"type": "angleDistance", "deadAhead": 45}));
    }

    #[test]
    fn adhoc_aliases_map_to_canonical() {
        assert_eq!(normalize(json!({"type": "adhocTouch"})), json!({"type": "mapTouch"}));
        assert_eq!(normalize(json!({"type": "adhocTarget"})), json!({"type": "mapTarget"}));
        assert_eq!(normalize(json!({"type": "gps"})), json!({"type": "gps"}));
    }

    #[test]
    fn symbology_shape_split() {
        let renderer = json!({"type": "simple", "symbol": {}});
        let sources = symbology_by_shape(Some(&renderer), FieldPath::root());
        assert!(sources.current.is_some() && sources.legacy.is_none());

        let legacy = json!({"color": "#FF0000", "size": 12});
        let sources = symbology_by_shape(Some(&legacy), FieldPath::root());
        assert!(sources.current.is_none() && sources.legacy.is_some());
    }
}
