//! Symbology decoding and the three-tier fallback per role.
//!
//! A role is drawn with, in order of preference: the current structured
//! renderer, the legacy `{color, size}` pair mapped onto the role's shape,
//! or the role's built-in default.

use serde_json::Value;
use survey_model::{
    Color, LegacySymbology, LineStyle, LineSymbol, MarkerStyle, MarkerSymbol, Renderer, Symbol,
    SymbolShape, SymbologyRole, TextSymbol, UniqueValueInfo,
};
use tracing::warn;

use crate::error::{Result, SchemaError, SchemaErrorKind};
use crate::normalize::SymbologySources;
use crate::path::FieldPath;
use crate::reader::{ObjectReader, as_i64, as_object, wrong_type};

const DEFAULT_MARKER_SIZE: f64 = 12.0;
const DEFAULT_LINE_WIDTH: f64 = 1.0;
const DEFAULT_TEXT_SIZE: f64 = 14.0;

/// Built-in renderer for a role when the document says nothing.
pub fn default_renderer(role: SymbologyRole) -> Renderer {
    let symbol = match role {
        SymbologyRole::GpsPoints => marker(Color::rgb(0, 0, 255), 6.0),
        SymbologyRole::MissionMarker => marker(Color::rgb(0, 255, 0), 12.0),
        SymbologyRole::FeatureMarker => marker(Color::rgb(255, 0, 0), 14.0),
        SymbologyRole::OnTransectTrack => line(Color::rgb(255, 0, 0), 3.0),
        SymbologyRole::OffTransectTrack => line(Color::rgb(128, 128, 128), 1.5),
        SymbologyRole::FeatureLabel => Symbol::Text(TextSymbol {
            color: Color::rgb(255, 255, 255),
            size: DEFAULT_TEXT_SIZE,
        }),
    };
    Renderer::simple(symbol)
}

fn marker(color: Color, size: f64) -> Symbol {
    Symbol::Marker(MarkerSymbol {
        style: MarkerStyle::Circle,
        color,
        size,
    })
}

fn line(color: Color, width: f64) -> Symbol {
    Symbol::Line(LineSymbol {
        style: LineStyle::Solid,
        color,
        width,
    })
}

/// Map a legacy `{color, size}` pair onto the role's shape. Missing halves
/// come from the role default.
pub fn from_legacy(role: SymbologyRole, legacy: &LegacySymbology) -> Renderer {
    let fallback = default_renderer(role);
    let symbol = match fallback.default_symbol() {
        Symbol::Marker(default) => Symbol::Marker(MarkerSymbol {
            style: default.style,
            color: legacy.color.unwrap_or(default.color),
            size: legacy.size.unwrap_or(default.size),
        }),
        Symbol::Line(default) => Symbol::Line(LineSymbol {
            style: default.style,
            color: legacy.color.unwrap_or(default.color),
            width: legacy.size.unwrap_or(default.width),
        }),
        Symbol::Text(default) => Symbol::Text(TextSymbol {
            color: legacy.color.unwrap_or(default.color),
            size: legacy.size.unwrap_or(default.size),
        }),
    };
    Renderer::simple(symbol)
}

/// Pick the renderer for a role. Never fails.
pub fn resolve(
    role: SymbologyRole,
    current: Option<Renderer>,
    legacy: Option<&LegacySymbology>,
) -> Renderer {
    match (current, legacy) {
        (Some(renderer), _) => renderer,
        (None, Some(legacy)) if !legacy.is_empty() => from_legacy(role, legacy),
        _ => default_renderer(role),
    }
}

/// Decode whichever generation of symbology is present and resolve it.
pub(crate) fn resolve_sources(
    role: SymbologyRole,
    sources: &SymbologySources<'_>,
) -> Result<Renderer> {
    let current = sources
        .current
        .as_ref()
        .map(|(value, path)| decode_renderer(value, path, role))
        .transpose()?;
    let legacy = legacy_fallback(role, current.is_some(), sources)?;
    Ok(resolve(role, current, legacy.as_ref()))
}

/// Resolve a feature label's text symbol: `symbol` first, then the label's
/// own `color` and `size`, then the default.
pub(crate) fn resolve_label(sources: &SymbologySources<'_>) -> Result<Symbol> {
    let role = SymbologyRole::FeatureLabel;
    let current = sources
        .current
        .as_ref()
        .map(|(value, path)| role_symbol(value, path, role))
        .transpose()?
        .map(Renderer::simple);
    let legacy = legacy_fallback(role, current.is_some(), sources)?;
    Ok(resolve(role, current, legacy.as_ref())
        .default_symbol()
        .clone())
}

fn legacy_fallback(
    role: SymbologyRole,
    has_current: bool,
    sources: &SymbologySources<'_>,
) -> Result<Option<LegacySymbology>> {
    match &sources.legacy {
        Some((value, path)) if !has_current => {
            warn!(path = %path, role = %role, "using legacy symbology");
            decode_legacy(value, path).map(Some)
        }
        _ => Ok(None),
    }
}

/// `#RRGGBB`, `#RRGGBBAA`, `[r, g, b]` or `[r, g, b, a]`.
pub(crate) fn decode_color(value: &Value, path: &FieldPath) -> Result<Color> {
    match value {
        Value::String(text) => {
            Color::from_hex(text).map_err(|error| SchemaError::new(path.clone(), error))
        }
        Value::Array(items) if items.len() == 3 || items.len() == 4 => {
            let mut channels = [255u8; 4];
            for (index, item) in items.iter().enumerate() {
                let item_path = path.index(index);
                let channel = as_i64(item, &item_path)?;
                channels[index] = u8::try_from(channel).map_err(|_| {
                    SchemaError::new(
                        item_path,
                        SchemaErrorKind::invalid(format!(
                            "color channel {channel} outside [0, 255]"
                        )),
                    )
                })?;
            }
            let [red, green, blue, alpha] = channels;
            Ok(Color::rgba(red, green, blue, alpha))
        }
        Value::Array(items) => Err(SchemaError::new(
            path.clone(),
            SchemaErrorKind::invalid(format!(
                "color arrays need 3 or 4 channels, found {}",
                items.len()
            )),
        )),
        other => Err(wrong_type(path.clone(), "color", other)),
    }
}

fn positive(reader: &ObjectReader<'_>, key: &str, default: f64) -> Result<f64> {
    let value = reader.f64_or(key, default)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(SchemaError::new(
            reader.field_path(key),
            SchemaErrorKind::NotPositive { value },
        ))
    }
}

/// Decode a `{type: marker|line|text, ...}` symbol. `implied_type` fills in
/// a missing `type`.
pub(crate) fn decode_symbol(
    value: &Value,
    path: &FieldPath,
    implied_type: Option<&str>,
) -> Result<Symbol> {
    let reader = ObjectReader::new(value, path.clone())?;
    let kind = match (reader.optional_str("type")?, implied_type) {
        (Some(kind), _) | (None, Some(kind)) => kind,
        (None, None) => reader.required_str("type")?,
    };
    let color = match reader.get("color") {
        Some(value) => decode_color(value, &reader.field_path("color"))?,
        None => Color::rgb(0, 0, 0),
    };
    match kind {
        "marker" => Ok(Symbol::Marker(MarkerSymbol {
            style: reader.parse_or("style", MarkerStyle::default())?,
            color,
            size: positive(&reader, "size", DEFAULT_MARKER_SIZE)?,
        })),
        "line" => Ok(Symbol::Line(LineSymbol {
            style: reader.parse_or("style", LineStyle::default())?,
            color,
            width: positive(&reader, "width", DEFAULT_LINE_WIDTH)?,
        })),
        "text" => Ok(Symbol::Text(TextSymbol {
            color,
            size: positive(&reader, "size", DEFAULT_TEXT_SIZE)?,
        })),
        other => Err(SchemaError::new(
            reader.field_path("type"),
            SchemaErrorKind::UnknownValue {
                kind: "symbol type",
                value: other.to_string(),
            },
        )),
    }
}

fn check_shape(symbol: &Symbol, role: SymbologyRole, path: &FieldPath) -> Result<()> {
    let expected = role.shape();
    if symbol.shape() == expected {
        return Ok(());
    }
    let wanted = match expected {
        SymbolShape::Point => "a marker",
        SymbolShape::Line => "a line",
        SymbolShape::Text => "a text",
    };
    Err(SchemaError::new(
        path.clone(),
        SchemaErrorKind::invalid(format!("{role} symbology needs {wanted} symbol")),
    ))
}

fn role_symbol(value: &Value, path: &FieldPath, role: SymbologyRole) -> Result<Symbol> {
    let implied = (role.shape() == SymbolShape::Text).then_some("text");
    let symbol = decode_symbol(value, path, implied)?;
    check_shape(&symbol, role, path)?;
    Ok(symbol)
}

fn unique_value_key(value: &Value, path: &FieldPath) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(wrong_type(path.clone(), "string or number", other)),
    }
}

/// Decode a current renderer and check its symbols fit the role.
pub(crate) fn decode_renderer(
    value: &Value,
    path: &FieldPath,
    role: SymbologyRole,
) -> Result<Renderer> {
    let reader = ObjectReader::new(value, path.clone())?;
    match reader.required_str("type")? {
        "simple" => {
            let symbol_path = reader.field_path("symbol");
            let symbol = role_symbol(reader.required("symbol")?, &symbol_path, role)?;
            Ok(Renderer::Simple { symbol })
        }
        "uniqueValue" => {
            let field = reader.required_str("field")?.to_string();
            let default = match reader.get("default") {
                Some(value) => role_symbol(value, &reader.field_path("default"), role)?,
                None => default_renderer(role).default_symbol().clone(),
            };
            let values_path = reader.field_path("values");
            let mut values = Vec::new();
            for (index, entry) in reader
                .optional_array("values")?
                .into_iter()
                .flatten()
                .enumerate()
            {
                let entry_reader = ObjectReader::new(entry, values_path.index(index))?;
                values.push(UniqueValueInfo {
                    value: unique_value_key(
                        entry_reader.required("value")?,
                        &entry_reader.field_path("value"),
                    )?,
                    symbol: role_symbol(
                        entry_reader.required("symbol")?,
                        &entry_reader.field_path("symbol"),
                        role,
                    )?,
                });
            }
            Ok(Renderer::UniqueValue {
                field,
                default,
                values,
            })
        }
        other => Err(SchemaError::new(
            reader.field_path("type"),
            SchemaErrorKind::UnknownValue {
                kind: "renderer type",
                value: other.to_string(),
            },
        )),
    }
}

/// Decode a first-generation `{color, size}` object.
pub(crate) fn decode_legacy(value: &Value, path: &FieldPath) -> Result<LegacySymbology> {
    let map = as_object(value, path)?;
    let reader = ObjectReader::from_map(map, path.clone());
    let color = reader
        .get("color")
        .map(|value| decode_color(value, &reader.field_path("color")))
        .transpose()?;
    let size = match reader.get("size") {
        Some(_) => Some(positive(&reader, "size", DEFAULT_MARKER_SIZE)?),
        None => None,
    };
    Ok(LegacySymbology { color, size })
}
