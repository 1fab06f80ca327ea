//! Renderer descriptions attached to features and mission tracks.
//!
//! The compiler treats renderers as opaque values identified only by the
//! role they serve; map drawing happens elsewhere.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::ModelError;

/// An RGBA color. Serialized as `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidColor(value.to_string());
        let digits = value.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8)
            || !digits.bytes().all(|byte| byte.is_ascii_hexdigit())
        {
            return Err(invalid());
        }
        let channel = |index: usize| {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
        };
        let alpha = if digits.len() == 8 { channel(3)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    X,
}

impl FromStr for MarkerStyle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(MarkerStyle::Circle),
            "square" => Ok(MarkerStyle::Square),
            "diamond" => Ok(MarkerStyle::Diamond),
            "triangle" => Ok(MarkerStyle::Triangle),
            "cross" => Ok(MarkerStyle::Cross),
            "x" => Ok(MarkerStyle::X),
            _ => Err(ModelError::UnknownValue {
                kind: "marker style",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
}

impl FromStr for LineStyle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(LineStyle::Solid),
            "dash" => Ok(LineStyle::Dash),
            "dot" => Ok(LineStyle::Dot),
            "dashdot" => Ok(LineStyle::DashDot),
            _ => Err(ModelError::UnknownValue {
                kind: "line style",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSymbol {
    pub style: MarkerStyle,
    pub color: Color,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSymbol {
    pub style: LineStyle,
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSymbol {
    pub color: Color,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Symbol {
    Marker(MarkerSymbol),
    Line(LineSymbol),
    Text(TextSymbol),
}

impl Symbol {
    pub fn shape(&self) -> SymbolShape {
        match self {
            Symbol::Marker(_) => SymbolShape::Point,
            Symbol::Line(_) => SymbolShape::Line,
            Symbol::Text(_) => SymbolShape::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueValueInfo {
    pub value: String,
    pub symbol: Symbol,
}

/// A current-format renderer description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Renderer {
    Simple {
        symbol: Symbol,
    },
    /// Picks a symbol by the value of one attribute of the graphic.
    UniqueValue {
        field: String,
        default: Symbol,
        values: Vec<UniqueValueInfo>,
    },
}

impl Renderer {
    pub fn simple(symbol: Symbol) -> Self {
        Renderer::Simple { symbol }
    }

    /// The symbol drawn when no more specific rule applies.
    pub fn default_symbol(&self) -> &Symbol {
        match self {
            Renderer::Simple { symbol } => symbol,
            Renderer::UniqueValue { default, .. } => default,
        }
    }
}

/// The first-generation `{color, size}` symbology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacySymbology {
    pub color: Option<Color>,
    pub size: Option<f64>,
}

impl LegacySymbology {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.size.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolShape {
    Point,
    Line,
    Text,
}

/// What a renderer is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbologyRole {
    GpsPoints,
    OnTransectTrack,
    OffTransectTrack,
    MissionMarker,
    FeatureMarker,
    FeatureLabel,
}

impl SymbologyRole {
    pub fn shape(&self) -> SymbolShape {
        match self {
            SymbologyRole::GpsPoints
            | SymbologyRole::MissionMarker
            | SymbologyRole::FeatureMarker => SymbolShape::Point,
            SymbologyRole::OnTransectTrack | SymbologyRole::OffTransectTrack => SymbolShape::Line,
            SymbologyRole::FeatureLabel => SymbolShape::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbologyRole::GpsPoints => "gps points",
            SymbologyRole::OnTransectTrack => "on-transect track",
            SymbologyRole::OffTransectTrack => "off-transect track",
            SymbologyRole::MissionMarker => "mission marker",
            SymbologyRole::FeatureMarker => "feature marker",
            SymbologyRole::FeatureLabel => "feature label",
        }
    }
}

impl fmt::Display for SymbologyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Color::from_hex("#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(
            Color::from_hex("00ff0080").unwrap(),
            Color::rgba(0, 255, 0, 128)
        );
        assert!(Color::from_hex("#F00").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("#+F+F+F").is_err());
    }

    #[test]
    fn color_display_round_trips() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(Color::from_hex(&color.to_string()).unwrap(), color);
    }

    #[test]
    fn renderer_serializes_tagged() {
        let renderer = Renderer::simple(Symbol::Text(TextSymbol {
            color: Color::rgb(255, 255, 255),
            size: 12.0,
        }));
        let value = serde_json::to_value(&renderer).unwrap();
        assert_eq!(value["type"], "simple");
        assert_eq!(value["symbol"]["type"], "text");
        assert_eq!(value["symbol"]["color"], "#FFFFFFFF");
    }
}
