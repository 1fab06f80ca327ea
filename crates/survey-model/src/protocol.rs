use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Attribute, Dialog, LocationMethod, MissionTotalizer, Renderer, Symbol};

/// Required value of a document's `meta-name`.
pub const PROTOCOL_META_NAME: &str = "NPS-Protocol-Specification";

/// Declared version of a protocol, e.g. `3.2` for major 3, minor 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProtocolVersion(f64);

impl ProtocolVersion {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whole tenths of the version, biased to absorb float noise just below
    /// a tenth.
    fn tenths(&self) -> i64 {
        (self.0 * 10.0 + 1e-9).trunc() as i64
    }

    pub fn major(&self) -> i64 {
        self.tenths() / 10
    }

    /// First decimal digit.
    pub fn minor(&self) -> i64 {
        (self.tenths() % 10).abs()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

/// Text drawn next to each observation of a feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    /// Attribute whose value is drawn.
    pub field: String,
    pub symbol: Symbol,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog: Option<Dialog>,
    #[serde(rename = "locations")]
    pub location_methods: Vec<LocationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub allow_off_transect_observations: bool,
    pub symbology: Renderer,
}

impl Feature {
    pub fn default_location_method(&self) -> Option<&LocationMethod> {
        self.location_methods
            .iter()
            .find(|method| method.allow && method.is_default)
            .or_else(|| self.location_methods.iter().find(|method| method.allow))
    }
}

/// Properties recorded about the survey effort itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog: Option<Dialog>,
    pub edit_at_start_recording: bool,
    pub edit_at_start_first_observing: bool,
    pub edit_at_start_reobserving: bool,
    pub edit_prior_at_stop_observing: bool,
    pub edit_at_stop_observing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalizer: Option<MissionTotalizer>,
    pub symbology: Renderer,
    pub gps_symbology: Renderer,
    pub on_symbology: Renderer,
    pub off_symbology: Renderer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolDocument {
    #[serde(rename = "meta-name")]
    pub meta_name: String,
    #[serde(rename = "meta-version")]
    pub meta_version: u32,
    pub name: String,
    pub version: ProtocolVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission: Option<Mission>,
    pub features: Vec<Feature>,
    /// Seconds between recorded GPS points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_interval: Option<f64>,
    /// Export layout; passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observing: Option<String>,
    #[serde(rename = "notobserving", skip_serializing_if = "Option::is_none")]
    pub not_observing: Option<String>,
    pub cancel_on_top: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message_fontsize: Option<f64>,
}

impl ProtocolDocument {
    /// Documents written against the first meta-version.
    pub fn is_legacy(&self) -> bool {
        self.meta_version < 2
    }

    /// Look up a feature by name, ignoring ASCII case.
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features
            .iter()
            .find(|feature| feature.name.eq_ignore_ascii_case(name))
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features
            .iter()
            .map(|feature| feature.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_splits_major_minor() {
        let version = ProtocolVersion::new(3.2);
        assert_eq!(version.major(), 3);
        assert_eq!(version.minor(), 2);
        assert_eq!(ProtocolVersion::new(2.3).minor(), 3);
        assert_eq!(ProtocolVersion::new(1.0).minor(), 0);
        assert_eq!(ProtocolVersion::new(2.0).to_string(), "2.0");
    }

    #[test]
    fn minor_is_the_first_decimal_digit() {
        let version = ProtocolVersion::new(2.96);
        assert_eq!((version.major(), version.minor()), (2, 9));
        assert_eq!(version.to_string(), "2.9");
        let version = ProtocolVersion::new(3.2);
        assert_eq!((version.major(), version.minor()), (3, 2));
        assert_eq!(ProtocolVersion::new(0.1).minor(), 1);
    }
}
