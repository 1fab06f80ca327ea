use std::str::FromStr;

use serde::Serialize;

use crate::ModelError;

pub const DEFAULT_TOTALIZER_FONT_SIZE: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalizerUnits {
    #[default]
    Kilometers,
    Miles,
    Minutes,
}

impl FromStr for TotalizerUnits {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kilometers" => Ok(TotalizerUnits::Kilometers),
            "miles" => Ok(TotalizerUnits::Miles),
            "minutes" => Ok(TotalizerUnits::Minutes),
            _ => Err(ModelError::UnknownValue {
                kind: "totalizer units",
                value: s.to_string(),
            }),
        }
    }
}

/// Running totals of survey effort, grouped by the values of `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionTotalizer {
    pub fields: Vec<String>,
    #[serde(rename = "fontsize")]
    pub font_size: f64,
    #[serde(rename = "includeon")]
    pub include_on: bool,
    #[serde(rename = "includeoff")]
    pub include_off: bool,
    #[serde(rename = "includetotal")]
    pub include_total: bool,
    pub units: TotalizerUnits,
}

impl MissionTotalizer {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            font_size: DEFAULT_TOTALIZER_FONT_SIZE,
            include_on: true,
            include_off: false,
            include_total: false,
            units: TotalizerUnits::default(),
        }
    }
}
