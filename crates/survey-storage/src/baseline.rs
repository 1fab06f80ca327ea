//! The fixed part of every storage schema, loaded from TOML.
//!
//! The copy shipped with the crate is embedded at build time. A different
//! file can be supplied explicitly or through [`BASELINE_ENV_VAR`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use survey_model::naming::{ATTRIBUTE_PREFIX, FEATURE_TABLE_PREFIX};
use tracing::debug;

use crate::error::StorageError;
use crate::schema::{StorageSchema, Table};

/// Environment variable naming a baseline file to use instead of the
/// embedded one.
pub const BASELINE_ENV_VAR: &str = "SURVEY_BASELINE_SCHEMA";

const EMBEDDED_BASELINE: &str = include_str!("../baseline/storage.toml");
const BASELINE_SCHEMA_ID: &str = "survey.storage-baseline";
const BASELINE_SCHEMA_VERSION: u32 = 1;

pub const TRACK_LOG_TABLE: &str = "TrackLog";
pub const GPS_POINT_TABLE: &str = "GpsPoint";
pub const ADHOC_LOCATION_TABLE: &str = "AdhocLocation";
pub const ANGLE_DISTANCE_LOCATION_TABLE: &str = "AngleDistanceLocation";
pub const MISSION_PROPERTY_TABLE: &str = "MissionProperty";
pub const OBSERVATION_TABLE: &str = "Observation";
pub const MISSION_TABLE: &str = "Mission";

/// Tables the compiler relies on.
pub const REQUIRED_TABLES: &[&str] = &[
    TRACK_LOG_TABLE,
    GPS_POINT_TABLE,
    ADHOC_LOCATION_TABLE,
    ANGLE_DISTANCE_LOCATION_TABLE,
    MISSION_PROPERTY_TABLE,
    OBSERVATION_TABLE,
    MISSION_TABLE,
];

#[derive(Debug, Deserialize)]
struct BaselineFile {
    baseline: BaselineHeader,
    tables: Vec<Table>,
}

#[derive(Debug, Deserialize)]
struct BaselineHeader {
    schema: String,
    schema_version: u32,
}

/// Where the baseline comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BaselineSource {
    #[default]
    Embedded,
    File(PathBuf),
}

impl BaselineSource {
    /// Resolution order:
    /// 1. `explicit`, e.g. a command-line flag
    /// 2. the `SURVEY_BASELINE_SCHEMA` environment variable
    /// 3. the embedded baseline
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return BaselineSource::File(path);
        }
        match std::env::var_os(BASELINE_ENV_VAR) {
            Some(path) if !path.is_empty() => BaselineSource::File(PathBuf::from(path)),
            _ => BaselineSource::Embedded,
        }
    }

    pub fn load(&self) -> Result<Baseline, StorageError> {
        match self {
            BaselineSource::Embedded => Baseline::parse(EMBEDDED_BASELINE, "<embedded>"),
            BaselineSource::File(path) => Baseline::from_path(path),
        }
    }
}

/// A checked baseline schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    schema: StorageSchema,
    origin: String,
}

impl Baseline {
    pub fn embedded() -> Result<Self, StorageError> {
        BaselineSource::Embedded.load()
    }

    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse and check a baseline. `origin` only labels errors and logs.
    pub fn parse(contents: &str, origin: &str) -> Result<Self, StorageError> {
        let file: BaselineFile =
            toml::from_str(contents).map_err(|source| StorageError::BaselineToml {
                origin: origin.to_string(),
                source,
            })?;
        validate_header(&file.baseline)?;
        let schema = StorageSchema { tables: file.tables };
        validate_tables(&schema)?;
        debug!(origin, tables = schema.tables.len(), "loaded baseline schema");
        Ok(Self {
            schema,
            origin: origin.to_string(),
        })
    }

    pub fn schema(&self) -> &StorageSchema {
        &self.schema
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

fn validate_header(header: &BaselineHeader) -> Result<(), StorageError> {
    if header.schema != BASELINE_SCHEMA_ID {
        return Err(StorageError::invalid(format!(
            "unsupported schema: {}",
            header.schema
        )));
    }
    if header.schema_version != BASELINE_SCHEMA_VERSION {
        return Err(StorageError::invalid(format!(
            "unsupported schema_version: {}",
            header.schema_version
        )));
    }
    Ok(())
}

fn validate_tables(schema: &StorageSchema) -> Result<(), StorageError> {
    let mut names = BTreeSet::new();
    for table in &schema.tables {
        if !names.insert(table.name.as_str()) {
            return Err(StorageError::invalid(format!(
                "duplicate table: {}",
                table.name
            )));
        }
        if table.name.starts_with(FEATURE_TABLE_PREFIX) {
            return Err(StorageError::invalid(format!(
                "table {} uses the reserved prefix {FEATURE_TABLE_PREFIX}",
                table.name
            )));
        }
        if let Some(column) = table
            .columns
            .iter()
            .find(|column| column.name.starts_with(ATTRIBUTE_PREFIX))
        {
            return Err(StorageError::invalid(format!(
                "column {}.{} uses the reserved prefix {ATTRIBUTE_PREFIX}",
                table.name, column.name
            )));
        }
    }

    for required in REQUIRED_TABLES {
        if !names.contains(required) {
            return Err(StorageError::BaselineMissingTable {
                name: (*required).to_string(),
            });
        }
    }

    for table in &schema.tables {
        let targets = table
            .parent
            .iter()
            .chain(table.relationships.iter().map(|rel| &rel.destination));
        for target in targets {
            if !names.contains(target.as_str()) {
                return Err(StorageError::invalid(format!(
                    "table {} refers to unknown table {target}",
                    table.name
                )));
            }
        }
    }
    Ok(())
}
