//! Protocol → storage schema compilation.
//!
//! The result is a fold over the baseline: mission attribute columns are
//! merged into `MissionProperty`, then one observation table per feature is
//! added when absent. The protocol document is only read.

use std::path::PathBuf;

use survey_model::{Attribute, Feature, ProtocolDocument, attribute_column, feature_table};
use tracing::{info, warn};

use crate::baseline::{Baseline, BaselineSource, MISSION_PROPERTY_TABLE, OBSERVATION_TABLE};
use crate::error::StorageError;
use crate::schema::{Column, StorageSchema, Table};

/// Compilation switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub baseline: BaselineSource,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn baseline(mut self, baseline: BaselineSource) -> Self {
        self.baseline = baseline;
        self
    }

    /// Use `path` if given, else fall back to the environment.
    #[must_use]
    pub fn baseline_path(self, path: Option<PathBuf>) -> Self {
        self.baseline(BaselineSource::resolve(path))
    }
}

/// Load the configured baseline and compile `document` against it.
pub fn compile_with(
    document: &ProtocolDocument,
    options: &CompileOptions,
) -> Result<StorageSchema, StorageError> {
    let baseline = options.baseline.load()?;
    Ok(compile(document, &baseline))
}

/// Compile against an already loaded baseline. Never fails.
pub fn compile(document: &ProtocolDocument, baseline: &Baseline) -> StorageSchema {
    let mut schema = baseline.schema().clone();

    if let Some(mission) = &document.mission
        && let Some(table) = schema.table_mut(MISSION_PROPERTY_TABLE)
    {
        append_attribute_columns(table, &mission.attributes);
    }

    let schema = document
        .features
        .iter()
        .fold(schema, |schema, feature| {
            let table = observation_table(feature);
            if schema.contains(&table.name) {
                warn!(table = %table.name, "table already exists; keeping the first");
            }
            schema.with_table_if_absent(table)
        });

    info!(
        protocol = %document.name,
        tables = schema.tables.len(),
        "compiled storage schema"
    );
    schema
}

fn observation_table(feature: &Feature) -> Table {
    let mut table = Table::new(feature_table(&feature.name));
    table.parent = Some(OBSERVATION_TABLE.to_string());
    append_attribute_columns(&mut table, &feature.attributes);
    table
}

/// Append `A_` columns, skipping names already present. Only documents that
/// skipped validation can carry such duplicates.
fn append_attribute_columns(table: &mut Table, attributes: &[Attribute]) {
    for attribute in attributes {
        let name = attribute_column(attribute.name.as_str());
        if table.has_column_ignoring_case(&name) {
            warn!(table = %table.name, column = %name, "skipping duplicate attribute column");
            continue;
        }
        table
            .columns
            .push(Column::new(name, attribute.attribute_type.storage_type()));
    }
}

#[cfg(test)]
mod tests {
    use survey_model::{
        AttributeName, AttributeType, Color, Renderer, StorageType, Symbol, TextSymbol,
    };

    use super::*;

    fn attribute(name: &str, ty: AttributeType) -> Attribute {
        Attribute::new(AttributeName::new(name).unwrap(), ty)
    }

    #[test]
    fn duplicate_columns_are_skipped() {
        let mut table = Table::new("O_Birds");
        append_attribute_columns(
            &mut table,
            &[
                attribute("Count", AttributeType::Int16),
                attribute("count", AttributeType::String),
            ],
        );
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "A_Count");
    }

    #[test]
    fn observation_tables_extend_observation() {
        let feature = Feature {
            name: "Birds".to_string(),
            attributes: vec![attribute("Seen", AttributeType::Boolean)],
            dialog: None,
            location_methods: vec![],
            label: None,
            allow_off_transect_observations: false,
            symbology: Renderer::simple(Symbol::Text(TextSymbol {
                color: Color::rgb(0, 0, 0),
                size: 1.0,
            })),
        };
        let table = observation_table(&feature);
        assert_eq!(table.name, "O_Birds");
        assert_eq!(table.parent.as_deref(), Some("Observation"));
        assert_eq!(
            table.column("A_Seen").map(|column| column.storage_type),
            Some(StorageType::Boolean)
        );
    }
}
