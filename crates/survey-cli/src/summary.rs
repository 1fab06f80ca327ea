//! Terminal tables for `check` and `storage`.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use survey_model::{Dialog, Feature, Mission, ProtocolDocument, Renderer, Symbol};
use survey_storage::StorageSchema;

/// One line of the `check` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRow {
    pub name: String,
    pub attributes: usize,
    pub dialog_elements: usize,
    pub locations: String,
    pub symbology: String,
}

pub fn entity_rows(document: &ProtocolDocument) -> Vec<EntityRow> {
    let mut rows = Vec::with_capacity(document.features.len() + 1);
    if let Some(mission) = &document.mission {
        rows.push(mission_row(mission));
    }
    rows.extend(document.features.iter().map(feature_row));
    rows
}

fn mission_row(mission: &Mission) -> EntityRow {
    EntityRow {
        name: "(mission)".to_string(),
        attributes: mission.attributes.len(),
        dialog_elements: element_count(mission.dialog.as_ref()),
        locations: "-".to_string(),
        symbology: describe_renderer(&mission.symbology),
    }
}

fn feature_row(feature: &Feature) -> EntityRow {
    EntityRow {
        name: feature.name.clone(),
        attributes: feature.attributes.len(),
        dialog_elements: element_count(feature.dialog.as_ref()),
        locations: feature
            .location_methods
            .iter()
            .map(|method| method.kind.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        symbology: describe_renderer(&feature.symbology),
    }
}

fn element_count(dialog: Option<&Dialog>) -> usize {
    dialog.map_or(0, |dialog| dialog.elements().count())
}

fn describe_symbol(symbol: &Symbol) -> &'static str {
    match symbol {
        Symbol::Marker(_) => "marker",
        Symbol::Line(_) => "line",
        Symbol::Text(_) => "text",
    }
}

pub fn describe_renderer(renderer: &Renderer) -> String {
    match renderer {
        Renderer::Simple { symbol } => format!("simple {}", describe_symbol(symbol)),
        Renderer::UniqueValue { field, values, .. } => {
            format!("unique value by {field} ({} classes)", values.len())
        }
    }
}

pub fn check_table(document: &ProtocolDocument) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Attributes"),
        header_cell("Dialog elements"),
        header_cell("Locations"),
        header_cell("Symbology"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in entity_rows(document) {
        table.add_row(vec![
            Cell::new(&row.name).fg(Color::Green),
            Cell::new(row.attributes),
            Cell::new(row.dialog_elements),
            Cell::new(&row.locations),
            dim_cell(&row.symbology),
        ]);
    }
    table
}

pub fn print_check(document: &ProtocolDocument) {
    println!(
        "Protocol: {} {} (meta-version {})",
        document.name, document.version, document.meta_version
    );
    if let Some(date) = document.date {
        println!("Date: {date}");
    }
    if document.is_legacy() {
        println!("Legacy document: cross-reference checks run only when forced");
    }
    println!("{}", check_table(document));
}

pub fn storage_table(schema: &StorageSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Parent"),
        header_cell("Columns"),
        header_cell("Relationships"),
    ]);
    apply_table_style(&mut table);
    for entity in &schema.tables {
        let columns = entity
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name, column.storage_type))
            .collect::<Vec<_>>()
            .join("\n");
        let relationships = entity
            .relationships
            .iter()
            .map(|relationship| {
                let arrow = if relationship.to_many { "->>" } else { "->" };
                format!("{} {arrow} {}", relationship.name, relationship.destination)
            })
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(&entity.name).add_attribute(Attribute::Bold),
            dim_cell(entity.parent.as_deref().unwrap_or("-")),
            Cell::new(columns),
            Cell::new(relationships),
        ]);
    }
    table
}

pub fn print_storage(schema: &StorageSchema, fingerprint: &str) {
    println!("{}", storage_table(schema));
    println!("Fingerprint: {fingerprint}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
