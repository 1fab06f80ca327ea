//! Compiling decoded protocols into storage schemas.

use proptest::prelude::*;
use serde_json::json;
use survey_model::{ProtocolDocument, StorageType};
use survey_protocol::{DecodeOptions, Decoder, decode_protocol};
use survey_storage::{Baseline, BaselineSource, CompileOptions, compile, compile_with};

const SEA_OTTERS: &str = include_str!("../../survey-protocol/tests/fixtures/sea_otter_survey.json");

fn embedded() -> Baseline {
    Baseline::embedded().expect("embedded baseline")
}

fn birds_only() -> ProtocolDocument {
    let value = json!({
        "meta-name": "NPS-Protocol-Specification",
        "meta-version": 2,
        "name": "Birds",
        "version": 1.0,
        "features": [{"name": "Birds", "locations": [{"type": "gps"}]}]
    });
    Decoder::default().decode_value(&value).expect("decode")
}

#[test]
fn feature_without_attributes_gets_empty_table() {
    let baseline = embedded();
    let schema = compile(&birds_only(), &baseline);
    let birds = schema.feature_table("Birds").expect("O_Birds");
    assert!(birds.columns.is_empty());
    assert_eq!(birds.parent.as_deref(), Some("Observation"));
    assert_eq!(
        schema.tables.len(),
        baseline.schema().tables.len() + 1,
        "only one table is added"
    );
}

#[test]
fn fixture_schema_layout() {
    let protocol = decode_protocol(SEA_OTTERS.as_bytes()).expect("decode fixture");
    let schema = compile(&protocol, &embedded());

    insta::assert_snapshot!(schema.table_names().join(", "), @"Mission, TrackLog, GpsPoint, AdhocLocation, AngleDistanceLocation, MissionProperty, Observation, O_Otters, O_Haulouts");

    let property_columns: Vec<&str> = schema
        .table("MissionProperty")
        .expect("MissionProperty")
        .columns
        .iter()
        .map(|column| column.name.as_str())
        .collect();
    assert_eq!(
        property_columns,
        vec!["observing", "A_Observer", "A_Transect", "A_Sea_State", "A_OnEffort"]
    );

    let distance = schema.column("O_Otters", "A_Distance").expect("A_Distance");
    assert_eq!(distance.storage_type, StorageType::Double);
    assert!(distance.optional);
    assert_eq!(
        schema.column("O_Otters", "A_Adults").map(|column| column.storage_type),
        Some(StorageType::Int16)
    );
    assert!(schema.feature_table("Haulouts").expect("O_Haulouts").columns.is_empty());
}

#[test]
fn compile_leaves_protocol_untouched() {
    let protocol = decode_protocol(SEA_OTTERS.as_bytes()).expect("decode fixture");
    let before = protocol.clone();
    let _ = compile(&protocol, &embedded());
    assert_eq!(protocol, before);
}

#[test]
fn fingerprint_is_stable() {
    let protocol = decode_protocol(SEA_OTTERS.as_bytes()).expect("decode fixture");
    let first = compile(&protocol, &embedded()).fingerprint().expect("fingerprint");
    let second = compile(&protocol, &embedded()).fingerprint().expect("fingerprint");
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    let other = compile(&birds_only(), &embedded()).fingerprint().expect("fingerprint");
    assert_ne!(first, other);
}

#[test]
fn legacy_duplicate_attributes_compile_once() {
    let value = json!({
        "meta-name": "NPS-Protocol-Specification",
        "meta-version": 1,
        "name": "Old",
        "version": 1.0,
        "features": [{
            "name": "Birds",
            "attributes": [
                {"name": "Count", "type": 100},
                {"name": "COUNT", "type": 700}
            ],
            "locations": [{"type": "gps"}]
        }]
    });
    let protocol = Decoder::new(DecodeOptions::new())
        .decode_value(&value)
        .expect("legacy decode");
    let schema = compile(&protocol, &embedded());
    let birds = schema.feature_table("Birds").expect("O_Birds");
    assert_eq!(birds.columns.len(), 1);
    assert_eq!(birds.columns[0].storage_type, StorageType::Int16);
}

#[test]
fn missing_baseline_file_is_environment_error() {
    let options = CompileOptions::new().baseline(BaselineSource::File(
        "/definitely/not/here/storage.toml".into(),
    ));
    let error = compile_with(&birds_only(), &options).unwrap_err();
    assert!(matches!(
        error,
        survey_storage::StorageError::BaselineIo { .. }
    ));
}

proptest! {
    #[test]
    fn every_feature_gets_one_table(count in 1usize..8) {
        let features: Vec<_> = (0..count)
            .map(|index| json!({"name": format!("Feature{index}"), "locations": [{"type": "gps"}]}))
            .collect();
        let value = json!({
            "meta-name": "NPS-Protocol-Specification",
            "meta-version": 2,
            "name": "Generated",
            "version": 1.0,
            "features": features
        });
        let protocol = Decoder::default().decode_value(&value).expect("decode");
        let baseline = embedded();
        let schema = compile(&protocol, &baseline);
        prop_assert_eq!(schema.tables.len(), baseline.schema().tables.len() + count);
        for index in 0..count {
            let name = format!("Feature{index}");
            prop_assert!(schema.feature_table(&name).is_some());
        }
    }
}
