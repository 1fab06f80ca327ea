//! Tests for survey-model types.

use proptest::prelude::*;
use survey_model::{
    Attribute, AttributeName, AttributeType, Binding, Color, ElementKind, Feature,
    LocationMethod, LocationMethodKind, Renderer, StorageType, Symbol, TextSymbol,
};

fn text_renderer() -> Renderer {
    Renderer::simple(Symbol::Text(TextSymbol {
        color: Color::rgb(0, 0, 0),
        size: 10.0,
    }))
}

#[test]
fn attribute_serializes_wire_shape() {
    let attribute = Attribute::new(AttributeName::new("Count").unwrap(), AttributeType::Int16)
        .required(true);
    let json = serde_json::to_value(&attribute).expect("serialize attribute");
    assert_eq!(json, serde_json::json!({"name": "Count", "type": 100, "required": true}));

    let optional = Attribute::new(AttributeName::new("Notes").unwrap(), AttributeType::String);
    let json = serde_json::to_value(&optional).expect("serialize attribute");
    assert_eq!(json, serde_json::json!({"name": "Notes", "type": 700}));
}

#[test]
fn every_attribute_type_has_a_storage_type() {
    let integral: Vec<StorageType> = AttributeType::ALL
        .iter()
        .filter(|ty| ty.is_integral())
        .map(AttributeType::storage_type)
        .collect();
    assert!(integral.iter().all(|ty| ty.integer_bounds().is_some()));
}

#[test]
fn feature_default_location_prefers_flagged_method() {
    let mut target = LocationMethod::new(LocationMethodKind::MapTarget);
    target.is_default = true;
    let feature = Feature {
        name: "Birds".to_string(),
        attributes: vec![],
        dialog: None,
        location_methods: vec![LocationMethod::new(LocationMethodKind::Gps), target],
        label: None,
        allow_off_transect_observations: false,
        symbology: text_renderer(),
    };
    assert_eq!(
        feature.default_location_method().map(|m| m.kind),
        Some(LocationMethodKind::MapTarget)
    );
}

#[test]
fn label_kind_is_only_optional_binding() {
    for kind in ElementKind::ALL {
        assert_eq!(kind.requires_binding(), kind != ElementKind::Label);
    }
}

proptest! {
    #[test]
    fn valid_identifiers_are_accepted(name in "[A-Za-z_][A-Za-z0-9_]{1,9}") {
        prop_assert!(AttributeName::new(name).is_ok());
    }

    #[test]
    fn leading_digit_is_rejected(name in "[0-9][A-Za-z0-9_]{1,9}") {
        prop_assert!(AttributeName::new(name).is_err());
    }

    #[test]
    fn binding_display_parses_back(name in "[A-Za-z_][A-Za-z0-9_]{1,9}") {
        let text = format!("selectedItem:{name}");
        let binding: Binding = text.parse().unwrap();
        prop_assert_eq!(binding.to_string(), text);
    }
}
