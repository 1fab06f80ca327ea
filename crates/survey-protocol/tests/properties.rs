//! Property tests for decoding and symbology resolution.

use proptest::prelude::*;
use serde_json::json;
use survey_model::{
    Color, LegacySymbology, LineStyle, LineSymbol, MarkerStyle, MarkerSymbol, Renderer, Symbol,
    SymbolShape, SymbologyRole, TextSymbol,
};
use survey_protocol::{Decoder, SchemaErrorKind, resolve};

const ROLES: [SymbologyRole; 6] = [
    SymbologyRole::GpsPoints,
    SymbologyRole::OnTransectTrack,
    SymbologyRole::OffTransectTrack,
    SymbologyRole::MissionMarker,
    SymbologyRole::FeatureMarker,
    SymbologyRole::FeatureLabel,
];

fn role() -> impl Strategy<Value = SymbologyRole> {
    prop::sample::select(ROLES.to_vec())
}

fn color() -> impl Strategy<Value = Color> {
    any::<[u8; 4]>().prop_map(|[r, g, b, a]| Color::rgba(r, g, b, a))
}

/// A simple renderer whose symbol has the shape `role` expects.
fn current(role: SymbologyRole) -> impl Strategy<Value = Option<Renderer>> {
    let symbol = (color(), 0.5f64..50.0).prop_map(move |(color, size)| match role.shape() {
        SymbolShape::Point => Symbol::Marker(MarkerSymbol {
            style: MarkerStyle::default(),
            color,
            size,
        }),
        SymbolShape::Line => Symbol::Line(LineSymbol {
            style: LineStyle::default(),
            color,
            width: size,
        }),
        SymbolShape::Text => Symbol::Text(TextSymbol { color, size }),
    });
    prop::option::of(symbol.prop_map(Renderer::simple))
}

fn legacy() -> impl Strategy<Value = Option<LegacySymbology>> {
    let color = prop::option::of(color());
    let size = prop::option::of(0.5f64..100.0);
    prop::option::of((color, size).prop_map(|(color, size)| LegacySymbology { color, size }))
}

fn has_case_insensitive_duplicate(names: &[String]) -> bool {
    names.iter().enumerate().any(|(index, name)| {
        names[..index]
            .iter()
            .any(|earlier| earlier.eq_ignore_ascii_case(name))
    })
}

proptest! {
    #[test]
    fn resolution_is_total_and_keeps_role_shape(
        (role, current) in role().prop_flat_map(|role| (Just(role), current(role))),
        legacy in legacy(),
    ) {
        let first = resolve(role, current.clone(), legacy.as_ref());
        let second = resolve(role, current.clone(), legacy.as_ref());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.default_symbol().shape(), role.shape());
        if let Some(current) = current {
            prop_assert_eq!(first, current);
        }
    }

    #[test]
    fn attribute_names_unique_ignoring_case(
        names in prop::collection::vec("[a-cA-C][a-c]{1,2}", 1..6)
    ) {
        let attributes: Vec<_> = names
            .iter()
            .map(|name| json!({"name": name, "type": 700}))
            .collect();
        let document = json!({
            "meta-name": "NPS-Protocol-Specification",
            "meta-version": 2,
            "name": "Generated",
            "version": 1.0,
            "features": [{
                "name": "Birds",
                "attributes": attributes,
                "locations": [{"type": "gps"}]
            }]
        });
        let result = Decoder::default().decode_value(&document);
        if has_case_insensitive_duplicate(&names) {
            let error = result.unwrap_err();
            let is_duplicate = matches!(error.kind, SchemaErrorKind::DuplicateName { .. });
            prop_assert!(is_duplicate);
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
