use super::*;
use crate::style::model::{CssWeight, FontStyle, PlacementMode, TextAlign};
use proptest::prelude::*;
use serde_json::json;

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

#[test]
fn empty_partial_yields_defaults() {
    let style = resolve_style(&Map::new()).unwrap();
    assert_eq!(style, CaptionStyle::default());
}

#[test]
fn unknown_keys_are_dropped_silently() {
    let style = resolve_style(&obj(json!({
        "fontPx": 64,
        "yPxFirstLine": 12,
        "totalTextH": 9999,
        "__proto__": {"x": 1}
    })))
    .unwrap();
    assert_eq!(style.font_px, 64);
    let v = serde_json::to_value(&style).unwrap();
    assert!(v.get("yPxFirstLine").is_none());
    assert!(v.get("totalTextH").is_none());
}

#[test]
fn font_px_below_enforced_min_is_clamped_up() {
    let style = resolve_style(&obj(json!({ "fontPx": 8 }))).unwrap();
    assert_eq!(style.font_px, 32);
}

#[test]
fn font_px_above_enforced_max_is_clamped_down() {
    let style = resolve_style(&obj(json!({ "fontPx": 400 }))).unwrap();
    assert_eq!(style.font_px, 120);
}

#[test]
fn font_px_outside_validation_range_is_rejected() {
    let err = resolve_style(&obj(json!({ "fontPx": 999 }))).unwrap_err();
    assert_eq!(err.code(), "INVALID_STYLE_FIELD");
    assert!(err.to_string().contains("fontPx"));
}

#[test]
fn null_values_fall_back_to_defaults() {
    let style = resolve_style(&obj(json!({ "color": null, "fontPx": null }))).unwrap();
    assert_eq!(style.color, CaptionStyle::default().color);
    assert_eq!(style.font_px, CaptionStyle::default().font_px);
}

#[test]
fn enum_and_weight_fields_merge() {
    let style = resolve_style(&obj(json!({
        "fontStyle": "Italic",
        "textAlign": "left",
        "placement": "bottom",
        "weightCss": 400
    })))
    .unwrap();
    assert_eq!(style.font_style, FontStyle::Italic);
    assert_eq!(style.text_align, TextAlign::Left);
    assert_eq!(style.placement, PlacementMode::Bottom);
    assert_eq!(style.weight_css, CssWeight::REGULAR);
}

#[test]
fn non_object_style_value_is_rejected() {
    assert!(resolve_style_value(&json!([1, 2])).is_err());
    assert_eq!(
        resolve_style_value(&Value::Null).unwrap(),
        CaptionStyle::default()
    );
}

proptest! {
    #[test]
    fn any_valid_font_px_resolves_into_enforced_range(px in 8.0f64..=400.0) {
        let style = resolve_style(&obj(json!({ "fontPx": px }))).unwrap();
        prop_assert!((32..=120).contains(&style.font_px));
    }
}
