use std::path::PathBuf;

use super::*;
use crate::style::model::CssWeight;
use crate::text::measure::measure_line;

fn spec(family: &str) -> FontSpec {
    FontSpec {
        family: family.to_string(),
        size_px: 64.0,
        weight: CssWeight::REGULAR,
        style: FontStyle::Normal,
        letter_spacing_px: 0.0,
    }
}

#[test]
fn unregistered_family_uses_builtin_table() {
    let mut parley = ParleyMeasurer::new(&FontRegistry::default());
    let mut builtin = BuiltinMetrics;
    let font = spec("Some Missing Family");
    assert_eq!(
        parley.advance_px("Hello world", &font),
        builtin.advance_px("Hello world", &font)
    );
}

#[test]
fn empty_text_has_zero_advance() {
    let mut parley = ParleyMeasurer::new(&FontRegistry::default());
    assert_eq!(parley.advance_px("", &spec("DejaVu Sans")), 0.0);
}

#[test]
fn letter_spacing_is_added_on_top_of_fallback() {
    let mut parley = ParleyMeasurer::new(&FontRegistry::default());
    let plain = measure_line(&mut parley, "abcd", &spec("Nope"));
    let spaced = measure_line(
        &mut parley,
        "abcd",
        &FontSpec {
            letter_spacing_px: 2.0,
            ..spec("Nope")
        },
    );
    assert!((spaced - plain - 6.0).abs() < 1e-9);
}

fn vendored_fonts() -> FontRegistry {
    FontRegistry::load(&[PathBuf::from("tests/data/fonts")])
}

#[test]
fn registered_face_is_shaped() {
    let registry = vendored_fonts();
    assert!(registry.has_family("DejaVu Sans"));

    let mut parley = ParleyMeasurer::new(&registry);
    let font = spec("dejavu sans");
    let hello = parley.advance_px("Hello", &font);
    let hello_world = parley.advance_px("Hello world", &font);
    assert!(hello > 0.0);
    assert!(hello_world > hello);
}

#[test]
fn shaped_advance_scales_with_font_size() {
    let mut parley = ParleyMeasurer::new(&vendored_fonts());
    let small = parley.advance_px("Hello world", &spec("DejaVu Sans"));
    let large = parley.advance_px(
        "Hello world",
        &FontSpec {
            size_px: 128.0,
            ..spec("DejaVu Sans")
        },
    );
    let ratio = large / small;
    assert!((ratio - 2.0).abs() < 0.02, "ratio {ratio}");
}
