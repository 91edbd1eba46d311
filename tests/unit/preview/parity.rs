use super::*;
use crate::compile::compiler::compile;
use crate::foundation::core::FrameDims;
use serde_json::json;

fn expected() -> ExpectedGeometry {
    ExpectedGeometry {
        expected_width: 300.0,
        expected_font_size_px: 32.0,
        expected_line_height_px: 36.0,
        expected_top_px: 430.0,
    }
}

fn measured_exact() -> MeasuredGeometry {
    MeasuredGeometry {
        width: 300.0,
        font_size_px: 32.0,
        line_height_px: 36.0,
        top_px: 430.0,
    }
}

#[test]
fn exact_match_passes() {
    assert!(ParityGate::default().check(&expected(), &measured_exact()).passed());
}

#[test]
fn boundaries_are_inclusive() {
    let m = MeasuredGeometry {
        width: 302.0,
        top_px: 428.0,
        font_size_px: 33.0,
        line_height_px: 35.0,
    };
    assert!(ParityGate::default().check(&expected(), &m).passed());
}

#[test]
fn every_failing_dimension_is_reported() {
    let m = MeasuredGeometry {
        width: 302.5,
        top_px: 430.0,
        font_size_px: 33.5,
        line_height_px: 36.0,
    };
    let report = ParityGate::default().check(&expected(), &m);
    assert!(!report.passed());
    let dims: Vec<ParityDimension> = report.mismatches.iter().map(|x| x.dimension).collect();
    assert_eq!(dims, vec![ParityDimension::Width, ParityDimension::FontSize]);
}

#[test]
fn non_finite_measurements_fail() {
    let m = MeasuredGeometry {
        width: f64::NAN,
        ..measured_exact()
    };
    assert!(!ParityGate::default().check(&expected(), &m).passed());
}

#[test]
fn tolerances_are_configurable() {
    let loose = ParityGate::new(ParityTolerances {
        layout_px: 5.0,
        typography_px: 3.0,
    });
    let m = MeasuredGeometry {
        width: 304.0,
        font_size_px: 34.0,
        ..measured_exact()
    };
    assert!(loose.check(&expected(), &m).passed());
    assert!(!ParityGate::default().check(&expected(), &m).passed());
}

#[test]
fn expected_geometry_scales_compiled_meta() {
    let style = json!({ "fontPx": 64, "lineSpacingPx": 8 });
    let meta = compile(
        "Hello world",
        style.as_object().unwrap(),
        FrameDims::portrait_hd(),
        None,
    )
    .unwrap();
    let e = ExpectedGeometry::from_meta(&meta, 0.5);
    assert_eq!(e.expected_font_size_px, 32.0);
    assert_eq!(e.expected_line_height_px, 36.0);
    assert_eq!(e.expected_top_px, meta.y_px_first_line() as f64 * 0.5);
    assert!((e.expected_width - meta.widest_line_px() * 0.5).abs() < 1e-9);
}
