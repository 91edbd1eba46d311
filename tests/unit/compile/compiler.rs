use super::*;
use serde_json::json;

fn style(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

fn frame() -> FrameDims {
    FrameDims::portrait_hd()
}

fn raster(width: u32) -> Option<RasterSpec> {
    Some(RasterSpec {
        width,
        padding: Some(0),
    })
}

#[test]
fn empty_and_whitespace_text_is_rejected() {
    for text in ["", "   ", "\n\r\n\t"] {
        let err = compile(text, &Map::new(), frame(), None).unwrap_err();
        assert_eq!(err.code(), "EMPTY_TEXT");
    }
}

#[test]
fn default_style_wraps_into_the_fractional_box() {
    let meta = compile(
        "A very long sentence that must wrap across multiple lines for sure",
        &Map::new(),
        frame(),
        None,
    )
    .unwrap();
    assert_eq!(meta.box_width_px, 864);
    assert_eq!(meta.max_width_px, 816);
    assert_eq!(
        meta.lines,
        vec![
            "A very long sentence that must",
            "wrap across multiple lines for",
            "sure"
        ]
    );
    assert_eq!(meta.total_text_h, 3 * 48 + 2 * 8);
    assert_eq!(meta.raster_w, None);
    assert_eq!(meta.placement.geometry.box_left_px, 108);
}

#[test]
fn line_boxes_follow_alignment_over_content_box() {
    let meta = compile(
        "Hi\nthere",
        &style(json!({ "textAlign": "left", "fontPx": 64 })),
        frame(),
        None,
    )
    .unwrap();
    let boxes = &meta.placement.line_boxes;
    assert_eq!(boxes.len(), 2);
    assert!(boxes.iter().all(|b| b.x_px == 132));
    assert_eq!(boxes[0].y_px, meta.y_px_first_line());
    assert_eq!(boxes[1].y_px - boxes[0].y_px, 72);

    let right = compile(
        "Hi",
        &style(json!({ "textAlign": "right", "fontPx": 64 })),
        frame(),
        None,
    )
    .unwrap();
    let b = right.placement.line_boxes[0];
    assert_eq!(b.x_px, crate::foundation::math::round_px(132.0 + 816.0 - b.width_px));
}

#[test]
fn too_many_lines_is_rejected() {
    let text = (0..60).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
    let err = compile(&text, &Map::new(), frame(), None).unwrap_err();
    assert_eq!(err.code(), "TEXT_TOO_LONG");
    assert_eq!(err.http_status(), 422);

    let mut small = Compiler::new(BuiltinMetrics, CompileOptions { max_lines: 2 });
    assert!(small.compile("a\nb", &Map::new(), frame(), None).is_ok());
    assert!(small.compile("a\nb\nc", &Map::new(), frame(), None).is_err());
}

#[test]
fn y_pct_is_clamped_to_safe_anchor_range() {
    let meta = compile(
        "Top",
        &style(json!({ "yPct": 0.0, "fontPx": 64 })),
        frame(),
        None,
    )
    .unwrap();
    // anchor at 0.10 * 1920 = 192, block centered there: 192 - 32 = 160
    assert_eq!(meta.placement.vertical.anchor_y, 192);
    assert_eq!(meta.y_px_first_line(), 160);
}

#[test]
fn block_taller_than_safe_band_is_pinned_not_rejected() {
    let meta = compile(
        "one\ntwo\nthree\nfour\nfive",
        &style(json!({ "fontPx": 120, "lineSpacingPx": 400 })),
        frame(),
        None,
    )
    .unwrap();
    let v = &meta.placement.vertical;
    assert!(v.overflow);
    assert_eq!(v.safe_top_margin_px, 96);
    assert_eq!(v.y_px_first_line, i64::from(v.safe_top_margin_px));
    assert_eq!(meta.total_text_h, 5 * 120 + 4 * 400);
    assert_eq!(meta.lines.len(), 5);
    check_invariants(&meta).unwrap();
}

#[test]
fn zero_max_lines_is_rejected() {
    let mut compiler = Compiler::new(BuiltinMetrics, CompileOptions { max_lines: 0 });
    let err = compiler.compile("Hi", &Map::new(), frame(), None).unwrap_err();
    assert_eq!(err.code(), "INVALID_REQUEST");
}

#[test]
fn fonts_backend_measures_with_the_process_registry() {
    let config = EngineConfig {
        fonts: crate::config::FontConfig {
            dirs: vec![std::path::PathBuf::from("tests/data/fonts")],
            backend: MeasureBackend::Fonts,
        },
        ..EngineConfig::default()
    };
    let meta = Compiler::from_config(&config)
        .compile("Hello world", &style(json!({ "fontPx": 64 })), frame(), None)
        .unwrap();
    assert!(crate::text::fonts::fonts_ready());
    assert_eq!(meta.lines, vec!["Hello world"]);

    // whichever config won the registry, the compile measured through it
    let mut parley = ParleyMeasurer::new(ensure_fonts_ready_with(&config.fonts));
    let font = FontSpec::from_style(&meta.effective_style);
    let expected = crate::text::measure::measure_line(&mut parley, "Hello world", &font);
    assert_eq!(meta.line_widths, vec![expected]);
}

#[test]
fn raster_mode_records_raster_width() {
    let meta = compile("Hello world", &Map::new(), frame(), raster(600)).unwrap();
    assert_eq!(meta.raster_w, Some(600));
    assert_eq!(meta.max_width_px, 600);
    assert_eq!(meta.placement.geometry.box_left_px, 0);
}

#[test]
fn fingerprint_matches_recomputation_and_tracks_changes() {
    let a = compile("Hello world", &Map::new(), frame(), None).unwrap();
    assert_eq!(a.bundle_fingerprint, a.recompute_fingerprint());
    let b = compile(
        "Hello world",
        &style(json!({ "yPct": 0.7 })),
        frame(),
        None,
    )
    .unwrap();
    assert_ne!(a.bundle_fingerprint, b.bundle_fingerprint);
}

#[test]
fn invariant_check_catches_tampered_height() {
    let mut meta = compile("Hello world", &Map::new(), frame(), None).unwrap();
    meta.total_text_h += 1;
    let err = check_invariants(&meta).unwrap_err();
    assert_eq!(err.code(), "COMPUTATION_INVARIANT_VIOLATION");
}

#[test]
fn stale_check_compares_hashes_and_lines() {
    let stored = compile("Hello world", &Map::new(), frame(), None).unwrap();
    let fresh = compile("Hello world", &Map::new(), frame(), None).unwrap();
    assert!(check_stale(&stored, &fresh).is_ok());

    let restyled = compile(
        "Hello world",
        &style(json!({ "color": "#000000" })),
        frame(),
        None,
    )
    .unwrap();
    assert_eq!(check_stale(&stored, &restyled).unwrap_err().code(), "STALE_META");

    // case-only edits keep the wrap hash but change the lines
    let recased = compile("HELLO WORLD", &Map::new(), frame(), None).unwrap();
    assert_eq!(stored.wrap_hash, recased.wrap_hash);
    assert_eq!(check_stale(&stored, &recased).unwrap_err().code(), "STALE_META");
}

#[test]
fn meta_serializes_with_camel_case_fields() {
    let meta = compile("Hello", &Map::new(), frame(), None).unwrap();
    let v = serde_json::to_value(&meta).unwrap();
    for key in [
        "effectiveStyle",
        "lines",
        "maxWidthPx",
        "totalTextH",
        "styleHash",
        "wrapHash",
        "frameW",
        "frameH",
        "placement",
        "bundleFingerprint",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert!(v["placement"].get("yPxFirstLine").is_some());
    assert_eq!(v["placement"]["xExpr"], "center");
    let back: CompiledCaptionMeta = serde_json::from_value(v).unwrap();
    assert_eq!(back, meta);
}
