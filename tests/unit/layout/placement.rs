use super::*;
use crate::foundation::core::RasterSpec;
use proptest::prelude::*;

#[test]
fn margins_scale_with_frame_height() {
    assert_eq!(
        safe_margins(1920),
        SafeMargins {
            top_px: 96,
            bottom_px: 154
        }
    );
    // small frames hit the 50px floor
    assert_eq!(
        safe_margins(400),
        SafeMargins {
            top_px: 50,
            bottom_px: 50
        }
    );
}

#[test]
fn custom_centers_block_on_anchor() {
    let p = place_block(PlacementMode::Custom, 0.5, 200, 1920);
    assert_eq!(p.anchor_y, 960);
    assert_eq!(p.y_px_first_line, 860);
    assert!(!p.overflow);
}

#[test]
fn custom_near_top_is_clamped_to_safe_margin() {
    let p = place_block(PlacementMode::Custom, 0.02, 200, 1920);
    assert_eq!(p.y_px_first_line, 96);
}

#[test]
fn custom_near_bottom_is_clamped_above_bottom_margin() {
    let p = place_block(PlacementMode::Custom, 1.0, 200, 1920);
    assert_eq!(p.y_px_first_line, 1920 - 154 - 200);
}

#[test]
fn named_modes() {
    assert_eq!(place_block(PlacementMode::Top, 0.9, 200, 1920).y_px_first_line, 96);
    assert_eq!(
        place_block(PlacementMode::Bottom, 0.1, 200, 1920).y_px_first_line,
        1566
    );
    assert_eq!(
        place_block(PlacementMode::Center, 0.1, 200, 1920).y_px_first_line,
        860
    );
}

#[test]
fn overflow_pins_to_top_margin() {
    let p = place_block(PlacementMode::Custom, 0.5, 1800, 1920);
    assert!(p.overflow);
    assert_eq!(p.y_px_first_line, 96);
}

#[test]
fn x_expr_rules() {
    assert_eq!(XExpr::Left.resolve(10.0, 100.0, 40.0), 10.0);
    assert_eq!(XExpr::Right.resolve(10.0, 100.0, 40.0), 70.0);
    assert_eq!(XExpr::Center.resolve(10.0, 100.0, 40.0), 40.0);
    assert_eq!(XExpr::from(TextAlign::Right), XExpr::Right);
}

#[test]
fn fractional_box_is_centered_and_kept_in_frame() {
    let wrap = WrapWidth {
        box_width_px: 864,
        max_width_px: 816,
        padding_px: 24,
    };
    let src = WidthSource::Fraction { frame_width: 1080 };
    let g = place_box(src, wrap, 0.5);
    assert_eq!(g.box_left_px, 108);
    assert_eq!(g.content_left_px, 132);
    assert_eq!(g.content_width_px, 816);

    assert_eq!(place_box(src, wrap, 0.0).box_left_px, 0);
    assert_eq!(place_box(src, wrap, 1.0).box_left_px, 1080 - 864);
}

#[test]
fn raster_box_starts_at_origin() {
    let wrap = WrapWidth {
        box_width_px: 600,
        max_width_px: 552,
        padding_px: 24,
    };
    let src = WidthSource::Raster(RasterSpec {
        width: 600,
        padding: None,
    });
    let g = place_box(src, wrap, 0.9);
    assert_eq!(g.box_left_px, 0);
    assert_eq!(g.content_left_px, 24);
}

#[test]
fn line_boxes_step_by_pitch() {
    let g = BoxGeometry {
        box_left_px: 0,
        box_width_px: 120,
        content_left_px: 10,
        content_width_px: 100,
    };
    let boxes = line_boxes(&[100.0, 51.0], XExpr::Center, g, 500, 64, 72);
    assert_eq!(boxes[0].x_px, 10);
    assert_eq!(boxes[1].x_px, 35); // 10 + 24.5 rounds half-up
    assert_eq!(boxes[1].y_px, 572);
    let r = boxes[1].rect();
    assert_eq!(r.height(), 64.0);
    assert_eq!(r.width(), 51.0);
}

proptest! {
    #[test]
    fn fitting_blocks_stay_inside_safe_band(y_pct in 0.0f64..=1.0, h in 0u32..=1670) {
        let p = place_block(PlacementMode::Custom, y_pct, h, 1920);
        prop_assert!(!p.overflow);
        prop_assert!(p.y_px_first_line >= i64::from(p.safe_top_margin_px));
        prop_assert!(p.y_px_first_line + i64::from(h) <= 1920 - i64::from(p.safe_bottom_margin_px));
    }
}
