//! Vertical block placement and per-line horizontal positions.
//!
//! All coordinates are integer frame pixels with the origin at the top-left. Rounding goes
//! through [`round_px`] (half-up).

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rect;
use crate::foundation::math::{clamp_prefer_low, round_px};
use crate::layout::width::{WidthSource, WrapWidth};
use crate::style::model::{PlacementMode, TextAlign};

/// Minimum safe margin, in pixels, regardless of frame height.
pub const MIN_SAFE_MARGIN_PX: u32 = 50;
/// Top safe margin as a fraction of frame height.
pub const SAFE_TOP_FRACTION: f64 = 0.05;
/// Bottom safe margin as a fraction of frame height.
pub const SAFE_BOTTOM_FRACTION: f64 = 0.08;

/// Horizontal alignment rule, evaluated per line over a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XExpr {
    Left,
    #[default]
    Center,
    Right,
}

impl From<TextAlign> for XExpr {
    fn from(a: TextAlign) -> Self {
        match a {
            TextAlign::Left => Self::Left,
            TextAlign::Center => Self::Center,
            TextAlign::Right => Self::Right,
        }
    }
}

impl XExpr {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Left edge of a line of `line_width` inside `[box_left, box_left + box_width]`.
    pub fn resolve(self, box_left: f64, box_width: f64, line_width: f64) -> f64 {
        match self {
            Self::Left => box_left,
            Self::Right => box_left + box_width - line_width,
            Self::Center => box_left + (box_width - line_width) / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeMargins {
    pub top_px: u32,
    pub bottom_px: u32,
}

pub fn safe_margins(frame_h: u32) -> SafeMargins {
    let frac = |f: f64| {
        let v = round_px(f * f64::from(frame_h)).max(0);
        u32::try_from(v).unwrap_or(u32::MAX).max(MIN_SAFE_MARGIN_PX)
    };
    SafeMargins {
        top_px: frac(SAFE_TOP_FRACTION),
        bottom_px: frac(SAFE_BOTTOM_FRACTION),
    }
}

/// Vertical position of a text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalPlacement {
    pub anchor_y: i64,
    pub y_px_first_line: i64,
    pub safe_top_margin_px: u32,
    pub safe_bottom_margin_px: u32,
    /// The block is taller than the safe band; it is pinned to the top margin.
    pub overflow: bool,
}

/// Position a block of `total_text_h` pixels in a frame of `frame_h` pixels.
///
/// `y_pct` is the block center for [`PlacementMode::Custom`] and is ignored by the other
/// modes. The result is clamped into the safe band.
pub fn place_block(mode: PlacementMode, y_pct: f64, total_text_h: u32, frame_h: u32) -> VerticalPlacement {
    let margins = safe_margins(frame_h);
    let h = i64::from(total_text_h);
    let frame = i64::from(frame_h);
    let anchor_y = round_px(y_pct * f64::from(frame_h));

    let raw = match mode {
        PlacementMode::Custom => round_px(anchor_y as f64 - h as f64 / 2.0),
        PlacementMode::Top => i64::from(margins.top_px),
        PlacementMode::Bottom => frame - i64::from(margins.bottom_px) - h,
        PlacementMode::Center => round_px((frame - h) as f64 / 2.0),
    };

    let lo = i64::from(margins.top_px);
    let hi = frame - i64::from(margins.bottom_px) - h;
    let overflow = lo > hi;
    if overflow {
        tracing::warn!(
            total_text_h,
            frame_h,
            safe_top = margins.top_px,
            safe_bottom = margins.bottom_px,
            "text block taller than safe band, pinning to top margin"
        );
    }

    VerticalPlacement {
        anchor_y,
        y_px_first_line: clamp_prefer_low(raw, lo, hi),
        safe_top_margin_px: margins.top_px,
        safe_bottom_margin_px: margins.bottom_px,
        overflow,
    }
}

/// Horizontal extent of the caption box and its padded content area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxGeometry {
    pub box_left_px: i64,
    pub box_width_px: u32,
    pub content_left_px: i64,
    pub content_width_px: u32,
}

/// Place the caption box horizontally.
///
/// Raster boxes start at 0. Fractional boxes are centered on `round(xPct * frameW)` and kept
/// inside the frame when they fit.
pub fn place_box(source: WidthSource, wrap: WrapWidth, x_pct: f64) -> BoxGeometry {
    let box_left_px = match source {
        WidthSource::Raster(_) => 0,
        WidthSource::Fraction { frame_width } => {
            let center = round_px(x_pct * f64::from(frame_width));
            let left = round_px(center as f64 - f64::from(wrap.box_width_px) / 2.0);
            let max_left = (i64::from(frame_width) - i64::from(wrap.box_width_px)).max(0);
            left.clamp(0, max_left)
        }
    };
    BoxGeometry {
        box_left_px,
        box_width_px: wrap.box_width_px,
        content_left_px: box_left_px + i64::from(wrap.padding_px),
        content_width_px: wrap.max_width_px,
    }
}

/// Final position of one line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBox {
    pub x_px: i64,
    pub y_px: i64,
    pub width_px: f64,
    pub height_px: u32,
}

impl LineBox {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x_px as f64,
            self.y_px as f64,
            self.x_px as f64 + self.width_px,
            (self.y_px + i64::from(self.height_px)) as f64,
        )
    }
}

/// Lay out lines top to bottom starting at `y_first`, one `pitch` apart.
pub fn line_boxes(
    widths: &[f64],
    x_expr: XExpr,
    geometry: BoxGeometry,
    y_first: i64,
    font_px: u32,
    pitch: u32,
) -> Vec<LineBox> {
    let left = geometry.content_left_px as f64;
    let width = f64::from(geometry.content_width_px);
    widths
        .iter()
        .enumerate()
        .map(|(i, &w)| LineBox {
            x_px: round_px(x_expr.resolve(left, width, w)),
            y_px: y_first + i as i64 * i64::from(pitch),
            width_px: w,
            height_px: font_px,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
