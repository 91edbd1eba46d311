use serde::{Deserialize, Serialize};

use crate::foundation::core::{FrameDims, RasterSpec};
use crate::foundation::math::round_px;
use crate::style::model::CaptionStyle;

/// Where the caption box width comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthSource {
    /// Preview-raster path: the raster itself is the box.
    Raster(RasterSpec),
    /// Render path: `round(wPct * frameW)`.
    Fraction { frame_width: u32 },
}

impl WidthSource {
    pub fn for_frame(frame: FrameDims, raster: Option<RasterSpec>) -> Self {
        match raster {
            Some(r) => Self::Raster(r),
            None => Self::Fraction {
                frame_width: frame.width,
            },
        }
    }

    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Raster(_))
    }
}

/// Box and content widths for one compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapWidth {
    pub box_width_px: u32,
    /// Width available to text: box minus padding on both sides, never negative.
    pub max_width_px: u32,
    pub padding_px: u32,
}

/// Derive the wrap width for either path.
pub fn derive_wrap_width(source: WidthSource, style: &CaptionStyle) -> WrapWidth {
    let (box_width_px, padding_px) = match source {
        WidthSource::Raster(raster) => (
            raster.width,
            raster.padding.unwrap_or(style.internal_padding_px),
        ),
        WidthSource::Fraction { frame_width } => {
            let w = round_px(style.w_pct * f64::from(frame_width)).max(0);
            (
                u32::try_from(w).unwrap_or(u32::MAX),
                style.internal_padding_px,
            )
        }
    };
    WrapWidth {
        box_width_px,
        max_width_px: box_width_px.saturating_sub(padding_px.saturating_mul(2)),
        padding_px,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/width.rs"]
mod tests;
