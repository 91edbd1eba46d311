use crate::foundation::error::{CaptionError, CaptionResult};

pub use kurbo::{Point, Rect};

/// Output frame (video canvas) dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameDims {
    pub width: u32,
    pub height: u32,
}

impl FrameDims {
    pub fn new(width: u32, height: u32) -> CaptionResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptionError::serde(format!(
                "frame dimensions must be > 0, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Portrait 1080x1920, the default short-form video frame.
    pub fn portrait_hd() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// Explicit raster target used by the preview-raster path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RasterSpec {
    pub width: u32,
    /// Raster-specific padding. `None` falls back to the style's `internalPaddingPx`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
}
