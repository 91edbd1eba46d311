use serde::{Deserialize, Serialize};

use crate::compile::compiler::{CompileInput, CompiledCaptionMeta};
use crate::compile::fingerprint::{Fingerprint, request_fingerprint};
use crate::foundation::math::round_px;
use crate::wire::request::SSOT_VERSION;

/// Canonical preview response.
///
/// `fingerprint` is the request fingerprint the response was computed for; clients drop any
/// response whose fingerprint is not their latest edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub ssot_version: u8,
    pub lines: Vec<String>,
    pub font_px: u32,
    pub line_spacing_px: u32,
    pub total_text_h: u32,
    pub y_px_first_line: i64,
    pub max_width_px: u32,
    pub style_hash: String,
    pub wrap_hash: String,
    pub frame_w: u32,
    pub frame_h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster_w: Option<u32>,
    pub fingerprint: Fingerprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_fingerprint: Option<Fingerprint>,
}

impl PreviewResponse {
    pub fn from_meta(meta: &CompiledCaptionMeta, request: Fingerprint) -> Self {
        Self {
            ssot_version: SSOT_VERSION,
            lines: meta.lines.clone(),
            font_px: meta.font_px(),
            line_spacing_px: meta.line_spacing_px(),
            total_text_h: meta.total_text_h,
            y_px_first_line: meta.y_px_first_line(),
            max_width_px: meta.max_width_px,
            style_hash: meta.style_hash.clone(),
            wrap_hash: meta.wrap_hash.clone(),
            frame_w: meta.frame_w,
            frame_h: meta.frame_h,
            raster_w: meta.raster_w,
            fingerprint: request,
            bundle_fingerprint: Some(meta.bundle_fingerprint),
        }
    }

    pub fn to_legacy(&self) -> LegacyPreviewResponse {
        let y_pct = if self.frame_h == 0 {
            0.0
        } else {
            self.y_px_first_line as f64 / f64::from(self.frame_h) * 100.0
        };
        LegacyPreviewResponse {
            lines: self.lines.clone(),
            font_px: self.font_px,
            line_spacing_px: self.line_spacing_px,
            total_text_h: self.total_text_h,
            y_pct,
            max_width_px: self.max_width_px,
            frame_h: self.frame_h,
            style_hash: self.style_hash.clone(),
            wrap_hash: self.wrap_hash.clone(),
        }
    }
}

/// Pre-v3 response: the first-line top as a percentage of frame height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPreviewResponse {
    pub lines: Vec<String>,
    pub font_px: u32,
    pub line_spacing_px: u32,
    pub total_text_h: u32,
    /// First-line top, 0..=100.
    pub y_pct: f64,
    pub max_width_px: u32,
    pub frame_h: u32,
    pub style_hash: String,
    pub wrap_hash: String,
}

impl LegacyPreviewResponse {
    /// Lift into the v3 shape. Fields the legacy shape lacks come from the request.
    pub fn into_v3(self, request: &CompileInput) -> PreviewResponse {
        PreviewResponse {
            ssot_version: SSOT_VERSION,
            y_px_first_line: round_px(self.y_pct / 100.0 * f64::from(self.frame_h)),
            lines: self.lines,
            font_px: self.font_px,
            line_spacing_px: self.line_spacing_px,
            total_text_h: self.total_text_h,
            max_width_px: self.max_width_px,
            style_hash: self.style_hash,
            wrap_hash: self.wrap_hash,
            frame_w: request.frame.width,
            frame_h: self.frame_h,
            raster_w: request.raster.map(|r| r.width),
            fingerprint: request_fingerprint(request),
            bundle_fingerprint: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wire/response.rs"]
mod tests;
