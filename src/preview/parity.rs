//! Gate that decides whether a rasterized preview may replace the live text layer.

use serde::{Deserialize, Serialize};

use crate::compile::compiler::CompiledCaptionMeta;
use crate::config::ParityConfig;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityTolerances {
    /// Width and top.
    pub layout_px: f64,
    /// Font size and line height.
    pub typography_px: f64,
}

impl Default for ParityTolerances {
    fn default() -> Self {
        Self {
            layout_px: 2.0,
            typography_px: 1.0,
        }
    }
}

impl From<&ParityConfig> for ParityTolerances {
    fn from(cfg: &ParityConfig) -> Self {
        Self {
            layout_px: cfg.layout_tolerance_px,
            typography_px: cfg.typography_tolerance_px,
        }
    }
}

/// Geometry the compile predicts, already in the consumer's pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedGeometry {
    pub expected_width: f64,
    pub expected_font_size_px: f64,
    pub expected_line_height_px: f64,
    pub expected_top_px: f64,
}

impl ExpectedGeometry {
    /// Derive from a compiled meta, multiplying every dimension by `scale`
    /// (consumer pixels per frame pixel).
    pub fn from_meta(meta: &CompiledCaptionMeta, scale: f64) -> Self {
        Self {
            expected_width: meta.widest_line_px() * scale,
            expected_font_size_px: f64::from(meta.font_px()) * scale,
            expected_line_height_px: f64::from(meta.effective_style.line_pitch_px()) * scale,
            expected_top_px: meta.y_px_first_line() as f64 * scale,
        }
    }
}

/// Geometry a client measured on its rendered layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredGeometry {
    pub width: f64,
    pub font_size_px: f64,
    pub line_height_px: f64,
    pub top_px: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParityDimension {
    Width,
    Top,
    FontSize,
    LineHeight,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityMismatch {
    pub dimension: ParityDimension,
    pub expected: f64,
    pub measured: f64,
    pub tolerance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityReport {
    pub mismatches: Vec<ParityMismatch>,
}

impl ParityReport {
    /// Only a passing report allows swapping the live layer for the raster.
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ParityGate {
    tolerances: ParityTolerances,
}

impl ParityGate {
    pub fn new(tolerances: ParityTolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> ParityTolerances {
        self.tolerances
    }

    pub fn check(&self, expected: &ExpectedGeometry, measured: &MeasuredGeometry) -> ParityReport {
        let t = self.tolerances;
        let dims = [
            (ParityDimension::Width, expected.expected_width, measured.width, t.layout_px),
            (ParityDimension::Top, expected.expected_top_px, measured.top_px, t.layout_px),
            (
                ParityDimension::FontSize,
                expected.expected_font_size_px,
                measured.font_size_px,
                t.typography_px,
            ),
            (
                ParityDimension::LineHeight,
                expected.expected_line_height_px,
                measured.line_height_px,
                t.typography_px,
            ),
        ];

        let mismatches: Vec<ParityMismatch> = dims
            .into_iter()
            .filter(|(_, e, m, tol)| !within(*e, *m, *tol))
            .map(|(dimension, expected, measured, tolerance)| ParityMismatch {
                dimension,
                expected,
                measured,
                tolerance,
            })
            .collect();

        if !mismatches.is_empty() {
            tracing::debug!(?mismatches, "parity check failed, keeping live layer");
        }
        ParityReport { mismatches }
    }
}

/// False for NaN deltas, so non-finite measurements never pass.
fn within(expected: f64, measured: f64, tolerance: f64) -> bool {
    (expected - measured).abs() <= tolerance
}

#[cfg(test)]
#[path = "../../tests/unit/preview/parity.rs"]
mod tests;
