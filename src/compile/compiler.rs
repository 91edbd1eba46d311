use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::compile::fingerprint::{Fingerprint, fingerprint_meta, style_hash, wrap_hash};
use crate::config::{EngineConfig, LimitsConfig, MeasureBackend};
use crate::foundation::core::{FrameDims, RasterSpec};
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::layout::placement::{
    BoxGeometry, LineBox, VerticalPlacement, XExpr, line_boxes, place_block, place_box,
};
use crate::layout::width::{WidthSource, derive_wrap_width};
use crate::style::model::CaptionStyle;
use crate::style::resolve::resolve_style;
use crate::text::fonts::ensure_fonts_ready_with;
use crate::text::measure::{BuiltinMetrics, FontSpec, TextMeasurer};
use crate::text::parley_measure::ParleyMeasurer;
use crate::text::wrap::{block_height, wrap_lines};

/// Anchor range `yPct` is clamped into before placement.
pub const SAFE_ANCHOR_RANGE: (f64, f64) = (0.10, 0.90);

/// Default hard cap on wrapped lines.
pub const DEFAULT_MAX_LINES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub max_lines: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

impl From<&LimitsConfig> for CompileOptions {
    fn from(limits: &LimitsConfig) -> Self {
        Self {
            max_lines: limits.max_lines,
        }
    }
}

/// Everything one compile call needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompileInput {
    pub text: String,
    #[serde(default)]
    pub style: Map<String, Value>,
    pub frame: FrameDims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<RasterSpec>,
}

/// Final geometry of a compiled caption.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub x_expr: XExpr,
    #[serde(flatten)]
    pub vertical: VerticalPlacement,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
    pub line_boxes: Vec<LineBox>,
}

/// The single layout result every renderer consumes.
///
/// Created fresh by each compile and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledCaptionMeta {
    pub effective_style: CaptionStyle,
    pub lines: Vec<String>,
    pub line_widths: Vec<f64>,
    pub max_width_px: u32,
    pub box_width_px: u32,
    pub total_text_h: u32,
    pub style_hash: String,
    pub wrap_hash: String,
    pub frame_w: u32,
    pub frame_h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster_w: Option<u32>,
    pub placement: Placement,
    pub bundle_fingerprint: Fingerprint,
}

impl CompiledCaptionMeta {
    pub fn font_px(&self) -> u32 {
        self.effective_style.font_px
    }

    pub fn line_spacing_px(&self) -> u32 {
        self.effective_style.line_spacing_px
    }

    pub fn y_px_first_line(&self) -> i64 {
        self.placement.vertical.y_px_first_line
    }

    /// Widest measured line.
    pub fn widest_line_px(&self) -> f64 {
        self.line_widths.iter().copied().fold(0.0, f64::max)
    }

    /// Recompute the bundle fingerprint from the current fields.
    pub fn recompute_fingerprint(&self) -> Fingerprint {
        fingerprint_meta(self)
    }
}

/// Compile with the built-in metrics and default options.
pub fn compile(
    text: &str,
    partial_style: &Map<String, Value>,
    frame: FrameDims,
    raster: Option<RasterSpec>,
) -> CaptionResult<CompiledCaptionMeta> {
    compile_with(
        &mut BuiltinMetrics,
        &CompileOptions::default(),
        text,
        partial_style,
        frame,
        raster,
    )
}

/// Pure compile against an explicit measurer.
#[tracing::instrument(
    level = "debug",
    skip(measurer, partial_style, text),
    fields(chars = text.chars().count())
)]
pub fn compile_with<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    options: &CompileOptions,
    text: &str,
    partial_style: &Map<String, Value>,
    frame: FrameDims,
    raster: Option<RasterSpec>,
) -> CaptionResult<CompiledCaptionMeta> {
    if options.max_lines == 0 {
        return Err(CaptionError::serde("compile option 'maxLines' must be >= 1"));
    }
    if text.trim().is_empty() {
        return Err(CaptionError::EmptyText);
    }
    if frame.width == 0 || frame.height == 0 {
        return Err(CaptionError::serde(format!(
            "frame dimensions must be > 0, got {}x{}",
            frame.width, frame.height
        )));
    }

    let style = resolve_style(partial_style)?;
    let source = WidthSource::for_frame(frame, raster);
    let wrap = derive_wrap_width(source, &style);

    let font = FontSpec::from_style(&style);
    let wrapped = wrap_lines(
        measurer,
        text,
        style.text_transform,
        &font,
        f64::from(wrap.max_width_px),
    );
    if wrapped.is_empty() {
        return Err(CaptionError::EmptyText);
    }
    if wrapped.len() > options.max_lines {
        return Err(CaptionError::TextTooLong {
            lines: wrapped.len(),
            max_lines: options.max_lines,
        });
    }

    let total_text_h = block_height(wrapped.len(), style.font_px, style.line_spacing_px);
    let y_pct = style.y_pct.clamp(SAFE_ANCHOR_RANGE.0, SAFE_ANCHOR_RANGE.1);
    let vertical = place_block(style.placement, y_pct, total_text_h, frame.height);

    let x_expr = XExpr::from(style.text_align);
    let geometry = place_box(source, wrap, style.x_pct);
    let line_widths: Vec<f64> = wrapped.iter().map(|l| l.width_px).collect();
    let boxes = line_boxes(
        &line_widths,
        x_expr,
        geometry,
        vertical.y_px_first_line,
        style.font_px,
        style.line_pitch_px(),
    );

    let mut meta = CompiledCaptionMeta {
        style_hash: style_hash(&style)?,
        wrap_hash: wrap_hash(text, wrap.max_width_px, &style),
        effective_style: style,
        lines: wrapped.into_iter().map(|l| l.text).collect(),
        line_widths,
        max_width_px: wrap.max_width_px,
        box_width_px: wrap.box_width_px,
        total_text_h,
        frame_w: frame.width,
        frame_h: frame.height,
        raster_w: raster.map(|r| r.width),
        placement: Placement {
            x_expr,
            vertical,
            geometry,
            line_boxes: boxes,
        },
        bundle_fingerprint: Fingerprint { hi: 0, lo: 0 },
    };
    check_invariants(&meta)?;
    meta.bundle_fingerprint = fingerprint_meta(&meta);

    tracing::debug!(
        lines = meta.lines.len(),
        total_text_h = meta.total_text_h,
        y_px_first_line = meta.y_px_first_line(),
        fingerprint = %meta.bundle_fingerprint,
        "caption compiled"
    );
    Ok(meta)
}

/// Post-compile checks. A failure here is an engine bug, not bad input.
pub fn check_invariants(meta: &CompiledCaptionMeta) -> CaptionResult<()> {
    let fail = |msg: String| {
        tracing::error!(error = %msg, "compiled caption violates layout invariant");
        Err(CaptionError::invariant(msg))
    };

    let n = meta.lines.len();
    if n == 0 {
        return fail("compiled caption has no lines".to_string());
    }
    let expected_h = block_height(n, meta.font_px(), meta.line_spacing_px());
    if meta.total_text_h != expected_h {
        return fail(format!(
            "totalTextH {} != {n}*{} + {}*{} = {expected_h}",
            meta.total_text_h,
            meta.font_px(),
            n - 1,
            meta.line_spacing_px()
        ));
    }
    if meta.line_widths.len() != n || meta.placement.line_boxes.len() != n {
        return fail(format!(
            "line bookkeeping mismatch: {n} lines, {} widths, {} boxes",
            meta.line_widths.len(),
            meta.placement.line_boxes.len()
        ));
    }
    for (line, width) in meta.lines.iter().zip(&meta.line_widths) {
        let single_word = !line.contains(' ');
        if *width > f64::from(meta.max_width_px) && !single_word {
            return fail(format!(
                "line '{line}' is {width}px wide, over maxWidthPx {}",
                meta.max_width_px
            ));
        }
    }

    let v = &meta.placement.vertical;
    if !v.overflow {
        let top = v.y_px_first_line;
        let bottom = top + i64::from(meta.total_text_h);
        let limit = i64::from(meta.frame_h) - i64::from(v.safe_bottom_margin_px);
        if top < i64::from(v.safe_top_margin_px) || bottom > limit {
            return fail(format!(
                "block [{top}, {bottom}] escapes safe band [{}, {limit}]",
                v.safe_top_margin_px
            ));
        }
    }
    Ok(())
}

/// Reject a stored meta that no longer matches a fresh compile of the same inputs.
pub fn check_stale(stored: &CompiledCaptionMeta, fresh: &CompiledCaptionMeta) -> CaptionResult<()> {
    if stored.style_hash != fresh.style_hash {
        return Err(CaptionError::stale(format!(
            "styleHash {} != {}",
            stored.style_hash, fresh.style_hash
        )));
    }
    if stored.wrap_hash != fresh.wrap_hash {
        return Err(CaptionError::stale(format!(
            "wrapHash {} != {}",
            stored.wrap_hash, fresh.wrap_hash
        )));
    }
    if stored.lines != fresh.lines {
        return Err(CaptionError::stale(format!(
            "lines differ: stored {} lines, fresh {} lines",
            stored.lines.len(),
            fresh.lines.len()
        )));
    }
    Ok(())
}

/// Stateful compile entry point owning a measurer.
pub struct Compiler<M> {
    measurer: M,
    options: CompileOptions,
}

impl Compiler<BuiltinMetrics> {
    pub fn builtin() -> Self {
        Self::new(BuiltinMetrics, CompileOptions::default())
    }
}

impl Compiler<Box<dyn TextMeasurer>> {
    /// Build a compiler for the configured backend, registering fonts if needed.
    pub fn from_config(config: &EngineConfig) -> Self {
        let measurer: Box<dyn TextMeasurer> = match config.fonts.backend {
            MeasureBackend::Builtin => Box::new(BuiltinMetrics),
            MeasureBackend::Fonts => {
                Box::new(ParleyMeasurer::new(ensure_fonts_ready_with(&config.fonts)))
            }
        };
        Self::new(measurer, CompileOptions::from(&config.limits))
    }
}

impl<M: TextMeasurer> Compiler<M> {
    pub fn new(measurer: M, options: CompileOptions) -> Self {
        Self { measurer, options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile(
        &mut self,
        text: &str,
        partial_style: &Map<String, Value>,
        frame: FrameDims,
        raster: Option<RasterSpec>,
    ) -> CaptionResult<CompiledCaptionMeta> {
        compile_with(
            &mut self.measurer,
            &self.options,
            text,
            partial_style,
            frame,
            raster,
        )
    }

    pub fn compile_input(&mut self, input: &CompileInput) -> CaptionResult<CompiledCaptionMeta> {
        self.compile(&input.text, &input.style, input.frame, input.raster)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
