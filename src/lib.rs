//! Caption compilation and placement engine.
//!
//! Given raw caption text and a partial style, [`compile`] deterministically produces the wrapped
//! lines, the pixel geometry of every line and the hashes that let independent renderers (a live
//! text overlay, a rasterized preview and a video-burn compositor) agree on one layout.
//!
//! - Resolve a partial style with [`resolve_style`]
//! - Compile with [`compile`] or a configured [`Compiler`]
//! - Exchange results over the wire with [`PreviewRequest`] and [`PreviewResponse`]
//! - Gate raster swaps with [`ParityGate`] and debounce edits with [`PreviewSession`]
#![forbid(unsafe_code)]

mod compile;
mod foundation;
mod layout;
mod preview;
mod store;
mod style;
mod text;
mod wire;

/// Engine configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;

pub use crate::foundation::core::{FrameDims, Point, RasterSpec, Rect};
pub use crate::foundation::error::{CaptionError, CaptionResult};

pub use crate::compile::batch::compile_beats;
pub use crate::compile::compiler::{
    CompileInput, CompileOptions, CompiledCaptionMeta, Compiler, DEFAULT_MAX_LINES, Placement,
    SAFE_ANCHOR_RANGE, check_invariants, check_stale, compile, compile_with,
};
pub use crate::compile::fingerprint::{
    Fingerprint, normalize_for_wrap, request_fingerprint, style_hash, wrap_hash,
};
pub use crate::config::EngineConfig;
pub use crate::layout::placement::{
    BoxGeometry, LineBox, SafeMargins, VerticalPlacement, XExpr, line_boxes, place_block,
    place_box, safe_margins,
};
pub use crate::layout::width::{WidthSource, WrapWidth, derive_wrap_width};
pub use crate::preview::parity::{
    ExpectedGeometry, MeasuredGeometry, ParityDimension, ParityGate, ParityMismatch, ParityReport,
    ParityTolerances,
};
pub use crate::preview::session::{Dispatch, PreviewSession, ResponseDisposition};
pub use crate::store::meta::{InMemoryMetaStore, MetaKey, MetaSource, MetaStore, load_or_compile};
pub use crate::style::model::{
    CaptionStyle, CssWeight, FontStyle, PlacementMode, TextAlign, TextTransform,
};
pub use crate::style::resolve::{resolve_style, resolve_style_value};
pub use crate::style::schema::{FONT_PX_ENFORCED, FONT_PX_VALIDATION};
pub use crate::text::fonts::{
    FontRegistry, RegisteredFace, ensure_fonts_ready, ensure_fonts_ready_with, fonts_ready,
};
pub use crate::text::measure::{
    BUILTIN_FAMILY, BuiltinMetrics, FontSpec, TextMeasurer, measure_line,
};
pub use crate::text::parley_measure::ParleyMeasurer;
pub use crate::text::wrap::{WrappedLine, block_height, wrap_lines};
pub use crate::wire::request::{LegacyRequest, PreviewRequest, SSOT_VERSION, V3Request};
pub use crate::wire::response::{LegacyPreviewResponse, PreviewResponse};
