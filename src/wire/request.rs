//! Preview request shapes.
//!
//! Two shapes reach the boundary: the v3 request (`ssotVersion: 3`, fractional style, explicit
//! frame and optional raster) and the legacy request (flat keys, percentages in 0..=100, renamed
//! fields). Both translate into one [`CompileInput`]; the compile core never sees a version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::compile::compiler::CompileInput;
use crate::foundation::core::{FrameDims, RasterSpec};
use crate::foundation::error::{CaptionError, CaptionResult};

pub const SSOT_VERSION: u8 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Request {
    pub ssot_version: u8,
    pub text: String,
    #[serde(default)]
    pub style: Map<String, Value>,
    pub frame: FrameDims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<RasterSpec>,
}

/// Flat pre-v3 request. Unrecognized keys are kept and passed to the style resolver, which
/// drops anything outside its whitelist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_h: Option<u32>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Legacy key renames onto canonical style keys. The canonical key wins when both are sent.
const LEGACY_RENAMES: &[(&str, &str)] = &[
    ("sizePx", "fontPx"),
    ("weight", "weightCss"),
    ("align", "textAlign"),
];

/// Legacy keys expressed as percentages (0..=100).
const LEGACY_PERCENT_KEYS: &[&str] = &["xPct", "yPct", "wPct"];

#[derive(Clone, Debug, PartialEq)]
pub enum PreviewRequest {
    V3(V3Request),
    Legacy(LegacyRequest),
}

impl PreviewRequest {
    /// Tag by `ssotVersion`: absent means legacy, `3` means v3, anything else is rejected.
    pub fn from_json(value: Value) -> CaptionResult<Self> {
        let Value::Object(obj) = &value else {
            return Err(CaptionError::serde("preview request must be a JSON object"));
        };
        match obj.get("ssotVersion") {
            None | Some(Value::Null) => serde_json::from_value(value)
                .map(Self::Legacy)
                .map_err(|e| CaptionError::serde(format!("legacy request: {e}"))),
            Some(v) if v.as_u64() == Some(u64::from(SSOT_VERSION)) => serde_json::from_value(value)
                .map(Self::V3)
                .map_err(|e| CaptionError::serde(format!("v3 request: {e}"))),
            Some(other) => Err(CaptionError::serde(format!(
                "unsupported ssotVersion {other}"
            ))),
        }
    }

    pub fn parse(json: &str) -> CaptionResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CaptionError::serde(format!("preview request is not JSON: {e}")))?;
        Self::from_json(value)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Translate into the canonical compile input.
    pub fn into_compile_input(self) -> CaptionResult<CompileInput> {
        match self {
            Self::V3(req) => Ok(CompileInput {
                text: req.text,
                style: req.style,
                frame: FrameDims::new(req.frame.width, req.frame.height)?,
                raster: req.raster,
            }),
            Self::Legacy(req) => req.into_compile_input(),
        }
    }
}

impl LegacyRequest {
    pub fn into_compile_input(self) -> CaptionResult<CompileInput> {
        let default = FrameDims::portrait_hd();
        let frame = FrameDims::new(
            self.frame_w.unwrap_or(default.width),
            self.frame_h.unwrap_or(default.height),
        )?;

        let mut style = self.rest;
        for (legacy, canonical) in LEGACY_RENAMES {
            if let Some(v) = style.remove(*legacy)
                && !style.contains_key(*canonical)
            {
                style.insert((*canonical).to_string(), v);
            }
        }
        for key in LEGACY_PERCENT_KEYS {
            // non-numbers are left for the resolver to reject
            if let Some(pct) = style.get(*key).and_then(Value::as_f64) {
                style.insert((*key).to_string(), Value::from(pct / 100.0));
            }
        }

        Ok(CompileInput {
            text: self.text,
            style,
            frame,
            raster: None,
        })
    }
}

impl<'de> Deserialize<'de> for PreviewRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wire/request.rs"]
mod tests;
