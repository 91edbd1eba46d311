//! Content hashes for staleness checks and cancellation.
//!
//! `styleHash` and `wrapHash` are short SHA-256 prefixes over canonical `key:value` strings, so
//! any runtime can recompute them. Request and bundle fingerprints are 128-bit xxh3 digests used
//! only as opaque equality keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Digest as _;
use xxhash_rust::xxh3::Xxh3;

use crate::compile::compiler::{CompileInput, CompiledCaptionMeta};
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::foundation::math::canonical_number;
use crate::style::model::CaptionStyle;

const XXH3_SEED: u64 = 0x5ca1_ab1e_c0de_f00d;
const SHORT_HASH_LEN: usize = 16;

/// SHA-256 of `canonical`, hex, first 16 characters.
pub fn short_hash(canonical: &str) -> String {
    let digest = sha2::Sha256::digest(canonical.as_bytes());
    let mut out = String::with_capacity(SHORT_HASH_LEN);
    for b in digest.iter().take(SHORT_HASH_LEN / 2) {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn canonical_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(canonical_number).unwrap_or_else(|| n.to_string()),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Sorted `key:value` pairs joined by `|`.
pub fn canonicalize<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut pairs: Vec<(&str, String)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Hash of the whole effective style.
pub fn style_hash(style: &CaptionStyle) -> CaptionResult<String> {
    let Value::Object(map) = serde_json::to_value(style)
        .map_err(|e| CaptionError::serde(format!("serialize style: {e}")))?
    else {
        return Err(CaptionError::invariant("style did not serialize to an object"));
    };
    let canonical = canonicalize(map.iter().map(|(k, v)| (k.as_str(), canonical_value(v))));
    Ok(short_hash(&canonical))
}

/// Text as the wrap hash sees it: trimmed and lower-cased.
///
/// Case-only edits therefore keep the same wrap hash; callers compare lines as well.
pub fn normalize_for_wrap(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Hash of everything that decides line breaks.
pub fn wrap_hash(text: &str, max_width_px: u32, style: &CaptionStyle) -> String {
    let canonical = canonicalize([
        ("normalizedText", normalize_for_wrap(text)),
        ("maxWidthPx", max_width_px.to_string()),
        ("fontFamily", style.font_family.clone()),
        ("fontPx", style.font_px.to_string()),
        ("weightCss", style.weight_css.to_string()),
        ("fontStyle", style.font_style.as_str().to_string()),
        ("letterSpacingPx", canonical_number(style.letter_spacing_px)),
        ("textTransform", style.text_transform.as_str().to_string()),
    ]);
    short_hash(&canonical)
}

/// Opaque 128-bit digest, printed as 32 lower-case hex characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CaptionError::serde(format!("fingerprint must be 32 hex chars, got '{s}'"));
        if s.len() != 32 || !s.is_ascii() {
            return Err(bad());
        }
        let hi = u64::from_str_radix(&s[..16], 16).map_err(|_| bad())?;
        let lo = u64::from_str_radix(&s[16..], 16).map_err(|_| bad())?;
        Ok(Self { hi, lo })
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    /// Type-tagged, length-prefixed JSON. Object keys are written in sorted order.
    fn write_json(&mut self, v: &Value) {
        match v {
            Value::Null => self.write_u8(0),
            Value::Bool(b) => {
                self.write_u8(1);
                self.write_u8(u8::from(*b));
            }
            Value::Number(n) => {
                self.write_u8(2);
                match n.as_f64() {
                    Some(f) => self.write_str(&canonical_number(f)),
                    None => self.write_str(&n.to_string()),
                }
            }
            Value::String(s) => {
                self.write_u8(3);
                self.write_str(s);
            }
            Value::Array(items) => {
                self.write_u8(4);
                self.write_u64(items.len() as u64);
                for item in items {
                    self.write_json(item);
                }
            }
            Value::Object(map) => {
                self.write_u8(5);
                self.write_map(map);
            }
        }
    }

    fn write_map(&mut self, map: &Map<String, Value>) {
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        self.write_u64(entries.len() as u64);
        for (k, v) in entries {
            self.write_str(k);
            self.write_json(v);
        }
    }

    fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Cancellation key for one edit: digest of the canonical compile input.
///
/// Style entries are hashed one by one in sorted key order, each value tagged with its JSON
/// type, so insertion order does not matter but `"64"` and `64` differ.
pub fn request_fingerprint(input: &CompileInput) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_str(&input.text);
    h.write_map(&input.style);

    h.write_u32(input.frame.width);
    h.write_u32(input.frame.height);
    match input.raster {
        Some(r) => {
            h.write_u8(1);
            h.write_u32(r.width);
            match r.padding {
                Some(p) => {
                    h.write_u8(1);
                    h.write_u32(p);
                }
                None => h.write_u8(0),
            }
        }
        None => h.write_u8(0),
    }
    h.finish()
}

/// Digest of every field of `meta` except its own fingerprint.
pub(crate) fn fingerprint_meta(meta: &CompiledCaptionMeta) -> Fingerprint {
    let mut h = StableHasher::new();

    h.write_str(&meta.style_hash);
    h.write_str(&meta.wrap_hash);

    h.write_u32(meta.lines.len() as u32);
    for line in &meta.lines {
        h.write_str(line);
    }
    h.write_u32(meta.line_widths.len() as u32);
    for w in &meta.line_widths {
        h.write_f64(*w);
    }

    h.write_u32(meta.max_width_px);
    h.write_u32(meta.box_width_px);
    h.write_u32(meta.total_text_h);
    h.write_u32(meta.frame_w);
    h.write_u32(meta.frame_h);
    match meta.raster_w {
        Some(w) => {
            h.write_u8(1);
            h.write_u32(w);
        }
        None => h.write_u8(0),
    }

    let p = &meta.placement;
    h.write_str(p.x_expr.as_str());
    h.write_i64(p.vertical.anchor_y);
    h.write_i64(p.vertical.y_px_first_line);
    h.write_u32(p.vertical.safe_top_margin_px);
    h.write_u32(p.vertical.safe_bottom_margin_px);
    h.write_u8(u8::from(p.vertical.overflow));
    h.write_i64(p.geometry.box_left_px);
    h.write_i64(p.geometry.content_left_px);
    h.write_u32(p.line_boxes.len() as u32);
    for b in &p.line_boxes {
        h.write_i64(b.x_px);
        h.write_i64(b.y_px);
    }

    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
