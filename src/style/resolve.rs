use serde_json::{Map, Value};

use crate::foundation::error::{CaptionError, CaptionResult};
use crate::style::model::CaptionStyle;
use crate::style::schema::{self, FieldKind};

/// Merge a partial, untrusted style into the documented defaults.
///
/// - Unknown keys are dropped (never an error), so callers cannot smuggle geometry fields.
/// - `null` values count as absent.
/// - Values outside their validation range are rejected with `INVALID_STYLE_FIELD`.
/// - Enforced ranges (currently only `fontPx`, 32..=120) are clamped once, after defaulting.
pub fn resolve_style(partial: &Map<String, Value>) -> CaptionResult<CaptionStyle> {
    let mut merged = match serde_json::to_value(CaptionStyle::default()) {
        Ok(Value::Object(m)) => m,
        Ok(_) => {
            return Err(CaptionError::invariant(
                "default style did not serialize to an object",
            ));
        }
        Err(e) => return Err(CaptionError::serde(format!("serialize default style: {e}"))),
    };

    let mut dropped = Vec::new();
    for (key, raw) in partial {
        let Some(spec) = schema::lookup(key) else {
            dropped.push(key.as_str());
            continue;
        };
        if raw.is_null() {
            continue;
        }
        merged.insert(key.clone(), spec.normalize(raw)?);
    }
    if !dropped.is_empty() {
        tracing::debug!(keys = ?dropped, "dropped non-whitelisted style keys");
    }

    apply_enforced_ranges(&mut merged);

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| CaptionError::invariant(format!("merged style failed to deserialize: {e}")))
}

/// Resolve a style given as an arbitrary JSON value; non-objects resolve to defaults.
pub fn resolve_style_value(partial: &Value) -> CaptionResult<CaptionStyle> {
    match partial {
        Value::Object(m) => resolve_style(m),
        Value::Null => resolve_style(&Map::new()),
        other => Err(CaptionError::invalid_field(
            "style",
            format!("expected an object, got {other}"),
        )),
    }
}

fn apply_enforced_ranges(merged: &mut Map<String, Value>) {
    for spec in schema::FIELDS {
        let FieldKind::Number(rule) = spec.kind else {
            continue;
        };
        let Some((lo, hi)) = rule.enforced else {
            continue;
        };
        let Some(v) = merged.get(spec.name).and_then(Value::as_f64) else {
            continue;
        };
        let clamped = v.clamp(lo, hi);
        if clamped != v {
            tracing::debug!(field = spec.name, from = v, to = clamped, "clamped to enforced range");
        }
        let clamped = if rule.integer {
            Value::from(crate::foundation::math::round_px(clamped))
        } else {
            Value::from(clamped)
        };
        merged.insert(spec.name.to_string(), clamped);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/resolve.rs"]
mod tests;
