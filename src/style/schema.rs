//! Whitelist of style fields with their validation and enforced ranges.
//!
//! The validation range is what the API boundary accepts; anything outside is rejected. The
//! enforced range is narrower and is clamped onto after defaulting, for layout safety. The two
//! tiers are intentionally kept separate: stored sessions may carry values that were valid when
//! written but are no longer safe to lay out.

use serde_json::Value;

use crate::foundation::error::{CaptionError, CaptionResult};
use crate::style::model::CssWeight;

#[derive(Clone, Copy, Debug)]
pub(crate) struct NumberRule {
    pub(crate) min: f64,
    pub(crate) max: f64,
    /// Round to an integer after validation.
    pub(crate) integer: bool,
    pub(crate) enforced: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum FieldKind {
    Number(NumberRule),
    Choice(&'static [&'static str]),
    Color,
    FontFamily,
    Weight,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) kind: FieldKind,
}

/// Font size accepted at the boundary.
pub const FONT_PX_VALIDATION: (f64, f64) = (8.0, 400.0);
/// Font size used for layout after merge.
pub const FONT_PX_ENFORCED: (f64, f64) = (32.0, 120.0);

const fn num(min: f64, max: f64) -> FieldKind {
    FieldKind::Number(NumberRule {
        min,
        max,
        integer: false,
        enforced: None,
    })
}

const fn int(min: f64, max: f64) -> FieldKind {
    FieldKind::Number(NumberRule {
        min,
        max,
        integer: true,
        enforced: None,
    })
}

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "fontFamily",
        kind: FieldKind::FontFamily,
    },
    FieldSpec {
        name: "fontPx",
        kind: FieldKind::Number(NumberRule {
            min: FONT_PX_VALIDATION.0,
            max: FONT_PX_VALIDATION.1,
            integer: true,
            enforced: Some(FONT_PX_ENFORCED),
        }),
    },
    FieldSpec {
        name: "weightCss",
        kind: FieldKind::Weight,
    },
    FieldSpec {
        name: "fontStyle",
        kind: FieldKind::Choice(&["normal", "italic", "oblique"]),
    },
    FieldSpec {
        name: "letterSpacingPx",
        kind: num(-20.0, 100.0),
    },
    FieldSpec {
        name: "lineSpacingPx",
        kind: int(0.0, 400.0),
    },
    FieldSpec {
        name: "color",
        kind: FieldKind::Color,
    },
    FieldSpec {
        name: "opacity",
        kind: num(0.0, 1.0),
    },
    FieldSpec {
        name: "strokePx",
        kind: num(0.0, 20.0),
    },
    FieldSpec {
        name: "strokeColor",
        kind: FieldKind::Color,
    },
    FieldSpec {
        name: "shadowBlur",
        kind: num(0.0, 100.0),
    },
    FieldSpec {
        name: "shadowOffsetX",
        kind: num(-100.0, 100.0),
    },
    FieldSpec {
        name: "shadowOffsetY",
        kind: num(-100.0, 100.0),
    },
    FieldSpec {
        name: "shadowColor",
        kind: FieldKind::Color,
    },
    FieldSpec {
        name: "textAlign",
        kind: FieldKind::Choice(&["left", "center", "right"]),
    },
    FieldSpec {
        name: "textTransform",
        kind: FieldKind::Choice(&["none", "uppercase", "lowercase", "capitalize"]),
    },
    FieldSpec {
        name: "wPct",
        kind: num(0.1, 1.0),
    },
    FieldSpec {
        name: "internalPaddingPx",
        kind: int(0.0, 400.0),
    },
    FieldSpec {
        name: "placement",
        kind: FieldKind::Choice(&["top", "center", "bottom", "custom"]),
    },
    FieldSpec {
        name: "xPct",
        kind: num(0.0, 1.0),
    },
    FieldSpec {
        name: "yPct",
        kind: num(0.0, 1.0),
    },
];

pub(crate) fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

impl FieldSpec {
    /// Validate a raw wire value and return its normalized JSON form.
    pub(crate) fn normalize(&self, raw: &Value) -> CaptionResult<Value> {
        match self.kind {
            FieldKind::Number(rule) => {
                let Some(v) = raw.as_f64() else {
                    return Err(CaptionError::invalid_field(
                        self.name,
                        format!("expected a number, got {}", json_type(raw)),
                    ));
                };
                if !v.is_finite() || v < rule.min || v > rule.max {
                    return Err(CaptionError::invalid_field(
                        self.name,
                        format!("must be within [{}, {}], got {v}", rule.min, rule.max),
                    ));
                }
                if rule.integer {
                    Ok(Value::from(crate::foundation::math::round_px(v)))
                } else {
                    Ok(Value::from(v))
                }
            }
            FieldKind::Choice(allowed) => {
                let s = expect_str(self.name, raw)?.trim().to_ascii_lowercase();
                if allowed.contains(&s.as_str()) {
                    Ok(Value::String(s))
                } else {
                    Err(CaptionError::invalid_field(
                        self.name,
                        format!("must be one of {}, got '{s}'", allowed.join("|")),
                    ))
                }
            }
            FieldKind::Color => {
                let s = expect_str(self.name, raw)?.trim();
                if is_css_color(s) {
                    Ok(Value::String(s.to_string()))
                } else {
                    Err(CaptionError::invalid_field(
                        self.name,
                        format!("not a supported CSS color: '{s}'"),
                    ))
                }
            }
            FieldKind::FontFamily => {
                let s = expect_str(self.name, raw)?.trim();
                if s.is_empty() || s.chars().count() > 128 || s.chars().any(char::is_control) {
                    return Err(CaptionError::invalid_field(
                        self.name,
                        "must be a non-empty family name of at most 128 printable characters",
                    ));
                }
                Ok(Value::String(s.to_string()))
            }
            FieldKind::Weight => {
                let parsed = match raw {
                    Value::Number(n) => n.as_f64().and_then(CssWeight::from_number),
                    Value::String(s) => CssWeight::parse(s),
                    _ => None,
                };
                parsed
                    .map(|w| Value::String(w.to_string()))
                    .ok_or_else(|| {
                        CaptionError::invalid_field(
                            self.name,
                            "must be normal, bold, or 100..=900 in steps of 100",
                        )
                    })
            }
        }
    }
}

fn expect_str<'a>(field: &str, raw: &'a Value) -> CaptionResult<&'a str> {
    raw.as_str().ok_or_else(|| {
        CaptionError::invalid_field(field, format!("expected a string, got {}", json_type(raw)))
    })
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// CSS named colors plus `transparent` and `currentcolor`, sorted for binary search.
const CSS_NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "currentcolor", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo", "ivory",
    "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue", "lightcoral",
    "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink",
    "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey",
    "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon",
    "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue",
    "mintcream", "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab",
    "orange", "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise",
    "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple",
    "rebeccapurple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown",
    "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue", "slategray", "slategrey",
    "snow", "springgreen", "steelblue", "tan", "teal", "thistle", "tomato", "transparent",
    "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow", "yellowgreen",
];

/// Accepts hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()` with numeric
/// components, and CSS named colors (ASCII case-insensitive).
pub(crate) fn is_css_color(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    let lower = s.to_ascii_lowercase();
    let (body, expected) = if let Some(b) = lower.strip_prefix("rgba(") {
        (b, 4)
    } else if let Some(b) = lower.strip_prefix("rgb(") {
        (b, 3)
    } else {
        return CSS_NAMED_COLORS.binary_search(&lower.as_str()).is_ok();
    };

    let Some(body) = body.strip_suffix(')') else {
        return false;
    };
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return false;
    }
    parts.iter().enumerate().all(|(i, p)| match p.parse::<f64>() {
        Ok(v) if i < 3 => (0.0..=255.0).contains(&v),
        Ok(v) => (0.0..=1.0).contains(&v),
        Err(_) => false,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/style/schema.rs"]
mod tests;
