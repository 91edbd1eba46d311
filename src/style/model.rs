use serde::{Deserialize, Serialize};

/// CSS font style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }

    pub fn is_slanted(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Horizontal alignment of each line inside the caption box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Case transform applied to the text before measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Capitalize => "capitalize",
        }
    }

    /// Apply the transform the way CSS `text-transform` does for the scripts we support.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
            Self::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for ch in text.chars() {
                    if ch.is_whitespace() {
                        at_word_start = true;
                        out.push(ch);
                    } else if at_word_start {
                        out.extend(ch.to_uppercase());
                        at_word_start = false;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

/// Vertical placement mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    Top,
    Center,
    Bottom,
    /// Percentage-anchored: `yPct` names the vertical center of the block.
    #[default]
    Custom,
}

impl PlacementMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
            Self::Custom => "custom",
        }
    }
}

/// CSS numeric font weight (100..=900, multiples of 100).
///
/// Serialized as a string (`"700"`) because that is what `font-weight` looks like in the
/// style payloads editors send; deserializes from either a string or a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CssWeight(u16);

impl CssWeight {
    pub const REGULAR: Self = Self(400);
    pub const BOLD: Self = Self(700);

    /// Parse `normal`, `bold`, or a multiple of 100 in `100..=900`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "normal" => return Some(Self::REGULAR),
            "bold" => return Some(Self::BOLD),
            _ => {}
        }
        let n: u16 = s.parse().ok()?;
        Self::from_number(f64::from(n))
    }

    pub fn from_number(n: f64) -> Option<Self> {
        if !n.is_finite() || n.fract() != 0.0 {
            return None;
        }
        let n = n as i64;
        if !(100..=900).contains(&n) || n % 100 != 0 {
            return None;
        }
        Some(Self(n as u16))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for CssWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl std::fmt::Display for CssWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CssWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for CssWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        let parsed = match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Self::from_number(n),
            Repr::Str(s) => Self::parse(&s),
        };
        parsed.ok_or_else(|| {
            serde::de::Error::custom("font weight must be normal, bold, or 100..=900 step 100")
        })
    }
}

/// Fully resolved caption style.
///
/// Produced only by [`crate::resolve_style`]; every field is present and within range. Field
/// names on the wire are camelCase (`fontPx`, `shadowOffsetX`, `wPct`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionStyle {
    // typography
    pub font_family: String,
    pub font_px: u32,
    pub weight_css: CssWeight,
    pub font_style: FontStyle,
    pub letter_spacing_px: f64,
    pub line_spacing_px: u32,

    // paint
    pub color: String,
    pub opacity: f64,
    pub stroke_px: f64,
    pub stroke_color: String,
    pub shadow_blur: f64,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub shadow_color: String,

    // layout
    pub text_align: TextAlign,
    pub text_transform: TextTransform,
    pub w_pct: f64,
    pub internal_padding_px: u32,

    // placement
    pub placement: PlacementMode,
    pub x_pct: f64,
    pub y_pct: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans".to_string(),
            font_px: 48,
            weight_css: CssWeight::REGULAR,
            font_style: FontStyle::Normal,
            letter_spacing_px: 0.0,
            line_spacing_px: 8,

            color: "#FFFFFF".to_string(),
            opacity: 1.0,
            stroke_px: 3.0,
            stroke_color: "rgba(0,0,0,0.85)".to_string(),
            shadow_blur: 12.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 2.0,
            shadow_color: "rgba(0,0,0,0.6)".to_string(),

            text_align: TextAlign::Center,
            text_transform: TextTransform::None,
            w_pct: 0.8,
            internal_padding_px: 24,

            placement: PlacementMode::Custom,
            x_pct: 0.5,
            y_pct: 0.5,
        }
    }
}

impl CaptionStyle {
    /// Line pitch: distance between consecutive line tops.
    pub fn line_pitch_px(&self) -> u32 {
        self.font_px + self.line_spacing_px
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/model.rs"]
mod tests;
