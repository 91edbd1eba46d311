use crate::style::model::{CaptionStyle, CssWeight, FontStyle};

/// Font description consumed by measurers.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
    pub weight: CssWeight,
    pub style: FontStyle,
    pub letter_spacing_px: f64,
}

impl FontSpec {
    pub fn from_style(style: &CaptionStyle) -> Self {
        Self {
            family: style.font_family.clone(),
            size_px: f64::from(style.font_px),
            weight: style.weight_css,
            style: style.font_style,
            letter_spacing_px: style.letter_spacing_px,
        }
    }
}

/// Measures the horizontal advance of a single line of text.
///
/// Implementors only report glyph advances; letter spacing is added by [`measure_line`] so
/// every backend applies it the same way.
pub trait TextMeasurer {
    /// Sum of glyph advances for `text`, in pixels, without letter spacing.
    fn advance_px(&mut self, text: &str, font: &FontSpec) -> f64;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &mut M {
    fn advance_px(&mut self, text: &str, font: &FontSpec) -> f64 {
        (**self).advance_px(text, font)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Box<M> {
    fn advance_px(&mut self, text: &str, font: &FontSpec) -> f64 {
        (**self).advance_px(text, font)
    }
}

/// Width of a line: glyph advances plus `letterSpacingPx` between consecutive glyphs
/// (not after the last one).
pub fn measure_line<M: TextMeasurer + ?Sized>(measurer: &mut M, text: &str, font: &FontSpec) -> f64 {
    let glyphs = text.chars().count();
    if glyphs == 0 {
        return 0.0;
    }
    let spacing = font.letter_spacing_px * (glyphs - 1) as f64;
    measurer.advance_px(text, font) + spacing
}

/// Family the built-in advance table was derived from.
pub const BUILTIN_FAMILY: &str = "DejaVu Sans";

/// Deterministic per-glyph advance table.
///
/// Advances are in em units for the regular weight of [`BUILTIN_FAMILY`] and are scaled by
/// font size and a weight factor. The table is the same in every runtime that embeds it, so a
/// browser overlay and the server compile agree on line breaks without sharing a font stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinMetrics;

// U+0020..=U+007E
const ASCII_EM: [f64; 95] = [
    0.318, 0.401, 0.460, 0.838, 0.636, 0.950, 0.780, 0.275, // space ! " # $ % & '
    0.390, 0.390, 0.500, 0.838, 0.318, 0.361, 0.318, 0.337, // ( ) * + , - . /
    0.636, 0.636, 0.636, 0.636, 0.636, 0.636, 0.636, 0.636, // 0-7
    0.636, 0.636, 0.337, 0.337, 0.838, 0.838, 0.838, 0.531, // 8 9 : ; < = > ?
    1.000, 0.684, 0.686, 0.698, 0.770, 0.632, 0.575, 0.775, // @ A-G
    0.752, 0.295, 0.295, 0.656, 0.557, 0.863, 0.748, 0.787, // H-O
    0.603, 0.787, 0.695, 0.635, 0.611, 0.732, 0.684, 0.989, // P-W
    0.685, 0.611, 0.685, 0.390, 0.337, 0.390, 0.838, 0.500, // X Y Z [ \ ] ^ _
    0.500, 0.613, 0.635, 0.550, 0.635, 0.615, 0.352, 0.635, // ` a-g
    0.634, 0.278, 0.278, 0.579, 0.278, 0.974, 0.634, 0.612, // h-o
    0.635, 0.635, 0.411, 0.521, 0.392, 0.634, 0.592, 0.818, // p-w
    0.592, 0.592, 0.525, 0.636, 0.337, 0.636, 0.838, // x y z { | } ~
];

const SPACE_EM: f64 = 0.318;
const FALLBACK_EM: f64 = 0.6;

impl BuiltinMetrics {
    /// Advance of one character in em units at regular weight.
    pub fn char_em(ch: char) -> f64 {
        let cp = ch as u32;
        if (0x20..=0x7e).contains(&cp) {
            return ASCII_EM[(cp - 0x20) as usize];
        }
        if is_zero_width(cp) {
            return 0.0;
        }
        if ch.is_whitespace() {
            return SPACE_EM;
        }
        if is_wide(cp) {
            return 1.0;
        }
        if ch.is_uppercase() {
            return 0.70;
        }
        if ch.is_alphabetic() {
            return 0.60;
        }
        FALLBACK_EM
    }

    /// Synthetic emboldening widens advances.
    pub fn weight_factor(weight: CssWeight) -> f64 {
        match weight.value() {
            0..=500 => 1.0,
            501..=600 => 1.06,
            _ => 1.1,
        }
    }
}

impl TextMeasurer for BuiltinMetrics {
    fn advance_px(&mut self, text: &str, font: &FontSpec) -> f64 {
        let em: f64 = text.chars().map(Self::char_em).sum();
        em * font.size_px * Self::weight_factor(font.weight)
    }
}

fn is_zero_width(cp: u32) -> bool {
    matches!(cp,
        0x0300..=0x036f // combining diacritics
        | 0x200b..=0x200d // zero-width space / joiners
        | 0xfe00..=0xfe0f // variation selectors
        | 0x00ad // soft hyphen
    )
}

fn is_wide(cp: u32) -> bool {
    matches!(cp,
        0x1100..=0x115f
        | 0x2e80..=0xa4cf
        | 0xac00..=0xd7a3
        | 0xf900..=0xfaff
        | 0xfe30..=0xfe4f
        | 0xff00..=0xff60
        | 0xffe0..=0xffe6
        | 0x1f300..=0x1faff
        | 0x20000..=0x3fffd
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
