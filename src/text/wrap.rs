use crate::style::model::TextTransform;
use crate::text::measure::{FontSpec, TextMeasurer, measure_line};

/// One output line with its measured width.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width_px: f64,
}

/// Normalize `\r\n` and lone `\r` to `\n`.
pub fn normalize_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Greedy word wrap.
///
/// The text is trimmed, transformed, and split on explicit breaks; each segment wraps on its
/// own. A word wider than `max_width_px` is kept whole on its own line. An interior blank
/// segment yields an empty line. Returns no lines for whitespace-only input.
pub fn wrap_lines<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    text: &str,
    transform: TextTransform,
    font: &FontSpec,
    max_width_px: f64,
) -> Vec<WrappedLine> {
    let normalized = normalize_breaks(text);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let transformed = transform.apply(trimmed);

    let mut out = Vec::new();
    for segment in transformed.split('\n') {
        wrap_segment(measurer, segment, font, max_width_px, &mut out);
    }
    out
}

fn wrap_segment<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    segment: &str,
    font: &FontSpec,
    max_width_px: f64,
    out: &mut Vec<WrappedLine>,
) {
    let mut current = String::new();
    let mut current_w = 0.0;

    for word in segment.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            current_w = measure_line(measurer, &current, font);
            continue;
        }
        let candidate = format!("{current} {word}");
        let candidate_w = measure_line(measurer, &candidate, font);
        if candidate_w > max_width_px {
            out.push(WrappedLine {
                text: std::mem::take(&mut current),
                width_px: current_w,
            });
            current.push_str(word);
            current_w = measure_line(measurer, &current, font);
        } else {
            current = candidate;
            current_w = candidate_w;
        }
    }

    // flushes the trailing line, or an empty one for a blank segment
    out.push(WrappedLine {
        text: current,
        width_px: current_w,
    });
}

/// `n*fontPx + (n-1)*lineSpacingPx`; zero lines have zero height.
pub fn block_height(lines: usize, font_px: u32, line_spacing_px: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let n = u32::try_from(lines).unwrap_or(u32::MAX);
    n.saturating_mul(font_px)
        .saturating_add((n - 1).saturating_mul(line_spacing_px))
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
