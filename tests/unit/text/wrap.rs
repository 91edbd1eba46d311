use super::*;
use crate::style::model::{CssWeight, FontStyle};

/// Every glyph is exactly 10px wide at any size.
struct Mono;

impl TextMeasurer for Mono {
    fn advance_px(&mut self, text: &str, _font: &FontSpec) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

fn font(letter_spacing_px: f64) -> FontSpec {
    FontSpec {
        family: "Mono".to_string(),
        size_px: 48.0,
        weight: CssWeight::REGULAR,
        style: FontStyle::Normal,
        letter_spacing_px,
    }
}

fn texts(lines: &[WrappedLine]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn fits_on_one_line() {
    let lines = wrap_lines(&mut Mono, "Hello world", TextTransform::None, &font(0.0), 1000.0);
    assert_eq!(texts(&lines), vec!["Hello world"]);
    assert_eq!(lines[0].width_px, 110.0);
}

#[test]
fn greedy_breaks_at_width() {
    // "aaa bbb" = 70px fits in 70, "aaa bbb ccc" = 110 does not
    let lines = wrap_lines(&mut Mono, "aaa bbb ccc", TextTransform::None, &font(0.0), 70.0);
    assert_eq!(texts(&lines), vec!["aaa bbb", "ccc"]);
    assert!(lines.iter().all(|l| l.width_px <= 70.0));
}

#[test]
fn letter_spacing_counts_toward_width() {
    // "aaa bbb" is 70px + 6 gaps * 2px = 82px
    let lines = wrap_lines(&mut Mono, "aaa bbb", TextTransform::None, &font(2.0), 80.0);
    assert_eq!(texts(&lines), vec!["aaa", "bbb"]);
    assert_eq!(lines[0].width_px, 34.0);
}

#[test]
fn long_word_stays_whole() {
    let lines = wrap_lines(
        &mut Mono,
        "a supercalifragilistic b",
        TextTransform::None,
        &font(0.0),
        50.0,
    );
    assert_eq!(texts(&lines), vec!["a", "supercalifragilistic", "b"]);
    assert_eq!(lines[1].width_px, 200.0);
}

#[test]
fn explicit_breaks_are_respected_and_normalized() {
    let lines = wrap_lines(
        &mut Mono,
        "one\r\ntwo\rthree\nfour",
        TextTransform::None,
        &font(0.0),
        1000.0,
    );
    assert_eq!(texts(&lines), vec!["one", "two", "three", "four"]);
}

#[test]
fn interior_blank_segment_keeps_an_empty_line() {
    let lines = wrap_lines(&mut Mono, "\n\ntop\n\nbottom\n", TextTransform::None, &font(0.0), 1000.0);
    assert_eq!(texts(&lines), vec!["top", "", "bottom"]);
    assert_eq!(lines[1].width_px, 0.0);
}

#[test]
fn runs_of_whitespace_collapse_to_single_spaces() {
    let lines = wrap_lines(&mut Mono, "  a \t  b  ", TextTransform::None, &font(0.0), 1000.0);
    assert_eq!(texts(&lines), vec!["a b"]);
}

#[test]
fn whitespace_only_text_has_no_lines() {
    assert!(wrap_lines(&mut Mono, " \n\t ", TextTransform::None, &font(0.0), 100.0).is_empty());
}

#[test]
fn transform_is_applied_before_measuring() {
    let lines = wrap_lines(&mut Mono, "make it loud", TextTransform::Uppercase, &font(0.0), 1000.0);
    assert_eq!(texts(&lines), vec!["MAKE IT LOUD"]);
}

#[test]
fn zero_width_puts_every_word_on_its_own_line() {
    let lines = wrap_lines(&mut Mono, "a b c", TextTransform::None, &font(0.0), 0.0);
    assert_eq!(texts(&lines), vec!["a", "b", "c"]);
}

#[test]
fn block_height_formula() {
    assert_eq!(block_height(0, 64, 8), 0);
    assert_eq!(block_height(1, 64, 8), 64);
    assert_eq!(block_height(3, 64, 8), 3 * 64 + 2 * 8);
}
