use super::*;

#[test]
fn codes_are_stable() {
    assert_eq!(CaptionError::EmptyText.code(), "EMPTY_TEXT");
    assert_eq!(
        CaptionError::invalid_field("fontPx", "x").code(),
        "INVALID_STYLE_FIELD"
    );
    assert_eq!(
        CaptionError::TextTooLong {
            lines: 51,
            max_lines: 50
        }
        .code(),
        "TEXT_TOO_LONG"
    );
    assert_eq!(
        CaptionError::invariant("x").code(),
        "COMPUTATION_INVARIANT_VIOLATION"
    );
    assert_eq!(CaptionError::stale("x").code(), "STALE_META");
}

#[test]
fn http_status_mapping() {
    assert_eq!(CaptionError::EmptyText.http_status(), 400);
    assert_eq!(CaptionError::invalid_field("fontPx", "x").http_status(), 400);
    assert_eq!(
        CaptionError::TextTooLong {
            lines: 60,
            max_lines: 50
        }
        .http_status(),
        422
    );
    assert_eq!(CaptionError::invariant("x").http_status(), 500);
    assert_eq!(CaptionError::stale("x").http_status(), 409);
}

#[test]
fn display_names_the_field() {
    let err = CaptionError::invalid_field("fontPx", "must be within [8, 400], got 999");
    let s = err.to_string();
    assert!(s.contains("fontPx"));
    assert!(s.contains("999"));
}

#[test]
fn only_stale_and_other_are_retryable() {
    assert!(!CaptionError::EmptyText.is_retryable());
    assert!(!CaptionError::invariant("x").is_retryable());
    assert!(CaptionError::stale("x").is_retryable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
