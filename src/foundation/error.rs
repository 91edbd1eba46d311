/// Convenience result type used across the caption engine.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Error taxonomy returned by the compile boundary and its collaborators.
///
/// Every variant maps onto a stable wire code (see [`CaptionError::code`]) that HTTP-facing
/// callers forward to clients unchanged.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// Input text is empty or whitespace-only after trimming.
    #[error("empty text: caption text must contain at least one non-whitespace character")]
    EmptyText,

    /// A provided style value is outside its validation range or has the wrong type.
    #[error("invalid style field '{field}': {reason}")]
    InvalidStyleField {
        /// Wire name of the offending field (e.g. `fontPx`).
        field: String,
        /// Human-readable description of the violated rule.
        reason: String,
    },

    /// Wrapping produced more lines than the configured hard cap.
    #[error("text too long: wrapped into {lines} lines (max {max_lines})")]
    TextTooLong {
        /// Number of lines the wrapper produced.
        lines: usize,
        /// Hard cap in effect for this compile.
        max_lines: usize,
    },

    /// A post-compile invariant check failed. Indicates an engine bug.
    #[error("computation invariant violation: {0}")]
    InvariantViolation(String),

    /// A stored compiled result no longer matches a fresh recomputation.
    #[error("stale meta: {0}")]
    StaleMeta(String),

    /// Errors when serializing or deserializing wire or config data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build a [`CaptionError::InvalidStyleField`] value.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStyleField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`CaptionError::InvariantViolation`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Build a [`CaptionError::StaleMeta`] value.
    pub fn stale(msg: impl Into<String>) -> Self {
        Self::StaleMeta(msg.into())
    }

    /// Build a [`CaptionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyText => "EMPTY_TEXT",
            Self::InvalidStyleField { .. } => "INVALID_STYLE_FIELD",
            Self::TextTooLong { .. } => "TEXT_TOO_LONG",
            Self::InvariantViolation(_) => "COMPUTATION_INVARIANT_VIOLATION",
            Self::StaleMeta(_) => "STALE_META",
            Self::Serde(_) => "INVALID_REQUEST",
            Self::Other(_) => "INTERNAL",
        }
    }

    /// HTTP status an HTTP-facing collaborator should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::EmptyText | Self::InvalidStyleField { .. } | Self::Serde(_) => 400,
            Self::StaleMeta(_) => 409,
            Self::TextTooLong { .. } => 422,
            Self::InvariantViolation(_) | Self::Other(_) => 500,
        }
    }

    /// Whether retrying the same request unchanged may succeed.
    ///
    /// `STALE_META` is retryable because the caller recompiles before retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleMeta(_) | Self::Other(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
