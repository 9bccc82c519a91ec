//! Error types for identifier parsing and generation.

use thiserror::Error;

/// Errors produced while creating or parsing a [`Lid`](crate::Lid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LidError {
    /// The string form of an identifier is malformed.
    #[error("Invalid LID '{input}': {reason}")]
    Format { input: String, reason: FormatReason },

    /// The system clock reports a time before the Unix epoch.
    #[error("System clock is unavailable: {0}")]
    Clock(String),
}

impl LidError {
    pub(crate) fn format(input: &str, reason: FormatReason) -> Self {
        LidError::Format {
            input: input.to_string(),
            reason,
        }
    }

    /// True for malformed input, false for clock failures.
    pub fn is_format(&self) -> bool {
        matches!(self, LidError::Format { .. })
    }
}

/// Why a LID string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatReason {
    #[error("expected exactly one '-' separator")]
    Separator,

    #[error("empty symbol group")]
    EmptyGroup,

    #[error("invalid base32 symbol {0:?}")]
    InvalidSymbol(char),

    #[error("value does not fit into 64 bits")]
    Overflow,

    #[error("random part exceeds 22 bits")]
    RandomOutOfRange,

    #[error("timestamp part exceeds 42 bits")]
    TimestampOutOfRange,
}
