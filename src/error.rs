//! Error types for notation parsing and move submission.
//!
//! Programming errors (building a position without both kings, applying the
//! null move) are panics and never appear here.

use thiserror::Error;

/// Errors raised while reading notation or resolving user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// The position notation string is malformed
    #[error("invalid position notation '{notation}': {reason}")]
    InvalidNotation { notation: String, reason: String },

    /// A square name such as `e4` could not be parsed
    #[error("invalid square name '{0}'")]
    InvalidSquare(String),

    /// An unknown piece letter was encountered
    #[error("invalid piece letter '{0}'")]
    InvalidPiece(char),

    /// The board does not hold exactly one king per side
    #[error("expected exactly one king per side, found {white} white and {black} black")]
    KingCount { white: usize, black: usize },

    /// No candidate move matches the requested origin and destination
    #[error("no move from {from} to {to}")]
    NoSuchMove { from: String, to: String },

    /// The background search worker is gone
    #[error("search worker unavailable: {0}")]
    Worker(String),
}

/// Result type alias for chess operations
pub type ChessResult<T> = Result<T, ChessError>;

impl ChessError {
    pub(crate) fn notation(notation: &str, reason: impl Into<String>) -> Self {
        ChessError::InvalidNotation {
            notation: notation.to_string(),
            reason: reason.into(),
        }
    }
}
