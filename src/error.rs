use thiserror::Error;

/// Errors surfaced before any score is computed. Scoring itself is
/// infallible: empty or non-matching inputs rank as 0.0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// The host handed over a weight array that is not one-dimensional.
    /// Unreachable through the slice-based constructors, kept for callers
    /// that map database arrays onto [`crate::rank::Weights`].
    #[error("array of weight must be one-dimensional")]
    WeightArrayNotOneDimensional,

    #[error("array of weight is too short")]
    WeightArrayTooShort,

    #[error("array of weight must not contain nulls")]
    WeightArrayContainsNulls,

    #[error("weight out of range")]
    WeightOutOfRange,

    #[error("syntax error in {kind} at or near position {position}: {message}")]
    SyntaxError {
        kind: SyntaxKind,
        position: usize,
        message: String,
    },
}

/// Which literal a [`RankError::SyntaxError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    TsVector,
    TsQuery,
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxKind::TsVector => write!(f, "tsvector"),
            SyntaxKind::TsQuery => write!(f, "tsquery"),
        }
    }
}

pub type RankResult<T> = Result<T, RankError>;
