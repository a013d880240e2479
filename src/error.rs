//! Error types for the notation and deal-construction boundary.
//!
//! Everything else in the solver (programming-contract violations such as
//! playing a card that is not a valid play) is a bug, not a recoverable
//! condition, and is reported via `debug_assert!`/`assert!` instead.

use thiserror::Error;

/// Errors surfaced while parsing or constructing a deal from its external
/// (human-readable) representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// A hand, card, suit, rank, or trick string was malformed.
    #[error("parse error at character {position}: {message}")]
    Parse { message: String, position: usize },

    /// The four hands were not all the same size, or were not pairwise
    /// disjoint.
    #[error("invalid deal: {0}")]
    InvalidDeal(String),
}

impl NotationError {
    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        NotationError::Parse {
            message: message.into(),
            position,
        }
    }
}
