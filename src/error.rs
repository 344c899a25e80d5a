//! Error types shared by every pairing component.

use thiserror::Error;

/// Result alias using [`PairingError`].
pub type Result<T> = std::result::Result<T, PairingError>;

/// Failures raised by the history store, energy model, mutator and driver.
///
/// None of these are retried internally. A failed annealing step halts the
/// search and surfaces the error to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairingError {
    /// A configuration broke a structural invariant (duplicate participant,
    /// more than one left-out, wrong parity, mismatch with the active pool).
    #[error("malformed configuration: {0}")]
    MalformedConfiguration(String),

    /// A round was committed out of sequence.
    #[error("invalid round: expected round {expected}, got {got}")]
    InvalidRound { expected: usize, got: usize },

    /// The history is not caught up to the round being evaluated.
    #[error(
        "inconsistent history: cannot evaluate round {current_round} with {columns} committed rounds"
    )]
    InconsistentHistory { current_round: usize, columns: usize },

    #[error("participant {0} already exists")]
    DuplicateParticipant(String),

    #[error("unknown participant {0}")]
    UnknownParticipant(String),

    /// A pair swap needs at least two full pairs.
    #[error("pair swap needs at least two full pairs, found {found}")]
    InsufficientPairs { found: usize },

    /// A numeric parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
