//! Error types for journey operations.

use thiserror::Error;

use crate::journey::JourneyState;

/// Precondition failures raised by the engine.
///
/// None of these are transient: the engine performs no I/O, so retrying the
/// same call with the same inputs fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The journey's lifecycle state forbids the operation.
    #[error("cannot {operation} journey `{journey}`: it is {state}")]
    InvalidState {
        journey: String,
        state: JourneyState,
        operation: &'static str,
    },

    /// Next-track selection was asked to choose from nothing.
    #[error("candidate pool is empty, no next track can be selected")]
    EmptyPool,

    /// A playlist id that does not exist in the favorites collection.
    #[error("no playlist with id `{0}`")]
    UnknownPlaylist(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
