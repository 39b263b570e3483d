//! Error types for the NSM crate

use thiserror::Error;

/// Main error type for the NSM crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state machine generation failed to reach full connectivity after {attempts} attempts")]
    GenerationFailed { attempts: usize },

    #[error("action '{action}' is not in the environment's alphabet")]
    InvalidAction { action: char },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state {state} has no path to the goal")]
    UnreachableState { state: usize },

    #[error("episodic memory is missing its sentinel entry")]
    MissingSentinel,

    #[error("path reaches the goal from only {reached} of {expected} starting states")]
    PathDoesNotCoverAllStates { reached: usize, expected: usize },

    #[error("blind path search exhausted its frontier without covering every state")]
    SearchExhausted,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
