//! Error types for the tdttt crate

use thiserror::Error;

use crate::tictactoe::{Player, State};

/// Main error type for the tdttt crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("game already completed, cannot make another move")]
    GameAlreadyTerminal,

    #[error("cannot move from '{from}' to '{to}' for player {player:?}")]
    InvalidMove {
        from: State,
        to: State,
        player: Option<Player>,
    },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("cell {position} is not a legal move on '{state}'")]
    IllegalCell { position: usize, state: State },

    #[error("state string has wrong length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("{name} = {value} is outside {range}")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
