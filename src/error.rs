//! Error types for the Pokedex
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Pokedex Error Enum ==
/// Unified error type for the Pokedex.
#[derive(Error, Debug)]
pub enum PokedexError {
    /// Invalid configuration (cache interval, timeouts, runtime)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport-level HTTP failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Terminal I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command was invoked without its required argument
    #[error("The {command} command requires an argument")]
    MissingArgument { command: String },
}

// == Result Type Alias ==
/// Convenience Result type for the Pokedex.
pub type Result<T> = std::result::Result<T, PokedexError>;
