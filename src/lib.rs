//! Pokedex - An interactive PokeAPI browser
//!
//! Browses location areas and pokemon from the PokeAPI, memoizing raw
//! responses in a time-expiring in-memory cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repl;
pub mod tasks;

pub use api::PokeApiClient;
pub use cache::{Cache, ReadMode};
pub use config::Config;
pub use error::{PokedexError, Result};
pub use repl::{CommandTable, Session};
