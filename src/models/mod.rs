//! Data models for PokeAPI responses
//!
//! Only the fields the REPL prints or relies on are decoded.

pub mod location;
pub mod pokemon;

pub use location::{LocationArea, LocationAreaPage, NamedResource, PokemonEncounter};
pub use pokemon::{Pokemon, PokemonStat, PokemonType};
