//! API Module
//!
//! Client for the remote PokeAPI.
//!
//! # Endpoints
//! - `GET /location-area/` - Paginated list of location areas
//! - `GET /location-area/{name}` - Pokemon encounters in an area
//! - `GET /pokemon/{name}` - Pokemon record

pub mod client;

pub use client::PokeApiClient;
