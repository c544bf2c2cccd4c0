//! Location area DTOs
//!
//! Shapes of the `location-area` list and detail responses.

use serde::Deserialize;

/// A `{ name, url }` reference to another API resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of `GET /location-area/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas
    pub count: u32,
    /// URL of the following page, absent on the last page
    pub next: Option<String>,
    /// URL of the preceding page, absent on the first page
    pub previous: Option<String>,
    /// Location areas on this page
    pub results: Vec<NamedResource>,
}

/// Detail of a single location area.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationArea {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

impl LocationArea {
    /// Names of the pokemon that can be encountered here, in API order.
    pub fn pokemon_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.name.as_str())
    }
}
