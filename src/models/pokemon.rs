//! Pokemon DTOs
//!
//! Subset of the `pokemon/{name}` response the Pokedex uses.

use serde::Deserialize;

use super::NamedResource;

/// A pokemon record as returned by `GET /pokemon/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Pokemon {
    pub name: String,
    /// Experience gained for defeating it; also drives the catch roll.
    /// Some forms report `null`, which decodes as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub base_experience: u32,
    pub height: u32,
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
