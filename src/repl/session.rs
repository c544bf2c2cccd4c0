//! REPL Session
//!
//! Per-run state handed to every command: the API client, the location-area
//! cursor, the catch RNG and the caught pokemon.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::PokeApiClient;
use crate::models::{LocationAreaPage, Pokemon};

/// A roll below this value catches the pokemon.
pub const CATCH_THRESHOLD: u32 = 50;

/// State owned by one REPL run.
#[derive(Debug)]
pub struct Session {
    client: PokeApiClient,
    next: Option<String>,
    previous: Option<String>,
    pokedex: BTreeMap<String, Pokemon>,
    rng: StdRng,
}

impl Session {
    /// Creates a session positioned before the first location-area page.
    pub fn new(client: PokeApiClient) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    /// Same as [`Session::new`] with a caller-supplied RNG.
    pub fn with_rng(client: PokeApiClient, rng: StdRng) -> Self {
        let next = Some(client.first_page_url());
        Self {
            client,
            next,
            previous: None,
            pokedex: BTreeMap::new(),
            rng,
        }
    }

    pub fn client(&self) -> &PokeApiClient {
        &self.client
    }

    /// URL `map` will fetch, `None` once the last page was shown.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// URL `mapb` will fetch, `None` while on the first page.
    pub fn previous_url(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Moves the cursor to the page that was just displayed.
    pub fn advance(&mut self, page: &LocationAreaPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
    }

    /// Rolls for a catch. Higher base experience makes a catch less likely.
    pub fn roll_catch(&mut self, base_experience: u32) -> bool {
        let roll = self.rng.gen_range(0..base_experience.max(1));
        roll < CATCH_THRESHOLD
    }

    /// Records a caught pokemon under the name or id it was caught with,
    /// replacing an earlier catch under the same key.
    pub fn record_catch(&mut self, key: &str, pokemon: Pokemon) {
        self.pokedex.insert(key.to_string(), pokemon);
    }

    pub fn caught(&self, name: &str) -> Option<&Pokemon> {
        self.pokedex.get(name)
    }

    /// Caught pokemon ordered by the key they were caught with.
    pub fn pokedex(&self) -> impl Iterator<Item = &Pokemon> {
        self.pokedex.values()
    }
}
