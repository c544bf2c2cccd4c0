//! PokeAPI Client
//!
//! Cache-through HTTP access to the PokeAPI. Raw response bodies are cached
//! under their full request URL; decoding happens on every call.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::error::{PokedexError, Result};
use crate::models::{LocationArea, LocationAreaPage, Pokemon};

/// HTTP client for the PokeAPI backed by a [`Cache`].
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Cache,
}

impl PokeApiClient {
    /// Creates a client rooted at `base_url` with reqwest's default settings.
    pub fn new(base_url: impl Into<String>, cache: Cache) -> Self {
        Self::with_http(base_url, cache, reqwest::Client::new())
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        cache: Cache,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(base_url, cache, http))
    }

    fn with_http(base_url: impl Into<String>, cache: Cache, http: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            http,
            base_url,
            cache,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// URL of the first page of location areas.
    pub fn first_page_url(&self) -> String {
        format!("{}location-area/", self.base_url)
    }

    // == Fetch ==
    /// Returns the body at `url`, from the cache when possible.
    ///
    /// On a miss the body is requested, stored under `url` and returned.
    /// Non-success responses are returned as [`PokedexError::Status`] and
    /// never cached.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(body) = self.cache.get(url).await {
            debug!(url = %url, "Serving response from cache");
            return Ok(body);
        }

        info!(url = %url, "Fetching from PokeAPI");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PokedexError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?.to_vec();
        self.cache.add(url, body.clone()).await;

        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches the location-area page at `url` (a `next`/`previous` link).
    pub async fn location_areas(&self, url: &str) -> Result<LocationAreaPage> {
        self.fetch_json(url).await
    }

    /// Fetches a single location area by name or id.
    pub async fn location_area(&self, name: &str) -> Result<LocationArea> {
        let url = format!("{}location-area/{}", self.base_url, name);
        self.fetch_json(&url).await
    }

    /// Fetches a single pokemon by name or id.
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon> {
        let url = format!("{}pokemon/{}", self.base_url, name);
        self.fetch_json(&url).await
    }
}
