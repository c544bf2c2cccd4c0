//! Pokedex - An interactive PokeAPI browser
//!
//! Reads commands from stdin and prints results to stdout. Logs go to stderr.

use std::io;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex::{repl, Cache, CommandTable, Config, PokeApiClient, Session};

/// Main entry point for the Pokedex REPL.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the response cache (starts its reaper)
/// 4. Run the REPL until `exit`, end of input or Ctrl+C
/// 5. Stop the cache reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to warnings only so logs stay out of the prompt,
    // can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: api_base={}, cache_interval={}s, strict_reads={}",
        config.api_base, config.cache_interval, config.strict_reads
    );

    let cache = Cache::with_mode(config.cache_interval(), config.read_mode())?;
    let client = PokeApiClient::with_timeout(&config.api_base, cache.clone(), config.http_timeout())
        .context("failed to build HTTP client")?;

    let table = CommandTable::new();
    let mut session = Session::new(client);
    let input = repl::spawn_line_reader(io::BufReader::new(io::stdin()));
    let mut stdout = io::stdout();

    let outcome = tokio::select! {
        result = repl::run(&table, &mut session, input, &mut stdout) => result,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            Ok(())
        }
    };

    cache.stop().await;
    info!("Pokedex closed");

    outcome.context("REPL terminated with an error")
}
