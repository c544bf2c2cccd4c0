//! REPL Commands
//!
//! The command table and the handler behind each entry.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::debug;

use super::session::Session;
use crate::error::{PokedexError, Result};

/// What the REPL should do after a command finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
    Cache,
}

/// One entry of the command table.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

/// Name-indexed command dispatcher.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: BTreeMap<&'static str, Command>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    /// Builds the table with every built-in command.
    pub fn new() -> Self {
        let commands = [
            ("help", "Displays a help message", CommandKind::Help),
            ("exit", "Exit the Pokedex", CommandKind::Exit),
            ("map", "Displays the next 20 locations", CommandKind::Map),
            (
                "mapb",
                "Displays the previous 20 locations if not on the first page",
                CommandKind::MapBack,
            ),
            (
                "explore",
                "Explore an area to view the available pokemon",
                CommandKind::Explore,
            ),
            ("catch", "Attempt to catch a pokemon", CommandKind::Catch),
            ("inspect", "Inspect a pokemon in your pokedex", CommandKind::Inspect),
            (
                "pokedex",
                "View all the pokemon in your pokedex",
                CommandKind::Pokedex,
            ),
            ("cache", "Show response cache statistics", CommandKind::Cache),
        ]
        .into_iter()
        .map(|(name, description, kind)| {
            (
                name,
                Command {
                    name,
                    description,
                    kind,
                },
            )
        })
        .collect();

        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    // == Execute ==
    /// Runs `command` against `session`, writing user-facing text to `out`.
    pub async fn execute<W: Write>(
        &self,
        command: &Command,
        arg: Option<&str>,
        session: &mut Session,
        out: &mut W,
    ) -> Result<Flow> {
        debug!(command = command.name, arg = ?arg, "Executing command");

        match command.kind {
            CommandKind::Help => self.help(out),
            CommandKind::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                Ok(Flow::Exit)
            }
            CommandKind::Map => map_forward(session, out).await,
            CommandKind::MapBack => map_back(session, out).await,
            CommandKind::Explore => explore(session, required(command, arg)?, out).await,
            CommandKind::Catch => catch(session, required(command, arg)?, out).await,
            CommandKind::Inspect => inspect(session, required(command, arg)?, out),
            CommandKind::Pokedex => pokedex(session, out),
            CommandKind::Cache => cache_stats(session, out).await,
        }
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<Flow> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        for command in self.iter() {
            writeln!(out, "{}: {}", command.name, command.description)?;
        }
        Ok(Flow::Continue)
    }
}

fn required<'a>(command: &Command, arg: Option<&'a str>) -> Result<&'a str> {
    arg.ok_or_else(|| PokedexError::MissingArgument {
        command: command.name.to_string(),
    })
}

async fn map_forward<W: Write>(session: &mut Session, out: &mut W) -> Result<Flow> {
    let Some(url) = session.next_url().map(str::to_owned) else {
        writeln!(out, "you're on the last page")?;
        return Ok(Flow::Continue);
    };
    show_page(session, &url, out).await
}

async fn map_back<W: Write>(session: &mut Session, out: &mut W) -> Result<Flow> {
    let Some(url) = session.previous_url().map(str::to_owned) else {
        writeln!(out, "you're on the first page")?;
        return Ok(Flow::Continue);
    };
    show_page(session, &url, out).await
}

async fn show_page<W: Write>(session: &mut Session, url: &str, out: &mut W) -> Result<Flow> {
    let page = session.client().location_areas(url).await?;
    session.advance(&page);

    for area in &page.results {
        writeln!(out, "{}", area.name)?;
    }
    Ok(Flow::Continue)
}

async fn explore<W: Write>(session: &mut Session, area: &str, out: &mut W) -> Result<Flow> {
    writeln!(out, "Exploring {}...", area)?;
    let location = session.client().location_area(area).await?;

    writeln!(out, "Found Pokemon:")?;
    for name in location.pokemon_names() {
        writeln!(out, " - {}", name)?;
    }
    Ok(Flow::Continue)
}

async fn catch<W: Write>(session: &mut Session, name: &str, out: &mut W) -> Result<Flow> {
    writeln!(out, "Throwing a Pokeball at {}...", name)?;
    let pokemon = session.client().pokemon(name).await?;

    if session.roll_catch(pokemon.base_experience) {
        writeln!(out, "{} was caught!", name)?;
        session.record_catch(name, pokemon);
    } else {
        writeln!(out, "{} escaped!", name)?;
    }
    Ok(Flow::Continue)
}

fn inspect<W: Write>(session: &Session, name: &str, out: &mut W) -> Result<Flow> {
    let Some(pokemon) = session.caught(name) else {
        writeln!(out, "you have not caught that pokemon")?;
        return Ok(Flow::Continue);
    };

    writeln!(out, "Name: {}", pokemon.name)?;
    writeln!(out, "Height: {}", pokemon.height)?;
    writeln!(out, "Weight: {}", pokemon.weight)?;
    writeln!(out, "Stats:")?;
    for stat in &pokemon.stats {
        writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
    }
    writeln!(out, "Types:")?;
    for kind in &pokemon.types {
        writeln!(out, "  - {}", kind.kind.name)?;
    }
    Ok(Flow::Continue)
}

fn pokedex<W: Write>(session: &Session, out: &mut W) -> Result<Flow> {
    let mut caught = session.pokedex().peekable();
    if caught.peek().is_none() {
        writeln!(out, "Your Pokedex is empty")?;
        return Ok(Flow::Continue);
    }

    writeln!(out, "Your Pokedex:")?;
    for pokemon in caught {
        writeln!(out, " - {}", pokemon.name)?;
    }
    Ok(Flow::Continue)
}

async fn cache_stats<W: Write>(session: &Session, out: &mut W) -> Result<Flow> {
    let cache = session.client().cache();
    let stats = cache.stats().await;

    writeln!(out, "Cache interval: {}s", cache.interval().as_secs())?;
    writeln!(out, "Entries: {}", stats.total_entries)?;
    writeln!(out, "Hits: {}", stats.hits)?;
    writeln!(out, "Misses: {}", stats.misses)?;
    writeln!(out, "Reaped: {}", stats.reaped)?;
    writeln!(out, "Hit rate: {:.1}%", stats.hit_rate() * 100.0)?;
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PokeApiClient;
    use crate::cache::Cache;
    use crate::models::Pokemon;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    // No server listens on port 9; tests only touch offline paths
    fn offline_session() -> Session {
        let cache = Cache::new(Duration::from_secs(60)).unwrap();
        let client = PokeApiClient::new("http://127.0.0.1:9/api/v2/", cache);
        Session::with_rng(client, StdRng::seed_from_u64(1))
    }

    async fn run_command(
        table: &CommandTable,
        session: &mut Session,
        name: &str,
        arg: Option<&str>,
    ) -> (Result<Flow>, String) {
        let command = *table.get(name).unwrap();
        let mut out = Vec::new();
        let flow = table.execute(&command, arg, session, &mut out).await;
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_table_contains_all_commands() {
        let table = CommandTable::new();
        let names: Vec<&str> = table.iter().map(|c| c.name).collect();

        assert_eq!(
            names,
            vec!["cache", "catch", "exit", "explore", "help", "inspect", "map", "mapb", "pokedex"]
        );
        assert!(table.get("fly").is_none());
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let table = CommandTable::new();
        let mut session = offline_session();

        let (flow, output) = run_command(&table, &mut session, "help", None).await;

        assert_eq!(flow.unwrap(), Flow::Continue);
        assert!(output.starts_with("Welcome to the Pokedex!\nUsage:\ncache: "));
        for command in table.iter() {
            assert!(output.contains(&format!("{}: {}", command.name, command.description)));
        }
    }

    #[tokio::test]
    async fn test_exit_ends_loop() {
        let table = CommandTable::new();
        let mut session = offline_session();

        let (flow, output) = run_command(&table, &mut session, "exit", None).await;

        assert_eq!(flow.unwrap(), Flow::Exit);
        assert_eq!(output, "Closing the Pokedex... Goodbye!\n");
    }

    #[tokio::test]
    async fn test_mapb_on_first_page() {
        let table = CommandTable::new();
        let mut session = offline_session();

        let (flow, output) = run_command(&table, &mut session, "mapb", None).await;

        assert_eq!(flow.unwrap(), Flow::Continue);
        assert_eq!(output, "you're on the first page\n");
    }

    #[tokio::test]
    async fn test_catch_requires_argument() {
        let table = CommandTable::new();
        let mut session = offline_session();

        let (flow, output) = run_command(&table, &mut session, "catch", None).await;

        assert!(matches!(flow, Err(PokedexError::MissingArgument { ref command }) if command == "catch"));
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_inspect_uncaught() {
        let table = CommandTable::new();
        let mut session = offline_session();

        let (_, output) = run_command(&table, &mut session, "inspect", Some("pikachu")).await;

        assert_eq!(output, "you have not caught that pokemon\n");
    }

    #[tokio::test]
    async fn test_inspect_and_pokedex_after_catch() {
        let table = CommandTable::new();
        let mut session = offline_session();
        let pikachu: Pokemon = serde_json::from_str(
            r#"{"name": "pikachu", "base_experience": 112, "height": 4, "weight": 60,
                "stats": [{"base_stat": 35, "stat": {"name": "hp", "url": "u"}}],
                "types": [{"slot": 1, "type": {"name": "electric", "url": "u"}}]}"#,
        )
        .unwrap();
        session.record_catch("pikachu", pikachu);

        let (_, output) = run_command(&table, &mut session, "inspect", Some("pikachu")).await;
        assert_eq!(
            output,
            "Name: pikachu\nHeight: 4\nWeight: 60\nStats:\n  -hp: 35\nTypes:\n  - electric\n"
        );

        let (_, output) = run_command(&table, &mut session, "pokedex", None).await;
        assert_eq!(output, "Your Pokedex:\n - pikachu\n");
    }

    #[tokio::test]
    async fn test_empty_pokedex() {
        let table = CommandTable::new();
        let mut session = offline_session();

        let (_, output) = run_command(&table, &mut session, "pokedex", None).await;

        assert_eq!(output, "Your Pokedex is empty\n");
    }

    #[tokio::test]
    async fn test_cache_command_reports_stats() {
        let table = CommandTable::new();
        let mut session = offline_session();
        session.client().cache().add("k", b"v".to_vec()).await;
        session.client().cache().get("k").await;

        let (_, output) = run_command(&table, &mut session, "cache", None).await;

        assert!(output.contains("Entries: 1"));
        assert!(output.contains("Hits: 1"));
        assert!(output.contains("Misses: 0"));
        assert!(output.contains("Hit rate: 100.0%"));
    }
}
