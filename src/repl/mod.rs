//! REPL Module
//!
//! Reads commands line by line, dispatches them through the command table and
//! prints their output.

pub mod commands;
pub mod session;

use std::io::{self, BufRead, Write};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;

pub use commands::{Command, CommandKind, CommandTable, Flow};
pub use session::Session;

/// Prompt printed before every line of input
pub const PROMPT: &str = "Pokedex > ";

/// Lines buffered between the reader thread and the loop
const LINE_BUFFER: usize = 16;

/// Lowercases `text` and splits it into whitespace-separated words.
///
/// Blank input yields no words.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}

/// Reads `source` line by line on a dedicated OS thread.
///
/// The thread is detached rather than taken from the runtime's blocking pool,
/// so a read that never returns cannot hold up runtime shutdown. The channel
/// closes at end of input, after the first read error, or once the receiver
/// is dropped.
pub fn spawn_line_reader<R>(source: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::spawn(move || {
        for line in source.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
        debug!("Line reader finished");
    });

    rx
}

/// Runs the read-evaluate loop until `exit` or end of input.
///
/// The first word selects the command and the second, if any, is its
/// argument. Command failures are printed and the loop keeps going.
pub async fn run<W: Write>(
    table: &CommandTable,
    session: &mut Session,
    mut lines: mpsc::Receiver<io::Result<String>>,
    out: &mut W,
) -> Result<()> {
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.recv().await else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        let words = clean_input(&line);
        let Some(name) = words.first() else {
            continue;
        };

        let Some(command) = table.get(name) else {
            writeln!(out, "Unknown command")?;
            continue;
        };

        let arg = words.get(1).map(String::as_str);
        match table.execute(command, arg, session, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => {
                warn!(command = command.name, error = %err, "Command failed");
                writeln!(out, "{}", err)?;
            }
        }
    }

    Ok(())
}
