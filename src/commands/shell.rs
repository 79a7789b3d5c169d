//! The interactive `tally shell` session.
//!
//! A session owns one [`Ledger`]. `refresh` reads the file again and swaps the new ledger in; the
//! old one is dropped.

use crate::aggregate::{summarize, totals_by_category, Summary};
use crate::chart::{BarChart, NO_EXPENSES};
use crate::commands::{open_ledger, Out, STDIN};
use crate::load::LoadWarning;
use crate::model::Ledger;
use crate::render::text_block;
use crate::{Config, Result};
use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const PROMPT: &str = "tally> ";
const BAR_WIDTH: usize = 40;
const REFRESHED: &str = "Data refreshed.";
const HELP: &str = "\
Commands:
  totals   (t)  show the total of each category and the grand total
  chart    (c)  draw the chart and save it as SVG
  refresh  (r)  read the ledger file again
  help     (h)  show this help
  quit     (q)  leave the session";

/// A ledger held in memory between commands.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    ledger: Ledger,
}

impl Session {
    /// Loads the configured ledger. A missing file gives an empty ledger and a warning.
    ///
    /// The ledger must be a file: stdin carries the session's commands and could not be read
    /// again on refresh.
    pub fn open(config: Config) -> Result<(Self, Option<LoadWarning>)> {
        anyhow::ensure!(
            config.ledger_path() != Path::new(STDIN),
            "The shell needs a ledger file, not stdin"
        );
        let (ledger, warning) = open_ledger(&config)?.into_parts();
        Ok((Self { config, ledger }, warning))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.ledger, self.config.policy())
    }

    /// The text block for the current ledger.
    pub fn totals(&self) -> String {
        text_block(&self.summary())
    }

    /// Saves the SVG chart to the configured path and returns the terminal rendering of it.
    pub fn chart(&self) -> Result<String> {
        let chart = BarChart::from_totals(&totals_by_category(&self.ledger, self.config.policy()));
        if chart.is_empty() {
            return Ok(NO_EXPENSES.to_string());
        }
        let path = self.config.chart_path();
        chart.save(path)?;
        Ok(format!(
            "{}\n\nSaved chart to {}",
            chart.to_terminal(BAR_WIDTH),
            path.display()
        ))
    }

    /// Reads the ledger file again and replaces the ledger held by the session.
    pub fn refresh(&mut self) -> Result<Option<LoadWarning>> {
        let (ledger, warning) = open_ledger(&self.config)?.into_parts();
        debug!(
            "Replacing a ledger of {} records with one of {}",
            self.ledger.len(),
            ledger.len()
        );
        self.ledger = ledger;
        Ok(warning)
    }
}

/// The commands understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellCommand {
    Totals,
    Chart,
    Refresh,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "totals" | "t" => Ok(ShellCommand::Totals),
            "chart" | "c" => Ok(ShellCommand::Chart),
            "refresh" | "r" => Ok(ShellCommand::Refresh),
            "help" | "h" | "?" => Ok(ShellCommand::Help),
            "quit" | "q" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!(
                "Unknown command '{other}', type 'help' to see the commands"
            )),
        }
    }
}

/// Runs an interactive session, reading commands from `input` and writing results to `output`,
/// until `quit` or the end of the input.
///
/// Errors while drawing or refreshing are reported to the user and the session continues with the
/// ledger it already had. Failing to load the ledger at startup, or to write to `output`, ends the
/// session with an error.
pub fn shell<R, W>(config: Config, input: R, mut output: W) -> Result<Out<()>>
where
    R: BufRead,
    W: Write,
{
    let (mut session, warning) = Session::open(config)?;
    writeln!(
        output,
        "Ledger: {} ({} records, policy: {})",
        session.config().ledger_path().display(),
        session.ledger().len(),
        session.config().policy()
    )?;
    if let Some(warning) = warning {
        writeln!(output, "Warning: {warning}")?;
    }
    writeln!(output, "Type 'help' to see the commands.")?;

    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line.context("Unable to read a command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match ShellCommand::from_str(line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(output, "{message}")?;
                continue;
            }
        };
        debug!("Shell command {command:?}");

        match command {
            ShellCommand::Totals => writeln!(output, "{}", session.totals())?,
            ShellCommand::Chart => match session.chart() {
                Ok(text) => writeln!(output, "{text}")?,
                Err(e) => writeln!(output, "Error: {e:#}")?,
            },
            ShellCommand::Refresh => match session.refresh() {
                Ok(warning) => {
                    if let Some(warning) = warning {
                        writeln!(output, "Warning: {warning}")?;
                    }
                    info!("Reloaded {}", session.config().ledger_path().display());
                    writeln!(output, "{REFRESHED}")?;
                    writeln!(output, "{}", session.totals())?;
                }
                Err(e) => writeln!(output, "Error: {e:#}")?,
            },
            ShellCommand::Help => writeln!(output, "{HELP}")?,
            ShellCommand::Quit => break,
        }
    }
    Ok(Out::new_message(""))
}
