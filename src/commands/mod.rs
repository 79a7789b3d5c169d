//! Command handlers for the tally CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod chart;
mod init;
mod shell;
mod totals;

use crate::load::{self, LoadWarning, Loaded};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::debug;

pub use chart::chart;
pub use init::init;
pub use shell::{shell, Session};
pub use totals::totals;

/// A ledger path of `-` means the CSV is read from stdin.
pub(crate) const STDIN: &str = "-";

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        if !self.message.is_empty() {
            println!("{}", self.message);
        }
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the ledger named by `config`, reading stdin when the path is `-`.
pub(crate) fn open_ledger(config: &Config) -> Result<Loaded> {
    if config.ledger_path() == Path::new(STDIN) {
        let ledger = load::from_reader(std::io::stdin().lock(), config.columns())
            .context("Unable to read the ledger from stdin")?;
        return Ok(ledger.into());
    }
    load::load(config.ledger_path(), config.columns())
}

/// Puts a `Warning: ...` line in front of `message` when loading produced a warning.
pub(crate) fn with_warning(warning: Option<&LoadWarning>, message: impl Into<String>) -> String {
    let message = message.into();
    match warning {
        Some(warning) => format!("Warning: {warning}\n{message}"),
        None => message,
    }
}
