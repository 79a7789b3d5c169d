//! Reading a ledger CSV file into a [`Ledger`].

use crate::model::{Columns, Ledger, Record};
use crate::Result;
use anyhow::Context;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A problem that did not stop loading but that the user should hear about.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LoadWarning {
    /// The ledger file does not exist; an empty ledger was used instead.
    FileNotFound(PathBuf),
}

impl Display for LoadWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::FileNotFound(path) => write!(
                f,
                "The ledger file '{}' was not found, continuing with an empty ledger",
                path.display()
            ),
        }
    }
}

/// The outcome of [`load`]: the ledger and, possibly, a warning for the user.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    ledger: Ledger,
    warning: Option<LoadWarning>,
}

impl Loaded {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn warning(&self) -> Option<&LoadWarning> {
        self.warning.as_ref()
    }

    pub fn into_parts(self) -> (Ledger, Option<LoadWarning>) {
        (self.ledger, self.warning)
    }
}

impl From<Ledger> for Loaded {
    fn from(ledger: Ledger) -> Self {
        Self {
            ledger,
            warning: None,
        }
    }
}

/// Loads the ledger at `path`.
///
/// A missing file is not an error: the result holds an empty ledger and a
/// [`LoadWarning::FileNotFound`]. Every other failure (permissions, invalid UTF-8, a broken CSV
/// stream) is returned as an error.
pub fn load(path: &Path, columns: &Columns) -> Result<Loaded> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let warning = LoadWarning::FileNotFound(path.to_path_buf());
            warn!("{warning}");
            return Ok(Loaded {
                ledger: Ledger::default(),
                warning: Some(warning),
            });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Unable to open ledger {}", path.display()))
        }
    };

    let ledger = from_reader(file, columns)
        .with_context(|| format!("Unable to read ledger {}", path.display()))?;
    debug!("Loaded {} records from {}", ledger.len(), path.display());
    Ok(Loaded {
        ledger,
        warning: None,
    })
}

/// Reads CSV data with a header row from `reader`. Rows may be shorter or longer than the header;
/// each one still becomes a [`Record`].
pub fn from_reader<R: Read>(reader: R, columns: &Columns) -> Result<Ledger> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("Unable to read the header row")?.clone();
    let headers: Vec<&str> = headers.iter().collect();

    if !headers.contains(&columns.category()) || !headers.contains(&columns.amount()) {
        debug!(
            "The header row is missing '{}' or '{}', no record will be totaled",
            columns.category(),
            columns.amount()
        );
    }

    let mut records = Vec::new();
    for (ix, result) in rdr.records().enumerate() {
        // +2 for the header and 1-based line numbers
        let row = result.with_context(|| format!("Unable to parse row {}", ix + 2))?;
        records.push(Record::new_with_headers(columns, &headers, row.iter()));
    }
    Ok(Ledger::new(records))
}
