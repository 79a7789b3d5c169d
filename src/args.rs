//! These structs provide the CLI interface for the tally CLI.

use crate::config::default_config_path;
use crate::model::ValidityPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// tally: Totals an expense ledger by category.
///
/// The ledger is a CSV file with a header row that names at least a category column and an amount
/// column (`categoria` and `monto` by default). Amounts are summed per category and in total, and
/// the results can be printed, charted, or explored in an interactive session that can reload the
/// file while it runs.
#[derive(Debug, Parser, Clone)]
#[command(name = "tally", version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a config file with the default settings.
    ///
    /// Use --ledger to remember which ledger file to read, so that later commands do not need it.
    Init(InitArgs),
    /// Print the total of each category followed by the grand total.
    Totals(TotalsArgs),
    /// Draw a bar chart of the category totals, as an SVG file or in the terminal.
    Chart(ChartArgs),
    /// Start an interactive session: show totals, draw the chart, or reload the ledger file.
    Shell(ShellArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// The path of the config file. Defaults to ledger-tally/config.json in your config directory.
    #[arg(long, env = "TALLY_CONFIG", default_value_t = DisplayPath(default_config_path()))]
    config: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> &DisplayPath {
        &self.config
    }
}

/// Selects the ledger and the validity policy; shared by the reading commands.
#[derive(Debug, Parser, Clone, Default)]
pub struct LedgerArgs {
    /// The ledger CSV to read, overriding the config file. Use "-" to read from stdin.
    #[arg(long, short = 'f')]
    ledger: Option<PathBuf>,

    /// Which amounts count: "strict" (plain non-negative decimals), "lenient" (any number) or
    /// "legacy" (lenient per category, strict for the grand total).
    #[arg(long)]
    policy: Option<ValidityPolicy>,
}

impl LedgerArgs {
    pub fn ledger(&self) -> Option<&Path> {
        self.ledger.as_deref()
    }

    pub fn policy(&self) -> Option<ValidityPolicy> {
        self.policy
    }
}

/// (Not shown): Args for the `tally init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The ledger CSV to remember in the config file.
    #[arg(long, short = 'f')]
    ledger: Option<PathBuf>,

    /// The validity policy to remember in the config file.
    #[arg(long)]
    policy: Option<ValidityPolicy>,

    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

impl InitArgs {
    pub fn ledger(&self) -> Option<&Path> {
        self.ledger.as_deref()
    }

    pub fn policy(&self) -> Option<ValidityPolicy> {
        self.policy
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

/// How `tally totals` prints its results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per category and a total line.
    #[default]
    Text,
    /// The full summary as JSON.
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);

/// (Not shown): Args for the `tally totals` command.
#[derive(Debug, Parser, Clone)]
pub struct TotalsArgs {
    #[clap(flatten)]
    ledger: LedgerArgs,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl TotalsArgs {
    pub fn ledger(&self) -> &LedgerArgs {
        &self.ledger
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `tally chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Where to write the SVG chart, overriding the config file.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Draw the chart in the terminal instead of writing an SVG file.
    #[arg(long)]
    terminal: bool,

    /// The width, in characters, of the longest terminal bar.
    #[arg(long, default_value_t = 40)]
    width: usize,
}

impl ChartArgs {
    pub fn ledger(&self) -> &LedgerArgs {
        &self.ledger
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn terminal(&self) -> bool {
        self.terminal
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// (Not shown): Args for the `tally shell` command.
#[derive(Debug, Parser, Clone)]
pub struct ShellArgs {
    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Where the chart command writes its SVG, overriding the config file.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

impl ShellArgs {
    pub fn ledger(&self) -> &LedgerArgs {
        &self.ledger
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_totals() {
        let args = Args::try_parse_from([
            "tally",
            "--config",
            "/tmp/c.json",
            "totals",
            "-f",
            "g.csv",
            "--policy",
            "legacy",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.common().config().path(), Path::new("/tmp/c.json"));
        match args.command() {
            Command::Totals(totals) => {
                assert_eq!(totals.ledger().ledger(), Some(Path::new("g.csv")));
                assert_eq!(totals.ledger().policy(), Some(ValidityPolicy::Legacy));
                assert_eq!(totals.format(), OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_chart_defaults() {
        let args = Args::try_parse_from(["tally", "chart"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::WARN);
        match args.command() {
            Command::Chart(chart) => {
                assert!(!chart.terminal());
                assert_eq!(chart.width(), 40);
                assert_eq!(chart.output(), None);
                assert_eq!(chart.ledger().ledger(), None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_policy() {
        assert!(Args::try_parse_from(["tally", "totals", "--policy", "loose"]).is_err());
    }

    #[test]
    fn test_parse_log_level() {
        let args = Args::try_parse_from(["tally", "--log-level", "debug", "shell"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
