use clap::Parser;
use ledger_tally::args::{Args, Command};
use ledger_tally::{commands, Config, Result};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config_path = args.common().config().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(
            config_path,
            init_args.ledger(),
            init_args.policy(),
            init_args.force(),
        )?
        .print(),

        Command::Totals(totals_args) => {
            let config = Config::load(config_path)?
                .with_ledger_path(totals_args.ledger().ledger())
                .with_policy(totals_args.ledger().policy());
            commands::totals(&config, totals_args.format())?.print()
        }

        Command::Chart(chart_args) => {
            let config = Config::load(config_path)?
                .with_ledger_path(chart_args.ledger().ledger())
                .with_policy(chart_args.ledger().policy())
                .with_chart_path(chart_args.output());
            commands::chart(&config, chart_args.terminal(), chart_args.width())?.print()
        }

        Command::Shell(shell_args) => {
            let config = Config::load(config_path)?
                .with_ledger_path(shell_args.ledger().ledger())
                .with_policy(shell_args.ledger().policy())
                .with_chart_path(shell_args.output());
            commands::shell(config, io::stdin().lock(), io::stdout().lock())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the given level for the library and this binary only.
            EnvFilter::new(format!(
                "ledger_tally={},{}={}",
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
