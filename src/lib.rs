//! ledger-tally reads an expense ledger CSV, totals its amounts per category and in total, and
//! renders the result as text or as a bar chart.
//!
//! The core is two pure queries over a loaded [`Ledger`](model::Ledger):
//! [`totals_by_category`] and [`grand_total`]. Which amounts count is decided by a
//! [`ValidityPolicy`](model::ValidityPolicy).

mod aggregate;
pub mod args;
mod chart;
pub mod commands;
mod config;
mod error;
mod load;
pub mod model;
mod render;
mod utils;

#[cfg(test)]
mod test;

pub use aggregate::{
    grand_total, summarize, totals_by_category, CategoryTotal, CategoryTotals, Period, Summary,
};
pub use chart::BarChart;
pub use config::{default_config_path, Config};
pub use error::{Error, Result};
pub use load::{from_reader, load, LoadWarning, Loaded};
pub use render::text_block;
