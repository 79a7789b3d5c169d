//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a ledger file and a config path.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
}

impl TestEnv {
    /// The file name `config_with_ledger` writes to.
    pub const LEDGER: &'static str = "gastos.csv";

    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` to `name` inside the test directory and returns the full path.
    pub fn write_ledger(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// A default `Config` whose config file, ledger and chart all live in the test directory.
    /// The config file itself is never written.
    pub fn config(&self) -> Config {
        Config::load(self.path().join("config.json"))
            .unwrap()
            .with_ledger_path(Some(&self.path().join(Self::LEDGER)))
            .with_chart_path(Some(&self.path().join("gastos.svg")))
    }

    /// Writes `contents` as the ledger and returns a `Config` that points at it.
    pub fn config_with_ledger(&self, contents: &str) -> Config {
        self.write_ledger(Self::LEDGER, contents);
        self.config()
    }
}
