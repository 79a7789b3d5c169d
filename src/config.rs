//! Configuration file handling for ledger-tally.
//!
//! The configuration file is a small JSON document, by default at
//! `<config_dir>/ledger-tally/config.json`, holding the ledger location, the validity policy, the
//! column names and where charts are written. Every setting is optional. When the file does not
//! exist the built-in defaults are used, and command line flags override whatever was loaded.

use crate::model::{Columns, ValidityPolicy};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "ledger-tally";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DEFAULT_LEDGER: &str = "gastos.csv";
const DEFAULT_CHART: &str = "gastos.svg";

/// The default location of the configuration file, `<config_dir>/ledger-tally/config.json`, or
/// `./ledger-tally/config.json` when the platform has no configuration directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(CONFIG_JSON)
}

/// The `Config` object holds the resolved settings of the app. It is built from the config file
/// (if there is one) and can then be adjusted with command line overrides.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    config_path: PathBuf,
    ledger_path: PathBuf,
    chart_path: PathBuf,
    policy: ValidityPolicy,
    columns: Columns,
}

impl Config {
    /// Writes a new config file at `config_path` and returns the resulting `Config`.
    ///
    /// # Arguments
    /// - `config_path` - Where the config file goes. Its directory is created if needed.
    /// - `ledger_path` - The ledger to use. A relative path is made absolute against the current
    ///   directory so that it keeps pointing at the same file.
    /// - `policy` - The validity policy to store.
    /// - `force` - Overwrite an existing config file.
    ///
    /// # Errors
    /// - Returns an error if the file exists and `force` is false, or if writing fails.
    pub fn create(
        config_path: &Path,
        ledger_path: Option<&Path>,
        policy: Option<ValidityPolicy>,
        force: bool,
    ) -> Result<Self> {
        if config_path.exists() && !force {
            bail!(
                "The config file '{}' already exists, use --force to overwrite it",
                config_path.display()
            );
        }

        let ledger_path = match ledger_path {
            Some(p) if p.is_relative() => Some(
                std::env::current_dir()
                    .context("Unable to determine the current directory")?
                    .join(p),
            ),
            Some(p) => Some(p.to_path_buf()),
            None => None,
        };

        let config_file = ConfigFile {
            ledger_path,
            policy,
            ..ConfigFile::default()
        };
        config_file.save(config_path)?;
        Ok(Self::from_file(config_path, config_file))
    }

    /// Loads the config file at `config_path`. A missing file gives the default settings; a file
    /// that cannot be read or parsed is an error.
    pub fn load(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::from_file(&config_path, ConfigFile::default()));
        }
        let config_file = ConfigFile::load(&config_path)?;
        debug!("Loaded config file {}", config_path.display());
        Ok(Self::from_file(&config_path, config_file))
    }

    fn from_file(config_path: &Path, config_file: ConfigFile) -> Self {
        let config_dir = config_path.parent().unwrap_or(Path::new(""));
        let resolve = |p: Option<PathBuf>, default: &str| match p {
            Some(p) if p.is_relative() => config_dir.join(p),
            Some(p) => p,
            None => PathBuf::from(default),
        };
        Self {
            config_path: config_path.to_path_buf(),
            ledger_path: resolve(config_file.ledger_path, DEFAULT_LEDGER),
            chart_path: resolve(config_file.chart_path, DEFAULT_CHART),
            policy: config_file.policy.unwrap_or_default(),
            columns: config_file.columns.unwrap_or_default(),
        }
    }

    /// Replaces the ledger path when `ledger_path` is `Some`.
    pub fn with_ledger_path<P: AsRef<Path>>(mut self, ledger_path: Option<P>) -> Self {
        if let Some(p) = ledger_path {
            self.ledger_path = p.as_ref().to_path_buf();
        }
        self
    }

    /// Replaces the chart path when `chart_path` is `Some`.
    pub fn with_chart_path<P: AsRef<Path>>(mut self, chart_path: Option<P>) -> Self {
        if let Some(p) = chart_path {
            self.chart_path = p.as_ref().to_path_buf();
        }
        self
    }

    /// Replaces the policy when `policy` is `Some`.
    pub fn with_policy(mut self, policy: Option<ValidityPolicy>) -> Self {
        if let Some(policy) = policy {
            self.policy = policy;
        }
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn chart_path(&self) -> &Path {
        &self.chart_path
    }

    pub fn policy(&self) -> ValidityPolicy {
        self.policy
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledger-tally",
///   "config_version": 1,
///   "ledger_path": "/home/me/gastos.csv",
///   "policy": "strict",
///   "columns": { "category": "categoria", "amount": "monto" },
///   "chart_path": "charts/gastos.svg"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "ledger-tally"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the ledger CSV (relative to config.json or absolute). Defaults to `gastos.csv` in
    /// the current directory.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    ledger_path: Option<PathBuf>,

    /// Which amounts count toward the totals. Defaults to `strict`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    policy: Option<ValidityPolicy>,

    /// Header names of the category and amount columns. Defaults to `categoria` and `monto`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    columns: Option<Columns>,

    /// Where `chart` writes its SVG (relative to config.json or absolute). Defaults to
    /// `gastos.svg` in the current directory.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    chart_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            ledger_path: None,
            policy: None,
            columns: None,
            chart_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app or
    /// config version.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version in config file: expected {}, got {}",
            CONFIG_VERSION,
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("config.json")).unwrap();
        assert_eq!(config.ledger_path(), Path::new(DEFAULT_LEDGER));
        assert_eq!(config.chart_path(), Path::new(DEFAULT_CHART));
        assert_eq!(config.policy(), ValidityPolicy::Strict);
        assert_eq!(config.columns(), &Columns::default());
    }

    #[test]
    fn test_create_and_load() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("nested").join("config.json");
        let ledger = dir.path().join("mine.csv");
        let created = Config::create(
            &config_path,
            Some(ledger.as_path()),
            Some(ValidityPolicy::Legacy),
            false,
        )
        .unwrap();
        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(created, loaded);
        assert_eq!(loaded.ledger_path(), ledger.as_path());
        assert_eq!(loaded.policy(), ValidityPolicy::Legacy);
    }

    #[test]
    fn test_create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        Config::create(&config_path, None, None, false).unwrap();
        let err = Config::create(&config_path, None, None, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        Config::create(&config_path, None, Some(ValidityPolicy::Lenient), true).unwrap();
        assert_eq!(
            Config::load(&config_path).unwrap().policy(),
            ValidityPolicy::Lenient
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "ledger-tally",
            "config_version": 1,
            "ledger_path": "data/gastos.csv",
            "chart_path": "/tmp/chart.svg",
            "columns": { "category": "Category", "amount": "Amount" }
        }"#;
        std::fs::write(&config_path, json).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.ledger_path(), dir.path().join("data/gastos.csv"));
        assert_eq!(config.chart_path(), Path::new("/tmp/chart.svg"));
        assert_eq!(config.columns(), &Columns::new("Category", "Amount"));
        assert_eq!(config.policy(), ValidityPolicy::Strict);
    }

    #[test]
    fn test_overrides() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("config.json"))
            .unwrap()
            .with_ledger_path(Some(Path::new("other.csv")))
            .with_chart_path(None::<&Path>)
            .with_policy(Some(ValidityPolicy::Lenient));
        assert_eq!(config.ledger_path(), Path::new("other.csv"));
        assert_eq!(config.chart_path(), Path::new(DEFAULT_CHART));
        assert_eq!(config.policy(), ValidityPolicy::Lenient);
    }

    #[test]
    fn test_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"app_name": "other-app", "config_version": 1}"#).unwrap();
        let err = Config::load(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid app_name"));
    }

    #[test]
    fn test_load_malformed() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{ not json").unwrap();
        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("ledger_path"));
        assert!(!json.contains("policy"));
        assert!(!json.contains("columns"));
        assert!(!json.contains("chart_path"));
    }
}
