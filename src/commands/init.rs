use crate::commands::Out;
use crate::model::ValidityPolicy;
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Writes a config file at `config_path`.
///
/// # Arguments
/// - `config_path` - Where the config file goes, e.g. `~/.config/ledger-tally/config.json`
/// - `ledger` - The ledger CSV later commands should read when no `--ledger` is given.
/// - `policy` - The validity policy later commands should use when no `--policy` is given.
/// - `force` - Overwrite an existing config file.
///
/// # Errors
/// - Returns an error if the config file exists (without `force`) or cannot be written.
pub fn init(
    config_path: &Path,
    ledger: Option<&Path>,
    policy: Option<ValidityPolicy>,
    force: bool,
) -> Result<Out<PathBuf>> {
    let config = Config::create(config_path, ledger, policy, force)
        .context("Unable to create the config file")?;
    Ok(Out::new(
        format!(
            "Wrote {} (ledger: {}, policy: {})",
            config.config_path().display(),
            config.ledger_path().display(),
            config.policy()
        ),
        config.config_path().to_path_buf(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_init() {
        let env = TestEnv::new();
        let config_path = env.path().join("config.json");
        let ledger = env.path().join("gastos.csv");
        let out = init(&config_path, Some(ledger.as_path()), None, false).unwrap();
        assert_eq!(out.structure(), Some(&config_path));
        assert!(out.message().contains("policy: strict"));

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.ledger_path(), ledger.as_path());

        assert!(init(&config_path, None, None, false).is_err());
        assert!(init(&config_path, None, None, true).is_ok());
    }
}
