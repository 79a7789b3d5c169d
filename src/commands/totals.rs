use crate::aggregate::{summarize, Summary};
use crate::args::OutputFormat;
use crate::commands::{open_ledger, with_warning, Out};
use crate::render::text_block;
use crate::{Config, Result};
use anyhow::Context;

/// Loads the ledger and reports the total of each category and the grand total.
///
/// A missing ledger file is not an error: it is reported as a warning and the totals are empty.
/// In text output the warning is the first line; in JSON output it is a `warning` field.
pub fn totals(config: &Config, format: OutputFormat) -> Result<Out<Summary>> {
    let loaded = open_ledger(config)?;
    let summary = summarize(loaded.ledger(), config.policy());
    let message = match format {
        OutputFormat::Text => with_warning(loaded.warning(), text_block(&summary)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_value(&summary).context("Unable to serialize the summary")?;
            if let (Some(warning), Some(object)) = (loaded.warning(), json.as_object_mut()) {
                object.insert("warning".to_string(), warning.to_string().into());
            }
            serde_json::to_string_pretty(&json).context("Unable to serialize the summary")?
        }
    };
    Ok(Out::new(message, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NO_DATA;
    use crate::test::TestEnv;

    #[test]
    fn test_totals_text() {
        let env = TestEnv::new();
        let config = env.config_with_ledger(
            "categoria,monto\nfood,10.50\nfood,5\ntransport,20\nfood,abc\n",
        );
        let out = totals(&config, OutputFormat::Text).unwrap();
        assert_eq!(
            out.message(),
            "food: $15.50\ntransport: $20.00\n\nTotal: $35.50"
        );
        assert_eq!(out.structure().unwrap().skipped(), 1);
    }

    #[test]
    fn test_totals_json() {
        let env = TestEnv::new();
        let config = env.config_with_ledger("categoria,monto\nfood,-5\n");
        let config = config.with_policy(Some(crate::model::ValidityPolicy::Legacy));
        let out = totals(&config, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(out.message()).unwrap();
        assert_eq!(json["categories"][0]["total"], "-5.00");
        assert_eq!(json["grand_total"], "0.00");
        assert_eq!(json["policy"], "legacy");
    }

    #[test]
    fn test_totals_missing_ledger() {
        let env = TestEnv::new();
        let config = env.config().with_ledger_path(Some(&env.path().join("missing.csv")));
        let out = totals(&config, OutputFormat::Text).unwrap();
        let mut lines = out.message().lines();
        let warning = lines.next().unwrap();
        assert!(warning.starts_with("Warning: The ledger file"));
        assert!(warning.contains("missing.csv"));
        assert_eq!(lines.next(), Some(NO_DATA));
        assert!(out.structure().unwrap().grand_total().is_zero());
    }

    #[test]
    fn test_totals_missing_ledger_json() {
        let env = TestEnv::new();
        let config = env.config().with_ledger_path(Some(&env.path().join("missing.csv")));
        let out = totals(&config, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(out.message()).unwrap();
        assert!(json["warning"].as_str().unwrap().contains("missing.csv"));
        assert_eq!(json["grand_total"], "0.00");
    }

    #[test]
    fn test_totals_without_warning() {
        let env = TestEnv::new();
        let config = env.config_with_ledger("categoria,monto
food,1
");
        let out = totals(&config, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(out.message()).unwrap();
        assert!(json.get("warning").is_none());
        assert!(!totals(&config, OutputFormat::Text)
            .unwrap()
            .message()
            .contains("Warning"));
    }
}
