use crate::aggregate::totals_by_category;
use crate::chart::{BarChart, NO_EXPENSES};
use crate::commands::{open_ledger, with_warning, Out};
use crate::{Config, Result};
use std::path::PathBuf;
use tracing::info;

/// Draws the category totals as a bar chart.
///
/// With `terminal` the bars are returned as text, `width` characters for the longest one.
/// Otherwise an SVG file is written to the configured chart path and that path is returned.
/// Nothing is drawn when no category has a total. A missing ledger file is reported on the first
/// line of the message.
pub fn chart(config: &Config, terminal: bool, width: usize) -> Result<Out<PathBuf>> {
    let loaded = open_ledger(config)?;
    let totals = totals_by_category(loaded.ledger(), config.policy());
    let chart = BarChart::from_totals(&totals);
    if chart.is_empty() {
        return Ok(with_warning(loaded.warning(), NO_EXPENSES).into());
    }

    if terminal {
        return Ok(Out::new_message(chart.to_terminal(width)));
    }

    let path = config.chart_path().to_path_buf();
    chart.save(&path)?;
    info!("Saved chart to {}", path.display());
    Ok(Out::new(
        format!(
            "Wrote a chart of {} categor{} to {}",
            chart.len(),
            if chart.len() == 1 { "y" } else { "ies" },
            path.display()
        ),
        path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_chart_svg() {
        let env = TestEnv::new();
        let output = env.path().join("out").join("chart.svg");
        let config = env
            .config_with_ledger("categoria,monto\nfood,10\nrent,900\n")
            .with_chart_path(Some(&output));
        let out = chart(&config, false, 40).unwrap();
        assert_eq!(out.structure(), Some(&output));
        assert!(out.message().contains("2 categories"));
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("rent"));
    }

    #[test]
    fn test_chart_terminal() {
        let env = TestEnv::new();
        let config = env.config_with_ledger("categoria,monto\nfood,10\nrent,20\n");
        let out = chart(&config, true, 4).unwrap();
        assert_eq!(out.message(), "food | ## 10.00\nrent | #### 20.00");
        assert!(out.structure().is_none());
    }

    #[test]
    fn test_chart_no_data() {
        let env = TestEnv::new();
        let output = env.path().join("chart.svg");
        let config = env
            .config_with_ledger("categoria,monto\nfood,abc\n")
            .with_chart_path(Some(&output));
        let out = chart(&config, false, 40).unwrap();
        assert_eq!(out.message(), NO_EXPENSES);
        assert!(!output.exists());
    }

    #[test]
    fn test_chart_missing_ledger() {
        let env = TestEnv::new();
        let output = env.path().join("chart.svg");
        let config = env
            .config()
            .with_ledger_path(Some(&env.path().join("missing.csv")))
            .with_chart_path(Some(&output));
        let out = chart(&config, false, 40).unwrap();
        let (warning, rest) = out.message().split_once('\n').unwrap();
        assert!(warning.starts_with("Warning: The ledger file"));
        assert!(warning.contains("missing.csv"));
        assert_eq!(rest, NO_EXPENSES);
        assert!(!output.exists());
    }
}
