//! Plain text output for a [`Summary`].

use crate::aggregate::Summary;

/// Shown instead of the totals when no category has a total.
pub const NO_DATA: &str = "No data available.";

/// One line per category, `"<category>: $<amount>"`, then a blank line and the grand total.
///
/// Returns [`NO_DATA`] when there are no category totals.
pub fn text_block(summary: &Summary) -> String {
    if summary.categories().is_empty() {
        return NO_DATA.to_string();
    }
    let mut lines: Vec<String> = summary
        .categories()
        .iter()
        .map(|entry| format!("{}: ${}", entry.category(), entry.total()))
        .collect();
    lines.push(String::new());
    lines.push(format!("Total: ${}", summary.grand_total()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::model::{Ledger, Record, ValidityPolicy};

    #[test]
    fn test_text_block() {
        let ledger: Ledger = vec![
            Record::new(Some("food"), Some("10.50")),
            Record::new(Some("food"), Some("5")),
            Record::new(Some("transport"), Some("20")),
        ]
        .into_iter()
        .collect();
        let text = text_block(&summarize(&ledger, ValidityPolicy::Strict));
        assert_eq!(text, "food: $15.50\ntransport: $20.00\n\nTotal: $35.50");
    }

    #[test]
    fn test_text_block_legacy_negative() {
        let ledger: Ledger = vec![Record::new(Some("food"), Some("-5"))]
            .into_iter()
            .collect();
        let text = text_block(&summarize(&ledger, ValidityPolicy::Legacy));
        assert_eq!(text, "food: $-5.00\n\nTotal: $0.00");
    }

    #[test]
    fn test_text_block_no_data() {
        let text = text_block(&summarize(&Ledger::default(), ValidityPolicy::Strict));
        assert_eq!(text, NO_DATA);
    }
}
