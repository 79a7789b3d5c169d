//! Rules that decide which amount strings count toward the totals.

use crate::model::{Amount, AmountError};
use serde::{Deserialize, Serialize};

/// Selects how amounts are validated by the two aggregate queries.
///
/// - `strict`: both queries only count plain non-negative decimals.
/// - `lenient`: both queries count anything that reads as a number, negatives included.
/// - `legacy`: category totals are lenient while the grand total is strict, so a negative amount
///   shows up under its category but not in the grand total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityPolicy {
    #[default]
    Strict,
    Lenient,
    Legacy,
}

serde_plain::derive_display_from_serialize!(ValidityPolicy);
serde_plain::derive_fromstr_from_deserialize!(ValidityPolicy);

impl ValidityPolicy {
    /// The rule used when summing amounts per category.
    pub fn category_rule(self) -> AmountRule {
        match self {
            ValidityPolicy::Strict => AmountRule::Strict,
            ValidityPolicy::Lenient | ValidityPolicy::Legacy => AmountRule::Lenient,
        }
    }

    /// The rule used when computing the grand total.
    pub fn total_rule(self) -> AmountRule {
        match self {
            ValidityPolicy::Strict | ValidityPolicy::Legacy => AmountRule::Strict,
            ValidityPolicy::Lenient => AmountRule::Lenient,
        }
    }

    /// True when both queries accept the same amounts, meaning the category totals always add up
    /// to the grand total (for categorized records).
    pub fn is_consistent(self) -> bool {
        self.category_rule() == self.total_rule()
    }
}

/// One of the two ways of parsing an amount string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountRule {
    /// See [`Amount::parse_strict`].
    Strict,
    /// See [`Amount::parse_lenient`].
    Lenient,
}

impl AmountRule {
    pub fn parse(self, s: &str) -> Result<Amount, AmountError> {
        match self {
            AmountRule::Strict => Amount::parse_strict(s),
            AmountRule::Lenient => Amount::parse_lenient(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_policy_rules() {
        assert_eq!(ValidityPolicy::Strict.category_rule(), AmountRule::Strict);
        assert_eq!(ValidityPolicy::Strict.total_rule(), AmountRule::Strict);
        assert_eq!(ValidityPolicy::Lenient.category_rule(), AmountRule::Lenient);
        assert_eq!(ValidityPolicy::Lenient.total_rule(), AmountRule::Lenient);
        assert_eq!(ValidityPolicy::Legacy.category_rule(), AmountRule::Lenient);
        assert_eq!(ValidityPolicy::Legacy.total_rule(), AmountRule::Strict);
        assert!(!ValidityPolicy::Legacy.is_consistent());
        assert!(ValidityPolicy::default().is_consistent());
    }

    #[test]
    fn test_policy_from_str_and_display() {
        assert_eq!(
            ValidityPolicy::from_str("legacy").unwrap(),
            ValidityPolicy::Legacy
        );
        assert!(ValidityPolicy::from_str("loose").is_err());
        assert_eq!(ValidityPolicy::Lenient.to_string(), "lenient");
    }

    #[test]
    fn test_rule_parse() {
        assert!(AmountRule::Strict.parse("-1").is_err());
        assert!(AmountRule::Lenient.parse("-1").is_ok());
    }
}
