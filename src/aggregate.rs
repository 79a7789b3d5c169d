//! The two ledger queries, [`totals_by_category`] and [`grand_total`], plus a [`Summary`] that
//! bundles them for output.
//!
//! Both queries are single pass scans over the records and never fail: a record whose category or
//! amount cannot be used is skipped. So is a record whose amount would push a running total past
//! what a `Decimal` can hold.

use crate::model::{Amount, Ledger, ValidityPolicy};
use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::{trace, warn};

/// The running total for one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryTotal {
    category: String,
    total: Amount,
}

impl CategoryTotal {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}

/// Category totals in the order each category was first seen in the ledger.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<CategoryTotal>,
    index: HashMap<String, usize>,
}

impl CategoryTotals {
    /// Adds `amount` to the total for `category`, starting it at zero when it is new.
    ///
    /// Returns false, leaving the total unchanged, when the new total would overflow.
    pub fn add(&mut self, category: &str, amount: Amount) -> bool {
        match self.index.get(category) {
            Some(&ix) => {
                let entry = &mut self.entries[ix];
                match entry.total.checked_add(amount) {
                    Some(total) => entry.total = total,
                    None => return false,
                }
            }
            None => {
                self.index.insert(category.to_string(), self.entries.len());
                self.entries.push(CategoryTotal {
                    category: category.to_string(),
                    total: amount,
                });
            }
        }
        true
    }

    pub fn get(&self, category: &str) -> Option<Amount> {
        self.index.get(category).map(|&ix| self.entries[ix].total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryTotal> {
        self.entries.iter()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category())
    }

    /// The sum of all category totals, saturating on overflow.
    ///
    /// This equals [`grand_total`] only when the policy is consistent (see
    /// [`ValidityPolicy::is_consistent`]), every counted amount had a category and no record was
    /// dropped for overflowing.
    pub fn sum(&self) -> Amount {
        self.entries.iter().map(|e| e.total).sum()
    }
}

impl<'a> IntoIterator for &'a CategoryTotals {
    type Item = &'a CategoryTotal;
    type IntoIter = std::slice::Iter<'a, CategoryTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

/// Sums amounts per category.
///
/// A record counts when it has a non-blank category and its amount passes the policy's category
/// rule. Categories are returned in first-seen order.
pub fn totals_by_category(ledger: &Ledger, policy: ValidityPolicy) -> CategoryTotals {
    let rule = policy.category_rule();
    let mut totals = CategoryTotals::default();
    for (ix, record) in ledger.iter().enumerate() {
        let Some(category) = record.valid_category() else {
            trace!("Record {ix} has no category, skipping");
            continue;
        };
        match record.try_amount(rule) {
            Ok(amount) => {
                if !totals.add(category, amount) {
                    warn!("Record {ix} skipped: the total for '{category}' would overflow");
                }
            }
            Err(e) => trace!("Record {ix} skipped: {e}"),
        }
    }
    totals
}

/// Sums every amount that passes the policy's total rule, with or without a category.
pub fn grand_total(ledger: &Ledger, policy: ValidityPolicy) -> Amount {
    let rule = policy.total_rule();
    let mut total = Amount::ZERO;
    for (ix, record) in ledger.iter().enumerate() {
        let Ok(amount) = record.try_amount(rule) else {
            continue;
        };
        match total.checked_add(amount) {
            Some(sum) => total = sum,
            None => warn!("Record {ix} skipped: the grand total would overflow"),
        }
    }
    total
}

/// The first and last dates found in the ledger's date column.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Period {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

/// Everything the output commands need to know about a ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    policy: ValidityPolicy,
    categories: CategoryTotals,
    grand_total: Amount,
    records: usize,
    /// Records that counted toward neither query.
    skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
}

impl Summary {
    pub fn policy(&self) -> ValidityPolicy {
        self.policy
    }

    pub fn categories(&self) -> &CategoryTotals {
        &self.categories
    }

    pub fn grand_total(&self) -> Amount {
        self.grand_total
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }
}

/// Runs both queries and collects a few counts about the ledger.
pub fn summarize(ledger: &Ledger, policy: ValidityPolicy) -> Summary {
    let categories = totals_by_category(ledger, policy);
    let grand_total = grand_total(ledger, policy);

    let skipped = ledger
        .iter()
        .filter(|record| {
            let in_category = record.valid_category().is_some()
                && record.try_amount(policy.category_rule()).is_ok();
            let in_total = record.try_amount(policy.total_rule()).is_ok();
            !in_category && !in_total
        })
        .count();

    let period = ledger
        .iter()
        .filter_map(|record| record.date())
        .fold(None, |period: Option<Period>, date| match period {
            None => Some(Period {
                first: date,
                last: date,
            }),
            Some(p) => Some(Period {
                first: p.first.min(date),
                last: p.last.max(date),
            }),
        });

    Summary {
        policy,
        categories,
        grand_total,
        records: ledger.len(),
        skipped,
        period,
    }
}
