use crate::model::{Amount, AmountError, AmountRule};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The header names that identify the category and amount columns of a ledger file.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Columns {
    pub(crate) category: String,
    pub(crate) amount: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            category: CATEGORY_STR.to_string(),
            amount: AMOUNT_STR.to_string(),
        }
    }
}

impl Columns {
    pub fn new(category: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// Represents a single row of the ledger file.
///
/// Every field is optional because a short row simply leaves the trailing columns out. Nothing is
/// validated at load time: the amount stays as text until one of the aggregate queries asks for
/// it with [`Record::try_amount`].
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    category: Option<String>,
    amount: Option<String>,
    date: Option<String>,
    description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    other_fields: BTreeMap<String, String>,
    /// Values found past the last header.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    overflow: Vec<String>,
}

impl Record {
    /// Creates a record holding only a category and an amount.
    pub fn new<S1, S2>(category: Option<S1>, amount: Option<S2>) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            category: category.map(Into::into),
            amount: amount.map(Into::into),
            ..Default::default()
        }
    }

    /// Builds a record from a row, using `headers` to decide what each value means. Missing
    /// trailing values leave their fields empty and extra values land in the overflow list.
    pub fn new_with_headers<S1, S2, I>(columns: &Columns, headers: &[S1], values: I) -> Self
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut record = Record::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            match headers.get(ix) {
                Some(header) => record.set_with_header(columns, header.as_ref(), value),
                None => record.overflow.push(value),
            }
        }
        record
    }

    pub fn set_with_header<S1, S2>(&mut self, columns: &Columns, header: S1, value: S2)
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let header = header.as_ref();
        let value = value.into();

        match RecordColumn::from_header(columns, header) {
            Some(RecordColumn::Category) => self.category = Some(value),
            Some(RecordColumn::Amount) => self.amount = Some(value),
            Some(RecordColumn::Date) => self.date = Some(value),
            Some(RecordColumn::Description) => self.description = Some(value),
            None => {
                let _ = self.other_fields.insert(header.to_string(), value);
            }
        }
    }

    /// The raw category value, if the row had one.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The category when it can be used for grouping: present and not blank.
    pub fn valid_category(&self) -> Option<&str> {
        self.category().filter(|c| !c.trim().is_empty())
    }

    /// The raw amount text, if the row had one.
    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    /// Tries to parse the amount with `rule`. A missing amount is reported as
    /// [`AmountError::Empty`].
    pub fn try_amount(&self, rule: AmountRule) -> Result<Amount, AmountError> {
        match self.amount() {
            Some(s) => rule.parse(s),
            None => Err(AmountError::Empty),
        }
    }

    /// The date column parsed as `YYYY-MM-DD` or `DD/MM/YYYY`, when it is either.
    pub fn date(&self) -> Option<NaiveDate> {
        let s = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
            .ok()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Any other named column.
    pub fn other_field(&self, header: &str) -> Option<&str> {
        self.other_fields.get(header).map(String::as_str)
    }

    pub fn overflow(&self) -> &[String] {
        &self.overflow
    }
}

/// The columns a record knows by name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
enum RecordColumn {
    Category,
    Amount,
    Date,
    Description,
}

impl RecordColumn {
    fn from_header(columns: &Columns, header: &str) -> Option<RecordColumn> {
        if header == columns.category() {
            Some(RecordColumn::Category)
        } else if header == columns.amount() {
            Some(RecordColumn::Amount)
        } else if header == DATE_STR {
            Some(RecordColumn::Date)
        } else if header == DESCRIPTION_STR {
            Some(RecordColumn::Description)
        } else {
            None
        }
    }
}

pub(crate) const CATEGORY_STR: &str = "categoria";
pub(crate) const AMOUNT_STR: &str = "monto";
pub(crate) const DATE_STR: &str = "fecha";
pub(crate) const DESCRIPTION_STR: &str = "descripcion";

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 4] = ["fecha", "categoria", "monto", "descripcion"];

    #[test]
    fn test_record_from_full_row() {
        let record = Record::new_with_headers(
            &Columns::default(),
            &HEADERS,
            ["2024-03-01", "food", "10.50", "lunch"],
        );
        assert_eq!(record.category(), Some("food"));
        assert_eq!(record.amount(), Some("10.50"));
        assert_eq!(record.description(), Some("lunch"));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(record.overflow().is_empty());
    }

    #[test]
    fn test_record_from_short_row() {
        let record = Record::new_with_headers(&Columns::default(), &HEADERS, ["2024-03-01", "food"]);
        assert_eq!(record.category(), Some("food"));
        assert_eq!(record.amount(), None);
        assert!(matches!(
            record.try_amount(AmountRule::Lenient),
            Err(AmountError::Empty)
        ));
    }

    #[test]
    fn test_record_from_long_row() {
        let record = Record::new_with_headers(
            &Columns::default(),
            &HEADERS,
            ["2024-03-01", "food", "1", "x", "extra1", "extra2"],
        );
        assert_eq!(record.overflow(), &["extra1".to_string(), "extra2".to_string()]);
    }

    #[test]
    fn test_other_fields_are_kept() {
        let headers = ["categoria", "monto", "cuenta"];
        let record = Record::new_with_headers(&Columns::default(), &headers, ["rent", "900", "bank"]);
        assert_eq!(record.other_field("cuenta"), Some("bank"));
        assert_eq!(record.other_field("missing"), None);
    }

    #[test]
    fn test_custom_columns() {
        let columns = Columns::new("Category", "Amount");
        let headers = ["Category", "Amount", "categoria"];
        let record = Record::new_with_headers(&columns, &headers, ["fuel", "40", "ignored"]);
        assert_eq!(record.category(), Some("fuel"));
        assert_eq!(record.amount(), Some("40"));
        assert_eq!(record.other_field("categoria"), Some("ignored"));
    }

    #[test]
    fn test_valid_category() {
        assert_eq!(Record::new(Some("food"), Some("1")).valid_category(), Some("food"));
        assert_eq!(Record::new(Some("  "), Some("1")).valid_category(), None);
        assert_eq!(Record::new(None::<&str>, Some("1")).valid_category(), None);
    }

    #[test]
    fn test_date_formats() {
        let columns = Columns::default();
        let headers = ["fecha"];
        let iso = Record::new_with_headers(&columns, &headers, ["2024-01-31"]);
        let dmy = Record::new_with_headers(&columns, &headers, ["31/01/2024"]);
        let bad = Record::new_with_headers(&columns, &headers, ["yesterday"]);
        assert_eq!(iso.date(), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(dmy.date(), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(bad.date(), None);
    }
}
