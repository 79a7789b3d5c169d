//! Amount type for handling the monetary values found in the ledger's amount column.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Ledger data is often dirty, so
//! instead of a single `FromStr` there are two explicit try-parse functions, one per validity
//! rule:
//!
//! - [`Amount::parse_strict`] accepts only plain non-negative decimals such as `10.50`.
//! - [`Amount::parse_lenient`] accepts anything that reads as a number, such as `-5` or `1e3`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// The number of decimal places shown when an amount is displayed.
const DISPLAY_DP: u32 = 2;

/// Represents a monetary amount from the ledger.
///
/// # Examples
///
/// Strict parsing only takes unsigned plain decimals:
/// ```
/// # use ledger_tally::model::Amount;
/// assert!(Amount::parse_strict("10.50").is_ok());
/// assert!(Amount::parse_strict("-5").is_err());
/// ```
///
/// Lenient parsing takes signs, whitespace and exponents:
/// ```
/// # use ledger_tally::model::Amount;
/// let amount = Amount::parse_lenient(" -5 ").unwrap();
/// assert_eq!(amount.to_string(), "-5.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Adds two amounts, returning `None` when the result does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.value.checked_add(rhs.value).map(Amount::new)
    }

    /// A lossy conversion used for drawing charts.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or_default()
    }

    /// Parses a plain, unsigned decimal: ASCII digits with at most one `.` and at least one digit.
    /// Signs, exponents, thousands separators and surrounding whitespace are all rejected.
    ///
    /// `"5"`, `"10.50"`, `".5"` and `"5."` are accepted.
    pub fn parse_strict(s: &str) -> Result<Self, AmountError> {
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        let mut dots = 0;
        let mut digits = 0;
        for c in s.chars() {
            match c {
                '0'..='9' => digits += 1,
                '.' => dots += 1,
                _ => return Err(AmountError::Syntax(s.to_string())),
            }
        }
        if dots > 1 || digits == 0 {
            return Err(AmountError::Syntax(s.to_string()));
        }
        Ok(Self::new(parse_mantissa(s)?))
    }

    /// Parses anything that reads as a number. Surrounding whitespace is trimmed, one leading
    /// `+` or `-` is allowed and so is a decimal exponent (`1.5e3`, `2E-2`).
    ///
    /// Values a `Decimal` cannot hold (`inf`, `nan`, huge exponents) are errors.
    pub fn parse_lenient(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(ix) => (&unsigned[..ix], Some(&unsigned[ix + 1..])),
            None => (unsigned, None),
        };

        let syntax = || AmountError::Syntax(s.to_string());
        if !is_mantissa(mantissa) {
            return Err(syntax());
        }

        let value = match exponent {
            None => parse_mantissa(mantissa)?,
            Some(exp) => {
                let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(syntax());
                }
                let exp = exp.strip_prefix('+').unwrap_or(exp);
                let normalized = normalize_mantissa(mantissa);
                Decimal::from_scientific(&format!("{normalized}e{exp}"))
                    .map_err(AmountError::Decimal)?
            }
        };

        if negative && !value.is_zero() {
            Ok(Self::new(-value))
        } else {
            Ok(Self::new(value))
        }
    }
}

/// Digits with at most one `.` and at least one digit.
fn is_mantissa(s: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for b in s.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    dots <= 1 && digits > 0
}

/// Fills in the missing side of a bare `.` so that `".5"` and `"5."` parse.
fn normalize_mantissa(s: &str) -> String {
    let mut normalized = String::with_capacity(s.len() + 2);
    if s.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(s);
    if s.ends_with('.') {
        normalized.push('0');
    }
    normalized
}

fn parse_mantissa(s: &str) -> Result<Decimal, AmountError> {
    normalize_mantissa(s)
        .parse::<Decimal>()
        .map_err(AmountError::Decimal)
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    /// The string was empty (or only whitespace).
    Empty,
    /// The string is not shaped like a number under the rule that was applied.
    Syntax(String),
    /// The string is shaped like a number but does not fit in a `Decimal`.
    Decimal(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "AmountError::Empty"),
            AmountError::Syntax(s) => write!(f, "AmountError::Syntax({s:?})"),
            AmountError::Decimal(e) => write!(f, "AmountError::Decimal({e:?})"),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "the amount is empty"),
            AmountError::Syntax(s) => write!(f, "'{s}' is not a valid amount"),
            AmountError::Decimal(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Decimal(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut rounded = self
            .value
            .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(DISPLAY_DP);
        if rounded.is_zero() {
            // Avoid printing "-0.00" for tiny negative values.
            rounded = Decimal::new(0, DISPLAY_DP);
        }
        write!(f, "{rounded}")
    }
}

/// Saturates at `Decimal::MAX` or `Decimal::MIN`. Use [`Amount::checked_add`] to detect overflow.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.value.saturating_add(rhs.value))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::parse_lenient(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
