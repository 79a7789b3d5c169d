//! Types that represent the core data model, such as `Record`, `Ledger` and `Amount`.
mod amount;
mod ledger;
mod policy;
mod record;

pub use amount::{Amount, AmountError};
pub use ledger::Ledger;
pub use policy::{AmountRule, ValidityPolicy};
pub use record::{Columns, Record};
