//! Records, periods, rounding, aggregation and the record-source interface.
//!
//! Everything the declaration models share: the normalized
//! [`FinancialRecord`], [`DeclarationPeriod`] date arithmetic, half-up
//! rounding and fixed-width rendering in [`money`], Spanish tax-id handling,
//! the period aggregator [`aggregate()`] and the [`RecordSource`] collaborator
//! trait.

mod aggregate;
mod builder;
mod config;
mod error;
pub mod money;
mod period;
mod source;
mod tax_id;
mod types;

pub use aggregate::*;
pub use builder::*;
pub use config::*;
pub use error::*;
pub use money::{
    MAX_AMOUNT, add_amounts, check_amount, format_amount, round_half_up, round2, sum_amounts,
};
pub use period::*;
pub use source::{InMemorySource, RecordSource};
pub(crate) use source::{fetch_counterparty, fetch_issued, fetch_received};
pub use tax_id::*;
pub use types::*;
