//! Disclosure threshold for Modelo 347.
//!
//! A counterparty is reported when the absolute value of its VAT-inclusive
//! annual total reaches 3,005.06 EUR. The cutoff is set by regulation and
//! is not configurable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Annual amount from which a counterparty must be reported.
pub const THIRD_PARTY_THRESHOLD: Decimal = dec!(3005.06);

/// Whether an annual total must be disclosed.
pub fn qualifies(annual_total: Decimal) -> bool {
    annual_total.abs() >= THIRD_PARTY_THRESHOLD
}

/// Outcome of checking one counterparty against the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCheck {
    pub annual_total: Decimal,
    pub included: bool,
    /// Distance to the threshold in absolute terms; negative when below.
    pub margin: Decimal,
}

/// Check an annual total and report by how much it clears the threshold.
pub fn check_threshold(annual_total: Decimal) -> ThresholdCheck {
    ThresholdCheck {
        annual_total,
        included: qualifies(annual_total),
        margin: annual_total.abs() - THIRD_PARTY_THRESHOLD,
    }
}
