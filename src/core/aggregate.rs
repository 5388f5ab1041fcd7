//! Period aggregation of financial records.
//!
//! Sums base, VAT, total and withholding per VAT tier and per category,
//! over the records dated inside a range. Undated records are skipped.
//! Sums are exact; rounding happens in the declaration builders. Every
//! record amount and running sum stays within
//! [`MAX_AMOUNT`](super::money::MAX_AMOUNT) or aggregation fails.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DeclaracionError;
use super::money::add_amounts;
use super::period::{DateRange, DeclarationPeriod};
use super::types::{FinancialRecord, VatTier};

/// Category used for records without one.
pub const UNCATEGORIZED: &str = "otros";

/// Running sums for a bucket of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub base: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
    pub withheld: Decimal,
    pub count: usize,
}

impl Totals {
    fn add(&mut self, record: &FinancialRecord) -> Result<(), DeclaracionError> {
        self.base = add_amounts("base", self.base, record.base)?;
        self.vat = add_amounts("vat", self.vat, record.vat_amount)?;
        self.total = add_amounts("total", self.total, record.total)?;
        self.withheld = add_amounts("withheld", self.withheld, record.withheld)?;
        self.count += 1;
        Ok(())
    }
}

/// Which range of a period to aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Only the period's own dates (quarterly VAT).
    PeriodLocal,
    /// January 1 through the end of the period (income-tax advance).
    YearToDate,
}

impl AggregationMode {
    pub fn range(self, period: &DeclarationPeriod) -> DateRange {
        match self {
            Self::PeriodLocal => period.range(),
            Self::YearToDate => period.year_to_date(),
        }
    }
}

/// Aggregated sums for one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub range: DateRange,
    /// Sums over every record in range.
    pub overall: Totals,
    pub by_tier: BTreeMap<VatTier, Totals>,
    pub by_category: BTreeMap<String, Totals>,
    /// Records skipped because they carry no usable date.
    pub undated: usize,
}

impl PeriodTotals {
    /// Sums for a tier; zero if no record fell in it.
    pub fn tier(&self, tier: VatTier) -> Totals {
        self.by_tier.get(&tier).copied().unwrap_or_default()
    }

    /// Sums for a category; zero if no record carried it.
    pub fn category(&self, name: &str) -> Totals {
        self.by_category.get(name).copied().unwrap_or_default()
    }
}

/// Aggregate the records dated within `range` (inclusive).
///
/// Fails with [`DeclaracionError::AmountOutOfRange`] or
/// [`DeclaracionError::Overflow`] rather than returning partial sums.
pub fn aggregate(
    records: &[FinancialRecord],
    range: DateRange,
) -> Result<PeriodTotals, DeclaracionError> {
    let mut overall = Totals::default();
    let mut by_tier: BTreeMap<VatTier, Totals> = BTreeMap::new();
    let mut by_category: BTreeMap<String, Totals> = BTreeMap::new();
    let mut unknown_rates: BTreeSet<Decimal> = BTreeSet::new();
    let mut undated = 0usize;

    for record in records {
        let Some(date) = record.date else {
            undated += 1;
            continue;
        };
        if !range.contains(date) {
            continue;
        }

        let tier = VatTier::from_rate(record.vat_rate);
        if tier == VatTier::Other && !record.vat_rate.is_zero() {
            unknown_rates.insert(record.vat_rate.normalize());
        }

        record.check_amounts()?;
        overall.add(record)?;
        by_tier.entry(tier).or_default().add(record)?;
        by_category
            .entry(
                record
                    .category
                    .clone()
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            )
            .or_default()
            .add(record)?;
    }

    if !unknown_rates.is_empty() {
        let rates: Vec<String> = unknown_rates.iter().map(Decimal::to_string).collect();
        tracing::warn!(
            rates = %rates.join(", "),
            "VAT rates outside the 4/10/21% tiers aggregated as other"
        );
    }
    if undated > 0 {
        tracing::warn!(undated, "undated records excluded from aggregation");
    }

    Ok(PeriodTotals {
        range,
        overall,
        by_tier,
        by_category,
        undated,
    })
}

/// Aggregate over a declaration period in the given mode.
pub fn aggregate_period(
    records: &[FinancialRecord],
    period: &DeclarationPeriod,
    mode: AggregationMode,
) -> Result<PeriodTotals, DeclaracionError> {
    aggregate(records, mode.range(period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FinancialRecordBuilder, MAX_AMOUNT, Quarter, RecordKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(d: NaiveDate, base: Decimal, rate: Decimal) -> FinancialRecord {
        FinancialRecordBuilder::new(RecordKind::IssuedInvoice, d)
            .base(base)
            .vat_rate(rate)
            .build()
    }

    #[test]
    fn sums_per_tier() {
        let records = vec![
            sale(date(2024, 1, 10), dec!(1000), dec!(21)),
            sale(date(2024, 2, 10), dec!(500), dec!(10)),
            sale(date(2024, 3, 10), dec!(100), dec!(21)),
        ];
        let q1 = DeclarationPeriod::quarterly(2024, Quarter::Q1).unwrap();
        let t = aggregate_period(&records, &q1, AggregationMode::PeriodLocal).unwrap();

        assert_eq!(t.tier(VatTier::General).base, dec!(1100));
        assert_eq!(t.tier(VatTier::General).vat, dec!(231.00));
        assert_eq!(t.tier(VatTier::Reduced).vat, dec!(50.00));
        assert_eq!(t.tier(VatTier::SuperReduced), Totals::default());
        assert_eq!(t.overall.count, 3);
        assert_eq!(t.overall.vat, dec!(281.00));
    }

    #[test]
    fn excludes_out_of_range_and_undated() {
        let records = vec![
            sale(date(2024, 3, 31), dec!(100), dec!(21)),
            sale(date(2024, 4, 1), dec!(100), dec!(21)),
            FinancialRecordBuilder::undated(RecordKind::IssuedInvoice)
                .base(dec!(100))
                .build(),
        ];
        let q1 = DeclarationPeriod::quarterly(2024, Quarter::Q1).unwrap();
        let t = aggregate(&records, q1.range()).unwrap();
        assert_eq!(t.overall.count, 1);
        assert_eq!(t.undated, 1);
    }

    #[test]
    fn year_to_date_accumulates() {
        let records = vec![
            sale(date(2024, 2, 1), dec!(1000), dec!(21)),
            sale(date(2024, 5, 1), dec!(2000), dec!(21)),
            sale(date(2024, 7, 1), dec!(4000), dec!(21)),
        ];
        let q2 = DeclarationPeriod::quarterly(2024, Quarter::Q2).unwrap();
        assert_eq!(
            aggregate_period(&records, &q2, AggregationMode::YearToDate)
                .unwrap()
                .overall
                .base,
            dec!(3000)
        );
        assert_eq!(
            aggregate_period(&records, &q2, AggregationMode::PeriodLocal)
                .unwrap()
                .overall
                .base,
            dec!(2000)
        );
    }

    #[test]
    fn groups_by_category() {
        let records = vec![
            FinancialRecordBuilder::new(RecordKind::Expense, date(2024, 1, 5))
                .base(dec!(40))
                .category("suministros")
                .build(),
            FinancialRecordBuilder::new(RecordKind::Expense, date(2024, 1, 6))
                .base(dec!(60))
                .build(),
        ];
        let t = aggregate(&records, DateRange::new(date(2024, 1, 1), date(2024, 1, 31))).unwrap();
        assert_eq!(t.category("suministros").base, dec!(40));
        assert_eq!(t.category(UNCATEGORIZED).base, dec!(60));
        assert_eq!(t.category("alquiler"), Totals::default());
    }

    #[test]
    fn unknown_rate_goes_to_other() {
        let records = vec![sale(date(2024, 1, 10), dec!(100), dec!(5))];
        let t = aggregate(&records, DateRange::new(date(2024, 1, 1), date(2024, 1, 31))).unwrap();
        assert_eq!(t.tier(VatTier::Other).vat, dec!(5.00));
    }

    #[test]
    fn empty_input_is_all_zero() {
        let t = aggregate(&[], DateRange::new(date(2024, 1, 1), date(2024, 1, 31))).unwrap();
        assert_eq!(t.overall, Totals::default());
        assert!(t.by_tier.is_empty());
    }

    #[test]
    fn huge_amounts_fail_instead_of_panicking() {
        let january = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        let huge = sale(date(2024, 1, 10), Decimal::MAX, Decimal::ZERO);
        assert!(matches!(
            aggregate(&[huge.clone(), huge], january),
            Err(DeclaracionError::AmountOutOfRange { field: "base", .. })
        ));

        let largest = sale(date(2024, 1, 10), MAX_AMOUNT, Decimal::ZERO);
        assert_eq!(aggregate(&[largest.clone()], january).unwrap().overall.base, MAX_AMOUNT);
        assert!(matches!(
            aggregate(&[largest.clone(), largest], january),
            Err(DeclaracionError::Overflow { field: "base" })
        ));
    }

    #[test]
    fn out_of_range_records_outside_the_range_are_ignored() {
        let records = vec![
            sale(date(2023, 12, 31), Decimal::MAX, Decimal::ZERO),
            sale(date(2024, 1, 10), dec!(100), dec!(21)),
        ];
        let t = aggregate(&records, DateRange::new(date(2024, 1, 1), date(2024, 1, 31))).unwrap();
        assert_eq!(t.overall.base, dec!(100));
    }
}
