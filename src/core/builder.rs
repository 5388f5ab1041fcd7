use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::tax_id::normalize_tax_id;
use super::types::*;

/// Builder for typed [`FinancialRecord`]s.
///
/// The VAT amount defaults to `base * rate / 100` rounded half-up, and the
/// total to `base + vat`, unless set explicitly.
///
/// ```
/// use tributa::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let rec = FinancialRecordBuilder::new(
///     RecordKind::IssuedInvoice,
///     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
/// )
/// .base(dec!(1000))
/// .vat_rate(dec!(21))
/// .counterparty("Cliente SA", Some("B12345674"))
/// .build();
///
/// assert_eq!(rec.vat_amount, dec!(210.00));
/// assert_eq!(rec.total, dec!(1210.00));
/// ```
pub struct FinancialRecordBuilder {
    kind: RecordKind,
    date: Option<NaiveDate>,
    reference: Option<String>,
    base: Decimal,
    vat_rate: Decimal,
    vat_amount: Option<Decimal>,
    total: Option<Decimal>,
    withheld: Decimal,
    counterparty_id: Option<String>,
    counterparty_name: Option<String>,
    counterparty_tax_id: Option<String>,
    category: Option<String>,
}

impl FinancialRecordBuilder {
    pub fn new(kind: RecordKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date: Some(date),
            reference: None,
            base: Decimal::ZERO,
            vat_rate: Decimal::ZERO,
            vat_amount: None,
            total: None,
            withheld: Decimal::ZERO,
            counterparty_id: None,
            counterparty_name: None,
            counterparty_tax_id: None,
            category: None,
        }
    }

    /// Start a record whose date is unknown. It will never be aggregated.
    pub fn undated(kind: RecordKind) -> Self {
        Self {
            date: None,
            ..Self::new(kind, NaiveDate::MIN)
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn base(mut self, base: Decimal) -> Self {
        self.base = base;
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    pub fn vat_amount(mut self, amount: Decimal) -> Self {
        self.vat_amount = Some(amount);
        self
    }

    pub fn total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    pub fn withheld(mut self, amount: Decimal) -> Self {
        self.withheld = amount;
        self
    }

    pub fn counterparty_id(mut self, id: impl Into<String>) -> Self {
        self.counterparty_id = Some(id.into());
        self
    }

    pub fn counterparty(mut self, name: impl Into<String>, tax_id: Option<&str>) -> Self {
        self.counterparty_name = Some(name.into());
        self.counterparty_tax_id = tax_id.map(normalize_tax_id).filter(|id| !id.is_empty());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Finish the record. Amounts too large for a declaration saturate here
    /// and are rejected when the record is aggregated.
    pub fn build(self) -> FinancialRecord {
        let vat_amount = self.vat_amount.unwrap_or_else(|| {
            vat_for(self.base, self.vat_rate)
                .unwrap_or_else(|| self.base.saturating_mul(self.vat_rate))
        });
        FinancialRecord {
            kind: self.kind,
            reference: self.reference,
            date: self.date,
            base: self.base,
            vat_rate: self.vat_rate,
            vat_amount,
            total: self
                .total
                .unwrap_or_else(|| self.base.saturating_add(vat_amount)),
            withheld: self.withheld,
            counterparty_id: self.counterparty_id,
            counterparty_name: self.counterparty_name,
            counterparty_tax_id: self.counterparty_tax_id,
            category: self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn derives_vat_and_total() {
        let rec = FinancialRecordBuilder::new(
            RecordKind::ReceivedInvoice,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
        .base(dec!(200))
        .vat_rate(dec!(21))
        .build();
        assert_eq!(rec.vat_amount, dec!(42.00));
        assert_eq!(rec.total, dec!(242.00));
    }

    #[test]
    fn rounds_derived_vat_half_up() {
        // 0.05 * 10% = 0.005 -> 0.01
        let rec = FinancialRecordBuilder::new(
            RecordKind::IssuedInvoice,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
        .base(dec!(0.05))
        .vat_rate(dec!(10))
        .build();
        assert_eq!(rec.vat_amount, dec!(0.01));
    }

    #[test]
    fn undated_has_no_date() {
        let rec = FinancialRecordBuilder::undated(RecordKind::Expense)
            .base(dec!(10))
            .build();
        assert!(rec.date.is_none());
    }
}
