use std::fmt;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::DeclaracionError;
use super::money::{MAX_VAT_RATE, add_amounts, check_amount, round2};
use super::tax_id::normalize_tax_id;

/// Source of a financial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Invoice issued to a client (sale, VAT devengado).
    IssuedInvoice,
    /// Invoice received from a supplier (purchase, VAT deducible).
    ReceivedInvoice,
    /// Standalone expense without a formal supplier invoice flow.
    Expense,
}

impl RecordKind {
    /// True for sales-side records.
    pub fn is_sale(&self) -> bool {
        matches!(self, Self::IssuedInvoice)
    }
}

/// A record as handed over by a collaborator: every field optional,
/// the date still as text.
///
/// Convert with [`FinancialRecord::from_raw`], which normalizes once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub kind: Option<RecordKind>,
    pub reference: Option<String>,
    pub date: Option<String>,
    pub base: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
    pub vat_amount: Option<Decimal>,
    pub total: Option<Decimal>,
    pub withheld: Option<Decimal>,
    pub counterparty_id: Option<String>,
    pub counterparty_name: Option<String>,
    pub counterparty_tax_id: Option<String>,
    pub category: Option<String>,
}

/// Issued invoice, received invoice or expense, with money normalized.
///
/// `date` is `None` when the source date was missing or unparseable;
/// such records are never aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub kind: RecordKind,
    /// Invoice number or expense reference, for diagnostics.
    pub reference: Option<String>,
    pub date: Option<NaiveDate>,
    /// Taxable base (net amount).
    pub base: Decimal,
    /// VAT rate in percent (21 = 21%).
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    /// VAT-inclusive total.
    pub total: Decimal,
    /// IRPF withheld by the payer (issued invoices of professionals).
    pub withheld: Decimal,
    pub counterparty_id: Option<String>,
    pub counterparty_name: Option<String>,
    /// Normalized tax id of the client or supplier.
    pub counterparty_tax_id: Option<String>,
    pub category: Option<String>,
}

impl FinancialRecord {
    /// Normalize a collaborator record.
    ///
    /// Missing money is zero; a missing VAT amount is derived from base and
    /// rate; a missing total is base + VAT. A record without a kind is
    /// treated as an expense. Amounts beyond [`MAX_AMOUNT`](super::money::MAX_AMOUNT)
    /// and rates beyond 100% are rejected.
    pub fn from_raw(raw: RawRecord) -> Result<Self, DeclaracionError> {
        let date = raw.date.as_deref().and_then(parse_record_date);
        if date.is_none() {
            tracing::warn!(
                reference = raw.reference.as_deref().unwrap_or(""),
                date = raw.date.as_deref().unwrap_or(""),
                "record date missing or unparseable; excluded from aggregation"
            );
        }

        let base = check_amount("base", raw.base.unwrap_or(Decimal::ZERO))?;
        let vat_rate = check_rate(raw.vat_rate.unwrap_or(Decimal::ZERO))?;
        let vat_amount = match raw.vat_amount {
            Some(amount) => check_amount("vat_amount", amount)?,
            None => vat_for(base, vat_rate).ok_or(DeclaracionError::Overflow {
                field: "vat_amount",
            })?,
        };
        let total = match raw.total {
            Some(total) => check_amount("total", total)?,
            None => add_amounts("total", base, vat_amount)?,
        };
        let withheld = check_amount("withheld", raw.withheld.unwrap_or(Decimal::ZERO))?;

        Ok(Self {
            kind: raw.kind.unwrap_or(RecordKind::Expense),
            reference: non_blank(raw.reference),
            date,
            base,
            vat_rate,
            vat_amount,
            total,
            withheld,
            counterparty_id: non_blank(raw.counterparty_id),
            counterparty_name: non_blank(raw.counterparty_name).map(|n| n.trim().to_string()),
            counterparty_tax_id: non_blank(raw.counterparty_tax_id)
                .map(|id| normalize_tax_id(&id))
                .filter(|id| !id.is_empty()),
            category: non_blank(raw.category),
        })
    }

    /// Check that every amount and the rate are within the declarable range.
    pub fn check_amounts(&self) -> Result<(), DeclaracionError> {
        check_amount("base", self.base)?;
        check_rate(self.vat_rate)?;
        check_amount("vat_amount", self.vat_amount)?;
        check_amount("total", self.total)?;
        check_amount("withheld", self.withheld)?;
        Ok(())
    }
}

fn check_rate(rate: Decimal) -> Result<Decimal, DeclaracionError> {
    if rate.abs() > MAX_VAT_RATE {
        return Err(DeclaracionError::AmountOutOfRange {
            field: "vat_rate",
            value: rate,
        });
    }
    Ok(rate)
}

/// VAT amount for a base at a percentage rate, rounded to cents.
///
/// `None` if the product does not fit a `Decimal`.
pub fn vat_for(base: Decimal, rate: Decimal) -> Option<Decimal> {
    base.checked_mul(rate)
        .and_then(|v| v.checked_div(dec!(100)))
        .map(round2)
}

/// Parse a record date leniently: `YYYY-MM-DD`, `DD/MM/YYYY`, RFC 3339, or
/// any text starting with `YYYY-MM-DD`. Returns `None` otherwise.
pub fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%d/%m/%Y") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// VAT rate tier used by the quarterly and annual VAT models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VatTier {
    /// 4% (tipo superreducido).
    SuperReduced,
    /// 10% (tipo reducido).
    Reduced,
    /// 21% (tipo general).
    General,
    /// Any other rate (0%, 5%, historic rates).
    Other,
}

impl VatTier {
    /// The named tiers in declaration order, followed by `Other`.
    pub const ALL: [VatTier; 4] = [
        VatTier::SuperReduced,
        VatTier::Reduced,
        VatTier::General,
        VatTier::Other,
    ];

    pub fn from_rate(rate: Decimal) -> Self {
        if rate == dec!(4) {
            Self::SuperReduced
        } else if rate == dec!(10) {
            Self::Reduced
        } else if rate == dec!(21) {
            Self::General
        } else {
            Self::Other
        }
    }

    /// Nominal rate of the tier; `None` for `Other`.
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            Self::SuperReduced => Some(dec!(4)),
            Self::Reduced => Some(dec!(10)),
            Self::General => Some(dec!(21)),
            Self::Other => None,
        }
    }
}

/// Display data for a client or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyInfo {
    pub name: String,
    pub tax_id: Option<String>,
}

/// The filing taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarant {
    /// Normalized NIF / CIF / NIE.
    pub tax_id: String,
    /// Surname and name, or company name.
    pub name: String,
}

impl Declarant {
    pub fn new(tax_id: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            tax_id: normalize_tax_id(tax_id.as_ref()),
            name: name.into().trim().to_string(),
        }
    }
}

/// Direction of a declaration result, rendered in the `<TYPE>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    /// I: amount to pay (ingreso).
    ToPay,
    /// C: amount carried forward to offset later periods (a compensar).
    ToOffset,
    /// B: negative result that is neither paid nor carried (declaración negativa).
    Negative,
    /// N: zero result or no activity.
    Zero,
    /// D: informative declaration with reported operations.
    Informative,
}

impl ResultType {
    /// VAT models: positive pays, negative is carried forward, zero is no activity.
    pub fn for_vat(result: Decimal) -> Self {
        if result > Decimal::ZERO {
            Self::ToPay
        } else if result < Decimal::ZERO {
            Self::ToOffset
        } else {
            Self::Zero
        }
    }

    /// Income-tax advance: positive pays, negative is a negative declaration.
    pub fn for_income_tax(result: Decimal) -> Self {
        if result > Decimal::ZERO {
            Self::ToPay
        } else if result < Decimal::ZERO {
            Self::Negative
        } else {
            Self::Zero
        }
    }

    /// One-letter code used in the BOE `<TYPE>` tag.
    pub fn code(&self) -> char {
        match self {
            Self::ToPay => 'I',
            Self::ToOffset => 'C',
            Self::Negative => 'B',
            Self::Zero => 'N',
            Self::Informative => 'D',
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ToPay => "to pay",
            Self::ToOffset => "to offset",
            Self::Negative => "negative",
            Self::Zero => "zero",
            Self::Informative => "informative",
        };
        f.write_str(label)
    }
}
