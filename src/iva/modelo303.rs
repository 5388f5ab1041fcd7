//! Modelo 303: quarterly VAT self-assessment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{
    AggregationMode, DeclaracionError, Declarant, DeclarationPeriod, FinancialRecord, Quarter,
    RecordSource, ResultType, VatTier, aggregate_period, check_amount, fetch_issued, fetch_received,
    round2,
};

/// Inputs the engine cannot derive from records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatInputs {
    /// Negative results of earlier periods applied now (casilla 78).
    pub compensation_from_prior_periods: Decimal,
}

/// Base, rate and output VAT for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLine {
    pub tier: VatTier,
    pub base: Decimal,
    /// Nominal rate; zero for [`VatTier::Other`].
    pub rate: Decimal,
    pub cuota: Decimal,
}

/// A computed quarterly VAT return. Every amount is rounded to cents.
///
/// Fields are read-only: the only way to obtain one is [`compute_303`] or
/// [`build_303`], so totals always match their inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VatDeclaration {
    declarant: Declarant,
    period: DeclarationPeriod,
    devengado: Vec<TierLine>,
    total_cuota_devengada: Decimal,
    base_deducible: Decimal,
    total_cuota_deducible: Decimal,
    diferencia: Decimal,
    compensation_applied: Decimal,
    resultado: Decimal,
    result_type: ResultType,
}

impl VatDeclaration {
    pub fn declarant(&self) -> &Declarant {
        &self.declarant
    }

    pub fn period(&self) -> &DeclarationPeriod {
        &self.period
    }

    /// Output VAT lines in tier order (4%, 10%, 21%, other).
    pub fn devengado(&self) -> &[TierLine] {
        &self.devengado
    }

    /// Output VAT line for one tier.
    pub fn tier(&self, tier: VatTier) -> TierLine {
        self.devengado
            .iter()
            .find(|l| l.tier == tier)
            .copied()
            .unwrap_or(TierLine {
                tier,
                base: Decimal::ZERO,
                rate: tier.rate().unwrap_or(Decimal::ZERO),
                cuota: Decimal::ZERO,
            })
    }

    /// Casilla 27.
    pub fn total_cuota_devengada(&self) -> Decimal {
        self.total_cuota_devengada
    }

    /// Casilla 28: base of deductible domestic purchases and expenses.
    pub fn base_deducible(&self) -> Decimal {
        self.base_deducible
    }

    /// Casillas 29 and 45.
    pub fn total_cuota_deducible(&self) -> Decimal {
        self.total_cuota_deducible
    }

    /// Casilla 46: devengada minus deducible.
    pub fn diferencia(&self) -> Decimal {
        self.diferencia
    }

    /// Casilla 78.
    pub fn compensation_applied(&self) -> Decimal {
        self.compensation_applied
    }

    /// Casilla 71.
    pub fn resultado(&self) -> Decimal {
        self.resultado
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }
}

/// Compute a Modelo 303 from already fetched records.
///
/// `issued` and `received` may span more than the quarter; only records
/// dated inside it are used.
pub fn compute_303(
    declarant: &Declarant,
    year: i32,
    quarter: Quarter,
    issued: &[FinancialRecord],
    received: &[FinancialRecord],
    inputs: &VatInputs,
) -> Result<VatDeclaration, DeclaracionError> {
    let period = DeclarationPeriod::quarterly(year, quarter)?;

    let sales = aggregate_period(issued, &period, AggregationMode::PeriodLocal)?;
    let devengado: Vec<TierLine> = VatTier::ALL
        .iter()
        .map(|&tier| {
            let t = sales.tier(tier);
            TierLine {
                tier,
                base: round2(t.base),
                rate: tier.rate().unwrap_or(Decimal::ZERO),
                cuota: round2(t.vat),
            }
        })
        .collect();
    let total_cuota_devengada: Decimal = devengado.iter().map(|l| l.cuota).sum();

    let purchases = aggregate_period(received, &period, AggregationMode::PeriodLocal)?;
    let base_deducible = round2(purchases.overall.base);
    let total_cuota_deducible = round2(purchases.overall.vat);

    let diferencia = total_cuota_devengada - total_cuota_deducible;
    let compensation_applied = round2(check_amount(
        "compensation_from_prior_periods",
        inputs.compensation_from_prior_periods,
    )?);
    let resultado = diferencia - compensation_applied;
    let result_type = ResultType::for_vat(resultado);

    tracing::debug!(
        model = "303",
        period = %period,
        issued = sales.overall.count,
        received = purchases.overall.count,
        resultado = %resultado,
        result_type = %result_type,
        "computed quarterly VAT return"
    );

    Ok(VatDeclaration {
        declarant: declarant.clone(),
        period,
        devengado,
        total_cuota_devengada,
        base_deducible,
        total_cuota_deducible,
        diferencia,
        compensation_applied,
        resultado,
        result_type,
    })
}

/// Fetch the quarter's records from `source` and compute a Modelo 303.
///
/// A failing source yields [`DeclaracionError::DataUnavailable`].
pub fn build_303<S: RecordSource + ?Sized>(
    source: &S,
    declarant: &Declarant,
    year: i32,
    quarter: Quarter,
    inputs: &VatInputs,
) -> Result<VatDeclaration, DeclaracionError> {
    let period = DeclarationPeriod::quarterly(year, quarter)?;
    let issued = fetch_issued(source, period.range())?;
    let received = fetch_received(source, period.range())?;
    compute_303(declarant, year, quarter, &issued, &received, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FinancialRecordBuilder, RecordKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn declarant() -> Declarant {
        Declarant::new("12345678Z", "GARCIA LOPEZ JUAN")
    }

    fn record(kind: RecordKind, d: NaiveDate, base: Decimal, rate: Decimal) -> FinancialRecord {
        FinancialRecordBuilder::new(kind, d)
            .base(base)
            .vat_rate(rate)
            .build()
    }

    #[test]
    fn two_tiers_devengado() {
        let issued = vec![
            record(RecordKind::IssuedInvoice, date(2024, 1, 10), dec!(1000), dec!(21)),
            record(RecordKind::IssuedInvoice, date(2024, 2, 10), dec!(500), dec!(10)),
        ];
        let d = compute_303(&declarant(), 2024, Quarter::Q1, &issued, &[], &VatInputs::default())
            .unwrap();
        assert_eq!(d.tier(VatTier::General).cuota, dec!(210.00));
        assert_eq!(d.tier(VatTier::Reduced).cuota, dec!(50.00));
        assert_eq!(d.total_cuota_devengada(), dec!(260.00));
        assert_eq!(d.result_type(), ResultType::ToPay);
    }

    #[test]
    fn compensation_can_turn_result_negative() {
        let issued = vec![record(
            RecordKind::IssuedInvoice,
            date(2024, 4, 10),
            dec!(100),
            dec!(21),
        )];
        let inputs = VatInputs {
            compensation_from_prior_periods: dec!(50),
        };
        let d = compute_303(&declarant(), 2024, Quarter::Q2, &issued, &[], &inputs).unwrap();
        assert_eq!(d.diferencia(), dec!(21.00));
        assert_eq!(d.resultado(), dec!(-29.00));
        assert_eq!(d.result_type(), ResultType::ToOffset);
    }

    #[test]
    fn no_activity_is_zero() {
        let d = compute_303(&declarant(), 2024, Quarter::Q3, &[], &[], &VatInputs::default())
            .unwrap();
        assert_eq!(d.resultado(), Decimal::ZERO);
        assert_eq!(d.result_type(), ResultType::Zero);
        assert_eq!(d.devengado().len(), 4);
    }

    #[test]
    fn tiers_keep_nominal_rate() {
        let d = compute_303(&declarant(), 2024, Quarter::Q1, &[], &[], &VatInputs::default())
            .unwrap();
        assert_eq!(d.tier(VatTier::SuperReduced).rate, dec!(4));
        assert_eq!(d.tier(VatTier::General).rate, dec!(21));
        assert_eq!(d.tier(VatTier::Other).rate, Decimal::ZERO);
    }
}
