//! Modelo 390: annual VAT summary.
//!
//! Each quarter is recomputed with [`compute_303`] from the same records,
//! and the annual figures are the sums of those quarterly returns. The
//! breakdown therefore always agrees with standalone quarterly filings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::modelo303::{TierLine, VatDeclaration, VatInputs, compute_303};
use crate::core::{
    DeclaracionError, Declarant, DeclarationPeriod, FinancialRecord, Quarter, RecordSource,
    ResultType, VatTier, check_amount, fetch_issued, fetch_received, round2,
};

/// Inputs the engine cannot derive from records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualVatInputs {
    /// Negative balance carried from the previous year (casilla 85).
    pub compensation_from_prior_year: Decimal,
}

/// A computed annual VAT summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnualVatSummary {
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
    quarters: Vec<VatDeclaration>,
}

impl AnnualVatSummary {
    pub fn declarant(&self) -> &Declarant {
        &self.declarant
    }

    pub fn period(&self) -> &DeclarationPeriod {
        &self.period
    }

    /// Annual output VAT lines in tier order.
    pub fn devengado(&self) -> &[TierLine] {
        &self.devengado
    }

    pub fn tier(&self, tier: VatTier) -> Option<TierLine> {
        self.devengado.iter().find(|l| l.tier == tier).copied()
    }

    /// Casilla 47.
    pub fn total_cuota_devengada(&self) -> Decimal {
        self.total_cuota_devengada
    }

    /// Casilla 48.
    pub fn base_deducible(&self) -> Decimal {
        self.base_deducible
    }

    /// Casillas 49 and 64.
    pub fn total_cuota_deducible(&self) -> Decimal {
        self.total_cuota_deducible
    }

    /// Casilla 65.
    pub fn diferencia(&self) -> Decimal {
        self.diferencia
    }

    /// Casilla 85.
    pub fn compensation_applied(&self) -> Decimal {
        self.compensation_applied
    }

    /// Casilla 86.
    pub fn resultado(&self) -> Decimal {
        self.resultado
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    /// The four quarterly returns, Q1 first.
    pub fn quarters(&self) -> &[VatDeclaration] {
        &self.quarters
    }
}

/// Compute a Modelo 390 from a year of fetched records.
pub fn compute_390(
    declarant: &Declarant,
    year: i32,
    issued: &[FinancialRecord],
    received: &[FinancialRecord],
    inputs: &AnnualVatInputs,
) -> Result<AnnualVatSummary, DeclaracionError> {
    let period = DeclarationPeriod::annual(year)?;

    let quarters = Quarter::ALL
        .iter()
        .map(|&q| compute_303(declarant, year, q, issued, received, &VatInputs::default()))
        .collect::<Result<Vec<_>, _>>()?;

    let devengado: Vec<TierLine> = VatTier::ALL
        .iter()
        .map(|&tier| {
            let lines = quarters.iter().map(|q| q.tier(tier));
            let (base, cuota) = lines.fold((Decimal::ZERO, Decimal::ZERO), |(b, c), l| {
                (b + l.base, c + l.cuota)
            });
            TierLine {
                tier,
                base,
                rate: tier.rate().unwrap_or(Decimal::ZERO),
                cuota,
            }
        })
        .collect();

    let total_cuota_devengada: Decimal = quarters.iter().map(|q| q.total_cuota_devengada()).sum();
    let base_deducible: Decimal = quarters.iter().map(|q| q.base_deducible()).sum();
    let total_cuota_deducible: Decimal = quarters.iter().map(|q| q.total_cuota_deducible()).sum();
    let diferencia: Decimal = quarters.iter().map(|q| q.diferencia()).sum();
    let compensation_applied = round2(check_amount(
        "compensation_from_prior_year",
        inputs.compensation_from_prior_year,
    )?);
    let resultado = diferencia - compensation_applied;
    let result_type = ResultType::for_vat(resultado);

    tracing::debug!(
        model = "390",
        period = %period,
        resultado = %resultado,
        result_type = %result_type,
        "computed annual VAT summary"
    );

    Ok(AnnualVatSummary {
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
        quarters,
    })
}

/// Fetch the year's records from `source` and compute a Modelo 390.
pub fn build_390<S: RecordSource + ?Sized>(
    source: &S,
    declarant: &Declarant,
    year: i32,
    inputs: &AnnualVatInputs,
) -> Result<AnnualVatSummary, DeclaracionError> {
    let period = DeclarationPeriod::annual(year)?;
    let issued = fetch_issued(source, period.range())?;
    let received = fetch_received(source, period.range())?;
    compute_390(declarant, year, &issued, &received, inputs)
}
