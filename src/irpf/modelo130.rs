//! Modelo 130: quarterly IRPF advance payment for self-employed activity.
//!
//! Income and expenses are accumulated from January 1 through the end of
//! the declared quarter, not per quarter. Earlier advance payments of the
//! same year are then subtracted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{
    AggregationMode, DeclaracionError, Declarant, DeclarationPeriod, FinancialRecord, Quarter,
    RecordSource, ResultType, aggregate_period, check_amount, fetch_issued, fetch_received,
    round2,
};

/// Share of the positive net yield paid in advance (casilla 04).
pub const ADVANCE_PAYMENT_RATE: Decimal = dec!(0.20);

/// Share of casilla 07 deducted in the first year of activity.
pub const FIRST_YEAR_RELIEF_RATE: Decimal = dec!(0.50);

/// Ceiling of the first-year relief per quarter.
pub const FIRST_YEAR_RELIEF_CAP: Decimal = dec!(100.00);

/// How the payments of earlier quarters (casilla 05) are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorPayments {
    /// Amount given by the caller, e.g. from the filed returns.
    Supplied(Decimal),
    /// Recompute each earlier quarter of the year from the same records
    /// and sum their positive casilla 07 results.
    Derived,
}

/// Inputs the engine cannot derive from records.
///
/// The first-year-of-activity flag has no default and must always be given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxInputs {
    first_year_of_activity: bool,
    prior_payments: PriorPayments,
    a_deducir: Decimal,
}

impl IncomeTaxInputs {
    pub fn new(first_year_of_activity: bool) -> Self {
        Self {
            first_year_of_activity,
            prior_payments: PriorPayments::Derived,
            a_deducir: Decimal::ZERO,
        }
    }

    pub fn prior_payments(mut self, prior: PriorPayments) -> Self {
        self.prior_payments = prior;
        self
    }

    /// Result of a previous return for the same quarter (complementary filing, casilla 18).
    pub fn a_deducir(mut self, amount: Decimal) -> Self {
        self.a_deducir = amount;
        self
    }

    pub fn first_year_of_activity(&self) -> bool {
        self.first_year_of_activity
    }
}

/// A computed Modelo 130. Every amount is rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeTaxAdvance {
    declarant: Declarant,
    period: DeclarationPeriod,
    first_year_of_activity: bool,
    ingresos: Decimal,
    gastos: Decimal,
    rendimiento_neto: Decimal,
    pago_cuenta: Decimal,
    pagos_anteriores: Decimal,
    retenciones: Decimal,
    resultado_previo: Decimal,
    first_year_relief: Decimal,
    resultado: Decimal,
    a_deducir: Decimal,
    total: Decimal,
    result_type: ResultType,
}

impl IncomeTaxAdvance {
    pub fn declarant(&self) -> &Declarant {
        &self.declarant
    }

    pub fn period(&self) -> &DeclarationPeriod {
        &self.period
    }

    pub fn first_year_of_activity(&self) -> bool {
        self.first_year_of_activity
    }

    /// Casilla 01: income since January 1.
    pub fn ingresos(&self) -> Decimal {
        self.ingresos
    }

    /// Casilla 02: deductible expenses since January 1.
    pub fn gastos(&self) -> Decimal {
        self.gastos
    }

    /// Casilla 03.
    pub fn rendimiento_neto(&self) -> Decimal {
        self.rendimiento_neto
    }

    /// Casilla 04: 20% of the positive net yield.
    pub fn pago_cuenta(&self) -> Decimal {
        self.pago_cuenta
    }

    /// Casilla 05.
    pub fn pagos_anteriores(&self) -> Decimal {
        self.pagos_anteriores
    }

    /// Casilla 06: IRPF withheld by clients since January 1.
    pub fn retenciones(&self) -> Decimal {
        self.retenciones
    }

    /// Casilla 07.
    pub fn resultado_previo(&self) -> Decimal {
        self.resultado_previo
    }

    /// Casilla 13.
    pub fn first_year_relief(&self) -> Decimal {
        self.first_year_relief
    }

    /// Casilla 14.
    pub fn resultado(&self) -> Decimal {
        self.resultado
    }

    /// Casilla 18.
    pub fn a_deducir(&self) -> Decimal {
        self.a_deducir
    }

    /// Casilla 19.
    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }
}

/// Compute a Modelo 130 from fetched records.
///
/// The records must cover at least January 1 through the end of `quarter`.
pub fn compute_130(
    declarant: &Declarant,
    year: i32,
    quarter: Quarter,
    issued: &[FinancialRecord],
    received: &[FinancialRecord],
    inputs: &IncomeTaxInputs,
) -> Result<IncomeTaxAdvance, DeclaracionError> {
    let period = DeclarationPeriod::quarterly(year, quarter)?;

    let pagos_anteriores = match inputs.prior_payments {
        PriorPayments::Supplied(amount) => round2(check_amount("prior_payments", amount)?),
        PriorPayments::Derived => {
            let mut paid = Decimal::ZERO;
            for &earlier in quarter.preceding() {
                let p = DeclarationPeriod::quarterly(year, earlier)?;
                let advance = figures(
                    declarant,
                    p,
                    issued,
                    received,
                    paid,
                    inputs.first_year_of_activity,
                    Decimal::ZERO,
                )?;
                paid += advance.resultado_previo.max(Decimal::ZERO);
            }
            paid
        }
    };

    let advance = figures(
        declarant,
        period,
        issued,
        received,
        pagos_anteriores,
        inputs.first_year_of_activity,
        round2(check_amount("a_deducir", inputs.a_deducir)?),
    )?;

    tracing::debug!(
        model = "130",
        period = %advance.period,
        ingresos = %advance.ingresos,
        gastos = %advance.gastos,
        total = %advance.total,
        result_type = %advance.result_type,
        "computed income-tax advance"
    );

    Ok(advance)
}

/// Fetch January 1 through the end of `quarter` from `source` and compute a Modelo 130.
pub fn build_130<S: RecordSource + ?Sized>(
    source: &S,
    declarant: &Declarant,
    year: i32,
    quarter: Quarter,
    inputs: &IncomeTaxInputs,
) -> Result<IncomeTaxAdvance, DeclaracionError> {
    let period = DeclarationPeriod::quarterly(year, quarter)?;
    let ytd = period.year_to_date();
    let issued = fetch_issued(source, ytd)?;
    let received = fetch_received(source, ytd)?;
    compute_130(declarant, year, quarter, &issued, &received, inputs)
}

fn figures(
    declarant: &Declarant,
    period: DeclarationPeriod,
    issued: &[FinancialRecord],
    received: &[FinancialRecord],
    pagos_anteriores: Decimal,
    first_year_of_activity: bool,
    a_deducir: Decimal,
) -> Result<IncomeTaxAdvance, DeclaracionError> {
    let income = aggregate_period(issued, &period, AggregationMode::YearToDate)?;
    let expenses = aggregate_period(received, &period, AggregationMode::YearToDate)?;

    let ingresos = round2(income.overall.base);
    let gastos = round2(expenses.overall.base);
    let rendimiento_neto = ingresos - gastos;
    let pago_cuenta = round2(rendimiento_neto.max(Decimal::ZERO) * ADVANCE_PAYMENT_RATE);
    let retenciones = round2(income.overall.withheld);
    let resultado_previo = pago_cuenta - retenciones - pagos_anteriores;

    let first_year_relief = if first_year_of_activity {
        round2(resultado_previo.max(Decimal::ZERO) * FIRST_YEAR_RELIEF_RATE)
            .min(FIRST_YEAR_RELIEF_CAP)
    } else {
        Decimal::ZERO
    };

    let resultado = resultado_previo - first_year_relief;
    let total = resultado - a_deducir;

    Ok(IncomeTaxAdvance {
        declarant: declarant.clone(),
        period,
        first_year_of_activity,
        ingresos,
        gastos,
        rendimiento_neto,
        pago_cuenta,
        pagos_anteriores,
        retenciones,
        resultado_previo,
        first_year_relief,
        resultado,
        a_deducir,
        total,
        result_type: ResultType::for_income_tax(total),
    })
}
