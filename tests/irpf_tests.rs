#![cfg(feature = "irpf")]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tributa::core::*;
use tributa::irpf::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn declarant() -> Declarant {
    Declarant::new("12345678Z", "GARCIA LOPEZ JUAN")
}

fn invoice(m: u32, base: Decimal) -> FinancialRecord {
    FinancialRecordBuilder::new(RecordKind::IssuedInvoice, date(2024, m, 15))
        .base(base)
        .vat_rate(dec!(21))
        .build()
}

fn expense(m: u32, base: Decimal) -> FinancialRecord {
    FinancialRecordBuilder::new(RecordKind::Expense, date(2024, m, 20))
        .base(base)
        .vat_rate(dec!(21))
        .build()
}

#[test]
fn q2_income_is_cumulative() {
    let source = InMemorySource::from_records([invoice(2, dec!(1000)), invoice(5, dec!(2000))]);
    let inputs = IncomeTaxInputs::new(false).prior_payments(PriorPayments::Supplied(dec!(200)));
    let a = build_130(&source, &declarant(), 2024, Quarter::Q2, &inputs).unwrap();

    assert_eq!(a.ingresos(), dec!(3000.00));
    assert_eq!(a.pago_cuenta(), dec!(600.00));
    assert_eq!(a.pagos_anteriores(), dec!(200.00));
    assert_eq!(a.total(), dec!(400.00));
    assert_eq!(a.result_type().code(), 'I');
}

#[cfg(feature = "iva")]
#[test]
fn cumulative_130_versus_local_303() {
    use tributa::iva::{VatInputs, build_303};

    let source = InMemorySource::from_records([invoice(2, dec!(1000)), invoice(5, dec!(2000))]);
    let a = build_130(&source, &declarant(), 2024, Quarter::Q2, &IncomeTaxInputs::new(false))
        .unwrap();
    let v = build_303(&source, &declarant(), 2024, Quarter::Q2, &VatInputs::default()).unwrap();

    assert_eq!(a.ingresos(), dec!(3000.00));
    assert_eq!(v.tier(VatTier::General).base, dec!(2000.00));
}

#[test]
fn derived_prior_payments_across_the_year() {
    // Q1 owes 200, Q2 owes 400 more, Q3 has expenses wiping part of the yield.
    let source = InMemorySource::from_records([
        invoice(1, dec!(1000)),
        invoice(4, dec!(2000)),
        invoice(7, dec!(1000)),
        expense(8, dec!(2500)),
    ]);
    let q3 = build_130(&source, &declarant(), 2024, Quarter::Q3, &IncomeTaxInputs::new(false))
        .unwrap();

    assert_eq!(q3.rendimiento_neto(), dec!(1500.00));
    assert_eq!(q3.pago_cuenta(), dec!(300.00));
    assert_eq!(q3.pagos_anteriores(), dec!(600.00));
    assert_eq!(q3.total(), dec!(-300.00));
    assert_eq!(q3.result_type(), ResultType::Negative);
    assert_eq!(q3.result_type().code(), 'B');
}

#[test]
fn first_year_relief_only_when_flagged() {
    let source = InMemorySource::from_records([invoice(2, dec!(10000)), expense(2, dec!(2000))]);

    let veteran = build_130(&source, &declarant(), 2024, Quarter::Q1, &IncomeTaxInputs::new(false))
        .unwrap();
    assert_eq!(veteran.first_year_relief(), Decimal::ZERO);
    assert_eq!(veteran.total(), dec!(1600.00));

    let newcomer = build_130(&source, &declarant(), 2024, Quarter::Q1, &IncomeTaxInputs::new(true))
        .unwrap();
    assert!(newcomer.first_year_of_activity());
    assert_eq!(newcomer.first_year_relief(), FIRST_YEAR_RELIEF_CAP);
    assert_eq!(newcomer.total(), dec!(1500.00));
}

#[test]
fn complementary_return_deducts_previous_result() {
    let source = InMemorySource::from_records([invoice(2, dec!(1000))]);
    let inputs = IncomeTaxInputs::new(false).a_deducir(dec!(200));
    let a = build_130(&source, &declarant(), 2024, Quarter::Q1, &inputs).unwrap();
    assert_eq!(a.resultado(), dec!(200.00));
    assert_eq!(a.total(), Decimal::ZERO);
    assert_eq!(a.result_type(), ResultType::Zero);
}

#[test]
fn records_from_previous_year_are_ignored() {
    let source = InMemorySource::from_records([
        FinancialRecordBuilder::new(RecordKind::IssuedInvoice, date(2023, 12, 31))
            .base(dec!(9999))
            .build(),
        invoice(1, dec!(100)),
    ]);
    let a = build_130(&source, &declarant(), 2024, Quarter::Q1, &IncomeTaxInputs::new(false))
        .unwrap();
    assert_eq!(a.ingresos(), dec!(100.00));
}

#[test]
fn oversized_inputs_fail_instead_of_panicking() {
    let source = InMemorySource::from_records([invoice(1, dec!(1000))]);
    let inputs = IncomeTaxInputs::new(false).prior_payments(PriorPayments::Supplied(Decimal::MAX));
    let err = build_130(&source, &declarant(), 2024, Quarter::Q2, &inputs).unwrap_err();
    assert!(matches!(
        err,
        DeclaracionError::AmountOutOfRange {
            field: "prior_payments",
            ..
        }
    ));

    let source = InMemorySource::from_records([invoice(1, Decimal::MAX)]);
    let err = build_130(&source, &declarant(), 2024, Quarter::Q1, &IncomeTaxInputs::new(false))
        .unwrap_err();
    assert!(matches!(err, DeclaracionError::AmountOutOfRange { .. }));
}
