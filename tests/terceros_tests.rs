#![cfg(feature = "terceros")]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tributa::core::*;
use tributa::terceros::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn declarant() -> Declarant {
    Declarant::new("B12345674", "TALLER MECANICO SL")
}

fn sale_to(tax_id: &str, m: u32, total: Decimal) -> FinancialRecord {
    FinancialRecordBuilder::new(RecordKind::IssuedInvoice, date(2024, m, 10))
        .total(total)
        .counterparty("Cliente", Some(tax_id))
        .build()
}

// ---------------------------------------------------------------------------
// Threshold boundary
// ---------------------------------------------------------------------------

#[test]
fn threshold_boundary() {
    let source = InMemorySource::from_records([
        sale_to("12345678Z", 3, dec!(3005.06)),
        sale_to("X1234567L", 3, dec!(3005.05)),
        sale_to("A58818501", 3, dec!(-3005.06)),
    ]);
    let r = build_347(&source, &declarant(), 2024).unwrap();

    let ids: Vec<&str> = r
        .counterparties()
        .iter()
        .filter_map(|c| c.tax_id.as_deref())
        .collect();
    assert_eq!(ids, vec!["12345678Z", "A58818501"]);
    assert_eq!(r.num_declarados(), 2);
    assert_eq!(r.importe_total(), Decimal::ZERO);
    assert_eq!(r.result_type().code(), 'D');
}

#[test]
fn threshold_helpers_agree() {
    assert!(qualifies(THIRD_PARTY_THRESHOLD));
    assert!(!qualifies(THIRD_PARTY_THRESHOLD - dec!(0.01)));
    assert!(check_threshold(dec!(-4000)).included);
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn many_small_invoices_add_up() {
    let source = InMemorySource::from_records(
        (1..=12).map(|m| sale_to("12345678Z", m, dec!(300))),
    );
    let r = build_347(&source, &declarant(), 2024).unwrap();

    let c = &r.counterparties()[0];
    assert_eq!(c.annual_total, dec!(3600.00));
    assert_eq!(c.quarterly, [dec!(900.00); 4]);
    assert_eq!(c.operation_count, 12);
    assert_eq!(c.operation, OperationCode::Sale);
}

#[test]
fn same_party_as_client_and_supplier_is_two_lines() {
    let source = InMemorySource::from_records([
        sale_to("A58818501", 2, dec!(5000)),
        FinancialRecordBuilder::new(RecordKind::ReceivedInvoice, date(2024, 6, 1))
            .total(dec!(4000))
            .counterparty("Proveedor", Some("A58818501"))
            .build(),
    ]);
    let r = build_347(&source, &declarant(), 2024).unwrap();

    assert_eq!(r.num_declarados(), 2);
    assert_eq!(r.purchases_count(), 1);
    assert_eq!(r.purchases_amount(), dec!(4000.00));
    assert_eq!(r.sales_count(), 1);
    assert_eq!(r.sales_amount(), dec!(5000.00));
    assert_eq!(r.importe_total(), dec!(9000.00));
}

#[test]
fn display_name_comes_from_directory() {
    let mut source = InMemorySource::new();
    source
        .add_record(
            FinancialRecordBuilder::new(RecordKind::IssuedInvoice, date(2024, 11, 3))
                .total(dec!(7260))
                .counterparty_id("client-42")
                .counterparty("garcia", Some("12345678Z"))
                .build(),
        )
        .add_counterparty(
            "client-42",
            CounterpartyInfo {
                name: "GARCIA LOPEZ JUAN".into(),
                tax_id: Some("12345678Z".into()),
            },
        );
    let r = build_347(&source, &declarant(), 2024).unwrap();

    assert_eq!(r.counterparties()[0].name, "GARCIA LOPEZ JUAN");
    assert_eq!(r.counterparties()[0].quarterly[3], dec!(7260.00));
}

#[test]
fn empty_year_has_nothing_to_declare() {
    let r = build_347(&InMemorySource::new(), &declarant(), 2024).unwrap();
    assert_eq!(r.num_declarados(), 0);
    assert_eq!(r.result_type(), ResultType::Zero);
}

// ---------------------------------------------------------------------------
// Collaborator failures
// ---------------------------------------------------------------------------

struct DirectoryDown(InMemorySource);

impl RecordSource for DirectoryDown {
    fn issued_invoices(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError> {
        self.0.issued_invoices(from, to)
    }

    fn received_invoices_and_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError> {
        self.0.received_invoices_and_expenses(from, to)
    }

    fn counterparty_info(&self, _id: &str) -> Result<Option<CounterpartyInfo>, SourceError> {
        Err(SourceError::new("directory service unavailable"))
    }
}

#[test]
fn directory_failure_is_data_unavailable() {
    let inner = InMemorySource::from_records([FinancialRecordBuilder::new(
        RecordKind::IssuedInvoice,
        date(2024, 1, 1),
    )
    .total(dec!(10000))
    .counterparty_id("c1")
    .build()]);
    let err = build_347(&DirectoryDown(inner), &declarant(), 2024).unwrap_err();
    assert!(matches!(
        err,
        DeclaracionError::DataUnavailable {
            operation: "counterparty_info",
            ..
        }
    ));
}
