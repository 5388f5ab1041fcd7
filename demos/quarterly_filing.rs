//! Build a year of declarations for a small workshop and write the BOE files.
//!
//! Run with: `cargo run --example quarterly_filing --features all -- [output dir]`
//! Set `RUST_LOG=tributa=debug` to see the builders' events.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tributa::boe;
use tributa::core::*;
use tributa::irpf::{IncomeTaxInputs, build_130};
use tributa::iva::{AnnualVatInputs, VatInputs, build_303, build_390};
use tributa::terceros::build_347;

const RECORDS: &str = r#"[
    {"kind": "issued_invoice", "reference": "F-2024-001", "date": "2024-01-18",
     "base": "1850.00", "vat_rate": "21", "counterparty_id": "c-01",
     "counterparty_name": "Transportes Ebro", "counterparty_tax_id": "A58818501"},
    {"kind": "issued_invoice", "reference": "F-2024-002", "date": "2024-03-02",
     "base": "420.00", "vat_rate": "21", "counterparty_name": "Particular"},
    {"kind": "received_invoice", "reference": "P-778", "date": "07/02/2024",
     "base": "960.00", "vat_rate": "21", "counterparty_name": "Recambios Sur",
     "counterparty_tax_id": "B12345674", "category": "recambios"},
    {"kind": "expense", "reference": "LUZ-01", "date": "2024-02-28",
     "base": "180.00", "vat_rate": "21", "category": "suministros"},
    {"kind": "issued_invoice", "reference": "F-2024-003", "date": "2024-05-14",
     "base": "2300.00", "vat_rate": "21", "counterparty_id": "c-01",
     "counterparty_tax_id": "A58818501"},
    {"kind": "received_invoice", "reference": "P-801", "date": "2024-06-03",
     "base": "2950.00", "vat_rate": "21", "counterparty_name": "Recambios Sur",
     "counterparty_tax_id": "B12345674", "category": "recambios"},
    {"kind": "issued_invoice", "reference": "F-2024-004", "date": "2024-09-30",
     "base": "640.00", "vat_rate": "10"},
    {"kind": "expense", "reference": "SEG-24", "date": "2024-11-02",
     "base": "350.00", "vat_rate": "0", "category": "seguros"},
    {"kind": "issued_invoice", "reference": "F-2024-005", "date": "sin fecha",
     "base": "99.00", "vat_rate": "21"}
]"#;

const CONFIG: &str = r#"{
    "declarant_tax_id": "12345678Z",
    "declarant_name": "GARCIA LOPEZ JUAN",
    "program_version": "1.00"
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let config = DeclarationConfig::from_json(CONFIG)?;
    config.validate()?;
    let declarant = config.declarant();

    let raw: Vec<RawRecord> = serde_json::from_str(RECORDS)?;
    let records = raw
        .into_iter()
        .map(FinancialRecord::from_raw)
        .collect::<Result<Vec<_>, _>>()?;
    let mut source = InMemorySource::from_records(records);
    source.add_counterparty(
        "c-01",
        CounterpartyInfo {
            name: "TRANSPORTES EBRO SA".into(),
            tax_id: Some("A58818501".into()),
        },
    );

    let mut files = Vec::new();
    let mut compensation = rust_decimal::Decimal::ZERO;
    for quarter in Quarter::ALL {
        let inputs = VatInputs {
            compensation_from_prior_periods: compensation,
        };
        let vat = build_303(&source, &declarant, 2024, quarter, &inputs)?;
        println!(
            "303 {quarter}: devengada {} deducible {} resultado {} ({})",
            vat.total_cuota_devengada(),
            vat.total_cuota_deducible(),
            vat.resultado(),
            vat.result_type()
        );
        // A negative result is carried to the next quarter.
        compensation = (-vat.resultado()).max(rust_decimal::Decimal::ZERO);
        files.push(boe::modelo_303(&vat, &config));

        let advance = build_130(&source, &declarant, 2024, quarter, &IncomeTaxInputs::new(false))?;
        println!(
            "130 {quarter}: rendimiento {} total {} ({})",
            advance.rendimiento_neto(),
            advance.total(),
            advance.result_type()
        );
        files.push(boe::modelo_130(&advance, &config));
    }

    let summary = build_390(&source, &declarant, 2024, &AnnualVatInputs::default())?;
    println!("390: resultado {} ({})", summary.resultado(), summary.result_type());
    files.push(boe::modelo_390(&summary, &config));

    let report = build_347(&source, &declarant, 2024)?;
    for c in report.counterparties() {
        println!(
            "347 {} {:<30} {:>10}",
            c.operation.code(),
            c.name,
            c.annual_total
        );
    }
    files.push(boe::modelo_347(&report, &config));

    for file in &files {
        let path = out_dir.join(&file.file_name);
        std::fs::write(&path, &file.content)?;
        tracing::info!(path = %path.display(), bytes = file.content.len(), "wrote declaration");
    }
    Ok(())
}
