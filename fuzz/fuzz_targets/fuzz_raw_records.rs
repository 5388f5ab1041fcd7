#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use tributa::core::*;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<Vec<RawRecord>>(data) else {
        return;
    };
    // Out-of-range amounts are rejected here; sums that overflow are
    // rejected by the builders below.
    let records: Vec<FinancialRecord> = raw
        .into_iter()
        .filter_map(|r| FinancialRecord::from_raw(r).ok())
        .collect();
    let year = DeclarationPeriod::annual(2024).unwrap();
    let _ = aggregate(&records, year.range());
    let (issued, received): (Vec<_>, Vec<_>) =
        records.into_iter().partition(|r| r.kind.is_sale());

    let declarant = Declarant::new("12345678Z", "FUZZ");
    let config = DeclarationConfigBuilder::new("12345678Z", "FUZZ").build();

    // Must not panic; errors are fine.
    if let Ok(d) = tributa::iva::compute_303(
        &declarant,
        2024,
        Quarter::Q1,
        &issued,
        &received,
        &tributa::iva::VatInputs::default(),
    ) {
        let _ = tributa::boe::modelo_303(&d, &config);
    }
    if let Ok(a) = tributa::irpf::compute_130(
        &declarant,
        2024,
        Quarter::Q4,
        &issued,
        &received,
        &tributa::irpf::IncomeTaxInputs::new(true),
    ) {
        let _ = tributa::boe::modelo_130(&a, &config);
    }
    if let Ok(r) =
        tributa::terceros::compute_347(&declarant, 2024, &issued, &received, &HashMap::new())
    {
        let _ = tributa::boe::modelo_347(&r, &config);
    }
});
