//! BOE layout for Modelo 390. Page 2 repeats once per quarter.

use super::schema::{
    BoeSchema, EJERCICIO, FieldSpec, FieldValue, FieldValues, NIF, NOMBRE, PERIODO, PageSpec,
    values,
};
use super::writer::{BoeDeclaration, BoeFile, render_file};
use crate::core::{DeclarationConfig, Declarant, DeclarationPeriod, ResultType, VatTier};
use crate::iva::AnnualVatSummary;

static PAGE_1: [FieldSpec; 22] = [
    FieldSpec::text(NIF, 9),
    FieldSpec::text(NOMBRE, 40),
    FieldSpec::count(EJERCICIO, 4),
    FieldSpec::text(PERIODO, 2),
    FieldSpec::amount("01"),
    FieldSpec::amount("02"),
    FieldSpec::amount("03"),
    FieldSpec::amount("04"),
    FieldSpec::amount("05"),
    FieldSpec::amount("06"),
    FieldSpec::amount("07"),
    FieldSpec::amount("08"),
    FieldSpec::amount("09"),
    FieldSpec::amount("150"),
    FieldSpec::amount("152"),
    FieldSpec::amount("47"),
    FieldSpec::amount("48"),
    FieldSpec::amount("49"),
    FieldSpec::amount("64"),
    FieldSpec::amount("65"),
    FieldSpec::amount("85"),
    FieldSpec::amount("86"),
];

/// Quarterly breakdown line.
static PAGE_2: [FieldSpec; 5] = [
    FieldSpec::text("TRIMESTRE", 2),
    FieldSpec::amount("27"),
    FieldSpec::amount("45"),
    FieldSpec::amount("46"),
    FieldSpec::amount("71"),
];

static PAGES: [PageSpec; 2] = [
    PageSpec {
        number: 1,
        fields: &PAGE_1,
        repeated: false,
    },
    PageSpec {
        number: 2,
        fields: &PAGE_2,
        repeated: true,
    },
];

/// Page layout of Modelo 390.
pub static SCHEMA_390: BoeSchema = BoeSchema {
    model: "390",
    pages: &PAGES,
};

impl BoeDeclaration for AnnualVatSummary {
    fn declarant(&self) -> &Declarant {
        AnnualVatSummary::declarant(self)
    }

    fn period(&self) -> &DeclarationPeriod {
        AnnualVatSummary::period(self)
    }

    fn result_type(&self) -> ResultType {
        AnnualVatSummary::result_type(self)
    }

    fn page_values(&self, page: &PageSpec) -> Vec<FieldValues> {
        match page.number {
            1 => {
                let mut v = FieldValues::new();
                let boxes = [
                    (VatTier::SuperReduced, ["01", "02", "03"]),
                    (VatTier::Reduced, ["04", "05", "06"]),
                    (VatTier::General, ["07", "08", "09"]),
                ];
                for (tier, [base, rate, cuota]) in boxes {
                    if let Some(line) = self.tier(tier) {
                        v.insert(base, FieldValue::Amount(line.base));
                        v.insert(rate, FieldValue::Amount(line.rate));
                        v.insert(cuota, FieldValue::Amount(line.cuota));
                    }
                }
                if let Some(other) = self.tier(VatTier::Other) {
                    v.insert("150", FieldValue::Amount(other.base));
                    v.insert("152", FieldValue::Amount(other.cuota));
                }
                v.extend(values([
                    ("47", self.total_cuota_devengada()),
                    ("48", self.base_deducible()),
                    ("49", self.total_cuota_deducible()),
                    ("64", self.total_cuota_deducible()),
                    ("65", self.diferencia()),
                    ("85", self.compensation_applied()),
                    ("86", self.resultado()),
                ]));
                vec![v]
            }
            2 => self
                .quarters()
                .iter()
                .map(|q| {
                    let mut v = values([
                        ("27", q.total_cuota_devengada()),
                        ("45", q.total_cuota_deducible()),
                        ("46", q.diferencia()),
                        ("71", q.resultado()),
                    ]);
                    v.insert("TRIMESTRE", q.period().code().into());
                    v
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Render a Modelo 390 file.
pub fn modelo_390(summary: &AnnualVatSummary, config: &DeclarationConfig) -> BoeFile {
    render_file(summary, &SCHEMA_390, config)
}
