//! BOE layout for Modelo 347. Page 2 repeats once per declared counterparty.

use super::schema::{
    BoeSchema, EJERCICIO, FieldSpec, FieldValues, NIF, NOMBRE, PERIODO, PageSpec, values,
};
use super::writer::{BoeDeclaration, BoeFile, render_file};
use crate::core::{DeclarationConfig, Declarant, DeclarationPeriod, ResultType};
use crate::terceros::ThirdPartyReport;

static PAGE_1: [FieldSpec; 10] = [
    FieldSpec::text(NIF, 9),
    FieldSpec::text(NOMBRE, 40),
    FieldSpec::count(EJERCICIO, 4),
    FieldSpec::text(PERIODO, 2),
    FieldSpec::count("01", 9),
    FieldSpec::amount("02"),
    FieldSpec::count("03", 9),
    FieldSpec::amount("04"),
    FieldSpec::count("05", 9),
    FieldSpec::amount("06"),
];

static PAGE_2: [FieldSpec; 9] = [
    FieldSpec::text("NIF_DECLARADO", 9),
    FieldSpec::text("NOMBRE_DECLARADO", 40),
    FieldSpec::text("CLAVE", 1),
    FieldSpec::amount("IMPORTE"),
    FieldSpec::amount("IMPORTE_1T"),
    FieldSpec::amount("IMPORTE_2T"),
    FieldSpec::amount("IMPORTE_3T"),
    FieldSpec::amount("IMPORTE_4T"),
    FieldSpec::count("OPERACIONES", 6),
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

/// Page layout of Modelo 347.
pub static SCHEMA_347: BoeSchema = BoeSchema {
    model: "347",
    pages: &PAGES,
};

impl BoeDeclaration for ThirdPartyReport {
    fn declarant(&self) -> &Declarant {
        ThirdPartyReport::declarant(self)
    }

    fn period(&self) -> &DeclarationPeriod {
        ThirdPartyReport::period(self)
    }

    fn result_type(&self) -> ResultType {
        ThirdPartyReport::result_type(self)
    }

    fn page_values(&self, page: &PageSpec) -> Vec<FieldValues> {
        match page.number {
            1 => {
                let mut v = values([
                    ("01", self.num_declarados()),
                    ("03", self.sales_count()),
                    ("05", self.purchases_count()),
                ]);
                v.extend(values([
                    ("02", self.importe_total()),
                    ("04", self.sales_amount()),
                    ("06", self.purchases_amount()),
                ]));
                vec![v]
            }
            2 => self
                .counterparties()
                .iter()
                .map(|c| {
                    let mut v = values([
                        ("IMPORTE", c.annual_total),
                        ("IMPORTE_1T", c.quarterly[0]),
                        ("IMPORTE_2T", c.quarterly[1]),
                        ("IMPORTE_3T", c.quarterly[2]),
                        ("IMPORTE_4T", c.quarterly[3]),
                    ]);
                    // A blank tax id is rendered as padding.
                    if let Some(id) = &c.tax_id {
                        v.insert("NIF_DECLARADO", id.as_str().into());
                    }
                    v.insert("NOMBRE_DECLARADO", c.name.as_str().into());
                    v.insert("CLAVE", c.operation.code().into());
                    v.insert("OPERACIONES", c.operation_count.into());
                    v
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Render a Modelo 347 file.
pub fn modelo_347(report: &ThirdPartyReport, config: &DeclarationConfig) -> BoeFile {
    render_file(report, &SCHEMA_347, config)
}
