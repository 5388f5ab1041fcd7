//! BOE layout for Modelo 130.

use super::schema::{
    BoeSchema, EJERCICIO, FieldSpec, FieldValues, NIF, NOMBRE, PERIODO, PageSpec, values,
};
use super::writer::{BoeDeclaration, BoeFile, render_file};
use crate::core::{DeclarationConfig, Declarant, DeclarationPeriod, ResultType};
use crate::irpf::IncomeTaxAdvance;

static PAGE_1: [FieldSpec; 15] = [
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
    FieldSpec::amount("13"),
    FieldSpec::amount("14"),
    FieldSpec::amount("18"),
    FieldSpec::amount("19"),
];

static PAGES: [PageSpec; 1] = [PageSpec {
    number: 1,
    fields: &PAGE_1,
    repeated: false,
}];

/// Page layout of Modelo 130.
pub static SCHEMA_130: BoeSchema = BoeSchema {
    model: "130",
    pages: &PAGES,
};

impl BoeDeclaration for IncomeTaxAdvance {
    fn declarant(&self) -> &Declarant {
        IncomeTaxAdvance::declarant(self)
    }

    fn period(&self) -> &DeclarationPeriod {
        IncomeTaxAdvance::period(self)
    }

    fn result_type(&self) -> ResultType {
        IncomeTaxAdvance::result_type(self)
    }

    fn page_values(&self, page: &PageSpec) -> Vec<FieldValues> {
        if page.number != 1 {
            return Vec::new();
        }
        vec![values([
            ("01", self.ingresos()),
            ("02", self.gastos()),
            ("03", self.rendimiento_neto()),
            ("04", self.pago_cuenta()),
            ("05", self.pagos_anteriores()),
            ("06", self.retenciones()),
            ("07", self.resultado_previo()),
            ("13", self.first_year_relief()),
            ("14", self.resultado()),
            ("18", self.a_deducir()),
            ("19", self.total()),
        ])]
    }
}

/// Render a Modelo 130 file.
pub fn modelo_130(advance: &IncomeTaxAdvance, config: &DeclarationConfig) -> BoeFile {
    render_file(advance, &SCHEMA_130, config)
}
