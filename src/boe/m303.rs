//! BOE layout for Modelo 303.

use super::schema::{
    BoeSchema, EJERCICIO, FieldSpec, FieldValues, NIF, NOMBRE, PERIODO, PageSpec, values,
};
use super::writer::{BoeDeclaration, BoeFile, render_file};
use crate::core::{DeclarationConfig, Declarant, DeclarationPeriod, ResultType, VatTier};
use crate::iva::VatDeclaration;

/// Identification and output VAT.
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
    FieldSpec::amount("08"),
    FieldSpec::amount("09"),
    FieldSpec::amount("150"),
    FieldSpec::amount("152"),
];

/// Input VAT and result.
static PAGE_2: [FieldSpec; 7] = [
    FieldSpec::amount("27"),
    FieldSpec::amount("28"),
    FieldSpec::amount("29"),
    FieldSpec::amount("45"),
    FieldSpec::amount("46"),
    FieldSpec::amount("78"),
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
        repeated: false,
    },
];

/// Page layout of Modelo 303.
pub static SCHEMA_303: BoeSchema = BoeSchema {
    model: "303",
    pages: &PAGES,
};

impl BoeDeclaration for VatDeclaration {
    fn declarant(&self) -> &Declarant {
        VatDeclaration::declarant(self)
    }

    fn period(&self) -> &DeclarationPeriod {
        VatDeclaration::period(self)
    }

    fn result_type(&self) -> ResultType {
        VatDeclaration::result_type(self)
    }

    fn page_values(&self, page: &PageSpec) -> Vec<FieldValues> {
        match page.number {
            1 => {
                let sr = self.tier(VatTier::SuperReduced);
                let r = self.tier(VatTier::Reduced);
                let g = self.tier(VatTier::General);
                let o = self.tier(VatTier::Other);
                vec![values([
                    ("01", sr.base),
                    ("02", sr.rate),
                    ("03", sr.cuota),
                    ("04", r.base),
                    ("05", r.rate),
                    ("06", r.cuota),
                    ("07", g.base),
                    ("08", g.rate),
                    ("09", g.cuota),
                    ("150", o.base),
                    ("152", o.cuota),
                ])]
            }
            2 => vec![values([
                ("27", self.total_cuota_devengada()),
                ("28", self.base_deducible()),
                ("29", self.total_cuota_deducible()),
                ("45", self.total_cuota_deducible()),
                ("46", self.diferencia()),
                ("78", self.compensation_applied()),
                ("71", self.resultado()),
            ])],
            _ => Vec::new(),
        }
    }
}

/// Render a Modelo 303 file.
pub fn modelo_303(declaration: &VatDeclaration, config: &DeclarationConfig) -> BoeFile {
    render_file(declaration, &SCHEMA_303, config)
}
