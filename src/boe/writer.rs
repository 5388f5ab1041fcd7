//! Generic BOE serializer.
//!
//! Layout of a rendered file (one line, no separators):
//!
//! ```text
//! <T{model}{year}{period}0000>
//!   <AUX>{70 blanks}{version:4}{4 blanks}{tax id:9}{213 blanks}</AUX>
//!   <T{model}0{page}000> <tag>value</tag> ... </T{model}0{page}000>
//!   ...
//!   <TYPE>{result code}</TYPE>
//! </T{model}{year}{period}0000>
//! ```

use serde::Serialize;

use super::schema::{
    BoeSchema, EJERCICIO, FieldValue, FieldValues, NIF, NOMBRE, PERIODO, PageSpec,
};
use crate::core::money::{blanks, pad_right};
use crate::core::{DeclarationConfig, Declarant, DeclarationPeriod, ResultType};

const AUX_LEADING_BLANKS: usize = 70;
const AUX_VERSION_WIDTH: usize = 4;
const AUX_GAP_BLANKS: usize = 4;
const AUX_TAX_ID_WIDTH: usize = 9;
const AUX_TRAILING_BLANKS: usize = 213;

/// A declaration aggregate that can be laid out on BOE pages.
pub trait BoeDeclaration {
    fn declarant(&self) -> &Declarant;

    fn period(&self) -> &DeclarationPeriod;

    fn result_type(&self) -> ResultType;

    /// Values for each instance of `page`.
    ///
    /// Non-repeated pages use the first map (or none, rendering defaults).
    /// Repeated pages render once per map, and not at all for an empty list.
    fn page_values(&self, page: &PageSpec) -> Vec<FieldValues>;
}

/// A rendered declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoeFile {
    pub file_name: String,
    pub content: String,
}

/// `{model}{year}{period}.txt`, with the period left out for annual models.
pub fn file_name(model: &str, period: &DeclarationPeriod) -> String {
    if period.is_annual() {
        format!("{model}{}.txt", period.year())
    } else {
        format!("{model}{}{}.txt", period.year(), period.code())
    }
}

/// Render `doc` with the page layout in `schema`.
///
/// Page 1 header tags (`NIF`, `NOMBRE`, `EJERCICIO`, `PERIODO`) are filled
/// from the declaration unless its values already set them.
pub fn render<D: BoeDeclaration + ?Sized>(
    doc: &D,
    schema: &BoeSchema,
    config: &DeclarationConfig,
) -> String {
    let period = doc.period();
    let outer = format!("T{}{}{}0000", schema.model, period.year(), period.code());

    let mut out = String::with_capacity(1024);
    out.push_str(&format!("<{outer}>"));
    push_aux(&mut out, config);

    for page in schema.pages {
        let mut instances = doc.page_values(page);
        if !page.repeated {
            instances.truncate(1);
            if instances.is_empty() {
                instances.push(FieldValues::new());
            }
        }
        if page.number == 1 {
            for values in &mut instances {
                fill_header(values, doc);
            }
        }
        for values in &instances {
            push_page(&mut out, schema.model, page, values);
        }
    }

    out.push_str(&format!("<TYPE>{}</TYPE>", doc.result_type().code()));
    out.push_str(&format!("</{outer}>"));

    tracing::debug!(
        model = schema.model,
        period = %period,
        bytes = out.len(),
        "rendered BOE file"
    );
    out
}

/// Render `doc` and name the file after model and period.
pub fn render_file<D: BoeDeclaration + ?Sized>(
    doc: &D,
    schema: &BoeSchema,
    config: &DeclarationConfig,
) -> BoeFile {
    BoeFile {
        file_name: file_name(schema.model, doc.period()),
        content: render(doc, schema, config),
    }
}

fn push_aux(out: &mut String, config: &DeclarationConfig) {
    out.push_str("<AUX>");
    out.push_str(&blanks(AUX_LEADING_BLANKS));
    out.push_str(&pad_right(&config.program_version, AUX_VERSION_WIDTH));
    out.push_str(&blanks(AUX_GAP_BLANKS));
    out.push_str(&pad_right(&config.aux_tax_id(), AUX_TAX_ID_WIDTH));
    out.push_str(&blanks(AUX_TRAILING_BLANKS));
    out.push_str("</AUX>");
}

fn push_page(out: &mut String, model: &str, page: &PageSpec, values: &FieldValues) {
    let tag = format!("T{model}0{}000", page.number);
    out.push_str(&format!("<{tag}>"));
    for field in page.fields {
        let rendered = field.render(values.get(field.tag));
        out.push_str(&format!("<{t}>{rendered}</{t}>", t = field.tag));
    }
    out.push_str(&format!("</{tag}>"));
}

fn fill_header<D: BoeDeclaration + ?Sized>(values: &mut FieldValues, doc: &D) {
    let declarant = doc.declarant();
    let period = doc.period();
    values
        .entry(NIF)
        .or_insert_with(|| FieldValue::Text(declarant.tax_id.clone()));
    values
        .entry(NOMBRE)
        .or_insert_with(|| FieldValue::Text(declarant.name.clone()));
    values
        .entry(EJERCICIO)
        .or_insert_with(|| FieldValue::Count(u64::try_from(period.year()).unwrap_or(0)));
    values
        .entry(PERIODO)
        .or_insert_with(|| FieldValue::Text(period.code().to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boe::schema::{FieldSpec, values};
    use crate::core::{DeclarationConfigBuilder, Quarter};
    use rust_decimal_macros::dec;

    struct Fixed {
        declarant: Declarant,
        period: DeclarationPeriod,
        lines: Vec<FieldValues>,
    }

    impl BoeDeclaration for Fixed {
        fn declarant(&self) -> &Declarant {
            &self.declarant
        }

        fn period(&self) -> &DeclarationPeriod {
            &self.period
        }

        fn result_type(&self) -> ResultType {
            ResultType::Zero
        }

        fn page_values(&self, page: &PageSpec) -> Vec<FieldValues> {
            match page.number {
                1 => vec![values([("01", dec!(5))])],
                _ => self.lines.clone(),
            }
        }
    }

    static PAGE1: [FieldSpec; 3] = [
        FieldSpec::text(NIF, 9),
        FieldSpec::count(EJERCICIO, 4),
        FieldSpec::amount("01"),
    ];
    static PAGE2: [FieldSpec; 1] = [FieldSpec::text("X", 2)];
    static PAGES: [PageSpec; 2] = [
        PageSpec {
            number: 1,
            fields: &PAGE1,
            repeated: false,
        },
        PageSpec {
            number: 2,
            fields: &PAGE2,
            repeated: true,
        },
    ];
    static SCHEMA: BoeSchema = BoeSchema {
        model: "999",
        pages: &PAGES,
    };

    fn fixed(lines: Vec<FieldValues>) -> Fixed {
        Fixed {
            declarant: Declarant::new("12345678Z", "GARCIA"),
            period: DeclarationPeriod::quarterly(2024, Quarter::Q1).unwrap(),
            lines,
        }
    }

    fn config() -> DeclarationConfig {
        DeclarationConfigBuilder::new("12345678Z", "GARCIA").build()
    }

    #[test]
    fn aux_block_layout() {
        let out = render(&fixed(vec![]), &SCHEMA, &config());
        let aux = format!(
            "<AUX>{}1.00{}12345678Z{}</AUX>",
            " ".repeat(70),
            " ".repeat(4),
            " ".repeat(213)
        );
        assert!(out.starts_with(&format!("<T99920241T0000>{aux}")));
        assert!(out.ends_with("<TYPE>N</TYPE></T99920241T0000>"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn header_filled_and_repeated_page_skipped_when_empty() {
        let out = render(&fixed(vec![]), &SCHEMA, &config());
        assert!(out.contains(
            "<T99901000><NIF>12345678Z</NIF><EJERCICIO>2024</EJERCICIO><01>5.00</01></T99901000>"
        ));
        assert!(!out.contains("<T99902000>"));
    }

    #[test]
    fn repeated_page_once_per_instance() {
        let lines = vec![values([("X", "a")]), values([("X", "b")])];
        let out = render(&fixed(lines), &SCHEMA, &config());
        assert!(out.contains("<T99902000><X>a </X></T99902000><T99902000><X>b </X></T99902000>"));
    }

    #[test]
    fn annual_file_name_has_no_period() {
        let annual = DeclarationPeriod::annual(2024).unwrap();
        assert_eq!(file_name("390", &annual), "3902024.txt");
        let q = DeclarationPeriod::quarterly(2024, Quarter::Q3).unwrap();
        assert_eq!(file_name("303", &q), "30320243T.txt");
    }
}
