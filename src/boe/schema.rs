//! Declarative field layouts for BOE pages.
//!
//! A model's layout is plain data: an ordered list of pages, each an ordered
//! list of tagged fields. A yearly format change is an edit to a static table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::money::{blanks, format_amount, pad_left, pad_right, zero_pad};

/// Tag of the declarant tax id on page 1.
pub const NIF: &str = "NIF";
/// Tag of the declarant name on page 1.
pub const NOMBRE: &str = "NOMBRE";
/// Tag of the fiscal year on page 1.
pub const EJERCICIO: &str = "EJERCICIO";
/// Tag of the period code on page 1.
pub const PERIODO: &str = "PERIODO";

/// Padding side for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    /// Text first, spaces after.
    Left,
    /// Spaces first, text after.
    Right,
}

/// How a field's value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Two decimals, `.` separator, no grouping, variable width.
    Amount,
    /// Zero-padded non-negative integer.
    Count { width: usize },
    /// Space-padded text, truncated when longer than `width`.
    Text { width: usize, align: Align },
}

/// One leaf tag of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub tag: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn amount(tag: &'static str) -> Self {
        Self {
            tag,
            kind: FieldKind::Amount,
        }
    }

    pub const fn count(tag: &'static str, width: usize) -> Self {
        Self {
            tag,
            kind: FieldKind::Count { width },
        }
    }

    pub const fn text(tag: &'static str, width: usize) -> Self {
        Self {
            tag,
            kind: FieldKind::Text {
                width,
                align: Align::Left,
            },
        }
    }

    pub const fn text_right(tag: &'static str, width: usize) -> Self {
        Self {
            tag,
            kind: FieldKind::Text {
                width,
                align: Align::Right,
            },
        }
    }

    /// Render `value` for this field. A missing value renders as zero or blanks.
    pub fn render(&self, value: Option<&FieldValue>) -> String {
        match (self.kind, value) {
            (FieldKind::Amount, Some(FieldValue::Amount(v))) => format_amount(*v),
            (FieldKind::Amount, Some(FieldValue::Count(n))) => format_amount(Decimal::from(*n)),
            (FieldKind::Amount, None) => format_amount(Decimal::ZERO),
            (FieldKind::Count { width }, Some(FieldValue::Count(n))) => zero_pad(*n, width),
            (FieldKind::Count { width }, None) => zero_pad(0, width),
            (FieldKind::Text { width, align }, value) => {
                let text = match value {
                    Some(FieldValue::Text(t)) => t.clone(),
                    Some(FieldValue::Amount(v)) => format_amount(*v),
                    Some(FieldValue::Count(n)) => n.to_string(),
                    None => return blanks(width),
                };
                match align {
                    Align::Left => pad_right(&text, width),
                    Align::Right => pad_left(&text, width),
                }
            }
            (kind, Some(other)) => {
                tracing::warn!(
                    tag = self.tag,
                    kind = ?kind,
                    value = ?other,
                    "value does not fit field kind; rendered as zero"
                );
                self.render(None)
            }
        }
    }
}

/// One page section, `<T{model}0{number}000>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    pub number: u8,
    pub fields: &'static [FieldSpec],
    /// Rendered once per value set (e.g. per counterparty) instead of once.
    pub repeated: bool,
}

/// The page layout of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoeSchema {
    /// Three-digit model code, e.g. `"303"`.
    pub model: &'static str,
    pub pages: &'static [PageSpec],
}

impl BoeSchema {
    pub fn page(&self, number: u8) -> Option<&PageSpec> {
        self.pages.iter().find(|p| p.number == number)
    }
}

/// A value supplied for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldValue {
    Amount(Decimal),
    Count(u64),
    Text(String),
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Amount(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Count(v)
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        Self::Count(u64::try_from(v).unwrap_or(u64::MAX))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Count(u64::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<char> for FieldValue {
    fn from(v: char) -> Self {
        Self::Text(v.to_string())
    }
}

/// Values of one page instance, keyed by tag.
pub type FieldValues = BTreeMap<&'static str, FieldValue>;

/// Build a [`FieldValues`] map from `(tag, value)` pairs.
pub fn values<I, V>(pairs: I) -> FieldValues
where
    I: IntoIterator<Item = (&'static str, V)>,
    V: Into<FieldValue>,
{
    pairs.into_iter().map(|(k, v)| (k, v.into())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_missing_is_zero() {
        assert_eq!(FieldSpec::amount("01").render(None), "0.00");
        assert_eq!(
            FieldSpec::amount("01").render(Some(&FieldValue::Amount(dec!(1234.5)))),
            "1234.50"
        );
    }

    #[test]
    fn text_pads_and_truncates() {
        let f = FieldSpec::text("NIF", 9);
        assert_eq!(f.render(Some(&"B123".into())), "B123     ");
        assert_eq!(f.render(Some(&"B1234567890".into())), "B12345678");
        assert_eq!(f.render(None), "         ");
        assert_eq!(
            FieldSpec::text_right("X", 5).render(Some(&"ab".into())),
            "   ab"
        );
    }

    #[test]
    fn count_is_zero_padded() {
        let f = FieldSpec::count("EJERCICIO", 4);
        assert_eq!(f.render(Some(&FieldValue::Count(2024))), "2024");
        assert_eq!(FieldSpec::count("N", 6).render(Some(&7u64.into())), "000007");
        assert_eq!(f.render(None), "0000");
    }

    #[test]
    fn counts_convert_from_integer_types() {
        assert_eq!(FieldValue::from(12usize), FieldValue::Count(12));
        assert_eq!(FieldValue::from(usize::MAX), FieldValue::Count(u64::try_from(usize::MAX).unwrap()));
        assert_eq!(FieldValue::from(3u32), FieldValue::Count(3));
    }

    #[test]
    fn mismatched_value_renders_zero() {
        let f = FieldSpec::count("N", 3);
        assert_eq!(f.render(Some(&"abc".into())), "000");
        assert_eq!(FieldSpec::amount("01").render(Some(&"x".into())), "0.00");
    }
}
