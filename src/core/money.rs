//! Decimal rounding and fixed-width text rendering.
//!
//! Every amount that leaves the engine goes through [`round_half_up`] at two
//! decimals and is rendered by [`format_amount`]: plain `.` separator, no digit
//! grouping, exactly two decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::DeclaracionError;

/// Scale mandated for every declared amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest magnitude of a single amount or running sum: fifteen integer
/// digits, the width of an AEAT amount field.
pub const MAX_AMOUNT: Decimal = dec!(999999999999999.99);

/// Largest VAT rate magnitude accepted on a record, in percent.
pub const MAX_VAT_RATE: Decimal = dec!(100);

/// Reject an amount whose magnitude exceeds [`MAX_AMOUNT`].
pub fn check_amount(field: &'static str, value: Decimal) -> Result<Decimal, DeclaracionError> {
    if value.abs() > MAX_AMOUNT {
        return Err(DeclaracionError::AmountOutOfRange { field, value });
    }
    Ok(value)
}

/// Add two amounts, failing instead of panicking when the sum leaves the
/// declarable range.
pub fn add_amounts(
    field: &'static str,
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, DeclaracionError> {
    a.checked_add(b)
        .filter(|sum| sum.abs() <= MAX_AMOUNT)
        .ok_or(DeclaracionError::Overflow { field })
}

/// Checked sum of a sequence of amounts.
pub fn sum_amounts(
    field: &'static str,
    values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, DeclaracionError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add_amounts(field, acc, v))
}

/// Round half away from zero: `2.005 -> 2.01`, `-1.005 -> -1.01`.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the declaration scale (two decimals).
pub fn round2(value: Decimal) -> Decimal {
    round_half_up(value, AMOUNT_SCALE)
}

/// Render an amount with exactly two decimals and a `.` separator.
///
/// Negative zero renders as `0.00`.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round2(value);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

/// Left-align `text` in a field of `width` characters (spaces on the right).
/// Longer text is truncated.
pub fn pad_right(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Right-align `text` in a field of `width` characters (spaces on the left).
/// Longer text is truncated, keeping its leading characters.
pub fn pad_left(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    let len = truncated.chars().count();
    let mut out: String = std::iter::repeat_n(' ', width - len).collect();
    out.push_str(&truncated);
    out
}

/// Zero-pad a count to `width` digits. Values wider than the field keep
/// their lowest `width` digits.
pub fn zero_pad(value: u64, width: usize) -> String {
    let s = format!("{value:0>width$}");
    let len = s.len();
    if len > width {
        s[len - width..].to_string()
    } else {
        s
    }
}

/// A run of `width` spaces, used for reserved filler.
pub fn blanks(width: usize) -> String {
    " ".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_bounds() {
        assert_eq!(check_amount("base", MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(check_amount("base", -MAX_AMOUNT).is_ok());
        assert!(matches!(
            check_amount("base", MAX_AMOUNT + dec!(0.01)),
            Err(DeclaracionError::AmountOutOfRange { field: "base", .. })
        ));
        assert!(matches!(
            add_amounts("total", MAX_AMOUNT, dec!(0.01)),
            Err(DeclaracionError::Overflow { field: "total" })
        ));
        assert!(matches!(
            add_amounts("total", Decimal::MAX, Decimal::MAX),
            Err(DeclaracionError::Overflow { .. })
        ));
        assert_eq!(
            sum_amounts("vat", [dec!(1.10), dec!(2.20), dec!(-0.30)]).unwrap(),
            dec!(3.00)
        );
        assert_eq!(sum_amounts("vat", []).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rounds_half_up_on_magnitude() {
        assert_eq!(round_half_up(dec!(2.005), 2), dec!(2.01));
        assert_eq!(round_half_up(dec!(-1.005), 2), dec!(-1.01));
        assert_eq!(round_half_up(dec!(2.004), 2), dec!(2.00));
        assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
    }

    #[test]
    fn format_amount_basic() {
        assert_eq!(format_amount(dec!(1234.56)), "1234.56");
        assert_eq!(format_amount(dec!(100)), "100.00");
        assert_eq!(format_amount(dec!(0.1)), "0.10");
        assert_eq!(format_amount(dec!(1234567.891)), "1234567.89");
    }

    #[test]
    fn format_amount_negative() {
        assert_eq!(format_amount(dec!(-168)), "-168.00");
        assert_eq!(format_amount(dec!(-1.005)), "-1.01");
    }

    #[test]
    fn format_amount_never_negative_zero() {
        assert_eq!(format_amount(dec!(-0.001)), "0.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn padding_and_truncation() {
        assert_eq!(pad_right("B123", 6), "B123  ");
        assert_eq!(pad_left("B123", 6), "  B123");
        assert_eq!(pad_right("ABCDEFGHIJ", 4), "ABCD");
        assert_eq!(pad_left("ABCDEFGHIJ", 4), "ABCD");
        assert_eq!(pad_right("", 3), "   ");
    }

    #[test]
    fn padding_counts_chars_not_bytes() {
        assert_eq!(pad_right("Peña", 6), "Peña  ");
        assert_eq!(pad_right("Muñoz Ibáñez", 5), "Muñoz");
    }

    #[test]
    fn zero_pad_counts() {
        assert_eq!(zero_pad(7, 4), "0007");
        assert_eq!(zero_pad(2024, 4), "2024");
        assert_eq!(zero_pad(123456, 4), "3456");
    }
}
