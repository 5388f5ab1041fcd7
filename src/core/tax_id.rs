//! Spanish tax identifier (NIF / NIE / CIF) normalization and validation.

use std::fmt;

/// Control letters for NIF and NIE, indexed by `number % 23`.
const NIF_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Control letters for CIF, indexed by the computed control digit.
const CIF_LETTERS: &[u8; 10] = b"JABCDEFGHI";

/// Leading letters allowed for a CIF (legal entities).
const CIF_PREFIXES: &str = "ABCDEFGHJNPQRSUVW";

/// Error returned when a tax identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxIdError {
    /// The (normalized) value that failed.
    pub value: String,
    /// Why it failed.
    pub reason: String,
}

impl fmt::Display for TaxIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tax id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for TaxIdError {}

/// Kind of Spanish tax identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdKind {
    /// DNI-based NIF of a resident individual.
    Nif,
    /// Foreigner identity number (X/Y/Z prefix).
    Nie,
    /// Legal entity code.
    Cif,
}

/// Normalize a tax id: trim, uppercase, drop separators and an `ES` VAT prefix.
///
/// ```
/// use tributa::core::normalize_tax_id;
/// assert_eq!(normalize_tax_id(" es-12.345.678-z "), "12345678Z");
/// ```
pub fn normalize_tax_id(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '/'))
        .flat_map(char::to_uppercase)
        .collect();
    if cleaned.len() == 11 && cleaned.starts_with("ES") {
        cleaned[2..].to_string()
    } else {
        cleaned
    }
}

/// Classify a normalized id by shape alone (no control character check).
pub fn tax_id_kind(id: &str) -> Option<TaxIdKind> {
    let b = id.as_bytes();
    if b.len() != 9 || !id.is_ascii() {
        return None;
    }
    let middle_digits = b[1..8].iter().all(u8::is_ascii_digit);
    let last = b[8];

    if b[0].is_ascii_digit() && middle_digits && last.is_ascii_uppercase() {
        return Some(TaxIdKind::Nif);
    }
    if matches!(b[0], b'X' | b'Y' | b'Z') && middle_digits && last.is_ascii_uppercase() {
        return Some(TaxIdKind::Nie);
    }
    if CIF_PREFIXES.as_bytes().contains(&b[0])
        && middle_digits
        && (last.is_ascii_digit() || (b'A'..=b'J').contains(&last))
    {
        return Some(TaxIdKind::Cif);
    }
    None
}

/// True if the (already normalized) value has the shape of a NIF, NIE or CIF.
pub fn looks_like_tax_id(id: &str) -> bool {
    tax_id_kind(id).is_some()
}

/// Validate a tax id including its control character.
///
/// The input is normalized first; the normalized form is returned on success.
pub fn validate_tax_id(raw: &str) -> Result<String, TaxIdError> {
    let id = normalize_tax_id(raw);
    let err = |reason: &str| TaxIdError {
        value: id.clone(),
        reason: reason.into(),
    };

    let kind = tax_id_kind(&id).ok_or_else(|| err("not a NIF, NIE or CIF"))?;
    let b = id.as_bytes();

    let ok = match kind {
        TaxIdKind::Nif => nif_letter(&id[..8]) == Some(b[8]),
        TaxIdKind::Nie => {
            let prefix = match b[0] {
                b'X' => '0',
                b'Y' => '1',
                _ => '2',
            };
            let number = format!("{prefix}{}", &id[1..8]);
            nif_letter(&number) == Some(b[8])
        }
        TaxIdKind::Cif => {
            let digit = cif_control_digit(&id[1..8]);
            b[8] == b'0' + digit || b[8] == CIF_LETTERS[digit as usize]
        }
    };

    if ok {
        Ok(id)
    } else {
        Err(err("control character mismatch"))
    }
}

fn nif_letter(number: &str) -> Option<u8> {
    let n: u32 = number.parse().ok()?;
    Some(NIF_LETTERS[(n % 23) as usize])
}

fn cif_control_digit(digits: &str) -> u8 {
    let sum: u32 = digits
        .bytes()
        .map(|c| u32::from(c - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                doubled / 10 + doubled % 10
            } else {
                d
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}
