//! Declaration periods and the date ranges they cover.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::DeclaracionError;

/// Calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// All quarters in calendar order.
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Parse a quarter number (1-4).
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => None,
        }
    }

    /// Quarter containing the given calendar month (1-12).
    pub fn of_month(month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Self::from_number(((month - 1) / 3 + 1) as u8)
        } else {
            None
        }
    }

    /// Quarter containing the given date.
    pub fn of_date(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Self::Q1,
            4..=6 => Self::Q2,
            7..=9 => Self::Q3,
            _ => Self::Q4,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    /// First and last month of the quarter: `3N-2 ..= 3N`.
    pub fn months(self) -> (u32, u32) {
        let n = u32::from(self.number());
        (3 * n - 2, 3 * n)
    }

    /// AEAT period code: "1T" .. "4T".
    pub fn code(self) -> &'static str {
        match self {
            Self::Q1 => "1T",
            Self::Q2 => "2T",
            Self::Q3 => "3T",
            Self::Q4 => "4T",
        }
    }

    /// Quarters strictly before this one in the same year.
    pub fn preceding(self) -> &'static [Quarter] {
        &Self::ALL[..usize::from(self.number() - 1)]
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unit of a declaration period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodUnit {
    Quarter(Quarter),
    Annual,
}

/// Inclusive date range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Year plus period unit. Pure value; its date ranges are fixed at construction.
///
/// Serialized as `{year, unit}`; deserializing goes through the same
/// validating constructors and recomputes the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PeriodRepr", try_from = "PeriodRepr")]
pub struct DeclarationPeriod {
    year: i32,
    unit: PeriodUnit,
    range: DateRange,
}

#[derive(Serialize, Deserialize)]
struct PeriodRepr {
    year: i32,
    unit: PeriodUnit,
}

impl From<DeclarationPeriod> for PeriodRepr {
    fn from(period: DeclarationPeriod) -> Self {
        Self {
            year: period.year,
            unit: period.unit,
        }
    }
}

impl TryFrom<PeriodRepr> for DeclarationPeriod {
    type Error = DeclaracionError;

    fn try_from(repr: PeriodRepr) -> Result<Self, Self::Error> {
        match repr.unit {
            PeriodUnit::Quarter(q) => Self::quarterly(repr.year, q),
            PeriodUnit::Annual => Self::annual(repr.year),
        }
    }
}

/// Years accepted by the four-digit `EJERCICIO` field.
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

impl DeclarationPeriod {
    /// Quarterly period.
    pub fn quarterly(year: i32, quarter: Quarter) -> Result<Self, DeclaracionError> {
        check_year(year)?;
        let (first, last) = quarter.months();
        let from = ymd(year, first, 1)?;
        let to = last_day_of_month(year, last)?;
        Ok(Self {
            year,
            unit: PeriodUnit::Quarter(quarter),
            range: DateRange::new(from, to),
        })
    }

    /// Quarterly period from a quarter number (1-4).
    pub fn quarter_number(year: i32, quarter: u8) -> Result<Self, DeclaracionError> {
        let q = Quarter::from_number(quarter)
            .ok_or_else(|| DeclaracionError::Period(format!("quarter {quarter} is not 1-4")))?;
        Self::quarterly(year, q)
    }

    /// Full calendar year.
    pub fn annual(year: i32) -> Result<Self, DeclaracionError> {
        check_year(year)?;
        Ok(Self {
            year,
            unit: PeriodUnit::Annual,
            range: DateRange::new(ymd(year, 1, 1)?, ymd(year, 12, 31)?),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    /// The quarter, if this is a quarterly period.
    pub fn quarter(&self) -> Option<Quarter> {
        match self.unit {
            PeriodUnit::Quarter(q) => Some(q),
            PeriodUnit::Annual => None,
        }
    }

    /// Dates covered by this period.
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// January 1 of the year through the end of this period.
    pub fn year_to_date(&self) -> DateRange {
        DateRange::new(self.year_start(), self.range.to)
    }

    /// AEAT period code: "1T".."4T", or "0A" for annual.
    pub fn code(&self) -> &'static str {
        match self.unit {
            PeriodUnit::Quarter(q) => q.code(),
            PeriodUnit::Annual => "0A",
        }
    }

    pub fn is_annual(&self) -> bool {
        self.unit == PeriodUnit::Annual
    }

    fn year_start(&self) -> NaiveDate {
        // Quarterly ranges start on day 1 of month 3N-2; for Q1 and annual
        // that is already January 1.
        self.range.from.with_month(1).unwrap_or(self.range.from)
    }
}

impl fmt::Display for DeclarationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.code())
    }
}

fn check_year(year: i32) -> Result<(), DeclaracionError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(DeclaracionError::Period(format!(
            "year {year} outside {MIN_YEAR}-{MAX_YEAR}"
        )))
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, DeclaracionError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DeclaracionError::Period(format!("invalid date {year}-{month}-{day}")))
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, DeclaracionError> {
    let next = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    next.pred_opt()
        .ok_or_else(|| DeclaracionError::Period(format!("no day before {next}")))
}
