//! Monthly reporting periods in the PX-Web `YYYYMmm` notation.
//!
//! Statistics Iceland labels every monthly observation with a period string
//! such as `2024M01`. We parse those once at ingestion into a [`Period`] and
//! do all date arithmetic and ordering on the parsed value. The fixed-width
//! format happens to sort correctly as text, but nothing here relies on that.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid period '{0}': expected YYYYMmm, e.g. 2024M01")]
    Format(String),
}

/// A calendar year and month, from `0000M01` through `9999M12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Build a period from a four-digit year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(PeriodError::Format(format!("{year:04}M{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Parse the canonical `YYYYMmm` form.
    ///
    /// Exactly four digits, a literal `M`, and two digits in `01..=12`.
    /// Anything else (signs, whitespace, lowercase `m`, three-digit months)
    /// is rejected.
    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        let err = || PeriodError::Format(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'M' {
            return Err(err());
        }
        let (year, month) = (&s[..4], &s[5..]);
        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).map_err(|_| err())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by `n` months; negative `n` moves backwards.
    ///
    /// `None` when the result falls outside `0000M01..=9999M12`.
    pub fn add_months(self, n: i32) -> Option<Self> {
        let first = self.first_day()?;
        let months = Months::new(n.unsigned_abs());
        let shifted = if n >= 0 {
            first.checked_add_months(months)
        } else {
            first.checked_sub_months(months)
        }?;
        Self::from_date(&shifted)
    }

    /// The period containing `date`, if its year has four digits.
    pub fn from_date<D: Datelike>(date: &D) -> Option<Self> {
        Self::new(date.year(), date.month()).ok()
    }

    /// First calendar day of the period.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month.cmp(&other.month))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}M{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}
