//! Derived metrics over a `SeriesIndex`.
//!
//! Every function here is pure: it reads an index (and optionally a weight
//! map) and returns a new value. "No data" is a normal outcome and comes back
//! as a [`QueryError`], never as a zero, `NaN` or infinity.

use thiserror::Error;

use crate::domain::Period;

pub mod forecast;
pub mod impact;
pub mod query;
pub mod stats;

pub use forecast::*;
pub use impact::*;
pub use query::*;
pub use stats::{mean, median, monthly_changes, percent_change, round2};

/// Why a query produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Nothing is recorded for the series (or for the requested period).
    #[error("No data found for series '{series}'{}", at_period(.period))]
    NotFound { series: String, period: Option<Period> },
    /// Data exists but not enough of it to compute the result.
    #[error("Insufficient data for {}: {reason}", subject(.series))]
    InsufficientData { series: Option<String>, reason: String },
}

impl QueryError {
    pub fn not_found(series: &str) -> Self {
        QueryError::NotFound {
            series: series.to_string(),
            period: None,
        }
    }

    pub fn not_found_at(series: &str, period: Period) -> Self {
        QueryError::NotFound {
            series: series.to_string(),
            period: Some(period),
        }
    }

    pub fn insufficient(series: &str, reason: impl Into<String>) -> Self {
        QueryError::InsufficientData {
            series: Some(series.to_string()),
            reason: reason.into(),
        }
    }

    /// Insufficient data in a bare value history (no series attached).
    pub fn insufficient_history(reason: impl Into<String>) -> Self {
        QueryError::InsufficientData {
            series: None,
            reason: reason.into(),
        }
    }
}

fn at_period(period: &Option<Period>) -> String {
    period.map(|p| format!(" at {p}")).unwrap_or_default()
}

fn subject(series: &Option<String>) -> String {
    match series {
        Some(code) => format!("series '{code}'"),
        None => "history".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_request() {
        let p = Period::parse("1990M01").unwrap();
        assert_eq!(
            QueryError::not_found_at("XX", p).to_string(),
            "No data found for series 'XX' at 1990M01"
        );
        assert_eq!(QueryError::not_found("XX").to_string(), "No data found for series 'XX'");
        assert_eq!(
            QueryError::insufficient("IS00", "no value at 2023M01").to_string(),
            "Insufficient data for series 'IS00': no value at 2023M01"
        );
        assert_eq!(
            QueryError::insufficient_history("need 13 values, have 4").to_string(),
            "Insufficient data for history: need 13 values, have 4"
        );
    }
}
