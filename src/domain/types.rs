//! Shared domain types.
//!
//! Query results are plain serializable values so the CLI can print them as
//! tables or emit them as JSON without an intermediate layer.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Period;

/// Identifier of a sub-index within a table (`IS0112`, `Marine`, ...).
pub type SeriesCode = String;

/// Which Statistics Iceland price index to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Consumer price index sub-indices (with expenditure weights).
    Cpi,
    /// Production price index by category.
    Ppi,
    /// Construction cost index by category.
    Construction,
}

impl SourceKind {
    /// Human-readable name for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            SourceKind::Cpi => "CPI Data Source",
            SourceKind::Ppi => "Production Price Index",
            SourceKind::Construction => "Construction Price Index",
        }
    }
}

/// A single value at a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: Period,
    pub value: f64,
}

/// Percentage change between two periods of the same series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub from: Period,
    pub to: Period,
    pub change_percent: f64,
}

/// Mean and median of a set of month-over-month percentage changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub average: f64,
    pub median: f64,
}

/// Weighted contribution of one series to the movement of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub code: SeriesCode,
    pub score: f64,
}

/// One row of the impact table: how a high-impact series is moving compared
/// with its own history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRow {
    pub code: SeriesCode,
    pub score: f64,
    /// Change over the requested window (percent).
    pub change_percent: f64,
    /// `change_percent` spread evenly over the window's months.
    pub monthly_average: f64,
    /// Mean month-over-month change across the full history.
    pub historical_average: f64,
    /// `monthly_average - historical_average`.
    pub deviation: f64,
}

/// A projected value and its change from the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: Period,
    pub value: f64,
    pub change_percent: f64,
}
