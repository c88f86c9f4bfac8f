//! Point lookups and period-over-period changes for a single index.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::QueryError;
use super::stats::{mean, median, monthly_changes, percent_change, round2};
use crate::domain::{Change, ChangeStats, Observation, Period, SeriesCode};
use crate::index::SeriesIndex;

/// Most recent observation for `code`.
pub fn latest(index: &SeriesIndex, code: &str) -> Result<Observation, QueryError> {
    index.latest(code).ok_or_else(|| QueryError::not_found(code))
}

/// Value at an exact period.
pub fn value_at(index: &SeriesIndex, period: Period, code: &str) -> Result<f64, QueryError> {
    index
        .get(period, code)
        .ok_or_else(|| QueryError::not_found_at(code, period))
}

/// Percentage change from `months` before the latest period to the latest period.
///
/// Rounded to 2 decimals. A missing start value or a zero start value is
/// `InsufficientData`.
pub fn change(index: &SeriesIndex, code: &str, months: u32) -> Result<Change, QueryError> {
    let to = latest(index, code)?;
    let from = to
        .period
        .add_months(-months_i32(months))
        .ok_or_else(|| QueryError::insufficient(code, format!("a {months}-month window starts before 0000M01")))?;

    let from_value = index
        .get(from, code)
        .ok_or_else(|| QueryError::insufficient(code, format!("no value at {from} for a {months}-month comparison")))?;
    let pct = percent_change(from_value, to.value)
        .ok_or_else(|| QueryError::insufficient(code, format!("value at {from} is zero")))?;

    Ok(Change {
        from,
        to: to.period,
        change_percent: round2(pct),
    })
}

/// `months`-month change for every code in the index.
///
/// Codes whose change cannot be computed are left out. A window longer than
/// the available history simply yields fewer (or no) entries.
pub fn increase_over_months(index: &SeriesIndex, months: u32) -> BTreeMap<SeriesCode, f64> {
    let codes: Vec<&str> = index.codes().collect();
    codes
        .par_iter()
        .filter_map(|&code| {
            change(index, code, months)
                .ok()
                .map(|c| (code.to_string(), c.change_percent))
        })
        .collect()
}

/// Mean and median month-over-month change across the `months + 1` most
/// recent observations of `code`.
///
/// The window is taken over recorded periods, so a gap in the series makes
/// the corresponding pair span more than one calendar month.
pub fn average_and_median_change(index: &SeriesIndex, code: &str, months: u32) -> Result<ChangeStats, QueryError> {
    let series = index.series(code);
    if series.is_empty() {
        return Err(QueryError::not_found(code));
    }
    if months == 0 {
        return Err(QueryError::insufficient(code, "a window of 0 months has no pairs to compare"));
    }

    let needed = months as usize + 1;
    if series.len() < needed {
        return Err(QueryError::insufficient(
            code,
            format!("need {needed} observations, have {}", series.len()),
        ));
    }

    let recent: Vec<f64> = series[series.len() - needed..].iter().map(|o| o.value).collect();
    summarize(code, &monthly_changes(&recent))
}

/// Last `months` observations of `code`, oldest first.
pub fn historical_values(index: &SeriesIndex, code: &str, months: usize) -> Vec<Observation> {
    let series = index.series(code);
    let start = series.len().saturating_sub(months);
    series[start..].to_vec()
}

/// Mean and median month-over-month change over the full history of `code`.
pub fn historical_change_stats(index: &SeriesIndex, code: &str) -> Result<ChangeStats, QueryError> {
    let values: Vec<f64> = index.series(code).iter().map(|o| o.value).collect();
    if values.is_empty() {
        return Err(QueryError::not_found(code));
    }
    summarize(code, &monthly_changes(&values))
}

/// `historical_change_stats` for every code that has at least one valid pair.
pub fn historical_change_stats_all(index: &SeriesIndex) -> BTreeMap<SeriesCode, ChangeStats> {
    let codes: Vec<&str> = index.codes().collect();
    codes
        .par_iter()
        .filter_map(|&code| {
            historical_change_stats(index, code)
                .ok()
                .map(|stats| (code.to_string(), stats))
        })
        .collect()
}

fn summarize(code: &str, changes: &[f64]) -> Result<ChangeStats, QueryError> {
    match (mean(changes), median(changes)) {
        (Some(average), Some(median)) => Ok(ChangeStats {
            average: round2(average),
            median: round2(median),
        }),
        _ => Err(QueryError::insufficient(code, "no valid month-over-month changes")),
    }
}

fn months_i32(months: u32) -> i32 {
    i32::try_from(months).unwrap_or(i32::MAX)
}
