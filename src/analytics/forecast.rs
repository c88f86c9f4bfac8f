//! Naive short-horizon projections.
//!
//! Neither projection is a fitted model. Both take an average month-over-month
//! growth rate and compound it forward from the last known value:
//!
//! - `forecast_sliding`: the rate is re-estimated each step from the trailing
//!   `window` changes of the growing series (projected values included)
//! - `forecast_historical_average`: one rate from the full history, applied
//!   to every step

use super::QueryError;
use super::stats::{mean, monthly_changes, percent_change, round2};
use crate::domain::{ForecastPoint, Observation, Period};

/// Default trailing window for `forecast_sliding` (one year of monthly data).
pub const DEFAULT_WINDOW: usize = 12;

/// Project `horizon` further values by compounding the trailing average change.
///
/// `history` is oldest first and must hold at least `window + 1` values.
pub fn forecast_sliding(history: &[f64], horizon: usize, window: usize) -> Result<Vec<f64>, QueryError> {
    if window == 0 {
        return Err(QueryError::insufficient_history("window must cover at least one change"));
    }
    let Some(span) = window.checked_add(1).filter(|&span| history.len() >= span) else {
        return Err(QueryError::insufficient_history(format!(
            "a {window}-month window needs {window} month-over-month changes, have {}",
            history.len().saturating_sub(1)
        )));
    };

    let mut series = history.to_vec();
    let mut projected = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let tail = &series[series.len() - span..];
        let rate = mean(&monthly_changes(tail))
            .ok_or_else(|| QueryError::insufficient_history("no valid changes in the trailing window"))?;
        let next = step(&series, rate)?;
        series.push(next);
        projected.push(next);
    }
    Ok(projected)
}

/// Project `horizon` further values by compounding the mean change across the
/// whole of `history`.
pub fn forecast_historical_average(history: &[f64], horizon: usize) -> Result<Vec<f64>, QueryError> {
    if history.len() < 2 {
        return Err(QueryError::insufficient_history(format!(
            "need at least 2 values, have {}",
            history.len()
        )));
    }
    let rate = mean(&monthly_changes(history))
        .ok_or_else(|| QueryError::insufficient_history("no valid month-over-month changes"))?;

    let mut series = history.to_vec();
    let mut projected = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        let next = step(&series, rate)?;
        series.push(next);
        projected.push(next);
    }
    Ok(projected)
}

/// Periods following `last`, one per projected value.
///
/// Stops early if the horizon runs past `9999M12`.
pub fn forecast_periods(last: Period, horizon: usize) -> Vec<Period> {
    (1..=horizon)
        .map_while(|i| i32::try_from(i).ok().and_then(|i| last.add_months(i)))
        .collect()
}

/// Attach periods and step-over-step changes to projected values.
///
/// `last` is the final observed value the projection continues from.
pub fn label_forecast(last: Observation, projected: &[f64]) -> Vec<ForecastPoint> {
    let periods = forecast_periods(last.period, projected.len());
    let mut previous = last.value;
    periods
        .into_iter()
        .zip(projected)
        .map(|(period, &value)| {
            let change_percent = percent_change(previous, value).map(round2).unwrap_or(0.0);
            previous = value;
            ForecastPoint {
                period,
                value,
                change_percent,
            }
        })
        .collect()
}

fn step(series: &[f64], rate: f64) -> Result<f64, QueryError> {
    let last = series
        .last()
        .copied()
        .ok_or_else(|| QueryError::insufficient_history("empty series"))?;
    let next = last * (1.0 + rate / 100.0);
    if next.is_finite() {
        Ok(next)
    } else {
        Err(QueryError::insufficient_history("projection diverged"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sliding_needs_window_plus_one_values() {
        let history = vec![100.0; 12];
        assert!(matches!(
            forecast_sliding(&history, 6, 12),
            Err(QueryError::InsufficientData { series: None, .. })
        ));
        assert!(forecast_sliding(&[], 1, DEFAULT_WINDOW).is_err());
        assert!(forecast_sliding(&[1.0, 2.0], 1, 0).is_err());
    }

    #[test]
    fn sliding_rejects_unbounded_window() {
        assert!(matches!(
            forecast_sliding(&[1.0, 2.0, 3.0], 1, usize::MAX),
            Err(QueryError::InsufficientData { series: None, .. })
        ));
    }

    #[test]
    fn sliding_compounds_constant_growth() {
        let history: Vec<f64> = (0..13).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let projected = forecast_sliding(&history, 3, 12).unwrap();
        assert_eq!(projected.len(), 3);
        let last = history[12];
        assert!(close(projected[0], last * 1.01));
        assert!(close(projected[2], last * 1.01_f64.powi(3)));
    }

    #[test]
    fn sliding_window_includes_projected_values() {
        // Window of 1: each step repeats the previous step's change.
        let projected = forecast_sliding(&[100.0, 110.0], 2, 1).unwrap();
        assert!(close(projected[0], 121.0));
        assert!(close(projected[1], 133.1));
    }

    #[test]
    fn sliding_with_zero_horizon_is_empty() {
        assert!(forecast_sliding(&[1.0, 2.0], 0, 1).unwrap().is_empty());
    }

    #[test]
    fn sliding_rejects_window_of_zeros() {
        assert!(forecast_sliding(&[0.0, 0.0, 0.0], 1, 2).is_err());
    }

    #[test]
    fn historical_average_uses_whole_history() {
        // Changes: +10%, -10% -> mean 0, so the projection stays flat.
        let projected = forecast_historical_average(&[100.0, 110.0, 99.0], 2).unwrap();
        assert_eq!(projected.len(), 2);
        assert!((projected[0] - 99.0).abs() < 1e-6);
        assert!((projected[1] - 99.0).abs() < 1e-6);

        assert!(forecast_historical_average(&[100.0], 3).is_err());
    }

    #[test]
    fn periods_follow_the_last_observation() {
        let last = Period::parse("2024M11").unwrap();
        let labels: Vec<String> = forecast_periods(last, 3).iter().map(Period::to_string).collect();
        assert_eq!(labels, ["2024M12", "2025M01", "2025M02"]);

        let end = Period::parse("9999M11").unwrap();
        assert_eq!(forecast_periods(end, 5).len(), 1);
    }

    #[test]
    fn labelled_points_carry_step_changes() {
        let last = Observation {
            period: Period::parse("2024M12").unwrap(),
            value: 100.0,
        };
        let points = label_forecast(last, &[102.0, 102.0]);
        assert_eq!(points[0].period.to_string(), "2025M01");
        assert_eq!(points[0].change_percent, 2.0);
        assert_eq!(points[1].change_percent, 0.0);
    }
}
