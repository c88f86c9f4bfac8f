//! Multi-step workflows shared by the CLI handlers.
//!
//! Each workflow composes several analytics calls over one loaded source:
//! load -> query -> (rank | project)

use serde::Serialize;

use crate::analytics::{self, QueryError};
use crate::data::{DataSource, PxClient};
use crate::domain::{ForecastPoint, ImpactRow, Observation, SourceKind};
use crate::error::{AppError, EXIT_USAGE};

/// Build the transport and load one source.
pub fn load_source(kind: SourceKind, base_url: Option<&str>) -> Result<DataSource, AppError> {
    let client = match base_url {
        Some(url) => PxClient::new(url),
        None => PxClient::from_env()?,
    };
    DataSource::load(&client, kind)
}

/// Both projections of one series.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRun {
    pub code: String,
    pub last: Observation,
    pub window: usize,
    pub sliding: Vec<ForecastPoint>,
    pub historical_average: Vec<ForecastPoint>,
}

pub fn run_forecast(
    source: &DataSource,
    code: Option<&str>,
    horizon: usize,
    window: usize,
) -> Result<ForecastRun, AppError> {
    let code = match code {
        Some(code) => code.to_string(),
        None => source
            .headline_code()
            .ok_or_else(|| AppError::new(EXIT_USAGE, "No series given and the source has no headline series."))?
            .to_string(),
    };

    let series = source.series().series(&code);
    let last = *series.last().ok_or_else(|| QueryError::not_found(&code))?;
    let history: Vec<f64> = series.iter().map(|o| o.value).collect();

    let with_series = |err: QueryError| match err {
        QueryError::InsufficientData { series: None, reason } => QueryError::insufficient(&code, reason),
        other => other,
    };
    let sliding = analytics::forecast_sliding(&history, horizon, window).map_err(with_series)?;
    let historical = analytics::forecast_historical_average(&history, horizon).map_err(with_series)?;

    Ok(ForecastRun {
        sliding: analytics::label_forecast(last, &sliding),
        historical_average: analytics::label_forecast(last, &historical),
        code,
        last,
        window,
    })
}

/// Weighted impact table at the latest weight period.
pub fn run_impact(source: &DataSource, months: u32, top: usize) -> Result<Vec<ImpactRow>, AppError> {
    if source.weights().is_none() {
        return Err(AppError::new(
            EXIT_USAGE,
            format!("{} has no weights; impact needs --source cpi.", source.kind().display_name()),
        ));
    }
    let weights = source.latest_weights();
    let increases = source.increase_over_months(months);
    Ok(analytics::impact_table(source.series(), &increases, &weights, months, top))
}
