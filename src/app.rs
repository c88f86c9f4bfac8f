//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the selected price index
//! - runs the requested query
//! - prints a text report or JSON

use clap::Parser;
use serde::Serialize;

use crate::analytics::QueryError;
use crate::cli::{Cli, Command};
use crate::data::DataSource;
use crate::domain::Observation;
use crate::error::{AppError, EXIT_NO_DATA, EXIT_USAGE};
use crate::report;

pub mod pipeline;

/// Entry point for the `hagstofa` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let source = pipeline::load_source(cli.source, cli.base_url.as_deref())?;
    execute(&source, cli.command, cli.json)
}

/// Run one command against an already-loaded source.
pub fn execute(source: &DataSource, command: Command, json: bool) -> Result<(), AppError> {
    let out = Output { json };

    match command {
        Command::Summary => {
            #[derive(Serialize)]
            struct Summary<'a> {
                source: &'a str,
                entries: usize,
                codes: usize,
                dropped: usize,
                weight_entries: Option<usize>,
            }
            let (drops, _) = source.drop_stats();
            out.emit(
                &Summary {
                    source: source.kind().display_name(),
                    entries: source.series().len(),
                    codes: source.series().code_count(),
                    dropped: drops.total(),
                    weight_entries: source.weights().map(|w| w.len()),
                },
                || report::format_summary(source),
            )
        }
        Command::Codes => out.emit(&source.list_codes(), || report::format_codes(source)),
        Command::Current { code } => {
            let obs = source.current(&code)?;
            out.emit(&obs, || report::format_observation(source, &code, &obs))
        }
        Command::Value { period, code } => {
            let value = source.value_for(period, &code)?;
            let obs = Observation { period, value };
            out.emit(&obs, || report::format_observation(source, &code, &obs))
        }
        Command::Change(args) => {
            let change = source.change(&args.code, args.months)?;
            out.emit(&change, || report::format_change(source, &args.code, &change))
        }
        Command::Headline => {
            let change = source.headline_change()?;
            let code = source.headline_code().unwrap_or_default();
            out.emit(&change, || report::format_change(source, code, &change))
        }
        Command::Increases(args) => {
            let increases = source.increase_over_months(args.months);
            out.emit(&increases, || report::format_increases(source, &increases, args.months))
        }
        Command::Stats(args) => {
            let stats = source.average_and_median_change(&args.code, args.months)?;
            out.emit(&stats, || report::format_stats(source, &args.code, &stats, args.months))
        }
        Command::History(args) => {
            let values = source.historical_values(&args.code, args.months as usize);
            if values.is_empty() {
                return Err(QueryError::not_found(&args.code).into());
            }
            out.emit(&values, || report::format_history(source, &args.code, &values))
        }
        Command::Weight { period, code } => {
            if source.weights().is_none() {
                return Err(AppError::new(
                    EXIT_USAGE,
                    format!("{} has no weights.", source.kind().display_name()),
                ));
            }
            let weight = source.weight(period, &code).ok_or_else(|| {
                AppError::new(EXIT_NO_DATA, format!("No weight found for {period} and series '{code}'"))
            })?;
            out.emit(&weight, || format!("{code} weight at {period}: {weight:.3}"))
        }
        Command::Impact(args) => {
            let rows = pipeline::run_impact(source, args.months, args.top)?;
            out.emit(&rows, || report::format_impact_table(source, &rows, args.months))
        }
        Command::Forecast(args) => {
            let run = pipeline::run_forecast(source, args.code.as_deref(), args.horizon, args.window)?;
            out.emit(&run, || {
                report::format_forecast(
                    source,
                    &run.code,
                    &run.last,
                    &run.sliding,
                    &run.historical_average,
                    run.window,
                )
            })
        }
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), AppError> {
        if self.json {
            let rendered = serde_json::to_string_pretty(value)
                .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to render JSON: {e}")))?;
            println!("{rendered}");
        } else {
            println!("{}", text().trim_end());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{SeriesWindowArgs, WindowArgs};
    use crate::domain::{Period, SourceKind};
    use crate::index::SeriesIndex;

    fn cpi() -> DataSource {
        let p = |s: &str| Period::parse(s).unwrap();
        let series: SeriesIndex = [
            (p("2023M01"), "IS00".to_string(), 100.0),
            (p("2024M01"), "IS00".to_string(), 105.0),
        ]
        .into_iter()
        .collect();
        DataSource::from_indexes(SourceKind::Cpi, series, None)
    }

    #[test]
    fn no_data_maps_to_exit_code_3() {
        let err = execute(
            &cpi(),
            Command::Change(SeriesWindowArgs {
                code: "XX".to_string(),
                months: 12,
            }),
            false,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_NO_DATA);
    }

    #[test]
    fn queries_succeed_in_both_output_modes() {
        let source = cpi();
        assert!(execute(&source, Command::Headline, false).is_ok());
        assert!(execute(&source, Command::Increases(WindowArgs { months: 12 }), true).is_ok());
        assert!(execute(&source, Command::Summary, true).is_ok());
    }

    #[test]
    fn weight_without_weights_is_usage_error() {
        let err = execute(
            &cpi(),
            Command::Weight {
                period: Period::parse("2024M01").unwrap(),
                code: "IS00".to_string(),
            },
            false,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }
}
