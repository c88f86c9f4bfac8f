//! Command-line parsing for the price-index analytics tool.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! loading and analytics.

use clap::{Args, Parser, Subcommand};

use crate::analytics::DEFAULT_WINDOW;
use crate::domain::{Period, SourceKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hagstofa", version, about = "Statistics Iceland price-index analytics")]
pub struct Cli {
    /// Which price index to load.
    #[arg(short = 's', long, value_enum, default_value_t = SourceKind::Cpi, global = true)]
    pub source: SourceKind,

    /// PX-Web API base URL (overrides HAGSTOFA_API_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Entry counts, drop counts and the headline value.
    Summary,
    /// List series codes with labels.
    Codes,
    /// Latest value of a series.
    Current { code: String },
    /// Value of a series at a period (YYYYMmm).
    Value { period: Period, code: String },
    /// Change of a series over N months, ending at its latest period.
    Change(SeriesWindowArgs),
    /// 12-month change of the headline series.
    Headline,
    /// Change over N months for every series.
    Increases(WindowArgs),
    /// Average and median monthly change over the last N months.
    Stats(SeriesWindowArgs),
    /// Last N values of a series.
    History(SeriesWindowArgs),
    /// Weight of a series at a period (CPI only).
    Weight { period: Period, code: String },
    /// Weighted impact table (CPI only).
    Impact(ImpactArgs),
    /// Project a series forward.
    Forecast(ForecastArgs),
}

#[derive(Debug, Args, Clone)]
pub struct WindowArgs {
    /// Window length in months.
    #[arg(short = 'm', long, default_value_t = 12)]
    pub months: u32,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesWindowArgs {
    pub code: String,

    /// Window length in months.
    #[arg(short = 'm', long, default_value_t = 12)]
    pub months: u32,
}

#[derive(Debug, Args, Clone)]
pub struct ImpactArgs {
    /// Window length in months for the change being weighted.
    #[arg(short = 'm', long, default_value_t = 12)]
    pub months: u32,

    /// Number of rows to show.
    #[arg(long, default_value_t = 25)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    /// Series to project (defaults to the source's headline series).
    pub code: Option<String>,

    /// Number of months to project.
    #[arg(long, default_value_t = 6)]
    pub horizon: usize,

    /// Trailing window (months) for the sliding-average projection.
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
}
