//! `hagstofa` library crate.
//!
//! Loads Statistics Iceland price indices (CPI, production, construction)
//! from the PX-Web API into immutable `(period, series)` indexes and derives
//! analytics from them: changes, trend statistics, weighted impact rankings
//! and naive forecasts.
//!
//! The binary (`hagstofa`) is a thin wrapper around this library so that the
//! analytics are testable without network access or spawning processes.

pub mod analytics;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod index;
pub mod report;
