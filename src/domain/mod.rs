//! Domain types used throughout the crate.
//!
//! - the `YYYYMmm` reporting period (`Period`)
//! - source selection (`SourceKind`)
//! - query results (`Observation`, `Change`, `ChangeStats`, `Impact`, `ImpactRow`,
//!   `ForecastPoint`)

pub mod period;
pub mod types;

pub use period::*;
pub use types::*;
