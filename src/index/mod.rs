//! Ingestion of raw table rows into in-memory indexes.
//!
//! - record validation + drop accounting (`filter`)
//! - the value and weight indexes (`series`)

pub mod filter;
pub mod series;

pub use filter::*;
pub use series::*;
