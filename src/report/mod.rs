//! Terminal reports for the CLI.

pub mod format;

pub use format::*;
