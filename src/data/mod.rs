pub mod labels;
pub mod px;
pub mod source;

pub use labels::{Labels, StaticLabels};
pub use px::{PxClient, PxResponse, Transport};
pub use source::{DataSource, SourceSpec, TableSpec};
