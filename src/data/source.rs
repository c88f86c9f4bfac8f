//! Data sources: one fixed table query per price index, loaded into indexes.
//!
//! A `DataSource` is built once (one or two blocking fetches) and is
//! read-only afterwards. Refreshing means loading a new one.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::analytics::{self, QueryError};
use crate::data::labels::{CONSTRUCTION_LABELS, CPI_LABELS, Labels, PPI_LABELS, StaticLabels};
use crate::data::px::Transport;
use crate::domain::{Change, ChangeStats, Observation, Period, SeriesCode, SourceKind};
use crate::error::{AppError, EXIT_USAGE};
use crate::index::{DropStats, KeyLayout, SeriesIndex, WeightIndex, build_index, build_weights};

const CPI_CODE_PATTERN: &str = r"^IS\d+$";

/// One table to fetch and how to read its rows.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub endpoint: &'static str,
    /// Content item selected through the `Liður` dimension; `None` sends an
    /// empty query (whole table).
    pub item: Option<&'static str>,
    pub layout: KeyLayout,
    pub code_pattern: Option<&'static str>,
}

impl TableSpec {
    pub fn query_body(&self) -> Value {
        let query = match self.item {
            Some(item) => json!([{
                "code": "Liður",
                "selection": { "filter": "item", "values": [item] }
            }]),
            None => json!([]),
        };
        json!({ "query": query, "response": { "format": "json" } })
    }

    fn pattern(&self) -> Result<Option<Regex>, AppError> {
        self.code_pattern
            .map(|p| {
                Regex::new(p).map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid code pattern '{p}': {e}")))
            })
            .transpose()
    }
}

/// Fixed description of a source: value table, optional weight table,
/// headline series and labels.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub values: TableSpec,
    pub weights: Option<TableSpec>,
    pub headline: Option<&'static str>,
    pub labels: StaticLabels,
}

impl SourceSpec {
    pub fn for_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Cpi => SourceSpec {
                kind,
                values: TableSpec {
                    endpoint: "is/Efnahagur/visitolur/1_vnv/2_undirvisitolur/VIS01301.px",
                    item: Some("index_B1997"),
                    layout: KeyLayout::PERIOD_ITEM_CODE,
                    code_pattern: Some(CPI_CODE_PATTERN),
                },
                weights: Some(TableSpec {
                    endpoint: "is/Efnahagur/visitolur/1_vnv/2_undirvisitolur/VIS01305.px",
                    item: None,
                    layout: KeyLayout::CODE_PERIOD,
                    code_pattern: Some(CPI_CODE_PATTERN),
                }),
                headline: Some("IS00"),
                labels: CPI_LABELS,
            },
            SourceKind::Ppi => SourceSpec {
                kind,
                values: TableSpec {
                    endpoint: "is/Efnahagur/visitolur/5_visitalaframleidslu/framleidsluverd/VIS08000.px",
                    item: Some("index"),
                    layout: KeyLayout::PERIOD_ITEM_CODE,
                    code_pattern: None,
                },
                weights: None,
                headline: Some("PPI"),
                labels: PPI_LABELS,
            },
            SourceKind::Construction => SourceSpec {
                kind,
                values: TableSpec {
                    endpoint: "is/Efnahagur/visitolur/2_byggingarvisitala/byggingarvisitala/VIS03001.px",
                    item: Some("index"),
                    layout: KeyLayout::PERIOD_ITEM_CODE,
                    code_pattern: None,
                },
                weights: None,
                headline: None,
                labels: CONSTRUCTION_LABELS,
            },
        }
    }
}

/// A loaded price index.
#[derive(Debug, Clone)]
pub struct DataSource {
    spec: SourceSpec,
    series: SeriesIndex,
    weights: Option<WeightIndex>,
    drops: DropStats,
    weight_drops: DropStats,
}

impl DataSource {
    /// Fetch and index the source's tables.
    pub fn load(transport: &dyn Transport, kind: SourceKind) -> Result<Self, AppError> {
        Self::load_spec(transport, SourceSpec::for_kind(kind))
    }

    /// Like `load`, with an explicit spec (e.g. an overridden endpoint).
    pub fn load_spec(transport: &dyn Transport, spec: SourceSpec) -> Result<Self, AppError> {
        let raw = transport.post(spec.values.endpoint, &spec.values.query_body())?;
        let (series, drops) = build_index(&raw.data, spec.values.layout, spec.values.pattern()?);
        info!(
            source = spec.kind.display_name(),
            entries = series.len(),
            codes = series.code_count(),
            dropped = drops.total(),
            "loaded series index"
        );
        if series.is_empty() {
            warn!(source = spec.kind.display_name(), "series index is empty");
        }

        let (weights, weight_drops) = match &spec.weights {
            Some(table) => {
                let raw = transport.post(table.endpoint, &table.query_body())?;
                let (weights, drops) = build_weights(&raw.data, table.layout, table.pattern()?);
                info!(entries = weights.len(), dropped = drops.total(), "loaded weight index");
                if weights.is_empty() {
                    warn!(source = spec.kind.display_name(), "weight index is empty");
                }
                (Some(weights), drops)
            }
            None => (None, DropStats::default()),
        };

        Ok(Self {
            spec,
            series,
            weights,
            drops,
            weight_drops,
        })
    }

    /// Wrap already-built indexes (no fetch).
    pub fn from_indexes(kind: SourceKind, series: SeriesIndex, weights: Option<WeightIndex>) -> Self {
        Self {
            spec: SourceSpec::for_kind(kind),
            series,
            weights,
            drops: DropStats::default(),
            weight_drops: DropStats::default(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.spec.kind
    }

    pub fn series(&self) -> &SeriesIndex {
        &self.series
    }

    pub fn weights(&self) -> Option<&WeightIndex> {
        self.weights.as_ref()
    }

    /// Records skipped while building the value and weight indexes.
    pub fn drop_stats(&self) -> (DropStats, DropStats) {
        (self.drops, self.weight_drops)
    }

    pub fn headline_code(&self) -> Option<&'static str> {
        self.spec.headline
    }

    pub fn list_codes(&self) -> Vec<SeriesCode> {
        self.series.codes().map(str::to_string).collect()
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.spec.labels.label(code)
    }

    /// Label, or the code itself when none is known.
    pub fn label_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.spec.labels.label_or_code(code)
    }

    pub fn current(&self, code: &str) -> Result<Observation, QueryError> {
        analytics::latest(&self.series, code)
    }

    pub fn value_for(&self, period: Period, code: &str) -> Result<f64, QueryError> {
        analytics::value_at(&self.series, period, code)
    }

    pub fn change(&self, code: &str, months: u32) -> Result<Change, QueryError> {
        analytics::change(&self.series, code, months)
    }

    pub fn twelve_month_change(&self, code: &str) -> Result<Change, QueryError> {
        self.change(code, 12)
    }

    /// 12-month change of the headline series (e.g. `IS00` for the CPI).
    pub fn headline_change(&self) -> Result<Change, AppError> {
        let code = self.spec.headline.ok_or_else(|| {
            AppError::new(
                EXIT_USAGE,
                format!("{} has no headline series.", self.spec.kind.display_name()),
            )
        })?;
        Ok(self.twelve_month_change(code)?)
    }

    pub fn increase_over_months(&self, months: u32) -> BTreeMap<SeriesCode, f64> {
        analytics::increase_over_months(&self.series, months)
    }

    pub fn average_and_median_change(&self, code: &str, months: u32) -> Result<ChangeStats, QueryError> {
        analytics::average_and_median_change(&self.series, code, months)
    }

    pub fn historical_values(&self, code: &str, months: usize) -> Vec<Observation> {
        analytics::historical_values(&self.series, code, months)
    }

    /// Weight of `code` at `period`; `None` when not published.
    pub fn weight(&self, period: Period, code: &str) -> Option<f64> {
        self.weights.as_ref()?.get(period, code)
    }

    /// Weights at the most recent weight period (empty without weights).
    pub fn latest_weights(&self) -> BTreeMap<SeriesCode, f64> {
        self.weights
            .as_ref()
            .and_then(|w| w.latest_period().map(|p| w.weights_at(p)))
            .unwrap_or_default()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with {} entries across {} unique series codes.",
            self.spec.kind.display_name(),
            self.series.len(),
            self.series.code_count()
        )
    }
}
