//! Immutable `(period, code) -> value` tables.
//!
//! Values are stored per code in period order, so "all observations of this
//! code, oldest first" is a direct lookup instead of a scan over every key.

use std::collections::BTreeMap;

use regex::Regex;

use crate::domain::{Observation, Period, SeriesCode};
use crate::index::filter::{DropStats, Entry, KeyLayout, RawRecord, RecordFilter};

#[derive(Debug, Clone, Default, PartialEq)]
struct PeriodTable {
    by_code: BTreeMap<SeriesCode, BTreeMap<Period, f64>>,
    len: usize,
}

impl PeriodTable {
    // Later duplicates overwrite earlier ones.
    fn insert(&mut self, period: Period, code: SeriesCode, value: f64) {
        let previous = self.by_code.entry(code).or_default().insert(period, value);
        if previous.is_none() {
            self.len += 1;
        }
    }

    fn get(&self, period: Period, code: &str) -> Option<f64> {
        self.by_code.get(code)?.get(&period).copied()
    }

    fn latest(&self, code: &str) -> Option<Observation> {
        let (&period, &value) = self.by_code.get(code)?.last_key_value()?;
        Some(Observation { period, value })
    }

    fn series(&self, code: &str) -> Vec<Observation> {
        self.by_code
            .get(code)
            .map(|m| {
                m.iter()
                    .map(|(&period, &value)| Observation { period, value })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl FromIterator<Entry> for PeriodTable {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut table = PeriodTable::default();
        for entry in iter {
            table.insert(entry.period, entry.code, entry.value);
        }
        table
    }
}

/// Measured index values keyed by `(period, series code)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesIndex {
    table: PeriodTable,
}

impl SeriesIndex {
    /// Value at an exact `(period, code)` key.
    pub fn get(&self, period: Period, code: &str) -> Option<f64> {
        self.table.get(period, code)
    }

    /// Most recent observation for `code`.
    pub fn latest(&self, code: &str) -> Option<Observation> {
        self.table.latest(code)
    }

    /// All observations for `code`, oldest first.
    pub fn series(&self, code: &str) -> Vec<Observation> {
        self.table.series(code)
    }

    /// All periods recorded for `code`, ascending.
    pub fn periods_for(&self, code: &str) -> Vec<Period> {
        self.table
            .by_code
            .get(code)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Distinct series codes, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.by_code.keys().map(String::as_str)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.table.by_code.contains_key(code)
    }

    pub fn code_count(&self) -> usize {
        self.table.by_code.len()
    }

    /// Number of `(period, code)` entries.
    pub fn len(&self) -> usize {
        self.table.len
    }

    pub fn is_empty(&self) -> bool {
        self.table.len == 0
    }
}

impl FromIterator<(Period, SeriesCode, f64)> for SeriesIndex {
    fn from_iter<I: IntoIterator<Item = (Period, SeriesCode, f64)>>(iter: I) -> Self {
        let table = iter
            .into_iter()
            .map(|(period, code, value)| Entry { period, code, value })
            .collect();
        Self { table }
    }
}

/// Relative expenditure weights keyed by `(period, series code)`.
///
/// Coverage is independent of the `SeriesIndex` it is paired with: weights are
/// published on their own schedule and for their own set of codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightIndex {
    table: PeriodTable,
}

impl WeightIndex {
    pub fn get(&self, period: Period, code: &str) -> Option<f64> {
        self.table.get(period, code)
    }

    /// Latest period that carries any weight.
    pub fn latest_period(&self) -> Option<Period> {
        self.table
            .by_code
            .values()
            .filter_map(|m| m.last_key_value().map(|(p, _)| *p))
            .max()
    }

    /// Every weight published for `period`.
    pub fn weights_at(&self, period: Period) -> BTreeMap<SeriesCode, f64> {
        self.table
            .by_code
            .iter()
            .filter_map(|(code, m)| m.get(&period).map(|w| (code.clone(), *w)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len
    }

    pub fn is_empty(&self) -> bool {
        self.table.len == 0
    }
}

impl FromIterator<(Period, SeriesCode, f64)> for WeightIndex {
    fn from_iter<I: IntoIterator<Item = (Period, SeriesCode, f64)>>(iter: I) -> Self {
        let table = iter
            .into_iter()
            .map(|(period, code, value)| Entry { period, code, value })
            .collect();
        Self { table }
    }
}

/// Build a value index from raw records.
pub fn build_index<'a, I>(records: I, layout: KeyLayout, code_pattern: Option<Regex>) -> (SeriesIndex, DropStats)
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let (entries, drops) = RecordFilter::new(layout, code_pattern).apply(records);
    let table = entries.into_iter().collect();
    (SeriesIndex { table }, drops)
}

/// Build a weight index from raw records.
pub fn build_weights<'a, I>(records: I, layout: KeyLayout, code_pattern: Option<Regex>) -> (WeightIndex, DropStats)
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let (entries, drops) = RecordFilter::new(layout, code_pattern).apply(records);
    let table = entries.into_iter().collect();
    (WeightIndex { table }, drops)
}
