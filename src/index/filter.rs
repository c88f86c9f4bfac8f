//! Raw record validation and normalization.
//!
//! This module turns PX-Web `data` rows into clean `(period, code, value)`
//! triples that are safe to index.
//!
//! Design goals:
//! - **Per-source key layout**: the value table and the weight table list
//!   their dimensions in different orders, so positions are configuration
//! - **Row-level filtering**: malformed rows are skipped, never fatal
//! - **Counted drops**: every skipped row lands in a `DropStats` bucket so
//!   data-quality expectations can be asserted on

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{Period, SeriesCode};

/// One row of a PX-Web table response.
///
/// `key` holds the dimension values in the order the table declares them;
/// `values` holds the measured cells (we only ever query one content column).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl RawRecord {
    pub fn new<K: Into<String>>(key: impl IntoIterator<Item = K>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into_iter().map(Into::into).collect(),
            values: vec![value.into()],
        }
    }
}

/// Where the period and series code sit inside `RawRecord::key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLayout {
    /// Minimum number of key entries a record must carry.
    pub arity: usize,
    pub period: usize,
    pub code: usize,
}

impl KeyLayout {
    /// `[period, item, code]`, used by the index value tables.
    pub const PERIOD_ITEM_CODE: KeyLayout = KeyLayout {
        arity: 3,
        period: 0,
        code: 2,
    };

    /// `[code, period]`, used by the CPI weight table.
    pub const CODE_PERIOD: KeyLayout = KeyLayout {
        arity: 2,
        period: 1,
        code: 0,
    };
}

/// Counts of records skipped during filtering, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    pub short_key: usize,
    pub empty_code: usize,
    pub code_mismatch: usize,
    pub bad_period: usize,
    pub bad_value: usize,
}

impl DropStats {
    pub fn total(&self) -> usize {
        self.short_key + self.empty_code + self.code_mismatch + self.bad_period + self.bad_value
    }
}

/// A validated, indexable record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub period: Period,
    pub code: SeriesCode,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    ShortKey,
    EmptyCode,
    CodeMismatch,
    BadPeriod,
    BadValue,
}

/// Filter configuration for one source table.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    layout: KeyLayout,
    code_pattern: Option<Regex>,
}

impl RecordFilter {
    pub fn new(layout: KeyLayout, code_pattern: Option<Regex>) -> Self {
        Self { layout, code_pattern }
    }

    /// Validate every record, returning the survivors in source order.
    pub fn apply<'a, I>(&self, records: I) -> (Vec<Entry>, DropStats)
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut entries = Vec::new();
        let mut drops = DropStats::default();

        for record in records {
            match self.check(record) {
                Ok(entry) => entries.push(entry),
                Err(reason) => match reason {
                    DropReason::ShortKey => drops.short_key += 1,
                    DropReason::EmptyCode => drops.empty_code += 1,
                    DropReason::CodeMismatch => drops.code_mismatch += 1,
                    DropReason::BadPeriod => drops.bad_period += 1,
                    DropReason::BadValue => drops.bad_value += 1,
                },
            }
        }

        debug!(
            kept = entries.len(),
            short_key = drops.short_key,
            empty_code = drops.empty_code,
            code_mismatch = drops.code_mismatch,
            bad_period = drops.bad_period,
            bad_value = drops.bad_value,
            "filtered raw records"
        );

        (entries, drops)
    }

    fn check(&self, record: &RawRecord) -> Result<Entry, DropReason> {
        let layout = self.layout;
        if record.key.len() < layout.arity {
            return Err(DropReason::ShortKey);
        }
        let (Some(period), Some(code)) = (record.key.get(layout.period), record.key.get(layout.code)) else {
            return Err(DropReason::ShortKey);
        };

        let code = code.trim();
        if code.is_empty() {
            return Err(DropReason::EmptyCode);
        }
        if let Some(pattern) = &self.code_pattern {
            if !pattern.is_match(code) {
                return Err(DropReason::CodeMismatch);
            }
        }

        let period = Period::parse(period.trim()).map_err(|_| DropReason::BadPeriod)?;
        let value = record.values.first().and_then(coerce_value).ok_or(DropReason::BadValue)?;

        Ok(Entry {
            period,
            code: code.to_string(),
            value,
        })
    }
}

/// Coerce a PX-Web cell to a finite float.
///
/// Cells usually arrive as strings (`"563.4"`); missing-data markers such as
/// `"."` or `".."` and anything non-finite are rejected.
pub fn coerce_value(cell: &Value) -> Option<f64> {
    let v = match cell {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cpi_filter() -> RecordFilter {
        RecordFilter::new(KeyLayout::PERIOD_ITEM_CODE, Some(Regex::new(r"^IS\d+$").unwrap()))
    }

    #[test]
    fn keeps_well_formed_records() {
        let records = vec![RawRecord::new(["2024M01", "index_B1997", "IS00"], "612.3")];
        let (entries, drops) = cpi_filter().apply(&records);
        assert_eq!(drops, DropStats::default());
        assert_eq!(
            entries,
            vec![Entry {
                period: Period::parse("2024M01").unwrap(),
                code: "IS00".to_string(),
                value: 612.3,
            }]
        );
    }

    #[test]
    fn counts_each_drop_reason() {
        let records = vec![
            RawRecord::new(["2024M01", "index_B1997"], "1.0"),
            RawRecord::new(["2024M01", "index_B1997", ""], "1.0"),
            RawRecord::new(["2024M01", "index_B1997", "XX01"], "1.0"),
            RawRecord::new(["2024-01", "index_B1997", "IS01"], "1.0"),
            RawRecord::new(["2024M01", "index_B1997", "IS02"], "N/A"),
            RawRecord {
                key: vec!["2024M01".into(), "index_B1997".into(), "IS03".into()],
                values: vec![],
            },
            RawRecord::new(["2024M01", "index_B1997", "IS04"], "4.5"),
        ];
        let (entries, drops) = cpi_filter().apply(&records);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "IS04");
        assert_eq!(
            drops,
            DropStats {
                short_key: 1,
                empty_code: 1,
                code_mismatch: 1,
                bad_period: 1,
                bad_value: 2,
            }
        );
        assert_eq!(drops.total(), 6);
    }

    #[test]
    fn weight_layout_reads_code_first() {
        let filter = RecordFilter::new(KeyLayout::CODE_PERIOD, None);
        let records = vec![RawRecord::new(["IS0451", "2024M03"], "1.75")];
        let (entries, _) = filter.apply(&records);
        assert_eq!(entries[0].code, "IS0451");
        assert_eq!(entries[0].period, Period::parse("2024M03").unwrap());
        assert_eq!(entries[0].value, 1.75);
    }

    #[test]
    fn no_pattern_accepts_any_code() {
        let filter = RecordFilter::new(KeyLayout::PERIOD_ITEM_CODE, None);
        let records = vec![RawRecord::new(["2024M01", "index", "Marine"], "133.1")];
        let (entries, _) = filter.apply(&records);
        assert_eq!(entries[0].code, "Marine");
    }

    #[test]
    fn coerces_strings_and_numbers() {
        assert_eq!(coerce_value(&json!("  101.5 ")), Some(101.5));
        assert_eq!(coerce_value(&json!(7)), Some(7.0));
        assert_eq!(coerce_value(&json!(".")), None);
        assert_eq!(coerce_value(&json!("..")), None);
        assert_eq!(coerce_value(&json!("NaN")), None);
        assert_eq!(coerce_value(&json!("inf")), None);
        assert_eq!(coerce_value(&json!(null)), None);
    }
}
