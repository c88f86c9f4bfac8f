//! Weighted contribution ranking.
//!
//! A series that rose 10% but carries 0.5% of the basket moves the aggregate
//! far less than one that rose 3% with a 15% weight. Scores put both on the
//! same scale: `change * weight / 100`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::query::historical_change_stats_all;
use super::stats::round2;
use crate::domain::{Impact, ImpactRow, SeriesCode};
use crate::index::SeriesIndex;

/// Score every weighted code, highest first.
///
/// Codes missing from `increases` score as 0. Codes without a weight are not
/// scored at all. Equal scores are ordered by code, ascending.
pub fn weighted_impact(increases: &BTreeMap<SeriesCode, f64>, weights: &BTreeMap<SeriesCode, f64>) -> Vec<Impact> {
    let mut scored: Vec<Impact> = weights
        .iter()
        .map(|(code, weight)| Impact {
            code: code.clone(),
            score: increases.get(code).copied().unwrap_or(0.0) * weight / 100.0,
        })
        .collect();
    scored.sort_by(|a, b| by_desc_then_code(a.score, &a.code, b.score, &b.code));
    scored
}

/// Top-`top` weighted movers, compared with their own historical pace.
///
/// Rows are ordered by how far the recent monthly pace deviates above the
/// historical average (largest first).
pub fn impact_table(
    index: &SeriesIndex,
    increases: &BTreeMap<SeriesCode, f64>,
    weights: &BTreeMap<SeriesCode, f64>,
    months: u32,
    top: usize,
) -> Vec<ImpactRow> {
    let history = historical_change_stats_all(index);

    let mut rows: Vec<ImpactRow> = weighted_impact(increases, weights)
        .into_iter()
        .take(top)
        .map(|impact| {
            let change_percent = increases.get(&impact.code).copied().unwrap_or(0.0);
            let monthly_average = if months == 0 { 0.0 } else { change_percent / f64::from(months) };
            let historical_average = history.get(&impact.code).map(|s| s.average).unwrap_or(0.0);
            ImpactRow {
                score: impact.score,
                change_percent: round2(change_percent),
                monthly_average: round2(monthly_average),
                historical_average: round2(historical_average),
                deviation: round2(monthly_average - historical_average),
                code: impact.code,
            }
        })
        .collect();

    rows.sort_by(|a, b| by_desc_then_code(a.deviation, &a.code, b.deviation, &b.code));
    rows
}

fn by_desc_then_code(a: f64, a_code: &str, b: f64, b_code: &str) -> Ordering {
    b.total_cmp(&a).then_with(|| a_code.cmp(b_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Period;

    fn map(entries: &[(&str, f64)]) -> BTreeMap<SeriesCode, f64> {
        entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn scores_and_orders_by_weighted_change() {
        let ranked = weighted_impact(&map(&[("A", 10.0), ("B", -5.0)]), &map(&[("A", 2.0), ("B", 4.0)]));
        assert_eq!(
            ranked,
            vec![
                Impact {
                    code: "A".to_string(),
                    score: 0.2
                },
                Impact {
                    code: "B".to_string(),
                    score: -0.2
                },
            ]
        );
    }

    #[test]
    fn only_weighted_codes_are_scored() {
        let ranked = weighted_impact(&map(&[("A", 10.0), ("Z", 99.0)]), &map(&[("A", 1.0), ("C", 3.0)]));
        let codes: Vec<&str> = ranked.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["A", "C"]);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn ties_break_by_code() {
        let ranked = weighted_impact(&map(&[("B", 1.0), ("A", 1.0)]), &map(&[("B", 1.0), ("A", 1.0)]));
        assert_eq!(ranked[0].code, "A");
        assert_eq!(ranked[1].code, "B");
    }

    #[test]
    fn impact_table_compares_against_history() {
        let start = Period::parse("2023M01").unwrap();
        let mut rows = Vec::new();
        // A: flat for a year then +12% over 12 months; B: steady +1%/month.
        for i in 0..=24 {
            let a = if i <= 12 { 100.0 } else { 100.0 + (i - 12) as f64 };
            let period = start.add_months(i).unwrap();
            rows.push((period, "A".to_string(), a));
            rows.push((period, "B".to_string(), 100.0 * 1.01_f64.powi(i)));
        }
        let index: SeriesIndex = rows.into_iter().collect();
        let increases = super::super::increase_over_months(&index, 12);
        let weights = map(&[("A", 10.0), ("B", 10.0)]);

        let table = impact_table(&index, &increases, &weights, 12, 25);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].code, "A");
        assert_eq!(table[0].change_percent, 12.0);
        assert_eq!(table[0].monthly_average, 1.0);
        assert!(table[0].deviation > 0.0);
        assert_eq!(table[1].code, "B");
        assert_eq!(table[1].historical_average, 1.0);

        let top_one = impact_table(&index, &increases, &weights, 12, 1);
        assert_eq!(top_one.len(), 1);
    }
}
