//! Plain-text formatting for terminal output.
//!
//! We keep formatting code in one place so the analytics stay free of
//! presentation concerns.

use std::collections::BTreeMap;

use crate::data::DataSource;
use crate::domain::{Change, ChangeStats, ForecastPoint, ImpactRow, Observation, SeriesCode};

/// Source summary plus drop counts from ingestion.
pub fn format_summary(source: &DataSource) -> String {
    let mut out = String::new();
    out.push_str(&format!("{source}\n"));

    let (drops, weight_drops) = source.drop_stats();
    out.push_str(&format!(
        "Dropped records: {} (short key {}, empty code {}, code mismatch {}, bad period {}, bad value {})\n",
        drops.total(),
        drops.short_key,
        drops.empty_code,
        drops.code_mismatch,
        drops.bad_period,
        drops.bad_value
    ));

    if let Some(weights) = source.weights() {
        let latest = weights
            .latest_period()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "Weights: {} entries, latest period {latest}, {} dropped\n",
            weights.len(),
            weight_drops.total()
        ));
    }
    if let Some(code) = source.headline_code() {
        if let Some(obs) = source.series().latest(code) {
            out.push_str(&format!("Headline {code}: {:.2} ({})\n", obs.value, obs.period));
        }
    }
    out
}

pub fn format_codes(source: &DataSource) -> String {
    let mut out = String::new();
    for code in source.series().codes() {
        match source.label(code) {
            Some(label) => out.push_str(&format!("{code:<10} {label}\n")),
            None => out.push_str(&format!("{code}\n")),
        }
    }
    out
}

pub fn format_observation(source: &DataSource, code: &str, obs: &Observation) -> String {
    format!("{}: {:.2} ({})", heading(source, code), obs.value, obs.period)
}

pub fn format_change(source: &DataSource, code: &str, change: &Change) -> String {
    format!(
        "{}: {:+.2}% from {} to {}",
        heading(source, code),
        change.change_percent,
        change.from,
        change.to
    )
}

pub fn format_stats(source: &DataSource, code: &str, stats: &ChangeStats, months: u32) -> String {
    format!(
        "{} (last {months} months): average = {:.2}%, median = {:.2}%",
        heading(source, code),
        stats.average,
        stats.median
    )
}

pub fn format_history(source: &DataSource, code: &str, values: &[Observation]) -> String {
    let mut out = format!("{}\n", heading(source, code));
    for obs in values {
        out.push_str(&format!("  {}  {:>10.2}\n", obs.period, obs.value));
    }
    out
}

/// Per-code changes, largest increase first.
pub fn format_increases(source: &DataSource, increases: &BTreeMap<SeriesCode, f64>, months: u32) -> String {
    let mut rows: Vec<(&SeriesCode, f64)> = increases.iter().map(|(c, v)| (c, *v)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut out = format!("Change over {months} months ({} series):\n", rows.len());
    for (code, pct) in rows {
        out.push_str(&format!("{:>8.2}%  {}\n", pct, heading(source, code)));
    }
    out
}

pub fn format_impact_table(source: &DataSource, rows: &[ImpactRow], months: u32) -> String {
    let mut out = String::new();
    out.push_str(&format!("Top weighted movers over {months} months, by deviation from history:\n"));
    out.push_str(&format!(
        "{:<48} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
        "series", "impact", "change%", "monthly%", "hist%", "dev%"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<48} {:>9.3} {:>9.2} {:>9.2} {:>9.2} {:>9.2}\n",
            truncate(&heading(source, &row.code), 48),
            row.score,
            row.change_percent,
            row.monthly_average,
            row.historical_average,
            row.deviation
        ));
    }
    out
}

pub fn format_forecast(
    source: &DataSource,
    code: &str,
    last: &Observation,
    sliding: &[ForecastPoint],
    historical: &[ForecastPoint],
    window: usize,
) -> String {
    let mut out = format!(
        "Forecast for {} from {} ({:.2}):\n",
        heading(source, code),
        last.period,
        last.value
    );
    out.push_str(&format!(
        "{:<8} {:>22} {:>22}\n",
        "period",
        format!("sliding ({window}m)"),
        "historical avg"
    ));
    for (s, h) in sliding.iter().zip(historical) {
        out.push_str(&format!(
            "{:<8} {:>12.2} ({:+.2}%) {:>12.2} ({:+.2}%)\n",
            s.period.to_string(),
            s.value,
            s.change_percent,
            h.value,
            h.change_percent
        ));
    }
    out
}

fn heading(source: &DataSource, code: &str) -> String {
    match source.label(code) {
        Some(label) => format!("{code} ({label})"),
        None => code.to_string(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Period, SourceKind};
    use crate::index::SeriesIndex;

    fn p(s: &str) -> Period {
        Period::parse(s).unwrap()
    }

    fn cpi() -> DataSource {
        let series: SeriesIndex = [
            (p("2023M01"), "IS00".to_string(), 100.0),
            (p("2024M01"), "IS00".to_string(), 105.0),
            (p("2024M01"), "IS99".to_string(), 7.0),
        ]
        .into_iter()
        .collect();
        DataSource::from_indexes(SourceKind::Cpi, series, None)
    }

    #[test]
    fn headings_include_known_labels() {
        let source = cpi();
        let codes = format_codes(&source);
        assert_eq!(codes, "IS00       Vísitala neysluverðs\nIS99\n");

        let change = source.twelve_month_change("IS00").unwrap();
        assert_eq!(
            format_change(&source, "IS00", &change),
            "IS00 (Vísitala neysluverðs): +5.00% from 2023M01 to 2024M01"
        );
    }

    #[test]
    fn summary_mentions_headline() {
        let summary = format_summary(&cpi());
        assert!(summary.starts_with("CPI Data Source with 3 entries across 2 unique series codes."));
        assert!(summary.contains("Headline IS00: 105.00 (2024M01)"));
    }

    #[test]
    fn increases_sorted_descending() {
        let increases: BTreeMap<SeriesCode, f64> =
            [("IS99".to_string(), 1.0), ("IS00".to_string(), 5.0)].into_iter().collect();
        let text = format_increases(&cpi(), &increases, 12);
        let first = text.lines().nth(1).unwrap();
        assert!(first.contains("IS00"));
    }

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
