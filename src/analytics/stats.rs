//! Small numeric helpers shared by the analytics functions.

/// Round to two decimal places (half away from zero).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Percentage change from `from` to `to`.
///
/// `None` when `from` is zero or the result is not finite.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    let pct = (to - from) / from * 100.0;
    pct.is_finite().then_some(pct)
}

/// Adjacent month-over-month changes over an oldest-first slice.
///
/// Pairs with a zero denominator are skipped.
pub fn monthly_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| percent_change(w[0], w[1]))
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round2(-0.980392), -0.98);
        assert_eq!(round2(1.980198), 1.98);
        assert_eq!(round2(5.0), 5.0);
    }

    #[test]
    fn zero_denominator_has_no_change() {
        assert_eq!(percent_change(0.0, 5.0), None);
        assert_eq!(percent_change(100.0, 105.0), Some(5.0));
    }

    #[test]
    fn monthly_changes_skip_zero_base() {
        let changes = monthly_changes(&[0.0, 10.0, 11.0]);
        assert_eq!(changes.len(), 1);
        assert!((changes[0] - 10.0).abs() < 1e-9);
        assert!(monthly_changes(&[5.0]).is_empty());
    }

    #[test]
    fn median_handles_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }
}
