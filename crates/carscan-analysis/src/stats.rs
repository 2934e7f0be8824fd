//! Descriptive statistics over plain `f64` slices.
//!
//! Callers pass only non-null values. An empty input yields
//! [`NumericSummary::NoData`] rather than NaN.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NumericSummary {
    NoData,
    Stats {
        count: usize,
        mean: f64,
        median: f64,
        /// Sample standard deviation; `0.0` for a single value.
        std: f64,
        min: f64,
        max: f64,
    },
}

impl NumericSummary {
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Stats { mean, .. } => Some(*mean),
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::NoData => 0,
            Self::Stats { count, .. } => *count,
        }
    }
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[must_use]
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

/// Sample standard deviation (n - 1 denominator).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[must_use]
pub fn summarize(values: &[f64]) -> NumericSummary {
    let (Some(mean), Some(median), Some(std)) = (mean(values), median(values), sample_std(values))
    else {
        return NumericSummary::NoData;
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    NumericSummary::Stats {
        count: values.len(),
        mean,
        median,
        std,
        min,
        max,
    }
}

/// Pearson correlation of paired samples.
///
/// `None` with fewer than two pairs or when either side has zero variance.
#[must_use]
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let xs = pairs.iter().map(|(x, _)| *x).collect::<Vec<_>>();
    let ys = pairs.iter().map(|(_, y)| *y).collect::<Vec<_>>();
    let mx = mean(&xs)?;
    let my = mean(&ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_is_no_data() {
        assert_eq!(summarize(&[]), NumericSummary::NoData);
        assert_eq!(summarize(&[]).mean(), None);
    }

    #[test]
    fn single_value_has_zero_std() {
        let NumericSummary::Stats { std, median, .. } = summarize(&[42.0]) else {
            panic!("expected stats");
        };
        assert!(close(std, 0.0));
        assert!(close(median, 42.0));
    }

    #[test]
    fn stats_for_known_values() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let NumericSummary::Stats {
            count,
            mean,
            median,
            std,
            min,
            max,
        } = summary
        else {
            panic!("expected stats");
        };
        assert_eq!(count, 8);
        assert!(close(mean, 5.0));
        assert!(close(median, 4.5));
        // population std is 2.0; sample std is sqrt(32 / 7)
        assert!(close(std, (32.0_f64 / 7.0).sqrt()));
        assert!(close(min, 2.0));
        assert!(close(max, 9.0));
    }

    #[test]
    fn median_odd_count() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn pearson_perfect_negative() {
        let pairs = [(1.0, 10.0), (2.0, 8.0), (3.0, 6.0)];
        assert!(close(pearson(&pairs).unwrap(), -1.0));
    }

    #[test]
    fn pearson_needs_variance_and_pairs() {
        assert_eq!(pearson(&[(1.0, 2.0)]), None);
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), None);
    }

    #[test]
    fn no_data_serializes_with_status_tag() {
        let json = serde_json::to_value(NumericSummary::NoData).unwrap();
        assert_eq!(json, serde_json::json!({"status": "no_data"}));
    }
}
