//! A/B delta computation for declared baseline/variant pairs.
//!
//! For each pair and run, the relative change of the variant's median
//! time against the baseline's. Sign convention: negative means the
//! variant is faster than the baseline.

use super::{median, round6};
use crate::models::{AbPair, BenchmarkRow};
use std::collections::HashMap;

/// One row of the A/B delta table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRow {
    /// Aspect name from the pair declaration.
    pub aspect: String,
    /// Delta percentage per run, index 0 = run 1; `None` when either
    /// side is missing or the baseline median is zero.
    pub per_run_pct: Vec<Option<f64>>,
    /// Median of the present per-run deltas.
    pub median_pct: Option<f64>,
    /// Arithmetic mean of the present per-run deltas.
    pub avg_pct: Option<f64>,
}

/// Compute delta rows, one per declared pair, in declaration order.
///
/// A run contributes no value when the baseline or variant row is
/// missing, either median is not finite, or the baseline median is
/// exactly zero. Missing data is absent output, never an error.
pub fn ab_delta_rows(
    rows: &[BenchmarkRow],
    pairs: &[AbPair],
    run_count: usize,
) -> Vec<DeltaRow> {
    // Last-parsed row wins per (run, key), matching the per-test view.
    let mut index: HashMap<(usize, String), f64> = HashMap::new();
    for row in rows {
        index.insert((row.run, row.key()), row.time_ms_median());
    }

    pairs
        .iter()
        .map(|pair| {
            let per_run: Vec<Option<f64>> = (1..=run_count)
                .map(|run| {
                    let baseline = index.get(&(run, pair.baseline_key.to_string()))?;
                    let variant = index.get(&(run, pair.variant_key.to_string()))?;
                    if !baseline.is_finite() || !variant.is_finite() || *baseline == 0.0 {
                        return None;
                    }
                    Some((variant - baseline) / baseline * 100.0)
                })
                .collect();

            let present: Vec<f64> = per_run.iter().flatten().copied().collect();
            let median_pct = median(&present);
            let avg_pct = if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            };

            DeltaRow {
                aspect: pair.aspect.to_string(),
                per_run_pct: per_run.into_iter().map(|v| v.map(round6)).collect(),
                median_pct: median_pct.map(round6),
                avg_pct: avg_pct.map(round6),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[AbPair] = &[
        AbPair {
            aspect: "Read",
            baseline_key: "DbBench.baselineRead",
            variant_key: "DbBench.variantRead",
        },
        AbPair {
            aspect: "Write",
            baseline_key: "DbBench.baselineWrite",
            variant_key: "DbBench.variantWrite",
        },
    ];

    fn make_row(run: usize, test_name: &str, median_ms: f64) -> BenchmarkRow {
        BenchmarkRow {
            run,
            device: "Pixel 8".to_string(),
            sdk: 34,
            sustained_performance_mode_enabled: false,
            class_name: "com.example.DbBench".to_string(),
            test_name: test_name.to_string(),
            warmup_iterations: 5,
            repeat_iterations: 50,
            time_ns_min: median_ms * 1_000_000.0,
            time_ns_median: median_ms * 1_000_000.0,
            time_ns_max: median_ms * 1_000_000.0,
            time_ns_cv: 0.0,
        }
    }

    #[test]
    fn test_variant_faster_is_negative() {
        // Baseline 100ms, variant 80ms: exactly -20%.
        let rows = vec![
            make_row(1, "baselineRead", 100.0),
            make_row(1, "variantRead", 80.0),
        ];

        let table = ab_delta_rows(&rows, PAIRS, 1);
        assert_eq!(table[0].per_run_pct, vec![Some(-20.0)]);
        assert_eq!(table[0].median_pct, Some(-20.0));
        assert_eq!(table[0].avg_pct, Some(-20.0));
    }

    #[test]
    fn test_zero_baseline_is_excluded() {
        let rows = vec![
            make_row(1, "baselineRead", 0.0),
            make_row(1, "variantRead", 80.0),
            make_row(2, "baselineRead", 100.0),
            make_row(2, "variantRead", 90.0),
        ];

        let table = ab_delta_rows(&rows, PAIRS, 2);
        assert_eq!(table[0].per_run_pct, vec![None, Some(-10.0)]);
        assert_eq!(table[0].median_pct, Some(-10.0));
        assert_eq!(table[0].avg_pct, Some(-10.0));
    }

    #[test]
    fn test_missing_side_is_absent() {
        let rows = vec![make_row(1, "baselineRead", 100.0)];

        let table = ab_delta_rows(&rows, PAIRS, 1);
        assert_eq!(table[0].per_run_pct, vec![None]);
        assert_eq!(table[0].median_pct, None);
        assert_eq!(table[0].avg_pct, None);
    }

    #[test]
    fn test_nan_median_is_absent() {
        let rows = vec![
            make_row(1, "baselineRead", f64::NAN),
            make_row(1, "variantRead", 80.0),
        ];

        let table = ab_delta_rows(&rows, PAIRS, 1);
        assert_eq!(table[0].per_run_pct, vec![None]);
    }

    #[test]
    fn test_median_and_mean_across_runs() {
        let rows = vec![
            make_row(1, "baselineRead", 100.0),
            make_row(1, "variantRead", 90.0),
            make_row(2, "baselineRead", 100.0),
            make_row(2, "variantRead", 80.0),
            make_row(3, "baselineRead", 100.0),
            make_row(3, "variantRead", 70.0),
        ];

        let table = ab_delta_rows(&rows, PAIRS, 3);
        assert_eq!(
            table[0].per_run_pct,
            vec![Some(-10.0), Some(-20.0), Some(-30.0)]
        );
        assert_eq!(table[0].median_pct, Some(-20.0));
        assert_eq!(table[0].avg_pct, Some(-20.0));
    }

    #[test]
    fn test_even_count_median_averages_middle_values() {
        let rows = vec![
            make_row(1, "baselineRead", 100.0),
            make_row(1, "variantRead", 90.0),
            make_row(2, "baselineRead", 100.0),
            make_row(2, "variantRead", 80.0),
        ];

        let table = ab_delta_rows(&rows, PAIRS, 2);
        assert_eq!(table[0].median_pct, Some(-15.0));
    }

    #[test]
    fn test_rows_follow_declaration_order() {
        let rows = vec![
            make_row(1, "baselineWrite", 100.0),
            make_row(1, "variantWrite", 110.0),
        ];

        let table = ab_delta_rows(&rows, PAIRS, 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].aspect, "Read");
        assert_eq!(table[1].aspect, "Write");
        assert_eq!(table[1].per_run_pct, vec![Some(10.0)]);
    }
}
