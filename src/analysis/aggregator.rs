//! Per-test aggregation across runs.
//!
//! Groups collected rows by test key and computes, per key, the
//! per-run median times plus average/min/max spread statistics over
//! the runs that produced a value. Sparse data is expected: a run
//! that produced no value for a key yields an absent cell, never zero.

use super::round6;
use crate::models::BenchmarkRow;
use std::collections::{BTreeMap, HashMap};

/// One row of the readable per-test table.
#[derive(Debug, Clone, PartialEq)]
pub struct PerTestRow {
    /// Canonical test key.
    pub test: String,
    /// Median milliseconds per run, index 0 = run 1; `None` when the
    /// run produced no value for this test.
    pub per_run_ms: Vec<Option<f64>>,
    /// Average of the present per-run values.
    pub avg_ms: Option<f64>,
    /// Spread between max and min as a percentage of the average;
    /// `None` when there are no values or the average is exactly zero.
    pub range_pct: Option<f64>,
}

/// Build the readable per-test table, ordered lexicographically by
/// test key. At most one value feeds each (run, key) cell; when
/// duplicates occur, the last-parsed row wins.
pub fn per_test_rows(rows: &[BenchmarkRow], run_count: usize) -> Vec<PerTestRow> {
    let mut grouped: BTreeMap<String, HashMap<usize, f64>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.key())
            .or_default()
            .insert(row.run, row.time_ms_median());
    }

    grouped
        .into_iter()
        .map(|(test, run_to_ms)| {
            let per_run: Vec<Option<f64>> = (1..=run_count)
                .map(|run| run_to_ms.get(&run).copied().filter(|v| !v.is_nan()))
                .collect();
            let present: Vec<f64> = per_run.iter().flatten().copied().collect();

            let (avg_ms, range_pct) = if present.is_empty() {
                (None, None)
            } else {
                let avg = present.iter().sum::<f64>() / present.len() as f64;
                let min = present.iter().copied().fold(f64::INFINITY, f64::min);
                let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = if avg == 0.0 {
                    None
                } else {
                    Some((max - min) / avg * 100.0)
                };
                (Some(avg), range)
            };

            PerTestRow {
                test,
                per_run_ms: per_run.into_iter().map(|v| v.map(round6)).collect(),
                avg_ms: avg_ms.map(round6),
                range_pct: range_pct.map(round6),
            }
        })
        .collect()
}

/// The combined export: every row from every run, unchanged and in
/// collection order. Same schema as a single run's summary, spanning
/// all runs.
pub fn combined_rows(rows: &[BenchmarkRow]) -> Vec<BenchmarkRow> {
    rows.to_vec()
}
