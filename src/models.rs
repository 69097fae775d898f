//! Data models for the benchmark suite runner.
//!
//! This module contains the core data structures shared across the
//! pipeline: parsed benchmark rows, the static A/B comparison table,
//! and the artifact snapshot types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// One measured benchmark test within one run.
///
/// Rows are created by the report parser and are immutable afterwards.
/// Timing statistics use NaN as the "metric absent in the document"
/// sentinel; aggregation converts NaN to an explicit absent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRow {
    /// Run index (1-based).
    pub run: usize,
    /// Device model identifier.
    pub device: String,
    /// Android SDK / platform version (-1 if unknown).
    pub sdk: i64,
    /// Whether sustained performance mode was enabled.
    pub sustained_performance_mode_enabled: bool,
    /// Fully-qualified test class name.
    pub class_name: String,
    /// Test method name.
    pub test_name: String,
    /// Warm-up iteration count.
    pub warmup_iterations: i64,
    /// Measured iteration count.
    pub repeat_iterations: i64,
    /// Minimum time in nanoseconds.
    pub time_ns_min: f64,
    /// Median time in nanoseconds.
    pub time_ns_median: f64,
    /// Maximum time in nanoseconds.
    pub time_ns_max: f64,
    /// Coefficient of variation.
    pub time_ns_cv: f64,
}

impl BenchmarkRow {
    /// Canonical test key, stable across runs: the last segment of the
    /// class name joined with the test method name.
    pub fn key(&self) -> String {
        let short_class = self
            .class_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.class_name);
        format!("{}.{}", short_class, self.test_name)
    }

    /// Median time converted to milliseconds.
    pub fn time_ms_median(&self) -> f64 {
        self.time_ns_median / 1_000_000.0
    }
}

/// A fixed baseline/variant comparison unit.
///
/// The pair set is static configuration, not derived data; see [`AB_PAIRS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbPair {
    /// Human-readable name of the aspect under comparison.
    pub aspect: &'static str,
    /// Test key of the baseline measurement.
    pub baseline_key: &'static str,
    /// Test key of the variant measurement.
    pub variant_key: &'static str,
}

/// The declared baseline/variant comparisons, in output order.
pub const AB_PAIRS: &[AbPair] = &[
    AbPair {
        aspect: "PragmasRead",
        baseline_key: "DbPragmasReadBench.measureBaselineReadNoExtraPragmas",
        variant_key: "DbPragmasReadBench.measureVariantReadWithExtraPragmas",
    },
    AbPair {
        aspect: "PragmasWrite",
        baseline_key: "DbPragmasWriteBench.measureBaselineWriteNoExtraPragmas",
        variant_key: "DbPragmasWriteBench.measureVariantWriteWithExtraPragmas",
    },
    AbPair {
        aspect: "PragmasMixed",
        baseline_key: "DbPragmasMixedBench.measureBaselineMixedNoExtraPragmas",
        variant_key: "DbPragmasMixedBench.measureVariantMixedWithExtraPragmas",
    },
    AbPair {
        aspect: "SyncRead",
        baseline_key: "DbSynchronousReadBench.measureSynchronousNormalReadAbsolute",
        variant_key: "DbSynchronousReadBench.measureSynchronousFullReadAbsolute",
    },
    AbPair {
        aspect: "SyncWrite",
        baseline_key: "DbSynchronousWriteBench.measureSynchronousNormalWriteAbsolute",
        variant_key: "DbSynchronousWriteBench.measureSynchronousFullWriteAbsolute",
    },
    AbPair {
        aspect: "SyncMixed",
        baseline_key: "DbSynchronousMixedBench.measureSynchronousNormalMixedAbsolute",
        variant_key: "DbSynchronousMixedBench.measureSynchronousFullMixedAbsolute",
    },
    AbPair {
        aspect: "Transactions",
        baseline_key: "DbTransactionNestingBench.measureTopLevelTransactionsAbsolute",
        variant_key: "DbTransactionNestingBench.measureNestedTransactionsAbsolute",
    },
];

/// Change-detection fingerprint for a single report file.
///
/// Size plus modification time is a cheap fingerprint; the producing
/// process is trusted and runs are serialized, so content hashing is
/// not required here (it would be the stricter, slower alternative).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: SystemTime,
}

/// Snapshot of report-file identities under the output root, taken
/// immediately before a run and diffed immediately after.
pub type RunSnapshot = HashMap<PathBuf, FileSignature>;

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(class_name: &str, test_name: &str) -> BenchmarkRow {
        BenchmarkRow {
            run: 1,
            device: "Pixel 8".to_string(),
            sdk: 34,
            sustained_performance_mode_enabled: false,
            class_name: class_name.to_string(),
            test_name: test_name.to_string(),
            warmup_iterations: 5,
            repeat_iterations: 50,
            time_ns_min: 1_000_000.0,
            time_ns_median: 2_500_000.0,
            time_ns_max: 4_000_000.0,
            time_ns_cv: 0.1,
        }
    }

    #[test]
    fn test_key_strips_package() {
        let row = make_row("com.example.bench.DbReadBench", "measureRead");
        assert_eq!(row.key(), "DbReadBench.measureRead");
    }

    #[test]
    fn test_key_without_package() {
        let row = make_row("DbReadBench", "measureRead");
        assert_eq!(row.key(), "DbReadBench.measureRead");
    }

    #[test]
    fn test_time_ms_median() {
        let row = make_row("DbReadBench", "measureRead");
        assert_eq!(row.time_ms_median(), 2.5);
    }

    #[test]
    fn test_ab_pairs_have_unique_aspects() {
        for (i, a) in AB_PAIRS.iter().enumerate() {
            for b in &AB_PAIRS[i + 1..] {
                assert_ne!(a.aspect, b.aspect);
            }
        }
    }
}
