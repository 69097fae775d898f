//! Benchmark report parsing.
//!
//! Converts one benchmark JSON report into canonical [`BenchmarkRow`]
//! records. Optional fields fall back to defaults; only a structurally
//! invalid document (unreadable file, unparseable JSON, wrong shape) is
//! an error, since that indicates a producer-side contract violation.

use crate::models::BenchmarkRow;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

/// Failure to turn a report file into rows.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The file could not be read.
    #[error("failed to read report {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON of the expected shape.
    #[error("malformed benchmark report {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportDoc {
    context: ReportContext,
    benchmarks: Vec<BenchmarkEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReportContext {
    build: BuildContext,
    sustained_performance_mode_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BuildContext {
    model: String,
    version: VersionContext,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            model: "unknown".to_string(),
            version: VersionContext::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct VersionContext {
    sdk: i64,
}

impl Default for VersionContext {
    fn default() -> Self {
        Self { sdk: -1 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BenchmarkEntry {
    class_name: String,
    name: String,
    warmup_iterations: i64,
    repeat_iterations: i64,
    metrics: Metrics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Metrics {
    time_ns: TimeNs,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TimeNs {
    minimum: f64,
    median: f64,
    maximum: f64,
    coefficient_of_variation: f64,
}

impl Default for TimeNs {
    fn default() -> Self {
        Self {
            minimum: f64::NAN,
            median: f64::NAN,
            maximum: f64::NAN,
            coefficient_of_variation: f64::NAN,
        }
    }
}

/// Parse one benchmark report into rows tagged with `run`.
///
/// An empty `benchmarks` array yields an empty vec, not an error.
pub fn parse_report(path: &Path, run: usize) -> Result<Vec<BenchmarkRow>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let doc: ReportDoc =
        serde_json::from_str(&content).map_err(|source| ReportError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let ReportDoc {
        context,
        benchmarks,
    } = doc;

    let rows: Vec<BenchmarkRow> = benchmarks
        .into_iter()
        .map(|entry| BenchmarkRow {
            run,
            device: context.build.model.clone(),
            sdk: context.build.version.sdk,
            sustained_performance_mode_enabled: context.sustained_performance_mode_enabled,
            class_name: entry.class_name,
            test_name: entry.name,
            warmup_iterations: entry.warmup_iterations,
            repeat_iterations: entry.repeat_iterations,
            time_ns_min: entry.metrics.time_ns.minimum,
            time_ns_median: entry.metrics.time_ns.median,
            time_ns_max: entry.metrics.time_ns.maximum,
            time_ns_cv: entry.metrics.time_ns.coefficient_of_variation,
        })
        .collect();

    debug!("{}: {} benchmark rows", path.display(), rows.len());
    Ok(rows)
}

/// Parse every detected report for one run.
///
/// A malformed file is a producer-side contract violation: it is logged
/// and flagged so the driver can apply its failure policy, but rows
/// already parsed from the other, valid files of the run are kept.
pub fn parse_run_reports(sources: &[PathBuf], run: usize) -> (Vec<BenchmarkRow>, bool) {
    let mut rows = Vec::new();
    let mut failed = false;

    for source in sources {
        match parse_report(source, run) {
            Ok(parsed) => rows.extend(parsed),
            Err(e) => {
                error!("RUN {}: {:#}", run, anyhow::Error::new(e));
                failed = true;
            }
        }
    }

    (rows, failed)
}
