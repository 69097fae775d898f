//! CSV writers for the summary and readable tables.
//!
//! All numeric formatting is locale-independent with a dot decimal
//! separator. Absent values (missing cells, NaN metrics) render as
//! empty fields, never as a textual "NaN". Records are terminated with
//! `\n` regardless of host conventions, and parent directories are
//! created as needed.

use crate::analysis::{DeltaRow, PerTestRow};
use crate::models::BenchmarkRow;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Column headers of the per-run and combined summary tables.
const SUMMARY_HEADER: [&str; 12] = [
    "run",
    "device",
    "sdk",
    "sustainedPerformanceModeEnabled",
    "className",
    "testName",
    "warmupIterations",
    "repeatIterations",
    "timeNs_min",
    "timeNs_median",
    "timeNs_max",
    "timeNs_cv",
];

/// Render a float; NaN becomes an empty field.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Render an optional float; absent becomes an empty field.
fn format_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))
}

/// Write one run's rows as a summary table.
pub fn write_run_summary(rows: &[BenchmarkRow], path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer.write_record(SUMMARY_HEADER)?;

    for row in rows {
        writer.write_record([
            row.run.to_string(),
            row.device.clone(),
            row.sdk.to_string(),
            row.sustained_performance_mode_enabled.to_string(),
            row.class_name.clone(),
            row.test_name.clone(),
            row.warmup_iterations.to_string(),
            row.repeat_iterations.to_string(),
            format_float(row.time_ns_min),
            format_float(row.time_ns_median),
            format_float(row.time_ns_max),
            format_float(row.time_ns_cv),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the combined summary: identical schema, spanning all runs.
pub fn write_combined_summary(rows: &[BenchmarkRow], path: &Path) -> Result<()> {
    write_run_summary(rows, path)
}

/// Write the readable per-test table.
pub fn write_per_test(rows: &[PerTestRow], run_count: usize, path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;

    let mut header = vec!["test".to_string()];
    header.extend((1..=run_count).map(|run| format!("run{}_ms", run)));
    header.push("avg_ms".to_string());
    header.push("range_pct".to_string());
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.test.clone()];
        record.extend(row.per_run_ms.iter().map(|v| format_opt(*v)));
        record.push(format_opt(row.avg_ms));
        record.push(format_opt(row.range_pct));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the A/B delta table.
pub fn write_ab_deltas(rows: &[DeltaRow], run_count: usize, path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;

    let mut header = vec!["aspect".to_string()];
    header.extend((1..=run_count).map(|run| format!("run{}_variant_vs_baseline_pct", run)));
    header.push("median_variant_vs_baseline_pct".to_string());
    header.push("avg_variant_vs_baseline_pct".to_string());
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.aspect.clone()];
        record.extend(row.per_run_pct.iter().map(|v| format_opt(*v)));
        record.push(format_opt(row.median_pct));
        record.push(format_opt(row.avg_pct));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(run: usize, median_ns: f64) -> BenchmarkRow {
        BenchmarkRow {
            run,
            device: "Pixel 8".to_string(),
            sdk: 34,
            sustained_performance_mode_enabled: true,
            class_name: "com.example.DbBench".to_string(),
            test_name: "measureRead".to_string(),
            warmup_iterations: 5,
            repeat_iterations: 50,
            time_ns_min: 100.0,
            time_ns_median: median_ns,
            time_ns_max: 300.0,
            time_ns_cv: f64::NAN,
        }
    }

    #[test]
    fn test_format_float_nan_is_empty() {
        assert_eq!(format_float(f64::NAN), "");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(-20.0), "-20");
    }

    #[test]
    fn test_format_opt() {
        assert_eq!(format_opt(None), "");
        assert_eq!(format_opt(Some(2.5)), "2.5");
    }

    #[test]
    fn test_write_run_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary-timeNs.csv");

        write_run_summary(&[make_row(1, 200.0)], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "run,device,sdk,sustainedPerformanceModeEnabled,className,testName,\
             warmupIterations,repeatIterations,timeNs_min,timeNs_median,timeNs_max,timeNs_cv"
        );
        // NaN cv renders as a trailing empty field; bool as its literal form.
        assert_eq!(
            lines.next().unwrap(),
            "1,Pixel 8,34,true,com.example.DbBench,measureRead,5,50,100,200,300,"
        );
        assert!(!content.contains('\r'));
    }

    #[test]
    fn test_write_per_test_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readable-per-test-runs.csv");

        let rows = vec![PerTestRow {
            test: "DbBench.measureRead".to_string(),
            per_run_ms: vec![Some(8.0), None, Some(12.0)],
            avg_ms: Some(10.0),
            range_pct: Some(40.0),
        }];

        write_per_test(&rows, 3, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "test,run1_ms,run2_ms,run3_ms,avg_ms,range_pct");
        assert_eq!(lines.next().unwrap(), "DbBench.measureRead,8,,12,10,40");
    }

    #[test]
    fn test_write_ab_deltas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readable-ab-deltas.csv");

        let rows = vec![DeltaRow {
            aspect: "Read".to_string(),
            per_run_pct: vec![Some(-20.0), None],
            median_pct: Some(-20.0),
            avg_pct: None,
        }];

        write_ab_deltas(&rows, 2, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "aspect,run1_variant_vs_baseline_pct,run2_variant_vs_baseline_pct,\
             median_variant_vs_baseline_pct,avg_variant_vs_baseline_pct"
        );
        assert_eq!(lines.next().unwrap(), "Read,-20,,-20,");
    }
}
