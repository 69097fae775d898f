//! Benchmark report artifact detection.
//!
//! The Gradle connected-test output directory is persistent and may
//! contain stale report files from earlier invocations. This module
//! snapshots the (size, mtime) identity of every report file before a
//! run and diffs against the post-run state to isolate the files that
//! specific run produced or rewrote.

use crate::models::{FileSignature, RunSnapshot};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File-name suffix identifying benchmark report JSONs
/// (matches the `*benchmarkData.json` glob of the producing tooling).
pub const REPORT_SUFFIX: &str = "benchmarkData.json";

/// Returns true if the path names a benchmark report file.
fn is_report(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(REPORT_SUFFIX))
        .unwrap_or(false)
}

/// Record the identity of every report file under `root`.
///
/// Returns an empty snapshot when `root` does not exist; the output
/// directory is only created by the first successful run.
pub fn snapshot(root: &Path) -> Result<RunSnapshot> {
    let mut state = RunSnapshot::new();
    if !root.exists() {
        return Ok(state);
    }

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() || !is_report(entry.path()) {
            continue;
        }
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
        let mtime = metadata
            .modified()
            .with_context(|| format!("Failed to read mtime of {}", entry.path().display()))?;
        state.insert(
            entry.path().to_path_buf(),
            FileSignature {
                size: metadata.len(),
                mtime,
            },
        );
    }

    debug!("Snapshot of {}: {} report files", root.display(), state.len());
    Ok(state)
}

/// Rescan `root` and return every report file whose identity differs
/// from `previous`, including files absent from it. Sorted
/// lexicographically for deterministic downstream ordering.
pub fn updated_since(root: &Path, previous: &RunSnapshot) -> Result<Vec<PathBuf>> {
    let current = snapshot(root)?;

    let mut updated: Vec<PathBuf> = current
        .into_iter()
        .filter(|(path, signature)| previous.get(path) != Some(signature))
        .map(|(path, _)| path)
        .collect();

    updated.sort();
    Ok(updated)
}

/// Copy detected report files into `run_dir`, preserving their layout
/// relative to `source_root`. Used in full artifact retention.
pub fn copy_reports(
    sources: &[PathBuf],
    source_root: &Path,
    run_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(sources.len());

    for source in sources {
        let relative = source
            .strip_prefix(source_root)
            .with_context(|| format!("Report outside source root: {}", source.display()))?;
        let target = run_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::copy(source, &target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                source.display(),
                target.display()
            )
        })?;
        copied.push(target);
    }

    Ok(copied)
}
