//! BenchSuite - connected benchmark suite runner and aggregator
//!
//! A CLI tool that runs a connected benchmark Gradle task for N
//! process-level repetitions, collects the benchmark JSON reports each
//! run writes, and aggregates them into cross-run CSV tables.
//!
//! Exit codes:
//!   0 - Success (tables written; individual runs may have failed)
//!   1 - Configuration/runtime error, or zero benchmark rows collected

mod analysis;
mod artifacts;
mod cli;
mod config;
mod models;
mod parser;
mod report;
mod runner;

use anyhow::{Context, Result};
use chrono::Local;
use cli::{ArtifactLevel, Args};
use config::Config;
use models::{BenchmarkRow, AB_PAIRS};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("BenchSuite v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the suite
    match run_suite(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Benchmark suite failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .benchsuite.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".benchsuite.toml");

    if path.exists() {
        eprintln!(".benchsuite.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    fs::write(path, &content).context("Failed to write .benchsuite.toml")?;

    println!("Created .benchsuite.toml with default settings.");
    println!("Edit it to customize the task, run count, and artifact retention.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .benchsuite.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Root under which the connected test tooling writes report JSONs.
fn benchmark_output_root(project_dir: &Path) -> PathBuf {
    project_dir
        .join("benchmarks")
        .join("databases")
        .join("build")
        .join("outputs")
        .join("connected_android_test_additional_output")
        .join("releaseAndroidTest")
        .join("connected")
}

/// Move a run's log aside under a distinguishing name so it survives
/// transient-log cleanup. Best-effort: a missing or unmovable log only
/// warrants a warning.
fn preserve_run_log(log_path: &Path, preserved: &Path) {
    if !log_path.exists() {
        return;
    }
    if let Err(e) = fs::rename(log_path, preserved) {
        warn!(
            "Failed to keep run log {}: {}",
            log_path.display(),
            e
        );
    }
}

/// Default output directory: <project-dir>/build/<prefix>-r<runs>-<timestamp>.
fn default_output_dir(project_dir: &Path, prefix: &str, runs: usize) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    project_dir
        .join("build")
        .join(format!("{}-r{}-{}", prefix, runs, timestamp))
}

/// Run the complete suite workflow. Returns the process exit code.
fn run_suite(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let runs = config.general.runs;
    let stop_on_failure = config.general.stop_on_failure;
    let full_artifacts = config.general.artifact_level == ArtifactLevel::Full;

    let project_dir = PathBuf::from(&config.task.project_dir);
    let wrapper = runner::resolve_gradle_wrapper(&project_dir)?;

    let out_dir = match config.output.dir {
        Some(ref dir) => PathBuf::from(dir),
        None => default_output_dir(&project_dir, &config.output.prefix, runs),
    };
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let source_root = benchmark_output_root(&project_dir);
    info!("Report source root: {}", source_root.display());
    info!("Output directory: {}", out_dir.display());

    let mut gradle_args = vec![config.task.gradle_task.clone(), "--console=plain".to_string()];
    gradle_args.extend(config.task.gradle_args.iter().cloned());

    let mut all_rows: Vec<BenchmarkRow> = Vec::new();

    for run in 1..=runs {
        println!("===== RUN {}/{} START =====", run, runs);

        // Bracket the Gradle invocation with artifact snapshots so only
        // files this run produced or rewrote are picked up.
        let pre_run_snapshot = artifacts::snapshot(&source_root)?;

        let run_dir = out_dir.join(format!("run{}", run));
        let log_path = if full_artifacts {
            fs::create_dir_all(&run_dir)
                .with_context(|| format!("Failed to create {}", run_dir.display()))?;
            run_dir.join("gradle-output.txt")
        } else {
            out_dir.join(format!("_tmp-run{}-gradle-output.txt", run))
        };

        let exit_code = runner::execute(&wrapper, &gradle_args, &project_dir, &log_path)?;

        if exit_code != 0 {
            println!("RUN {} FAILED (exit={})", run, exit_code);
            preserve_run_log(
                &log_path,
                &out_dir.join(format!("run{}-FAILED-gradle-output.txt", run)),
            );
            if stop_on_failure {
                println!("Stopping because stop-on-failure is set.");
                break;
            }
            continue;
        }

        let mut sources = artifacts::updated_since(&source_root, &pre_run_snapshot)?;
        if full_artifacts {
            sources = artifacts::copy_reports(&sources, &source_root, &run_dir)?;
        }

        if sources.is_empty() {
            println!("RUN {}: no benchmark report artifacts found.", run);
            if stop_on_failure {
                break;
            }
            continue;
        }

        let (run_rows, parse_failed) = parser::parse_run_reports(&sources, run);
        if parse_failed && !full_artifacts {
            // Full retention already keeps the log under its run
            // directory; the transient minimal-mode log gets a
            // distinguishing name instead of lingering as a temp file.
            preserve_run_log(
                &log_path,
                &out_dir.join(format!("run{}-PARSE-FAILED-gradle-output.txt", run)),
            );
        }

        if run_rows.is_empty() {
            println!("RUN {}: benchmark reports parsed but contain no rows.", run);
            if stop_on_failure {
                break;
            }
            continue;
        }

        if full_artifacts {
            report::write_run_summary(&run_rows, &run_dir.join("summary-timeNs.csv"))?;
        } else if !parse_failed && log_path.exists() {
            // Minimal retention: successful-run logs are transient.
            let _ = fs::remove_file(&log_path);
        }

        println!(
            "===== RUN {}/{} DONE: {} benchmark rows =====",
            run,
            runs,
            run_rows.len()
        );
        all_rows.extend(run_rows);

        if parse_failed && stop_on_failure {
            println!("Stopping because stop-on-failure is set.");
            break;
        }
    }

    if all_rows.is_empty() {
        println!("No benchmark rows collected.");
        return Ok(1);
    }

    let combined_csv = out_dir.join("combined-summary-timeNs.csv");
    let ab_csv = out_dir.join("readable-ab-deltas.csv");
    let per_test_csv = out_dir.join("readable-per-test-runs.csv");

    report::write_combined_summary(&analysis::combined_rows(&all_rows), &combined_csv)?;
    report::write_ab_deltas(&analysis::ab_delta_rows(&all_rows, AB_PAIRS, runs), runs, &ab_csv)?;
    if full_artifacts {
        report::write_per_test(&analysis::per_test_rows(&all_rows, runs), runs, &per_test_csv)?;
    }

    println!("\nAggregation complete: {} rows collected.", all_rows.len());
    println!("OUT_DIR={}", out_dir.display());
    println!("COMBINED={}", combined_csv.display());
    println!("AB_DELTAS={}", ab_csv.display());
    if full_artifacts {
        println!("PER_TEST={}", per_test_csv.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserve_run_log_renames_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("_tmp-run1-gradle-output.txt");
        let preserved = dir.path().join("run1-PARSE-FAILED-gradle-output.txt");
        fs::write(&log_path, "task output").unwrap();

        preserve_run_log(&log_path, &preserved);

        assert!(!log_path.exists());
        assert_eq!(fs::read_to_string(&preserved).unwrap(), "task output");
    }

    #[test]
    fn test_preserve_run_log_missing_log_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("no-such-log.txt");
        let preserved = dir.path().join("preserved.txt");

        preserve_run_log(&log_path, &preserved);

        assert!(!preserved.exists());
    }
}
