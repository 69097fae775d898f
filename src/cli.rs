//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// BenchSuite - connected benchmark suite runner and aggregator
///
/// Runs the connected benchmark Gradle task for N process-level
/// repetitions, collects the benchmark JSON reports each run produces,
/// and aggregates them into cross-run CSV tables.
///
/// Examples:
///   benchsuite --runs 5
///   benchsuite --runs 3 --project-dir ./android --stop-on-failure
///   benchsuite --artifact-level full --gradle-arg --offline
///   benchsuite --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the project directory containing the Gradle wrapper
    #[arg(long, default_value = "android", value_name = "DIR")]
    pub project_dir: PathBuf,

    /// Number of process-level benchmark runs
    #[arg(short, long, default_value = "5", value_name = "COUNT")]
    pub runs: usize,

    /// Gradle task to execute on each run
    #[arg(
        short,
        long,
        default_value = ":benchmarks:databases:connectedReleaseAndroidTest",
        env = "BENCHSUITE_TASK"
    )]
    pub task: String,

    /// Output directory for logs and aggregate CSVs
    ///
    /// Defaults to <project-dir>/build/<prefix>-r<runs>-<timestamp>.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Additional argument forwarded to Gradle (can be repeated)
    ///
    /// Example: --gradle-arg --offline --gradle-arg --no-daemon
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    pub gradle_arg: Vec<String>,

    /// Stop immediately when a run fails or produces no rows
    #[arg(long)]
    pub stop_on_failure: bool,

    /// Artifact retention level (minimal, full)
    ///
    /// 'minimal' keeps only the final aggregate CSVs; 'full' also keeps
    /// per-run logs, copied report JSONs, and per-run summaries.
    #[arg(long, default_value = "minimal", value_name = "LEVEL")]
    pub artifact_level: ArtifactLevel,

    /// Path to configuration file
    ///
    /// If not specified, looks for .benchsuite.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .benchsuite.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Artifact retention level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactLevel {
    /// Keep only the final aggregate CSVs (default)
    #[default]
    Minimal,
    /// Keep per-run logs, copied report JSONs, and per-run summaries
    Full,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.runs == 0 {
            return Err("Run count must be at least 1".to_string());
        }

        if self.task.trim().is_empty() {
            return Err("Gradle task must not be empty".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if !self.project_dir.exists() {
            return Err(format!(
                "Project directory does not exist: {}",
                self.project_dir.display()
            ));
        }
        if !self.project_dir.is_dir() {
            return Err(format!(
                "Project path is not a directory: {}",
                self.project_dir.display()
            ));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
