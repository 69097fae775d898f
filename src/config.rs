//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.benchsuite.toml` files.

use crate::cli::ArtifactLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// External task settings.
    #[serde(default)]
    pub task: TaskConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of process-level benchmark runs.
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Stop immediately when a run fails or produces no rows.
    #[serde(default)]
    pub stop_on_failure: bool,

    /// Artifact retention level.
    #[serde(default)]
    pub artifact_level: ArtifactLevel,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            stop_on_failure: false,
            artifact_level: ArtifactLevel::Minimal,
        }
    }
}

fn default_runs() -> usize {
    5
}

/// External Gradle task settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Gradle task executed on each run.
    #[serde(default = "default_gradle_task")]
    pub gradle_task: String,

    /// Additional arguments forwarded to Gradle.
    #[serde(default)]
    pub gradle_args: Vec<String>,

    /// Project directory containing the Gradle wrapper.
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            gradle_task: default_gradle_task(),
            gradle_args: Vec::new(),
            project_dir: default_project_dir(),
        }
    }
}

fn default_gradle_task() -> String {
    ":benchmarks:databases:connectedReleaseAndroidTest".to_string()
}

fn default_project_dir() -> String {
    "android".to_string()
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Explicit output directory. When unset, a timestamped directory
    /// under <project-dir>/build is used.
    #[serde(default)]
    pub dir: Option<String>,

    /// Prefix for the default timestamped output directory name.
    #[serde(default = "default_output_prefix")]
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: default_output_prefix(),
        }
    }
}

fn default_output_prefix() -> String {
    "db-benchmark-connectedRelease".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".benchsuite.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Core run settings - always override since they have defaults in CLI
        self.general.runs = args.runs;
        self.general.artifact_level = args.artifact_level;
        self.task.gradle_task = args.task.clone();
        self.task.project_dir = args.project_dir.display().to_string();

        // Extra Gradle args - only override if provided
        if !args.gradle_arg.is_empty() {
            self.task.gradle_args = args.gradle_arg.clone();
        }

        // Output directory - only override if provided
        if let Some(ref dir) = args.output_dir {
            self.output.dir = Some(dir.display().to_string());
        }

        // Flags always override when set
        if args.stop_on_failure {
            self.general.stop_on_failure = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.runs, 5);
        assert!(!config.general.stop_on_failure);
        assert_eq!(config.general.artifact_level, ArtifactLevel::Minimal);
        assert_eq!(
            config.task.gradle_task,
            ":benchmarks:databases:connectedReleaseAndroidTest"
        );
        assert_eq!(config.output.prefix, "db-benchmark-connectedRelease");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
runs = 3
stop_on_failure = true
artifact_level = "full"

[task]
gradle_task = ":benchmarks:custom:connectedAndroidTest"
gradle_args = ["--offline"]
project_dir = "app"

[output]
prefix = "custom-bench"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.runs, 3);
        assert!(config.general.stop_on_failure);
        assert_eq!(config.general.artifact_level, ArtifactLevel::Full);
        assert_eq!(config.task.gradle_task, ":benchmarks:custom:connectedAndroidTest");
        assert_eq!(config.task.gradle_args, vec!["--offline"]);
        assert_eq!(config.task.project_dir, "app");
        assert_eq!(config.output.prefix, "custom-bench");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        // Logging verbosity is a CLI concern; a leftover key from an
        // older config must not break loading.
        let toml_content = r#"
[general]
runs = 2
verbose = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.runs, 2);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[task]"));
        assert!(toml_str.contains("[output]"));
    }
}
