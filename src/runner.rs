//! External benchmark task execution.
//!
//! This is the only component performing blocking external I/O of
//! indeterminate duration. The child's stdout and stderr are merged
//! into a single anonymous pipe and forwarded line by line to both the
//! console and a persisted log file, flushed per line so the log can
//! be tailed while the task runs.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Locate the Gradle wrapper for the platform.
///
/// A missing wrapper is a fatal configuration error; nothing can run
/// without it.
pub fn resolve_gradle_wrapper(project_dir: &Path) -> Result<PathBuf> {
    let wrapper_name = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
    let wrapper = project_dir.join(wrapper_name);
    if !wrapper.exists() {
        bail!("Gradle wrapper not found: {}", wrapper.display());
    }
    Ok(wrapper)
}

/// Run `program` with `args` in `working_dir`, teeing its merged
/// stdout/stderr to the console and to `log_path`. Blocks until the
/// process exits and returns its exit code.
///
/// The log is written with `\n` line endings regardless of host
/// conventions; non-UTF-8 output bytes are replaced, not fatal.
pub fn execute(
    program: &Path,
    args: &[String],
    working_dir: &Path,
    log_path: &Path,
) -> Result<i32> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut log_file = File::create(log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    // One pipe for both streams preserves the child's own interleaving.
    let (reader, stdout_writer) = io::pipe().context("Failed to create output pipe")?;
    let stderr_writer = stdout_writer
        .try_clone()
        .context("Failed to clone output pipe")?;

    debug!("Spawning {} {:?}", program.display(), args);
    let mut child = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_writer))
        .stderr(Stdio::from(stderr_writer))
        .spawn()
        .with_context(|| format!("Failed to spawn {}", program.display()))?;

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let stdout = io::stdout();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read benchmark task output")?;
        if read == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf);

        {
            let mut out = stdout.lock();
            writeln!(out, "{}", line)?;
            out.flush()?;
        }
        writeln!(log_file, "{}", line)?;
        log_file.flush()?;
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {}", program.display()))?;
    Ok(status.code().unwrap_or(-1))
}
