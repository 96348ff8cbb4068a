//! Test runner seam and the mocha subprocess runner.

use crate::error::Error;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Default test runner binary.
pub const DEFAULT_RUNNER: &str = "mocha";

/// Result of handing a set of files to a runner.
///
/// A failing suite is not an error: it shows up as a non-zero exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Files loaded into the runner, in load order.
    pub files: Vec<PathBuf>,
    /// Exit code of the runner, `None` if it was killed by a signal.
    pub exit_code: Option<i32>,
}

impl RunReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// A test runner: load files, then start one run.
pub trait TestRunner: Send {
    fn add_file(&mut self, path: PathBuf);

    fn run(self: Box<Self>) -> BoxFuture<'static, Result<RunReport, Error>>;
}

/// Runs mocha as a child process in the project root.
///
/// The binary is looked up in `node_modules/.bin` of the project root and
/// its parents first, then on `PATH`.
#[derive(Debug, Clone)]
pub struct MochaRunner {
    binary: String,
    cwd: PathBuf,
    files: Vec<PathBuf>,
    stdout_to_stderr: bool,
}

impl MochaRunner {
    #[must_use]
    pub fn new(binary: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            cwd: cwd.into(),
            files: Vec::new(),
            stdout_to_stderr: false,
        }
    }

    /// Send the runner's stdout to stderr, keeping stdout free for JSON output.
    #[must_use]
    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

impl TestRunner for MochaRunner {
    fn add_file(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    fn run(self: Box<Self>) -> BoxFuture<'static, Result<RunReport, Error>> {
        Box::pin(async move {
            let Some(program) = resolve_binary(&self.cwd, &self.binary) else {
                return Err(Error::RunnerNotFound {
                    binary: self.binary,
                });
            };

            let stdout = if self.stdout_to_stderr {
                Stdio::from(std::io::stderr())
            } else {
                Stdio::inherit()
            };

            let status = tokio::process::Command::new(&program)
                .args(&self.files)
                .current_dir(&self.cwd)
                .stdin(Stdio::inherit())
                .stdout(stdout)
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(|source| Error::RunnerSpawn {
                    binary: program.display().to_string(),
                    source,
                })?;

            Ok(RunReport {
                files: self.files,
                exit_code: status.code(),
            })
        })
    }
}

/// Resolve a binary by searching `node_modules/.bin` directories, then `PATH`.
#[must_use]
pub fn resolve_binary(cwd: &Path, binary: &str) -> Option<PathBuf> {
    let candidates = if cfg!(windows) {
        vec![format!("{binary}.cmd"), binary.to_string()]
    } else {
        vec![binary.to_string()]
    };

    let mut current = cwd.to_path_buf();
    loop {
        let bin_dir = current.join("node_modules").join(".bin");
        if bin_dir.is_dir() {
            for name in &candidates {
                let candidate = bin_dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    which::which(binary).ok()
}
