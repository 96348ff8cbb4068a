use crate::error::Error;
use crate::runner::DEFAULT_RUNNER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project file managed by the serverless framework.
pub const PROJECT_FILE: &str = "s-project.json";

/// Runtime the post-create hook generates stubs for unless configured otherwise.
pub const DEFAULT_RUNTIME: &str = "nodejs4.3";

/// Runtime configuration for the sls-mocha CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// Plugin settings, read from `custom.mocha` in `s-project.json`.
///
/// ```json
/// { "custom": { "mocha": { "runtimes": ["nodejs4.3"], "runner": "mocha" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Runtimes the post-create hook generates test stubs for.
    pub runtimes: Vec<String>,

    /// Test runner binary.
    pub runner: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            runtimes: vec![DEFAULT_RUNTIME.to_string()],
            runner: DEFAULT_RUNNER.to_string(),
        }
    }
}

#[derive(Deserialize, Default)]
struct ProjectFile {
    #[serde(default)]
    custom: Custom,
}

#[derive(Deserialize, Default)]
struct Custom {
    #[serde(default)]
    mocha: Option<PluginSettings>,
}

impl PluginSettings {
    /// Load settings from the project file under `root`.
    ///
    /// A missing project file or a missing `custom.mocha` key yields defaults.
    ///
    /// # Errors
    /// Returns an error if the project file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(PROJECT_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = slsmocha_util::fs::read_to_string_lossy(&path).map_err(|source| {
            Error::ConfigRead {
                path: path.clone(),
                source,
            }
        })?;
        let project: ProjectFile =
            serde_json::from_str(&text).map_err(|source| Error::ConfigParse { path, source })?;

        Ok(project.custom.mocha.unwrap_or_default())
    }

    /// Check whether the post-create hook handles `runtime`.
    #[must_use]
    pub fn allows_runtime(&self, runtime: &str) -> bool {
        self.runtimes.iter().any(|r| r == runtime)
    }
}
