use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sls-mocha operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("File {} already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Creating file {} failed: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Creating test folder {} failed: {source}", .path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Listing test folder {} failed: {source}", .path.display())]
    ListFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config at {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No function name given")]
    MissingFunctionName,

    #[error("Function name must not be empty")]
    EmptyFunctionName,

    #[error("Test runner '{binary}' not found in node_modules/.bin or PATH")]
    RunnerNotFound { binary: String },

    #[error("Failed to execute test runner '{binary}': {source}")]
    RunnerSpawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No action registered as '{0}'")]
    UnknownAction(String),

    #[error("No hook registered for {0}")]
    UnknownHook(String),
}

impl Error {
    /// Stable machine-readable code, used in `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::CreateFile { .. } | Self::CreateFolder { .. } => "CREATE_FAILED",
            Self::ListFolder { .. } => "COLLECT_FAILED",
            Self::ConfigRead { .. } | Self::ConfigParse { .. } => "CONFIG_INVALID",
            Self::MissingFunctionName | Self::EmptyFunctionName => "INVALID_FUNCTION",
            Self::RunnerNotFound { .. } => "RUNNER_NOT_FOUND",
            Self::RunnerSpawn { .. } => "RUNNER_FAILED",
            Self::UnknownAction(_) | Self::UnknownHook(_) => "NOT_REGISTERED",
        }
    }
}
