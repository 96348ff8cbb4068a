pub mod create;
pub mod hook;
pub mod run;
pub mod version;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use slsmocha_core::Error;

/// Exit code for failed actions.
const EXIT_ERROR: i32 = 1;

/// Error info for JSON output.
#[derive(Serialize)]
pub struct ErrorInfo {
    code: &'static str,
    message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Print a JSON result document to stdout.
pub fn print_json<T: Serialize>(result: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result).into_diagnostic()?);
    Ok(())
}

/// Report a failed action and exit.
///
/// In JSON mode the failure is printed as `result`; otherwise the error is
/// returned for miette to render.
pub fn fail<T: Serialize>(err: Error, result: &T, json: bool) -> Result<()> {
    if json {
        print_json(result)?;
        std::process::exit(EXIT_ERROR);
    }
    Err(err).into_diagnostic()
}
