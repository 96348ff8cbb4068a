//! `sls-mocha mocha-run` command implementation.
//!
//! Runs the named functions' tests, or every test file in the test folder.

use super::{fail, print_json, ErrorInfo};
use crate::host::CliHost;
use miette::{miette, Result};
use serde::Serialize;
use slsmocha_core::plugin::RUN_ACTION;
use slsmocha_core::{Event, Outcome};

/// Exit code when the runner was terminated without one.
const EXIT_INTERNAL_ERROR: i32 = 1;

#[derive(Serialize)]
struct RunResult {
    ok: bool,
    files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

/// Run the run command. Exits with the runner's exit code when tests fail.
pub async fn run(host: &CliHost, paths: Vec<String>, json: bool) -> Result<()> {
    match host.dispatch_action(RUN_ACTION, Event::with_paths(paths)).await {
        Ok(Outcome::Ran(report)) => {
            tracing::info!(
                files = report.files.len(),
                exit_code = ?report.exit_code,
                "test run finished"
            );
            if json {
                print_json(&RunResult {
                    ok: report.passed(),
                    files: report
                        .files
                        .iter()
                        .map(|f| f.display().to_string())
                        .collect(),
                    exit_code: report.exit_code,
                    error: None,
                })?;
            }
            if !report.passed() {
                std::process::exit(report.exit_code.unwrap_or(EXIT_INTERNAL_ERROR));
            }
            Ok(())
        }
        Ok(other) => Err(miette!("unexpected outcome from {RUN_ACTION}: {other:?}")),
        Err(e) => {
            let result = RunResult {
                ok: false,
                files: Vec::new(),
                exit_code: None,
                error: Some(ErrorInfo::from(&e)),
            };
            fail(e, &result, json)
        }
    }
}
