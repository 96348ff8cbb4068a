//! `sls-mocha mocha-create` command implementation.
//!
//! Generates a test stub for a function. Only the first name is used.

use super::{fail, print_json, ErrorInfo};
use crate::host::CliHost;
use miette::{miette, Result};
use serde::Serialize;
use slsmocha_core::plugin::{CREATE_ACTION, PLUGIN_NAME};
use slsmocha_core::{Event, Outcome};
use std::path::Path;

#[derive(Serialize)]
struct CreateResult {
    ok: bool,
    function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

/// Run the create command.
pub async fn run(host: &CliHost, paths: Vec<String>, json: bool) -> Result<()> {
    let function = paths.first().cloned();
    if paths.len() > 1 {
        tracing::warn!(ignored = ?&paths[1..], "only the first function name is used");
    }

    match host
        .dispatch_action(CREATE_ACTION, Event::with_paths(paths))
        .await
    {
        Ok(Outcome::Created(path)) => report_created(function, &path, json),
        Ok(other) => Err(miette!("unexpected outcome from {CREATE_ACTION}: {other:?}")),
        Err(e) => {
            let result = CreateResult {
                ok: false,
                function,
                path: None,
                error: Some(ErrorInfo::from(&e)),
            };
            fail(e, &result, json)
        }
    }
}

/// Print the one-line confirmation, or the JSON result.
pub fn report_created(function: Option<String>, path: &Path, json: bool) -> Result<()> {
    tracing::debug!(path = %path.display(), "test stub written");
    if json {
        print_json(&CreateResult {
            ok: true,
            function,
            path: Some(path.display().to_string()),
            error: None,
        })
    } else {
        println!("{PLUGIN_NAME}: created {}", path.display());
        Ok(())
    }
}
