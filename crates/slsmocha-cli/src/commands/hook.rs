//! `sls-mocha hook` command implementation.
//!
//! Entry points the serverless host calls around its own actions.

use super::create::report_created;
use super::{fail, print_json, ErrorInfo};
use crate::host::CliHost;
use miette::{miette, Result};
use serde::Serialize;
use slsmocha_core::plugin::{HookEvent, HookSpec, FUNCTION_CREATE_ACTION};
use slsmocha_core::{Event, Outcome};

#[derive(Serialize)]
struct SkipResult {
    ok: bool,
    skipped: bool,
    runtime: Option<String>,
}

#[derive(Serialize)]
struct HookError {
    ok: bool,
    hook: String,
    error: ErrorInfo,
}

/// Run the post `functionCreate` hook for a new function.
pub async fn function_created(
    host: &CliHost,
    path: String,
    runtime: String,
    json: bool,
) -> Result<()> {
    let spec = HookSpec {
        action: FUNCTION_CREATE_ACTION,
        event: HookEvent::Post,
    };
    let function = path.clone();

    match host
        .dispatch_hook(spec, Event::function_created(path, runtime))
        .await
    {
        Ok(Outcome::Created(test_path)) => report_created(Some(function), &test_path, json),
        Ok(Outcome::Skipped { runtime }) => {
            tracing::info!(
                function = %function,
                runtime = runtime.as_deref().unwrap_or("<none>"),
                "runtime not handled, no test stub created"
            );
            if json {
                print_json(&SkipResult {
                    ok: true,
                    skipped: true,
                    runtime,
                })?;
            }
            Ok(())
        }
        Ok(other) => Err(miette!("unexpected outcome from {spec}: {other:?}")),
        Err(e) => {
            let result = HookError {
                ok: false,
                hook: spec.to_string(),
                error: ErrorInfo::from(&e),
            };
            fail(e, &result, json)
        }
    }
}
