//! Test stub generation.
//!
//! Non-destructive: an existing test file is never overwritten.

use crate::error::Error;
use crate::folder::ensure_test_folder;
use crate::paths::{resolve_test_path, Project};
use std::io;
use std::path::PathBuf;

/// Package that re-exports the lambda wrapper and chai for generated tests.
pub const PLUGIN_MODULE: &str = "serverless-mocha-plugin";

/// Message the placeholder test fails with.
pub const PLACEHOLDER_FAILURE: &str = "no tests implemented";

/// Render the stub test file for a function.
///
/// The handler module is required from `../<function_name>/handler.js`,
/// relative to the test folder.
#[must_use]
pub fn render_test_file(function_name: &str) -> String {
    format!(
        r#"// tests for {function_name}
// Generated by {PLUGIN_MODULE}

var mod = require('../{function_name}/handler.js');
var mochaPlugin = require('{PLUGIN_MODULE}');
var wrapper = mochaPlugin.lambdaWrapper;
var expect = mochaPlugin.chai.expect;

wrapper.init(mod);

describe('{function_name}', function() {{
  it('implement tests here', function(done) {{
    wrapper.run({{}}, function(err, response) {{
      done('{PLACEHOLDER_FAILURE}');
    }});
  }});
}});
"#
    )
}

/// Create the stub test file for a function, along with the test folder.
///
/// Returns the path of the new file relative to the project root.
///
/// # Errors
/// - [`Error::EmptyFunctionName`] for an empty name
/// - [`Error::AlreadyExists`] if the test file is already present
/// - [`Error::CreateFolder`] / [`Error::CreateFile`] on I/O failure
pub async fn create_test(project: &Project, function_name: &str) -> Result<PathBuf, Error> {
    if function_name.is_empty() {
        return Err(Error::EmptyFunctionName);
    }

    ensure_test_folder(project).await?;

    let path = resolve_test_path(function_name);
    let contents = render_test_file(function_name);

    match slsmocha_util::fs::write_new(&project.absolute(&path), contents.as_bytes()).await {
        Ok(()) => Ok(path),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::AlreadyExists { path }),
        Err(source) => Err(Error::CreateFile { path, source }),
    }
}
