//! `sls-mocha version` command implementation.

use super::print_json;
use miette::Result;
use slsmocha_core::plugin::PLUGIN_NAME;
use slsmocha_core::version::{version_string, VERSION};

pub fn run(json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "version": VERSION,
            "plugin": PLUGIN_NAME,
        }));
    }
    println!("{}", version_string());
    Ok(())
}
