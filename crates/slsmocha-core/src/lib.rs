#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Test stub generation and test runs for serverless functions.
//!
//! Library crates stay free of logging; the CLI reports outcomes.

pub mod collector;
pub mod config;
pub mod error;
pub mod folder;
pub mod generator;
pub mod paths;
pub mod plugin;
pub mod runner;
pub mod version;

pub use collector::collect_paths;
pub use config::{Config, PluginSettings};
pub use error::Error;
pub use folder::ensure_test_folder;
pub use generator::{create_test, render_test_file};
pub use paths::{resolve_test_path, Project};
pub use plugin::{register, Event, MochaPlugin, Outcome, PluginHost};
pub use runner::{MochaRunner, RunReport, TestRunner};
pub use version::VERSION;
