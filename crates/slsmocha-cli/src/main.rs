#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod host;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use slsmocha_core::paths::project_root;
use slsmocha_core::{register, Config, MochaPlugin, PluginSettings, Project};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sls-mocha")]
#[command(author, version, about = "Scaffold and run mocha tests for serverless functions", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Create mocha test for function
    #[command(name = "mocha-create")]
    MochaCreate {
        /// Function to create a test for (e.g. "module1/function1"); only the first is used
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Run mocha tests for functions
    #[command(name = "mocha-run")]
    MochaRun {
        /// Functions to test. If not defined, test all functions.
        paths: Vec<String>,
    },

    /// Lifecycle hooks invoked by the serverless host
    Hook {
        #[command(subcommand)]
        hook_cmd: HookCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum HookCommands {
    /// Post function-create: create a test stub for the new function
    #[command(name = "function-create")]
    FunctionCreate {
        /// Path of the created function (e.g. "module1/function1")
        #[arg(long)]
        path: String,

        /// Runtime of the created function (e.g. "nodejs4.3")
        #[arg(long)]
        runtime: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    let command = match cli.command {
        Some(Commands::Version) | None => return commands::version::run(config.json_logs),
        Some(command) => command,
    };

    let root = project_root(&config.cwd).unwrap_or_else(|| config.cwd.clone());
    let settings = PluginSettings::load(&root).into_diagnostic()?;
    tracing::debug!(root = %root.display(), runtimes = ?settings.runtimes, "loaded project");

    let plugin =
        MochaPlugin::new(Project::new(&root), settings).with_stdout_to_stderr(config.json_logs);

    let mut cli_host = host::CliHost::default();
    register(&mut cli_host, Arc::new(plugin));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let json = config.json_logs;
    match command {
        Commands::Version => unreachable!(), // Handled above
        Commands::MochaCreate { paths } => {
            let span = tracing::info_span!("mocha-create", cmd = "mocha-create", cwd = %cwd.display());
            let _guard = span.enter();
            rt.block_on(commands::create::run(&cli_host, paths, json))
        }
        Commands::MochaRun { paths } => {
            let span = tracing::info_span!("mocha-run", cmd = "mocha-run", cwd = %cwd.display());
            let _guard = span.enter();
            rt.block_on(commands::run::run(&cli_host, paths, json))
        }
        Commands::Hook { hook_cmd } => match hook_cmd {
            HookCommands::FunctionCreate { path, runtime } => {
                let span = tracing::info_span!("hook", cmd = "function-create", cwd = %cwd.display());
                let _guard = span.enter();
                rt.block_on(commands::hook::function_created(
                    &cli_host, path, runtime, json,
                ))
            }
        },
    }
}
