//! Action and hook registration for a serverless host.
//!
//! The host hands [`register`] a [`PluginHost`]; the plugin answers with one
//! bound handler per action or hook. Handlers hold no state between calls
//! other than what is on disk.

use crate::collector::collect_paths;
use crate::config::PluginSettings;
use crate::error::Error;
use crate::generator::create_test;
use crate::paths::Project;
use crate::runner::{MochaRunner, RunReport, TestRunner};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "serverless-mocha-plugin";

/// Context the actions are registered in.
pub const FUNCTION_CONTEXT: &str = "function";

pub const CREATE_ACTION: &str = "mocha-create";
pub const RUN_ACTION: &str = "mocha-run";

/// Host action the post-create hook is attached to.
pub const FUNCTION_CREATE_ACTION: &str = "functionCreate";

/// A positional parameter of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Positions consumed, e.g. `0->` for "position 0 and onward".
    pub position: &'static str,
}

/// Describes an action for the host's command dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub context: &'static str,
    pub context_action: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterSpec>,
}

impl ActionSpec {
    fn with_paths(context_action: &'static str, description: &'static str) -> Self {
        Self {
            context: FUNCTION_CONTEXT,
            context_action,
            description,
            parameters: vec![ParameterSpec {
                name: "paths",
                description: "Path to function to test. If not defined, test all functions.",
                position: "0->",
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookEvent {
    Pre,
    Post,
}

impl HookEvent {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }
}

/// Identifies a host action lifecycle point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookSpec {
    pub action: &'static str,
    pub event: HookEvent,
}

impl fmt::Display for HookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action, self.event.as_str())
    }
}

/// Options the host passes to a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Positional function names of an action.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Function the hook fired for.
    #[serde(default)]
    pub path: Option<String>,

    /// Runtime of that function.
    #[serde(default)]
    pub runtime: Option<String>,
}

impl Event {
    #[must_use]
    pub fn with_paths(paths: Vec<String>) -> Self {
        Self {
            paths,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn function_created(path: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            runtime: Some(runtime.into()),
            ..Self::default()
        }
    }
}

/// What a handler did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A test stub was written, path relative to the project root.
    Created(PathBuf),
    /// The runner finished.
    Ran(RunReport),
    /// The hook ignored a function with an unhandled runtime.
    Skipped { runtime: Option<String> },
}

pub type Handler = Box<dyn Fn(Event) -> BoxFuture<'static, Result<Outcome, Error>> + Send + Sync>;

pub type RunnerFactory = Box<dyn Fn() -> Box<dyn TestRunner> + Send + Sync>;

/// Capabilities a host offers to plugins.
pub trait PluginHost {
    fn add_action(&mut self, spec: ActionSpec, handler: Handler);

    fn add_hook(&mut self, spec: HookSpec, handler: Handler);
}

/// The mocha plugin bound to one project.
pub struct MochaPlugin {
    project: Project,
    settings: PluginSettings,
    new_runner: RunnerFactory,
}

impl fmt::Debug for MochaPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MochaPlugin")
            .field("project", &self.project)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl MochaPlugin {
    /// Create the plugin with a [`MochaRunner`] for the configured runner binary.
    #[must_use]
    pub fn new(project: Project, settings: PluginSettings) -> Self {
        let new_runner = mocha_factory(&project, &settings, false);
        Self {
            project,
            settings,
            new_runner,
        }
    }

    /// Use a [`MochaRunner`] whose stdout goes to stderr.
    #[must_use]
    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.new_runner = mocha_factory(&self.project, &self.settings, enabled);
        self
    }

    /// Replace the runner used by `mocha-run`. Called once per run.
    #[must_use]
    pub fn with_runner<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn TestRunner> + Send + Sync + 'static,
    {
        self.new_runner = Box::new(factory);
        self
    }

    /// `mocha-create`: generate a stub for the first function name.
    ///
    /// Further names are ignored.
    pub async fn create_action(&self, event: Event) -> Result<Outcome, Error> {
        let name = event.paths.first().ok_or(Error::MissingFunctionName)?;
        let path = create_test(&self.project, name).await?;
        Ok(Outcome::Created(path))
    }

    /// `mocha-run`: collect test files and hand them to a fresh runner.
    ///
    /// A collection failure returns before the runner is created.
    pub async fn run_action(&self, event: Event) -> Result<Outcome, Error> {
        let paths = collect_paths(&self.project, &event.paths).await?;

        let mut runner = (self.new_runner)();
        for path in paths {
            runner.add_file(path);
        }
        let report = runner.run().await?;
        Ok(Outcome::Ran(report))
    }

    /// Post `functionCreate` hook: generate a stub for handled runtimes only.
    pub async fn post_function_create(&self, event: Event) -> Result<Outcome, Error> {
        let handled = event
            .runtime
            .as_deref()
            .is_some_and(|runtime| self.settings.allows_runtime(runtime));
        if !handled {
            return Ok(Outcome::Skipped {
                runtime: event.runtime,
            });
        }

        let name = event.path.as_deref().ok_or(Error::MissingFunctionName)?;
        let path = create_test(&self.project, name).await?;
        Ok(Outcome::Created(path))
    }
}

fn mocha_factory(project: &Project, settings: &PluginSettings, stdout_to_stderr: bool) -> RunnerFactory {
    let binary = settings.runner.clone();
    let root = project.root().to_path_buf();
    Box::new(move || -> Box<dyn TestRunner> {
        Box::new(
            MochaRunner::new(binary.clone(), root.clone()).with_stdout_to_stderr(stdout_to_stderr),
        )
    })
}

/// Register the plugin's actions and hooks with a host.
pub fn register<H: PluginHost + ?Sized>(host: &mut H, plugin: Arc<MochaPlugin>) {
    let p = Arc::clone(&plugin);
    host.add_action(
        ActionSpec::with_paths(CREATE_ACTION, "Create mocha test for function"),
        Box::new(move |event| {
            let p = Arc::clone(&p);
            Box::pin(async move { p.create_action(event).await })
        }),
    );

    let p = Arc::clone(&plugin);
    host.add_action(
        ActionSpec::with_paths(RUN_ACTION, "Run mocha tests for functions"),
        Box::new(move |event| {
            let p = Arc::clone(&p);
            Box::pin(async move { p.run_action(event).await })
        }),
    );

    host.add_hook(
        HookSpec {
            action: FUNCTION_CREATE_ACTION,
            event: HookEvent::Post,
        },
        Box::new(move |event| {
            let p = Arc::clone(&plugin);
            Box::pin(async move { p.post_function_create(event).await })
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeHost {
        actions: HashMap<&'static str, (ActionSpec, Handler)>,
        hooks: HashMap<String, Handler>,
    }

    impl PluginHost for FakeHost {
        fn add_action(&mut self, spec: ActionSpec, handler: Handler) {
            self.actions.insert(spec.context_action, (spec, handler));
        }

        fn add_hook(&mut self, spec: HookSpec, handler: Handler) {
            self.hooks.insert(spec.to_string(), handler);
        }
    }

    /// Records loaded files instead of running anything.
    struct RecordingRunner {
        files: Vec<PathBuf>,
        runs: Arc<Mutex<Vec<Vec<PathBuf>>>>,
    }

    impl TestRunner for RecordingRunner {
        fn add_file(&mut self, path: PathBuf) {
            self.files.push(path);
        }

        fn run(self: Box<Self>) -> BoxFuture<'static, Result<RunReport, Error>> {
            Box::pin(async move {
                self.runs.lock().unwrap().push(self.files.clone());
                Ok(RunReport {
                    files: self.files,
                    exit_code: Some(0),
                })
            })
        }
    }

    fn plugin_in(root: &Path) -> (Arc<MochaPlugin>, Arc<Mutex<Vec<Vec<PathBuf>>>>) {
        let runs = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&runs);
        let plugin = MochaPlugin::new(Project::new(root), PluginSettings::default()).with_runner(
            move || {
                Box::new(RecordingRunner {
                    files: Vec::new(),
                    runs: Arc::clone(&recorded),
                })
            },
        );
        (Arc::new(plugin), runs)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_register_binds_actions_and_hook() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());
        let mut host = FakeHost::default();

        register(&mut host, plugin);

        assert_eq!(host.actions.len(), 2);
        let (create, _) = &host.actions[CREATE_ACTION];
        assert_eq!(create.context, "function");
        assert_eq!(create.parameters[0].name, "paths");
        assert_eq!(create.parameters[0].position, "0->");
        assert!(host.actions.contains_key(RUN_ACTION));
        assert!(host.hooks.contains_key("functionCreate:post"));
    }

    #[tokio::test]
    async fn test_create_action_honours_first_name_only() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());
        let mut host = FakeHost::default();
        register(&mut host, plugin);

        let (_, create) = &host.actions[CREATE_ACTION];
        let outcome = create(Event::with_paths(names(&["module1/function1", "other"])))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Created(PathBuf::from("test/module1_function1.js"))
        );
        assert!(dir.path().join("test/module1_function1.js").is_file());
        assert!(!dir.path().join("test/other.js").exists());
    }

    #[tokio::test]
    async fn test_create_action_requires_a_name() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());

        let err = plugin.create_action(Event::default()).await.unwrap_err();
        assert!(matches!(err, Error::MissingFunctionName));
    }

    #[tokio::test]
    async fn test_create_action_conflict() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());

        plugin
            .create_action(Event::with_paths(names(&["hello"])))
            .await
            .unwrap();
        let err = plugin
            .create_action(Event::with_paths(names(&["hello"])))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_run_action_named_functions() {
        let dir = tempdir().unwrap();
        let (plugin, runs) = plugin_in(dir.path());

        let outcome = plugin
            .run_action(Event::with_paths(names(&["a", "m/b"])))
            .await
            .unwrap();

        let expected = vec![PathBuf::from("test/a.js"), PathBuf::from("test/m_b.js")];
        assert_eq!(
            outcome,
            Outcome::Ran(RunReport {
                files: expected.clone(),
                exit_code: Some(0),
            })
        );
        assert_eq!(*runs.lock().unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn test_run_action_all_tests() {
        let dir = tempdir().unwrap();
        let (plugin, runs) = plugin_in(dir.path());
        plugin
            .create_action(Event::with_paths(names(&["a"])))
            .await
            .unwrap();
        fs::write(dir.path().join("test/README.md"), "").unwrap();

        plugin.run_action(Event::default()).await.unwrap();

        assert_eq!(
            *runs.lock().unwrap(),
            vec![vec![PathBuf::from("test/a.js")]]
        );
    }

    #[tokio::test]
    async fn test_run_action_collect_failure_skips_runner() {
        let dir = tempdir().unwrap();
        let (plugin, runs) = plugin_in(dir.path());

        let err = plugin.run_action(Event::default()).await.unwrap_err();
        assert!(matches!(err, Error::ListFolder { .. }));
        assert!(runs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hook_generates_for_node_runtime() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());
        let mut host = FakeHost::default();
        register(&mut host, plugin);

        let hook = &host.hooks["functionCreate:post"];
        let outcome = hook(Event::function_created("module1/function1", "nodejs4.3"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Created(PathBuf::from("test/module1_function1.js"))
        );
        assert!(dir.path().join("test/module1_function1.js").is_file());
    }

    #[tokio::test]
    async fn test_hook_skips_other_runtime() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());

        let outcome = plugin
            .post_function_create(Event::function_created("module1/function1", "python2.7"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Skipped {
                runtime: Some("python2.7".to_string())
            }
        );
        assert!(!dir.path().join("test").exists());
    }

    #[tokio::test]
    async fn test_hook_skips_missing_runtime() {
        let dir = tempdir().unwrap();
        let (plugin, _) = plugin_in(dir.path());
        let event = Event {
            path: Some("f".to_string()),
            ..Event::default()
        };

        let outcome = plugin.post_function_create(event).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped { runtime: None });
    }

    #[tokio::test]
    async fn test_hook_uses_configured_runtimes() {
        let dir = tempdir().unwrap();
        let settings = PluginSettings {
            runtimes: vec!["nodejs6.10".to_string()],
            ..PluginSettings::default()
        };
        let plugin = MochaPlugin::new(Project::new(dir.path()), settings);

        let created = plugin
            .post_function_create(Event::function_created("f", "nodejs6.10"))
            .await
            .unwrap();
        assert_eq!(created, Outcome::Created(PathBuf::from("test/f.js")));

        let skipped = plugin
            .post_function_create(Event::function_created("g", "nodejs4.3"))
            .await
            .unwrap();
        assert!(matches!(skipped, Outcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_stdout_to_stderr_keeps_configured_runner() {
        let dir = tempdir().unwrap();
        let settings = PluginSettings {
            runner: "sls-mocha-no-such-runner-7f3a".to_string(),
            ..PluginSettings::default()
        };
        let plugin =
            MochaPlugin::new(Project::new(dir.path()), settings).with_stdout_to_stderr(true);

        let err = plugin
            .run_action(Event::with_paths(names(&["a"])))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::RunnerNotFound { ref binary } if binary == "sls-mocha-no-such-runner-7f3a")
        );
    }

    #[test]
    fn test_event_from_json() {
        let event: Event =
            serde_json::from_str(r#"{"path": "m/f", "runtime": "nodejs4.3"}"#).unwrap();
        assert_eq!(event, Event::function_created("m/f", "nodejs4.3"));
        assert!(event.paths.is_empty());
    }
}
