//! The CLI as a plugin host.
//!
//! Plugins register handlers through [`PluginHost`]; subcommands are then
//! dispatched to them by name.

use slsmocha_core::plugin::{ActionSpec, Handler, HookSpec};
use slsmocha_core::{Error, Event, Outcome, PluginHost};
use std::collections::HashMap;

struct RegisteredAction {
    spec: ActionSpec,
    handler: Handler,
}

/// Handler table filled by plugin registration.
#[derive(Default)]
pub struct CliHost {
    actions: HashMap<&'static str, RegisteredAction>,
    hooks: HashMap<HookSpec, Handler>,
}

impl PluginHost for CliHost {
    fn add_action(&mut self, spec: ActionSpec, handler: Handler) {
        tracing::trace!(
            action = spec.context_action,
            context = spec.context,
            "registered action"
        );
        self.actions
            .insert(spec.context_action, RegisteredAction { spec, handler });
    }

    fn add_hook(&mut self, spec: HookSpec, handler: Handler) {
        tracing::trace!(hook = %spec, "registered hook");
        self.hooks.insert(spec, handler);
    }
}

impl CliHost {
    /// Invoke the action registered as `name`.
    pub async fn dispatch_action(&self, name: &str, event: Event) -> Result<Outcome, Error> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;
        tracing::debug!(
            action = action.spec.context_action,
            paths = ?event.paths,
            "dispatching action"
        );
        (action.handler)(event).await
    }

    /// Invoke the hook registered for `spec`.
    pub async fn dispatch_hook(&self, spec: HookSpec, event: Event) -> Result<Outcome, Error> {
        let handler = self
            .hooks
            .get(&spec)
            .ok_or_else(|| Error::UnknownHook(spec.to_string()))?;
        tracing::debug!(hook = %spec, path = ?event.path, runtime = ?event.runtime, "dispatching hook");
        handler(event).await
    }
}
