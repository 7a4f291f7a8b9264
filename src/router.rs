//! Router: entry-point selection and per-turn handoff resolution
//!
//! The router wraps registry resolution with session-level policy: which
//! worker starts, and which worker acts next given the last message. It
//! performs no I/O and never suspends; for a fixed registry the routed
//! target is a pure function of the current worker and the last message.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, SwitchboardError};
use crate::items::{Directive, Message};
use crate::registry::WorkerRegistry;

/// Outcome of a routing decision.
///
/// `NoRoute` is a normal, reportable end state: a message that matches no
/// rule and has no default edge ends the session rather than raising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Next(String),
    NoRoute,
}

/// Routes a conversation among the workers of a sealed registry.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<WorkerRegistry>,
    entry: Option<String>,
}

impl Router {
    pub fn new(registry: Arc<WorkerRegistry>) -> Self {
        Self {
            registry,
            entry: None,
        }
    }

    /// Designate the worker that takes the first turn.
    pub fn with_entry_point(mut self, name: &str) -> Result<Self> {
        if !self.registry.contains(name) {
            return Err(SwitchboardError::UnknownWorker {
                name: name.to_string(),
            });
        }
        self.entry = Some(name.to_string());
        Ok(self)
    }

    /// The designated start worker.
    pub fn entry_point(&self) -> Result<&str> {
        self.entry
            .as_deref()
            .ok_or(SwitchboardError::NoEntryPoint)
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }

    /// Decide which worker acts after `current` produced `last`.
    ///
    /// An explicit [`Directive::Target`] is honored only when the target is
    /// registered and listed in the current worker's declared targets; a
    /// dangling handoff ends the session. A [`Directive::Signal`] replaces
    /// the message content as the haystack for condition matching.
    pub fn next_worker(&self, current: &str, last: &Message) -> RouteOutcome {
        match &last.directive {
            Some(Directive::Target(name)) => {
                let declared = self
                    .registry
                    .worker(current)
                    .map(|w| w.declared_targets().iter().any(|t| t == name))
                    .unwrap_or(false);
                if declared && self.registry.contains(name) {
                    info!(from = current, to = %name, "Handoff directive honored");
                    RouteOutcome::Next(name.clone())
                } else {
                    debug!(
                        from = current,
                        to = %name,
                        "Handoff target is not a declared, registered worker"
                    );
                    RouteOutcome::NoRoute
                }
            }
            Some(Directive::Signal(signal)) => self.resolve(current, signal),
            None => self.resolve(current, &last.content),
        }
    }

    fn resolve(&self, current: &str, signal: &str) -> RouteOutcome {
        match self.registry.resolve(current, signal) {
            Some(target) => {
                debug!(from = current, to = %target, "Route condition matched");
                RouteOutcome::Next(target)
            }
            None => RouteOutcome::NoRoute,
        }
    }
}
