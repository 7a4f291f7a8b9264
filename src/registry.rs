//! Worker registry and routing rules
//!
//! The registry holds the closed set of workers for a session plus the
//! routing edges between them. It is mutated only during the configuration
//! phase; constructing a session seals it, after which the same registry
//! (behind an `Arc`) may be shared read-only by any number of concurrent
//! sessions.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SwitchboardError};
use crate::worker::Worker;

/// An edge in the routing graph. A `None` condition marks the default
/// (fallback) edge for its source; each source may have at most one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRule {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

struct RegistryInner {
    workers: HashMap<String, Arc<dyn Worker>>,
    // Registration order doubles as evaluation order.
    rules: Vec<RouteRule>,
}

/// The closed set of workers and routes for a session.
pub struct WorkerRegistry {
    inner: RwLock<RegistryInner>,
    sealed: AtomicBool,
}

impl Debug for WorkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().unwrap();
        f.debug_struct("WorkerRegistry")
            .field("workers", &inner.workers.keys().collect::<Vec<_>>())
            .field("rules", &inner.rules.len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                workers: HashMap::new(),
                rules: Vec::new(),
            }),
            sealed: AtomicBool::new(false),
        }
    }

    /// Add a worker to the registry.
    pub fn register(&self, worker: Arc<dyn Worker>) -> Result<()> {
        self.ensure_unsealed()?;
        let mut inner = self.inner.write().unwrap();
        let name = worker.name().to_string();
        if inner.workers.contains_key(&name) {
            return Err(SwitchboardError::DuplicateWorker { name });
        }
        debug!(worker = %name, "Registered worker");
        inner.workers.insert(name, worker);
        Ok(())
    }

    /// Add a routing edge. Both endpoints must already be registered.
    /// Conditional rules for one source are evaluated in the order they
    /// were added; at most one unconditional (default) rule is allowed per
    /// source.
    pub fn add_route(&self, source: &str, target: &str, condition: Option<&str>) -> Result<()> {
        self.ensure_unsealed()?;
        let mut inner = self.inner.write().unwrap();
        if !inner.workers.contains_key(source) {
            return Err(SwitchboardError::UnknownWorker {
                name: source.to_string(),
            });
        }
        if !inner.workers.contains_key(target) {
            return Err(SwitchboardError::UnknownWorker {
                name: target.to_string(),
            });
        }
        if condition.is_none()
            && inner
                .rules
                .iter()
                .any(|r| r.source == source && r.condition.is_none())
        {
            return Err(SwitchboardError::ConflictingDefaultRoute {
                worker: source.to_string(),
            });
        }
        debug!(source, target, condition = ?condition, "Added route");
        inner.rules.push(RouteRule {
            source: source.to_string(),
            target: target.to_string(),
            condition: condition.map(|c| c.to_string()),
        });
        Ok(())
    }

    /// Resolve the next worker for `source` given a routing signal (the
    /// emitting worker's message content, or its directive keyword).
    ///
    /// Conditional rules are checked in registration order by case-sensitive
    /// substring containment; the first match wins. The default rule, if
    /// any, applies last. Returns `None` when nothing matches.
    pub fn resolve(&self, source: &str, signal: &str) -> Option<String> {
        let inner = self.inner.read().unwrap();
        let mut default_target = None;
        for rule in inner.rules.iter().filter(|r| r.source == source) {
            match &rule.condition {
                Some(condition) => {
                    if signal.contains(condition.as_str()) {
                        return Some(rule.target.clone());
                    }
                }
                None => {
                    if default_target.is_none() {
                        default_target = Some(rule.target.clone());
                    }
                }
            }
        }
        default_target
    }

    /// Look up a worker by name.
    pub fn worker(&self, name: &str) -> Option<Arc<dyn Worker>> {
        self.inner.read().unwrap().workers.get(name).cloned()
    }

    /// Whether a worker with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().unwrap().workers.contains_key(name)
    }

    /// All routes leaving the given worker, in evaluation order.
    pub fn routes_from(&self, source: &str) -> Vec<RouteRule> {
        self.inner
            .read()
            .unwrap()
            .rules
            .iter()
            .filter(|r| r.source == source)
            .cloned()
            .collect()
    }

    /// Make the registry read-only. Called when a session is constructed;
    /// idempotent.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::SeqCst);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }

    fn ensure_unsealed(&self) -> Result<()> {
        if self.is_sealed() {
            return Err(SwitchboardError::RegistrySealed);
        }
        Ok(())
    }
}
