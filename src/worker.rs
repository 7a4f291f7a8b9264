//! Worker trait and adapters
//!
//! A worker is a named unit of conversational capability: given the history
//! so far it produces the next message, optionally carrying a routing
//! directive. Workers may be deterministic rules, completion-backed
//! assistants, or humans; the session loop treats them uniformly.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;
use crate::items::{Directive, Message};

/// A named participant in the conversation.
///
/// Implementations must keep `name` stable for the lifetime of a session.
/// `declared_targets` is the closed set of workers this one may hand off to
/// via an explicit [`Directive::Target`]; a handoff outside this set ends
/// the session rather than routing.
#[async_trait]
pub trait Worker: Send + Sync + Debug {
    /// Unique name of the worker.
    fn name(&self) -> &str;

    /// Workers this one is allowed to hand off to explicitly.
    fn declared_targets(&self) -> &[String] {
        &[]
    }

    /// Produce the next message given the conversation so far.
    async fn handle(&self, history: &[Message]) -> Result<Message>;
}

/// What a closure-based worker returns: reply text plus an optional routing
/// directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReply {
    pub content: String,
    pub directive: Option<Directive>,
}

impl WorkerReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            directive: None,
        }
    }

    /// Reply and hand off explicitly to the named worker.
    pub fn hand_off(content: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            directive: Some(Directive::Target(target.into())),
        }
    }

    /// Reply and expose a condition keyword for route matching instead of
    /// the full reply text.
    pub fn signal(content: impl Into<String>, signal: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            directive: Some(Directive::Signal(signal.into())),
        }
    }
}

impl From<String> for WorkerReply {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for WorkerReply {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

/// A function-based worker for deterministic, rule-based logic.
#[derive(Clone)]
pub struct FnWorker {
    name: String,
    targets: Vec<String>,
    handler: Arc<dyn Fn(&[Message]) -> WorkerReply + Send + Sync>,
}

impl Debug for FnWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnWorker")
            .field("name", &self.name)
            .field("targets", &self.targets)
            .finish()
    }
}

impl FnWorker {
    /// Create a new function worker.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Message]) -> WorkerReply + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            targets: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Create a worker from a plain text-producing function.
    pub fn simple<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Message]) -> String + Send + Sync + 'static,
    {
        Self::new(name, move |history: &[Message]| {
            WorkerReply::new(handler(history))
        })
    }

    /// Declare the workers this one may hand off to explicitly.
    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }
}

#[async_trait]
impl Worker for FnWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_targets(&self) -> &[String] {
        &self.targets
    }

    async fn handle(&self, history: &[Message]) -> Result<Message> {
        let reply = (self.handler)(history);
        let mut message = Message::from_worker(&self.name, reply.content);
        if let Some(directive) = reply.directive {
            message = message.with_directive(directive);
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_simple_worker_produces_named_message() {
        let worker = FnWorker::simple("echo", |history: &[Message]| {
            format!("heard: {}", history.last().map(|m| m.content.as_str()).unwrap_or(""))
        });

        let history = vec![Message::user("hello")];
        let msg = worker.handle(&history).await.unwrap();

        assert_eq!(msg.source, "echo");
        assert_eq!(msg.content, "heard: hello");
        assert!(msg.directive.is_none());
    }

    #[tokio::test]
    async fn test_worker_reply_directives() {
        let worker = FnWorker::new("triage", |_history: &[Message]| {
            WorkerReply::hand_off("Routing you to billing", "billing")
        })
        .with_targets(vec!["billing".to_string()]);

        let msg = worker.handle(&[]).await.unwrap();
        assert_eq!(
            msg.directive,
            Some(Directive::Target("billing".to_string()))
        );
        assert_eq!(worker.declared_targets(), ["billing".to_string()]);
    }

    #[test]
    fn test_worker_reply_conversions() {
        let reply: WorkerReply = "plain text".into();
        assert_eq!(reply.content, "plain text");
        assert!(reply.directive.is_none());

        let reply = WorkerReply::signal("needs work", "revise");
        assert_eq!(reply.directive, Some(Directive::Signal("revise".to_string())));
    }

    #[test]
    fn test_debug_hides_handler() {
        let worker = FnWorker::simple("quiet", |_: &[Message]| String::new());
        let debug = format!("{:?}", worker);
        assert!(debug.contains("quiet"));
        assert!(!debug.contains("handler"));
    }
}
