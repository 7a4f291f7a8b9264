//! Completion seam for conversational workers
//!
//! Model inference lives outside this crate. A [`CompletionProvider`] turns
//! history into reply text; [`CompletionWorker`] adapts one into a
//! [`Worker`], lifting `HANDOFF TO <name>` phrases in the reply into
//! explicit routing directives. Provider failures are not retried; the
//! session loop records them and terminates.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use crate::error::{Result, SwitchboardError};
use crate::items::{Directive, Message};
use crate::worker::Worker;

/// Produces the next reply text given the conversation so far.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, history: &[Message]) -> Result<String>;
}

/// A provider that replays a fixed script of replies, in order.
///
/// Public on purpose: downstream crates use it to test routing graphs
/// without a live model. Draining the script is an error, which exercises
/// the same path as a real provider outage.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(reply.into());
        self
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, _history: &[Message]) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SwitchboardError::Worker {
                message: "Scripted provider has no replies left".to_string(),
            })
    }
}

/// A worker backed by a completion provider.
#[derive(Clone)]
pub struct CompletionWorker {
    name: String,
    targets: Vec<String>,
    provider: Arc<dyn CompletionProvider>,
}

impl Debug for CompletionWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionWorker")
            .field("name", &self.name)
            .field("targets", &self.targets)
            .finish()
    }
}

impl CompletionWorker {
    pub fn new(name: impl Into<String>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            provider,
        }
    }

    /// Declare the workers this one may hand off to via `HANDOFF TO`.
    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }
}

#[async_trait]
impl Worker for CompletionWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_targets(&self) -> &[String] {
        &self.targets
    }

    async fn handle(&self, history: &[Message]) -> Result<Message> {
        let content = self.provider.complete(history).await?;
        let mut message = Message::from_worker(&self.name, &content);
        if let Some(directive) = Directive::extract_target(&content) {
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
    async fn test_scripted_replies_in_order() {
        let provider = ScriptedProvider::new()
            .with_reply("first")
            .with_reply("second");

        assert_eq!(provider.complete(&[]).await.unwrap(), "first");
        assert_eq!(provider.complete(&[]).await.unwrap(), "second");

        let err = provider.complete(&[]).await.unwrap_err();
        assert!(matches!(err, SwitchboardError::Worker { .. }));
    }

    #[tokio::test]
    async fn test_completion_worker_lifts_handoff_phrase() {
        let provider = Arc::new(
            ScriptedProvider::new().with_reply("Draft ready. HANDOFF TO reviewer"),
        );
        let worker = CompletionWorker::new("creator", provider)
            .with_targets(vec!["reviewer".to_string()]);

        let message = worker.handle(&[]).await.unwrap();
        assert_eq!(message.source, "creator");
        assert_eq!(
            message.directive,
            Some(Directive::Target("reviewer".to_string()))
        );
    }

    #[tokio::test]
    async fn test_completion_worker_plain_reply_has_no_directive() {
        let provider = Arc::new(ScriptedProvider::new().with_reply("just prose"));
        let worker = CompletionWorker::new("creator", provider);

        let message = worker.handle(&[]).await.unwrap();
        assert!(message.directive.is_none());
    }
}
