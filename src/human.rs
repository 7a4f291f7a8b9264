//! Human-in-the-loop seam
//!
//! A [`HumanInput`] provider asks a question and blocks until a person
//! answers; [`HumanWorker`] bridges it into the session loop via
//! `spawn_blocking` so the single-threaded turn model tolerates the wait.
//! Humans hand off the same way conversational workers do, by including
//! `HANDOFF TO <name>` in the reply.

use async_trait::async_trait;
use std::fmt::Debug;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::error::{Result, SwitchboardError};
use crate::items::{Directive, Message};
use crate::worker::Worker;

/// Asks a human a question and returns their answer. Blocking.
pub trait HumanInput: Send + Sync {
    fn prompt(&self, question: &str) -> Result<String>;
}

/// Reads one line from standard input.
#[derive(Debug, Clone, Default)]
pub struct StdinInput;

impl HumanInput for StdinInput {
    fn prompt(&self, question: &str) -> Result<String> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", question)?;
        stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end().to_string())
    }
}

/// A worker whose turns are taken by a person. The question posed is the
/// content of the last message in history.
pub struct HumanWorker {
    name: String,
    targets: Vec<String>,
    input: Arc<dyn HumanInput>,
}

impl Debug for HumanWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HumanWorker")
            .field("name", &self.name)
            .field("targets", &self.targets)
            .finish()
    }
}

impl HumanWorker {
    pub fn new(name: impl Into<String>, input: Arc<dyn HumanInput>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            input,
        }
    }

    /// Declare the workers the person may hand off to via `HANDOFF TO`.
    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }
}

#[async_trait]
impl Worker for HumanWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_targets(&self) -> &[String] {
        &self.targets
    }

    async fn handle(&self, history: &[Message]) -> Result<Message> {
        let question = history
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let input = Arc::clone(&self.input);
        let reply = tokio::task::spawn_blocking(move || input.prompt(&question))
            .await
            .map_err(|e| SwitchboardError::Worker {
                message: format!("Input task failed: {}", e),
            })??;

        let mut message = Message::from_worker(&self.name, &reply);
        if let Some(directive) = Directive::extract_target(&reply) {
            message = message.with_directive(directive);
        }
        Ok(message)
    }
}
