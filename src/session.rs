//! Session loop: drives turns to completion
//!
//! The session is the only stateful component. It owns the history, the
//! current-worker pointer, and the turn counter; one worker invocation is
//! in flight at a time and history append order equals turn completion
//! order.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, SwitchboardError};
use crate::items::Message;
use crate::result::SessionOutcome;
use crate::router::{RouteOutcome, Router};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// A message contained the configured terminal phrase.
    ExplicitPhrase,
    /// The last message matched no routing rule and no default edge exists.
    NoRoute,
    /// The configured turn cap was reached.
    TurnLimit,
    /// The caller cancelled the session, or a worker handler failed.
    ExternalCancel,
}

/// State of the session after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Running { next_worker: String },
    Terminated(TerminationReason),
}

/// Configuration for a session.
///
/// The default mirrors a cautious production setup: no terminal phrase,
/// a ten-turn cap so routing cycles cannot spin unbounded, and a fresh
/// cancellation token. Disabling the cap is an explicit caller act.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Literal substring whose presence in any worker message ends the
    /// session. Checked before routing, so termination wins over a
    /// simultaneous route match.
    pub terminal_phrase: Option<String>,

    /// Maximum number of worker turns before the session is stopped.
    pub max_turns: Option<usize>,

    /// External cancellation signal, observed while a worker is in flight.
    pub cancellation: CancellationToken,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            terminal_phrase: None,
            max_turns: Some(10),
            cancellation: CancellationToken::new(),
        }
    }
}

impl SessionConfig {
    pub fn with_terminal_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.terminal_phrase = Some(phrase.into());
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// Remove the turn cap entirely. With a default route cycle this means
    /// the session can only end via phrase, dead end, or cancellation.
    pub fn without_turn_limit(mut self) -> Self {
        self.max_turns = None;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

/// One run of the conversation loop from entry point to a terminal state.
#[derive(Debug)]
pub struct Session {
    id: String,
    router: Router,
    config: SessionConfig,
    history: Vec<Message>,
    current_worker: String,
    turn_count: usize,
    terminated: Option<TerminationReason>,
}

impl Session {
    /// Construct a session: seals the registry, resolves the entry point,
    /// and seeds history with the caller's task.
    pub fn new(router: Router, config: SessionConfig, task: impl Into<String>) -> Result<Self> {
        router.registry().seal();
        let entry = router.entry_point()?.to_string();
        let id = Uuid::new_v4().to_string();
        info!(session = %id, entry = %entry, "Starting session");
        Ok(Self {
            id,
            router,
            config,
            history: vec![Message::user(task)],
            current_worker: entry,
            turn_count: 0,
            terminated: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    /// Name of the worker whose turn is next (meaningless once terminated).
    pub fn current_worker(&self) -> &str {
        &self.current_worker
    }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.terminated
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.is_some()
    }

    /// Advance exactly one turn: invoke the current worker, append its
    /// message, then check termination conditions in priority order
    /// (terminal phrase, turn cap, routing dead end).
    pub async fn step(&mut self) -> Result<SessionStatus> {
        if self.terminated.is_some() {
            return Err(SwitchboardError::SessionTerminated);
        }

        let worker = self
            .router
            .registry()
            .worker(&self.current_worker)
            .ok_or_else(|| SwitchboardError::UnknownWorker {
                name: self.current_worker.clone(),
            })?;

        debug!(
            session = %self.id,
            worker = %self.current_worker,
            turn = self.turn_count + 1,
            "Invoking worker"
        );

        let history = self.history.clone();
        let cancellation = self.config.cancellation.clone();
        let produced = tokio::select! {
            biased;
            _ = cancellation.cancelled() => None,
            produced = worker.handle(&history) => Some(produced),
        };

        let Some(produced) = produced else {
            // In-flight output is discarded, never appended.
            warn!(session = %self.id, worker = %self.current_worker, "Session cancelled");
            self.history.push(Message::system("Session cancelled by caller"));
            return Ok(self.terminate(TerminationReason::ExternalCancel));
        };

        let message = match produced {
            Ok(message) => message,
            Err(e) => {
                // No automatic retry: the failure is recorded and surfaced.
                warn!(
                    session = %self.id,
                    worker = %self.current_worker,
                    error = %e,
                    "Worker failed"
                );
                self.history.push(Message::system(format!(
                    "Worker '{}' failed: {}",
                    self.current_worker, e
                )));
                return Ok(self.terminate(TerminationReason::ExternalCancel));
            }
        };

        self.history.push(message.clone());
        self.turn_count += 1;

        if let Some(phrase) = self.config.terminal_phrase.as_deref() {
            if message.content.contains(phrase) {
                return Ok(self.terminate(TerminationReason::ExplicitPhrase));
            }
        }

        if let Some(max_turns) = self.config.max_turns {
            if self.turn_count >= max_turns {
                return Ok(self.terminate(TerminationReason::TurnLimit));
            }
        }

        match self.router.next_worker(&self.current_worker, &message) {
            RouteOutcome::Next(target) => {
                self.current_worker = target.clone();
                Ok(SessionStatus::Running {
                    next_worker: target,
                })
            }
            RouteOutcome::NoRoute => Ok(self.terminate(TerminationReason::NoRoute)),
        }
    }

    /// Drive turns until the session terminates.
    pub async fn run(&mut self) -> Result<SessionOutcome> {
        loop {
            match self.step().await? {
                SessionStatus::Running { .. } => continue,
                SessionStatus::Terminated(reason) => {
                    return Ok(SessionOutcome {
                        history: self.history.clone(),
                        reason,
                    });
                }
            }
        }
    }

    fn terminate(&mut self, reason: TerminationReason) -> SessionStatus {
        info!(
            session = %self.id,
            reason = ?reason,
            turns = self.turn_count,
            "Session terminated"
        );
        self.terminated = Some(reason);
        SessionStatus::Terminated(reason)
    }
}
