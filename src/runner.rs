//! Runner: stateless facades for driving sessions
//!
//! `Runner` constructs a session and drives it for you. `run` awaits the
//! full outcome, `run_sync` blocks on its own runtime for callers without
//! one, and `run_stream` surfaces each completed turn as an event while the
//! session progresses.

use std::pin::Pin;

use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::error::Result;
use crate::items::Message;
use crate::result::SessionOutcome;
use crate::router::Router;
use crate::session::{Session, SessionConfig, SessionStatus};

/// Events emitted by a streaming run.
#[derive(Debug)]
pub enum StreamEvent {
    /// A worker completed a turn. `next_worker` is `None` on the final turn.
    TurnCompleted {
        message: Message,
        next_worker: Option<String>,
    },
    /// The session reached a terminal state.
    RunCompleted { outcome: SessionOutcome },
    /// The drive loop itself failed.
    Error { error: String },
}

/// A handle on a streaming run: the session id plus the event stream.
pub struct StreamingSession {
    session_id: String,
    stream: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl StreamingSession {
    fn new(
        session_id: String,
        stream: impl Stream<Item = StreamEvent> + Send + 'static,
    ) -> Self {
        Self {
            session_id,
            stream: Box::pin(stream),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Next event, or `None` once the run is over.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        self.stream.next().await
    }
}

/// Stateless entry points for executing a routed conversation.
pub struct Runner;

impl Runner {
    /// Run a session to completion and return its outcome.
    pub async fn run(
        router: Router,
        task: impl Into<String>,
        config: SessionConfig,
    ) -> Result<SessionOutcome> {
        let mut session = Session::new(router, config, task)?;
        session.run().await
    }

    /// Blocking variant of [`run`](Self::run) for callers without an async
    /// runtime. Creates its own.
    pub fn run_sync(
        router: Router,
        task: impl Into<String>,
        config: SessionConfig,
    ) -> Result<SessionOutcome> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(Self::run(router, task, config))
    }

    /// Run a session in a background task, emitting one event per turn.
    pub async fn run_stream(
        router: Router,
        task: impl Into<String>,
        config: SessionConfig,
    ) -> Result<StreamingSession> {
        let mut session = Session::new(router, config, task)?;
        let session_id = session.id().to_string();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        info!(session = %session_id, "Starting streaming run");
        tokio::spawn(async move {
            loop {
                match session.step().await {
                    Ok(SessionStatus::Running { next_worker }) => {
                        if let Some(message) = session.history().last().cloned() {
                            let _ = tx.send(StreamEvent::TurnCompleted {
                                message,
                                next_worker: Some(next_worker),
                            });
                        }
                    }
                    Ok(SessionStatus::Terminated(reason)) => {
                        if let Some(message) = session.history().last().cloned() {
                            let _ = tx.send(StreamEvent::TurnCompleted {
                                message,
                                next_worker: None,
                            });
                        }
                        let _ = tx.send(StreamEvent::RunCompleted {
                            outcome: SessionOutcome {
                                history: session.history().to_vec(),
                                reason,
                            },
                        });
                        break;
                    }
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error {
                            error: e.to_string(),
                        });
                        break;
                    }
                }
            }
        });

        Ok(StreamingSession::new(
            session_id,
            UnboundedReceiverStream::new(rx),
        ))
    }
}
