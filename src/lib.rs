//! # Switchboard
//!
//! A small library for routing one conversation among a closed set of named
//! workers. Workers take turns producing messages; the router decides who
//! acts next from textual conditions on the last message, explicit handoff
//! directives, and default edges, until the session reaches a terminal
//! state.
//!
//! ## Core Concepts
//!
//! - **Worker**: a named capability that turns history into the next
//!   message — a deterministic rule, a completion-backed assistant, or a
//!   human at a prompt.
//! - **Registry**: the closed set of workers plus the routing edges between
//!   them; read-only once a session exists, shareable across sessions.
//! - **Router**: picks the entry worker and resolves each handoff; pure and
//!   deterministic for a fixed registry.
//! - **Session**: drives turns one at a time, owns the history, and ends
//!   with an inspectable termination reason rather than a stack trace.
//!
//! ## Getting Started
//!
//! ```rust
//! use std::sync::Arc;
//! use switchboard::{
//!     FnWorker, Message, Router, Runner, SessionConfig, TerminationReason, WorkerRegistry,
//! };
//!
//! # async fn example() -> switchboard::Result<()> {
//! let registry = Arc::new(WorkerRegistry::new());
//! registry.register(Arc::new(FnWorker::simple("triage", |_: &[Message]| {
//!     "Routing you to sales".to_string()
//! })))?;
//! registry.register(Arc::new(FnWorker::simple("sales", |_: &[Message]| {
//!     "Here is our catalog".to_string()
//! })))?;
//! registry.add_route("triage", "sales", None)?;
//!
//! let router = Router::new(registry).with_entry_point("triage")?;
//! let outcome = Runner::run(router, "I want to buy", SessionConfig::default()).await?;
//!
//! // Sales has no outgoing route, so the conversation ends there.
//! assert_eq!(outcome.reason, TerminationReason::NoRoute);
//! assert_eq!(outcome.history.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Conditional edges use case-sensitive substring containment against the
//! worker's output, first registered match wins, with an optional default
//! edge as fallback:
//!
//! ```rust
//! use std::sync::Arc;
//! use switchboard::{FnWorker, Message, WorkerRegistry};
//!
//! # fn example() -> switchboard::Result<()> {
//! # let registry = Arc::new(WorkerRegistry::new());
//! # for name in ["reviewer", "reviser", "editor", "publisher"] {
//! #     registry.register(Arc::new(FnWorker::simple(name, |_: &[Message]| String::new())))?;
//! # }
//! registry.add_route("reviewer", "reviser", Some("major revision needed"))?;
//! registry.add_route("reviewer", "editor", Some("minor edits suggested"))?;
//! registry.add_route("reviewer", "publisher", Some("approved as is"))?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod human;
pub mod items;
pub mod provider;
pub mod registry;
pub mod result;
pub mod router;
pub mod runner;
pub mod session;
pub mod worker;

pub use error::{Result, SwitchboardError};
pub use human::{HumanInput, HumanWorker, StdinInput};
pub use items::{Directive, Message, SYSTEM_SOURCE, USER_SOURCE};
pub use provider::{CompletionProvider, CompletionWorker, ScriptedProvider};
pub use registry::{RouteRule, WorkerRegistry};
pub use result::SessionOutcome;
pub use router::{RouteOutcome, Router};
pub use runner::{Runner, StreamEvent, StreamingSession};
pub use session::{Session, SessionConfig, SessionStatus, TerminationReason};
pub use worker::{FnWorker, Worker, WorkerReply};

// Re-export the cancellation token callers hand to `SessionConfig`.
pub use tokio_util::sync::CancellationToken;
