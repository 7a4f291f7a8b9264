//! Items representing conversation turns and routing hints
//!
//! This module defines the core data structures the router operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source identifier for messages produced by the caller's initial task.
pub const USER_SOURCE: &str = "user";

/// Source identifier for messages recorded by the session loop itself
/// (worker failures, cancellation records).
pub const SYSTEM_SOURCE: &str = "system";

/// Literal marker conversational workers use to hand off in free-form text,
/// e.g. `"Looks good. HANDOFF TO reviewer"`.
pub const HANDOFF_MARKER: &str = "HANDOFF TO ";

/// A routing hint a worker may attach to its reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Directive {
    /// Hand off explicitly to the named worker.
    Target(String),
    /// Match this keyword against the outgoing route conditions instead of
    /// the full message content.
    Signal(String),
}

impl Directive {
    /// Scans free-form reply text for the `HANDOFF TO <name>` marker and
    /// returns the explicit handoff directive it encodes, if any.
    ///
    /// ```rust
    /// use switchboard::Directive;
    ///
    /// let directive = Directive::extract_target("Draft attached. HANDOFF TO reviewer");
    /// assert_eq!(directive, Some(Directive::Target("reviewer".to_string())));
    /// assert_eq!(Directive::extract_target("no marker here"), None);
    /// ```
    pub fn extract_target(content: &str) -> Option<Directive> {
        let idx = content.find(HANDOFF_MARKER)?;
        let rest = &content[idx + HANDOFF_MARKER.len()..];
        let name: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if name.is_empty() {
            None
        } else {
            Some(Directive::Target(name))
        }
    }
}

/// One turn of conversation. Messages are immutable once appended; history
/// is an append-only ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// Name of the worker that produced this message, or `"user"` /
    /// `"system"`.
    pub source: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            content: content.into(),
            directive: None,
            created_at: Utc::now(),
        }
    }

    /// The caller's task message that seeds a session.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(USER_SOURCE, content)
    }

    /// A record written by the session loop itself.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(SYSTEM_SOURCE, content)
    }

    /// A reply produced by the named worker.
    pub fn from_worker(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(source, content)
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }
}
