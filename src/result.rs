//! Result types for completed sessions

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::items::{Message, SYSTEM_SOURCE, USER_SOURCE};
use crate::session::TerminationReason;

/// The result of running a session to completion: the full history and why
/// the loop stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub history: Vec<Message>,
    pub reason: TerminationReason,
}

impl SessionOutcome {
    /// The last message of the conversation, if any.
    pub fn final_message(&self) -> Option<&Message> {
        self.history.last()
    }

    /// Number of messages produced by workers (excludes the seeded task and
    /// system records).
    pub fn worker_turns(&self) -> usize {
        self.history
            .iter()
            .filter(|m| m.source != USER_SOURCE && m.source != SYSTEM_SOURCE)
            .count()
    }

    /// The history as a JSON document of `{source, content, directive}`
    /// records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.history)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            history: vec![
                Message::user("fix the intro"),
                Message::from_worker("writer", "rewrote it"),
                Message::from_worker("reviewer", "approved as is"),
            ],
            reason: TerminationReason::NoRoute,
        }
    }

    #[test]
    fn test_outcome_helpers() {
        let outcome = outcome();
        assert_eq!(outcome.final_message().unwrap().source, "reviewer");
        assert_eq!(outcome.worker_turns(), 2);
    }

    #[test]
    fn test_history_serializes_directly() {
        let json = outcome().to_json().unwrap();
        assert!(json.contains("\"source\": \"writer\""));
        assert!(json.contains("\"content\": \"approved as is\""));

        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&TerminationReason::NoRoute).unwrap();
        assert_eq!(json, "\"no_route\"");

        let parsed: TerminationReason = serde_json::from_str("\"turn_limit\"").unwrap();
        assert_eq!(parsed, TerminationReason::TurnLimit);
    }
}
