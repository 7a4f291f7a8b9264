//! Error types for the conversation router

use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Main error type for the conversation router
#[derive(Debug, Error)]
pub enum SwitchboardError {
    /// A worker with this name is already registered
    #[error("Duplicate worker: {name}")]
    DuplicateWorker { name: String },

    /// A route or entry point references a worker that was never registered
    #[error("Unknown worker: {name}")]
    UnknownWorker { name: String },

    /// A second unconditional route was added for the same source worker
    #[error("Conflicting default route for worker: {worker}")]
    ConflictingDefaultRoute { worker: String },

    /// The router was asked for its entry point before one was set
    #[error("No entry point configured")]
    NoEntryPoint,

    /// The registry is read-only once a session has been constructed from it
    #[error("Registry is sealed: workers and routes are fixed once a session exists")]
    RegistrySealed,

    /// `step` or `run` was called on a session that already terminated
    #[error("Session already terminated")]
    SessionTerminated,

    /// A worker handler (or the provider behind it) failed
    #[error("Worker error: {message}")]
    Worker { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
