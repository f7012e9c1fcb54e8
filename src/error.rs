//! Error types for the backlog manager.
//!
//! Every operation-level failure is one of the enumerated kinds below;
//! all of them are recoverable by the caller. The transport renders them
//! into the legacy `Error: ...` text via [`crate::format`].

use thiserror::Error;

/// Primary error type for backlog operations.
#[derive(Error, Debug)]
pub enum BacklogError {
    /// Attempted to create an issue whose name is already taken.
    #[error("Issue '{name}' already exists.")]
    IssueExists { name: String },

    /// Issue with the specified name was not found.
    #[error("Issue '{name}' not found.")]
    IssueNotFound { name: String },

    /// Task with the specified ID was not found in the active issue.
    #[error("Task with ID '{id}' not found in issue '{issue}'.")]
    TaskNotFound { id: String, issue: String },

    /// Status value is not one of the enumerated statuses.
    #[error("Invalid status '{status}'. Valid values are: New, InWork, Done")]
    InvalidStatus { status: String },

    /// A task-scoped operation was called with no issue selected.
    #[error("No active issue. Please select an issue using 'select_issue' first.")]
    NoActiveIssue,

    /// File system I/O error (fallible persistence internals only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using `BacklogError`.
pub type Result<T> = std::result::Result<T, BacklogError>;
