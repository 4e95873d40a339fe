//! Error types for the wellkeep application.
//!
//! This module defines the error taxonomy shared by the client, the local
//! service and the CLI. Every variant is non-fatal to the application.

use std::io;

use thiserror::Error;

use crate::RatingField;

/// The main error type for the wellkeep application.
#[derive(Error, Debug)]
pub enum WellError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No service handle is available yet. Transient, retried on the next call.
    #[error("Wellness service is not available")]
    ServiceUnavailable,

    /// A per-user operation was requested without a signed-in identity.
    #[error("Please sign in to continue")]
    NotSignedIn,

    /// The principal text could not be used as an identity.
    #[error("Invalid principal: {message}")]
    InvalidPrincipal { message: String },

    /// The remote service rejected or failed a call.
    #[error("Remote call {operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// A check-in rating outside of 1..=10.
    #[error("{field} must be between 1 and 10, got {value}")]
    RatingOutOfRange { field: RatingField, value: i64 },

    #[error("Please write something in your journal entry")]
    EmptyJournalEntry,

    #[error("Profile name cannot be empty")]
    EmptyProfileName,

    #[error("Unknown coping category: {name}")]
    UnknownCategory { name: String },

    /// A form was submitted again while its previous submission is in flight.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// A catalog entry (mechanism or topic) was not found.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: u64 },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// for mutex lock acquisition issues
    #[error("{message}")]
    LockAcquisitionFailed { message: String },

    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}

impl WellError {
    /// Builds a [`WellError::Remote`] for the named service operation.
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        WellError::Remote {
            operation,
            message: message.into(),
        }
    }
}
