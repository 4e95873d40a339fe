//! Transient user-facing notifications.

use std::fmt;

use serde::Serialize;

use crate::{SaveOutcome, SavedItemType, WellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A short message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn for_save(outcome: SaveOutcome, kind: SavedItemType) -> Self {
        match (outcome, kind) {
            (SaveOutcome::Saved, _) => Notice::success("Added to your saved items"),
            (SaveOutcome::AlreadySaved, SavedItemType::Topic) => {
                Notice::info("This topic is already saved")
            }
            (SaveOutcome::AlreadySaved, SavedItemType::CopingMechanism) => {
                Notice::info("This item is already saved")
            }
        }
    }

    /// A failed save, with the command that fixes a missing sign-in.
    pub fn for_save_error(error: &WellError, kind: SavedItemType) -> Self {
        match (error, kind) {
            (WellError::NotSignedIn, _) => {
                Notice::error("Please sign in to save items: wellkeep login <principal>")
            }
            (_, SavedItemType::Topic) => Notice::for_error(error, "Failed to save topic"),
            (_, SavedItemType::CopingMechanism) => Notice::for_error(error, "Failed to save item"),
        }
    }

    /// Maps a failed action to a notice. `failure` describes the action for
    /// remote failures, e.g. "Failed to save item".
    pub fn for_error(error: &WellError, failure: &str) -> Self {
        match error {
            WellError::NotSignedIn => Notice::error("Please sign in to continue"),
            WellError::ServiceUnavailable => {
                Notice::info("Still connecting to the wellness service, try again shortly")
            }
            WellError::Remote { .. } => Notice::error(failure),
            WellError::RatingOutOfRange { .. }
            | WellError::EmptyJournalEntry
            | WellError::EmptyProfileName
            | WellError::UnknownCategory { .. }
            | WellError::SubmissionInProgress
            | WellError::NotFound { .. } => Notice::error(error.to_string()),
            other => Notice::error(format!("{}: {}", failure, other)),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
