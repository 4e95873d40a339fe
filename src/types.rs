//! Shared types for the wellkeep application.
//!
//! This module contains the crate-wide Result alias, the explicit
//! presence type used for optional values, the caller identity and the
//! CLI subcommands.
use std::fmt;

use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

use crate::WellError;

/// A specialized Result type for wellkeep operations.
pub type Result<T> = std::result::Result<T, WellError>;

/// An optional value that crossed a boundary (service call, cache, form).
///
/// `Absent` means "known to have no value". Whether something has been
/// loaded at all is tracked separately by whoever holds the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Presence<T> {
    Present(T),
    Absent,
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Presence::Absent
    }
}

impl<T> Presence<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }

    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Presence::Present(value) => Presence::Present(value),
            Presence::Absent => Presence::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Presence::Present(value) => Some(value),
            Presence::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Presence::Present(value),
            None => Presence::Absent,
        }
    }
}

impl Presence<String> {
    /// Trims free text; blank text becomes `Absent`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Presence::Absent
        } else {
            Presence::Present(trimmed.to_string())
        }
    }
}

/// Opaque identity of the signed-in user, issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Parses principal text, refusing blank values.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WellError::InvalidPrincipal {
                message: "principal is empty".to_string(),
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(WellError::InvalidPrincipal {
                message: format!("principal '{}' contains whitespace", trimmed),
            });
        }
        Ok(Principal(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options for recording a daily check-in
#[derive(Args, Debug, Clone)]
pub struct CheckInArgs {
    /// Focus (1-10)
    #[clap(long, default_value_t = 5)]
    pub focus: i64,

    /// Mood (1-10)
    #[clap(long, default_value_t = 5)]
    pub mood: i64,

    /// Energy (1-10)
    #[clap(long, default_value_t = 5)]
    pub energy: i64,

    /// Sleep quality (1-10)
    #[clap(long, default_value_t = 5)]
    pub sleep: i64,

    /// Hot flash severity (1-10)
    #[clap(long, default_value_t = 5)]
    pub hot_flashes: i64,

    /// Anxiety (1-10)
    #[clap(long, default_value_t = 5)]
    pub anxiety: i64,

    /// Irritability (1-10)
    #[clap(long, default_value_t = 5)]
    pub irritability: i64,

    /// Any additional thoughts or observations
    #[clap(short, long)]
    pub notes: Option<String>,
}

/// Available subcommands for the wellkeep application
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a principal issued by your identity provider
    Login {
        /// The principal identifier
        principal: String,
    },

    /// Forget the signed-in principal
    Logout,

    /// Show your profile, or set your name
    Profile {
        /// New display name
        #[clap(short, long)]
        name: Option<String>,
    },

    /// Browse the coping toolkit
    Toolkit {
        /// Only show one category (e.g. focus, sleep, hot-flashes)
        #[clap(short = 'C', long)]
        category: Option<String>,

        /// Fuzzy search over titles and descriptions
        #[clap(short, long)]
        search: Option<String>,

        /// Limit the number of mechanisms shown (0 shows all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a coping mechanism by ID
    Mechanism {
        /// ID of the coping mechanism
        id: u64,

        /// Bookmark it after showing it
        #[clap(short, long)]
        save: bool,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List the library topics
    Library {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Read a library topic by ID
    Topic {
        /// ID of the topic
        id: u64,

        /// Bookmark it after showing it
        #[clap(short, long)]
        save: bool,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Bookmark a coping mechanism or a library topic
    Save {
        /// What to save
        #[clap(value_parser = ["mechanism", "topic"])]
        kind: String,

        /// ID of the mechanism or topic
        id: u64,
    },

    /// Show your saved coping strategies and topics
    Saved {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Record a daily check-in
    CheckIn(CheckInArgs),

    /// List previous check-ins, newest first
    CheckIns {
        /// Limit the number of check-ins shown
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show one check-in by ID
    ShowCheckIn {
        /// ID of the check-in (see `check-ins`)
        id: u64,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Write a journal entry
    Journal {
        /// Entry text
        entry: Option<String>,

        /// Number of the prompt to answer (see `prompts`)
        #[clap(short, long)]
        prompt: Option<usize>,

        /// Open the entry in an editor
        #[clap(short, long)]
        edit: bool,
    },

    /// List journal entries, newest first
    Entries {
        /// Limit the number of entries shown
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List the journal prompts
    Prompts,

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting (key=value)
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
