//! Wellness tracking library
//!
//! Coping strategies, library topics, daily check-ins and journal entries
//! kept per user behind a [`WellnessService`], with a bookmarking model for
//! saving strategies and topics to revisit later.

mod cache;
mod cli;
mod client;
mod config;
mod errors;
mod gateway;
mod helper;
mod ledger;
mod local_store;
mod models;
mod notice;
mod resolver;
mod submission;
mod topics;
mod types;

// Re-export key components
pub use cache::*;
pub use cli::*;
pub use client::*;
pub use config::*;
pub use errors::*;
pub use gateway::*;
pub use helper::*;
pub use ledger::*;
pub use local_store::*;
pub use models::*;
pub use notice::*;
pub use resolver::*;
pub use submission::*;
pub use topics::*;
pub use types::*;
