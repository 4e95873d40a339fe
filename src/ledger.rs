//! Saved-item ledger rules.
//!
//! The service keeps the ledger append-only and does not enforce
//! uniqueness, so the client checks for an existing bookmark before it
//! asks the service to append one.

use serde::Serialize;

use crate::{SavedItem, SavedItemType};

/// A bookmark target: one catalog entry named by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SavedRef {
    pub kind: SavedItemType,
    pub reference_id: u64,
}

impl SavedRef {
    pub fn mechanism(id: u64) -> Self {
        Self {
            kind: SavedItemType::CopingMechanism,
            reference_id: id,
        }
    }

    pub fn topic(id: u64) -> Self {
        Self {
            kind: SavedItemType::Topic,
            reference_id: id,
        }
    }

    pub fn matches(&self, item: &SavedItem) -> bool {
        item.item_type == self.kind && item.reference_id == self.reference_id
    }
}

impl From<&SavedItem> for SavedRef {
    fn from(item: &SavedItem) -> Self {
        Self {
            kind: item.item_type,
            reference_id: item.reference_id,
        }
    }
}

/// What the client decided to do with a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendPlan {
    /// Not in the ledger yet; the service must be called
    Append,
    /// Already bookmarked under the given ledger id; no call is made
    Skip { existing_id: u64 },
}

/// Result of a save request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// Looks for an existing bookmark of `target` in the ledger.
pub fn find_saved<'a>(ledger: &'a [SavedItem], target: SavedRef) -> Option<&'a SavedItem> {
    ledger.iter().find(|item| target.matches(item))
}

pub fn is_saved(ledger: &[SavedItem], target: SavedRef) -> bool {
    find_saved(ledger, target).is_some()
}

/// Decides whether saving `target` needs a service call.
pub fn plan_append(ledger: &[SavedItem], target: SavedRef) -> AppendPlan {
    match find_saved(ledger, target) {
        Some(existing) => AppendPlan::Skip {
            existing_id: existing.id,
        },
        None => AppendPlan::Append,
    }
}
