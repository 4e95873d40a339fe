//! Joins a saved-item ledger with the two catalogs it points into.
//!
//! Resolution is a pure function: references that no longer match a
//! catalog entry (a retired mechanism, an unknown topic) are dropped
//! without error, and the ledger order is kept.

use std::collections::HashMap;

use log::{debug, trace};
use serde::Serialize;

use crate::{CopingMechanism, LibraryTopic, SavedItem, SavedItemType};

/// Saved catalog entries, borrowed from the catalogs they were found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBookmarks<'a> {
    pub mechanisms: Vec<&'a CopingMechanism>,
    pub topics: Vec<&'a LibraryTopic>,
}

impl ResolvedBookmarks<'_> {
    pub fn is_empty(&self) -> bool {
        self.mechanisms.is_empty() && self.topics.is_empty()
    }

    /// Owned view for rendering.
    pub fn to_view(&self) -> SavedView {
        if self.is_empty() {
            return SavedView::Nothing;
        }
        SavedView::Items {
            mechanisms: self.mechanisms.iter().map(|m| (*m).clone()).collect(),
            topics: self.topics.iter().map(|t| **t).collect(),
        }
    }
}

/// What the saved page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SavedView {
    /// Nothing resolvable is saved
    Nothing,
    Items {
        mechanisms: Vec<CopingMechanism>,
        topics: Vec<LibraryTopic>,
    },
}

pub fn resolve_bookmarks<'a>(
    ledger: &[SavedItem],
    mechanisms: &'a [CopingMechanism],
    topics: &'a [LibraryTopic],
) -> ResolvedBookmarks<'a> {
    let mechanism_index: HashMap<u64, &CopingMechanism> =
        mechanisms.iter().map(|m| (m.id, m)).collect();
    let topic_index: HashMap<u64, &LibraryTopic> = topics.iter().map(|t| (t.id, t)).collect();

    let mut resolved = ResolvedBookmarks {
        mechanisms: Vec::new(),
        topics: Vec::new(),
    };
    let mut dangling = 0usize;

    for item in ledger {
        match item.item_type {
            SavedItemType::CopingMechanism => match mechanism_index.get(&item.reference_id) {
                Some(mechanism) => resolved.mechanisms.push(*mechanism),
                None => dangling += 1,
            },
            SavedItemType::Topic => match topic_index.get(&item.reference_id) {
                Some(topic) => resolved.topics.push(*topic),
                None => dangling += 1,
            },
        }
    }

    if dangling > 0 {
        debug!("Dropped {} saved items with no catalog entry", dangling);
    }
    trace!(
        "Resolved {} mechanisms and {} topics from {} saved items",
        resolved.mechanisms.len(),
        resolved.topics.len(),
        ledger.len()
    );

    resolved
}
