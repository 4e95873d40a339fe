//! Query cache for remote state.
//!
//! Each query result is stored under a [`QueryKey`] together with its
//! freshness. Mutations invalidate whole entity tags; the next read of an
//! invalidated key goes back to the service. Invalidation is idempotent.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::{debug, trace, warn};

use crate::{Result, WellError};

/// Kind of remote state a query reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    CurrentUserProfile,
    CopingMechanisms,
    Prompts,
    DailyCheckIns,
    JournalEntries,
    SavedItems,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityTag::CurrentUserProfile => "currentUserProfile",
            EntityTag::CopingMechanisms => "copingMechanisms",
            EntityTag::Prompts => "prompts",
            EntityTag::DailyCheckIns => "dailyCheckIns",
            EntityTag::JournalEntries => "journalEntries",
            EntityTag::SavedItems => "savedItems",
        };
        f.write_str(name)
    }
}

/// Identifies one cached query: the entity tag plus an optional scope
/// (a principal for per-user data, a category for filtered catalogs).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub tag: EntityTag,
    pub scope: Option<String>,
}

impl QueryKey {
    pub fn new(tag: EntityTag) -> Self {
        Self { tag, scope: None }
    }

    pub fn scoped(tag: EntityTag, scope: impl Into<String>) -> Self {
        Self {
            tag,
            scope: Some(scope.into()),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}/{}", self.tag, scope),
            None => write!(f, "{}", self.tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: DateTime<Utc>,
    invalidated: bool,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    invalidations: HashMap<EntityTag, u64>,
}

/// Cache of query results, shared by reference with whoever needs it.
pub struct QueryCache {
    state: Mutex<CacheState>,
    /// Entries older than this are stale even without an invalidation
    stale_after: Option<Duration>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl QueryCache {
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            stale_after,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CacheState>> {
        self.state
            .lock()
            .map_err(|_| WellError::LockAcquisitionFailed {
                message: "Failed to acquire lock on query cache".to_string(),
            })
    }

    /// Returns the cached value and its freshness, or `None` if the query
    /// has never been loaded.
    pub fn lookup<T>(&self, key: &QueryKey) -> Result<Option<(T, Freshness)>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = self.lock()?;
        let Some(entry) = state.entries.get(key) else {
            trace!("Cache miss for {}", key);
            return Ok(None);
        };

        let Some(value) = entry.value.downcast_ref::<T>() else {
            warn!("Cached value for {} has an unexpected type, ignoring it", key);
            return Ok(None);
        };

        let expired = self.stale_after.is_some_and(|ttl| {
            Utc::now()
                .signed_duration_since(entry.fetched_at)
                .to_std()
                .is_ok_and(|age| age >= ttl)
        });
        let freshness = if entry.invalidated || expired {
            Freshness::Stale
        } else {
            Freshness::Fresh
        };

        Ok(Some((value.clone(), freshness)))
    }

    /// Stores a freshly fetched value.
    pub fn store<T>(&self, key: QueryKey, value: T) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        let mut state = self.lock()?;
        trace!("Caching {}", key);
        state.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                fetched_at: Utc::now(),
                invalidated: false,
            },
        );
        Ok(())
    }

    /// Marks every entry with `tag` as stale and returns how many were marked.
    pub fn invalidate(&self, tag: EntityTag) -> Result<usize> {
        let mut state = self.lock()?;
        *state.invalidations.entry(tag).or_insert(0) += 1;

        let mut marked = 0;
        for (key, entry) in state.entries.iter_mut() {
            if key.tag == tag {
                entry.invalidated = true;
                marked += 1;
            }
        }

        debug!("Invalidated {} cached queries for {}", marked, tag);
        Ok(marked)
    }

    /// Number of times `tag` has been invalidated.
    pub fn invalidation_count(&self, tag: EntityTag) -> u64 {
        self.lock()
            .map(|state| state.invalidations.get(&tag).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Serves a fresh cached value or runs `fetch` and caches its result.
    ///
    /// A failed fetch leaves any previous entry untouched.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some((value, Freshness::Fresh)) = self.lookup::<T>(&key)? {
            trace!("Serving {} from cache", key);
            return Ok(value);
        }

        debug!("Fetching {}", key);
        let value = fetch().await?;
        self.store(key, value.clone())?;
        Ok(value)
    }

    /// Drops every cached entry (used on sign-out).
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.entries.clear();
        debug!("Query cache cleared");
        Ok(())
    }
}
