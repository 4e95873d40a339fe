//! Client-side session over the wellness service.
//!
//! A [`WellnessClient`] combines an optional service handle, the optional
//! signed-in identity and a shared [`QueryCache`]. Reads go through the
//! cache; writes go to the service and invalidate the tags they affect.
//! Per-user operations are refused locally when nobody is signed in.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    find_topic, library_topics, plan_append, resolve_bookmarks, AppendPlan, CopingCategory,
    CopingMechanism, DailyCheckIn, EntityTag, JournalEntry, LibraryTopic, Presence, Principal,
    QueryCache, QueryKey, RatingsDraft, Result, SaveOutcome, SavedItem, SavedItemType, SavedRef,
    SavedView, UserProfile, WellError, WellnessService, PLACEHOLDER_ID,
};

#[derive(Clone)]
pub struct WellnessClient {
    service: Option<Arc<dyn WellnessService>>,
    identity: Option<Principal>,
    cache: Arc<QueryCache>,
}

impl WellnessClient {
    /// A client with no service connection and nobody signed in.
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            service: None,
            identity: None,
            cache,
        }
    }

    pub fn with_service(mut self, service: Arc<dyn WellnessService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_identity(mut self, identity: Option<Principal>) -> Self {
        self.identity = identity;
        self
    }

    pub fn sign_in(&mut self, principal: Principal) {
        info!("Signed in as {}", principal);
        self.identity = Some(principal);
    }

    /// Forgets the identity and every cached query.
    pub fn sign_out(&mut self) -> Result<()> {
        if let Some(principal) = self.identity.take() {
            info!("Signed out {}", principal);
        }
        self.cache.clear()
    }

    pub fn identity(&self) -> Option<&Principal> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    fn service(&self) -> Result<&dyn WellnessService> {
        self.service.as_deref().ok_or_else(|| {
            debug!("No wellness service available yet");
            WellError::ServiceUnavailable
        })
    }

    fn require_identity(&self) -> Result<&Principal> {
        self.identity.as_ref().ok_or_else(|| {
            debug!("Refusing per-user call without an identity");
            WellError::NotSignedIn
        })
    }

    pub async fn caller_profile(&self) -> Result<Presence<UserProfile>> {
        let user = self.require_identity()?;
        let service = self.service()?;
        self.cache
            .get_or_fetch(
                QueryKey::scoped(EntityTag::CurrentUserProfile, user.as_str()),
                || service.get_caller_user_profile(user),
            )
            .await
    }

    /// The cached profile without fetching: `None` means not loaded yet.
    pub fn cached_profile(&self) -> Result<Option<Presence<UserProfile>>> {
        let user = self.require_identity()?;
        let key = QueryKey::scoped(EntityTag::CurrentUserProfile, user.as_str());
        Ok(self
            .cache
            .lookup::<Presence<UserProfile>>(&key)?
            .map(|(profile, _)| profile))
    }

    pub async fn save_profile(&self, name: &str) -> Result<()> {
        let profile = UserProfile::new(name)?;
        let user = self.require_identity()?;
        let service = self.service()?;

        service.save_caller_user_profile(user, profile).await?;
        self.cache.invalidate(EntityTag::CurrentUserProfile)?;
        info!("Profile saved for {}", user);
        Ok(())
    }

    /// Coping mechanisms, optionally filtered by category on the service side.
    pub async fn coping_mechanisms(
        &self,
        category: Option<CopingCategory>,
    ) -> Result<Vec<CopingMechanism>> {
        let service = self.service()?;
        match category {
            Some(category) => {
                self.cache
                    .get_or_fetch(
                        QueryKey::scoped(EntityTag::CopingMechanisms, category.as_str()),
                        || service.get_coping_mechanisms_by_category(category),
                    )
                    .await
            }
            None => {
                self.cache
                    .get_or_fetch(QueryKey::new(EntityTag::CopingMechanisms), || {
                        service.get_coping_mechanisms()
                    })
                    .await
            }
        }
    }

    pub async fn coping_mechanism(&self, id: u64) -> Result<CopingMechanism> {
        self.coping_mechanisms(None)
            .await?
            .into_iter()
            .find(|mechanism| mechanism.id == id)
            .ok_or(WellError::NotFound {
                kind: "Coping mechanism",
                id,
            })
    }

    pub fn topic(&self, id: u64) -> Result<&'static LibraryTopic> {
        find_topic(id).ok_or(WellError::NotFound { kind: "Topic", id })
    }

    pub async fn prompts(&self) -> Result<Vec<String>> {
        let service = self.service()?;
        self.cache
            .get_or_fetch(QueryKey::new(EntityTag::Prompts), || service.get_prompts())
            .await
    }

    pub async fn saved_items(&self) -> Result<Vec<SavedItem>> {
        let user = self.require_identity()?;
        let service = self.service()?;
        self.cache
            .get_or_fetch(QueryKey::scoped(EntityTag::SavedItems, user.as_str()), || {
                service.get_saved_items(user)
            })
            .await
    }

    pub async fn is_saved(&self, target: SavedRef) -> Result<bool> {
        let ledger = self.saved_items().await?;
        Ok(crate::is_saved(&ledger, target))
    }

    /// Bookmarks a catalog entry unless it is already in the ledger.
    ///
    /// On failure the cached ledger is left as it was.
    pub async fn save_item(&self, target: SavedRef) -> Result<SaveOutcome> {
        let user = self.require_identity()?;
        let service = self.service()?;

        let ledger = self.saved_items().await?;
        if let AppendPlan::Skip { existing_id } = plan_append(&ledger, target) {
            info!(
                "{} {} is already saved as item {}",
                target.kind, target.reference_id, existing_id
            );
            return Ok(SaveOutcome::AlreadySaved);
        }

        let result = match target.kind {
            SavedItemType::CopingMechanism => {
                service
                    .add_coping_mechanism_to_saved(user, PLACEHOLDER_ID, target.reference_id)
                    .await
            }
            SavedItemType::Topic => {
                service
                    .add_category_to_saved(user, PLACEHOLDER_ID, target.reference_id)
                    .await
            }
        };

        if let Err(e) = result {
            warn!("Failed to save {} {}: {}", target.kind, target.reference_id, e);
            return Err(e);
        }

        self.cache.invalidate(EntityTag::SavedItems)?;
        info!("Saved {} {}", target.kind, target.reference_id);
        Ok(SaveOutcome::Saved)
    }

    pub async fn save_coping_mechanism(&self, mechanism_id: u64) -> Result<SaveOutcome> {
        self.save_item(SavedRef::mechanism(mechanism_id)).await
    }

    pub async fn save_topic(&self, topic_id: u64) -> Result<SaveOutcome> {
        self.save_item(SavedRef::topic(topic_id)).await
    }

    /// Resolves the ledger against both catalogs for display.
    pub async fn saved_view(&self) -> Result<SavedView> {
        let ledger = self.saved_items().await?;

        let needs_mechanisms = ledger
            .iter()
            .any(|item| item.item_type == SavedItemType::CopingMechanism);
        let mechanisms = if needs_mechanisms {
            self.coping_mechanisms(None).await?
        } else {
            Vec::new()
        };

        Ok(resolve_bookmarks(&ledger, &mechanisms, library_topics()).to_view())
    }

    /// Check-ins, newest first.
    pub async fn check_ins(&self) -> Result<Vec<DailyCheckIn>> {
        let user = self.require_identity()?;
        let service = self.service()?;
        let mut check_ins = self
            .cache
            .get_or_fetch(
                QueryKey::scoped(EntityTag::DailyCheckIns, user.as_str()),
                || service.get_daily_check_ins(user),
            )
            .await?;
        check_ins.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(check_ins)
    }

    /// A single check-in of the signed-in user.
    pub async fn check_in(&self, id: u64) -> Result<DailyCheckIn> {
        self.check_ins()
            .await?
            .into_iter()
            .find(|check_in| check_in.id == id)
            .ok_or(WellError::NotFound {
                kind: "Check-in",
                id,
            })
    }

    /// Validates and submits a check-in stamped with the client clock.
    pub async fn submit_check_in(&self, draft: &RatingsDraft, notes: &str) -> Result<()> {
        let ratings = draft.validate()?;
        let user = self.require_identity()?;
        let service = self.service()?;

        let check_in = DailyCheckIn::new(ratings, Presence::from_text(notes));
        service.add_daily_check_in(user, check_in).await?;
        self.cache.invalidate(EntityTag::DailyCheckIns)?;
        info!("Check-in saved for {}", user);
        Ok(())
    }

    /// Journal entries, newest first.
    pub async fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let user = self.require_identity()?;
        let service = self.service()?;
        let mut entries = self
            .cache
            .get_or_fetch(
                QueryKey::scoped(EntityTag::JournalEntries, user.as_str()),
                || service.get_journal_entries(user),
            )
            .await?;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    pub async fn submit_journal_entry(&self, entry: &str, prompt: Presence<String>) -> Result<()> {
        let entry = JournalEntry::new(entry, prompt)?;
        let user = self.require_identity()?;
        let service = self.service()?;

        service.add_journal_entry(user, entry).await?;
        self.cache.invalidate(EntityTag::JournalEntries)?;
        info!("Journal entry saved for {}", user);
        Ok(())
    }
}
