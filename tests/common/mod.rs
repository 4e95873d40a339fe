#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use wellkeep::{
    CopingCategory, CopingMechanism, DailyCheckIn, JournalEntry, LocalStore, Presence, Principal,
    QueryCache, Result, SavedItem, UserProfile, WellError, WellnessClient, WellnessService,
};

/// A local store that counts calls, can be told to fail, and can hold
/// check-in submissions until released.
pub struct ScriptedService {
    inner: LocalStore,
    failing: AtomicBool,
    gated: AtomicBool,
    gate: Semaphore,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: LocalStore::in_memory(),
            failing: AtomicBool::new(false),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
            calls: Mutex::new(HashMap::new()),
        })
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Check-in submissions wait for `release` from now on.
    pub fn hold_check_ins(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Lets one held check-in through.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
    }

    fn write(&self, operation: &'static str) -> Result<()> {
        self.record(operation);
        if self.failing.load(Ordering::SeqCst) {
            return Err(WellError::remote(operation, "replica unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl WellnessService for ScriptedService {
    async fn get_caller_user_profile(&self, caller: &Principal) -> Result<Presence<UserProfile>> {
        self.record("getCallerUserProfile");
        self.inner.get_caller_user_profile(caller).await
    }

    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<()> {
        self.write("saveCallerUserProfile")?;
        self.inner.save_caller_user_profile(caller, profile).await
    }

    async fn get_coping_mechanisms(&self) -> Result<Vec<CopingMechanism>> {
        self.record("getCopingMechanisms");
        self.inner.get_coping_mechanisms().await
    }

    async fn get_coping_mechanisms_by_category(
        &self,
        category: CopingCategory,
    ) -> Result<Vec<CopingMechanism>> {
        self.record("getCopingMechanismsByCategory");
        self.inner.get_coping_mechanisms_by_category(category).await
    }

    async fn get_prompts(&self) -> Result<Vec<String>> {
        self.record("getPrompts");
        self.inner.get_prompts().await
    }

    async fn get_daily_check_ins(&self, user: &Principal) -> Result<Vec<DailyCheckIn>> {
        self.record("getDailyCheckIns");
        self.inner.get_daily_check_ins(user).await
    }

    async fn add_daily_check_in(&self, caller: &Principal, check_in: DailyCheckIn) -> Result<()> {
        if self.gated.load(Ordering::SeqCst) {
            self.gate.acquire().await.unwrap().forget();
        }
        self.write("addDailyCheckIn")?;
        self.inner.add_daily_check_in(caller, check_in).await
    }

    async fn get_journal_entries(&self, user: &Principal) -> Result<Vec<JournalEntry>> {
        self.record("getJournalEntries");
        self.inner.get_journal_entries(user).await
    }

    async fn add_journal_entry(&self, caller: &Principal, entry: JournalEntry) -> Result<()> {
        self.write("addJournalEntry")?;
        self.inner.add_journal_entry(caller, entry).await
    }

    async fn get_saved_items(&self, user: &Principal) -> Result<Vec<SavedItem>> {
        self.record("getSavedItems");
        self.inner.get_saved_items(user).await
    }

    async fn add_coping_mechanism_to_saved(
        &self,
        user: &Principal,
        item_id: u64,
        mechanism_id: u64,
    ) -> Result<()> {
        self.write("addCopingMechanismToSaved")?;
        self.inner
            .add_coping_mechanism_to_saved(user, item_id, mechanism_id)
            .await
    }

    async fn add_category_to_saved(
        &self,
        user: &Principal,
        item_id: u64,
        category_id: u64,
    ) -> Result<()> {
        self.write("addCategoryToSaved")?;
        self.inner
            .add_category_to_saved(user, item_id, category_id)
            .await
    }
}

pub fn alice() -> Principal {
    Principal::parse("alice-principal").unwrap()
}

/// A signed-in client talking to `service` through a fresh cache.
pub fn signed_in(service: &Arc<ScriptedService>) -> WellnessClient {
    WellnessClient::new(Arc::new(QueryCache::default()))
        .with_service(service.clone())
        .with_identity(Some(alice()))
}
