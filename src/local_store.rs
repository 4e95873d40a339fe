//! File-backed implementation of the wellness service.
//!
//! The whole store is one JSON document. Every mutation is applied to a
//! copy of the state, written atomically, and only then committed in
//! memory, so a failed write leaves both the file and the store unchanged.
//! Like the remote service, the store assigns record ids itself and does
//! not de-duplicate saved items.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    read_json_file, write_json_atomic, CopingCategory, CopingMechanism, DailyCheckIn,
    JournalEntry, Presence, Principal, Result, SavedItem, SavedItemType, UserProfile, WellError,
    WellnessService, PLACEHOLDER_ID,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecords {
    #[serde(default)]
    profile: Presence<UserProfile>,
    #[serde(default)]
    check_ins: Vec<DailyCheckIn>,
    #[serde(default)]
    journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    saved_items: Vec<SavedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreState {
    /// Last id handed out, shared by every record kind
    last_id: u64,
    coping_mechanisms: Vec<CopingMechanism>,
    prompts: Vec<String>,
    users: BTreeMap<String, UserRecords>,
}

impl StoreState {
    fn seeded() -> Self {
        Self {
            last_id: 0,
            coping_mechanisms: default_coping_mechanisms(),
            prompts: default_prompts(),
            users: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, principal: &Principal) -> Option<&UserRecords> {
        self.users.get(principal.as_str())
    }

    fn user_mut(&mut self, principal: &Principal) -> &mut UserRecords {
        self.users.entry(principal.to_string()).or_default()
    }
}

/// Wellness service backed by a local JSON file (or memory only).
pub struct LocalStore {
    path: Option<PathBuf>,
    state: Mutex<StoreState>,
}

impl LocalStore {
    /// Opens the store at `path`, seeding a new one if the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let state = if path.exists() {
            let state: StoreState = read_json_file(path)?;
            info!(
                "Opened store {} with {} users",
                path.display(),
                state.users.len()
            );
            state
        } else {
            info!("Creating new store at {}", path.display());
            let state = StoreState::seeded();
            write_json_atomic(path, &state)?;
            state
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            state: Mutex::new(state),
        })
    }

    /// A seeded store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(StoreState::seeded()),
        }
    }

    fn read<R>(&self, operation: &'static str, query: impl FnOnce(&StoreState) -> R) -> Result<R> {
        let state = self
            .state
            .lock()
            .map_err(|_| WellError::remote(operation, "store lock poisoned"))?;
        Ok(query(&state))
    }

    fn mutate<R>(
        &self,
        operation: &'static str,
        change: impl FnOnce(&mut StoreState) -> R,
    ) -> Result<R> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| WellError::remote(operation, "store lock poisoned"))?;

        let mut next = state.clone();
        let result = change(&mut next);

        if let Some(path) = &self.path {
            write_json_atomic(path, &next).map_err(|e| {
                warn!("Store write for {} failed: {}", operation, e);
                WellError::remote(operation, e.to_string())
            })?;
        }

        *state = next;
        debug!("{} committed", operation);
        Ok(result)
    }

    fn append_saved(
        &self,
        operation: &'static str,
        user: &Principal,
        item_id: u64,
        item_type: SavedItemType,
        reference_id: u64,
    ) -> Result<()> {
        if item_id != PLACEHOLDER_ID {
            debug!("{} ignoring client item id {}", operation, item_id);
        }
        self.mutate(operation, |state| {
            let id = state.allocate_id();
            state.user_mut(user).saved_items.push(SavedItem {
                id,
                item_type,
                reference_id,
            });
        })
    }
}

#[async_trait]
impl WellnessService for LocalStore {
    async fn get_caller_user_profile(&self, caller: &Principal) -> Result<Presence<UserProfile>> {
        self.read("getCallerUserProfile", |state| {
            state
                .user(caller)
                .map(|records| records.profile.clone())
                .unwrap_or_default()
        })
    }

    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<()> {
        self.mutate("saveCallerUserProfile", |state| {
            state.user_mut(caller).profile = Presence::Present(profile);
        })
    }

    async fn get_coping_mechanisms(&self) -> Result<Vec<CopingMechanism>> {
        self.read("getCopingMechanisms", |state| state.coping_mechanisms.clone())
    }

    async fn get_coping_mechanisms_by_category(
        &self,
        category: CopingCategory,
    ) -> Result<Vec<CopingMechanism>> {
        self.read("getCopingMechanismsByCategory", |state| {
            state
                .coping_mechanisms
                .iter()
                .filter(|mechanism| mechanism.category == category)
                .cloned()
                .collect()
        })
    }

    async fn get_prompts(&self) -> Result<Vec<String>> {
        self.read("getPrompts", |state| state.prompts.clone())
    }

    async fn get_daily_check_ins(&self, user: &Principal) -> Result<Vec<DailyCheckIn>> {
        self.read("getDailyCheckIns", |state| {
            state
                .user(user)
                .map(|records| records.check_ins.clone())
                .unwrap_or_default()
        })
    }

    async fn add_daily_check_in(&self, caller: &Principal, check_in: DailyCheckIn) -> Result<()> {
        self.mutate("addDailyCheckIn", |state| {
            let id = state.allocate_id();
            state
                .user_mut(caller)
                .check_ins
                .push(DailyCheckIn { id, ..check_in });
        })
    }

    async fn get_journal_entries(&self, user: &Principal) -> Result<Vec<JournalEntry>> {
        self.read("getJournalEntries", |state| {
            state
                .user(user)
                .map(|records| records.journal_entries.clone())
                .unwrap_or_default()
        })
    }

    async fn add_journal_entry(&self, caller: &Principal, entry: JournalEntry) -> Result<()> {
        self.mutate("addJournalEntry", |state| {
            let id = state.allocate_id();
            state
                .user_mut(caller)
                .journal_entries
                .push(JournalEntry { id, ..entry });
        })
    }

    async fn get_saved_items(&self, user: &Principal) -> Result<Vec<SavedItem>> {
        self.read("getSavedItems", |state| {
            state
                .user(user)
                .map(|records| records.saved_items.clone())
                .unwrap_or_default()
        })
    }

    async fn add_coping_mechanism_to_saved(
        &self,
        user: &Principal,
        item_id: u64,
        mechanism_id: u64,
    ) -> Result<()> {
        self.append_saved(
            "addCopingMechanismToSaved",
            user,
            item_id,
            SavedItemType::CopingMechanism,
            mechanism_id,
        )
    }

    async fn add_category_to_saved(
        &self,
        user: &Principal,
        item_id: u64,
        category_id: u64,
    ) -> Result<()> {
        self.append_saved(
            "addCategoryToSaved",
            user,
            item_id,
            SavedItemType::Topic,
            category_id,
        )
    }
}

fn mechanism(
    id: u64,
    title: &str,
    description: &str,
    category: CopingCategory,
    has_evidence: bool,
    is_holistic: bool,
    notes: &str,
) -> CopingMechanism {
    CopingMechanism {
        id,
        title: title.to_string(),
        description: description.to_string(),
        category,
        has_evidence,
        is_holistic,
        notes: notes.to_string(),
    }
}

fn default_coping_mechanisms() -> Vec<CopingMechanism> {
    use CopingCategory::*;

    vec![
        mechanism(
            1,
            "Body Doubling",
            "Work alongside another person, in person or virtually, to make starting tasks easier.",
            Focus,
            true,
            false,
            "Schedule short sessions with a friend or join an online co-working room.",
        ),
        mechanism(
            2,
            "Pomodoro Sprints",
            "Work in 25-minute bursts followed by 5-minute breaks.",
            Focus,
            true,
            false,
            "Shorten the sprint to 10 minutes on high-fog days.",
        ),
        mechanism(
            3,
            "Box Breathing",
            "Inhale, hold, exhale and hold again for four counts each to calm the nervous system.",
            EmotionalRegulation,
            true,
            true,
            "Repeat four rounds when you notice your pulse rising.",
        ),
        mechanism(
            4,
            "Cool Bedroom Routine",
            "Keep the bedroom between 16 and 19 degrees Celsius with breathable bedding.",
            Sleep,
            true,
            true,
            "Keep a fan and a glass of cold water by the bed.",
        ),
        mechanism(
            5,
            "Layered Clothing",
            "Dress in removable layers so you can adjust quickly when a hot flash starts.",
            HotFlashes,
            false,
            true,
            "Choose cotton or moisture-wicking fabrics.",
        ),
        mechanism(
            6,
            "Paced Respiration",
            "Slow, deep abdominal breathing at six breaths per minute during a hot flash.",
            HotFlashes,
            true,
            true,
            "Practice twice a day so it is automatic when you need it.",
        ),
        mechanism(
            7,
            "Brain Dump",
            "Write every open loop on paper to free up working memory.",
            BrainFog,
            false,
            false,
            "Do it first thing in the morning and before bed.",
        ),
        mechanism(
            8,
            "5-4-3-2-1 Grounding",
            "Name five things you see, four you hear, three you feel, two you smell and one you taste.",
            Anxiety,
            true,
            true,
            "Useful in the middle of a spiral or before a stressful meeting.",
        ),
        mechanism(
            9,
            "Needs Script",
            "Prepare a short script to tell close people what helps on hard days.",
            Relationships,
            false,
            false,
            "Share it on a calm day, not during a conflict.",
        ),
        mechanism(
            10,
            "Meeting Notes Template",
            "Use the same three headings for every meeting: decisions, actions, questions.",
            Work,
            false,
            false,
            "Keep the template pinned where you take notes.",
        ),
        mechanism(
            11,
            "Gentle Movement",
            "A ten-minute walk or stretch to reset energy and mood.",
            SelfCare,
            true,
            true,
            "Stack it onto something you already do, like after lunch.",
        ),
        mechanism(
            12,
            "Wind-Down Alarm",
            "Set an alarm an hour before bed to start the evening routine.",
            Sleep,
            false,
            false,
            "Put the phone on a charger outside the bedroom when it rings.",
        ),
    ]
}

fn default_prompts() -> Vec<String> {
    [
        "What drained my energy today, and what restored it?",
        "What is one thing I handled well this week?",
        "How did my body feel today?",
        "What would make tomorrow ten percent easier?",
        "What am I carrying that I could set down?",
        "When did I feel most like myself today?",
    ]
    .iter()
    .map(|prompt| prompt.to_string())
    .collect()
}
