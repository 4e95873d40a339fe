//! The remote wellness service contract.
//!
//! Every call is asynchronous and fire-and-confirm. Implementations report
//! failures as [`WellError::Remote`](crate::WellError::Remote).

use async_trait::async_trait;

use crate::{
    CopingCategory, CopingMechanism, DailyCheckIn, JournalEntry, Presence, Principal, Result,
    SavedItem, UserProfile,
};

#[async_trait]
pub trait WellnessService: Send + Sync {
    /// Profile of the calling identity; `Absent` until one is saved.
    async fn get_caller_user_profile(&self, caller: &Principal) -> Result<Presence<UserProfile>>;

    async fn save_caller_user_profile(&self, caller: &Principal, profile: UserProfile)
        -> Result<()>;

    async fn get_coping_mechanisms(&self) -> Result<Vec<CopingMechanism>>;

    /// Server-side category filter
    async fn get_coping_mechanisms_by_category(
        &self,
        category: CopingCategory,
    ) -> Result<Vec<CopingMechanism>>;

    /// Journal writing prompts
    async fn get_prompts(&self) -> Result<Vec<String>>;

    async fn get_daily_check_ins(&self, user: &Principal) -> Result<Vec<DailyCheckIn>>;

    async fn add_daily_check_in(&self, caller: &Principal, check_in: DailyCheckIn) -> Result<()>;

    async fn get_journal_entries(&self, user: &Principal) -> Result<Vec<JournalEntry>>;

    async fn add_journal_entry(&self, caller: &Principal, entry: JournalEntry) -> Result<()>;

    /// The user's bookmark ledger, in append order
    async fn get_saved_items(&self, user: &Principal) -> Result<Vec<SavedItem>>;

    /// Appends a coping-mechanism bookmark. `item_id` is a placeholder.
    async fn add_coping_mechanism_to_saved(
        &self,
        user: &Principal,
        item_id: u64,
        mechanism_id: u64,
    ) -> Result<()>;

    /// Appends a library-topic bookmark. Despite the name, `category_id`
    /// carries a topic id. `item_id` is a placeholder.
    async fn add_category_to_saved(
        &self,
        user: &Principal,
        item_id: u64,
        category_id: u64,
    ) -> Result<()>;
}
