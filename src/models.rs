//! Core data structures for the wellkeep application.
//!
//! This module contains the records exchanged with the wellness service:
//! saved items, coping mechanisms, check-ins, journal entries and profiles.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Presence, Result, WellError};

/// Service timestamps, in nanoseconds since the Unix epoch.
pub type Time = i64;

/// Id sent with every new record; the service assigns the real one.
pub const PLACEHOLDER_ID: u64 = 0;

/// Current client time in service ticks.
pub fn now_ticks() -> Time {
    ticks_from(Utc::now())
}

pub fn ticks_from(at: DateTime<Utc>) -> Time {
    at.timestamp_nanos_opt().unwrap_or(Time::MAX)
}

/// Which catalog a saved item points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SavedItemType {
    CopingMechanism,
    Topic,
}

impl fmt::Display for SavedItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavedItemType::CopingMechanism => f.write_str("coping mechanism"),
            SavedItemType::Topic => f.write_str("topic"),
        }
    }
}

/// A bookmark record in a user's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    /// Assigned by the service
    pub id: u64,
    pub item_type: SavedItemType,
    /// Id within the catalog selected by `item_type`
    pub reference_id: u64,
}

/// The nine symptom/domain tags of the coping toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CopingCategory {
    Focus,
    EmotionalRegulation,
    Sleep,
    HotFlashes,
    BrainFog,
    Anxiety,
    Relationships,
    Work,
    SelfCare,
}

impl CopingCategory {
    /// Toolkit display order
    pub const ALL: [CopingCategory; 9] = [
        CopingCategory::Focus,
        CopingCategory::EmotionalRegulation,
        CopingCategory::Sleep,
        CopingCategory::HotFlashes,
        CopingCategory::BrainFog,
        CopingCategory::Anxiety,
        CopingCategory::Relationships,
        CopingCategory::Work,
        CopingCategory::SelfCare,
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            CopingCategory::Focus => "Focus",
            CopingCategory::EmotionalRegulation => "EmotionalRegulation",
            CopingCategory::Sleep => "Sleep",
            CopingCategory::HotFlashes => "HotFlashes",
            CopingCategory::BrainFog => "BrainFog",
            CopingCategory::Anxiety => "Anxiety",
            CopingCategory::Relationships => "Relationships",
            CopingCategory::Work => "Work",
            CopingCategory::SelfCare => "SelfCare",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            CopingCategory::Focus => "Focus",
            CopingCategory::EmotionalRegulation => "Emotional Regulation",
            CopingCategory::Sleep => "Sleep",
            CopingCategory::HotFlashes => "Hot Flashes",
            CopingCategory::BrainFog => "Brain Fog",
            CopingCategory::Anxiety => "Anxiety",
            CopingCategory::Relationships => "Relationships",
            CopingCategory::Work => "Work",
            CopingCategory::SelfCare => "Self-Care",
        }
    }
}

impl fmt::Display for CopingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CopingCategory {
    type Err = WellError;

    /// Accepts wire names and labels in any case, ignoring spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        CopingCategory::ALL
            .into_iter()
            .find(|category| category.as_str().to_lowercase() == wanted)
            .ok_or_else(|| WellError::UnknownCategory {
                name: s.to_string(),
            })
    }
}

/// A coping strategy from the service's catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopingMechanism {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: CopingCategory,
    /// Backed by research
    pub has_evidence: bool,
    pub is_holistic: bool,
    /// Usage guidance
    pub notes: String,
}

/// The seven self-assessment scales of a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingField {
    Focus,
    Mood,
    Energy,
    SleepQuality,
    HotFlashSeverity,
    Anxiety,
    Irritability,
}

impl RatingField {
    pub const ALL: [RatingField; 7] = [
        RatingField::Focus,
        RatingField::Mood,
        RatingField::Energy,
        RatingField::SleepQuality,
        RatingField::HotFlashSeverity,
        RatingField::Anxiety,
        RatingField::Irritability,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RatingField::Focus => "Focus",
            RatingField::Mood => "Mood",
            RatingField::Energy => "Energy",
            RatingField::SleepQuality => "Sleep Quality",
            RatingField::HotFlashSeverity => "Hot Flash Severity",
            RatingField::Anxiety => "Anxiety",
            RatingField::Irritability => "Irritability",
        }
    }
}

impl fmt::Display for RatingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RatingField::Focus => "focus",
            RatingField::Mood => "mood",
            RatingField::Energy => "energy",
            RatingField::SleepQuality => "sleepQuality",
            RatingField::HotFlashSeverity => "hotFlashSeverity",
            RatingField::Anxiety => "anxiety",
            RatingField::Irritability => "irritability",
        };
        f.write_str(name)
    }
}

/// A single check-in score, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 10;

    pub fn new(field: RatingField, value: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(WellError::RatingOutOfRange { field, value })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(format!("rating {} is outside 1..=10", value))
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.0 as i64
    }
}

/// Validated ratings of one check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub focus: Rating,
    pub mood: Rating,
    pub energy: Rating,
    pub sleep_quality: Rating,
    pub hot_flash_severity: Rating,
    pub anxiety: Rating,
    pub irritability: Rating,
}

impl Ratings {
    pub fn get(&self, field: RatingField) -> Rating {
        match field {
            RatingField::Focus => self.focus,
            RatingField::Mood => self.mood,
            RatingField::Energy => self.energy,
            RatingField::SleepQuality => self.sleep_quality,
            RatingField::HotFlashSeverity => self.hot_flash_severity,
            RatingField::Anxiety => self.anxiety,
            RatingField::Irritability => self.irritability,
        }
    }
}

/// Raw slider values as entered, before range validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingsDraft {
    pub focus: i64,
    pub mood: i64,
    pub energy: i64,
    pub sleep_quality: i64,
    pub hot_flash_severity: i64,
    pub anxiety: i64,
    pub irritability: i64,
}

impl Default for RatingsDraft {
    fn default() -> Self {
        Self {
            focus: 5,
            mood: 5,
            energy: 5,
            sleep_quality: 5,
            hot_flash_severity: 5,
            anxiety: 5,
            irritability: 5,
        }
    }
}

impl RatingsDraft {
    /// Checks every scale, reporting the first one out of range.
    pub fn validate(&self) -> Result<Ratings> {
        Ok(Ratings {
            focus: Rating::new(RatingField::Focus, self.focus)?,
            mood: Rating::new(RatingField::Mood, self.mood)?,
            energy: Rating::new(RatingField::Energy, self.energy)?,
            sleep_quality: Rating::new(RatingField::SleepQuality, self.sleep_quality)?,
            hot_flash_severity: Rating::new(
                RatingField::HotFlashSeverity,
                self.hot_flash_severity,
            )?,
            anxiety: Rating::new(RatingField::Anxiety, self.anxiety)?,
            irritability: Rating::new(RatingField::Irritability, self.irritability)?,
        })
    }
}

/// A daily self-assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCheckIn {
    pub id: u64,
    pub date: Time,
    #[serde(flatten)]
    pub ratings: Ratings,
    #[serde(default)]
    pub notes: Presence<String>,
}

impl DailyCheckIn {
    /// A new check-in stamped with the client clock and the placeholder id
    pub fn new(ratings: Ratings, notes: Presence<String>) -> Self {
        Self {
            id: PLACEHOLDER_ID,
            date: now_ticks(),
            ratings,
            notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub date: Time,
    pub entry: String,
    /// The prompt text this entry answers
    #[serde(default)]
    pub prompt: Presence<String>,
}

impl JournalEntry {
    /// Builds a new entry from user text, rejecting blank entries.
    pub fn new(entry: &str, prompt: Presence<String>) -> Result<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(WellError::EmptyJournalEntry);
        }

        Ok(Self {
            id: PLACEHOLDER_ID,
            date: now_ticks(),
            entry: entry.to_string(),
            prompt,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

impl UserProfile {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WellError::EmptyProfileName);
        }
        Ok(Self {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(RatingField::Focus, 1).is_ok());
        assert!(Rating::new(RatingField::Focus, 10).is_ok());
        assert!(matches!(
            Rating::new(RatingField::Focus, 0),
            Err(WellError::RatingOutOfRange {
                field: RatingField::Focus,
                value: 0
            })
        ));
        assert!(Rating::new(RatingField::Focus, 11).is_err());
    }

    #[test]
    fn draft_reports_offending_field() {
        let draft = RatingsDraft {
            anxiety: 11,
            ..RatingsDraft::default()
        };
        match draft.validate() {
            Err(WellError::RatingOutOfRange { field, value }) => {
                assert_eq!(field, RatingField::Anxiety);
                assert_eq!(value, 11);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn check_in_wire_format_is_flat() {
        let ratings = RatingsDraft::default().validate().unwrap();
        let check_in = DailyCheckIn {
            id: 3,
            date: 1_700_000_000_000_000_000,
            ratings,
            notes: Presence::Absent,
        };
        let json = serde_json::to_value(&check_in).unwrap();
        assert_eq!(json["sleepQuality"], 5);
        assert_eq!(json["hotFlashSeverity"], 5);

        let mut bad = json.clone();
        bad["mood"] = serde_json::json!(0);
        assert!(serde_json::from_value::<DailyCheckIn>(bad).is_err());
    }

    #[test]
    fn category_parsing_accepts_labels() {
        assert_eq!("hot-flashes".parse::<CopingCategory>().unwrap(), CopingCategory::HotFlashes);
        assert_eq!("Self-Care".parse::<CopingCategory>().unwrap(), CopingCategory::SelfCare);
        assert_eq!(
            "emotional_regulation".parse::<CopingCategory>().unwrap(),
            CopingCategory::EmotionalRegulation
        );
        assert!("diet".parse::<CopingCategory>().is_err());
    }

    #[test]
    fn blank_journal_entry_is_rejected() {
        assert!(matches!(
            JournalEntry::new("   ", Presence::Absent),
            Err(WellError::EmptyJournalEntry)
        ));
        let entry = JournalEntry::new("  today was ok ", Presence::Absent).unwrap();
        assert_eq!(entry.entry, "today was ok");
        assert_eq!(entry.id, PLACEHOLDER_ID);
    }
}
