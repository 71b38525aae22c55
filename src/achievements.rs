use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::settings::UserSettings;

/// Stable identifiers for the achievement catalog. Serialized as the ids
/// the web client already persisted, so existing profiles keep their
/// unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "first_save")]
    FirstSave,
    #[serde(rename = "librarian_10")]
    Librarian10,
    #[serde(rename = "trend_spotter_5")]
    TrendSpotter5,
    #[serde(rename = "architect_5")]
    Architect5,
    #[serde(rename = "guru_apprentice_5")]
    GuruApprentice5,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "polyglot_3")]
    Polyglot3,
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AchievementId::FirstSave => write!(f, "first_save"),
            AchievementId::Librarian10 => write!(f, "librarian_10"),
            AchievementId::TrendSpotter5 => write!(f, "trend_spotter_5"),
            AchievementId::Architect5 => write!(f, "architect_5"),
            AchievementId::GuruApprentice5 => write!(f, "guru_apprentice_5"),
            AchievementId::Streak7 => write!(f, "streak_7"),
            AchievementId::Polyglot3 => write!(f, "polyglot_3"),
        }
    }
}

impl AchievementId {
    fn earned(self, settings: &UserSettings) -> bool {
        match self {
            AchievementId::FirstSave => settings.posts_saved >= 1,
            AchievementId::Librarian10 => settings.posts_saved >= 10,
            AchievementId::TrendSpotter5 => settings.trends_used >= 5,
            AchievementId::Architect5 => settings.templates_used >= 5,
            AchievementId::GuruApprentice5 => settings.refinements_used >= 5,
            AchievementId::Streak7 => settings.creation_streak >= 7,
            AchievementId::Polyglot3 => settings.languages_used.len() >= 3,
        }
    }
}

/// Static catalog entry. Unlocked state lives in
/// `UserSettings::achievements`, never here.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstSave,
        name: "First Flight",
        description: "Saved your first post.",
    },
    Achievement {
        id: AchievementId::Librarian10,
        name: "Librarian",
        description: "Saved 10 posts.",
    },
    Achievement {
        id: AchievementId::TrendSpotter5,
        name: "Trend Spotter",
        description: "Generated 5 posts from trends.",
    },
    Achievement {
        id: AchievementId::Architect5,
        name: "Framework Architect",
        description: "Used 5 different templates.",
    },
    Achievement {
        id: AchievementId::GuruApprentice5,
        name: "Guru's Apprentice",
        description: "Used \"Execute Refinements\" 5 times.",
    },
    Achievement {
        id: AchievementId::Streak7,
        name: "7-Day Streak",
        description: "Maintained a 7-day creation streak.",
    },
    Achievement {
        id: AchievementId::Polyglot3,
        name: "Polyglot",
        description: "Generated content in 3 different languages.",
    },
];

pub fn find(id: AchievementId) -> &'static Achievement {
    CATALOG
        .iter()
        .find(|a| a.id == id)
        .expect("every AchievementId has a catalog entry")
}

/// Pure fold over the current counters: the full set this profile has
/// earned. Re-running on unchanged counters returns the same set, so the
/// caller's set-difference against already-unlocked ids is idempotent.
pub fn evaluate(settings: &UserSettings) -> BTreeSet<AchievementId> {
    CATALOG
        .iter()
        .filter(|a| a.id.earned(settings))
        .map(|a| a.id)
        .collect()
}
