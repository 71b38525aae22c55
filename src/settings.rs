use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::achievements::{self, AchievementId};
use crate::notify::Notification;
use crate::store::PersistedStore;

pub const SETTINGS_KEY: &str = "settings_v2";

/// Points awarded per action.
pub const GENERATE_POINTS: u64 = 10;
pub const TEMPLATE_POINTS: u64 = 15;
pub const TREND_POINTS: u64 = 20;

/// User profile plus the progression counters the achievement engine folds
/// over. Field names stay camelCase on disk so profiles written by the web
/// client keep loading.
///
/// Profiles saved by the pre-gamification schema lack the counter fields;
/// `serde(default)` fills them with zeroes on load and the deprecated
/// `level` field is dropped on the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_ai_style")]
    pub ai_style: String,
    #[serde(default)]
    pub creation_streak: u32,
    /// The web client stored `""` for "never posted"; anything that is not
    /// a date loads as `None` rather than failing the whole profile.
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_post_date: Option<NaiveDate>,
    #[serde(default)]
    pub jet_points: u64,
    #[serde(default)]
    pub achievements: BTreeSet<AchievementId>,
    #[serde(default)]
    pub posts_saved: u32,
    #[serde(default)]
    pub trends_used: u32,
    #[serde(default)]
    pub templates_used: u32,
    #[serde(default)]
    pub refinements_used: u32,
    #[serde(default)]
    pub languages_used: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_used_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_used_tone: Option<String>,
}

fn default_username() -> String {
    "Creator".to_string()
}

fn default_email() -> String {
    "creator@contentjet.ai".to_string()
}

fn default_ai_style() -> String {
    "Viral".to_string()
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| s.parse().ok()))
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            username: default_username(),
            email: default_email(),
            ai_style: default_ai_style(),
            creation_streak: 0,
            last_post_date: None,
            jet_points: 0,
            achievements: BTreeSet::new(),
            posts_saved: 0,
            trends_used: 0,
            templates_used: 0,
            refinements_used: 0,
            languages_used: BTreeSet::new(),
            most_used_platform: None,
            most_used_tone: None,
        }
    }
}

/// Which action an award belongs to. `Generate` and `Streak` carry points
/// only; the rest also bump their progression counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointAction {
    Generate,
    Save,
    Refine,
    Template,
    Trend,
    Streak,
}

/// Owns the persisted profile. Every mutation writes a full snapshot and
/// returns the notifications the caller should surface; persistence
/// failures never reach the caller.
pub struct SettingsState {
    store: PersistedStore,
    settings: UserSettings,
}

impl SettingsState {
    pub fn load(store: &PersistedStore) -> Self {
        let settings = store.load(SETTINGS_KEY, UserSettings::default());
        SettingsState { store: store.clone(), settings }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Award points, bump the matching counter, and unlock anything the new
    /// counters earn. One achievement notification per newly unlocked id.
    pub fn add_points(&mut self, amount: u64, action: PointAction) -> Vec<Notification> {
        self.settings.jet_points += amount;

        match action {
            PointAction::Save => self.settings.posts_saved += 1,
            PointAction::Refine => self.settings.refinements_used += 1,
            PointAction::Template => self.settings.templates_used += 1,
            PointAction::Trend => self.settings.trends_used += 1,
            PointAction::Generate | PointAction::Streak => {}
        }

        let notes = self.sweep_achievements();
        self.persist();
        notes
    }

    /// A post landed today: roll the creation streak. Same day leaves the
    /// streak alone, yesterday extends it, anything older resets to 1.
    pub fn record_post(&mut self, today: NaiveDate) -> Vec<Notification> {
        let prior = self.settings.creation_streak;
        let yesterday = today.pred_opt();

        let new_streak = if self.settings.last_post_date == Some(today) {
            prior.max(1)
        } else if self.settings.last_post_date.is_some() && self.settings.last_post_date == yesterday {
            prior + 1
        } else {
            1
        };

        self.settings.last_post_date = Some(today);
        self.settings.creation_streak = new_streak;

        let mut notes = Vec::new();
        if new_streak > prior {
            if new_streak > 1 {
                notes.push(Notification::milestone(format!(
                    "🔥 {}-day creation streak! You're on fire!",
                    new_streak
                )));
            }
            notes.extend(self.add_points(new_streak as u64 * 10, PointAction::Streak));
        } else {
            self.persist();
        }
        notes
    }

    /// Record a generation language for the polyglot progression.
    pub fn record_language(&mut self, language: &str) -> Vec<Notification> {
        let code = language.trim().to_lowercase();
        if code.is_empty() {
            return Vec::new();
        }
        self.settings.languages_used.insert(code);
        let notes = self.sweep_achievements();
        self.persist();
        notes
    }

    /// Full profile overwrite, e.g. from the settings form.
    pub fn save(&mut self, new_settings: UserSettings) {
        self.settings = new_settings;
        self.persist();
    }

    /// Back to factory defaults; the persisted entry is removed entirely.
    pub fn reset(&mut self) {
        self.settings = UserSettings::default();
        self.store.clear(SETTINGS_KEY);
    }

    fn sweep_achievements(&mut self) -> Vec<Notification> {
        let earned = achievements::evaluate(&self.settings);
        let mut notes = Vec::new();
        for id in earned {
            if self.settings.achievements.insert(id) {
                let entry = achievements::find(id);
                notes.push(Notification::achievement(format!(
                    "Achievement Unlocked: {}!",
                    entry.name
                )));
            }
        }
        notes
    }

    fn persist(&self) {
        self.store.save(SETTINGS_KEY, &self.settings);
    }
}
