use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::Notification;
use crate::settings::{PointAction, SettingsState};
use crate::store::PersistedStore;

pub const POSTS_KEY: &str = "saved_posts";

pub const SAVE_POINTS: u64 = 25;
pub const REFINE_POINTS: u64 = 50;

/// Library sizes that earn a celebration, each exactly once.
pub const MILESTONES: &[usize] = &[10, 25, 50, 100, 200];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PostsError {
    #[error("Post not found: {0}")]
    NotFound(i64),
}

/// A saved content package. `id` is immutable and unique within the
/// library; every edit archives the pre-edit text in `version_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPost {
    pub id: i64,
    pub platform: String,
    pub tone: String,
    pub emotion_preset: Vec<String>,
    pub idea: String,
    pub text: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub version_history: Vec<PostVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVersion {
    pub text: String,
    pub date: DateTime<Utc>,
}

/// Fields the caller supplies when saving or editing a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub platform: String,
    pub tone: String,
    pub emotion_preset: Vec<String>,
    pub idea: String,
    pub text: String,
}

/// Ordered post library, newest first. Every mutation persists the full
/// collection.
pub struct SavedPostsState {
    store: PersistedStore,
    posts: Vec<SavedPost>,
}

impl SavedPostsState {
    pub fn load(store: &PersistedStore) -> Self {
        let posts = store.load(POSTS_KEY, Vec::new());
        SavedPostsState { store: store.clone(), posts }
    }

    pub fn posts(&self) -> &[SavedPost] {
        &self.posts
    }

    pub fn get(&self, id: i64) -> Option<&SavedPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Millisecond clock, bumped past the current maximum so rapid saves
    /// never collide.
    fn allocate_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let max = self.posts.iter().map(|p| p.id).max().unwrap_or(0);
        now.max(max + 1)
    }

    /// Save a new post: prepend, award save points, celebrate milestones,
    /// roll the creation streak.
    pub fn create(
        &mut self,
        draft: PostDraft,
        settings: &mut SettingsState,
        today: NaiveDate,
    ) -> (i64, Vec<Notification>) {
        let post = SavedPost {
            id: self.allocate_id(),
            platform: draft.platform,
            tone: draft.tone,
            emotion_preset: draft.emotion_preset,
            idea: draft.idea,
            text: draft.text,
            date: Utc::now(),
            version_history: Vec::new(),
        };
        let id = post.id;
        self.posts.insert(0, post);
        self.persist();

        let mut notes = vec![Notification::success("Post saved to your library!")];
        notes.extend(settings.add_points(SAVE_POINTS, PointAction::Save));

        let count = self.posts.len();
        if MILESTONES.contains(&count) {
            notes.push(Notification::milestone(format!(
                "🥳 You just created your {}th post! Keep up the amazing work!",
                count
            )));
        }

        notes.extend(settings.record_post(today));
        (id, notes)
    }

    /// Overwrite a post in place, archiving the pre-edit text first.
    pub fn update(
        &mut self,
        id: i64,
        draft: PostDraft,
        settings: &mut SettingsState,
    ) -> Result<Vec<Notification>, PostsError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PostsError::NotFound(id))?;

        post.version_history.push(PostVersion { text: post.text.clone(), date: post.date });
        post.platform = draft.platform;
        post.tone = draft.tone;
        post.emotion_preset = draft.emotion_preset;
        post.idea = draft.idea;
        post.text = draft.text;
        post.date = Utc::now();
        self.persist();

        let mut notes = vec![Notification::success("Post refined and saved!")];
        notes.extend(settings.add_points(REFINE_POINTS, PointAction::Refine));
        Ok(notes)
    }

    /// Remove a post; no-op when the id is unknown.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != id);
        let removed = self.posts.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn reset(&mut self) {
        self.posts.clear();
        self.store.clear(POSTS_KEY);
    }

    fn persist(&self) {
        self.store.save(POSTS_KEY, &self.posts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::store::testing::temp_store;

    fn draft(text: &str) -> PostDraft {
        PostDraft {
            platform: "x".to_string(),
            tone: "Viral".to_string(),
            emotion_preset: vec!["curiosity".to_string()],
            idea: "an idea".to_string(),
            text: text.to_string(),
        }
    }

    fn states() -> (SavedPostsState, SettingsState) {
        let store = temp_store();
        (SavedPostsState::load(&store), SettingsState::load(&store))
    }

    fn today() -> NaiveDate {
        "2024-03-01".parse().unwrap()
    }

    #[test]
    fn create_prepends_newest_first_with_unique_ids() {
        let (mut posts, mut settings) = states();

        let (first, _) = posts.create(draft("one"), &mut settings, today());
        let (second, _) = posts.create(draft("two"), &mut settings, today());

        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(posts.posts()[0].text, "two");
        assert_eq!(posts.posts()[1].text, "one");
        assert!(posts.posts()[0].version_history.is_empty());
    }

    #[test]
    fn create_awards_save_points_and_streak() {
        let (mut posts, mut settings) = states();

        posts.create(draft("one"), &mut settings, today());

        let s = settings.settings();
        assert_eq!(s.posts_saved, 1);
        // 25 for the save + 10 for the fresh one-day streak
        assert_eq!(s.jet_points, SAVE_POINTS + 10);
        assert_eq!(s.creation_streak, 1);
    }

    #[test]
    fn milestone_fires_exactly_at_threshold() {
        let (mut posts, mut settings) = states();

        let mut milestone_notes = Vec::new();
        for i in 0..11 {
            let (_, notes) = posts.create(draft(&format!("post {}", i)), &mut settings, today());
            milestone_notes.extend(
                notes
                    .into_iter()
                    .filter(|n| n.kind == NotificationKind::Milestone && n.message.contains("10th")),
            );
        }

        assert_eq!(milestone_notes.len(), 1);
    }

    #[test]
    fn update_archives_previous_text() {
        let (mut posts, mut settings) = states();
        let (id, _) = posts.create(draft("original"), &mut settings, today());

        posts.update(id, draft("rewritten"), &mut settings).unwrap();

        let post = posts.get(id).unwrap();
        assert_eq!(post.text, "rewritten");
        assert_eq!(post.version_history.len(), 1);
        assert_eq!(post.version_history[0].text, "original");

        posts.update(id, draft("third"), &mut settings).unwrap();
        let post = posts.get(id).unwrap();
        assert_eq!(post.version_history.len(), 2);
        assert_eq!(post.version_history[1].text, "rewritten");
    }

    #[test]
    fn update_awards_refine_points() {
        let (mut posts, mut settings) = states();
        let (id, _) = posts.create(draft("original"), &mut settings, today());
        let before = settings.settings().jet_points;

        posts.update(id, draft("rewritten"), &mut settings).unwrap();

        assert_eq!(settings.settings().jet_points, before + REFINE_POINTS);
        assert_eq!(settings.settings().refinements_used, 1);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (mut posts, mut settings) = states();
        let err = posts.update(999, draft("x"), &mut settings).unwrap_err();
        assert_eq!(err, PostsError::NotFound(999));
    }

    #[test]
    fn delete_removes_and_is_noop_when_absent() {
        let (mut posts, mut settings) = states();
        let (id, _) = posts.create(draft("one"), &mut settings, today());

        assert!(posts.delete(id));
        assert!(posts.posts().is_empty());
        assert!(!posts.delete(id));
    }

    #[test]
    fn collection_survives_reload() {
        let store = temp_store();
        let mut settings = SettingsState::load(&store);
        let mut posts = SavedPostsState::load(&store);
        let (id, _) = posts.create(draft("kept"), &mut settings, today());

        let reloaded = SavedPostsState::load(&store);
        assert_eq!(reloaded.posts().len(), 1);
        assert_eq!(reloaded.get(id).unwrap().text, "kept");
    }
}
