use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub const CURRENT_USER: &str = "Current User";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Comment {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Likes, saves and comments keyed by video id.
#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    liked: HashSet<String>,
    saved: HashSet<String>,
    comments: HashMap<String, Vec<Comment>>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new membership.
    pub fn toggle_like(&mut self, id: &str) -> bool {
        toggle(&mut self.liked, id)
    }

    /// Returns the new membership.
    pub fn toggle_save(&mut self, id: &str) -> bool {
        toggle(&mut self.saved, id)
    }

    /// Appends a comment for `video_id`. Blank text must be rejected by the caller.
    pub fn add_comment(&mut self, video_id: &str, text: impl Into<String>) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            username: CURRENT_USER.to_string(),
            text: text.into(),
            timestamp: Utc::now(),
        };
        self.comments
            .entry(video_id.to_string())
            .or_default()
            .push(comment.clone());
        comment
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    pub fn comments(&self, video_id: &str) -> &[Comment] {
        self.comments
            .get(video_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn toggle(set: &mut HashSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_follows_toggle_parity() {
        let mut store = InteractionStore::new();
        for n in 1..=7 {
            store.toggle_like("video-a");
            assert_eq!(store.is_liked("video-a"), n % 2 == 1, "after {n} toggles");
        }
        assert!(!store.is_liked("video-b"));
    }

    #[test]
    fn likes_and_saves_are_independent() {
        let mut store = InteractionStore::new();
        assert!(store.toggle_save("v"));
        assert!(store.is_saved("v"));
        assert!(!store.is_liked("v"));
        assert!(!store.toggle_save("v"));
        assert!(!store.is_saved("v"));
    }

    #[test]
    fn comments_default_to_empty_then_append_in_order() {
        let mut store = InteractionStore::new();
        assert!(store.comments("v").is_empty());

        let added = store.add_comment("v", "first!");
        let comments = store.comments("v");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, added.id);
        assert_eq!(comments[0].text, "first!");
        assert_eq!(comments[0].username, CURRENT_USER);

        store.add_comment("v", "second");
        let texts: Vec<_> = store.comments("v").iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first!", "second"]);
        assert_ne!(store.comments("v")[0].id, store.comments("v")[1].id);
        assert!(store.comments("other").is_empty());
    }
}
