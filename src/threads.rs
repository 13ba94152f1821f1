//! Per-story comment cache and expansion state.

use std::collections::{HashMap, HashSet};

use crate::api::{Comment, ReactionCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Collapsed,
    Expanded { needs_fetch: bool },
}

/// An absent entry means the story's comments were never fetched; a present
/// but empty one means the story has no comments.
#[derive(Debug, Default)]
pub struct ThreadCache {
    loaded: HashMap<u64, Vec<Comment>>,
    expanded: HashSet<u64>,
    in_flight: HashSet<u64>,
}

impl ThreadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips expansion for `story_id`. Expanding asks for a fetch only when
    /// nothing is cached and no fetch is already running.
    pub fn toggle(&mut self, story_id: u64) -> Expansion {
        if self.expanded.remove(&story_id) {
            return Expansion::Collapsed;
        }
        self.expanded.insert(story_id);
        let needs_fetch =
            !self.loaded.contains_key(&story_id) && self.in_flight.insert(story_id);
        Expansion::Expanded { needs_fetch }
    }

    /// Marks a forced refetch, e.g. after posting a comment.
    pub fn begin_refetch(&mut self, story_id: u64) {
        self.in_flight.insert(story_id);
    }

    /// Expands without fetching; used when a refetch is already underway.
    pub fn expand(&mut self, story_id: u64) {
        self.expanded.insert(story_id);
    }

    pub fn store(&mut self, story_id: u64, comments: Vec<Comment>) {
        self.in_flight.remove(&story_id);
        self.loaded.insert(story_id, comments);
    }

    /// A failed fetch leaves the entry absent so the next expansion retries.
    pub fn fetch_failed(&mut self, story_id: u64) {
        self.in_flight.remove(&story_id);
    }

    pub fn is_expanded(&self, story_id: u64) -> bool {
        self.expanded.contains(&story_id)
    }

    pub fn is_loading(&self, story_id: u64) -> bool {
        self.in_flight.contains(&story_id)
    }

    pub fn comments(&self, story_id: u64) -> Option<&[Comment]> {
        self.loaded.get(&story_id).map(Vec::as_slice)
    }

    /// Replaces the counts of the comment or reply with `comment_id`,
    /// wherever it is cached. Returns false when it is not cached.
    pub fn apply_reaction_counts(&mut self, comment_id: u64, counts: ReactionCounts) -> bool {
        let mut found = false;
        for comment in self.loaded.values_mut().flatten() {
            if comment.id == comment_id {
                comment.reaction_counts = counts;
                found = true;
            }
            for reply in comment.replies.iter_mut().filter(|r| r.id == comment_id) {
                reply.reaction_counts = counts;
                found = true;
            }
        }
        found
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
        self.expanded.clear();
        self.in_flight.clear();
    }
}
