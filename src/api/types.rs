use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::time::parse_timestamp;

const DEFAULT_PSEUDONYM: &str = "Anonymous";

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Heart,
    Hug,
    Strength,
}

impl ReactionKind {
    pub fn all() -> &'static [ReactionKind] {
        &[ReactionKind::Heart, ReactionKind::Hug, ReactionKind::Strength]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReactionKind::Heart => "heart",
            ReactionKind::Hug => "hug",
            ReactionKind::Strength => "strength",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ReactionKind::Heart => "♥",
            ReactionKind::Hug => "🤗",
            ReactionKind::Strength => "✨",
        }
    }
}

/// Authoritative per-kind reaction totals as returned by the server.
///
/// Story endpoints spell the keys `heart_count`, comment endpoints `heart`;
/// both are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ReactionCounts {
    #[serde(default, alias = "heart_count")]
    pub heart: u32,
    #[serde(default, alias = "hug_count")]
    pub hug: u32,
    #[serde(default, alias = "strength_count")]
    pub strength: u32,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::Heart => self.heart,
            ReactionKind::Hug => self.hug,
            ReactionKind::Strength => self.strength,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub story_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub pseudonym: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub heart_count: u32,
    #[serde(default)]
    pub hug_count: u32,
    #[serde(default)]
    pub strength_count: u32,
    #[serde(default)]
    pub response_count: u32,
    #[serde(default)]
    pub trigger_warning: bool,
}

impl Story {
    pub fn author(&self) -> &str {
        self.pseudonym
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PSEUDONYM)
    }

    pub fn category_id(&self) -> Option<u64> {
        self.category.as_ref().map(|c| c.id)
    }

    pub fn counts(&self) -> ReactionCounts {
        ReactionCounts {
            heart: self.heart_count,
            hug: self.hug_count,
            strength: self.strength_count,
        }
    }

    /// Overwrites all three counters with server-provided values.
    pub fn set_counts(&mut self, counts: ReactionCounts) {
        self.heart_count = counts.heart;
        self.hug_count = counts.hug;
        self.strength_count = counts.strength;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub story_id: u64,
    #[serde(default)]
    pub parent_comment_id: Option<u64>,
    #[serde(default)]
    pub pseudonym: Option<String>,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reaction_counts: ReactionCounts,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.pseudonym
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PSEUDONYM)
    }

    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub story_id: Option<u64>,
    #[serde(default)]
    pub story_title: Option<String>,
}

/// A poll result: the notification list plus the server's unread tally.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: u32,
}

/// What a reaction toggle is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTarget {
    Story(u64),
    Comment(u64),
}

impl ReactionTarget {
    pub fn path(&self) -> String {
        match self {
            ReactionTarget::Story(id) => format!("/stories/{id}/reactions"),
            ReactionTarget::Comment(id) => format!("/comments/{id}/reactions"),
        }
    }
}

/// Where a new comment lands: top-level on a story, or a reply under a
/// top-level comment. Replies still remember their story so the thread can
/// be refetched afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Story { story_id: u64 },
    Reply { story_id: u64, parent_id: u64 },
}

impl CommentTarget {
    pub fn story_id(&self) -> u64 {
        match self {
            CommentTarget::Story { story_id } | CommentTarget::Reply { story_id, .. } => *story_id,
        }
    }

    pub fn path(&self) -> String {
        match self {
            CommentTarget::Story { story_id } => format!("/stories/{story_id}/comments"),
            CommentTarget::Reply { parent_id, .. } => format!("/comments/{parent_id}/replies"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudonym: Option<String>,
}

impl NewComment {
    /// Trims both fields; `None` when the content is blank.
    pub fn from_draft(content: &str, pseudonym: &str) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let pseudonym = pseudonym.trim();
        Some(Self {
            content: content.to_string(),
            pseudonym: (!pseudonym.is_empty()).then(|| pseudonym.to_string()),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReactionRequest {
    pub reaction_type: ReactionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStory {
    pub title: String,
    pub content: String,
    pub category_id: u64,
    pub hashtags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudonym: Option<String>,
    pub healing_process: String,
    pub next_steps: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShareLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailForward {
    pub recipient_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_message: Option<String>,
}

// Response payloads, decoded after the success flag has been checked.

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesPayload {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoriesPayload {
    #[serde(default)]
    pub stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentsPayload {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReactionPayload {
    #[serde(alias = "counts")]
    pub reaction_counts: ReactionCounts,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationsPayload {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: Option<u32>,
}

impl From<NotificationsPayload> for NotificationFeed {
    fn from(payload: NotificationsPayload) -> Self {
        let unread_count = payload.unread_count.unwrap_or_else(|| {
            payload.notifications.iter().filter(|n| !n.is_read).count() as u32
        });
        NotificationFeed {
            notifications: payload.notifications,
            unread_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareLinkPayload {
    pub share_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailForwardPayload {
    #[serde(default)]
    pub message: Option<String>,
}
