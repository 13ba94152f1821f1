//! Test data builders.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, TimeZone, Utc};

use crate::api::{
    Category, ClientConfig, Comment, GroveClient, Notification, NotificationFeed, ReactionCounts,
    Story,
};
use crate::app::App;
use crate::clipboard::Clipboard;
use crate::identity::AnonymousId;
use crate::time::{Clock, fixed_clock};

/// Fixed timestamp for deterministic tests: 2023-11-15 00:00:00 UTC.
/// One day after `BASE_TIME`, so sample data shows as "1d ago".
pub const TEST_NOW: i64 = 1_700_092_800;
pub const BASE_TIME: i64 = 1_700_000_000;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub struct StoryBuilder {
    id: u64,
    title: String,
    content: Option<String>,
    category: Option<Category>,
    pseudonym: Option<String>,
    hashtags: Vec<String>,
    time: i64,
    counts: ReactionCounts,
    responses: u32,
    trigger_warning: bool,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StoryBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            title: "Test Story".to_string(),
            content: Some("Some words about a hard year.".to_string()),
            category: None,
            pseudonym: None,
            hashtags: Vec::new(),
            time: BASE_TIME,
            counts: ReactionCounts::default(),
            responses: 0,
            trigger_warning: false,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn category(mut self, id: u64, name: &str) -> Self {
        self.category = Some(category(id, name));
        self
    }

    pub fn author(mut self, pseudonym: &str) -> Self {
        self.pseudonym = Some(pseudonym.to_string());
        self
    }

    pub fn hashtags(mut self, tags: &[&str]) -> Self {
        self.hashtags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn hearts(mut self, hearts: u32) -> Self {
        self.counts.heart = hearts;
        self
    }

    pub fn counts(mut self, heart: u32, hug: u32, strength: u32) -> Self {
        self.counts = ReactionCounts {
            heart,
            hug,
            strength,
        };
        self
    }

    pub fn responses(mut self, count: u32) -> Self {
        self.responses = count;
        self
    }

    pub fn time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn trigger_warning(mut self) -> Self {
        self.trigger_warning = true;
        self
    }

    pub fn build(self) -> Story {
        Story {
            id: self.id,
            title: self.title,
            content: self.content,
            category: self.category,
            pseudonym: self.pseudonym,
            hashtags: self.hashtags,
            created_at: at(self.time),
            heart_count: self.counts.heart,
            hug_count: self.counts.hug,
            strength_count: self.counts.strength,
            response_count: self.responses,
            trigger_warning: self.trigger_warning,
        }
    }
}

pub struct CommentBuilder {
    id: u64,
    story_id: u64,
    parent: Option<u64>,
    pseudonym: Option<String>,
    content: String,
    time: i64,
    counts: ReactionCounts,
    replies: Vec<Comment>,
}

impl Default for CommentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CommentBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            story_id: 1,
            parent: None,
            pseudonym: None,
            content: "Sending strength your way.".to_string(),
            time: BASE_TIME,
            counts: ReactionCounts::default(),
            replies: Vec::new(),
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn story(mut self, story_id: u64) -> Self {
        self.story_id = story_id;
        self
    }

    pub fn parent(mut self, parent_id: u64) -> Self {
        self.parent = Some(parent_id);
        self
    }

    pub fn author(mut self, pseudonym: &str) -> Self {
        self.pseudonym = Some(pseudonym.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.content = text.to_string();
        self
    }

    pub fn hearts(mut self, hearts: u32) -> Self {
        self.counts.heart = hearts;
        self
    }

    pub fn replies(mut self, replies: Vec<Comment>) -> Self {
        self.replies = replies;
        self
    }

    pub fn build(self) -> Comment {
        Comment {
            id: self.id,
            story_id: self.story_id,
            parent_comment_id: self.parent,
            pseudonym: self.pseudonym,
            content: self.content,
            created_at: at(self.time),
            reaction_counts: self.counts,
            replies: self.replies,
        }
    }
}

pub struct NotificationBuilder {
    id: u64,
    message: String,
    is_read: bool,
    story_id: Option<u64>,
    story_title: Option<String>,
    time: i64,
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            message: "Someone reacted to your story".to_string(),
            is_read: false,
            story_id: None,
            story_title: None,
            time: BASE_TIME,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    pub fn story(mut self, title: &str) -> Self {
        self.story_title = Some(title.to_string());
        self
    }

    pub fn story_id(mut self, story_id: u64) -> Self {
        self.story_id = Some(story_id);
        self
    }

    pub fn build(self) -> Notification {
        Notification {
            id: self.id,
            message: self.message,
            created_at: at(self.time),
            is_read: self.is_read,
            kind: None,
            story_id: self.story_id,
            story_title: self.story_title,
        }
    }
}

/// A clipboard that records what was copied, or refuses everything.
#[derive(Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    broken: bool,
}

impl MemoryClipboard {
    pub fn broken() -> Self {
        Self {
            contents: None,
            broken: true,
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.broken {
            return Err("no display server".to_string());
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

pub fn test_client(base_url: &str) -> GroveClient {
    let id = AnonymousId::from_stored("anon_test").unwrap();
    GroveClient::new(ClientConfig::new(base_url, id))
}

pub struct TestAppBuilder {
    api_base: String,
    categories: Vec<Category>,
    stories: Vec<Story>,
    threads: Vec<(u64, Vec<Comment>)>,
    notifications: Option<NotificationFeed>,
    selected_index: usize,
    loading: bool,
    error: Option<String>,
    help_overlay: bool,
    broken_clipboard: bool,
    clock: Arc<dyn Clock>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            // Nothing listens here; tests that hit the network pass a mock server.
            api_base: "http://127.0.0.1:9".to_string(),
            categories: Vec::new(),
            stories: Vec::new(),
            threads: Vec::new(),
            notifications: None,
            selected_index: 0,
            loading: false,
            error: None,
            help_overlay: false,
            broken_clipboard: false,
            clock: fixed_clock(TEST_NOW),
        }
    }

    pub fn api_base(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_stories(mut self, stories: Vec<Story>) -> Self {
        self.stories = stories;
        self
    }

    /// Caches `comments` for `story_id` and expands its thread.
    pub fn with_comments(mut self, story_id: u64, comments: Vec<Comment>) -> Self {
        self.threads.push((story_id, comments));
        self
    }

    pub fn with_notifications(mut self, notifications: Vec<Notification>, unread: u32) -> Self {
        self.notifications = Some(NotificationFeed {
            notifications,
            unread_count: unread,
        });
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn help_overlay(mut self) -> Self {
        self.help_overlay = true;
        self
    }

    pub fn broken_clipboard(mut self) -> Self {
        self.broken_clipboard = true;
        self
    }

    pub fn build(self) -> App {
        let clipboard: Box<dyn Clipboard> = if self.broken_clipboard {
            Box::new(MemoryClipboard::broken())
        } else {
            Box::new(MemoryClipboard::default())
        };
        let mut app = App::new(test_client(&self.api_base), clipboard);
        app.categories = self.categories;
        app.stories = self.stories;
        for (story_id, comments) in self.threads {
            app.threads.toggle(story_id);
            app.threads.store(story_id, comments);
        }
        if let Some(feed) = self.notifications {
            app.notifications.replace(feed);
        }
        app.selected_index = self.selected_index;
        app.load.loading = self.loading;
        if self.loading {
            app.load.loading_start = Some(Instant::now());
        }
        app.load.error = self.error;
        app.help_overlay = self.help_overlay;
        app.clock = self.clock;
        app
    }
}

fn category(id: u64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
        color: None,
        story_count: 0,
    }
}

pub fn sample_categories() -> Vec<Category> {
    vec![
        Category {
            color: Some("#4A7C59".to_string()),
            ..category(1, "Recovery")
        },
        category(2, "Grief"),
        category(3, "Anxiety"),
    ]
}

pub fn sample_stories() -> Vec<Story> {
    vec![
        StoryBuilder::new()
            .id(1)
            .title("Finding Hope Again")
            .category(1, "Recovery")
            .author("Willow")
            .counts(12, 4, 7)
            .responses(3)
            .build(),
        StoryBuilder::new()
            .id(2)
            .title("The first winter without her")
            .category(2, "Grief")
            .hashtags(&["hope", "loss"])
            .counts(30, 18, 9)
            .responses(11)
            .time(BASE_TIME - 3_600)
            .build(),
        StoryBuilder::new()
            .id(3)
            .title("Panic at the grocery store")
            .category(3, "Anxiety")
            .hashtags(&["panic"])
            .counts(5, 2, 1)
            .time(BASE_TIME - 7_200)
            .build(),
        StoryBuilder::new()
            .id(4)
            .title("One year sober")
            .category(1, "Recovery")
            .author("Sam")
            .hashtags(&["sobriety", "milestone"])
            .counts(44, 20, 31)
            .responses(8)
            .time(BASE_TIME - 10_800)
            .build(),
        StoryBuilder::new()
            .id(5)
            .title("Untitled thoughts")
            .time(BASE_TIME - 14_400)
            .build(),
    ]
}
