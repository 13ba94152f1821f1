use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{
    ApiError, Category, Comment, CommentTarget, GroveClient, NotificationFeed, ReactionCounts,
    ReactionKind, ReactionTarget, Story,
};
use crate::clipboard::{Clipboard, CopyOutcome, copy_with_fallback};
use crate::compose::CommentDraft;
use crate::filter::filter_stories;
use crate::forward::{ForwardPlan, ForwardSession};
use crate::notifications::NotificationCenter;
use crate::theme::Theme;
use crate::threads::{Expansion, ThreadCache};
use crate::time::Clock;
use crate::widgets::TextInput;
use crate::wizard::{ShareWizard, WizardField, WizardStage};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load data. Please try again.";

#[derive(Debug, Clone)]
pub enum AsyncResult {
    InitialData {
        generation: u64,
        task_id: u64,
        categories: Result<Vec<Category>, ApiError>,
        stories: Result<Vec<Story>, ApiError>,
    },
    Comments {
        story_id: u64,
        task_id: u64,
        result: Result<Vec<Comment>, ApiError>,
    },
    Reaction {
        target: ReactionTarget,
        task_id: u64,
        result: Result<ReactionCounts, ApiError>,
    },
    CommentSubmitted {
        target: CommentTarget,
        task_id: u64,
        result: Result<(), ApiError>,
    },
    Notifications {
        task_id: u64,
        result: Result<NotificationFeed, ApiError>,
    },
    NotificationAck {
        task_id: u64,
        result: Result<(), ApiError>,
    },
    StorySubmitted {
        task_id: u64,
        result: Result<(), ApiError>,
    },
    ShareLink {
        story_id: u64,
        task_id: u64,
        result: Result<String, ApiError>,
    },
    EmailForwarded {
        story_id: u64,
        task_id: u64,
        result: Result<Option<String>, ApiError>,
    },
    /// Sent by the notification poller.
    PollTick,
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages. Everything logged here
/// also goes to the log file.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        let message = msg.into();
        debug!(target: "grove::tasks", "{message}");
        self.log.push_back(LogEntry { message });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        self.log(format!("Started: {}", desc));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// Initial load state. The error, once set, blocks the feed until a retry.
#[derive(Debug, Default)]
pub struct LoadState {
    pub loading: bool,
    pub loading_start: Option<Instant>,
    pub error: Option<String>,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.loading_start = Some(Instant::now());
        }
        // loading_start is kept after completion for the minimum spinner time
    }

    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: std::time::Duration = std::time::Duration::from_millis(500);
        if let Some(start) = self.loading_start {
            self.loading || start.elapsed() < MIN_SPINNER_DURATION
        } else {
            false
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }
}

/// A blocking message the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: Option<String>,
    pub is_error: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            is_error: false,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            is_error: true,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    Loading,
    Empty,
    Unavailable,
}

/// One line of the feed: a story, or a piece of an expanded thread under it.
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    Story(&'a Story),
    Comment {
        comment: &'a Comment,
        reply: bool,
    },
    Thread {
        story_id: u64,
        status: ThreadStatus,
    },
}

impl Row<'_> {
    pub fn story_id(&self) -> u64 {
        match self {
            Row::Story(story) => story.id,
            Row::Comment { comment, .. } => comment.story_id,
            Row::Thread { story_id, .. } => *story_id,
        }
    }
}

/// Which surface currently owns the keyboard, topmost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Notice,
    Help,
    Wizard,
    Forward,
    Compose,
    Search,
    Notifications,
    Feed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    ToggleComments,
    React(ReactionKind),
    StartComment,
    StartReply,
    NextCategory,
    PrevCategory,
    StartSearch,
    ClearFilters,
    ToggleNotifications,
    MarkNotificationRead,
    MarkAllNotificationsRead,
    OpenNotificationStory,
    SearchHashtag,
    OpenShareWizard,
    OpenForward,
    ToggleForwardMode,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    NextOption,
    PrevOption,
    Submit,
    Cancel,
    Back,
    DismissNotice,
    Refresh,
    Quit,
    ToggleHelp,
    ToggleDebug,
}

pub struct App {
    pub categories: Vec<Category>,
    pub stories: Vec<Story>,
    pub threads: ThreadCache,
    pub notifications: NotificationCenter,
    pub category_filter: Option<u64>,
    pub query: TextInput,
    pub searching: bool,
    pub selected_index: usize,
    pub load: LoadState,
    pub should_quit: bool,
    pub help_overlay: bool,
    pub compose: Option<CommentDraft>,
    pub wizard: Option<ShareWizard>,
    pub forward: Option<ForwardSession>,
    pub notice: Option<Notice>,
    pub client: GroveClient,
    pub clipboard: Box<dyn Clipboard>,
    pub theme: Theme,
    pub clock: Arc<dyn Clock>,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    pub generation: u64,
    notifications_in_flight: bool,
    // Debug pane
    pub debug: DebugState,
}

impl App {
    pub fn new(client: GroveClient, clipboard: Box<dyn Clipboard>) -> Self {
        let (result_tx, result_rx) = mpsc::channel(10);
        Self {
            categories: Vec::new(),
            stories: Vec::new(),
            threads: ThreadCache::new(),
            notifications: NotificationCenter::new(),
            category_filter: None,
            query: TextInput::with_limit(100),
            searching: false,
            selected_index: 0,
            load: LoadState::new(),
            should_quit: false,
            help_overlay: false,
            compose: None,
            wizard: None,
            forward: None,
            notice: None,
            client,
            clipboard,
            theme: Theme::default(),
            clock: crate::time::system_clock(),
            result_tx,
            result_rx,
            generation: 0,
            notifications_in_flight: false,
            debug: DebugState::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.notice.is_some() {
            Mode::Notice
        } else if self.help_overlay {
            Mode::Help
        } else if self.wizard.is_some() {
            Mode::Wizard
        } else if self.forward.is_some() {
            Mode::Forward
        } else if self.compose.is_some() {
            Mode::Compose
        } else if self.searching {
            Mode::Search
        } else if self.notifications.visible {
            Mode::Notifications
        } else {
            Mode::Feed
        }
    }

    pub fn visible_stories(&self) -> Vec<&Story> {
        filter_stories(&self.stories, self.category_filter, self.query.value())
    }

    /// The flattened feed: each visible story followed by its thread when
    /// expanded. Replies are only ever one level deep.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::new();
        for story in self.visible_stories() {
            rows.push(Row::Story(story));
            if !self.threads.is_expanded(story.id) {
                continue;
            }
            let story_id = story.id;
            match self.threads.comments(story_id) {
                Some([]) => rows.push(Row::Thread {
                    story_id,
                    status: ThreadStatus::Empty,
                }),
                Some(comments) => {
                    for comment in comments {
                        rows.push(Row::Comment {
                            comment,
                            reply: false,
                        });
                        rows.extend(comment.replies.iter().map(|reply| Row::Comment {
                            comment: reply,
                            reply: true,
                        }));
                    }
                }
                None => rows.push(Row::Thread {
                    story_id,
                    status: if self.threads.is_loading(story_id) {
                        ThreadStatus::Loading
                    } else {
                        ThreadStatus::Unavailable
                    },
                }),
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<Row<'_>> {
        self.rows().get(self.selected_index).copied()
    }

    pub fn category_name(&self, id: u64) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::InitialData {
                generation,
                task_id,
                categories,
                stories,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                // A well-formed `success: false` leaves the collection empty
                // but is not treated as a load failure.
                let failed = [categories.as_ref().err(), stories.as_ref().err()]
                    .into_iter()
                    .flatten()
                    .any(|e| !e.is_rejection());
                self.debug
                    .end_task(task_id, if failed { "failed" } else { "completed" });

                self.categories = categories.unwrap_or_else(|e| {
                    warn!(error = %e, "failed to load categories");
                    Vec::new()
                });
                self.stories = stories.unwrap_or_else(|e| {
                    warn!(error = %e, "failed to load stories");
                    Vec::new()
                });
                self.load.set_loading(false);
                if failed {
                    self.load.set_error(LOAD_ERROR_MESSAGE);
                }
                self.clamp_selection();
            }
            AsyncResult::Comments {
                story_id,
                task_id,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(comments) => self.threads.store(story_id, comments),
                    Err(e) => {
                        warn!(story_id, error = %e, "failed to load comments");
                        self.debug.log(format!("Comments for {story_id}: {e}"));
                        self.threads.fetch_failed(story_id);
                    }
                }
                self.clamp_selection();
            }
            AsyncResult::Reaction {
                target,
                task_id,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(counts) => self.apply_reaction_counts(target, counts),
                    Err(e) => {
                        warn!(?target, error = %e, "reaction failed");
                        self.debug.log(format!("Reaction failed: {e}"));
                    }
                }
            }
            AsyncResult::CommentSubmitted {
                target,
                task_id,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(()) => {
                        if self.compose.as_ref().is_some_and(|c| c.target == target) {
                            self.compose = None;
                        }
                        let story_id = target.story_id();
                        self.threads.begin_refetch(story_id);
                        self.threads.expand(story_id);
                        self.spawn_comments_fetch(story_id);
                    }
                    Err(e) => {
                        warn!(?target, error = %e, "comment submission failed");
                        self.debug.log(format!("Comment failed: {e}"));
                        if let Some(draft) = self.compose.as_mut() {
                            draft.submitting = false;
                        }
                    }
                }
            }
            AsyncResult::Notifications { task_id, result } => {
                self.notifications_in_flight = false;
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(feed) => self.notifications.replace(feed),
                    Err(e) => {
                        warn!(error = %e, "notification poll failed");
                        self.debug.log(format!("Notifications: {e}"));
                    }
                }
            }
            AsyncResult::NotificationAck { task_id, result } => {
                self.debug.end_task(task_id, outcome(&result));
                if let Err(e) = result {
                    warn!(error = %e, "marking notifications read failed");
                }
            }
            AsyncResult::StorySubmitted { task_id, result } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(()) => {
                        self.wizard = None;
                        self.load_initial_data();
                    }
                    Err(e) => {
                        warn!(error = %e, "story submission failed");
                        if let Some(wizard) = self.wizard.as_mut() {
                            wizard.submitting = false;
                            wizard.error = Some(e.user_message());
                        }
                    }
                }
            }
            AsyncResult::ShareLink {
                story_id,
                task_id,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                let session = self.forward.as_mut().filter(|s| s.story_id == story_id);
                match result {
                    Ok(url) => {
                        let Some(session) = session else {
                            self.debug.log("Share link arrived after dialog closed");
                            return;
                        };
                        session.busy = false;
                        session.cache_url(url.clone());
                        self.copy_link(&url);
                    }
                    Err(e) => {
                        if let Some(session) = session {
                            session.busy = false;
                        }
                        warn!(story_id, error = %e, "share link failed");
                        self.notice = Some(if e.is_rejection() {
                            Notice::error("Failed to create share link")
                        } else {
                            Notice::error("Error creating share link")
                        });
                    }
                }
            }
            AsyncResult::EmailForwarded {
                story_id,
                task_id,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(message) => {
                        if self.forward.as_ref().is_some_and(|s| s.story_id == story_id) {
                            self.forward = None;
                        }
                        let notice = Notice::info("Story forwarded successfully via email!");
                        self.notice = Some(match message {
                            Some(body) => notice.with_body(body),
                            None => notice,
                        });
                    }
                    Err(e) => {
                        if let Some(session) = self.forward.as_mut().filter(|s| s.story_id == story_id)
                        {
                            session.busy = false;
                        }
                        warn!(story_id, error = %e, "email forward failed");
                        self.notice = Some(match e {
                            ApiError::Rejected(reason) => {
                                Notice::error(format!("Failed to send email: {reason}"))
                            }
                            other => Notice::error("Error sending email").with_body(other.to_string()),
                        });
                    }
                }
            }
            AsyncResult::PollTick => self.refresh_notifications(),
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::SelectNext => self.select_next(),
            Message::SelectPrev => self.select_prev(),
            Message::SelectFirst => self.selected_index = 0,
            Message::SelectLast => self.selected_index = self.rows().len().saturating_sub(1),
            Message::PageDown => {
                let last = self.rows().len().saturating_sub(1);
                self.selected_index = (self.selected_index + 10).min(last);
            }
            Message::PageUp => self.selected_index = self.selected_index.saturating_sub(10),
            Message::ToggleComments => self.toggle_comments(),
            Message::React(kind) => self.react(kind),
            Message::StartComment => self.start_comment(),
            Message::StartReply => self.start_reply(),
            Message::NextCategory => self.cycle_category(true),
            Message::PrevCategory => self.cycle_category(false),
            Message::StartSearch => self.searching = true,
            Message::ClearFilters => {
                self.category_filter = None;
                self.query.clear();
                self.selected_index = 0;
            }
            Message::ToggleNotifications => {
                self.notifications.visible = !self.notifications.visible;
            }
            Message::MarkNotificationRead => self.mark_selected_notification_read(),
            Message::MarkAllNotificationsRead => self.mark_all_notifications_read(),
            Message::OpenNotificationStory => self.open_notification_story(),
            Message::SearchHashtag => self.search_hashtag(),
            Message::OpenShareWizard => self.wizard = Some(ShareWizard::new()),
            Message::OpenForward => self.open_forward(),
            Message::ToggleForwardMode => {
                if let Some(session) = self.forward.as_mut()
                    && !session.busy
                {
                    session.toggle_mode();
                }
            }
            Message::Input(c) => self.input(c),
            Message::Backspace => self.backspace(),
            Message::NextField => self.cycle_field(true),
            Message::PrevField => self.cycle_field(false),
            Message::NextOption => self.cycle_option(true),
            Message::PrevOption => self.cycle_option(false),
            Message::Submit => self.submit(),
            Message::Cancel => self.cancel(),
            Message::Back => {
                if let Some(wizard) = self.wizard.as_mut()
                    && !wizard.submitting
                {
                    wizard.back();
                }
            }
            Message::DismissNotice => self.notice = None,
            Message::Refresh => self.load_initial_data(),
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => self.help_overlay = !self.help_overlay,
            Message::ToggleDebug => self.debug.toggle(),
        }
    }

    fn select_next(&mut self) {
        if self.mode() == Mode::Notifications {
            self.notifications.select_next();
            return;
        }
        let count = self.rows().len();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }

    fn select_prev(&mut self) {
        if self.mode() == Mode::Notifications {
            self.notifications.select_prev();
            return;
        }
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.rows().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    fn toggle_comments(&mut self) {
        let Some(story_id) = self.selected_row().map(|r| r.story_id()) else {
            return;
        };
        match self.threads.toggle(story_id) {
            Expansion::Expanded { needs_fetch: true } => self.spawn_comments_fetch(story_id),
            Expansion::Expanded { needs_fetch: false } => {}
            Expansion::Collapsed => {
                // Keep the cursor on the story whose thread just folded away.
                if let Some(idx) = self
                    .rows()
                    .iter()
                    .position(|r| matches!(r, Row::Story(s) if s.id == story_id))
                {
                    self.selected_index = idx;
                }
            }
        }
    }

    fn react(&mut self, kind: ReactionKind) {
        let target = match self.selected_row() {
            Some(Row::Story(story)) => ReactionTarget::Story(story.id),
            Some(Row::Comment { comment, .. }) => ReactionTarget::Comment(comment.id),
            _ => return,
        };
        self.spawn(
            format!("React {} on {:?}", kind.label(), target),
            move |client, task_id| async move {
                let result = client.toggle_reaction(target, kind).await;
                AsyncResult::Reaction {
                    target,
                    task_id,
                    result,
                }
            },
        );
    }

    fn apply_reaction_counts(&mut self, target: ReactionTarget, counts: ReactionCounts) {
        match target {
            ReactionTarget::Story(id) => {
                if let Some(story) = self.stories.iter_mut().find(|s| s.id == id) {
                    story.set_counts(counts);
                }
            }
            ReactionTarget::Comment(id) => {
                if !self.threads.apply_reaction_counts(id, counts) {
                    debug!(comment_id = id, "reaction counts for uncached comment");
                }
            }
        }
    }

    fn start_comment(&mut self) {
        if let Some(story_id) = self.selected_row().map(|r| r.story_id()) {
            self.compose = Some(CommentDraft::comment(story_id));
        }
    }

    /// Replies attach to top-level comments only.
    fn start_reply(&mut self) {
        if let Some(Row::Comment {
            comment,
            reply: false,
        }) = self.selected_row()
        {
            self.compose = Some(CommentDraft::reply(
                comment.story_id,
                comment.id,
                comment.author(),
            ));
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        if self.categories.is_empty() {
            return;
        }
        let ids: Vec<Option<u64>> = std::iter::once(None)
            .chain(self.categories.iter().map(|c| Some(c.id)))
            .collect();
        let current = ids
            .iter()
            .position(|id| *id == self.category_filter)
            .unwrap_or(0);
        let len = ids.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.category_filter = ids[next];
        self.selected_index = 0;
    }

    fn open_forward(&mut self) {
        let story_id = match self.selected_row() {
            Some(row) => row.story_id(),
            None => return,
        };
        if let Some(story) = self.stories.iter().find(|s| s.id == story_id) {
            self.forward = Some(ForwardSession::open(story));
        }
    }

    fn input(&mut self, c: char) {
        match self.mode() {
            Mode::Wizard => {
                if let Some(wizard) = self.wizard.as_mut().filter(|w| !w.submitting) {
                    wizard.input(c);
                }
            }
            Mode::Forward => {
                if let Some(session) = self.forward.as_mut().filter(|s| !s.busy) {
                    session.input(c);
                }
            }
            Mode::Compose => {
                if let Some(draft) = self.compose.as_mut().filter(|d| !d.submitting) {
                    draft.input(c);
                }
            }
            Mode::Search => {
                self.query.push(c);
                self.selected_index = 0;
            }
            _ => {}
        }
    }

    fn backspace(&mut self) {
        match self.mode() {
            Mode::Wizard => {
                if let Some(wizard) = self.wizard.as_mut().filter(|w| !w.submitting) {
                    wizard.backspace();
                }
            }
            Mode::Forward => {
                if let Some(session) = self.forward.as_mut().filter(|s| !s.busy) {
                    session.backspace();
                }
            }
            Mode::Compose => {
                if let Some(draft) = self.compose.as_mut().filter(|d| !d.submitting) {
                    draft.backspace();
                }
            }
            Mode::Search => {
                self.query.backspace();
                self.selected_index = 0;
            }
            _ => {}
        }
    }

    fn cycle_field(&mut self, forward: bool) {
        match self.mode() {
            Mode::Wizard => {
                if let Some(wizard) = self.wizard.as_mut() {
                    if forward {
                        wizard.next_field();
                    } else {
                        wizard.prev_field();
                    }
                }
            }
            Mode::Forward => {
                if let Some(session) = self.forward.as_mut() {
                    if forward {
                        session.next_field();
                    } else {
                        session.prev_field();
                    }
                }
            }
            Mode::Compose => {
                if let Some(draft) = self.compose.as_mut() {
                    draft.toggle_focus();
                }
            }
            _ => {}
        }
    }

    fn cycle_option(&mut self, forward: bool) {
        if let Some(wizard) = self.wizard.as_mut()
            && wizard.focused() == WizardField::Category
            && !wizard.submitting
        {
            wizard.cycle_category(&self.categories, forward);
        }
    }

    fn submit(&mut self) {
        match self.mode() {
            Mode::Notice => self.notice = None,
            Mode::Wizard => self.submit_wizard(),
            Mode::Forward => self.submit_forward(),
            Mode::Compose => self.submit_comment(),
            Mode::Search => self.searching = false,
            _ => {}
        }
    }

    fn cancel(&mut self) {
        match self.mode() {
            Mode::Notice => self.notice = None,
            Mode::Help => self.help_overlay = false,
            Mode::Wizard => self.wizard = None,
            Mode::Forward => self.forward = None,
            Mode::Compose => self.compose = None,
            Mode::Search => {
                self.searching = false;
                self.query.clear();
                self.selected_index = 0;
            }
            Mode::Notifications => self.notifications.visible = false,
            Mode::Feed => {}
        }
    }

    fn submit_wizard(&mut self) {
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        if wizard.submitting {
            return;
        }
        if wizard.stage == WizardStage::Basic {
            // Validation failures stay on the form as an inline error.
            let _ = wizard.advance();
            return;
        }
        let Some(story) = wizard.submission() else {
            return;
        };
        wizard.submitting = true;
        wizard.error = None;
        self.spawn("Share story", move |client, task_id| async move {
            let result = client.create_story(&story).await;
            AsyncResult::StorySubmitted { task_id, result }
        });
    }

    fn submit_forward(&mut self) {
        let Some(session) = self.forward.as_mut() else {
            return;
        };
        if session.busy {
            return;
        }
        let plan = match session.plan() {
            Ok(plan) => plan,
            Err(msg) => {
                session.error = Some(msg.to_string());
                return;
            }
        };
        session.error = None;
        let story_id = session.story_id;
        match plan {
            ForwardPlan::CopyCached(url) => self.copy_link(&url),
            ForwardPlan::CreateLink(request) => {
                session.busy = true;
                self.spawn(
                    format!("Create share link for {story_id}"),
                    move |client, task_id| async move {
                        let result = client.create_share_link(story_id, &request).await;
                        AsyncResult::ShareLink {
                            story_id,
                            task_id,
                            result,
                        }
                    },
                );
            }
            ForwardPlan::SendEmail(forward) => {
                session.busy = true;
                self.spawn(
                    format!("Email story {story_id}"),
                    move |client, task_id| async move {
                        let result = client.forward_email(story_id, &forward).await;
                        AsyncResult::EmailForwarded {
                            story_id,
                            task_id,
                            result,
                        }
                    },
                );
            }
        }
    }

    fn copy_link(&mut self, url: &str) {
        self.notice = Some(match copy_with_fallback(self.clipboard.as_mut(), url) {
            CopyOutcome::Copied => Notice::info("Link copied to clipboard!").with_body(url),
            CopyOutcome::Manual(url) => {
                Notice::info("Clipboard unavailable, copy this link").with_body(url)
            }
        });
    }

    fn submit_comment(&mut self) {
        let Some(draft) = self.compose.as_mut() else {
            return;
        };
        if draft.submitting {
            return;
        }
        let Some(comment) = draft.request() else {
            return;
        };
        draft.submitting = true;
        let target = draft.target;
        self.spawn(
            format!("Post comment on {}", target.story_id()),
            move |client, task_id| async move {
                let result = client.submit_comment(target, &comment).await;
                AsyncResult::CommentSubmitted {
                    target,
                    task_id,
                    result,
                }
            },
        );
    }

    fn mark_selected_notification_read(&mut self) {
        let Some(id) = self.notifications.selected_item().map(|n| n.id) else {
            return;
        };
        if !self.notifications.mark_read(id) {
            return;
        }
        self.spawn(
            format!("Mark notification {id} read"),
            move |client, task_id| async move {
                let result = client.mark_notification_read(id).await;
                AsyncResult::NotificationAck { task_id, result }
            },
        );
    }

    /// Marks the selected notification read, closes the panel, and selects
    /// the story it points at. Filters hiding that story are cleared.
    fn open_notification_story(&mut self) {
        let Some(story_id) = self.notifications.selected_item().and_then(|n| n.story_id) else {
            return;
        };
        self.mark_selected_notification_read();
        self.notifications.visible = false;

        let known = self.stories.iter().any(|s| s.id == story_id);
        let shown = self.visible_stories().iter().any(|s| s.id == story_id);
        if known && !shown {
            self.category_filter = None;
            self.query.clear();
        }
        if let Some(idx) = self
            .rows()
            .iter()
            .position(|row| matches!(row, Row::Story(s) if s.id == story_id))
        {
            self.selected_index = idx;
        }
    }

    /// Searches by the first hashtag of the story under the cursor.
    fn search_hashtag(&mut self) {
        let Some(tag) = self
            .selected_row()
            .and_then(|row| self.stories.iter().find(|s| s.id == row.story_id()))
            .and_then(|story| story.hashtags.first().cloned())
        else {
            return;
        };
        self.query.set(&tag);
        self.selected_index = 0;
    }

    fn mark_all_notifications_read(&mut self) {
        self.notifications.mark_all_read();
        self.spawn(
            "Mark all notifications read",
            move |client, task_id| async move {
                let result = client.mark_all_notifications_read().await;
                AsyncResult::NotificationAck { task_id, result }
            },
        );
    }

    /// Loads categories and stories together. Bumps the generation so an
    /// older load still in flight is discarded.
    pub fn load_initial_data(&mut self) {
        self.generation += 1;
        self.load.set_loading(true);
        self.load.clear_error();
        self.threads.clear();
        let generation = self.generation;
        self.spawn("Load stories", move |client, task_id| async move {
            let (categories, stories) =
                tokio::join!(client.fetch_categories(), client.fetch_stories());
            AsyncResult::InitialData {
                generation,
                task_id,
                categories,
                stories,
            }
        });
    }

    pub fn refresh_notifications(&mut self) {
        if self.notifications_in_flight {
            return;
        }
        self.notifications_in_flight = true;
        self.spawn("Poll notifications", move |client, task_id| async move {
            let result = client.fetch_notifications().await;
            AsyncResult::Notifications { task_id, result }
        });
    }

    fn spawn_comments_fetch(&mut self, story_id: u64) {
        self.spawn(
            format!("Load comments for {story_id}"),
            move |client, task_id| async move {
                let result = client.fetch_comments(story_id).await;
                AsyncResult::Comments {
                    story_id,
                    task_id,
                    result,
                }
            },
        );
    }

    /// Runs `task` on the runtime and routes its result back to the UI loop.
    fn spawn<F, Fut>(&mut self, description: impl Into<String>, task: F)
    where
        F: FnOnce(GroveClient, u64) -> Fut,
        Fut: Future<Output = AsyncResult> + Send + 'static,
    {
        let task_id = self.debug.start_task(description);
        let fut = task(self.client.clone(), task_id);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await).await;
        });
    }
}

fn outcome<T>(result: &Result<T, ApiError>) -> &'static str {
    if result.is_ok() { "completed" } else { "failed" }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::test_utils::{
        CommentBuilder, NotificationBuilder, StoryBuilder, TestAppBuilder, sample_categories,
        sample_stories,
    };
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    async fn next_result(app: &mut App) {
        let result = app.result_rx.recv().await.unwrap();
        app.handle_async_result(result);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(Message::Input(c));
        }
    }

    fn story_json(id: u64, heart: u32) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Story {id}"),
            "category": {"id": 1, "name": "Recovery"},
            "heart_count": heart,
            "created_at": "2023-11-14T22:13:20"
        })
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.update(Message::SelectPrev);
        assert_eq!(app.selected_index, 0);
        app.update(Message::SelectLast);
        assert_eq!(app.selected_index, 4);
        app.update(Message::SelectNext);
        assert_eq!(app.selected_index, 4);
        app.update(Message::PageUp);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn rows_include_expanded_threads() {
        let reply = CommentBuilder::new().id(11).story(1).parent(10).build();
        let top = CommentBuilder::new().id(10).story(1).replies(vec![reply]).build();
        let app = TestAppBuilder::new()
            .with_stories(sample_stories())
            .with_comments(1, vec![top])
            .with_comments(2, vec![])
            .build();

        let rows = app.rows();
        assert_eq!(rows.len(), 5 + 3);
        assert!(matches!(rows[1], Row::Comment { reply: false, .. }));
        assert!(matches!(rows[2], Row::Comment { reply: true, .. }));
        assert!(matches!(
            rows[4],
            Row::Thread {
                story_id: 2,
                status: ThreadStatus::Empty
            }
        ));
    }

    #[test]
    fn filters_shape_rows_and_reset_selection() {
        let mut app = TestAppBuilder::new()
            .with_categories(sample_categories())
            .with_stories(sample_stories())
            .selected(3)
            .build();

        app.update(Message::NextCategory);
        assert_eq!(app.category_filter, Some(1));
        assert_eq!(app.selected_index, 0);
        assert!(app.visible_stories().iter().all(|s| s.category_id() == Some(1)));

        app.update(Message::PrevCategory);
        assert_eq!(app.category_filter, None);
        app.update(Message::PrevCategory);
        assert_eq!(app.category_filter, Some(3));

        app.update(Message::ClearFilters);
        assert_eq!(app.category_filter, None);
    }

    #[test]
    fn hashtag_search_uses_selected_story() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();

        // Story 1 has no hashtags.
        app.update(Message::SearchHashtag);
        assert!(app.query.value().is_empty());

        app.selected_index = 1;
        app.update(Message::SearchHashtag);
        assert_eq!(app.query.value(), "hope");
        assert_eq!(app.selected_index, 0);
        let ids: Vec<u64> = app.visible_stories().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn notification_without_story_stays_open() {
        let mut app = TestAppBuilder::new()
            .with_stories(sample_stories())
            .with_notifications(vec![NotificationBuilder::new().id(1).build()], 1)
            .build();
        app.update(Message::ToggleNotifications);
        app.update(Message::OpenNotificationStory);
        assert!(app.notifications.visible);
        assert_eq!(app.notifications.unread(), 1);
    }

    #[test]
    fn search_mode_captures_input() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.update(Message::StartSearch);
        assert_eq!(app.mode(), Mode::Search);
        type_text(&mut app, "hope");
        app.update(Message::Submit);
        assert_eq!(app.mode(), Mode::Feed);
        assert_eq!(app.query.value(), "hope");
        assert_eq!(app.visible_stories().len(), 2);

        app.update(Message::StartSearch);
        app.update(Message::Cancel);
        assert!(app.query.value().is_empty());
    }

    #[test]
    fn reply_only_offered_on_top_level_comments() {
        let reply = CommentBuilder::new().id(11).story(1).parent(10).build();
        let top = CommentBuilder::new()
            .id(10)
            .story(1)
            .author("River")
            .replies(vec![reply])
            .build();
        let mut app = TestAppBuilder::new()
            .with_stories(sample_stories())
            .with_comments(1, vec![top])
            .build();

        app.selected_index = 0;
        app.update(Message::StartReply);
        assert!(app.compose.is_none());

        app.selected_index = 2;
        app.update(Message::StartReply);
        assert!(app.compose.is_none());

        assert_eq!(app.selected_row().unwrap().story_id(), 1);

        app.selected_index = 1;
        app.update(Message::StartReply);
        let draft = app.compose.as_ref().unwrap();
        assert_eq!(
            draft.target,
            CommentTarget::Reply {
                story_id: 1,
                parent_id: 10
            }
        );
        assert_eq!(draft.replying_to.as_deref(), Some("River"));
    }

    #[test]
    fn initial_load_failure_shows_error_page() {
        let mut app = TestAppBuilder::new().build();
        app.handle_async_result(AsyncResult::InitialData {
            generation: 0,
            task_id: 0,
            categories: Ok(sample_categories()),
            stories: Err(ApiError::Network("connection failed".into())),
        });
        assert_eq!(app.load.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert_eq!(app.categories.len(), 3);
        assert!(app.stories.is_empty());
    }

    #[test]
    fn rejected_load_leaves_collection_empty_without_error() {
        let mut app = TestAppBuilder::new().build();
        app.handle_async_result(AsyncResult::InitialData {
            generation: 0,
            task_id: 0,
            categories: Err(ApiError::Rejected("db busy".into())),
            stories: Ok(sample_stories()),
        });
        assert!(app.load.error.is_none());
        assert!(app.categories.is_empty());
        assert_eq!(app.stories.len(), 5);
    }

    #[test]
    fn stale_initial_load_is_discarded() {
        let mut app = TestAppBuilder::new().build();
        app.generation = 2;
        app.handle_async_result(AsyncResult::InitialData {
            generation: 1,
            task_id: 0,
            categories: Ok(vec![]),
            stories: Ok(sample_stories()),
        });
        assert!(app.stories.is_empty());
    }

    #[test]
    fn selection_clamps_when_rows_shrink() {
        let mut app = TestAppBuilder::new()
            .with_stories(sample_stories())
            .selected(4)
            .build();
        app.handle_async_result(AsyncResult::InitialData {
            generation: 0,
            task_id: 0,
            categories: Ok(vec![]),
            stories: Ok(vec![StoryBuilder::new().id(9).build()]),
        });
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn reaction_replaces_only_the_target() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        let before = app.stories[1].counts();
        let counts = ReactionCounts {
            heart: 9,
            hug: 8,
            strength: 7,
        };
        app.handle_async_result(AsyncResult::Reaction {
            target: ReactionTarget::Story(1),
            task_id: 0,
            result: Ok(counts),
        });
        assert_eq!(app.stories[0].counts(), counts);
        assert_eq!(app.stories[1].counts(), before);
    }

    #[test]
    fn reaction_failure_leaves_counts() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        let before = app.stories[0].counts();
        app.handle_async_result(AsyncResult::Reaction {
            target: ReactionTarget::Story(1),
            task_id: 0,
            result: Err(ApiError::Network("connection failed".into())),
        });
        assert_eq!(app.stories[0].counts(), before);
    }

    #[test]
    fn stale_notification_poll_overwrites_local_flip() {
        let mut app = TestAppBuilder::new()
            .with_notifications(vec![NotificationBuilder::new().id(1).build()], 1)
            .build();
        app.notifications.mark_read(1);
        app.handle_async_result(AsyncResult::Notifications {
            task_id: 0,
            result: Ok(NotificationFeed {
                notifications: vec![NotificationBuilder::new().id(1).build()],
                unread_count: 1,
            }),
        });
        assert_eq!(app.notifications.unread(), 1);
    }

    #[test]
    fn notification_failure_keeps_previous_state() {
        let mut app = TestAppBuilder::new()
            .with_notifications(vec![NotificationBuilder::new().id(1).build()], 1)
            .build();
        app.handle_async_result(AsyncResult::Notifications {
            task_id: 0,
            result: Err(ApiError::HttpStatus(500, "Internal Server Error".into())),
        });
        assert_eq!(app.notifications.unread(), 1);
        assert_eq!(app.notifications.items().len(), 1);
    }

    #[test]
    fn wizard_validation_stays_on_basic_stage() {
        let mut app = TestAppBuilder::new()
            .with_categories(sample_categories())
            .build();
        app.update(Message::OpenShareWizard);
        type_text(&mut app, "Title only");
        app.update(Message::Submit);

        let wizard = app.wizard.as_ref().unwrap();
        assert_eq!(wizard.stage, WizardStage::Basic);
        assert_eq!(
            wizard.error.as_deref(),
            Some(crate::wizard::REQUIRED_FIELDS_MESSAGE)
        );
    }

    #[test]
    fn wizard_walkthrough_reaches_detail_stage() {
        let mut app = TestAppBuilder::new()
            .with_categories(sample_categories())
            .build();
        app.update(Message::OpenShareWizard);
        type_text(&mut app, "Day 100");
        app.update(Message::NextField);
        app.update(Message::NextOption);
        app.update(Message::NextField);
        type_text(&mut app, "It got easier.");
        app.update(Message::Submit);

        let wizard = app.wizard.as_ref().unwrap();
        assert_eq!(wizard.stage, WizardStage::Detail);
        assert_eq!(wizard.category, Some(1));

        app.update(Message::Back);
        assert_eq!(app.wizard.as_ref().unwrap().stage, WizardStage::Basic);
        app.update(Message::Cancel);
        assert!(app.wizard.is_none());
    }

    #[test]
    fn failed_story_submission_keeps_draft() {
        let mut app = TestAppBuilder::new().build();
        let mut wizard = ShareWizard::new();
        wizard.title.set("t");
        wizard.category = Some(1);
        wizard.content.set("c");
        wizard.advance().unwrap();
        wizard.submitting = true;
        app.wizard = Some(wizard);

        app.handle_async_result(AsyncResult::StorySubmitted {
            task_id: 0,
            result: Err(ApiError::Rejected("Title too long".into())),
        });

        let wizard = app.wizard.as_ref().unwrap();
        assert!(!wizard.submitting);
        assert_eq!(wizard.stage, WizardStage::Detail);
        assert_eq!(wizard.title.value(), "t");
        assert_eq!(wizard.error.as_deref(), Some("Title too long"));
    }

    #[test]
    fn email_without_recipient_is_rejected_inline() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.update(Message::OpenForward);
        app.update(Message::ToggleForwardMode);
        app.update(Message::Submit);

        let session = app.forward.as_ref().unwrap();
        assert!(!session.busy);
        assert_eq!(
            session.error.as_deref(),
            Some(crate::forward::MISSING_RECIPIENT_MESSAGE)
        );
    }

    #[test]
    fn share_link_is_cached_and_copied() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.update(Message::OpenForward);
        app.forward.as_mut().unwrap().busy = true;

        app.handle_async_result(AsyncResult::ShareLink {
            story_id: 1,
            task_id: 0,
            result: Ok("http://grove/s/abc".into()),
        });

        let session = app.forward.as_ref().unwrap();
        assert!(!session.busy);
        assert_eq!(session.share_url(), Some("http://grove/s/abc"));
        assert_eq!(
            app.notice.as_ref().map(|n| n.title.as_str()),
            Some("Link copied to clipboard!")
        );

        // The cached link is reused without another request.
        app.update(Message::DismissNotice);
        app.update(Message::Submit);
        assert!(app.debug.running_tasks.is_empty());
        assert!(app.notice.is_some());
    }

    #[test]
    fn share_link_falls_back_to_manual_copy() {
        let mut app = TestAppBuilder::new()
            .with_stories(sample_stories())
            .broken_clipboard()
            .build();
        app.update(Message::OpenForward);
        app.handle_async_result(AsyncResult::ShareLink {
            story_id: 1,
            task_id: 0,
            result: Ok("http://grove/s/abc".into()),
        });
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.body.as_deref(), Some("http://grove/s/abc"));
        assert!(!notice.is_error);
    }

    #[test]
    fn email_failure_shows_server_reason() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.update(Message::OpenForward);
        app.handle_async_result(AsyncResult::EmailForwarded {
            story_id: 1,
            task_id: 0,
            result: Err(ApiError::Rejected("Valid recipient email required".into())),
        });
        let notice = app.notice.as_ref().unwrap();
        assert!(notice.is_error);
        assert_eq!(
            notice.title,
            "Failed to send email: Valid recipient email required"
        );
        assert!(app.forward.is_some());
    }

    #[test]
    fn email_success_closes_dialog() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.update(Message::OpenForward);
        app.handle_async_result(AsyncResult::EmailForwarded {
            story_id: 1,
            task_id: 0,
            result: Ok(Some("Story forwarded".into())),
        });
        assert!(app.forward.is_none());
        assert_eq!(
            app.notice.as_ref().map(|n| n.title.as_str()),
            Some("Story forwarded successfully via email!")
        );
        assert_eq!(app.mode(), Mode::Notice);
        app.update(Message::Submit);
        assert_eq!(app.mode(), Mode::Feed);
    }

    #[test]
    fn late_result_for_closed_dialog_is_harmless() {
        let mut app = TestAppBuilder::new().with_stories(sample_stories()).build();
        app.handle_async_result(AsyncResult::ShareLink {
            story_id: 1,
            task_id: 0,
            result: Ok("http://grove/s/abc".into()),
        });
        assert!(app.forward.is_none());
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn expanding_fetches_comments_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "comments": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .with_stories(sample_stories())
            .build();

        app.update(Message::ToggleComments);
        assert!(matches!(
            app.rows()[1],
            Row::Thread {
                status: ThreadStatus::Loading,
                ..
            }
        ));
        next_result(&mut app).await;
        assert_eq!(app.threads.comments(1).map(<[Comment]>::len), Some(0));

        for _ in 0..3 {
            app.update(Message::ToggleComments);
            app.update(Message::ToggleComments);
        }
        assert!(app.debug.running_tasks.is_empty());
    }

    #[tokio::test]
    async fn comment_on_story_posts_and_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories/42/comments"))
            .and(body_json(json!({"content": "Thank you for sharing"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "comment": {"id": 100}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stories/42/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "comments": [{
                    "id": 100,
                    "story_id": 42,
                    "content": "Thank you for sharing",
                    "pseudonym": "Anonymous",
                    "created_at": "2023-11-14T22:13:20",
                    "reaction_counts": {"heart": 0, "hug": 0, "strength": 0},
                    "replies": []
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .with_stories(vec![StoryBuilder::new().id(42).build()])
            .build();

        app.update(Message::StartComment);
        type_text(&mut app, "  Thank you for sharing  ");
        app.update(Message::Submit);
        assert!(app.compose.as_ref().unwrap().submitting);

        next_result(&mut app).await;
        assert!(app.compose.is_none());
        assert!(app.threads.is_expanded(42));

        next_result(&mut app).await;
        let comments = app.threads.comments(42).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "Thank you for sharing");
    }

    /// Answers reactions in arrival order: the first with 6 hearts right
    /// away, the second with 5 hearts after a pause.
    struct HeartReplies {
        seen: AtomicUsize,
    }

    impl Respond for HeartReplies {
        fn respond(&self, _request: &Request) -> ResponseTemplate {
            let (heart, delay) = match self.seen.fetch_add(1, Ordering::SeqCst) {
                0 => (6, 0),
                _ => (5, 200),
            };
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "success": true,
                    "reaction_counts": {"heart": heart, "hug": 0, "strength": 0}
                }))
                .set_delay(Duration::from_millis(delay))
        }
    }

    #[tokio::test]
    async fn double_heart_shows_second_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories/7/reactions"))
            .and(body_json(json!({"reaction_type": "heart"})))
            .respond_with(HeartReplies {
                seen: AtomicUsize::new(0),
            })
            .expect(2)
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .with_stories(vec![StoryBuilder::new().id(7).hearts(5).build()])
            .build();

        // Both presses go out before either answer comes back.
        app.update(Message::React(ReactionKind::Heart));
        app.update(Message::React(ReactionKind::Heart));
        assert_eq!(app.stories[0].heart_count, 5);
        assert_eq!(app.debug.running_tasks.len(), 2);

        next_result(&mut app).await;
        assert_eq!(app.stories[0].heart_count, 6);

        next_result(&mut app).await;
        assert_eq!(app.stories[0].heart_count, 5);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn initial_load_populates_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "categories": [{"id": 1, "name": "Recovery"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "stories": [story_json(1, 0), story_json(2, 3)]
            })))
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new().api_base(&server.uri()).build();
        app.load_initial_data();
        assert!(app.load.loading);
        next_result(&mut app).await;

        assert!(!app.load.loading);
        assert!(app.load.error.is_none());
        assert_eq!(app.categories.len(), 1);
        assert_eq!(app.stories.len(), 2);
    }

    #[tokio::test]
    async fn retry_after_failed_load_clears_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "categories": [],
                "stories": []
            })))
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .error(LOAD_ERROR_MESSAGE)
            .build();
        app.update(Message::Refresh);
        assert!(app.load.error.is_none());
        next_result(&mut app).await;
        assert!(app.load.error.is_none());
    }

    #[tokio::test]
    async fn mark_read_decrements_and_fires_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/notifications/1/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .with_notifications(
                vec![
                    NotificationBuilder::new().id(1).build(),
                    NotificationBuilder::new().id(2).build(),
                ],
                2,
            )
            .build();
        app.update(Message::ToggleNotifications);
        app.update(Message::MarkNotificationRead);
        assert_eq!(app.notifications.unread(), 1);
        next_result(&mut app).await;
        assert!(app.debug.running_tasks.is_empty());
    }

    #[tokio::test]
    async fn opening_notification_selects_hidden_story() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/notifications/1/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new()
            .api_base(&server.uri())
            .with_categories(sample_categories())
            .with_stories(sample_stories())
            .with_notifications(
                vec![
                    NotificationBuilder::new()
                        .id(1)
                        .story("One year sober")
                        .story_id(4)
                        .build(),
                ],
                1,
            )
            .build();
        app.category_filter = Some(2);
        app.update(Message::ToggleNotifications);
        app.update(Message::OpenNotificationStory);

        assert!(!app.notifications.visible);
        assert_eq!(app.notifications.unread(), 0);
        assert_eq!(app.category_filter, None);
        assert!(matches!(app.selected_row(), Some(Row::Story(s)) if s.id == 4));
        next_result(&mut app).await;
    }

    #[tokio::test]
    async fn poll_tick_does_not_stack_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "notifications": [],
                "unread_count": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = TestAppBuilder::new().api_base(&server.uri()).build();
        app.handle_async_result(AsyncResult::PollTick);
        app.handle_async_result(AsyncResult::PollTick);
        next_result(&mut app).await;
        assert_eq!(app.notifications.unread(), 3);
    }
}
