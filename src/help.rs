//! Dynamic help text generation from keymaps.

use crate::api::ReactionKind;
use crate::app::{Message, Mode};
use crate::keys::{
    Keymap, feed_keymap, form_keymap, format_key, forward_keymap, global_keymap,
    notifications_keymap, wizard_keymap,
};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Create a help item for paired actions (e.g., j/k for next/prev).
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    pub fn group(messages: Vec<Message>, label: &'static str) -> Self {
        Self { messages, label }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        (!keys.is_empty()).then(|| keys.join("/"))
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap).map(|keys| format!("{}:{}", keys, self.label))
    }

    /// Returns (`keys_string`, label) or None if no keys are bound.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    pub expanded: Vec<HelpItem>,
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn reactions() -> Vec<Message> {
    ReactionKind::all()
        .iter()
        .map(|kind| Message::React(*kind))
        .collect()
}

pub fn feed_help() -> HelpConfig {
    use Message::{
        NextCategory, OpenForward, OpenShareWizard, PrevCategory, Quit, SelectNext, SelectPrev,
        StartComment, StartSearch, ToggleComments, ToggleHelp, ToggleNotifications,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::new(ToggleComments, "thread"),
            HelpItem::group(reactions(), "react"),
            HelpItem::new(StartComment, "comment"),
            HelpItem::pair(PrevCategory, NextCategory, "category"),
            HelpItem::new(StartSearch, "search"),
            HelpItem::new(ToggleNotifications, "inbox"),
            HelpItem::new(OpenShareWizard, "share"),
            HelpItem::new(OpenForward, "forward"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
        compact: vec![
            HelpItem::group(reactions(), "react"),
            HelpItem::new(StartComment, "comment"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

pub fn notifications_help() -> HelpConfig {
    use Message::{
        MarkAllNotificationsRead, MarkNotificationRead, OpenNotificationStory, SelectNext,
        SelectPrev, ToggleNotifications,
    };
    let items = || {
        vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::new(MarkNotificationRead, "read"),
            HelpItem::new(MarkAllNotificationsRead, "all read"),
            HelpItem::new(OpenNotificationStory, "open"),
            HelpItem::new(ToggleNotifications, "close"),
        ]
    };
    HelpConfig {
        expanded: items(),
        compact: items(),
    }
}

/// Help shared by the comment, wizard, and forward forms, plus the keys
/// only one of them binds.
pub fn form_help(mode: Mode) -> HelpConfig {
    use Message::{
        Back, Cancel, NextField, NextOption, PrevField, PrevOption, Submit, ToggleForwardMode,
    };
    let submit_label = if mode == Mode::Wizard {
        "next/submit"
    } else {
        "submit"
    };
    let mut expanded = vec![
        HelpItem::pair(NextField, PrevField, "field"),
        HelpItem::new(Submit, submit_label),
        HelpItem::new(Cancel, "cancel"),
    ];
    match mode {
        Mode::Wizard => {
            expanded.push(HelpItem::pair(PrevOption, NextOption, "category"));
            expanded.push(HelpItem::new(Back, "back"));
        }
        Mode::Forward => expanded.push(HelpItem::new(ToggleForwardMode, "link/email")),
        _ => {}
    }
    HelpConfig {
        compact: vec![
            HelpItem::new(Submit, submit_label),
            HelpItem::new(Cancel, "cancel"),
        ],
        expanded,
    }
}

/// The keymap a mode's help text is rendered against.
pub fn keymap_for(mode: Mode) -> Keymap {
    match mode {
        Mode::Wizard => wizard_keymap(),
        Mode::Forward => forward_keymap(),
        Mode::Compose | Mode::Search => form_keymap(),
        Mode::Notifications => global_keymap().extend(notifications_keymap()),
        Mode::Feed | Mode::Help | Mode::Notice => global_keymap().extend(feed_keymap()),
    }
}

/// Status bar help text for the current mode.
pub fn status_help(mode: Mode, show_expanded: bool) -> String {
    let config = match mode {
        Mode::Notifications => notifications_help(),
        Mode::Wizard | Mode::Forward | Mode::Compose | Mode::Search => form_help(mode),
        Mode::Feed | Mode::Help | Mode::Notice => feed_help(),
    };
    config.format(&keymap_for(mode), show_expanded)
}

/// Everything the feed can do, for the help overlay.
pub fn feed_overlay_items() -> Vec<HelpItem> {
    use Message::{
        ClearFilters, NextCategory, OpenForward, OpenShareWizard, PageDown, PageUp, PrevCategory,
        Quit, Refresh, SearchHashtag, SelectFirst, SelectLast, SelectNext, SelectPrev,
        StartComment, StartReply, StartSearch, ToggleComments, ToggleDebug, ToggleHelp,
        ToggleNotifications,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page"),
        HelpItem::new(ToggleComments, "show/hide comments"),
        HelpItem::new(Message::React(ReactionKind::Heart), "heart"),
        HelpItem::new(Message::React(ReactionKind::Hug), "hug"),
        HelpItem::new(Message::React(ReactionKind::Strength), "strength"),
        HelpItem::new(StartComment, "comment on story"),
        HelpItem::new(StartReply, "reply to comment"),
        HelpItem::pair(PrevCategory, NextCategory, "switch category"),
        HelpItem::new(StartSearch, "search"),
        HelpItem::new(SearchHashtag, "search first hashtag"),
        HelpItem::new(ClearFilters, "clear filters"),
        HelpItem::new(ToggleNotifications, "notifications"),
        HelpItem::new(OpenShareWizard, "share your story"),
        HelpItem::new(OpenForward, "forward story"),
        HelpItem::new(Refresh, "reload"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
