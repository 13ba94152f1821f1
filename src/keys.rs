use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::ReactionKind;
use crate::app::{App, Message, Mode};

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "S-Tab".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else if mods.contains(KeyModifiers::ALT) {
        format!("M-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys available whenever no dialog holds focus.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
}

fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::ToggleHelp)
}

fn notice_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::DismissNotice)
        .bind(KeyCode::Esc, Message::DismissNotice)
        .bind(KeyCode::Char(' '), Message::DismissNotice)
        .bind_ctrl(KeyCode::Char('c'), Message::DismissNotice)
}

fn navigation_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::SelectNext)
        .bind(KeyCode::Down, Message::SelectNext)
        .bind(KeyCode::Char('k'), Message::SelectPrev)
        .bind(KeyCode::Up, Message::SelectPrev)
}

/// Feed keybindings.
pub fn feed_keymap() -> Keymap {
    navigation_keymap()
        .bind(KeyCode::Char('g'), Message::SelectFirst)
        .bind(KeyCode::Char('G'), Message::SelectLast)
        .bind_ctrl(KeyCode::Char('d'), Message::PageDown)
        .bind_ctrl(KeyCode::Char('u'), Message::PageUp)
        .bind(KeyCode::Char('l'), Message::ToggleComments)
        .bind(KeyCode::Enter, Message::ToggleComments)
        .bind(KeyCode::Char('1'), Message::React(ReactionKind::Heart))
        .bind(KeyCode::Char('2'), Message::React(ReactionKind::Hug))
        .bind(KeyCode::Char('3'), Message::React(ReactionKind::Strength))
        .bind(KeyCode::Char('c'), Message::StartComment)
        .bind(KeyCode::Char('C'), Message::StartReply)
        .bind(KeyCode::Char('H'), Message::PrevCategory)
        .bind(KeyCode::Char('L'), Message::NextCategory)
        .bind(KeyCode::Char('/'), Message::StartSearch)
        .bind(KeyCode::Char('#'), Message::SearchHashtag)
        .bind(KeyCode::Char('x'), Message::ClearFilters)
        .bind(KeyCode::Char('n'), Message::ToggleNotifications)
        .bind(KeyCode::Char('s'), Message::OpenShareWizard)
        .bind(KeyCode::Char('f'), Message::OpenForward)
        .bind(KeyCode::Char('r'), Message::Refresh)
}

/// Notification panel keybindings.
pub fn notifications_keymap() -> Keymap {
    navigation_keymap()
        .bind(KeyCode::Enter, Message::MarkNotificationRead)
        .bind(KeyCode::Char('m'), Message::MarkNotificationRead)
        .bind(KeyCode::Char('M'), Message::MarkAllNotificationsRead)
        .bind(KeyCode::Char('o'), Message::OpenNotificationStory)
        .bind(KeyCode::Char('n'), Message::ToggleNotifications)
        .bind(KeyCode::Esc, Message::ToggleNotifications)
}

/// Editing keys shared by every form. Printable characters fall through
/// to [`Message::Input`] in [`handle_key`].
pub fn form_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Esc, Message::Cancel)
        .bind_ctrl(KeyCode::Char('c'), Message::Cancel)
        .bind(KeyCode::Enter, Message::Submit)
        .bind(KeyCode::Backspace, Message::Backspace)
        .bind(KeyCode::Tab, Message::NextField)
        .bind(KeyCode::Down, Message::NextField)
        .bind(KeyCode::BackTab, Message::PrevField)
        .bind(KeyCode::Up, Message::PrevField)
}

pub fn wizard_keymap() -> Keymap {
    form_keymap()
        .bind(KeyCode::Right, Message::NextOption)
        .bind(KeyCode::Left, Message::PrevOption)
        .bind_ctrl(KeyCode::Char('b'), Message::Back)
}

pub fn forward_keymap() -> Keymap {
    form_keymap().bind_ctrl(KeyCode::Char('t'), Message::ToggleForwardMode)
}

fn search_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Esc, Message::Cancel)
        .bind(KeyCode::Enter, Message::Submit)
        .bind(KeyCode::Backspace, Message::Backspace)
}

fn text_entry(key: &KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(Message::Input(c))
        }
        _ => None,
    }
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    let form = match app.mode() {
        Mode::Notice => return notice_keymap().get(&key),
        Mode::Help => return help_overlay_keymap().get(&key),
        Mode::Wizard => wizard_keymap(),
        Mode::Forward => forward_keymap(),
        Mode::Compose => form_keymap(),
        Mode::Search => search_keymap(),
        Mode::Notifications => {
            return global_keymap().extend(notifications_keymap()).get(&key);
        }
        Mode::Feed => return global_keymap().extend(feed_keymap()).get(&key),
    };
    form.get(&key).or_else(|| text_entry(&key))
}
