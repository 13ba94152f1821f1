use crate::api::{Notification, NotificationFeed};

/// Local mirror of the server's notification list and unread counter.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    unread: u32,
    pub visible: bool,
    pub selected: usize,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a poll result wholesale.
    pub fn replace(&mut self, feed: NotificationFeed) {
        self.items = feed.notifications;
        self.unread = feed.unread_count;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    pub fn selected_item(&self) -> Option<&Notification> {
        self.items.get(self.selected)
    }

    /// Flips one notification to read. Returns false when `id` is unknown.
    /// The counter only drops for a notification that was unread.
    pub fn mark_read(&mut self, id: u64) -> bool {
        let Some(item) = self.items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if !item.is_read {
            item.is_read = true;
            self.unread = self.unread.saturating_sub(1);
        }
        true
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.is_read = true;
        }
        self.unread = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
