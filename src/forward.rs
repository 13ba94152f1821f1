//! Forwarding a story outside the community, by share link or by email.

use crate::api::{EmailForward, ShareLinkRequest, Story};
use crate::widgets::TextInput;

pub const MISSING_RECIPIENT_MESSAGE: &str = "Please enter a recipient email address";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    Link,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardField {
    Recipient,
    SenderName,
    Message,
}

impl ForwardField {
    pub fn label(&self) -> &'static str {
        match self {
            ForwardField::Recipient => "Recipient email *",
            ForwardField::SenderName => "Your name",
            ForwardField::Message => "Personal message",
        }
    }
}

impl ForwardMode {
    pub fn fields(&self) -> &'static [ForwardField] {
        match self {
            ForwardMode::Link => &[ForwardField::SenderName, ForwardField::Message],
            ForwardMode::Email => &[
                ForwardField::Recipient,
                ForwardField::SenderName,
                ForwardField::Message,
            ],
        }
    }
}

/// What submitting the session should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardPlan {
    CopyCached(String),
    CreateLink(ShareLinkRequest),
    SendEmail(EmailForward),
}

#[derive(Debug, Clone)]
pub struct ForwardSession {
    pub story_id: u64,
    pub story_title: String,
    pub mode: ForwardMode,
    focus: usize,
    pub recipient: TextInput,
    pub sender_name: TextInput,
    pub message: TextInput,
    share_url: Option<String>,
    pub busy: bool,
    pub error: Option<String>,
}

fn non_blank(input: &TextInput) -> Option<String> {
    (!input.is_blank()).then(|| input.trimmed().to_string())
}

impl ForwardSession {
    /// A fresh session: link mode, every field empty, no cached URL.
    pub fn open(story: &Story) -> Self {
        Self {
            story_id: story.id,
            story_title: story.title.clone(),
            mode: ForwardMode::Link,
            focus: 0,
            recipient: TextInput::with_limit(254),
            sender_name: TextInput::with_limit(50),
            message: TextInput::with_limit(500),
            share_url: None,
            busy: false,
            error: None,
        }
    }

    pub fn share_url(&self) -> Option<&str> {
        self.share_url.as_deref()
    }

    pub fn cache_url(&mut self, url: String) {
        self.share_url = Some(url);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ForwardMode::Link => ForwardMode::Email,
            ForwardMode::Email => ForwardMode::Link,
        };
        self.focus = 0;
        self.error = None;
    }

    pub fn focused(&self) -> ForwardField {
        let fields = self.mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.mode.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.mode.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focused() {
            ForwardField::Recipient => &mut self.recipient,
            ForwardField::SenderName => &mut self.sender_name,
            ForwardField::Message => &mut self.message,
        }
    }

    pub fn input(&mut self, c: char) {
        self.focused_input().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_input().backspace();
    }

    pub fn plan(&self) -> Result<ForwardPlan, &'static str> {
        match self.mode {
            ForwardMode::Link => Ok(match &self.share_url {
                Some(url) => ForwardPlan::CopyCached(url.clone()),
                None => ForwardPlan::CreateLink(ShareLinkRequest {
                    shared_by: non_blank(&self.sender_name),
                    personal_message: non_blank(&self.message),
                }),
            }),
            ForwardMode::Email => {
                let recipient_email = non_blank(&self.recipient).ok_or(MISSING_RECIPIENT_MESSAGE)?;
                Ok(ForwardPlan::SendEmail(EmailForward {
                    recipient_email,
                    sender_name: non_blank(&self.sender_name),
                    personal_message: non_blank(&self.message),
                }))
            }
        }
    }
}
