use crate::api::{CommentTarget, NewComment};
use crate::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Content,
    Pseudonym,
}

/// An in-progress comment or reply.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub target: CommentTarget,
    /// Display name of the comment being replied to.
    pub replying_to: Option<String>,
    pub content: TextInput,
    pub pseudonym: TextInput,
    pub focus: ComposeField,
    pub submitting: bool,
}

impl CommentDraft {
    pub fn comment(story_id: u64) -> Self {
        Self::new(CommentTarget::Story { story_id }, None)
    }

    pub fn reply(story_id: u64, parent_id: u64, parent_author: &str) -> Self {
        Self::new(
            CommentTarget::Reply {
                story_id,
                parent_id,
            },
            Some(parent_author.to_string()),
        )
    }

    fn new(target: CommentTarget, replying_to: Option<String>) -> Self {
        Self {
            target,
            replying_to,
            content: TextInput::with_limit(2000),
            pseudonym: TextInput::with_limit(50),
            focus: ComposeField::Content,
            submitting: false,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ComposeField::Content => ComposeField::Pseudonym,
            ComposeField::Pseudonym => ComposeField::Content,
        };
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            ComposeField::Content => &mut self.content,
            ComposeField::Pseudonym => &mut self.pseudonym,
        }
    }

    pub fn input(&mut self, c: char) {
        self.focused_input().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_input().backspace();
    }

    /// `None` while the content is blank.
    pub fn request(&self) -> Option<NewComment> {
        NewComment::from_draft(self.content.value(), self.pseudonym.value())
    }
}
