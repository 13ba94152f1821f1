//! Two-stage story submission draft.

use crate::api::{Category, NewStory};
use crate::widgets::TextInput;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const HEALING_QUESTION: &str = "What has helped you through the healing process?";
pub const NEXT_STEPS_QUESTION: &str = "What is next in your life and recovery?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    Basic,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardField {
    Title,
    Category,
    Content,
    Hashtags,
    Pseudonym,
    HealingProcess,
    NextSteps,
}

impl WizardField {
    pub fn label(&self) -> &'static str {
        match self {
            WizardField::Title => "Title *",
            WizardField::Category => "Category *",
            WizardField::Content => "Your story *",
            WizardField::Hashtags => "Hashtags",
            WizardField::Pseudonym => "Pseudonym",
            WizardField::HealingProcess => HEALING_QUESTION,
            WizardField::NextSteps => NEXT_STEPS_QUESTION,
        }
    }
}

impl WizardStage {
    pub fn fields(&self) -> &'static [WizardField] {
        match self {
            WizardStage::Basic => &[
                WizardField::Title,
                WizardField::Category,
                WizardField::Content,
                WizardField::Hashtags,
                WizardField::Pseudonym,
            ],
            WizardStage::Detail => &[WizardField::HealingProcess, WizardField::NextSteps],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShareWizard {
    pub stage: WizardStage,
    focus: usize,
    pub title: TextInput,
    pub category: Option<u64>,
    pub content: TextInput,
    pub hashtags: TextInput,
    pub pseudonym: TextInput,
    pub healing_process: TextInput,
    pub next_steps: TextInput,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for ShareWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareWizard {
    pub fn new() -> Self {
        Self {
            stage: WizardStage::Basic,
            focus: 0,
            title: TextInput::with_limit(200),
            category: None,
            content: TextInput::new(),
            hashtags: TextInput::new(),
            pseudonym: TextInput::with_limit(50),
            healing_process: TextInput::new(),
            next_steps: TextInput::new(),
            submitting: false,
            error: None,
        }
    }

    pub fn focused(&self) -> WizardField {
        let fields = self.stage.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.stage.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.stage.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused() {
            WizardField::Title => Some(&mut self.title),
            WizardField::Category => None,
            WizardField::Content => Some(&mut self.content),
            WizardField::Hashtags => Some(&mut self.hashtags),
            WizardField::Pseudonym => Some(&mut self.pseudonym),
            WizardField::HealingProcess => Some(&mut self.healing_process),
            WizardField::NextSteps => Some(&mut self.next_steps),
        }
    }

    pub fn input(&mut self, c: char) {
        if let Some(input) = self.focused_input() {
            input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.focused_input() {
            input.backspace();
        }
    }

    /// Steps the category selection through `categories`, wrapping, with
    /// "none selected" as the position before the first entry.
    pub fn cycle_category(&mut self, categories: &[Category], forward: bool) {
        if categories.is_empty() {
            return;
        }
        let len = categories.len() as isize;
        let current = self
            .category
            .and_then(|id| categories.iter().position(|c| c.id == id))
            .map_or(-1, |i| i as isize);
        let next = if forward {
            (current + 1).rem_euclid(len)
        } else if current <= 0 {
            len - 1
        } else {
            current - 1
        };
        self.category = Some(categories[next as usize].id);
    }

    /// Moves to the detail stage when title, category and content are
    /// present. No network I/O.
    pub fn advance(&mut self) -> Result<(), &'static str> {
        if self.stage != WizardStage::Basic {
            return Ok(());
        }
        if self.title.is_blank() || self.category.is_none() || self.content.is_blank() {
            self.error = Some(REQUIRED_FIELDS_MESSAGE.to_string());
            return Err(REQUIRED_FIELDS_MESSAGE);
        }
        self.error = None;
        self.stage = WizardStage::Detail;
        self.focus = 0;
        Ok(())
    }

    pub fn back(&mut self) {
        if self.stage == WizardStage::Detail {
            self.stage = WizardStage::Basic;
            self.focus = 0;
        }
    }

    /// The request body for the current draft, or `None` while it is not on
    /// the detail stage or lacks a category.
    pub fn submission(&self) -> Option<NewStory> {
        if self.stage != WizardStage::Detail {
            return None;
        }
        let pseudonym = self.pseudonym.trimmed();
        Some(NewStory {
            title: self.title.trimmed().to_string(),
            content: self.content.trimmed().to_string(),
            category_id: self.category?,
            hashtags: parse_hashtags(self.hashtags.value()),
            pseudonym: (!pseudonym.is_empty()).then(|| pseudonym.to_string()),
            healing_process: self.healing_process.trimmed().to_string(),
            next_steps: self.next_steps.trimmed().to_string(),
        })
    }
}

/// Splits on commas and whitespace, strips leading `#`, drops empties.
pub fn parse_hashtags(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(|tag| tag.trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
