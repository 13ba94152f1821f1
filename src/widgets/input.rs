use unicode_width::UnicodeWidthStr;

/// Append-only single field editor. The cursor always sits at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_chars: usize) -> Self {
        Self {
            value: String::new(),
            max_chars: Some(max_chars),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn push(&mut self, c: char) {
        if c.is_control() && c != '\n' {
            return;
        }
        if self
            .max_chars
            .is_some_and(|max| self.value.chars().count() >= max)
        {
            return;
        }
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn set(&mut self, value: &str) {
        self.value.clear();
        value.chars().for_each(|c| self.push(c));
    }

    /// The last `width` columns of the value, for single-line display.
    pub fn tail(&self, width: usize) -> &str {
        let mut start = self.value.len();
        for (idx, _) in self.value.char_indices().rev() {
            if self.value[idx..].width() > width {
                break;
            }
            start = idx;
        }
        &self.value[start..]
    }
}
