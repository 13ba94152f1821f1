use tracing::warn;

pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// The desktop clipboard, opened on first use. Headless sessions (no
/// display server) fail here and fall back to showing the text.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().map_err(|e| e.to_string())?);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err("clipboard unavailable".into());
        };
        clipboard.set_text(text).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard refused; the text must be shown for manual selection.
    Manual(String),
}

pub fn copy_with_fallback(clipboard: &mut dyn Clipboard, text: &str) -> CopyOutcome {
    match clipboard.set_text(text) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => {
            warn!(error = %e, "clipboard unavailable, showing text instead");
            CopyOutcome::Manual(text.to_string())
        }
    }
}
