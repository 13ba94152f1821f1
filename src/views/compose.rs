use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Mode};
use crate::compose::ComposeField;
use crate::help::{form_help, keymap_for};
use crate::views::common::{centered_rect, field_lines, popup};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(draft) = &app.compose else {
        return;
    };
    let theme = &app.theme;

    let title = match &draft.replying_to {
        Some(author) => format!("Reply to {author}"),
        None => "Add a comment".to_string(),
    };
    let popup_area = centered_rect(70.min(area.width.saturating_sub(4)), 11, area);
    let inner = popup(frame, &title, theme, popup_area);
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);

    let mut lines = Vec::new();
    lines.extend(field_lines(
        "Your comment *",
        &draft.content,
        draft.focus == ComposeField::Content,
        inner.width,
        theme,
    ));
    lines.push(Line::from(""));
    lines.extend(field_lines(
        "Pseudonym (optional)",
        &draft.pseudonym,
        draft.focus == ComposeField::Pseudonym,
        inner.width,
        theme,
    ));
    if draft.submitting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Posting...", theme.dim_style())));
    }
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let help = form_help(Mode::Compose).format(&keymap_for(Mode::Compose), true);
    frame.render_widget(Paragraph::new(help).style(theme.dim_style()), chunks[1]);
}
