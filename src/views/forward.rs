use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Mode};
use crate::forward::{ForwardField, ForwardMode, ForwardSession};
use crate::help::{form_help, keymap_for};
use crate::views::common::{centered_rect, dim_background, error_line, field_lines, popup};
use crate::widgets::TextInput;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = &app.forward else {
        return;
    };
    let theme = &app.theme;
    dim_background(frame, area);

    let popup_area = centered_rect(72.min(area.width.saturating_sub(4)), 17, area);
    let inner = popup(frame, "Forward story", theme, popup_area);
    let chunks = Layout::vertical([
        Constraint::Length(3), // Story and mode
        Constraint::Min(0),    // Fields
        Constraint::Length(1), // Help
    ])
    .split(inner);

    let tab = |mode: ForwardMode, label: &'static str| {
        if session.mode == mode {
            Span::styled(format!("[{label}]"), theme.active_tab_style())
        } else {
            Span::styled(format!(" {label} "), theme.dim_style())
        }
    };
    let header = vec![
        Line::from(Span::raw(session.story_title.clone())),
        Line::from(vec![
            tab(ForwardMode::Link, "Share link"),
            Span::raw(" "),
            tab(ForwardMode::Email, "Email"),
        ]),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let mut lines = Vec::new();
    for field in session.mode.fields() {
        lines.extend(field_lines(
            field.label(),
            input_for(session, *field),
            session.focused() == *field,
            inner.width,
            theme,
        ));
    }
    if session.mode == ForwardMode::Link
        && let Some(url) = session.share_url()
    {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Link: ", theme.dim_style()),
            Span::raw(url.to_string()),
        ]));
    }
    if let Some(error) = error_line(session.error.as_deref(), theme) {
        lines.push(Line::from(""));
        lines.push(error);
    }
    if session.busy {
        lines.push(Line::from(""));
        let text = match session.mode {
            ForwardMode::Link => "Creating link...",
            ForwardMode::Email => "Sending...",
        };
        lines.push(Line::from(Span::styled(text, theme.dim_style())));
    }
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    let help = form_help(Mode::Forward).format(&keymap_for(Mode::Forward), true);
    frame.render_widget(Paragraph::new(help).style(theme.dim_style()), chunks[2]);
}

fn input_for(session: &ForwardSession, field: ForwardField) -> &TextInput {
    match field {
        ForwardField::Recipient => &session.recipient,
        ForwardField::SenderName => &session.sender_name,
        ForwardField::Message => &session.message,
    }
}
