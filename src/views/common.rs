use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::theme::Theme;
use crate::widgets::TextInput;

/// Full-page error with the retry hint.
pub fn render_error(frame: &mut Frame, error: &str, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(error.to_string(), theme.error_style())),
        Line::from(""),
        Line::from(Span::styled("Press r to retry", theme.dim_style())),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Dims everything already drawn in `area` so a popup stands out.
pub fn dim_background(frame: &mut Frame, area: Rect) {
    let buf = frame.buffer_mut();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = &mut buf[(x, y)];
            cell.set_style(cell.style().add_modifier(Modifier::DIM));
        }
    }
}

/// Clears `area` and draws an empty bordered popup, returning its inner area.
pub fn popup(frame: &mut Frame, title: &str, theme: &Theme, area: Rect) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" {title} "))
        .title_style(theme.active_tab_style())
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// A labelled single-line field. The focused field shows a cursor and the
/// tail of its value so typing stays visible.
pub fn field_lines(
    label: &str,
    input: &TextInput,
    focused: bool,
    width: u16,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let label_style = if focused {
        theme.active_tab_style()
    } else {
        theme.dim_style()
    };
    let marker = if focused { "▸ " } else { "  " };
    let cursor = if focused { "█" } else { "" };
    let text_width = usize::from(width).saturating_sub(3);
    vec![
        Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(label.to_string(), label_style),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                input.tail(text_width).to_string(),
                Style::default().fg(theme.foreground),
            ),
            Span::styled(cursor, Style::default().fg(theme.primary)),
        ]),
    ]
}

/// A one-line inline error, or nothing.
pub fn error_line(error: Option<&str>, theme: &Theme) -> Option<Line<'static>> {
    error.map(|e| Line::from(Span::styled(e.to_string(), theme.error_style())))
}
