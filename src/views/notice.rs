use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::views::common::{centered_rect, dim_background, popup};

/// A blocking message; any of Enter, Esc, or Space dismisses it.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };
    let theme = &app.theme;
    dim_background(frame, area);

    let body_width = notice.body.as_deref().map_or(0, UnicodeWidthStr::width);
    let width = (notice.title.width().max(body_width) as u16 + 6)
        .clamp(30, area.width.saturating_sub(4).max(30));
    let popup_area = centered_rect(width, 8, area);
    let title = if notice.is_error { "Error" } else { "Notice" };
    let inner = popup(frame, title, theme, popup_area);

    let title_style = if notice.is_error {
        theme.error_style()
    } else {
        theme.success_style()
    };
    let mut lines = vec![Line::from(Span::styled(notice.title.clone(), title_style))];
    if let Some(body) = &notice.body {
        lines.push(Line::from(""));
        lines.push(Line::from(body.clone()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Enter to dismiss", theme.dim_style())));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
