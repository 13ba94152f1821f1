//! Notification inbox panel, docked to the right of the feed.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::app::App;
use crate::time::format_relative;

const PANEL_WIDTH: u16 = 48;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.notifications.visible {
        return;
    }
    let theme = &app.theme;
    let width = PANEL_WIDTH.min(area.width);
    let panel = Rect::new(area.x + area.width - width, area.y, width, area.height);
    frame.render_widget(Clear, panel);

    let now = app.clock.now();
    let text_width = usize::from(width.saturating_sub(4));
    let items: Vec<ListItem> = if app.notifications.items().is_empty() {
        vec![ListItem::new(Span::styled(
            "Nothing new. You're all caught up.",
            theme.dim_style(),
        ))]
    } else {
        app.notifications
            .items()
            .iter()
            .map(|n| {
                let (marker, message_style) = if n.is_read {
                    ("  ", theme.dim_style())
                } else {
                    (
                        "● ",
                        Style::default()
                            .fg(theme.foreground)
                            .add_modifier(Modifier::BOLD),
                    )
                };
                let wrap_width = text_width.saturating_sub(2).max(10);
                let mut lines: Vec<Line> = textwrap::wrap(&n.message, wrap_width)
                    .into_iter()
                    .enumerate()
                    .map(|(i, part)| {
                        let lead = if i == 0 { marker } else { "  " };
                        Line::from(vec![
                            Span::styled(lead, Style::default().fg(theme.reaction)),
                            Span::styled(part.into_owned(), message_style),
                        ])
                    })
                    .collect();
                let mut meta = format!("  {}", format_relative(n.created_at, now));
                if let Some(title) = &n.story_title {
                    meta.push_str(&format!(" · {title}"));
                }
                lines.push(Line::from(Span::styled(meta, theme.dim_style())));
                ListItem::new(lines)
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(format!(" Notifications ({} unread) ", app.notifications.unread()))
                .title_style(theme.active_tab_style()),
        )
        .highlight_style(theme.selection_style());

    let mut state = ListState::default();
    if !app.notifications.items().is_empty() {
        state.select(Some(app.notifications.selected));
    }
    frame.render_stateful_widget(list, panel, &mut state);
}
