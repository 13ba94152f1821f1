use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::api::{Comment, ReactionCounts, ReactionKind, Story};
use crate::app::{App, Mode, Row, ThreadStatus};
use crate::help::status_help;
use crate::theme::Theme;
use crate::time::format_relative;
use crate::views::common::render_error;
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Category tabs
        Constraint::Min(0),    // Feed
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_header(frame, app, chunks[0]);
    render_rows(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let tab = |label: String, active: bool| {
        let style = if active {
            theme.active_tab_style()
        } else {
            theme.dim_style()
        };
        [Span::styled(label, style), Span::raw("  ")]
    };

    let mut spans: Vec<Span> = tab("All".to_string(), app.category_filter.is_none()).into();
    for category in &app.categories {
        spans.extend(tab(
            category.name.clone(),
            app.category_filter == Some(category.id),
        ));
    }

    if app.searching || !app.query.value().is_empty() {
        let cursor = if app.searching { "█" } else { "" };
        spans.push(Span::styled("/", theme.dim_style()));
        spans.push(Span::styled(
            format!("{}{cursor}", app.query.value()),
            Style::default().fg(theme.foreground),
        ));
        spans.push(Span::raw("  "));
    }

    if app.load.should_show_spinner() {
        spans.push(Span::styled(
            spinner_frame(app.load.loading_start),
            Style::default().fg(theme.spinner),
        ));
    }

    let unread = app.notifications.unread();
    let badge = if unread > 0 {
        Span::styled(
            format!(" 🔔 {unread} "),
            Style::default()
                .fg(theme.status_bar_fg)
                .bg(theme.reaction)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" 🔔 0 ", theme.dim_style())
    };
    let badge_width = badge.width() as u16;
    let chunks =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(badge_width)]).split(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    frame.render_widget(Paragraph::new(Line::from(badge)), chunks[1]);
}

fn render_rows(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(err) = &app.load.error {
        render_error(frame, err, theme, area);
        return;
    }

    let now = app.clock.now();
    // Borders and the highlight symbol.
    let text_width = usize::from(area.width.saturating_sub(4));
    let rows = app.rows();
    let items: Vec<ListItem> = if rows.is_empty() && !app.load.loading {
        vec![ListItem::new(Line::from(Span::styled(
            empty_message(app),
            theme.dim_style(),
        )))]
    } else {
        rows.iter()
            .map(|row| match row {
                Row::Story(story) => story_item(story, theme, now),
                Row::Comment { comment, reply } => {
                    comment_item(comment, *reply, text_width, theme, now)
                }
                Row::Thread { status, .. } => thread_status_item(*status, theme),
            })
            .collect()
    };

    let title = match app.category_filter.and_then(|id| app.category_name(id)) {
        Some(name) => format!(" {name} "),
        None => " Stories ".to_string(),
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .highlight_style(theme.selection_style())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn empty_message(app: &App) -> &'static str {
    if app.stories.is_empty() {
        "No stories yet. Press s to share yours."
    } else {
        "No stories match the current filters. Press x to clear them."
    }
}

fn reaction_spans(counts: ReactionCounts, theme: &Theme) -> Vec<Span<'static>> {
    ReactionKind::all()
        .iter()
        .flat_map(|kind| {
            [
                Span::styled(
                    format!("{} {}", kind.symbol(), counts.get(*kind)),
                    Style::default().fg(theme.reaction),
                ),
                Span::raw("  "),
            ]
        })
        .collect()
}

fn story_item(story: &Story, theme: &Theme, now: DateTime<Utc>) -> ListItem<'static> {
    let mut title = Vec::new();
    if story.trigger_warning {
        title.push(Span::styled("⚠ ", theme.error_style()));
    }
    title.push(Span::styled(
        story.title.clone(),
        Style::default()
            .fg(theme.story_title)
            .add_modifier(Modifier::BOLD),
    ));

    let mut meta = vec![Span::raw("  ")];
    if let Some(category) = &story.category {
        meta.push(Span::styled(
            category.name.clone(),
            Style::default().fg(theme.category_color(category.color.as_deref())),
        ));
        meta.push(Span::raw(" · "));
    }
    meta.push(Span::styled(
        story.author().to_string(),
        Style::default().fg(theme.story_author),
    ));
    meta.push(Span::raw(" · "));
    meta.push(Span::styled(
        format_relative(story.created_at, now),
        Style::default().fg(theme.story_time),
    ));
    for tag in &story.hashtags {
        meta.push(Span::styled(
            format!(" #{tag}"),
            Style::default().fg(theme.hashtag),
        ));
    }

    let mut reactions = vec![Span::raw("  ")];
    reactions.extend(reaction_spans(story.counts(), theme));
    reactions.push(Span::styled(
        format!("💬 {}", story.response_count),
        theme.dim_style(),
    ));

    ListItem::new(vec![
        Line::from(title),
        Line::from(meta),
        Line::from(reactions),
    ])
}

fn comment_item(
    comment: &Comment,
    reply: bool,
    width: usize,
    theme: &Theme,
    now: DateTime<Utc>,
) -> ListItem<'static> {
    let indent = if reply { "    │ " } else { "  │ " };
    let rail = Style::default().fg(theme.reply_rail);
    let body_width = width.saturating_sub(indent.width()).max(10);

    let mut lines = vec![Line::from(vec![
        Span::styled(indent, rail),
        Span::styled(
            comment.author().to_string(),
            Style::default().fg(theme.story_author),
        ),
        Span::styled(
            format!(" · {}", format_relative(comment.created_at, now)),
            Style::default().fg(theme.story_time),
        ),
    ])];

    for wrapped in textwrap::wrap(&comment.content, body_width) {
        lines.push(Line::from(vec![
            Span::styled(indent, rail),
            Span::styled(
                wrapped.into_owned(),
                Style::default().fg(theme.comment_text),
            ),
        ]));
    }

    let mut reactions = vec![Span::styled(indent, rail)];
    reactions.extend(reaction_spans(comment.reaction_counts, theme));
    lines.push(Line::from(reactions));

    ListItem::new(lines)
}

fn thread_status_item(status: ThreadStatus, theme: &Theme) -> ListItem<'static> {
    let text = match status {
        ThreadStatus::Loading => "Loading comments...",
        ThreadStatus::Empty => "No comments yet. Press c to add one.",
        ThreadStatus::Unavailable => "Comments unavailable. Press Enter twice to retry.",
    };
    ListItem::new(Line::from(vec![
        Span::styled("  │ ", Style::default().fg(theme.reply_rail)),
        Span::styled(text, theme.dim_style()),
    ]))
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let label = app
        .category_filter
        .and_then(|id| app.category_name(id))
        .unwrap_or("All");
    let mode = app.mode();
    let help_text = status_help(mode, mode != Mode::Feed);
    let total = app.rows().len();

    let mut bar = StatusBar::new(&app.theme).label(label).help(&help_text);
    if app.load.loading {
        bar = bar.loading("Loading...");
    }
    if total > 0 {
        bar = bar.position(app.selected_index + 1, total);
    }
    bar.render(frame, area);
}
