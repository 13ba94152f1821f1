use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Mode};
use crate::help::{form_help, keymap_for};
use crate::views::common::{centered_rect, dim_background, error_line, field_lines, popup};
use crate::widgets::TextInput;
use crate::wizard::{ShareWizard, WizardField, WizardStage};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(wizard) = &app.wizard else {
        return;
    };
    let theme = &app.theme;
    dim_background(frame, area);

    let popup_area = centered_rect(76.min(area.width.saturating_sub(4)), 20, area);
    let inner = popup(frame, "Share your story", theme, popup_area);
    let chunks = Layout::vertical([
        Constraint::Length(2), // Stage
        Constraint::Min(0),    // Fields
        Constraint::Length(1), // Help
    ])
    .split(inner);

    let stage = match wizard.stage {
        WizardStage::Basic => "Step 1 of 2: Your story",
        WizardStage::Detail => "Step 2 of 2: Reflection",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(stage, theme.dim_style()))),
        chunks[0],
    );

    let mut lines = Vec::new();
    for field in wizard.stage.fields() {
        let focused = wizard.focused() == *field;
        match field {
            WizardField::Category => lines.extend(category_lines(app, wizard, focused)),
            _ => {
                if let Some(input) = input_for(wizard, *field) {
                    lines.extend(field_lines(field.label(), input, focused, inner.width, theme));
                }
            }
        }
    }
    if let Some(error) = error_line(wizard.error.as_deref(), theme) {
        lines.push(Line::from(""));
        lines.push(error);
    }
    if wizard.submitting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Sharing...", theme.dim_style())));
    }
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    let help = form_help(Mode::Wizard).format(&keymap_for(Mode::Wizard), true);
    frame.render_widget(Paragraph::new(help).style(theme.dim_style()), chunks[2]);
}

fn input_for(wizard: &ShareWizard, field: WizardField) -> Option<&TextInput> {
    match field {
        WizardField::Title => Some(&wizard.title),
        WizardField::Category => None,
        WizardField::Content => Some(&wizard.content),
        WizardField::Hashtags => Some(&wizard.hashtags),
        WizardField::Pseudonym => Some(&wizard.pseudonym),
        WizardField::HealingProcess => Some(&wizard.healing_process),
        WizardField::NextSteps => Some(&wizard.next_steps),
    }
}

fn category_lines(app: &App, wizard: &ShareWizard, focused: bool) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let label_style = if focused {
        theme.active_tab_style()
    } else {
        theme.dim_style()
    };
    let marker = if focused { "▸ " } else { "  " };
    let value = match wizard.category.and_then(|id| app.category_name(id)) {
        Some(name) => Span::styled(
            format!("◀ {name} ▶"),
            Style::default().fg(theme.foreground),
        ),
        None => Span::styled("◀ choose a category ▶", theme.dim_style()),
    };
    vec![
        Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(WizardField::Category.label(), label_style),
        ]),
        Line::from(vec![Span::raw("  "), value]),
    ]
}
