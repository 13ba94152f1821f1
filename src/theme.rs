//! Terminal colors.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub primary: Color,
    pub success: Color,
    pub error: Color,
    pub story_title: Color,
    pub story_author: Color,
    pub story_time: Color,
    pub reaction: Color,
    pub hashtag: Color,
    pub comment_text: Color,
    pub reply_rail: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Color::Rgb(0xe6, 0xe1, 0xd6),
            foreground_dim: Color::Rgb(0x8a, 0x85, 0x7a),
            border: Color::Rgb(0x4a, 0x5a, 0x4c),
            selection_bg: Color::Rgb(0x2e, 0x3b, 0x30),
            primary: Color::Rgb(0x7f, 0xb0, 0x69),
            success: Color::Rgb(0x8f, 0xc9, 0x7a),
            error: Color::Rgb(0xe0, 0x6c, 0x60),
            story_title: Color::Rgb(0xf2, 0xee, 0xe5),
            story_author: Color::Rgb(0xc9, 0xa2, 0x6b),
            story_time: Color::Rgb(0x8a, 0x85, 0x7a),
            reaction: Color::Rgb(0xe8, 0x8b, 0x9a),
            hashtag: Color::Rgb(0x7a, 0xa6, 0xc2),
            comment_text: Color::Rgb(0xd8, 0xd3, 0xc8),
            reply_rail: Color::Rgb(0x5f, 0x7a, 0x61),
            status_bar_bg: Color::Rgb(0x4a, 0x7c, 0x59),
            status_bar_fg: Color::Rgb(0xf2, 0xee, 0xe5),
            spinner: Color::Rgb(0xc9, 0xa2, 0x6b),
        }
    }
}

impl Theme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn active_tab_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    /// A category's own color when the server sent a usable one.
    pub fn category_color(&self, hex: Option<&str>) -> Color {
        hex.and_then(parse_hex).unwrap_or(self.primary)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() == 6
        && hex.is_ascii()
        && let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        )
    {
        return Some(Color::Rgb(r, g, b));
    }
    None
}
