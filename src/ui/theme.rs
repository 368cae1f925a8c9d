use ratatui::style::{Color, Modifier, Style};

use crate::core::projection::Highlight;

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Transcript
    pub user_label_style: Style,
    pub user_text_style: Style,
    pub assistant_label_style: Style,
    pub assistant_text_style: Style,
    pub endpoint_badge_style: Style,
    pub condition_style: Style,
    pub entity_style: Style,
    pub reasoning_style: Style,
    pub loading_style: Style,

    // Chrome
    pub title_style: Style,
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,
    pub panel_heading_style: Style,
    pub panel_text_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub placeholder_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        let indigo = Color::Rgb(0x81, 0x8c, 0xf8);
        let amber = Color::Rgb(0xfb, 0xbf, 0x24);
        Theme {
            background_color: Color::Rgb(0x0a, 0x0a, 0x0c),

            user_label_style: Style::default().fg(indigo).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::White),
            assistant_label_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            endpoint_badge_style: Style::default().fg(amber),
            condition_style: Style::default().fg(amber).add_modifier(Modifier::BOLD),
            entity_style: Style::default().fg(Color::Rgb(0x60, 0xa5, 0xfa)),
            reasoning_style: Style::default()
                .fg(Color::Rgb(0x34, 0xd3, 0x99))
                .add_modifier(Modifier::ITALIC),
            loading_style: Style::default().fg(indigo),

            title_style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            tab_active_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x4f, 0x46, 0xe5)),
            tab_inactive_style: Style::default().fg(Color::DarkGray),
            panel_heading_style: Style::default()
                .fg(Color::Rgb(0xc0, 0x84, 0xfc))
                .add_modifier(Modifier::BOLD),
            panel_text_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(indigo),
            input_title_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }

    /// Attribute-only theme for terminals where color is unwanted.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            background_color: Color::Reset,

            user_label_style: bold,
            user_text_style: plain,
            assistant_label_style: bold,
            assistant_text_style: plain,
            endpoint_badge_style: plain,
            condition_style: plain,
            entity_style: plain,
            reasoning_style: Style::default().add_modifier(Modifier::ITALIC),
            loading_style: plain,

            title_style: bold,
            tab_active_style: Style::default().add_modifier(Modifier::REVERSED),
            tab_inactive_style: plain,
            panel_heading_style: bold,
            panel_text_style: plain,
            input_border_style: plain,
            input_title_style: plain,

            input_text_style: plain,
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Honors the `NO_COLOR` convention.
    pub fn from_env() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(value) if !value.is_empty() => Self::monochrome(),
            _ => Self::dark_default(),
        }
    }

    pub fn highlight_style(&self, highlight: &Highlight) -> Style {
        match highlight {
            Highlight::Condition(_) => self.condition_style,
            Highlight::Entity { .. } => self.entity_style,
            Highlight::Reasoning(_) => self.reasoning_style,
        }
    }
}
