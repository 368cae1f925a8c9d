use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::core::conversation::ConversationSnapshot;
use crate::core::message::Message;
use crate::core::modes::{Mode, ModeDescriptor};
use crate::core::projection::highlights_for;
use crate::ui::theme::Theme;

/// Everything the frame needs besides the input widget.
pub struct ViewModel<'a> {
    pub snapshot: &'a ConversationSnapshot,
    pub show_under_the_hood: bool,
    /// Lines scrolled up from the newest message; 0 follows the tail.
    pub scroll_from_bottom: u16,
    /// Seconds since the pending request started, drives the loading pulse.
    pub pulse_elapsed: f32,
    pub base_url: &'a str,
    pub logging_status: &'a str,
}

/// Draw one frame. Returns the largest useful `scroll_from_bottom` for the
/// current transcript and terminal size.
pub fn ui(f: &mut Frame, view: &ViewModel<'_>, textarea: &TextArea<'_>, theme: &Theme) -> u16 {
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let mode = view.snapshot.current_mode;
    let header = Paragraph::new(header_lines(mode, theme))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    let transcript_area = if view.show_under_the_hood {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(chunks[1]);
        let panel = Paragraph::new(under_the_hood_lines(mode.descriptor(), theme))
            .block(Block::default().borders(Borders::LEFT))
            .wrap(Wrap { trim: false });
        f.render_widget(panel, columns[1]);
        columns[0]
    } else {
        chunks[1]
    };

    let max_scroll = render_transcript(f, view, transcript_area, theme);
    render_input(f, view, textarea, chunks[2], theme);
    max_scroll
}

fn render_transcript(f: &mut Frame, view: &ViewModel<'_>, area: Rect, theme: &Theme) -> u16 {
    let mut lines = transcript_lines(&view.snapshot.messages, theme);
    if let Some(mode) = view.snapshot.pending_request {
        lines.push(loading_line(mode, view.pulse_elapsed, theme));
    }

    let transcript = Paragraph::new(lines).wrap(Wrap { trim: false });
    // Counted before the block is attached, with the same word wrapping the
    // widget renders. One row goes to the title.
    let available_height = area.height.saturating_sub(1);
    let total_wrapped_lines = wrapped_row_count(&transcript, area.width);
    let max_offset = total_wrapped_lines.saturating_sub(available_height);
    let scroll_offset = max_offset.saturating_sub(view.scroll_from_bottom.min(max_offset));

    let title = format!("{} • Logging: {}", view.base_url, view.logging_status);
    let transcript = transcript
        .block(Block::default().title(Span::styled(title, theme.title_style)))
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
    max_offset
}

fn render_input(
    f: &mut Frame,
    view: &ViewModel<'_>,
    textarea: &TextArea<'_>,
    area: Rect,
    theme: &Theme,
) {
    let title = match view.snapshot.pending_request {
        Some(mode) => format!("Waiting for {} (Esc to quit)", mode.descriptor().agent_label),
        None => "Enter send • Tab switch agent • F2 under the hood • Esc quit".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.input_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(textarea, inner);
}

/// Title row with the active endpoint badge, then the mode switcher.
pub fn header_lines(mode: Mode, theme: &Theme) -> Vec<Line<'static>> {
    let descriptor = mode.descriptor();
    let title = Line::from(vec![
        Span::styled(
            format!(" Cloudnova novahub v{} ", env!("CARGO_PKG_VERSION")),
            theme.title_style,
        ),
        Span::styled(
            format!("[{} {}]", descriptor.http_method, descriptor.endpoint_path),
            theme.endpoint_badge_style,
        ),
    ]);

    let mut tabs = vec![Span::raw(" ")];
    for candidate in Mode::ALL {
        let style = if candidate == mode {
            theme.tab_active_style
        } else {
            theme.tab_inactive_style
        };
        tabs.push(Span::styled(
            format!(" {} ", candidate.descriptor().label),
            style,
        ));
        tabs.push(Span::raw(" "));
    }

    vec![title, Line::from(tabs)]
}

/// Label of a transcript entry. Assistant entries name the agent of the mode
/// they were produced under, not the mode currently selected.
pub fn message_label(message: &Message, theme: &Theme) -> Line<'static> {
    if message.is_user() {
        return Line::from(Span::styled("You", theme.user_label_style));
    }
    let descriptor = message.mode().descriptor();
    Line::from(vec![
        Span::styled(descriptor.agent_label, theme.assistant_label_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", descriptor.endpoint_path),
            theme.endpoint_badge_style,
        ),
    ])
}

pub fn transcript_lines(messages: &[Message], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(messages.len() * 4);
    for message in messages {
        lines.push(message_label(message, theme));

        let text_style = if message.is_user() {
            theme.user_text_style
        } else {
            theme.assistant_text_style
        };
        if message.content().is_empty() {
            lines.push(Line::default());
        }
        for text in message.content().lines() {
            lines.push(Line::from(Span::styled(text.to_string(), text_style)));
        }

        if message.is_assistant() {
            for highlight in highlights_for(message.mode(), message.metadata()) {
                lines.push(Line::from(vec![
                    Span::raw("  • "),
                    Span::styled(highlight.to_string(), theme.highlight_style(&highlight)),
                ]));
            }
        }

        lines.push(Line::default());
    }
    lines
}

pub fn pulse_symbol(elapsed_secs: f32) -> &'static str {
    // Two pulses per second, rising then falling.
    let pulse_phase = (elapsed_secs * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        "○"
    } else if pulse_intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

pub fn loading_line(mode: Mode, elapsed_secs: f32, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "{} {} is working…",
            pulse_symbol(elapsed_secs),
            mode.descriptor().agent_label
        ),
        theme.loading_style,
    ))
}

pub fn under_the_hood_lines(descriptor: &ModeDescriptor, theme: &Theme) -> Vec<Line<'static>> {
    let heading = |text: &str| Line::from(Span::styled(text.to_string(), theme.panel_heading_style));
    let text = |text: String| Line::from(Span::styled(text, theme.panel_text_style));

    let mut lines = vec![
        heading(" Under the Hood"),
        text(" What happens when you send a message".to_string()),
        Line::default(),
        heading(" Active Endpoint"),
        Line::from(Span::styled(
            format!(" {} {}", descriptor.http_method, descriptor.endpoint_path),
            theme.endpoint_badge_style,
        )),
        text(format!(" Agent: {}", descriptor.agent_label)),
        Line::default(),
        heading(" Processing Pipeline"),
    ];
    for (index, step) in descriptor.steps.iter().enumerate() {
        lines.push(text(format!(" {}. {}", index + 1, step)));
    }
    lines.extend([
        Line::default(),
        heading(" Output Schema"),
        text(format!(" {}", descriptor.response_schema)),
        Line::default(),
        heading(" Stack in Action"),
        text(format!(" {}", descriptor.stack.join(" · "))),
    ]);
    lines
}

fn wrapped_row_count(paragraph: &Paragraph<'_>, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}
