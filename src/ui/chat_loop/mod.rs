//! Interactive chat session.
//!
//! [`ChatState`] owns everything that exists only on screen: the input box,
//! scroll position and the "Under the Hood" toggle. Conversation state lives
//! in the [`ConversationController`] and reaches the renderer through its
//! snapshots.

mod event_loop;
mod lifecycle;

pub use event_loop::run_chat;

use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::Style;
use tracing::debug;
use tui_textarea::TextArea;

use crate::core::conversation::{ConversationController, PendingReply};
use crate::core::modes::Mode;
use crate::ui::theme::Theme;

/// What the event loop should do after a key press.
pub enum KeyOutcome {
    Ignored,
    Redraw,
    /// A submission was accepted; the loop spawns its network half.
    Submitted(PendingReply),
    Quit,
}

pub struct ChatState {
    controller: ConversationController,
    theme: Theme,
    textarea: TextArea<'static>,
    show_under_the_hood: bool,
    scroll_from_bottom: u16,
    max_scroll: u16,
    page_height: u16,
    pulse_start: Instant,
}

impl ChatState {
    pub fn new(controller: ConversationController, theme: Theme) -> Self {
        let mode = controller.current_mode();
        let textarea = styled_textarea(&theme, mode);
        Self {
            controller,
            theme,
            textarea,
            show_under_the_hood: false,
            scroll_from_bottom: 0,
            max_scroll: 0,
            page_height: 10,
            pulse_start: Instant::now(),
        }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyOutcome::Quit
            }
            KeyCode::Esc => KeyOutcome::Quit,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => self.switch_mode(self.controller.current_mode().next()),
            KeyCode::BackTab => self.switch_mode(self.controller.current_mode().previous()),
            KeyCode::F(2) => {
                self.show_under_the_hood = !self.show_under_the_hood;
                KeyOutcome::Redraw
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(self.page_height.max(1)),
            KeyCode::PageDown => self.scroll_down(self.page_height.max(1)),
            _ => {
                if self.textarea.input(key) {
                    self.sync_draft();
                }
                KeyOutcome::Redraw
            }
        }
    }

    /// Pasted text goes into the input as a single line.
    pub fn paste(&mut self, text: &str) {
        let flattened = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
        if self.textarea.insert_str(flattened) {
            self.sync_draft();
        }
    }

    fn submit(&mut self) -> KeyOutcome {
        let mode = self.controller.current_mode();
        match self.controller.begin(&self.input_text(), mode) {
            Ok(pending) => {
                self.textarea = styled_textarea(&self.theme, mode);
                self.controller.set_draft_input("");
                self.scroll_from_bottom = 0;
                self.pulse_start = Instant::now();
                KeyOutcome::Submitted(pending)
            }
            Err(reason) => {
                debug!(?reason, "submission skipped");
                KeyOutcome::Ignored
            }
        }
    }

    fn switch_mode(&mut self, mode: Mode) -> KeyOutcome {
        self.controller.set_mode(mode);
        self.textarea
            .set_placeholder_text(mode.descriptor().placeholder);
        KeyOutcome::Redraw
    }

    fn scroll_up(&mut self, lines: u16) -> KeyOutcome {
        self.scroll_from_bottom = self
            .scroll_from_bottom
            .saturating_add(lines)
            .min(self.max_scroll);
        KeyOutcome::Redraw
    }

    fn scroll_down(&mut self, lines: u16) -> KeyOutcome {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
        KeyOutcome::Redraw
    }

    fn sync_draft(&self) {
        self.controller.set_draft_input(self.input_text());
    }

    /// Record layout facts learned while drawing.
    fn after_draw(&mut self, max_scroll: u16, page_height: u16) {
        self.max_scroll = max_scroll;
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_scroll);
        self.page_height = page_height;
    }

    fn pulse_elapsed(&self) -> f32 {
        self.pulse_start.elapsed().as_secs_f32()
    }
}

fn styled_textarea(theme: &Theme, mode: Mode) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_style(theme.input_text_style);
    textarea.set_cursor_style(theme.input_cursor_style);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_style(theme.placeholder_style);
    textarea.set_placeholder_text(mode.descriptor().placeholder);
    textarea
}

#[cfg(test)]
mod tests;
