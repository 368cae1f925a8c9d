use super::*;
use crate::api::{AgentBackend, AgentRequest, ServiceStatus, TransportError};
use crate::core::conversation::{SessionIdentity, SkipReason};
use crate::core::modes::ModeDescriptor;
use ratatui::crossterm::event::KeyEventState;
use serde_json::{json, Value};
use std::sync::Arc;

/// Echoes the message back in every reply field.
struct EchoBackend;

#[async_trait::async_trait]
impl AgentBackend for EchoBackend {
    async fn send(
        &self,
        _descriptor: &'static ModeDescriptor,
        request: &AgentRequest,
    ) -> Result<Value, TransportError> {
        Ok(json!({
            "punny_response": format!("echo: {}", request.message),
            "summary": format!("echo: {}", request.message),
            "sentiment": "Neutral",
            "score": 0.5,
            "answer": format!("echo: {}", request.message),
        }))
    }

    async fn status(&self) -> Result<ServiceStatus, TransportError> {
        Ok(ServiceStatus::default())
    }
}

fn chat_state() -> ChatState {
    let controller =
        ConversationController::new(Arc::new(EchoBackend), SessionIdentity::default());
    ChatState::new(controller, Theme::monochrome())
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(state: &mut ChatState, text: &str) {
    for ch in text.chars() {
        state.handle_key(press(KeyCode::Char(ch)));
    }
}

#[test]
fn typing_updates_the_draft_snapshot() {
    let mut state = chat_state();
    type_text(&mut state, "hi there");

    assert_eq!(state.input_text(), "hi there");
    assert_eq!(state.controller().snapshot().draft_input, "hi there");
}

#[tokio::test]
async fn enter_submits_and_clears_the_input() {
    let mut state = chat_state();
    type_text(&mut state, "  Weather in Austin?  ");

    let pending = match state.handle_key(press(KeyCode::Enter)) {
        KeyOutcome::Submitted(pending) => pending,
        _ => panic!("expected a submission"),
    };
    assert_eq!(pending.text(), "Weather in Austin?");
    assert_eq!(pending.mode(), Mode::Chat);
    assert!(state.input_text().is_empty());

    let snapshot = state.controller().snapshot();
    assert_eq!(snapshot.pending_request, Some(Mode::Chat));
    assert!(snapshot.draft_input.is_empty());
    assert_eq!(snapshot.messages.len(), 2);

    pending.settle().await;
    let snapshot = state.controller().snapshot();
    assert!(!snapshot.is_pending());
    assert_eq!(snapshot.messages[2].content(), "echo: Weather in Austin?");
}

#[test]
fn enter_on_blank_input_does_nothing() {
    let mut state = chat_state();
    type_text(&mut state, "   ");

    assert!(matches!(
        state.handle_key(press(KeyCode::Enter)),
        KeyOutcome::Ignored
    ));
    assert_eq!(state.controller().messages().len(), 1);
}

#[test]
fn enter_while_pending_keeps_the_draft() {
    let mut state = chat_state();
    type_text(&mut state, "first");
    let _pending = match state.handle_key(press(KeyCode::Enter)) {
        KeyOutcome::Submitted(pending) => pending,
        _ => panic!("expected a submission"),
    };

    type_text(&mut state, "second");
    assert!(matches!(
        state.handle_key(press(KeyCode::Enter)),
        KeyOutcome::Ignored
    ));
    assert_eq!(state.input_text(), "second");
    assert_eq!(state.controller().messages().len(), 2);
    assert_eq!(
        state.controller().begin("third", Mode::Chat).err(),
        Some(SkipReason::RequestPending)
    );
}

#[test]
fn tab_cycles_modes_and_placeholder() {
    let mut state = chat_state();
    assert_eq!(state.textarea.placeholder_text(), "Ask about weather...");

    state.handle_key(press(KeyCode::Tab));
    assert_eq!(state.controller().current_mode(), Mode::Extract);
    assert_eq!(
        state.textarea.placeholder_text(),
        "Paste text to extract entities..."
    );

    state.handle_key(press(KeyCode::BackTab));
    state.handle_key(press(KeyCode::BackTab));
    assert_eq!(state.controller().current_mode(), Mode::DocumentQa);
    assert_eq!(
        state.textarea.placeholder_text(),
        "Ask about our SLA, uptime guarantees, or support tiers..."
    );
}

#[test]
fn f2_toggles_under_the_hood() {
    let mut state = chat_state();
    assert!(!state.show_under_the_hood);
    state.handle_key(press(KeyCode::F(2)));
    assert!(state.show_under_the_hood);
    state.handle_key(press(KeyCode::F(2)));
    assert!(!state.show_under_the_hood);
}

#[test]
fn quit_keys() {
    let mut state = chat_state();
    assert!(matches!(
        state.handle_key(press(KeyCode::Esc)),
        KeyOutcome::Quit
    ));
    assert!(matches!(
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        KeyOutcome::Quit
    ));
}

#[test]
fn key_releases_are_ignored() {
    let mut state = chat_state();
    let release = KeyEvent {
        code: KeyCode::Char('x'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert!(matches!(state.handle_key(release), KeyOutcome::Ignored));
    assert!(state.input_text().is_empty());
}

#[test]
fn scrolling_stays_within_the_drawn_range() {
    let mut state = chat_state();
    state.after_draw(5, 3);

    state.handle_key(press(KeyCode::PageUp));
    assert_eq!(state.scroll_from_bottom, 3);
    state.handle_key(press(KeyCode::PageUp));
    assert_eq!(state.scroll_from_bottom, 5);
    state.handle_key(press(KeyCode::Down));
    assert_eq!(state.scroll_from_bottom, 4);
    state.handle_key(press(KeyCode::PageDown));
    state.handle_key(press(KeyCode::PageDown));
    assert_eq!(state.scroll_from_bottom, 0);

    state.scroll_from_bottom = 5;
    state.after_draw(2, 3);
    assert_eq!(state.scroll_from_bottom, 2);
}

#[test]
fn paste_flattens_newlines() {
    let mut state = chat_state();
    state.paste("Ada met\nCharles\r\nin London");
    assert_eq!(state.input_text(), "Ada met Charles in London");
    assert_eq!(
        state.controller().snapshot().draft_input,
        "Ada met Charles in London"
    );
}
