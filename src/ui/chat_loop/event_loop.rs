//! Event polling, dispatching, and frame drawing.
//!
//! Terminal input arrives on a channel fed by a reader task. Redraws are
//! triggered by input, by new controller snapshots and, while a request is
//! pending, by a timer that animates the loading row.

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::core::conversation::{ConversationController, ConversationSnapshot};
use crate::ui::renderer::{ui, ViewModel};
use crate::ui::theme::Theme;

use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use super::{ChatState, KeyOutcome};

const MAX_FPS: u64 = 30;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn draw_frame(
    terminal: &mut ChatTerminal,
    state: &mut ChatState,
    snapshot: &ConversationSnapshot,
    base_url: &str,
    logging_status: &str,
) -> std::io::Result<()> {
    let mut max_scroll = 0;
    let mut page_height = 0;
    terminal.draw(|f| {
        let view = ViewModel {
            snapshot,
            show_under_the_hood: state.show_under_the_hood,
            scroll_from_bottom: state.scroll_from_bottom,
            pulse_elapsed: state.pulse_elapsed(),
            base_url,
            logging_status,
        };
        max_scroll = ui(f, &view, &state.textarea, &state.theme);
        // Header and input box take three rows each.
        page_height = f.area().height.saturating_sub(7);
    })?;
    state.after_draw(max_scroll, page_height);
    Ok(())
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    state: &mut ChatState,
    snapshots: &mut watch::Receiver<ConversationSnapshot>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    base_url: &str,
    logging_status: &str,
) -> Result<(), Box<dyn Error>> {
    let mut tick = tokio::time::interval(Duration::from_millis(1000 / MAX_FPS));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut request_redraw = true;

    loop {
        if request_redraw {
            let snapshot = snapshots.borrow_and_update().clone();
            draw_frame(terminal, state, &snapshot, base_url, logging_status)?;
            request_redraw = false;
        }

        tokio::select! {
            maybe_event = event_rx.recv() => {
                let Some(UiEvent::Crossterm(ev)) = maybe_event else {
                    return Ok(());
                };
                match ev {
                    Event::Key(key) => match state.handle_key(key) {
                        KeyOutcome::Quit => return Ok(()),
                        KeyOutcome::Submitted(pending) => {
                            debug!(mode = %pending.mode(), "dispatching submission");
                            tokio::spawn(pending.settle());
                            request_redraw = true;
                        }
                        KeyOutcome::Redraw => request_redraw = true,
                        KeyOutcome::Ignored => {}
                    },
                    Event::Paste(text) => {
                        state.paste(&text);
                        request_redraw = true;
                    }
                    Event::Resize(..) => request_redraw = true,
                    _ => {}
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                request_redraw = true;
            }
            _ = tick.tick() => {
                if state.controller().is_pending() {
                    request_redraw = true;
                }
            }
        }
    }
}

/// Run the full-screen chat until the user quits.
pub async fn run_chat(
    controller: ConversationController,
    base_url: String,
) -> Result<(), Box<dyn Error>> {
    let logging_status = controller.logging_status();
    let mut state = ChatState::new(controller.clone(), Theme::from_env());
    let mut snapshots = controller.subscribe();

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = event_loop(
        &mut terminal,
        &mut state,
        &mut snapshots,
        &mut event_rx,
        &base_url,
        &logging_status,
    )
    .await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    result
}
