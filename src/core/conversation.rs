//! Conversation state and the submit flow.
//!
//! [`ConversationController`] is the only writer of the message log and
//! session flags. Readers observe it through [`ConversationController::subscribe`],
//! which yields a fresh [`ConversationSnapshot`] after every mutation.
//!
//! At most one request is in flight: a submission made while another is
//! pending is dropped, not queued. There is no timeout and no cancellation, so
//! a request that never settles keeps the controller pending.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::{AgentBackend, AgentRequest};
use crate::core::message::{Message, MessageLog};
use crate::core::modes::Mode;
use crate::core::projection::{project, AgentReply, MissingField};
use crate::utils::logging::LoggingState;

pub const DEFAULT_THREAD_ID: &str = "demo-session";
pub const DEFAULT_USER_ID: &str = "1";

/// Identifiers sent with every request; constant for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub thread_id: String,
    pub user_id: String,
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self {
            thread_id: DEFAULT_THREAD_ID.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub current_mode: Mode,
    /// Mode of the request in flight, captured when it was submitted.
    pub pending_request: Option<Mode>,
    pub draft_input: String,
}

impl ConversationSnapshot {
    pub fn is_pending(&self) -> bool {
        self.pending_request.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    RequestPending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    Replied(AgentReply),
    MissingField(MissingField),
    ConnectionFailed,
}

impl SubmitOutcome {
    pub fn appended_messages(&self) -> usize {
        match self {
            SubmitOutcome::Skipped(_) => 0,
            _ => 2,
        }
    }
}

struct SessionState {
    log: MessageLog,
    current_mode: Mode,
    pending_request: Option<Mode>,
    draft_input: String,
}

impl SessionState {
    fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.log.as_slice().to_vec(),
            current_mode: self.current_mode,
            pending_request: self.pending_request,
            draft_input: self.draft_input.clone(),
        }
    }
}

struct Inner {
    backend: Arc<dyn AgentBackend>,
    identity: SessionIdentity,
    state: Mutex<SessionState>,
    snapshots: watch::Sender<ConversationSnapshot>,
    transcript: Mutex<LoggingState>,
}

/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<Inner>,
}

impl ConversationController {
    pub fn new(backend: Arc<dyn AgentBackend>, identity: SessionIdentity) -> Self {
        Self::with_transcript(backend, identity, Mode::default(), LoggingState::disabled())
    }

    pub fn with_transcript(
        backend: Arc<dyn AgentBackend>,
        identity: SessionIdentity,
        initial_mode: Mode,
        transcript: LoggingState,
    ) -> Self {
        let state = SessionState {
            log: MessageLog::new(),
            current_mode: initial_mode,
            pending_request: None,
            draft_input: String::new(),
        };
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            inner: Arc::new(Inner {
                backend,
                identity,
                state: Mutex::new(state),
                snapshots,
                transcript: Mutex::new(transcript),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        self.inner.snapshots.send_replace(state.snapshot());
    }

    /// Lock order is state, then transcript. Mutations take this guard before
    /// releasing the state lock and write after, so file order matches log order.
    fn transcript(&self) -> MutexGuard<'_, LoggingState> {
        self.inner
            .transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.state().snapshot()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.inner.identity
    }

    pub fn current_mode(&self) -> Mode {
        self.state().current_mode
    }

    pub fn is_pending(&self) -> bool {
        self.state().pending_request.is_some()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().log.as_slice().to_vec()
    }

    /// Transcript file name, or "off".
    pub fn logging_status(&self) -> String {
        self.transcript().get_status_string()
    }

    /// Change the active mode. Requests already in flight keep the mode they
    /// were submitted with.
    pub fn set_mode(&self, mode: Mode) {
        let mut state = self.state();
        state.current_mode = mode;
        self.publish(&state);
    }

    pub fn set_draft_input(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.draft_input = text.into();
        self.publish(&state);
    }

    /// Accept a submission: append the user message and mark the session
    /// pending. The returned [`PendingReply`] performs the network call.
    pub fn begin(&self, raw_text: &str, mode: Mode) -> Result<PendingReply, SkipReason> {
        let text = raw_text.trim();
        let mut state = self.state();
        if text.is_empty() {
            return Err(SkipReason::EmptyInput);
        }
        if let Some(in_flight) = state.pending_request {
            debug!(%mode, %in_flight, "dropping submission while a request is pending");
            return Err(SkipReason::RequestPending);
        }

        let message = Message::user(text, mode);
        state.log.push(message.clone());
        state.pending_request = Some(mode);
        self.publish(&state);
        let transcript = self.transcript();
        drop(state);
        record(&transcript, &message);

        Ok(PendingReply {
            controller: self.clone(),
            mode,
            text: text.to_string(),
        })
    }

    pub async fn submit(&self, raw_text: &str, mode: Mode) -> SubmitOutcome {
        match self.begin(raw_text, mode) {
            Ok(pending) => pending.settle().await,
            Err(reason) => SubmitOutcome::Skipped(reason),
        }
    }

    fn finish(&self, message: Message) {
        let mut state = self.state();
        state.log.push(message.clone());
        state.pending_request = None;
        self.publish(&state);
        let transcript = self.transcript();
        drop(state);
        record(&transcript, &message);
    }
}

/// An accepted submission whose reply has not arrived yet. Settling it always
/// appends exactly one assistant message and clears the pending flag.
#[must_use = "a pending reply must be settled to clear the pending flag"]
pub struct PendingReply {
    controller: ConversationController,
    mode: Mode,
    text: String,
}

impl PendingReply {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub async fn settle(self) -> SubmitOutcome {
        let PendingReply {
            controller,
            mode,
            text,
        } = self;
        let identity = controller.identity().clone();
        let request = AgentRequest {
            message: text,
            thread_id: identity.thread_id,
            user_id: identity.user_id,
        };

        let result = controller
            .inner
            .backend
            .send(mode.descriptor(), &request)
            .await;

        let (message, outcome) = match result {
            Ok(body) => reply_message(mode, body),
            Err(err) => {
                warn!(%mode, error = %err, "agent request failed");
                (Message::connection_error(mode), SubmitOutcome::ConnectionFailed)
            }
        };
        controller.finish(message);
        outcome
    }
}

fn record(transcript: &LoggingState, message: &Message) {
    if let Err(err) = transcript.log_message(message) {
        warn!(error = %err, "failed to write transcript entry");
    }
}

fn reply_message(mode: Mode, body: Value) -> (Message, SubmitOutcome) {
    match project(mode, &body) {
        Ok(reply) => (
            Message::assistant(reply.display_content(), mode, Some(body)),
            SubmitOutcome::Replied(reply),
        ),
        Err(missing) => {
            warn!(%missing, "agent reply did not match its schema");
            (
                Message::assistant(missing.display_content(), mode, Some(body)),
                SubmitOutcome::MissingField(missing),
            )
        }
    }
}
