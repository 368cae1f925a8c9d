use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::modes::Mode;

pub const WELCOME_MESSAGE: &str =
    "Welcome! This is a multi-agent playground. Choose an agent below and let's test the stack.";

/// Shown for every transport failure; causes are not distinguished.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Is the FastAPI server running?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Assistant,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(TranscriptRole::User),
            "assistant" => Ok(TranscriptRole::Assistant),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

/// One entry of the conversation log. Fields are private so a message cannot
/// be edited once it has been appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    role: TranscriptRole,
    content: String,
    mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>, mode: Mode) -> Self {
        Self::new(TranscriptRole::User, content, mode, None)
    }

    pub fn assistant(content: impl Into<String>, mode: Mode, metadata: Option<Value>) -> Self {
        Self::new(TranscriptRole::Assistant, content, mode, metadata)
    }

    pub fn welcome() -> Self {
        Self::assistant(WELCOME_MESSAGE, Mode::Chat, None)
    }

    pub fn connection_error(mode: Mode) -> Self {
        Self::assistant(CONNECTION_ERROR_MESSAGE, mode, None)
    }

    fn new(
        role: TranscriptRole,
        content: impl Into<String>,
        mode: Mode,
        metadata: Option<Value>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            mode,
            metadata,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> TranscriptRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

/// Append-only, ordered conversation log. Always starts with the welcome
/// message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            entries: vec![Message::welcome()],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
