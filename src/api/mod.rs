//! Wire types for the agent backend.
//!
//! Every agent endpoint accepts the same [`AgentRequest`] body. Replies are
//! kept as raw JSON by the transport layer and projected per mode by
//! [`crate::core::projection`]; the structs here describe the nested pieces
//! that projection decodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod client;

pub use client::{AgentBackend, HttpAgentBackend, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub message: String,
    pub thread_id: String,
    pub user_id: String,
}

/// Entity reported by the extraction agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The weather agent reports conditions either as a structured object or as a
/// bare string such as `"Sunny"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherConditions {
    Text(String),
    Report(Map<String, Value>),
}

impl WeatherConditions {
    /// Short label for display: the `conditions` entry of a report, the whole
    /// report as JSON when that entry is absent, or the text itself.
    pub fn condition_label(&self) -> String {
        match self {
            WeatherConditions::Text(text) => text.clone(),
            WeatherConditions::Report(report) => match report.get("conditions") {
                Some(Value::String(conditions)) if !conditions.is_empty() => conditions.clone(),
                _ => Value::Object(report.clone()).to_string(),
            },
        }
    }
}

/// Body of the backend's `GET /` health route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}
