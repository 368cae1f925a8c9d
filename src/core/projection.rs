//! Turns a raw agent reply into display text.
//!
//! Each mode expects a different reply shape; [`project`] decodes the body
//! into the matching [`AgentReply`] variant and reports a [`MissingField`]
//! when the field the display depends on is absent or has the wrong type.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::api::{Entity, WeatherConditions};
use crate::core::modes::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    Chat {
        punny_response: String,
        weather_conditions: Option<WeatherConditions>,
    },
    Extraction {
        summary: String,
        entities: Vec<Entity>,
    },
    Sentiment {
        sentiment: String,
        /// Confidence in `[0, 1]`.
        score: f64,
        reasoning: Option<String>,
    },
    DocumentAnswer {
        answer: String,
        sources: Vec<String>,
    },
}

/// Secondary facts rendered under an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    Condition(String),
    Entity { name: String, kind: String },
    Reasoning(String),
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Highlight::Condition(condition) => write!(f, "CONDITION: {condition}"),
            Highlight::Entity { name, kind } => write!(f, "{name} ({})", kind.to_uppercase()),
            Highlight::Reasoning(reasoning) => write!(f, "REASONING: {reasoning}"),
        }
    }
}

/// A successful reply lacked the field its mode projects into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField {
    pub mode: Mode,
    pub field: &'static str,
}

impl MissingField {
    /// Text shown in the transcript in place of the projected content.
    pub fn display_content(&self) -> String {
        format!(
            "{} replied without a usable `{}` field.",
            self.mode.descriptor().agent_label,
            self.field
        )
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reply is missing required field `{}`",
            self.mode, self.field
        )
    }
}

impl std::error::Error for MissingField {}

fn required_str(body: &Value, mode: Mode, field: &'static str) -> Result<String, MissingField> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(MissingField { mode, field })
}

fn optional_list<T: serde::de::DeserializeOwned>(body: &Value, field: &str) -> Vec<T> {
    match body.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
            debug!(field, error = %err, "ignoring malformed optional list");
            Vec::new()
        }),
    }
}

pub fn project(mode: Mode, body: &Value) -> Result<AgentReply, MissingField> {
    match mode {
        Mode::Chat => {
            let punny_response = required_str(body, mode, "punny_response")?;
            let weather_conditions = match body.get("weather_conditions") {
                None | Some(Value::Null) => None,
                Some(value) => serde_json::from_value(value.clone()).ok(),
            };
            Ok(AgentReply::Chat {
                punny_response,
                weather_conditions,
            })
        }
        Mode::Extract => Ok(AgentReply::Extraction {
            summary: required_str(body, mode, "summary")?,
            entities: optional_list(body, "entities"),
        }),
        Mode::Analyze => {
            let sentiment = required_str(body, mode, "sentiment")?;
            let score = body
                .get("score")
                .and_then(Value::as_f64)
                .ok_or(MissingField {
                    mode,
                    field: "score",
                })?;
            let reasoning = body
                .get("reasoning")
                .and_then(Value::as_str)
                .map(str::to_owned);
            Ok(AgentReply::Sentiment {
                sentiment,
                score,
                reasoning,
            })
        }
        Mode::DocumentQa => Ok(AgentReply::DocumentAnswer {
            answer: required_str(body, mode, "answer")?,
            sources: optional_list(body, "sources"),
        }),
    }
}

impl AgentReply {
    pub fn mode(&self) -> Mode {
        match self {
            AgentReply::Chat { .. } => Mode::Chat,
            AgentReply::Extraction { .. } => Mode::Extract,
            AgentReply::Sentiment { .. } => Mode::Analyze,
            AgentReply::DocumentAnswer { .. } => Mode::DocumentQa,
        }
    }

    pub fn display_content(&self) -> String {
        match self {
            AgentReply::Chat { punny_response, .. } => punny_response.clone(),
            AgentReply::Extraction { summary, .. } => summary.clone(),
            AgentReply::Sentiment {
                sentiment, score, ..
            } => format!("Analysis: {} ({}%)", sentiment, percent(*score)),
            AgentReply::DocumentAnswer { answer, .. } => answer.clone(),
        }
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        match self {
            AgentReply::Chat {
                weather_conditions, ..
            } => weather_conditions
                .iter()
                .map(|conditions| Highlight::Condition(conditions.condition_label()))
                .collect(),
            AgentReply::Extraction { entities, .. } => entities
                .iter()
                .map(|entity| Highlight::Entity {
                    name: entity.name.clone(),
                    kind: entity.kind.clone(),
                })
                .collect(),
            AgentReply::Sentiment { reasoning, .. } => reasoning
                .iter()
                .filter(|text| !text.is_empty())
                .map(|text| Highlight::Reasoning(text.clone()))
                .collect(),
            AgentReply::DocumentAnswer { .. } => Vec::new(),
        }
    }
}

fn percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Highlights for a logged message, recovered from its stored metadata.
pub fn highlights_for(mode: Mode, metadata: Option<&Value>) -> Vec<Highlight> {
    metadata
        .and_then(|body| project(mode, body).ok())
        .map(|reply| reply.highlights())
        .unwrap_or_default()
}
