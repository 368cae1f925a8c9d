//! Static registry of the conversation modes and the agent endpoint each one
//! talks to.
//!
//! The registry is plain data: one [`ModeDescriptor`] per [`Mode`], resolved
//! through [`resolve`]. Because [`Mode`] is a closed enum, resolution is total
//! and can never observe an unsupported key; free-form text is parsed into a
//! [`Mode`] at the edges (CLI flags, config file) via [`FromStr`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    #[default]
    Chat,
    Extract,
    Analyze,
    DocumentQa,
}

impl Mode {
    /// Every supported mode, in the order the mode switcher shows them.
    pub const ALL: [Mode; 4] = [Mode::Chat, Mode::Extract, Mode::Analyze, Mode::DocumentQa];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Extract => "extract",
            Mode::Analyze => "analyze",
            Mode::DocumentQa => "document-qa",
        }
    }

    pub fn descriptor(self) -> &'static ModeDescriptor {
        resolve(self)
    }

    pub fn next(self) -> Mode {
        let index = self.index();
        Mode::ALL[(index + 1) % Mode::ALL.len()]
    }

    pub fn previous(self) -> Mode {
        let index = self.index();
        Mode::ALL[(index + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }

    fn index(self) -> usize {
        match self {
            Mode::Chat => 0,
            Mode::Extract => 1,
            Mode::Analyze => 2,
            Mode::DocumentQa => 3,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name one of the supported modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModeError {
    pub input: String,
}

impl fmt::Display for UnknownModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supported: Vec<&str> = Mode::ALL.iter().map(|mode| mode.as_str()).collect();
        write!(
            f,
            "unknown mode '{}' (expected one of: {})",
            self.input,
            supported.join(", ")
        )
    }
}

impl std::error::Error for UnknownModeError {}

impl FromStr for Mode {
    type Err = UnknownModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(Mode::Chat),
            "extract" => Ok(Mode::Extract),
            "analyze" => Ok(Mode::Analyze),
            // The backend path for document Q&A is /sladocs.
            "document-qa" | "documentqa" | "sladocs" => Ok(Mode::DocumentQa),
            _ => Err(UnknownModeError {
                input: value.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = UnknownModeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(value: Mode) -> Self {
        value.as_str().to_string()
    }
}

/// Everything the client needs to know about one agent endpoint.
#[derive(Debug, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub mode: Mode,
    /// Short label for the mode switcher.
    pub label: &'static str,
    pub endpoint_path: &'static str,
    pub http_method: &'static str,
    pub agent_label: &'static str,
    /// Illustrative shape of the backend's validated output.
    pub response_schema: &'static str,
    /// Processing pipeline the backend runs for this agent.
    pub steps: &'static [&'static str],
    pub placeholder: &'static str,
    /// Backend technologies involved in serving this mode.
    pub stack: &'static [&'static str],
}

static CHAT: ModeDescriptor = ModeDescriptor {
    mode: Mode::Chat,
    label: "Weather Chat",
    endpoint_path: "/chat",
    http_method: "POST",
    agent_label: "Weather Chat Agent",
    response_schema:
        "ChatResponse { punny_response: str, weather_conditions: WeatherData | null }",
    steps: &[
        "Parse user input",
        "LangGraph ReAct agent processes query",
        "Tool call: get_weather() if location detected",
        "LLM generates punny response",
        "Pydantic validates output schema",
    ],
    placeholder: "Ask about weather...",
    stack: &["FastAPI", "LangChain", "AWS Bedrock", "Pydantic", "Guardrails"],
};

static EXTRACT: ModeDescriptor = ModeDescriptor {
    mode: Mode::Extract,
    label: "Extraction",
    endpoint_path: "/extract",
    http_method: "POST",
    agent_label: "Entity Extraction Agent",
    response_schema: "ExtractionResponse { entities: List[Entity], summary: str }",
    steps: &[
        "Parse user input text",
        "NER prompt sent to LLM",
        "Extract entities (Person, Place, Tech)",
        "Generate summary of entities",
        "Return structured entity list",
    ],
    placeholder: "Paste text to extract entities...",
    stack: &["FastAPI", "LangChain", "AWS Bedrock", "Pydantic", "Guardrails"],
};

static ANALYZE: ModeDescriptor = ModeDescriptor {
    mode: Mode::Analyze,
    label: "Sentiment",
    endpoint_path: "/analyze",
    http_method: "POST",
    agent_label: "Sentiment Analysis Agent",
    response_schema: "SentimentResponse { sentiment: str, score: float, reasoning: str }",
    steps: &[
        "Parse user input text",
        "Sentiment analysis prompt to LLM",
        "Classify: Positive/Negative/Neutral",
        "Calculate confidence score",
        "Generate reasoning explanation",
    ],
    placeholder: "Paste text for sentiment analysis...",
    stack: &["FastAPI", "LangChain", "AWS Bedrock", "Pydantic", "Guardrails"],
};

static DOCUMENT_QA: ModeDescriptor = ModeDescriptor {
    mode: Mode::DocumentQa,
    label: "Document Q&A",
    endpoint_path: "/sladocs",
    http_method: "POST",
    agent_label: "RAG Document Agent",
    response_schema: "RAGResponse { answer: str, sources: List[str] }",
    steps: &[
        "Convert query to vector embedding",
        "Similarity search in PGVector (k=3)",
        "Retrieve relevant document chunks",
        "Inject context into LLM prompt",
        "Generate grounded answer with sources",
    ],
    placeholder: "Ask about our SLA, uptime guarantees, or support tiers...",
    stack: &["FastAPI", "LangChain", "AWS Bedrock", "Pydantic", "PGVector"],
};

pub fn resolve(mode: Mode) -> &'static ModeDescriptor {
    match mode {
        Mode::Chat => &CHAT,
        Mode::Extract => &EXTRACT,
        Mode::Analyze => &ANALYZE,
        Mode::DocumentQa => &DOCUMENT_QA,
    }
}
