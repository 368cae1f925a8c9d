use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::api::{AgentRequest, ServiceStatus};
use crate::core::modes::ModeDescriptor;
use crate::utils::url::construct_api_url;

/// Ways a backend call can fail. The conversation log treats all of them as
/// one connection error; the distinction only reaches diagnostics.
#[derive(Debug)]
pub enum TransportError {
    /// The request never produced a response (refused, DNS, TLS, reset...).
    Request(reqwest::Error),

    /// The backend answered with a non-2xx status.
    Status {
        status: StatusCode,
        body: String,
    },

    /// The response body was not valid JSON.
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(source) => write!(f, "request failed: {source}"),
            TransportError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "backend returned {status}")
                } else {
                    write!(f, "backend returned {status}: {body}")
                }
            }
            TransportError::Decode(source) => {
                write!(f, "response body was not valid JSON: {source}")
            }
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TransportError::Request(source) => Some(source),
            TransportError::Status { .. } => None,
            TransportError::Decode(source) => Some(source),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        TransportError::Request(value)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        TransportError::Decode(value)
    }
}

/// The agent service as seen by the conversation controller.
#[async_trait::async_trait]
pub trait AgentBackend: Send + Sync {
    /// Issue one request to the descriptor's endpoint and return the decoded
    /// JSON body of a 2xx response.
    async fn send(
        &self,
        descriptor: &'static ModeDescriptor,
        request: &AgentRequest,
    ) -> Result<Value, TransportError>;

    /// Query the backend's health route.
    async fn status(&self) -> Result<ServiceStatus, TransportError>;
}

/// [`AgentBackend`] over HTTP. No timeout is configured: a request that
/// never settles keeps the conversation pending.
#[derive(Clone)]
pub struct HttpAgentBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, descriptor: &ModeDescriptor) -> String {
        construct_api_url(&self.base_url, descriptor.endpoint_path)
    }
}

async fn read_json_body(response: reqwest::Response) -> Result<Value, TransportError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TransportError::Status { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait::async_trait]
impl AgentBackend for HttpAgentBackend {
    async fn send(
        &self,
        descriptor: &'static ModeDescriptor,
        request: &AgentRequest,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint_url(descriptor);
        debug!(
            method = descriptor.http_method,
            url = %url,
            agent = descriptor.agent_label,
            "sending agent request"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let result = read_json_body(response).await;
        if let Err(err) = &result {
            debug!(url = %url, error = %err, "agent request failed");
        }
        result
    }

    async fn status(&self) -> Result<ServiceStatus, TransportError> {
        let url = construct_api_url(&self.base_url, "/");
        debug!(url = %url, "checking backend status");
        let response = self.client.get(&url).send().await?;
        let body = read_json_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests;
