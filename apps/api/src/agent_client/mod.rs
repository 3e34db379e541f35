/// Agent Client — the boundary to the external agent graph that does the actual matching.
///
/// The graph is a black box: it receives a seeded message list and returns the full
/// conversation once the whole turn (reasoning and tool calls) has finished.
/// Handlers only ever see `Arc<dyn AgentGraph>`, so tests swap in a scripted graph.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod messages;
#[cfg(test)]
pub mod scripted;

pub use messages::{AgentMessage, AgentRun};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Agent error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Agent returned an empty message history")]
    EmptyHistory,
}

/// The external agent graph. One synchronous turn per call.
#[async_trait]
pub trait AgentGraph: Send + Sync {
    async fn invoke(&self, messages: Vec<AgentMessage>) -> Result<AgentRun, AgentError>;
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    messages: &'a [AgentMessage],
}

/// Agent graph served over HTTP: `POST {url}` with `{"messages": [...]}`,
/// answered by `{"messages": [...]}` holding the whole conversation.
///
/// No retries. A timeout is only applied when the deployment configures one.
#[derive(Clone)]
pub struct HttpAgentGraph {
    client: Client,
    url: String,
}

impl HttpAgentGraph {
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self, AgentError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AgentGraph for HttpAgentGraph {
    async fn invoke(&self, messages: Vec<AgentMessage>) -> Result<AgentRun, AgentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&InvokeRequest {
                messages: &messages,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Agent server returned {}: {}", status, body);
            return Err(AgentError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let run: AgentRun = serde_json::from_str(&body)?;
        debug!("Agent turn finished with {} messages", run.messages.len());
        Ok(run)
    }
}

/// Pulls a readable message out of an agent server error body.
/// Understands `{"detail": ..}`, `{"error": ".."}` and `{"error": {"message": ..}}`.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    value
        .get("detail")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}
