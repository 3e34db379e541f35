//! Canned agent graph for tests: no model, no tools, no network.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{AgentError, AgentGraph, AgentMessage, AgentRun};

pub struct ScriptedAgentGraph {
    outcome: Result<AgentRun, String>,
    received: Mutex<Vec<Vec<AgentMessage>>>,
}

impl ScriptedAgentGraph {
    /// Replies with the seeded messages followed by `history`.
    pub fn replying(history: Vec<AgentMessage>) -> Self {
        Self {
            outcome: Ok(AgentRun { messages: history }),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with an API error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<AgentMessage>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentGraph for ScriptedAgentGraph {
    async fn invoke(&self, messages: Vec<AgentMessage>) -> Result<AgentRun, AgentError> {
        self.received.lock().unwrap().push(messages.clone());
        match &self.outcome {
            Ok(run) => {
                let mut full = messages;
                full.extend(run.messages.iter().cloned());
                Ok(AgentRun { messages: full })
            }
            Err(message) => Err(AgentError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}
