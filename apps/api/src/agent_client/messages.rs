//! Conversation model shared with the external agent graph.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the agent conversation, tagged by `type` the way agent servers serialize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentMessage {
    /// Outbound prompt.
    Human {
        #[serde(deserialize_with = "content_text")]
        content: String,
    },
    /// Raw result of a tool call, usually a stringified list of records.
    Tool {
        #[serde(deserialize_with = "content_text")]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
    },
    /// Assistant text, intermediate or final.
    Ai {
        #[serde(deserialize_with = "content_text")]
        content: String,
    },
    System {
        #[serde(deserialize_with = "content_text")]
        content: String,
    },
    /// Any other message kind the agent server emits. Kept in place, never read.
    #[serde(other)]
    Other,
}

impl AgentMessage {
    pub fn human(content: impl Into<String>) -> Self {
        AgentMessage::Human {
            content: content.into(),
        }
    }

    #[cfg(test)]
    pub fn ai(content: impl Into<String>) -> Self {
        AgentMessage::Ai {
            content: content.into(),
        }
    }

    #[cfg(test)]
    pub fn tool(content: impl Into<String>) -> Self {
        AgentMessage::Tool {
            content: content.into(),
            name: None,
            tool_call_id: None,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            AgentMessage::Human { content }
            | AgentMessage::Tool { content, .. }
            | AgentMessage::Ai { content }
            | AgentMessage::System { content } => content,
            AgentMessage::Other => "",
        }
    }
}

/// Full conversation returned by one agent invocation, including tool results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRun {
    pub messages: Vec<AgentMessage>,
}

impl AgentRun {
    /// Content of the last message in the history, whatever its kind.
    pub fn final_text(&self) -> Option<&str> {
        self.messages.last().map(AgentMessage::content)
    }
}

/// Accepts plain string content or a list of content blocks, keeping only the text.
fn content_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|b| match b {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => b.get("text").and_then(|t| t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_message_serializes_with_type_tag() {
        let json = serde_json::to_value(AgentMessage::human("hello")).unwrap();
        assert_eq!(json["type"], "human");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_agent_run_deserializes_mixed_history() {
        let json = r#"{
            "messages": [
                {"type": "human", "content": "prompt"},
                {"type": "ai", "content": ""},
                {"type": "tool", "content": "[]", "name": "youtube_search", "tool_call_id": "call_1"},
                {"type": "ai", "content": "Score: 80%"}
            ]
        }"#;
        let run: AgentRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.messages.len(), 4);
        assert!(matches!(
            &run.messages[2],
            AgentMessage::Tool { name: Some(n), .. } if n == "youtube_search"
        ));
        assert_eq!(run.final_text(), Some("Score: 80%"));
    }

    #[test]
    fn test_content_blocks_are_flattened_to_text() {
        let json = r#"{"type": "ai", "content": [
            {"type": "text", "text": "Match: "},
            {"type": "tool_use", "id": "x"},
            {"type": "text", "text": "65%"}
        ]}"#;
        let msg: AgentMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content(), "Match: 65%");
    }

    #[test]
    fn test_unknown_message_types_do_not_break_decoding() {
        let json = r#"{
            "messages": [
                {"type": "human", "content": "prompt"},
                {"type": "function", "name": "lookup", "content": "{}"},
                {"type": "chat", "role": "critic", "content": "ok"},
                {"type": "ai", "content": "Score: 55%"}
            ]
        }"#;
        let run: AgentRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.messages.len(), 4);
        assert_eq!(run.messages[1], AgentMessage::Other);
        assert_eq!(run.messages[2].content(), "");
        assert_eq!(run.final_text(), Some("Score: 55%"));
    }

    #[test]
    fn test_final_text_of_empty_run_is_none() {
        assert_eq!(AgentRun::default().final_text(), None);
    }
}
