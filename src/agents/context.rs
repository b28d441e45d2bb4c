use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub sender: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, JsonValue>,
}

impl AgentMessage {
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }
}

/// Shared state for one pipeline run. Agents read it; the orchestrator appends to `history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewContext {
    pub user_id: i64,
    pub level: String,
    pub topic: String,
    pub history: Vec<AgentMessage>,
    pub goals: Vec<String>,
    pub code_under_review: Option<String>,
}

impl InterviewContext {
    pub fn new(user_id: i64, level: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            user_id,
            level: level.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }
}
