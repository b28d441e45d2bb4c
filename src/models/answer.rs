use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Text,
    Voice,
}

impl AnswerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerType::Text => "text",
            AnswerType::Voice => "voice",
        }
    }
}

/// A stored answer. `score` and `feedback` stay `None` while evaluation is pending.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub answer_text: String,
    pub answer_type: String,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub voice_file_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub user_id: i64,
    pub question_id: i64,
    pub answer_text: String,
    pub answer_type: AnswerType,
    pub voice_file_id: Option<String>,
}

/// What the AI provider returns for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: i32,
    pub feedback: String,
    pub is_correct: bool,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub answer_id: i64,
    pub score: i32,
    pub feedback: String,
    pub is_correct: bool,
}
