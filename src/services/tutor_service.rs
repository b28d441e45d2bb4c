use crate::agents::{AgentMessage, AgentRegistry, InterviewContext};
use crate::agents::registry::PYTHON_MENTOR_PIPELINE;
use crate::error::{Error, Result};
use crate::models::execution::{CodeRun, ExecutionResult};
use crate::services::code_executor::CodeExecutor;
use crate::services::interview_service::{mentor_round, InterviewOrchestrator};
use std::sync::Arc;

const MAX_CODE_BYTES: usize = 64 * 1024;

/// Python mentor: scripted lesson rounds plus sandboxed runs of the learner's code.
#[derive(Clone)]
pub struct TutorService {
    registry: Arc<AgentRegistry>,
    executor: Arc<dyn CodeExecutor>,
}

impl TutorService {
    pub fn new(registry: Arc<AgentRegistry>, executor: Arc<dyn CodeExecutor>) -> Self {
        Self { registry, executor }
    }

    pub fn start_round(&self, user_id: i64, level: &str, topic: &str) -> Vec<AgentMessage> {
        mentor_round(&self.registry, user_id, level, topic)
    }

    pub async fn run_code(&self, code: &str, stdin: &str) -> Result<ExecutionResult> {
        if code.trim().is_empty() {
            return Err(Error::BadRequest("Code must not be empty".to_string()));
        }
        if code.len() > MAX_CODE_BYTES {
            return Err(Error::BadRequest(format!(
                "Code is larger than {} bytes",
                MAX_CODE_BYTES
            )));
        }

        let result = self.executor.execute(code, stdin).await?;
        tracing::info!(
            exit_code = ?result.run.code,
            signal = ?result.run.signal,
            "learner code executed"
        );
        Ok(result)
    }

    /// Runs the submission, then replays the mentor round with the code under review.
    pub async fn review_submission(
        &self,
        user_id: i64,
        level: &str,
        topic: &str,
        submission: &CodeRun,
    ) -> Result<(ExecutionResult, Vec<AgentMessage>)> {
        let result = self.run_code(&submission.code, &submission.stdin).await?;

        let mut ctx = InterviewContext::new(user_id, level, topic);
        ctx.code_under_review = Some(submission.code.clone());
        if !result.succeeded() {
            ctx.goals.push("make the program exit cleanly".to_string());
        }
        let messages = InterviewOrchestrator::new(&self.registry, PYTHON_MENTOR_PIPELINE)
            .critique(&mut ctx);
        Ok((result, messages))
    }
}
