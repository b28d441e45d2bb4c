use crate::database::Repositories;
use crate::error::{Error, Result};
use crate::models::answer::{Answer, AnswerEvaluation, AnswerType, EvaluationResult, NewAnswer};
use crate::models::question::Question;
use crate::models::user::User;
use crate::services::ai_service::AiProviders;
use crate::services::notes_cache::NotesCache;
use crate::services::rate_limiter::DailyUserLimiter;
use crate::services::scoring_prompt::build_scoring_prompt;
use crate::services::voice_service::VoiceStorage;
use crate::utils::retry::{retry_with_backoff, RetryPolicy};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const SOFT_FAILURE_FEEDBACK: &str =
    "An error occurred while evaluating your answer. Please try again.";

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Scores submitted answers: quota, expert notes, prompt, provider call, write-back.
#[derive(Clone)]
pub struct AnswerService {
    repos: Repositories,
    ai: AiProviders,
    voice: Arc<dyn VoiceStorage>,
    notes: Arc<NotesCache>,
    limiter: Arc<DailyUserLimiter>,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl AnswerService {
    pub fn new(
        repos: Repositories,
        ai: AiProviders,
        voice: Arc<dyn VoiceStorage>,
        notes: Arc<NotesCache>,
        limiter: Arc<DailyUserLimiter>,
    ) -> Self {
        Self {
            repos,
            ai,
            voice,
            notes,
            limiter,
            retry: RetryPolicy::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub async fn submit_text_answer(
        &self,
        telegram_id: i64,
        question_id: i64,
        answer_text: &str,
    ) -> Result<(Answer, AnswerEvaluation)> {
        let (user, question) = self.load(telegram_id, question_id).await?;
        self.check_quota(&user)?;

        let answer = self
            .repos
            .answers
            .create(&NewAnswer {
                user_id: user.id,
                question_id: question.id,
                answer_text: answer_text.to_string(),
                answer_type: AnswerType::Text,
                voice_file_id: None,
            })
            .await?;

        self.evaluate_and_store(&user, &question, answer, AnswerType::Text).await
    }

    /// Quota is checked before the download, so an over-quota user costs no provider calls.
    pub async fn submit_voice_answer(
        &self,
        telegram_id: i64,
        question_id: i64,
        voice_file_id: &str,
    ) -> Result<(Answer, AnswerEvaluation)> {
        let (user, question) = self.load(telegram_id, question_id).await?;
        self.check_quota(&user)?;

        let text = self.transcribe_voice(voice_file_id).await?;

        let answer = self
            .repos
            .answers
            .create(&NewAnswer {
                user_id: user.id,
                question_id: question.id,
                answer_text: text,
                answer_type: AnswerType::Voice,
                voice_file_id: Some(voice_file_id.to_string()),
            })
            .await?;

        self.evaluate_and_store(&user, &question, answer, AnswerType::Voice).await
    }

    async fn load(&self, telegram_id: i64, question_id: i64) -> Result<(User, Question)> {
        let user = self
            .repos
            .users
            .get_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", telegram_id)))?;
        let question = self
            .repos
            .questions
            .get_by_id(question_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Question {} not found", question_id)))?;
        Ok((user, question))
    }

    fn check_quota(&self, user: &User) -> Result<()> {
        if self.limiter.allow(user.id) {
            Ok(())
        } else {
            Err(Error::QuotaExceeded(format!(
                "Daily limit of {} evaluations reached",
                self.limiter.limit()
            )))
        }
    }

    async fn timed<T>(&self, operation: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| {
                Error::Provider(format!("{} timed out after {:?}", operation, self.call_timeout))
            })?
    }

    async fn transcribe_voice(&self, voice_file_id: &str) -> Result<String> {
        let path = self
            .timed("voice download", self.voice.download(voice_file_id))
            .await
            .map_err(|e| {
                tracing::warn!(voice_file_id, error = %e, "voice download failed");
                Error::TranscriptionFailed("Could not download the voice message".to_string())
            })?;

        let transcriber = self.ai.transcriber.clone();
        let result = retry_with_backoff(&self.retry, "transcribe", |_| {
            self.timed("transcription", transcriber.transcribe(&path))
        })
        .await;
        self.voice.cleanup(&path).await;

        match result {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => Err(Error::TranscriptionFailed(
                "The voice message contained no recognizable speech".to_string(),
            )),
            Err(e) => {
                tracing::error!(voice_file_id, error = %e, "transcription failed");
                Err(Error::TranscriptionFailed(
                    "Could not transcribe the voice message".to_string(),
                ))
            }
        }
    }

    async fn evaluate_and_store(
        &self,
        user: &User,
        question: &Question,
        answer: Answer,
        answer_type: AnswerType,
    ) -> Result<(Answer, AnswerEvaluation)> {
        let notes = self
            .notes
            .prepare_notes(&question.category, user.id, &question.level, &question.title);
        let prompt = build_scoring_prompt(question, &answer.answer_text, answer_type, &notes);

        let evaluator = self.ai.evaluator.clone();
        let result = retry_with_backoff(&self.retry, "evaluate", |_| {
            self.timed("evaluation", evaluator.evaluate(&prompt))
        })
        .await;

        let result = match result {
            Ok(mut r) => {
                r.score = r.score.clamp(0, prompt.max_points.max(0));
                r
            }
            Err(e) => {
                tracing::error!(
                    answer_id = answer.id,
                    error = %e,
                    "evaluation failed, scoring zero"
                );
                soft_failure()
            }
        };

        let stored = self
            .repos
            .answers
            .set_score(answer.id, result.score, &result.feedback)
            .await?;
        self.repos
            .users
            .record_score(user.telegram_id, result.score)
            .await?;

        tracing::info!(
            user_id = user.id,
            question_id = question.id,
            answer_id = answer.id,
            score = result.score,
            "answer evaluated"
        );

        let evaluation = AnswerEvaluation {
            answer_id: answer.id,
            score: result.score,
            feedback: result.feedback.clone(),
            is_correct: result.is_correct,
        };
        let answer = stored.unwrap_or(Answer {
            score: Some(result.score),
            feedback: Some(result.feedback),
            ..answer
        });
        Ok((answer, evaluation))
    }
}

fn soft_failure() -> EvaluationResult {
    EvaluationResult {
        score: 0,
        feedback: SOFT_FAILURE_FEEDBACK.to_string(),
        is_correct: false,
        strengths: Vec::new(),
        improvements: Vec::new(),
    }
}
