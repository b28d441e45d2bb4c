#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use interview_coach::agents::{Agent, AgentMessage, InterviewContext};
use interview_coach::database::{
    AnswerRepository, QuestionRepository, Repositories, UserRepository,
};
use interview_coach::error::{Error, Result};
use interview_coach::models::answer::{Answer, EvaluationResult, NewAnswer};
use interview_coach::models::question::Question;
use interview_coach::models::user::{NewUser, User, UserStats};
use interview_coach::services::ai_service::AiProvider;
use interview_coach::services::scoring_prompt::ScoringPrompt;
use interview_coach::services::voice_service::VoiceStorage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Agent that counts how often it runs and records the history length it saw.
pub struct CountingAgent {
    pub id: String,
    pub calls: AtomicUsize,
    pub seen_history: Mutex<Vec<usize>>,
}

impl CountingAgent {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            calls: AtomicUsize::new(0),
            seen_history: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Agent for CountingAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "counts invocations"
    }

    fn act(&self, ctx: &InterviewContext) -> AgentMessage {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_history.lock().unwrap().push(ctx.history.len());
        AgentMessage::new(&self.id, format!("advice on {}", ctx.topic))
    }
}

pub fn question(id: i64, category: &str, level: &str, title: &str) -> Question {
    Question {
        id,
        title: title.to_string(),
        content: format!("Tell me about {}", title),
        level: level.to_string(),
        category: category.to_string(),
        question_type: "text".to_string(),
        points: 10,
        correct_answer: "reference answer".to_string(),
        explanation: Some("why".to_string()),
        hints: None,
        tags: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.telegram_id == telegram_id)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let created = User {
            id: users.len() as i64 + 1,
            telegram_id: user.telegram_id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            level: None,
            category: None,
            current_question_id: None,
            score: 0,
            questions_answered: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn set_level(&self, telegram_id: i64, level: &str) -> Result<Option<User>> {
        Ok(self.update(telegram_id, |u| u.level = Some(level.to_string())))
    }

    async fn set_category(&self, telegram_id: i64, category: &str) -> Result<Option<User>> {
        Ok(self.update(telegram_id, |u| u.category = Some(category.to_string())))
    }

    async fn set_current_question(
        &self,
        telegram_id: i64,
        question_id: Option<i64>,
    ) -> Result<Option<User>> {
        Ok(self.update(telegram_id, |u| u.current_question_id = question_id))
    }

    async fn record_score(&self, telegram_id: i64, delta: i32) -> Result<()> {
        self.update(telegram_id, |u| {
            u.score += delta;
            u.questions_answered += 1;
        });
        Ok(())
    }

    async fn stats(&self, user_id: i64) -> Result<Option<UserStats>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| UserStats {
                user_id: u.id,
                total_score: u.score,
                questions_answered: u.questions_answered,
                average_score: if u.questions_answered > 0 {
                    u.score as f64 / u.questions_answered as f64
                } else {
                    0.0
                },
                level: u.level.clone(),
                category: u.category.clone(),
                last_activity: Some(u.updated_at),
            }))
    }
}

impl InMemoryUsers {
    fn update(&self, telegram_id: i64, f: impl FnOnce(&mut User)) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.telegram_id == telegram_id)?;
        f(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }
}

#[derive(Default)]
pub struct InMemoryQuestions {
    pub questions: Mutex<Vec<Question>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestions {
    async fn get_by_id(&self, question_id: i64) -> Result<Option<Question>> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == question_id)
            .cloned())
    }

    async fn random(
        &self,
        level: &str,
        category: &str,
        exclude_ids: &[i64],
    ) -> Result<Option<Question>> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| {
                q.level == level && q.category == category && !exclude_ids.contains(&q.id)
            })
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAnswers {
    pub answers: Mutex<Vec<Answer>>,
}

#[async_trait]
impl AnswerRepository for InMemoryAnswers {
    async fn create(&self, answer: &NewAnswer) -> Result<Answer> {
        let mut answers = self.answers.lock().unwrap();
        let created = Answer {
            id: answers.len() as i64 + 1,
            user_id: answer.user_id,
            question_id: answer.question_id,
            answer_text: answer.answer_text.clone(),
            answer_type: answer.answer_type.as_str().to_string(),
            score: None,
            feedback: None,
            voice_file_id: answer.voice_file_id.clone(),
            created_at: Utc::now(),
        };
        answers.push(created.clone());
        Ok(created)
    }

    async fn set_score(
        &self,
        answer_id: i64,
        score: i32,
        feedback: &str,
    ) -> Result<Option<Answer>> {
        let mut answers = self.answers.lock().unwrap();
        Ok(answers.iter_mut().find(|a| a.id == answer_id).map(|a| {
            a.score = Some(score);
            a.feedback = Some(feedback.to_string());
            a.clone()
        }))
    }
}

pub struct Store {
    pub users: Arc<InMemoryUsers>,
    pub questions: Arc<InMemoryQuestions>,
    pub answers: Arc<InMemoryAnswers>,
}

impl Store {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            users: Arc::new(InMemoryUsers::default()),
            questions: Arc::new(InMemoryQuestions {
                questions: Mutex::new(questions),
            }),
            answers: Arc::new(InMemoryAnswers::default()),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users.clone(),
            questions: self.questions.clone(),
            answers: self.answers.clone(),
        }
    }
}

/// Replays queued outcomes; an empty queue answers with a provider error.
#[derive(Default)]
pub struct ScriptedProvider {
    pub evaluations: Mutex<VecDeque<Result<EvaluationResult>>>,
    pub transcripts: Mutex<VecDeque<Result<String>>>,
    pub evaluate_calls: AtomicUsize,
    pub transcribe_calls: AtomicUsize,
    pub prompts: Mutex<Vec<ScoringPrompt>>,
}

impl ScriptedProvider {
    pub fn scoring(score: i32) -> Arc<Self> {
        let provider = Self::default();
        provider.evaluations.lock().unwrap().push_back(Ok(EvaluationResult {
            score,
            feedback: "Good answer".to_string(),
            is_correct: score > 0,
            strengths: vec![],
            improvements: vec![],
        }));
        Arc::new(provider)
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_transcript(self: Arc<Self>, text: &str) -> Arc<Self> {
        self.transcripts.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn total_calls(&self) -> usize {
        self.evaluate_calls.load(Ordering::SeqCst) + self.transcribe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn evaluate(&self, prompt: &ScoringPrompt) -> Result<EvaluationResult> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        self.evaluations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Provider("scripted outage".to_string())))
    }

    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        self.transcribe_calls.fetch_add(1, Ordering::SeqCst);
        self.transcripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Provider("scripted outage".to_string())))
    }
}

#[derive(Default)]
pub struct FakeVoice {
    pub downloads: AtomicUsize,
    pub cleanups: AtomicUsize,
}

#[async_trait]
impl VoiceStorage for FakeVoice {
    async fn download(&self, file_id: &str) -> Result<PathBuf> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(PathBuf::from(format!("temp/{}.ogg", file_id)))
    }

    async fn cleanup(&self, _path: &Path) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Never replies; every call must be cut off by the caller's timeout.
#[derive(Default)]
pub struct HangingProvider {
    pub evaluate_calls: AtomicUsize,
}

#[async_trait]
impl AiProvider for HangingProvider {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn evaluate(&self, _prompt: &ScoringPrompt) -> Result<EvaluationResult> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        std::future::pending().await
    }
}
