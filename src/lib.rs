pub mod agents;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::agents::AgentRegistry;
use crate::config::{init_config, Config};
use crate::database::{create_pool, Repositories};
use crate::error::{Error, Result};
use crate::services::{
    ai_service::build_ai_providers, answer_service::AnswerService,
    code_executor::PistonExecutor, notes_cache::NotesCache, question_service::QuestionService,
    rate_limiter::DailyUserLimiter, tutor_service::TutorService, user_service::UserService,
    voice_service::TelegramVoiceStorage,
};
use crate::utils::retry::RetryPolicy;
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub registry: Arc<AgentRegistry>,
    pub notes_cache: Arc<NotesCache>,
    pub rate_limiter: Arc<DailyUserLimiter>,
    pub user_service: UserService,
    pub question_service: QuestionService,
    pub answer_service: AnswerService,
    pub tutor_service: TutorService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.ai_timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let repos = Repositories::postgres(pool.clone());
        let ai = build_ai_providers(config, http_client.clone());
        tracing::info!(
            evaluator = ai.evaluator.name(),
            transcriber = ai.transcriber.name(),
            "AI providers configured"
        );

        let registry = Arc::new(AgentRegistry::builtin());
        let notes_cache = Arc::new(NotesCache::new(registry.clone(), config.notes_cache_ttl()));
        let rate_limiter = Arc::new(DailyUserLimiter::new(config.daily_limit_per_user));
        let voice = Arc::new(TelegramVoiceStorage::from_config(config, http_client.clone()));
        let tutor_service = TutorService::new(
            registry.clone(),
            Arc::new(PistonExecutor::from_config(config, http_client)),
        );

        let answer_service = AnswerService::new(
            repos.clone(),
            ai,
            voice,
            notes_cache.clone(),
            rate_limiter.clone(),
        )
        .with_retry(RetryPolicy::new(config.ai_max_attempts, config.retry_base_delay()))
        .with_call_timeout(config.ai_timeout());

        Ok(Self {
            pool,
            registry,
            notes_cache,
            rate_limiter,
            user_service: UserService::new(repos.users.clone()),
            question_service: QuestionService::new(repos.users.clone(), repos.questions.clone()),
            answer_service,
            tutor_service,
        })
    }
}

/// Loads configuration, installs logging, connects to Postgres and wires the services.
pub async fn bootstrap() -> Result<AppState> {
    let config = init_config()?;
    utils::telemetry::init_tracing(&config.log_level, &config.log_format)?;
    let pool = create_pool(config).await?;
    let state = AppState::new(pool, config)?;
    tracing::info!(
        daily_limit = config.daily_limit_per_user,
        notes_ttl_secs = config.notes_cache_ttl_secs,
        "interview coach ready"
    );
    Ok(state)
}
