pub mod ai_service;
pub mod answer_service;
pub mod code_executor;
pub mod gigachat_service;
pub mod interview_service;
pub mod notes_cache;
pub mod question_service;
pub mod rate_limiter;
pub mod scoring_prompt;
pub mod tutor_service;
pub mod user_service;
pub mod voice_service;
