use crate::error::Result;
use crate::models::answer::{Answer, NewAnswer};
use crate::models::question::Question;
use crate::models::user::{NewUser, User, UserStats};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>>;

    async fn create(&self, user: &NewUser) -> Result<User>;

    async fn set_level(&self, telegram_id: i64, level: &str) -> Result<Option<User>>;

    async fn set_category(&self, telegram_id: i64, category: &str) -> Result<Option<User>>;

    async fn set_current_question(
        &self,
        telegram_id: i64,
        question_id: Option<i64>,
    ) -> Result<Option<User>>;

    /// Adds `delta` to the score and bumps the answered counter in one statement.
    async fn record_score(&self, telegram_id: i64, delta: i32) -> Result<()>;

    async fn stats(&self, user_id: i64) -> Result<Option<UserStats>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn get_by_id(&self, question_id: i64) -> Result<Option<Question>>;

    async fn random(
        &self,
        level: &str,
        category: &str,
        exclude_ids: &[i64],
    ) -> Result<Option<Question>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create(&self, answer: &NewAnswer) -> Result<Answer>;

    async fn set_score(&self, answer_id: i64, score: i32, feedback: &str) -> Result<Option<Answer>>;
}

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            questions: Arc::new(PgQuestionRepository::new(pool.clone())),
            answers: Arc::new(PgAnswerRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_id = $1")
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (telegram_id, username, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user.telegram_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_level(&self, telegram_id: i64, level: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET level = $2, updated_at = NOW() WHERE telegram_id = $1 RETURNING *",
        )
        .bind(telegram_id)
        .bind(level)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_category(&self, telegram_id: i64, category: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET category = $2, updated_at = NOW() WHERE telegram_id = $1 RETURNING *",
        )
        .bind(telegram_id)
        .bind(category)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_current_question(
        &self,
        telegram_id: i64,
        question_id: Option<i64>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET current_question_id = $2, updated_at = NOW() \
             WHERE telegram_id = $1 RETURNING *",
        )
        .bind(telegram_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn record_score(&self, telegram_id: i64, delta: i32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET score = score + $2,
                questions_answered = questions_answered + 1,
                updated_at = NOW()
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .bind(delta)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn stats(&self, user_id: i64) -> Result<Option<UserStats>> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT u.id AS user_id,
                   u.score AS total_score,
                   u.questions_answered,
                   COALESCE(AVG(a.score), 0)::float8 AS average_score,
                   u.level,
                   u.category,
                   MAX(a.created_at) AS last_activity
            FROM users u
            LEFT JOIN answers a ON a.user_id = u.id AND a.score IS NOT NULL
            WHERE u.id = $1
            GROUP BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stats)
    }
}

#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn get_by_id(&self, question_id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(question)
    }

    async fn random(
        &self,
        level: &str,
        category: &str,
        exclude_ids: &[i64],
    ) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT * FROM questions
            WHERE level = $1 AND category = $2 AND NOT (id = ANY($3))
            ORDER BY RANDOM()
            LIMIT 1
            "#,
        )
        .bind(level)
        .bind(category)
        .bind(exclude_ids)
        .fetch_optional(&self.pool)
        .await?;
        Ok(question)
    }
}

#[derive(Clone)]
pub struct PgAnswerRepository {
    pool: PgPool,
}

impl PgAnswerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerRepository for PgAnswerRepository {
    async fn create(&self, answer: &NewAnswer) -> Result<Answer> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (user_id, question_id, answer_text, answer_type, voice_file_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(answer.user_id)
        .bind(answer.question_id)
        .bind(&answer.answer_text)
        .bind(answer.answer_type.as_str())
        .bind(&answer.voice_file_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(answer)
    }

    async fn set_score(
        &self,
        answer_id: i64,
        score: i32,
        feedback: &str,
    ) -> Result<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(
            "UPDATE answers SET score = $2, feedback = $3 WHERE id = $1 RETURNING *",
        )
        .bind(answer_id)
        .bind(score)
        .bind(feedback)
        .fetch_optional(&self.pool)
        .await?;
        Ok(answer)
    }
}
