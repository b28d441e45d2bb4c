use crate::database::{QuestionRepository, UserRepository};
use crate::error::{Error, Result};
use crate::models::question::Question;
use std::sync::Arc;

#[derive(Clone)]
pub struct QuestionService {
    users: Arc<dyn UserRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(users: Arc<dyn UserRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { users, questions }
    }

    pub async fn get(&self, question_id: i64) -> Result<Question> {
        self.questions
            .get_by_id(question_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Question {} not found", question_id)))
    }

    /// Picks a random question and makes it the user's current one.
    /// `Ok(None)` means the level/category pool is exhausted.
    pub async fn next_for_user(
        &self,
        telegram_id: i64,
        level: &str,
        category: &str,
        exclude_ids: &[i64],
    ) -> Result<Option<Question>> {
        if self.users.get_by_telegram_id(telegram_id).await?.is_none() {
            return Err(Error::NotFound(format!("User {} not found", telegram_id)));
        }

        let question = self.questions.random(level, category, exclude_ids).await?;
        match &question {
            Some(q) => {
                self.users.set_current_question(telegram_id, Some(q.id)).await?;
            }
            None => tracing::info!(telegram_id, level, category, "no questions left for user"),
        }
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::{MockQuestionRepository, MockUserRepository};
    use crate::models::user::User;
    use chrono::Utc;

    fn question(id: i64) -> Question {
        Question {
            id,
            title: "CAP".into(),
            content: "Explain CAP.".into(),
            level: "senior".into(),
            category: "system_design".into(),
            question_type: "text".into(),
            points: 10,
            correct_answer: "Pick two under partition.".into(),
            explanation: None,
            hints: None,
            tags: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user() -> User {
        User {
            id: 1,
            telegram_id: 100,
            username: None,
            first_name: None,
            last_name: None,
            level: None,
            category: None,
            current_question_id: None,
            score: 0,
            questions_answered: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn next_question_becomes_current() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_telegram_id().returning(|_| Ok(Some(user())));
        users
            .expect_set_current_question()
            .withf(|tg, q| *tg == 100 && *q == Some(8))
            .times(1)
            .returning(|_, _| Ok(Some(user())));
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_random()
            .withf(|level, category, exclude| {
                level == "senior" && category == "system_design" && exclude == [1, 2]
            })
            .returning(|_, _, _| Ok(Some(question(8))));

        let svc = QuestionService::new(Arc::new(users), Arc::new(questions));
        let q = svc
            .next_for_user(100, "senior", "system_design", &[1, 2])
            .await
            .unwrap();
        assert_eq!(q.map(|q| q.id), Some(8));
    }

    #[tokio::test]
    async fn exhausted_pool_returns_none() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_telegram_id().returning(|_| Ok(Some(user())));
        users.expect_set_current_question().never();
        let mut questions = MockQuestionRepository::new();
        questions.expect_random().returning(|_, _, _| Ok(None));

        let svc = QuestionService::new(Arc::new(users), Arc::new(questions));
        assert!(svc
            .next_for_user(100, "junior", "security", &[])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_question_is_not_found() {
        let mut questions = MockQuestionRepository::new();
        questions.expect_get_by_id().returning(|_| Ok(None));

        let svc = QuestionService::new(Arc::new(MockUserRepository::new()), Arc::new(questions));
        assert!(matches!(svc.get(3).await, Err(Error::NotFound(_))));
    }
}
