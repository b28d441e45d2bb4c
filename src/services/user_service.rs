use crate::database::UserRepository;
use crate::error::{Error, Result};
use crate::models::question::{Category, Level};
use crate::models::user::{NewUser, User, UserStats};
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_or_create(&self, new_user: &NewUser) -> Result<User> {
        if let Some(user) = self.users.get_by_telegram_id(new_user.telegram_id).await? {
            return Ok(user);
        }
        let user = self.users.create(new_user).await?;
        tracing::info!(telegram_id = user.telegram_id, user_id = user.id, "user registered");
        Ok(user)
    }

    pub async fn update_level(&self, telegram_id: i64, level: &str) -> Result<User> {
        let level: Level = level.parse().map_err(Error::BadRequest)?;
        self.users
            .set_level(telegram_id, level.as_str())
            .await?
            .ok_or_else(|| user_not_found(telegram_id))
    }

    pub async fn update_category(&self, telegram_id: i64, category: &str) -> Result<User> {
        let category: Category = category.parse().map_err(Error::BadRequest)?;
        self.users
            .set_category(telegram_id, category.as_str())
            .await?
            .ok_or_else(|| user_not_found(telegram_id))
    }

    pub async fn stats(&self, telegram_id: i64) -> Result<UserStats> {
        let user = self
            .users
            .get_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| user_not_found(telegram_id))?;
        self.users
            .stats(user.id)
            .await?
            .ok_or_else(|| user_not_found(telegram_id))
    }
}

fn user_not_found(telegram_id: i64) -> Error {
    Error::NotFound(format!("User {} not found", telegram_id))
}
