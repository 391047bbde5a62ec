//! Users service

use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all users with the collection size
    pub async fn list_users(&self) -> (Vec<User>, usize) {
        let users = self.repository.users.read().await;
        (users.list(), users.count())
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.read().await.get_by_id(id)
    }

    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;
        self.repository.users.write().await.create(user)
    }

    pub async fn update_user(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        user.validate()?;
        self.repository.users.write().await.update(id, user)
    }

    /// Delete a user together with every loan referencing them
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        let mut users = self.repository.users.write().await;
        users.delete(id)?;

        let removed = self.repository.loans.write().await.delete_by_user(id)?;
        if removed > 0 {
            tracing::info!("Removed {} loans along with user {}", removed, id);
        }
        Ok(())
    }
}
