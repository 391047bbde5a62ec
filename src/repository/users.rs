//! Users repository

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, Users},
    storage::JsonFile,
};

pub struct UsersRepository {
    file: JsonFile,
    users: Users,
}

impl UsersRepository {
    pub fn load(file: JsonFile) -> AppResult<Self> {
        let mut users: Users = file.load()?.unwrap_or_default();
        users.total = users.users.len();

        tracing::info!("Loaded {} users from {}", users.total, file.path().display());

        Ok(Self { file, users })
    }

    pub fn list(&self) -> Vec<User> {
        self.users.users.clone()
    }

    pub fn count(&self) -> usize {
        self.users.total
    }

    /// Get user by ID
    pub fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.users
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub fn create(&mut self, data: CreateUser) -> AppResult<User> {
        let id = self.users.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name: data.name,
            surname: data.surname,
        };

        self.users.users.push(user.clone());
        self.users.total = self.users.users.len();

        tracing::info!("Created user {}", user.id);
        self.persist()?;
        Ok(user)
    }

    pub fn update(&mut self, id: i32, data: UpdateUser) -> AppResult<User> {
        let user = self
            .users
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(surname) = data.surname {
            user.surname = surname;
        }
        let user = user.clone();

        self.persist()?;
        Ok(user)
    }

    pub fn delete(&mut self, id: i32) -> AppResult<()> {
        let index = self
            .users
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| not_found(id))?;

        self.users.users.remove(index);
        self.users.total = self.users.users.len();

        tracing::info!("Deleted user {}", id);
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        self.file.save(&self.users).map_err(|e| {
            tracing::error!("Failed to persist users: {}", e);
            AppError::from(e)
        })
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("User with id {} not found", id))
}
