//! Repository layer: the file-backed collections
//!
//! Every collection sits behind its own `RwLock`; mutations take the write
//! lock so there is a single writer per collection. When more than one lock
//! is needed they are taken in the order books, users, loans.

pub mod books;
pub mod loans;
pub mod users;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{config::StorageConfig, error::AppResult, storage::JsonFile};

/// Main repository struct holding the loaded collections
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<RwLock<books::BooksRepository>>,
    pub users: Arc<RwLock<users::UsersRepository>>,
    pub loans: Arc<RwLock<loans::LoansRepository>>,
}

impl Repository {
    /// Load every collection from the configured data directory
    pub fn load(config: &StorageConfig) -> AppResult<Self> {
        Ok(Self {
            books: Arc::new(RwLock::new(books::BooksRepository::load(JsonFile::new(
                config.books_path(),
            ))?)),
            users: Arc::new(RwLock::new(users::UsersRepository::load(JsonFile::new(
                config.users_path(),
            ))?)),
            loans: Arc::new(RwLock::new(loans::LoansRepository::load(JsonFile::new(
                config.loans_path(),
            ))?)),
        })
    }
}
