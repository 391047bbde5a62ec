//! Catalog (books) service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books with the collection size
    pub async fn list_books(&self) -> (Vec<Book>, usize) {
        let books = self.repository.books.read().await;
        (books.list(), books.count())
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.read().await.get_by_id(id)
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        self.repository.books.write().await.create(book)
    }

    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()?;
        self.repository.books.write().await.update(id, book)
    }

    /// Delete a book together with every loan referencing it
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let mut books = self.repository.books.write().await;
        books.delete(id)?;

        let removed = self.repository.loans.write().await.delete_by_book(id)?;
        if removed > 0 {
            tracing::info!("Removed {} loans along with book {}", removed, id);
        }
        Ok(())
    }
}
