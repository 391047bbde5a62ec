//! Books repository

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, Library, UpdateBook, DEFAULT_PRICE},
    storage::JsonFile,
};

pub struct BooksRepository {
    file: JsonFile,
    library: Library,
}

impl BooksRepository {
    pub fn load(file: JsonFile) -> AppResult<Self> {
        let mut library: Library = file.load()?.unwrap_or_default();
        library.total = library.books.len();

        tracing::info!(
            "Loaded {} books from {}",
            library.total,
            file.path().display()
        );

        Ok(Self { file, library })
    }

    pub fn list(&self) -> Vec<Book> {
        self.library.books.clone()
    }

    pub fn count(&self) -> usize {
        self.library.total
    }

    /// Get book by ID
    pub fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.library
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Create a new book. Ids are never reused while the highest one survives.
    pub fn create(&mut self, data: CreateBook) -> AppResult<Book> {
        let id = self.library.books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let book = Book {
            id,
            name: data.name,
            author: data.author,
            price: data.price.unwrap_or(DEFAULT_PRICE),
        };

        self.library.books.push(book.clone());
        self.library.total = self.library.books.len();

        tracing::info!("Created book {} ({})", book.id, book.name);
        self.persist()?;
        Ok(book)
    }

    pub fn update(&mut self, id: i32, data: UpdateBook) -> AppResult<Book> {
        let book = self
            .library
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = data.name {
            book.name = name;
        }
        if let Some(author) = data.author {
            book.author = author;
        }
        if let Some(price) = data.price {
            book.price = price;
        }
        let book = book.clone();

        self.persist()?;
        Ok(book)
    }

    pub fn delete(&mut self, id: i32) -> AppResult<()> {
        let index = self
            .library
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| not_found(id))?;

        self.library.books.remove(index);
        self.library.total = self.library.books.len();

        tracing::info!("Deleted book {}", id);
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        self.file.save(&self.library).map_err(|e| {
            tracing::error!("Failed to persist books: {}", e);
            AppError::from(e)
        })
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book with id {} not found", id))
}
