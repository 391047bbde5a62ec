//! Loan management service
//!
//! The ledger itself never checks foreign keys; this service verifies that
//! the referenced book and user exist before a loan is created or replaced.

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanRecord, UpdateLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_loans(&self) -> Vec<LoanRecord> {
        self.repository.loans.read().await.get_all()
    }

    pub async fn get_loan(&self, id: i32) -> AppResult<LoanRecord> {
        self.repository.loans.read().await.get_by_id(id)
    }

    /// Get loans for a book
    pub async fn get_book_loans(&self, book_id: i32) -> AppResult<Vec<LoanRecord>> {
        // Verify book exists
        let books = self.repository.books.read().await;
        books.get_by_id(book_id)?;
        Ok(self.repository.loans.read().await.get_by_book(book_id))
    }

    /// Get loans for a user
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanRecord>> {
        // Verify user exists
        let users = self.repository.users.read().await;
        users.get_by_id(user_id)?;
        Ok(self.repository.loans.read().await.get_by_user(user_id))
    }

    /// Create a new loan (borrow a book)
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<i32> {
        let books = self.repository.books.read().await;
        let users = self.repository.users.read().await;
        books.get_by_id(loan.book_id)?;
        users.get_by_id(loan.user_id)?;

        self.repository
            .loans
            .write()
            .await
            .add(loan.book_id, loan.user_id)
    }

    /// Close a loan (return the book)
    pub async fn return_loan(&self, id: i32) -> AppResult<LoanRecord> {
        self.repository.loans.write().await.end_loan(id)
    }

    /// Replace a loan record wholesale
    pub async fn update_loan(&self, id: i32, loan: UpdateLoan) -> AppResult<LoanRecord> {
        if let Some(end_at) = loan.end_at {
            if end_at < loan.start_at {
                return Err(AppError::Validation(
                    "end_at cannot be earlier than start_at".to_string(),
                ));
            }
        }

        let books = self.repository.books.read().await;
        let users = self.repository.users.read().await;
        books.get_by_id(loan.book_id)?;
        users.get_by_id(loan.user_id)?;

        self.repository.loans.write().await.update(LoanRecord {
            id,
            book_id: loan.book_id,
            user_id: loan.user_id,
            start_at: loan.start_at,
            end_at: loan.end_at,
        })
    }

    pub async fn delete_loan(&self, id: i32) -> AppResult<()> {
        self.repository.loans.write().await.delete_by_id(id)
    }

    /// Delete all loans of a book, returning how many were removed
    pub async fn delete_book_loans(&self, book_id: i32) -> AppResult<usize> {
        self.repository.loans.write().await.delete_by_book(book_id)
    }

    /// Delete all loans of a user, returning how many were removed
    pub async fn delete_user_loans(&self, user_id: i32) -> AppResult<usize> {
        self.repository.loans.write().await.delete_by_user(user_id)
    }
}
