//! Lending ledger: the file-backed collection of loan records
//!
//! Identifier policy: a new record gets `count + 1`, and every deletion
//! renumbers the surviving records to `0..count` in storage order. Existing
//! ledger files and API clients depend on this numbering, so ids handed out
//! before a deletion must be treated as stale afterwards.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Ledger, LoanRecord},
    storage::JsonFile,
};

pub struct LoansRepository {
    file: JsonFile,
    ledger: Ledger,
}

impl LoansRepository {
    /// Load the ledger from its backing file.
    ///
    /// A missing or blank file gives an empty ledger. Malformed content is
    /// returned as a storage error and the store must not start.
    pub fn load(file: JsonFile) -> AppResult<Self> {
        let mut ledger: Ledger = file.load()?.unwrap_or_default();

        if ledger.count != ledger.records.len() {
            tracing::warn!(
                "Ledger {} declares {} records but holds {}, using the latter",
                file.path().display(),
                ledger.count,
                ledger.records.len()
            );
            ledger.count = ledger.records.len();
        }

        tracing::info!(
            "Loaded {} loan records from {}",
            ledger.count,
            file.path().display()
        );

        Ok(Self { file, ledger })
    }

    /// Number of records currently held
    pub fn count(&self) -> usize {
        self.ledger.count
    }

    /// Open a loan and return its id
    pub fn add(&mut self, book_id: i32, user_id: i32) -> AppResult<i32> {
        let id = self.ledger.count as i32 + 1;

        self.ledger.records.push(LoanRecord {
            id,
            book_id,
            user_id,
            start_at: Utc::now(),
            end_at: None,
        });
        self.ledger.count += 1;

        tracing::info!("Opened loan {} (book {}, user {})", id, book_id, user_id);
        self.persist()?;
        Ok(id)
    }

    /// Get loan by ID
    pub fn get_by_id(&self, id: i32) -> AppResult<LoanRecord> {
        self.ledger
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Loans referencing a book, in storage order
    pub fn get_by_book(&self, book_id: i32) -> Vec<LoanRecord> {
        self.filtered(|r| r.book_id == book_id)
    }

    /// Loans referencing a user, in storage order
    pub fn get_by_user(&self, user_id: i32) -> Vec<LoanRecord> {
        self.filtered(|r| r.user_id == user_id)
    }

    pub fn get_all(&self) -> Vec<LoanRecord> {
        self.ledger.records.clone()
    }

    /// Close a loan by stamping its end time.
    ///
    /// Closing an already closed loan stamps it again.
    pub fn end_loan(&mut self, id: i32) -> AppResult<LoanRecord> {
        let record = self
            .ledger
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;

        record.end_at = Some(Utc::now());
        let record = record.clone();

        tracing::info!("Closed loan {}", id);
        self.persist()?;
        Ok(record)
    }

    pub fn delete_by_id(&mut self, id: i32) -> AppResult<()> {
        let index = self
            .ledger
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;

        self.ledger.records.remove(index);
        self.renumber();

        tracing::info!("Deleted loan {}", id);
        self.persist()
    }

    /// Delete every loan of a book, returning how many were removed.
    ///
    /// When nothing matches the ledger is left untouched and not rewritten.
    pub fn delete_by_book(&mut self, book_id: i32) -> AppResult<usize> {
        let removed = self.retain(|r| r.book_id != book_id);
        if removed == 0 {
            return Ok(0);
        }
        tracing::info!("Deleted {} loans of book {}", removed, book_id);
        self.persist()?;
        Ok(removed)
    }

    /// Delete every loan of a user, returning how many were removed.
    ///
    /// When nothing matches the ledger is left untouched and not rewritten.
    pub fn delete_by_user(&mut self, user_id: i32) -> AppResult<usize> {
        let removed = self.retain(|r| r.user_id != user_id);
        if removed == 0 {
            return Ok(0);
        }
        tracing::info!("Deleted {} loans of user {}", removed, user_id);
        self.persist()?;
        Ok(removed)
    }

    /// Replace the record carrying `record.id` with `record`
    pub fn update(&mut self, record: LoanRecord) -> AppResult<LoanRecord> {
        let slot = self
            .ledger
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| not_found(record.id))?;

        *slot = record.clone();

        tracing::info!("Updated loan {}", record.id);
        self.persist()?;
        Ok(record)
    }

    fn filtered(&self, predicate: impl Fn(&LoanRecord) -> bool) -> Vec<LoanRecord> {
        self.ledger
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    fn retain(&mut self, keep: impl Fn(&LoanRecord) -> bool) -> usize {
        let before = self.ledger.records.len();
        self.ledger.records.retain(|r| keep(r));
        let removed = before - self.ledger.records.len();
        if removed > 0 {
            self.renumber();
        }
        removed
    }

    /// Reassign ids as `0..count` in storage order and resync `count`
    fn renumber(&mut self) {
        for (i, record) in self.ledger.records.iter_mut().enumerate() {
            record.id = i as i32;
        }
        self.ledger.count = self.ledger.records.len();
    }

    /// Write the whole ledger. On failure the in-memory state is kept.
    fn persist(&self) -> AppResult<()> {
        self.file.save(&self.ledger).map_err(|e| {
            tracing::error!("Failed to persist ledger: {}", e);
            AppError::from(e)
        })
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Loan with id {} not found", id))
}
