//! Data models for the library server

pub mod book;
pub mod loan;
pub mod user;

use serde::{Deserialize, Deserializer};

// Re-export commonly used types
pub use book::{Book, Library};
pub use loan::{Ledger, LoanRecord};
pub use user::{User, Users};

/// Treat a `null` list in a persisted document as an empty one
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
