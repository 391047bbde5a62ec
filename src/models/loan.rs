//! Loan (purchase) model and the ledger document

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::null_as_empty;

/// A single entry of the lending ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanRecord {
    /// Ledger-assigned identifier
    pub id: i32,
    /// Borrowed book
    pub book_id: i32,
    /// Borrowing user
    pub user_id: i32,
    /// When the loan was opened
    pub start_at: DateTime<Utc>,
    /// When the loan was closed, absent while it is open
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_end_at"
    )]
    pub end_at: Option<DateTime<Utc>>,
}

impl LoanRecord {
    pub fn is_open(&self) -> bool {
        self.end_at.is_none()
    }
}

/// Older documents store an open loan's `end_at` as the zero timestamp
/// (`0001-01-01T00:00:00Z`) instead of omitting it.
fn deserialize_end_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(value.filter(|t| t.year() > 1))
}

/// Persisted ledger document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "purchases", default, deserialize_with = "null_as_empty")]
    pub records: Vec<LoanRecord>,
    #[serde(rename = "total", default)]
    pub count: usize,
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    pub user_id: i32,
}

/// Replace loan request; every field of the stored record is overwritten
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub book_id: i32,
    pub user_id: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_end_at_reads_as_open() {
        let json = r#"{"id":0,"book_id":1,"user_id":2,
            "start_at":"2024-05-01T10:00:00Z","end_at":"0001-01-01T00:00:00Z"}"#;
        let record: LoanRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_open());
    }

    #[test]
    fn test_open_loan_omits_end_at() {
        let record = LoanRecord {
            id: 1,
            book_id: 3,
            user_id: 4,
            start_at: Utc::now(),
            end_at: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("end_at").is_none());
        assert_eq!(value["book_id"], 3);
    }

    #[test]
    fn test_ledger_accepts_null_purchases() {
        let ledger: Ledger = serde_json::from_str(r#"{"purchases":null,"total":0}"#).unwrap();
        assert!(ledger.records.is_empty());
    }
}
