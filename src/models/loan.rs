//! Loan (emprunt) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::book::{BookRef, BookSummary};

/// Fixed loan period: a borrowed book is due back 14 days later
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Due date for a loan started at `borrowed_at`
pub fn due_date(borrowed_at: DateTime<Utc>) -> DateTime<Utc> {
    borrowed_at + Duration::days(LOAN_PERIOD_DAYS)
}

/// Loan lifecycle status. Active is the sole initial state; Returned is
/// terminal and a loan is never reopened or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

/// Result of a successful borrow
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowReceipt {
    pub loan_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

/// Result of a successful return
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceipt {
    pub loan_id: i32,
    pub returned_at: DateTime<Utc>,
}

/// A user's loan joined with minimal book fields
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLoan {
    pub id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub book: BookSummary,
}

/// Minimal user fields joined into the admin loan view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserRef {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Loan joined with user and book fields, for the admin view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoan {
    pub id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub user: UserRef,
    pub book: BookRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_is_fourteen_days_out() {
        let borrowed = Utc::now();
        assert_eq!(due_date(borrowed) - borrowed, Duration::days(14));
    }
}
