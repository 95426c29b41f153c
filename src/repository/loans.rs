//! Loans repository: the transactional borrow/return ledger
//!
//! A loan with status `active` is the sole evidence that one unit of a
//! book's `available_copies` is checked out, so the two are only ever
//! updated together inside one transaction. Dropping the transaction on
//! any error path rolls the whole operation back.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookRef, BookSummary},
        loan::{due_date, AdminLoan, BorrowReceipt, ReturnReceipt, UserLoan, UserRef},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book: insert an active loan and decrement the book's
    /// available copies, atomically.
    ///
    /// Preconditions, first failure wins: the book exists, it has a copy
    /// available, and the user holds no active loan on it.
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<BorrowReceipt> {
        let mut tx = self.pool.begin().await?;

        // Lock the book row: concurrent borrows of the same book serialize
        // here, so the availability check and the decrement act as one unit
        // and available_copies can never go negative.
        let available: Option<i32> =
            sqlx::query_scalar("SELECT available_copies FROM books WHERE id = $1 FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let available = available
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        if available <= 0 {
            return Err(AppError::Conflict("no copies available".to_string()));
        }

        let already_borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE user_id = $1 AND book_id = $2 AND status = 'active')",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_borrowed {
            return Err(AppError::Conflict("already borrowed".to_string()));
        }

        let now = Utc::now();
        let due = due_date(now);

        let loan_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO loans (user_id, book_id, borrowed_at, due_at, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(due)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available_copies = available_copies - 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(BorrowReceipt {
            loan_id,
            borrowed_at: now,
            due_at: due,
        })
    }

    /// Return a loan: mark it returned and increment the book's available
    /// copies, atomically. The lookup is scoped to the requesting user, so
    /// nobody can return someone else's loan; a loan already returned is
    /// reported as not found.
    pub async fn return_loan(&self, user_id: i32, loan_id: i32) -> AppResult<ReturnReceipt> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT book_id FROM loans WHERE id = $1 AND user_id = $2 AND status = 'active' FOR UPDATE",
        )
        .bind(loan_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("loan not found or already returned".to_string()))?;

        let book_id: i32 = row.get("book_id");
        let now = Utc::now();

        sqlx::query("UPDATE loans SET status = 'returned', returned_at = $1 WHERE id = $2")
            .bind(now)
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        // The active loan corresponds to exactly one prior decrement, so
        // this cannot push available_copies past total_copies.
        sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ReturnReceipt {
            loan_id,
            returned_at: now,
        })
    }

    /// All loans of a user, most recent first, with minimal book fields
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<UserLoan>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.borrowed_at, l.due_at, l.returned_at, l.status,
                   b.id AS book_id, b.title, b.author, b.image, b.isbn
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.user_id = $1
            ORDER BY l.borrowed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let loans = rows
            .into_iter()
            .map(|row| UserLoan {
                id: row.get("id"),
                borrowed_at: row.get("borrowed_at"),
                due_at: row.get("due_at"),
                returned_at: row.get("returned_at"),
                status: row.get("status"),
                book: BookSummary {
                    id: row.get("book_id"),
                    title: row.get("title"),
                    author: row.get("author"),
                    image: row.get("image"),
                    isbn: row.get("isbn"),
                },
            })
            .collect();

        Ok(loans)
    }

    /// All loans across users, most recent first, with user and book fields
    pub async fn list_all(&self) -> AppResult<Vec<AdminLoan>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.borrowed_at, l.due_at, l.returned_at, l.status,
                   u.id AS user_id, u.name, u.email,
                   b.id AS book_id, b.title, b.author
            FROM loans l
            JOIN users u ON l.user_id = u.id
            JOIN books b ON l.book_id = b.id
            ORDER BY l.borrowed_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let loans = rows
            .into_iter()
            .map(|row| AdminLoan {
                id: row.get("id"),
                borrowed_at: row.get("borrowed_at"),
                due_at: row.get("due_at"),
                returned_at: row.get("returned_at"),
                status: row.get("status"),
                user: UserRef {
                    id: row.get("user_id"),
                    name: row.get("name"),
                    email: row.get("email"),
                },
                book: BookRef {
                    id: row.get("book_id"),
                    title: row.get("title"),
                    author: row.get("author"),
                },
            })
            .collect();

        Ok(loans)
    }
}
