//! Loan ledger service

use crate::{
    error::AppResult,
    models::loan::{AdminLoan, BorrowReceipt, ReturnReceipt, UserLoan},
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

    /// Borrow a book for the authenticated user
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<BorrowReceipt> {
        self.repository.loans.borrow(user_id, book_id).await
    }

    /// Return one of the authenticated user's loans
    pub async fn return_loan(&self, user_id: i32, loan_id: i32) -> AppResult<ReturnReceipt> {
        self.repository.loans.return_loan(user_id, loan_id).await
    }

    /// Loan history of a user, most recent first
    pub async fn user_loans(&self, user_id: i32) -> AppResult<Vec<UserLoan>> {
        self.repository.loans.list_for_user(user_id).await
    }

    /// All loans across users (admin view)
    pub async fn all_loans(&self) -> AppResult<Vec<AdminLoan>> {
        self.repository.loans.list_all().await
    }
}
