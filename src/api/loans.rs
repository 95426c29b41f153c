//! Loan (emprunt) endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{AdminLoan, BorrowReceipt, ReturnReceipt, UserLoan},
};

use super::AuthenticatedUser;

/// Borrow a book for the authenticated user
#[utoipa::path(
    post,
    path = "/emprunt/{bookId}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("bookId" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book borrowed", body = BorrowReceipt),
        (status = 400, description = "No copies available, or already borrowed"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BorrowReceipt>> {
    let receipt = state.services.loans.borrow(claims.user_id, book_id).await?;
    Ok(Json(receipt))
}

/// List the authenticated user's loans, most recent first
#[utoipa::path(
    get,
    path = "/emprunt/mes-emprunts",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's loans", body = Vec<UserLoan>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserLoan>>> {
    let loans = state.services.loans.user_loans(claims.user_id).await?;
    Ok(Json(loans))
}

/// Return one of the authenticated user's loans
#[utoipa::path(
    post,
    path = "/emprunt/retour/{loanId}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("loanId" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnReceipt),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Loan not found or already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnReceipt>> {
    let receipt = state
        .services
        .loans
        .return_loan(claims.user_id, loan_id)
        .await?;
    Ok(Json(receipt))
}

/// List all loans across users (admin)
#[utoipa::path(
    get,
    path = "/administrateur/emprunts",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<AdminLoan>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AdminLoan>>> {
    claims.require_admin()?;

    let loans = state.services.loans.all_loans().await?;
    Ok(Json(loans))
}
