//! Book catalog model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    /// Physical copies ever registered
    pub total_copies: i32,
    /// Copies not currently on loan; kept in [0, total_copies] by the
    /// loan ledger
    pub available_copies: i32,
    /// Cover image path under /uploads, if one was provided
    pub image: Option<String>,
}

/// Fields accepted when adding a book (multipart form)
#[derive(Debug, Default)]
pub struct CreateBook {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
    pub image: Option<String>,
}

/// Fields accepted when updating a book (multipart form; image optional,
/// previous one kept when absent)
#[derive(Debug, Default)]
pub struct UpdateBook {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
    pub image: Option<String>,
}

/// Minimal book fields joined into a user's loan view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub isbn: String,
}

/// Minimal book fields joined into the admin loan view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub id: i32,
    pub title: String,
    pub author: String,
}
