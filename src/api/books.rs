//! Book catalog endpoints (admin CRUD with cover upload, public browsing)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

use super::AuthenticatedUser;

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Request-body ceiling for the router's upload routes: the configured
/// image cap plus headroom for the text fields and multipart framing, so
/// a cover at exactly the cap is not cut off upstream. The per-file check
/// in `read_book_form` stays the authoritative limit.
pub fn multipart_body_limit(max_bytes: usize) -> usize {
    max_bytes + 64 * 1024
}

/// Response after adding a book
#[derive(Serialize, ToSchema)]
pub struct CreateBookResponse {
    pub id: i32,
    pub message: String,
}

/// Plain confirmation message
#[derive(Serialize, ToSchema)]
pub struct BookMessageResponse {
    pub message: String,
}

/// Book fields read from a multipart form. The image part, when present,
/// is written to the uploads directory and its public path recorded.
struct BookForm {
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    publication_year: Option<i32>,
    total_copies: Option<i32>,
    available_copies: Option<i32>,
    image: Option<String>,
}

async fn read_book_form(
    mut multipart: Multipart,
    uploads: &crate::config::UploadsConfig,
) -> AppResult<BookForm> {
    let mut form = BookForm {
        isbn: None,
        title: None,
        author: None,
        genre: None,
        publication_year: None,
        total_copies: None,
        available_copies: None,
        image: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let content_type = field.content_type().unwrap_or_default().to_string();
            if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
                return Err(AppError::Validation(
                    "Unsupported file type; only JPEG, JPG and PNG are accepted".to_string(),
                ));
            }

            let original_name = field
                .file_name()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "cover".to_string());
            // Strip any client-supplied path components
            let original_name = std::path::Path::new(&original_name)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("cover")
                .to_string();

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?;

            if data.len() > uploads.max_bytes {
                return Err(AppError::Validation(format!(
                    "Image too large; maximum is {} bytes",
                    uploads.max_bytes
                )));
            }

            let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), original_name);
            let path = std::path::Path::new(&uploads.dir).join(&filename);
            tokio::fs::write(&path, &data)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

            form.image = Some(format!("/uploads/{}", filename));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart field: {}", e)))?;

        match name.as_str() {
            "isbn" => form.isbn = Some(value),
            "title" => form.title = Some(value),
            "author" => form.author = Some(value),
            "genre" => form.genre = Some(value),
            "publicationYear" => form.publication_year = Some(parse_int(&name, &value)?),
            "totalCopies" => form.total_copies = Some(parse_int(&name, &value)?),
            "availableCopies" => form.available_copies = Some(parse_int(&name, &value)?),
            _ => {}
        }
    }

    Ok(form)
}

fn parse_int(name: &str, value: &str) -> AppResult<i32> {
    value
        .parse()
        .map_err(|_| AppError::Validation(format!("Field {} must be an integer", name)))
}

/// List all books in the catalog
#[utoipa::path(
    get,
    path = "/administrateur",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/administrateur/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog (multipart form with optional cover image)
#[utoipa::path(
    post,
    path = "/administrateur/add",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Book added", body = CreateBookResponse),
        (status = 400, description = "Missing title, author or ISBN"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreateBookResponse>)> {
    claims.require_admin()?;

    let form = read_book_form(multipart, &state.config.uploads).await?;

    let (Some(title), Some(author), Some(isbn)) = (form.title, form.author, form.isbn) else {
        return Err(AppError::Validation(
            "Title, author and ISBN are required".to_string(),
        ));
    };

    let book = CreateBook {
        isbn: Some(isbn),
        title: Some(title),
        author: Some(author),
        genre: form.genre,
        publication_year: form.publication_year,
        total_copies: form.total_copies,
        available_copies: form.available_copies,
        image: form.image,
    };

    let id = state.services.catalog.create_book(book).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookResponse {
            id,
            message: "Book added successfully".to_string(),
        }),
    ))
}

/// Update a book (multipart form; previous cover kept if none uploaded)
#[utoipa::path(
    put,
    path = "/administrateur/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let form = read_book_form(multipart, &state.config.uploads).await?;

    let book = UpdateBook {
        isbn: form.isbn,
        title: form.title,
        author: form.author,
        genre: form.genre,
        publication_year: form.publication_year,
        total_copies: form.total_copies,
        available_copies: form.available_copies,
        image: form.image,
    };

    let updated = state.services.catalog.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/administrateur/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = BookMessageResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookMessageResponse>> {
    claims.require_admin()?;

    state.services.catalog.delete_book(id).await?;

    Ok(Json(BookMessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_leaves_room_for_an_image_at_the_cap() {
        let cap = 5 * 1024 * 1024;
        assert!(multipart_body_limit(cap) > cap);
    }

    #[test]
    fn body_limit_follows_the_configured_cap() {
        let small = multipart_body_limit(1024);
        let large = multipart_body_limit(10 * 1024 * 1024);
        assert_eq!(large - small, 10 * 1024 * 1024 - 1024);
    }
}
