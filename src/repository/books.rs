//! Books repository for catalog database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List the whole catalog
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Insert a new book, returning its id
    pub async fn create(&self, book: &CreateBook) -> AppResult<i32> {
        let total = book.total_copies.unwrap_or(0);
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (isbn, title, author, genre, publication_year,
                               total_copies, available_copies, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.publication_year)
        .bind(total)
        .bind(book.available_copies.unwrap_or(total))
        .bind(&book.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Update descriptive fields of a book; the image is only replaced
    /// when a new one was uploaded
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET isbn = COALESCE($1, isbn),
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                genre = COALESCE($4, genre),
                publication_year = COALESCE($5, publication_year),
                total_copies = COALESCE($6, total_copies),
                available_copies = COALESCE($7, available_copies),
                image = COALESCE($8, image)
            WHERE id = $9
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.publication_year)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(&book.image)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}
