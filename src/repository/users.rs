//! Users repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterRequest, Role, UpdateProfile, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by email, if one exists
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new user with an already-hashed password
    pub async fn create(&self, user: &RegisterRequest, password_hash: &str) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (name, email, password, telephone, cin, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.telephone)
        .bind(&user.cin)
        .bind(Role::User)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Update the user's own profile fields
    pub async fn update_profile(&self, id: i32, profile: &UpdateProfile) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET name = $1, telephone = $2, cin = $3 WHERE id = $4")
            .bind(&profile.name)
            .bind(&profile.telephone)
            .bind(&profile.cin)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        Ok(())
    }

    /// Store a password-reset code with its expiry
    pub async fn set_reset_code(
        &self,
        email: &str,
        code: &str,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE users SET reset_code = $1, reset_expires = $2 WHERE email = $3")
            .bind(code)
            .bind(expires)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Check that a reset code matches and has not expired
    pub async fn reset_code_valid(&self, email: &str, code: &str) -> AppResult<bool> {
        let valid: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND reset_code = $2 AND reset_expires > NOW()
            )
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;
        Ok(valid)
    }

    /// Replace the password and clear the reset code, guarded by a valid
    /// unexpired code. Returns false when the guard did not match.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password_hash: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $1, reset_code = NULL, reset_expires = NULL
            WHERE email = $2 AND reset_code = $3 AND reset_expires > NOW()
            "#,
        )
        .bind(password_hash)
        .bind(email)
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
