//! Authentication and account service: registration, login, password reset

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterRequest, Role, UpdateProfile, User, UserClaims, UserProfile},
    repository::Repository,
    services::email::EmailService,
};

/// Emailed reset codes stay valid this long
const RESET_CODE_VALIDITY_MINUTES: i64 = 10;

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Register a new account with the `user` role
    pub async fn register(&self, request: RegisterRequest) -> AppResult<i32> {
        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("email already in use".to_string()));
        }

        let hash = self.hash_password(&request.password)?;
        self.repository.users.create(&request, &hash).await
    }

    /// Authenticate by email and password, returning a JWT and the role
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, Role)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.create_token(&user)?;
        Ok((token, user.role))
    }

    /// Send a 6-digit reset code to the account's email address
    pub async fn request_reset(&self, email: &str) -> AppResult<()> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("email not found".to_string()))?;

        let code = generate_reset_code();
        let expires = Utc::now() + Duration::minutes(RESET_CODE_VALIDITY_MINUTES);

        self.repository
            .users
            .set_reset_code(&user.email, &code, expires)
            .await?;

        self.email.send_reset_code(&user.email, &code).await?;

        Ok(())
    }

    /// Check a reset code without consuming it
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> AppResult<()> {
        if !self.repository.users.reset_code_valid(email, code).await? {
            return Err(AppError::Validation("invalid or expired code".to_string()));
        }
        Ok(())
    }

    /// Set a new password. The code must still match and be unexpired; it
    /// is cleared in the same statement so it cannot be replayed.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let hash = self.hash_password(new_password)?;
        let updated = self
            .repository
            .users
            .reset_password(email, code, &hash)
            .await?;

        if !updated {
            return Err(AppError::Validation("invalid or expired code".to_string()));
        }
        Ok(())
    }

    /// Profile of the authenticated user
    pub async fn get_profile(&self, user_id: i32) -> AppResult<UserProfile> {
        let user = self.repository.users.get_by_id(user_id).await?;
        Ok(user.into())
    }

    /// Update the authenticated user's profile
    pub async fn update_profile(
        &self,
        user_id: i32,
        profile: UpdateProfile,
    ) -> AppResult<UserProfile> {
        self.repository.users.update_profile(user_id, &profile).await?;
        self.get_profile(user_id).await
    }

    /// Create a JWT for a user
    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a password against the stored argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

/// Generate a 6-digit reset code
fn generate_reset_code() -> String {
    use rand::Rng;
    let num = rand::thread_rng().gen_range(100000..1000000);
    format!("{}", num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_reset_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn password_hash_verifies() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"secret", &salt)
            .unwrap()
            .to_string();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"secret", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }
}
