//! Registration, login and password-reset endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterRequest, Role},
};

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub role: Role,
}

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: i32,
    pub message: String,
}

/// Password-reset request
#[derive(Deserialize, ToSchema)]
pub struct RequestResetRequest {
    pub email: String,
}

/// Reset-code verification request
#[derive(Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// New-password request; the emailed code must still be valid
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub new_password: String,
}

/// Plain confirmation message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing fields or email already in use")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let id = state.services.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id,
            message: "Account created successfully".to_string(),
        }),
    ))
}

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, role) = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        role,
    }))
}

/// Email a 6-digit password-reset code
#[utoipa::path(
    post,
    path = "/auth/request-reset",
    tag = "auth",
    request_body = RequestResetRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 404, description = "Email not found")
    )
)]
pub async fn request_reset(
    State(state): State<crate::AppState>,
    Json(request): Json<RequestResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.services.auth.request_reset(&request.email).await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent by email".to_string(),
    }))
}

/// Check a reset code before asking the user for a new password
#[utoipa::path(
    post,
    path = "/auth/verify-code",
    tag = "auth",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Code valid", body = MessageResponse),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn verify_code(
    State(state): State<crate::AppState>,
    Json(request): Json<VerifyCodeRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .auth
        .verify_reset_code(&request.email, &request.code)
        .await?;

    Ok(Json(MessageResponse {
        message: "Code verified successfully".to_string(),
    }))
}

/// Set a new password using a valid reset code
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn reset_password(
    State(state): State<crate::AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .services
        .auth
        .reset_password(&request.email, &request.code, &request.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset".to_string(),
    }))
}
