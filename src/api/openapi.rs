//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblio API",
        version = "1.0.0",
        description = "Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::request_reset,
        auth::verify_code,
        auth::reset_password,
        // Profile
        users::get_profile,
        users::update_profile,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Loans
        loans::borrow_book,
        loans::my_loans,
        loans::return_book,
        loans::all_loans,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterResponse,
            auth::RequestResetRequest,
            auth::VerifyCodeRequest,
            auth::ResetPasswordRequest,
            auth::MessageResponse,
            crate::models::user::RegisterRequest,
            crate::models::user::Role,
            // Profile
            crate::models::user::UserProfile,
            crate::models::user::UpdateProfile,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookRef,
            books::CreateBookResponse,
            books::BookMessageResponse,
            // Loans
            crate::models::loan::LoanStatus,
            crate::models::loan::BorrowReceipt,
            crate::models::loan::ReturnReceipt,
            crate::models::loan::UserLoan,
            crate::models::loan::UserRef,
            crate::models::loan::AdminLoan,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and password reset"),
        (name = "users", description = "Own-profile management"),
        (name = "books", description = "Book catalog management"),
        (name = "loans", description = "Borrow and return workflows")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
