//! Biblio Server - Library Management Backend
//!
//! REST API server for a library: accounts, book catalog and loan ledger.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblio_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblio_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblio Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Make sure the uploads directory exists before serving from it
    std::fs::create_dir_all(&config.uploads.dir).expect("Failed to create uploads directory");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.email.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads_dir = state.config.uploads.dir.clone();
    // Raise axum's default body cap so uploads at the configured limit get through
    let body_limit = DefaultBodyLimit::max(api::books::multipart_body_limit(
        state.config.uploads.max_bytes,
    ));

    let api_routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Accounts
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/auth/request-reset", post(api::auth::request_reset))
        .route("/auth/verify-code", post(api::auth::verify_code))
        .route("/auth/reset-password", post(api::auth::reset_password))
        // Profile
        .route("/user/profile", get(api::users::get_profile))
        .route("/user/profile", put(api::users::update_profile))
        // Book catalog
        .route("/administrateur", get(api::books::list_books))
        .route("/administrateur/add", post(api::books::create_book))
        .route("/administrateur/:id", get(api::books::get_book))
        .route("/administrateur/:id", put(api::books::update_book))
        .route("/administrateur/:id", delete(api::books::delete_book))
        .route("/administrateur/emprunts", get(api::loans::all_loans))
        // Loans
        .route("/emprunt/mes-emprunts", get(api::loans::my_loans))
        .route("/emprunt/retour/:loan_id", post(api::loans::return_book))
        .route("/emprunt/:book_id", post(api::loans::borrow_book))
        .layer(body_limit)
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
