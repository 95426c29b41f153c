//! API integration tests
//!
//! These run against a live server. Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:5000/api";

/// Helper to register a throwaway user and log in
async fn get_auth_token(client: &Client) -> String {
    let suffix = unique_suffix();
    let email = format!("reader{}@example.org", suffix);

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "name": "Test Reader",
            "email": email,
            "password": "testpass",
            "telephone": "0600000000",
            "cin": "AB123456"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "testpass"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn unique_suffix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_reports_database_reachable() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_large_upload_is_not_cut_off_below_the_configured_cap() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // 3 MiB payload: over axum's 2 MiB default body cap, under the 5 MiB
    // image cap. The router must accept the body; this account then fails
    // authorization, not body-size enforcement.
    let payload = vec![0u8; 3 * 1024 * 1024];
    let part = reqwest::multipart::Part::bytes(payload)
        .file_name("cover.png")
        .mime_str("image/png")
        .expect("Invalid mime type");
    let form = reqwest::multipart::Form::new()
        .text("title", "Oversized Cover")
        .text("author", "Test Author")
        .text("isbn", "978-0-00-000000-1")
        .part("image", part);

    let response = client
        .post(format!("{}/administrateur/add", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_ne!(response.status(), 413);
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_body_cap_follows_upload_config_not_the_framework_default() {
    let client = Client::new();

    // A 3 MiB body is over the framework's built-in 2 MiB cap but under
    // the configured one, so it must reach the handler and fail on its
    // own merits (invalid email), never with 413.
    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "name": "x".repeat(3 * 1024 * 1024),
            "email": "not-an-email",
            "password": "testpass",
            "telephone": "0600000000",
            "cin": "AB123456"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_ne!(response.status(), 413);
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": "nobody@example.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_profile() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/user/profile", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Test Reader");
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/administrateur", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_add_book_requires_admin() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let form = reqwest::multipart::Form::new()
        .text("title", "Test Book")
        .text("author", "Test Author")
        .text("isbn", "978-0-00-000000-0");

    let response = client
        .post(format!("{}/administrateur/add", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    // A freshly registered account has the user role
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_requires_auth() {
    let client = Client::new();

    let response = client
        .get(format!("{}/emprunt/mes-emprunts", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_empty_for_new_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/emprunt/mes-emprunts", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_book_is_404() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/emprunt/999999999", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_all_loans_requires_admin() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/administrateur/emprunts", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_reset_code_for_unknown_email_is_404() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/request-reset", BASE_URL))
        .json(&json!({ "email": "nobody@example.org" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
