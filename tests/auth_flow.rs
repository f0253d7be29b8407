use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::FromRequestParts,
    http::{Request, header},
    response::IntoResponse,
};

use erp_admin_api::{
    config::AppConfig,
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::UserRole,
    services::auth_service,
    state::AppState,
    store::{DocumentStore, MemoryBackend},
};

fn test_state() -> AppState {
    AppState {
        store: DocumentStore::new(Arc::new(MemoryBackend::new())),
        config: Arc::new(AppConfig {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
        }),
    }
}

async fn register(state: &AppState, email: &str, password: &str) {
    auth_service::register_user(
        state,
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            display_name: "Test User".into(),
        },
    )
    .await
    .expect("register");
}

async fn login_token(state: &AppState, email: &str, password: &str) -> String {
    let resp = auth_service::login_user(
        state,
        LoginRequest {
            email: email.into(),
            password: password.into(),
        },
    )
    .await
    .expect("login");
    resp.data.unwrap().token
}

#[tokio::test]
async fn register_then_login_issues_bearer_token() {
    let state = test_state();
    register(&state, "admin@example.com", "hunter2").await;

    let token = login_token(&state, "admin@example.com", "hunter2").await;
    assert!(token.starts_with("Bearer "));
}

#[tokio::test]
async fn first_registered_account_is_admin_later_ones_are_not() {
    let state = test_state();
    register(&state, "first@example.com", "pw1").await;
    register(&state, "second@example.com", "pw2").await;

    let token = login_token(&state, "second@example.com", "pw2").await;
    let user = auth_user_for(&state, &token).await.expect("valid token");
    assert_eq!(user.role, UserRole::User);

    let token = login_token(&state, "first@example.com", "pw1").await;
    let user = auth_user_for(&state, &token).await.expect("valid token");
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn empty_credentials_are_rejected_before_the_store() {
    let state = test_state();

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: String::new(),
            password: "anything".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::BadRequest(msg) if msg == "Email and password are required"
    ));
}

#[tokio::test]
async fn wrong_password_reports_invalid_credentials() {
    let state = test_state();
    register(&state, "user@example.com", "correct").await;

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "user@example.com".into(),
            password: "incorrect".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid credentials"));
}

#[tokio::test]
async fn unknown_email_reports_invalid_credentials() {
    let state = test_state();

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "nobody@example.com".into(),
            password: "whatever".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid credentials"));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let state = test_state();
    register(&state, "user@example.com", "pw").await;

    let err = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "user@example.com".into(),
            password: "other".into(),
            display_name: "Clone".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Email is already taken"));
}

#[tokio::test]
async fn guard_admits_a_valid_session_unchanged() {
    let state = test_state();
    register(&state, "user@example.com", "pw").await;
    let token = login_token(&state, "user@example.com", "pw").await;

    let user = auth_user_for(&state, &token).await.expect("valid token");

    let current = auth_service::current_user(&state, &user).await.expect("me");
    assert_eq!(current.data.unwrap().email, "user@example.com");
}

#[tokio::test]
async fn guard_rejects_a_missing_token_with_the_sign_in_location() {
    let state = test_state();

    let (mut parts, _) = Request::builder()
        .uri("/api/customers")
        .body(())
        .unwrap()
        .into_parts();
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let response = err.into_response();
    assert_eq!(response.status(), 401);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["sign_in"], "/api/auth/login");
}

#[tokio::test]
async fn guard_rejects_a_garbage_token() {
    let state = test_state();

    let err = auth_user_for(&state, "Bearer not-a-jwt").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn login_failures_surface_verbatim_messages_in_the_response_body() {
    let state = test_state();
    register(&state, "user@example.com", "pw").await;

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: String::new(),
            password: "anything".into(),
        },
    )
    .await
    .unwrap_err();
    let body = bad_request_body(err).await;
    assert_eq!(body["message"], "Email and password are required");
    assert_eq!(body["data"]["error"], "Email and password are required");

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "user@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await
    .unwrap_err();
    let body = bad_request_body(err).await;
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["data"]["error"], "Invalid credentials");
}

async fn bad_request_body(err: AppError) -> serde_json::Value {
    let response = err.into_response();
    assert_eq!(response.status(), 400);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn auth_user_for(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let (mut parts, _) = Request::builder()
        .uri("/api/customers")
        .header(header::AUTHORIZATION, token)
        .body(())
        .unwrap()
        .into_parts();
    AuthUser::from_request_parts(&mut parts, state).await
}
