use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    dto::users::UserResponse,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{User, UserRole},
    response::{ApiResponse, Meta},
    state::AppState,
    store::Filter,
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserResponse>> {
    let RegisterRequest {
        email,
        password,
        display_name,
    } = payload;

    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let existing = state
        .store
        .query::<User>(&[Filter::eq("email", email.as_str())])
        .await?;
    if !existing.is_empty() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    // The first account bootstraps the admin role.
    let role = if state.store.get_all::<User>().await?.is_empty() {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let user = User {
        email,
        display_name,
        role,
        avatar: None,
        password_hash,
    };
    let id = Uuid::new_v4().to_string();
    let doc = state.store.add(&id, user).await?;

    Ok(ApiResponse::success(
        "User created",
        UserResponse::from(doc),
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    // Rejected locally before any store access.
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let mut matches = state
        .store
        .query::<User>(&[Filter::eq("email", email.as_str())])
        .await?;
    let user = match matches.pop() {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid credentials".into())),
    };

    let parsed_hash = PasswordHash::new(&user.data.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.clone(),
        role: user.data.role,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let resp = LoginResponse {
        token: format!("Bearer {token}"),
        user: UserResponse::from(user),
    };

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserResponse>> {
    let doc = state
        .store
        .get::<User>(&user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Current user",
        UserResponse::from(doc),
        None,
    ))
}
