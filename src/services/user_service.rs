use crate::{
    dto::users::{UpdateUserRequest, UserList, UserResponse},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_users(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;

    let items: Vec<UserResponse> = state
        .store
        .get_all::<User>()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_admin(user)?;

    let doc = state
        .store
        .get::<User>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User", UserResponse::from(doc), None))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_admin(user)?;

    state
        .store
        .get::<User>(id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.store.update::<User, _>(id, &payload).await?;

    let doc = state
        .store
        .get::<User>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Updated",
        UserResponse::from(doc),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    if user.user_id == id {
        return Err(AppError::BadRequest(
            "Cannot delete the signed-in account".to_string(),
        ));
    }

    let removed = state.store.delete::<User>(id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
