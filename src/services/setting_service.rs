use crate::{
    dto::settings::{SettingList, UpsertSettingRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Setting,
    response::{ApiResponse, Meta},
    state::AppState,
    store::Document,
};

pub async fn list_settings(state: &AppState) -> AppResult<ApiResponse<SettingList>> {
    let items = state.store.get_all::<Setting>().await?;
    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Settings",
        SettingList { items },
        Some(meta),
    ))
}

pub async fn get_setting(state: &AppState, key: &str) -> AppResult<ApiResponse<Document<Setting>>> {
    let doc = state
        .store
        .get::<Setting>(key)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Setting", doc, None))
}

/// Settings are keyed by their `key`; the store's silent-overwrite write makes
/// this an upsert.
pub async fn upsert_setting(
    state: &AppState,
    user: &AuthUser,
    payload: UpsertSettingRequest,
) -> AppResult<ApiResponse<Document<Setting>>> {
    ensure_admin(user)?;

    if payload.key.trim().is_empty() {
        return Err(AppError::BadRequest("Setting key is required".to_string()));
    }
    if !payload.value_type.matches(&payload.value) {
        return Err(AppError::BadRequest(format!(
            "Value does not match declared type {}",
            payload.value_type.as_str()
        )));
    }

    let setting = Setting {
        key: payload.key.clone(),
        value: payload.value,
        value_type: payload.value_type,
    };
    let doc = state.store.add(&payload.key, setting).await?;
    Ok(ApiResponse::success(
        "Setting saved",
        doc,
        Some(Meta::empty()),
    ))
}

pub async fn delete_setting(
    state: &AppState,
    user: &AuthUser,
    key: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let removed = state.store.delete::<Setting>(key).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
