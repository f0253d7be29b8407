use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};

use crate::{
    dto::settings::{SettingList, UpsertSettingRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Setting,
    response::ApiResponse,
    services::setting_service,
    state::AppState,
    store::Document,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_settings))
        .route("/", put(upsert_setting))
        .route("/{key}", get(get_setting))
        .route("/{key}", delete(delete_setting))
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "List settings", body = ApiResponse<SettingList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn list_settings(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<SettingList>>> {
    let resp = setting_service::list_settings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    params(
        ("key" = String, Path, description = "Setting key")
    ),
    responses(
        (status = 200, description = "Get setting", body = ApiResponse<Document<Setting>>),
        (status = 404, description = "Setting not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<Document<Setting>>>> {
    let resp = setting_service::get_setting(&state, &key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpsertSettingRequest,
    responses(
        (status = 200, description = "Upsert setting", body = ApiResponse<Document<Setting>>),
        (status = 400, description = "Value does not match declared type"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn upsert_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertSettingRequest>,
) -> AppResult<Json<ApiResponse<Document<Setting>>>> {
    let resp = setting_service::upsert_setting(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/settings/{key}",
    params(
        ("key" = String, Path, description = "Setting key")
    ),
    responses(
        (status = 200, description = "Deleted setting"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Setting not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn delete_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = setting_service::delete_setting(&state, &user, &key).await?;
    Ok(Json(resp))
}
