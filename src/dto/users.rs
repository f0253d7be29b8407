use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::double_option,
    models::{User, UserRole},
    store::Document,
};

/// Public view of a user record; the stored password hash never leaves the
/// service layer.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document<User>> for UserResponse {
    fn from(doc: Document<User>) -> Self {
        Self {
            id: doc.id,
            email: doc.data.email,
            display_name: doc.data.display_name,
            role: doc.data.role,
            avatar: doc.data.avatar,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Partial update; only present fields are merged into the record. An
/// explicit null clears the avatar.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<UserResponse>,
}
