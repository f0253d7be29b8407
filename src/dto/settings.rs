use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    models::{Setting, SettingKind},
    store::Document,
};

/// Settings are keyed by their `key`, so writing an existing key replaces it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertSettingRequest {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: SettingKind,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingList {
    pub items: Vec<Document<Setting>>,
}
