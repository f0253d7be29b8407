use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::double_option,
    models::{EntityStatus, Product},
    store::Document,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub sku: String,
    /// Integer cents.
    pub price: i64,
    /// Integer cents.
    pub cost: i64,
    pub quantity: i32,
    pub category: String,
    pub image: Option<String>,
    /// Defaults to active.
    pub status: Option<EntityStatus>,
}

/// Partial update; only present fields are merged into the record. An
/// explicit null clears the image.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductListQuery {
    pub status: Option<EntityStatus>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Document<Product>>,
}
