use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, ProductListQuery, UpdateProductRequest},
    error::{AppError, AppResult},
    models::{EntityStatus, Product},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{Document, Filter},
};

pub async fn list_products(
    state: &AppState,
    query: ProductListQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut filters = Vec::new();
    if let Some(status) = query.status {
        filters.push(Filter::eq("status", status.as_str()));
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        filters.push(Filter::eq("category", category.as_str()));
    }

    let items = if filters.is_empty() {
        state.store.get_all::<Product>().await?
    } else {
        state.store.query::<Product>(&filters).await?
    };

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<Document<Product>>> {
    let doc = state
        .store
        .get::<Product>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", doc, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Document<Product>>> {
    if payload.name.trim().is_empty() || payload.sku.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Product name and SKU are required".to_string(),
        ));
    }
    if payload.price < 0 || payload.cost < 0 || payload.quantity < 0 {
        return Err(AppError::BadRequest(
            "Price, cost and quantity must not be negative".to_string(),
        ));
    }

    let product = Product {
        name: payload.name,
        description: payload.description,
        sku: payload.sku,
        price: payload.price,
        cost: payload.cost,
        quantity: payload.quantity,
        category: payload.category,
        image: payload.image,
        status: payload.status.unwrap_or(EntityStatus::Active),
    };

    let id = Uuid::new_v4().to_string();
    let doc = state.store.add(&id, product).await?;
    Ok(ApiResponse::success(
        "Product created",
        doc,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: &str,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Document<Product>>> {
    state
        .store
        .get::<Product>(id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.store.update::<Product, _>(id, &payload).await?;

    let doc = state
        .store
        .get::<Product>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", doc, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = state.store.delete::<Product>(id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
