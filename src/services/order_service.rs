use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, OrderListQuery, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    models::{Customer, Order, OrderItem, OrderStatus, Product},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{Document, Filter},
};

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let items = match query.status {
        Some(status) => {
            state
                .store
                .query::<Order>(&[Filter::eq("status", status.as_str())])
                .await?
        }
        None => state.store.get_all::<Order>().await?,
    };

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(meta),
    ))
}

pub async fn get_order(state: &AppState, id: &str) -> AppResult<ApiResponse<Document<Order>>> {
    let doc = state
        .store
        .get::<Order>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order", doc, None))
}

/// Prices each line from the referenced product and derives subtotals and the
/// order total; callers never supply amounts.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Document<Order>>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "Order must contain at least one item".to_string(),
        ));
    }

    let customer = state
        .store
        .get::<Customer>(&payload.customer_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown customer".to_string()))?;

    let mut items = Vec::with_capacity(payload.items.len());
    let mut total_amount = 0i64;
    for line in &payload.items {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest(
                "Item quantity must be positive".to_string(),
            ));
        }
        let product = state
            .store
            .get::<Product>(&line.product_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Unknown product {}", line.product_id))
            })?;

        let subtotal = product.data.price * i64::from(line.quantity);
        total_amount += subtotal;
        items.push(OrderItem {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            price: product.data.price,
            subtotal,
        });
    }

    let order = Order {
        customer_id: customer.id,
        order_number: next_order_number(),
        items,
        total_amount,
        status: OrderStatus::Pending,
        notes: payload.notes,
    };

    let id = Uuid::new_v4().to_string();
    let doc = state.store.add(&id, order).await?;
    Ok(ApiResponse::success(
        "Order created",
        doc,
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Document<Order>>> {
    let order = state
        .store
        .get::<Order>(id)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = order.data.status;
    if !current.can_transition_to(payload.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot change order status from {} to {}",
            current.as_str(),
            payload.status.as_str()
        )));
    }

    state.store.update::<Order, _>(id, &payload).await?;

    let doc = state
        .store
        .get::<Order>(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", doc, Some(Meta::empty())))
}

pub async fn delete_order(state: &AppState, id: &str) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = state.store.delete::<Order>(id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn next_order_number() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", token[..12].to_uppercase())
}
