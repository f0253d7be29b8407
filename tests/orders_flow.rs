use std::sync::Arc;

use erp_admin_api::{
    config::AppConfig,
    dto::customers::CreateCustomerRequest,
    dto::orders::{CreateOrderItem, CreateOrderRequest, OrderListQuery, UpdateOrderStatusRequest},
    dto::products::CreateProductRequest,
    error::AppError,
    models::OrderStatus,
    services::{customer_service, order_service, product_service},
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

async fn seed_customer(state: &AppState) -> String {
    let resp = customer_service::create_customer(
        state,
        CreateCustomerRequest {
            name: "Acme Corp".into(),
            email: "billing@acme.test".into(),
            phone: "555-0100".into(),
            address: "1 Industrial Way".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
            cnpj: Some("12.345.678/0001-00".into()),
            cpf: None,
            status: None,
        },
    )
    .await
    .expect("create customer");
    resp.data.unwrap().id
}

async fn seed_product(state: &AppState, name: &str, price: i64) -> String {
    let resp = product_service::create_product(
        state,
        CreateProductRequest {
            name: name.into(),
            description: "A product for testing".into(),
            sku: format!("SKU-{name}"),
            price,
            cost: price / 2,
            quantity: 100,
            category: "widgets".into(),
            image: None,
            status: None,
        },
    )
    .await
    .expect("create product");
    resp.data.unwrap().id
}

#[tokio::test]
async fn order_totals_are_derived_from_product_prices() {
    let state = test_state();
    let customer_id = seed_customer(&state).await;
    let widget = seed_product(&state, "Widget", 1000).await;
    let gadget = seed_product(&state, "Gadget", 250).await;

    let resp = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id: customer_id.clone(),
            items: vec![
                CreateOrderItem {
                    product_id: widget.clone(),
                    quantity: 2,
                },
                CreateOrderItem {
                    product_id: gadget.clone(),
                    quantity: 4,
                },
            ],
            notes: Some("rush".into()),
        },
    )
    .await
    .expect("create order");

    let order = resp.data.unwrap();
    assert_eq!(order.data.status, OrderStatus::Pending);
    assert_eq!(order.data.customer_id, customer_id);
    assert!(order.data.order_number.starts_with("ORD-"));
    assert_eq!(order.data.items[0].subtotal, 2000);
    assert_eq!(order.data.items[1].subtotal, 1000);
    assert_eq!(order.data.total_amount, 3000);
}

#[tokio::test]
async fn order_rejects_unknown_customer_and_product() {
    let state = test_state();
    let customer_id = seed_customer(&state).await;

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id: "ghost".into(),
            items: vec![CreateOrderItem {
                product_id: "p".into(),
                quantity: 1,
            }],
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Unknown customer"));

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            items: vec![CreateOrderItem {
                product_id: "ghost".into(),
                quantity: 1,
            }],
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("Unknown product")));
}

#[tokio::test]
async fn order_rejects_empty_items_and_non_positive_quantities() {
    let state = test_state();
    let customer_id = seed_customer(&state).await;
    let widget = seed_product(&state, "Widget", 1000).await;

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id: customer_id.clone(),
            items: vec![],
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            items: vec![CreateOrderItem {
                product_id: widget,
                quantity: 0,
            }],
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Item quantity must be positive"));
}

#[tokio::test]
async fn order_status_walks_the_legal_chain_only() {
    let state = test_state();
    let customer_id = seed_customer(&state).await;
    let widget = seed_product(&state, "Widget", 1000).await;

    let resp = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            items: vec![CreateOrderItem {
                product_id: widget,
                quantity: 1,
            }],
            notes: None,
        },
    )
    .await
    .expect("create order");
    let order_id = resp.data.unwrap().id;

    // Skipping straight to shipped is illegal from pending.
    let err = order_service::update_order_status(
        &state,
        &order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Shipped,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let resp =
            order_service::update_order_status(&state, &order_id, UpdateOrderStatusRequest { status })
                .await
                .expect("legal transition");
        assert_eq!(resp.data.unwrap().data.status, status);
    }

    // Delivered is terminal; cancellation is no longer possible.
    let err = order_service::update_order_status(
        &state,
        &order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn orders_can_be_listed_by_status_and_deleted() {
    let state = test_state();
    let customer_id = seed_customer(&state).await;
    let widget = seed_product(&state, "Widget", 1000).await;

    let resp = order_service::create_order(
        &state,
        CreateOrderRequest {
            customer_id,
            items: vec![CreateOrderItem {
                product_id: widget,
                quantity: 1,
            }],
            notes: None,
        },
    )
    .await
    .expect("create order");
    let order_id = resp.data.unwrap().id;

    let pending = order_service::list_orders(
        &state,
        OrderListQuery {
            status: Some(OrderStatus::Pending),
        },
    )
    .await
    .expect("list");
    assert_eq!(pending.data.unwrap().items.len(), 1);

    let shipped = order_service::list_orders(
        &state,
        OrderListQuery {
            status: Some(OrderStatus::Shipped),
        },
    )
    .await
    .expect("list");
    assert!(shipped.data.unwrap().items.is_empty());

    order_service::delete_order(&state, &order_id)
        .await
        .expect("delete");
    let err = order_service::get_order(&state, &order_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}
