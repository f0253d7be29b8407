use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use erp_admin_api::{
    dto::{customers::UpdateCustomerRequest, products::UpdateProductRequest},
    models::{Customer, EntityStatus, Product},
    store::{Collection, DocumentStore, Filter, MemoryBackend, StoreError},
};

fn test_store() -> DocumentStore {
    DocumentStore::new(Arc::new(MemoryBackend::new()))
}

fn sample_customer() -> Customer {
    Customer {
        name: "John Doe".into(),
        email: "john@example.com".into(),
        phone: "123456789".into(),
        address: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        cnpj: None,
        cpf: Some("123.456.789-00".into()),
        status: EntityStatus::Active,
    }
}

fn sample_product(name: &str, price: i64) -> Product {
    Product {
        name: name.into(),
        description: "A product for testing".into(),
        sku: format!("SKU-{name}"),
        price,
        cost: price / 2,
        quantity: 10,
        category: "widgets".into(),
        image: None,
        status: EntityStatus::Active,
    }
}

#[tokio::test]
async fn add_then_get_round_trips_fields_and_id() {
    let store = test_store();
    let added = store.add("cust_1", sample_customer()).await.unwrap();
    assert_eq!(added.id, "cust_1");

    let fetched = store.get::<Customer>("cust_1").await.unwrap().unwrap();
    assert_eq!(fetched.id, "cust_1");
    assert_eq!(
        serde_json::to_value(&fetched.data).unwrap(),
        serde_json::to_value(sample_customer()).unwrap()
    );
    assert_eq!(fetched.created_at, added.created_at);
    assert_eq!(fetched.updated_at, added.updated_at);
}

#[tokio::test]
async fn get_on_never_written_id_returns_none() {
    let store = test_store();
    let missing = store.get::<Customer>("nope").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn add_overwrites_existing_id_silently() {
    let store = test_store();
    store.add("p1", sample_product("First", 100)).await.unwrap();
    store.add("p1", sample_product("Second", 200)).await.unwrap();

    let fetched = store.get::<Product>("p1").await.unwrap().unwrap();
    assert_eq!(fetched.data.name, "Second");
    assert_eq!(fetched.data.price, 200);

    let all = store.get_all::<Product>().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let store = test_store();
    let added = store.add("p1", sample_product("Widget", 100)).await.unwrap();

    let patch = UpdateProductRequest {
        name: None,
        description: None,
        sku: None,
        price: Some(150),
        cost: None,
        quantity: None,
        category: None,
        image: None,
        status: None,
    };
    store.update::<Product, _>("p1", &patch).await.unwrap();

    let fetched = store.get::<Product>("p1").await.unwrap().unwrap();
    assert_eq!(fetched.data.price, 150);
    assert_eq!(fetched.data.name, "Widget");
    assert_eq!(fetched.data.quantity, 10);
    assert_eq!(fetched.created_at, added.created_at);
    assert!(fetched.updated_at >= added.updated_at);
}

#[tokio::test]
async fn explicit_null_in_a_patch_clears_the_field_while_absent_fields_survive() {
    let store = test_store();
    store.add("c1", sample_customer()).await.unwrap();

    let patch: UpdateCustomerRequest =
        serde_json::from_value(json!({ "cpf": null, "phone": "987654321" })).unwrap();
    assert_eq!(patch.cpf, Some(None));
    assert!(patch.cnpj.is_none());

    store.update::<Customer, _>("c1", &patch).await.unwrap();

    let fetched = store.get::<Customer>("c1").await.unwrap().unwrap();
    assert_eq!(fetched.data.cpf, None);
    assert_eq!(fetched.data.phone, "987654321");
    assert_eq!(fetched.data.name, "John Doe");
}

#[tokio::test]
async fn update_on_absent_id_is_a_noop() {
    let store = test_store();
    let patch = UpdateProductRequest {
        name: None,
        description: None,
        sku: None,
        price: Some(150),
        cost: None,
        quantity: None,
        category: None,
        image: None,
        status: None,
    };
    store.update::<Product, _>("ghost", &patch).await.unwrap();
    assert!(store.get::<Product>("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_then_get_returns_none() {
    let store = test_store();
    store.add("c1", sample_customer()).await.unwrap();

    let removed = store.delete::<Customer>("c1").await.unwrap();
    assert!(removed);
    assert!(store.get::<Customer>("c1").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_of_absent_id_succeeds_without_removal() {
    let store = test_store();
    let removed = store.delete::<Customer>("ghost").await.unwrap();
    assert!(!removed);
}

#[tokio::test]
async fn query_matches_equality_and_ordering_filters() {
    let store = test_store();
    store.add("p1", sample_product("Cheap", 100)).await.unwrap();
    store.add("p2", sample_product("Dear", 900)).await.unwrap();
    let mut inactive = sample_product("Hidden", 500);
    inactive.status = EntityStatus::Inactive;
    store.add("p3", inactive).await.unwrap();

    let active = store
        .query::<Product>(&[Filter::eq("status", "active")])
        .await
        .unwrap();
    assert_eq!(active.len(), 2);

    let pricey = store
        .query::<Product>(&[Filter::gte("price", 500)])
        .await
        .unwrap();
    let ids: Vec<&str> = pricey.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["p2", "p3"]);

    let both = store
        .query::<Product>(&[Filter::eq("status", "active"), Filter::gte("price", 500)])
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].id, "p2");
}

#[tokio::test]
async fn query_with_unknown_field_matches_nothing() {
    let store = test_store();
    store.add("p1", sample_product("Widget", 100)).await.unwrap();

    let hits = store
        .query::<Product>(&[Filter::ne("warehouse", "east")])
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn ordering_filter_on_non_numeric_value_is_rejected() {
    let store = test_store();
    store.add("p1", sample_product("Widget", 100)).await.unwrap();

    let err = store
        .query::<Product>(&[Filter::gte("price", "expensive")])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidFilter(field) if field == "price"));
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct Tag(String);

impl Collection for Tag {
    const NAME: &'static str = "tags";
}

#[tokio::test]
async fn non_object_payload_is_rejected() {
    let store = test_store();
    let err = store.add("t1", Tag("red".into())).await.unwrap_err();
    assert!(matches!(err, StoreError::NotAnObject));

    let patch = json!("not an object");
    let err = store.update::<Customer, _>("c1", &patch).await.unwrap_err();
    assert!(matches!(err, StoreError::NotAnObject));
}
