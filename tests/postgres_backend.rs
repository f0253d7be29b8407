use std::sync::Arc;

use erp_admin_api::{
    models::{Customer, EntityStatus, Product, User, UserRole},
    store::{DocumentStore, Filter, PostgresBackend, StoreError},
};

// Exercises the JSONB translation of the document operations against a real
// database. Runs only when a database is configured in the environment.
#[tokio::test]
async fn document_operations_round_trip_through_postgres() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run Postgres backend tests."
            );
            return Ok(());
        }
    };

    let backend = PostgresBackend::connect(&database_url).await?;
    sqlx::migrate!("./migrations").run(backend.pool()).await?;
    sqlx::query("TRUNCATE TABLE documents")
        .execute(backend.pool())
        .await?;

    let store = DocumentStore::new(Arc::new(backend));

    let customer = Customer {
        name: "Acme Corp".into(),
        email: "billing@acme.test".into(),
        phone: "555-0100".into(),
        address: "1 Industrial Way".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        cnpj: None,
        cpf: None,
        status: EntityStatus::Active,
    };
    store.add("cust_1", customer).await?;

    let fetched = store.get::<Customer>("cust_1").await?.expect("present");
    assert_eq!(fetched.data.name, "Acme Corp");
    assert!(store.get::<Customer>("cust_2").await?.is_none());

    for (id, price) in [("p1", 100i64), ("p2", 900)] {
        let product = Product {
            name: format!("Product {id}"),
            description: "A product for testing".into(),
            sku: format!("SKU-{id}"),
            price,
            cost: price / 2,
            quantity: 10,
            category: "widgets".into(),
            image: None,
            status: EntityStatus::Active,
        };
        store.add(id, product).await?;
    }

    let pricey = store
        .query::<Product>(&[Filter::gte("price", 500)])
        .await?;
    assert_eq!(pricey.len(), 1);
    assert_eq!(pricey[0].id, "p2");

    let active = store
        .query::<Product>(&[Filter::eq("status", "active")])
        .await?;
    assert_eq!(active.len(), 2);

    store
        .update::<Product, _>("p1", &serde_json::json!({ "price": 150 }))
        .await?;
    let updated = store.get::<Product>("p1").await?.expect("present");
    assert_eq!(updated.data.price, 150);
    assert_eq!(updated.data.quantity, 10);
    assert!(updated.updated_at > updated.created_at);

    assert!(store.delete::<Customer>("cust_1").await?);
    assert!(!store.delete::<Customer>("cust_1").await?);
    assert!(store.get::<Customer>("cust_1").await?.is_none());

    // The partial unique index on users' email rejects a second account with
    // the same address even when the application-level check is bypassed.
    let account = |name: &str| User {
        email: "dup@acme.test".into(),
        display_name: name.into(),
        role: UserRole::User,
        avatar: None,
        password_hash: "argon2-hash".into(),
    };
    store.add("u1", account("First")).await?;
    let err = store.add("u2", account("Second")).await.unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));

    Ok(())
}
