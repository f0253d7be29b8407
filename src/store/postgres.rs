//! Postgres backend: one `documents` table keyed by (collection, id) with a
//! JSONB payload column. Filters translate to JSONB predicates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, postgres::PgPoolOptions};

use super::{
    StoreError,
    backend::{DocumentBackend, Fields, RawDocument},
    filter::Filter,
};

type DocumentRow = (String, Value, DateTime<Utc>, DateTime<Utc>);

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentBackend for PostgresBackend {
    async fn put(&self, collection: &str, doc: &RawDocument) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (collection, id) DO UPDATE
            SET data = EXCLUDED.data,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(collection)
        .bind(&doc.id)
        .bind(Value::Object(doc.data.clone()))
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, data, created_at, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(document_from_row).transpose()
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, data, created_at, updated_at FROM documents WHERE collection = $1 ORDER BY created_at",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(document_from_row).collect()
    }

    async fn search(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<RawDocument>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, data, created_at, updated_at FROM documents WHERE collection = ",
        );
        builder.push_bind(collection);

        for filter in filters {
            if filter.op.is_ordering() {
                let Some(operand) = filter.value.as_f64() else {
                    return Err(StoreError::InvalidFilter(filter.field.clone()));
                };
                // Guard the numeric cast so non-numeric fields fall out of the
                // match instead of aborting the query.
                builder.push(" AND CASE WHEN jsonb_typeof(data -> ");
                builder.push_bind(filter.field.clone());
                builder.push(") = 'number' THEN (data ->> ");
                builder.push_bind(filter.field.clone());
                builder.push(")::numeric ");
                builder.push(filter.op.as_sql());
                builder.push(" ");
                builder.push_bind(operand);
                builder.push(" ELSE false END");
            } else {
                builder.push(" AND data -> ");
                builder.push_bind(filter.field.clone());
                builder.push(" ");
                builder.push(filter.op.as_sql());
                builder.push(" ");
                builder.push_bind(filter.value.clone());
            }
        }
        builder.push(" ORDER BY created_at");

        let rows: Vec<DocumentRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(document_from_row).collect()
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE documents SET data = data || $3, updated_at = $4 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields.clone()))
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn document_from_row(row: DocumentRow) -> Result<RawDocument, StoreError> {
    let (id, data, created_at, updated_at) = row;
    let Value::Object(data) = data else {
        return Err(StoreError::NotAnObject);
    };
    Ok(RawDocument {
        id,
        data,
        created_at,
        updated_at,
    })
}
