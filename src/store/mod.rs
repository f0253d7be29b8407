//! Generic document-store access layer: six operations over named
//! collections of JSON records keyed by caller-supplied string ids, with
//! creation/update stamps maintained here and never accepted from callers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

pub mod backend;
pub mod filter;
pub mod memory;
pub mod postgres;

pub use backend::{DocumentBackend, Fields, RawDocument};
pub use filter::{Filter, FilterOp};
pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("document payload must serialize to a JSON object")]
    NotAnObject,

    #[error("ordering filter on field `{0}` requires a numeric value")]
    InvalidFilter(String),
}

/// Maps an entity type to the collection that holds it.
pub trait Collection {
    const NAME: &'static str;
}

/// A typed record as returned by the store: the entity fields plus the id it
/// is keyed under and the stamps the store maintains.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Document<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stateless wrapper over an injected [`DocumentBackend`]. Every operation
/// delegates to the backend; on failure it logs with the collection name and
/// propagates the error unchanged. No retries, caching, or transactions.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
}

impl DocumentStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Write a new record, stamping both timestamps to now. Overwrites
    /// silently if the id already exists. Returns the data as supplied, not
    /// re-read from storage.
    pub async fn add<T>(&self, id: &str, data: T) -> Result<Document<T>, StoreError>
    where
        T: Collection + Serialize,
    {
        let fields = to_object(&data)?;
        let now = Utc::now();
        let raw = RawDocument {
            id: id.to_string(),
            data: fields,
            created_at: now,
            updated_at: now,
        };
        self.backend
            .put(T::NAME, &raw)
            .await
            .map_err(|err| log_failure(T::NAME, "add", err))?;
        Ok(Document {
            id: id.to_string(),
            data,
            created_at: now,
            updated_at: now,
        })
    }

    /// Read one record. Absence is the `None` sentinel, never an error.
    pub async fn get<T>(&self, id: &str) -> Result<Option<Document<T>>, StoreError>
    where
        T: Collection + DeserializeOwned,
    {
        let raw = self
            .backend
            .fetch(T::NAME, id)
            .await
            .map_err(|err| log_failure(T::NAME, "get", err))?;
        raw.map(decode_document).transpose()
    }

    /// Read every record in the collection. No pagination; ordering is
    /// whatever the backend yields.
    pub async fn get_all<T>(&self) -> Result<Vec<Document<T>>, StoreError>
    where
        T: Collection + DeserializeOwned,
    {
        let raws = self
            .backend
            .fetch_all(T::NAME)
            .await
            .map_err(|err| log_failure(T::NAME, "get_all", err))?;
        raws.into_iter().map(decode_document).collect()
    }

    /// Read records matching a conjunction of filters.
    pub async fn query<T>(&self, filters: &[Filter]) -> Result<Vec<Document<T>>, StoreError>
    where
        T: Collection + DeserializeOwned,
    {
        let raws = self
            .backend
            .search(T::NAME, filters)
            .await
            .map_err(|err| log_failure(T::NAME, "query", err))?;
        raws.into_iter().map(decode_document).collect()
    }

    /// Merge the serialized fields of `patch` into an existing record and
    /// refresh `updated_at`. Does not verify the record exists; merging into
    /// an absent id is a no-op.
    pub async fn update<T, P>(&self, id: &str, patch: &P) -> Result<(), StoreError>
    where
        T: Collection,
        P: Serialize,
    {
        let fields = to_object(patch)?;
        self.backend
            .merge(T::NAME, id, &fields, Utc::now())
            .await
            .map_err(|err| log_failure(T::NAME, "update", err))
    }

    /// Remove a record. Returns whether one was actually removed; removing an
    /// absent id succeeds with `false`.
    pub async fn delete<T>(&self, id: &str) -> Result<bool, StoreError>
    where
        T: Collection,
    {
        self.backend
            .remove(T::NAME, id)
            .await
            .map_err(|err| log_failure(T::NAME, "delete", err))
    }
}

fn to_object(value: &impl Serialize) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

fn decode_document<T: DeserializeOwned>(raw: RawDocument) -> Result<Document<T>, StoreError> {
    let data = serde_json::from_value(Value::Object(raw.data))?;
    Ok(Document {
        id: raw.id,
        data,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

fn log_failure(collection: &str, op: &str, err: StoreError) -> StoreError {
    tracing::error!(collection, op, error = %err, "document store operation failed");
    err
}
