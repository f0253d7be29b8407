use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{Filter, StoreError};

/// Top-level fields of a stored document, excluding id and stamps.
pub type Fields = Map<String, Value>;

/// A document as the backend sees it: untyped fields plus the stamps the
/// access layer maintains.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub data: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage backend for named collections of documents. Implementations take
/// `&self` and use interior mutability (or an external database) so one
/// handle can serve concurrent requests.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Write a document, replacing any existing one under the same id.
    async fn put(&self, collection: &str, doc: &RawDocument) -> Result<(), StoreError>;

    /// Read one document. Absence is `Ok(None)`, never an error.
    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError>;

    /// Read every document in a collection.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError>;

    /// Read documents matching all of the given filters.
    async fn search(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<RawDocument>, StoreError>;

    /// Merge fields into an existing document and refresh its update stamp.
    /// A merge into an absent id is a no-op.
    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Delete a document. Returns whether one was actually removed; deleting
    /// an absent id is not an error.
    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}
