//! In-memory backend. Serves the test suite and local development without a
//! database; write visibility across tasks goes through one RwLock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    StoreError,
    backend::{DocumentBackend, Fields, RawDocument},
    filter::Filter,
};

type Collections = HashMap<String, BTreeMap<String, RawDocument>>;

#[derive(Default, Clone)]
pub struct MemoryBackend {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn put(&self, collection: &str, doc: &RawDocument) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(doc.id.clone(), doc.clone());
        Ok(())
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn search(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<RawDocument>, StoreError> {
        for filter in filters {
            if filter.op.is_ordering() && filter.value.as_f64().is_none() {
                return Err(StoreError::InvalidFilter(filter.field.clone()));
            }
        }
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filters.iter().all(|f| f.matches(&doc.data)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        {
            for (key, value) in fields {
                doc.data.insert(key.clone(), value.clone());
            }
            doc.updated_at = updated_at;
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .write()
            .await
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }
}
