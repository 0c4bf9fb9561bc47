//! In-memory storage implementation for document stores.
//!
//! This module provides a simple backend that stores documents as BSON
//! documents in HashMaps with async-safe read-write locks.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};
use tracing::trace;

use docmapper_core::{
    backend::{Namespace, StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<Namespace, CollectionMap>;

const ID_FIELD: &str = "_id";

/// Thread-safe in-memory document storage backend.
///
/// This struct implements the [`StoreBackend`] trait to provide a fully functional
/// document store that operates entirely in memory using async-aware read-write locks.
/// Documents are indexed by their `_id` value; ids of different BSON types never
/// collide, so the string `"1"` and the integer `1` address different documents.
/// Integer ids match regardless of width, as they do in MongoDB.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Example
///
/// ```ignore
/// use docmapper_memory::InMemoryStore;
/// use docmapper::backend::{Namespace, StoreBackend};
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///     let users = Namespace::new("app", "users");
///
///     let id = store.insert_document(&users, doc! { "name": "Alice" }).await?;
///     let stored = store.get_document(&users, &id).await?;
///     assert!(stored.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: namespace -> (document id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Lists the namespaces that currently hold at least one document.
    pub async fn namespaces(&self) -> Vec<Namespace> {
        self.store
            .read()
            .await
            .iter()
            .filter(|(_, documents)| !documents.is_empty())
            .map(|(namespace, _)| namespace.clone())
            .collect()
    }
}

/// Map key for a document id. The element type is part of the key, except
/// that 32-bit integers are widened so integral ids match by value.
fn id_key(id: &Bson) -> String {
    match id {
        Bson::Int32(i) => id_key(&Bson::Int64(i64::from(*i))),
        _ => format!("{:?}:{}", id.element_type(), id),
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, namespace: &Namespace, mut document: Document) -> DocumentStoreResult<Bson> {
        let existing = document
            .get(ID_FIELD)
            .filter(|id| !matches!(id, Bson::Null))
            .cloned();

        let id = match existing {
            Some(id) => id,
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert(ID_FIELD, id.clone());
                id
            }
        };

        let mut store = self.store.write().await;
        let collection_map = store
            .entry(namespace.clone())
            .or_default();

        let key = id_key(&id);

        if collection_map.contains_key(&key) {
            return Err(DocumentStoreError::DocumentAlreadyExists(id.to_string(), namespace.collection.clone()));
        }

        trace!(%namespace, %id, "storing document");
        collection_map.insert(key, document);

        Ok(id)
    }

    async fn update_document(&self, namespace: &Namespace, id: &Bson, mut document: Document) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(namespace) {
            Some(col) => col,
            None => return Err(DocumentStoreError::DocumentNotFound(id.to_string(), namespace.collection.clone())),
        };

        let key = id_key(id);

        if !collection_map.contains_key(&key) {
            return Err(DocumentStoreError::DocumentNotFound(id.to_string(), namespace.collection.clone()));
        }

        document.insert(ID_FIELD, id.clone());
        collection_map.insert(key, document);

        Ok(())
    }

    async fn get_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(store
            .get(namespace)
            .and_then(|collection_map| collection_map.get(&id_key(id)))
            .cloned())
    }

    async fn count_documents(&self, namespace: &Namespace) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;

        Ok(store
            .get(namespace)
            .map_or(0, |collection_map| collection_map.len() as u64))
    }

    async fn delete_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let removed = store
            .get_mut(namespace)
            .and_then(|collection_map| collection_map.remove(&id_key(id)));

        match removed {
            Some(_) => Ok(()),
            None => Err(DocumentStoreError::DocumentNotFound(id.to_string(), namespace.collection.clone())),
        }
    }

    async fn clear_collection(&self, namespace: &Namespace) -> DocumentStoreResult<()> {
        if let Some(collection_map) = self.store.write().await.get_mut(namespace) {
            collection_map.clear();
        }

        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
