//! Storage backend abstraction for mapped documents.
//!
//! This module defines the traits that abstract over the document store a model
//! persists into. The store is untyped: it exchanges plain string-keyed BSON
//! documents addressed by a [`Namespace`] and an identifier. All typed coercion
//! happens before documents reach a backend and after they leave it.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use docmapper::backend::{Namespace, StoreBackend};
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! let users = Namespace::new("app", "users");
//!
//! // Insert a document; the backend generates the identifier.
//! let id = backend.insert_document(&users, doc! { "name": "Alice" }).await?;
//! let stored = backend.get_document(&users, &id).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Document};
use std::{any::Any, fmt, fmt::Debug, sync::Arc};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Address of one collection inside one database of a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
}

impl Namespace {
    /// Creates a namespace for `collection` inside `database`.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Abstract interface for document storage backends.
///
/// Implementers provide the concrete persistence strategy. Each call is a single
/// round-trip; the mapping layer awaits one call before issuing the next and
/// adds no locking of its own, so concurrent writers to the same identifier
/// resolve as last-writer-wins inside the backend.
///
/// # Identifiers
///
/// Documents are keyed by their `_id` field. When a document passed to
/// [`insert_document`](Self::insert_document) has no `_id`, the backend must
/// generate one (a BSON `ObjectId`) and return it.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a document and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentAlreadyExists`](crate::error::DocumentStoreError::DocumentAlreadyExists)
    /// if a document with the same `_id` is already stored.
    async fn insert_document(&self, namespace: &Namespace, document: Document) -> DocumentStoreResult<Bson>;

    /// Replaces the stored document with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound)
    /// if no document with `id` is stored.
    async fn update_document(
        &self,
        namespace: &Namespace,
        id: &Bson,
        document: Document,
    ) -> DocumentStoreResult<()>;

    /// Fetches the document with identifier `id`, or `None` if it is not stored.
    async fn get_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<Option<Document>>;

    /// Counts the documents in a collection. Missing collections count as empty.
    async fn count_documents(&self, namespace: &Namespace) -> DocumentStoreResult<u64>;

    /// Deletes the document with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound)
    /// if no document with `id` is stored.
    async fn delete_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<()>;

    /// Removes every document from a collection.
    async fn clear_collection(&self, namespace: &Namespace) -> DocumentStoreResult<()>;

    /// Releases backend resources.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe mirror of [`StoreBackend`] used behind shared connection handles.
///
/// Implemented automatically for every `StoreBackend + 'static`.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(&self, namespace: &Namespace, document: Document) -> DocumentStoreResult<Bson>;
    async fn update_document(
        &self,
        namespace: &Namespace,
        id: &Bson,
        document: Document,
    ) -> DocumentStoreResult<()>;
    async fn get_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<Option<Document>>;
    async fn count_documents(&self, namespace: &Namespace) -> DocumentStoreResult<u64>;
    async fn delete_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<()>;
    async fn clear_collection(&self, namespace: &Namespace) -> DocumentStoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;

    /// Shuts the backend down if `self` is its last shared handle.
    ///
    /// # Errors
    ///
    /// Returns [`Backend`](DocumentStoreError::Backend) while other handles
    /// still share the backend.
    async fn shutdown_shared(self: Arc<Self>) -> DocumentStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn insert_document(&self, namespace: &Namespace, document: Document) -> DocumentStoreResult<Bson> {
        StoreBackend::insert_document(self, namespace, document).await
    }

    async fn update_document(
        &self,
        namespace: &Namespace,
        id: &Bson,
        document: Document,
    ) -> DocumentStoreResult<()> {
        StoreBackend::update_document(self, namespace, id, document).await
    }

    async fn get_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<Option<Document>> {
        StoreBackend::get_document(self, namespace, id).await
    }

    async fn count_documents(&self, namespace: &Namespace) -> DocumentStoreResult<u64> {
        StoreBackend::count_documents(self, namespace).await
    }

    async fn delete_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<()> {
        StoreBackend::delete_document(self, namespace, id).await
    }

    async fn clear_collection(&self, namespace: &Namespace) -> DocumentStoreResult<()> {
        StoreBackend::clear_collection(self, namespace).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }

    async fn shutdown_shared(self: Arc<Self>) -> DocumentStoreResult<()> {
        match Arc::try_unwrap(self) {
            Ok(backend) => StoreBackend::shutdown(backend).await,
            Err(_) => Err(DocumentStoreError::Backend(
                "cannot shut down a backend that is still shared".to_string(),
            )),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory trait for constructing storage backends.
///
/// Useful for backends that need asynchronous setup such as connecting to a server.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
