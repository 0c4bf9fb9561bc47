//! Collection bindings.
//!
//! A [`Collection`] pairs a [`Connection`] with the [`Namespace`] a model
//! resolves to. It speaks the untyped side of the store boundary: plain BSON
//! documents in, plain BSON documents out. [`Model`](crate::model::Model) and
//! [`Document`](crate::document::Document) translate to and from it.
//!
//! # Example
//!
//! ```ignore
//! let users = model.collection()?;
//! assert_eq!(users.name(), "users");
//! let count = users.count().await?;
//! ```

use bson::{Bson, Document};
use tracing::debug;

use crate::{
    backend::Namespace,
    connection::Connection,
    error::DocumentStoreResult,
};

/// A store collection resolved for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    namespace: Namespace,
    connection: Connection,
}

impl Collection {
    pub(crate) fn new(namespace: Namespace, connection: Connection) -> Self {
        Self { namespace, connection }
    }

    /// The collection name.
    pub fn name(&self) -> &str {
        &self.namespace.collection
    }

    /// The database this collection lives in.
    pub fn database(&self) -> &str {
        &self.namespace.database
    }

    /// The full namespace of this collection.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The connection this collection is reached through.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Inserts a raw document and returns its identifier.
    pub async fn insert(&self, document: Document) -> DocumentStoreResult<Bson> {
        let id = self
            .connection
            .backend()
            .insert_document(&self.namespace, document)
            .await?;

        debug!(namespace = %self.namespace, %id, "inserted document");

        Ok(id)
    }

    /// Replaces the raw document stored under `id`.
    pub async fn update(&self, id: &Bson, document: Document) -> DocumentStoreResult<()> {
        debug!(namespace = %self.namespace, %id, "updating document");

        self.connection
            .backend()
            .update_document(&self.namespace, id, document)
            .await
    }

    /// Fetches the raw document stored under `id`.
    pub async fn get(&self, id: &Bson) -> DocumentStoreResult<Option<Document>> {
        debug!(namespace = %self.namespace, %id, "fetching document");

        self.connection
            .backend()
            .get_document(&self.namespace, id)
            .await
    }

    /// Deletes the raw document stored under `id`.
    pub async fn delete(&self, id: &Bson) -> DocumentStoreResult<()> {
        debug!(namespace = %self.namespace, %id, "deleting document");

        self.connection
            .backend()
            .delete_document(&self.namespace, id)
            .await
    }

    /// Counts the documents in this collection.
    pub async fn count(&self) -> DocumentStoreResult<u64> {
        self.connection
            .backend()
            .count_documents(&self.namespace)
            .await
    }

    /// Removes every document from this collection.
    pub async fn clear(&self) -> DocumentStoreResult<()> {
        debug!(namespace = %self.namespace, "clearing collection");

        self.connection
            .backend()
            .clear_collection(&self.namespace)
            .await
    }
}
