use async_trait::async_trait;
use bson::{Bson, Document, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::ClientOptions,
};
use tracing::trace;
use docmapper_core::{
    backend::{Namespace, StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
};

const DUPLICATE_KEY: i32 = 11000;


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
}

impl MongoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn builder(dsn: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn)
    }

    fn get_collection(&self, namespace: &Namespace) -> MongoCollection<Document> {
        self.client
            .database(&namespace.database)
            .collection(&namespace.collection)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

fn backend_error(err: MongoError) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, namespace: &Namespace, document: Document) -> DocumentStoreResult<Bson> {
        let id = document.get("_id").cloned();

        trace!(%namespace, "inserting document");

        self.get_collection(namespace)
            .insert_one(document)
            .await
            .map(|result| result.inserted_id)
            .map_err(|e| match id {
                Some(id) if is_duplicate_key(&e) => {
                    DocumentStoreError::DocumentAlreadyExists(id.to_string(), namespace.collection.clone())
                }
                _ => backend_error(e),
            })
    }

    async fn update_document(&self, namespace: &Namespace, id: &Bson, document: Document) -> DocumentStoreResult<()> {
        let result = self.get_collection(namespace)
            .replace_one(doc! { "_id": id.clone() }, document)
            .await
            .map_err(backend_error)?;

        if result.matched_count == 0 {
            return Err(DocumentStoreError::DocumentNotFound(id.to_string(), namespace.collection.clone()));
        }

        Ok(())
    }

    async fn get_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<Option<Document>> {
        self.get_collection(namespace)
            .find_one(doc! { "_id": id.clone() })
            .await
            .map_err(backend_error)
    }

    async fn count_documents(&self, namespace: &Namespace) -> DocumentStoreResult<u64> {
        self.get_collection(namespace)
            .count_documents(doc! {})
            .await
            .map_err(backend_error)
    }

    async fn delete_document(&self, namespace: &Namespace, id: &Bson) -> DocumentStoreResult<()> {
        let result = self.get_collection(namespace)
            .delete_one(doc! { "_id": id.clone() })
            .await
            .map_err(backend_error)?;

        if result.deleted_count == 0 {
            return Err(DocumentStoreError::DocumentNotFound(id.to_string(), namespace.collection.clone()));
        }

        Ok(())
    }

    async fn clear_collection(&self, namespace: &Namespace) -> DocumentStoreResult<()> {
        self.get_collection(namespace)
            .delete_many(doc! {})
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
        ))
    }
}
