//! Error types and result types for document mapping operations.
//!
//! Every fallible operation in this crate returns a [`DocumentStoreResult<T>`].
//! Failures are raised at the point of violation and are never retried.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when mapping documents to a store.
///
/// Attribute access failures ([`NoSuchAttribute`](DocumentStoreError::NoSuchAttribute)),
/// malformed update calls ([`Argument`](DocumentStoreError::Argument)) and missing
/// documents ([`DocumentNotFound`](DocumentStoreError::DocumentNotFound)) are the
/// errors callers normally match on; the rest are surfaced by store backends.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization, or no connection is configured.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A document with the given ID already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// The requested document was not found in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// The document has an invalid structure.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A named attribute was read or written that the model never declared.
    /// The first argument is the attribute name, the second is the model name.
    #[error("No such attribute {0} on {1}")]
    NoSuchAttribute(String, String),
    /// An operation was called with a malformed argument shape.
    #[error("Argument error: {0}")]
    Argument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for document mapping operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
