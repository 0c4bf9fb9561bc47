//! Convenient re-exports of commonly used types from docmapper.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docmapper::prelude::*;
//! ```
//!
//! This provides access to:
//! - Models, documents, keys and key types
//! - Connections, collections and store backends
//! - Configuration and error types

pub use docmapper_core::{
    attributes::Attributes,
    backend::{DynStoreBackend, Namespace, StoreBackend, StoreBackendBuilder},
    coerce::{KeyType, coerce},
    collection::Collection,
    config::{self, Settings},
    connection::Connection,
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    key::Key,
    model::Model,
    schema::{ID_KEY, Schema},
};
