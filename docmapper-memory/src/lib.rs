//! In-memory document storage backend for docmapper.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is ideal for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Untyped storage** - Stores documents as plain BSON documents
//! - **Identifier generation** - Assigns BSON object ids to documents inserted without one
//!
//! # Quick Start
//!
//! ```ignore
//! use docmapper::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!
//!     let mut users = Model::new("User");
//!     users.set_connection(Connection::new(backend));
//!     users.key("name", KeyType::String);
//!
//!     let user = users.create(doc! { "name": "Alice" }).await?;
//!     assert_eq!(users.count().await?, 1);
//!
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
