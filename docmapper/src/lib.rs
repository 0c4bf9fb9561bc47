//! Main docmapper crate providing typed models over schemaless document stores.
//!
//! This crate is the primary entry point for users of the docmapper framework.
//! It re-exports the core types and functionality from the sub-crates and provides
//! convenient access to the storage backends.
//!
//! # Features
//!
//! - **Typed keys** - Declare fields with a type; every write is coerced to it
//! - **Indifferent attribute access** - Bracket and named accessors over declared keys
//! - **Document identity** - Generated ids, new-record detection, identity equality
//! - **Persistence** - create, update, find and save against any store backend
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use docmapper::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     // Install a process-wide default connection
//!     config::init(Connection::new(InMemoryStore::new()), Settings::default());
//!
//!     // Compose a model and declare its keys
//!     let mut people = Model::new("Person");
//!     people.key("fname", KeyType::String);
//!     people.key("lname", KeyType::String);
//!     people.key("age", KeyType::Integer);
//!
//!     // Values are coerced to the declared type
//!     let john = people
//!         .create(doc! { "fname": "John", "lname": "Nunemaker", "age": "27" })
//!         .await?;
//!     assert_eq!(john["age"], bson::Bson::Int64(27));
//!
//!     // Update only some attributes of a stored document
//!     let id = john.id().cloned().unwrap();
//!     let john = people.update(id.clone(), doc! { "age": 40 }).await?;
//!     assert_eq!(john["fname"], bson::Bson::String("John".into()));
//!
//!     // Find it again
//!     assert_eq!(people.find(id).await?, john);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Instances
//!
//! Documents can also be built in memory and saved later:
//!
//! ```ignore
//! let mut doc = people.new_document(doc! { "fname": "Steve" });
//! doc.set("age", "28");
//! doc.write_attribute("lname", "Smith")?;
//! assert!(doc.write_attribute("fart", "poof!").is_err());
//!
//! doc.save().await?;
//! assert!(!doc.is_new_record().await?);
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use docmapper_core::{
    attributes, backend, coerce, collection, config, connection, document, error, key, model, schema,
};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docmapper_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docmapper_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
