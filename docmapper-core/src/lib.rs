//! Typed keys, attribute coercion and document persistence over schemaless document stores.
//!
//! This crate is the core of the docmapper project and provides:
//!
//! - **Key types and coercion** ([`coerce`]) - Declared key types and total value coercion
//! - **Keys and schemas** ([`key`], [`schema`]) - Typed field declarations per model
//! - **Attributes** ([`attributes`]) - Per-instance coerced attribute storage
//! - **Models** ([`model`]) - Class-level descriptors with create/find/update operations
//! - **Documents** ([`document`]) - Instances with identity, accessors and save
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Connections and collections** ([`connection`], [`collection`]) - Store bindings
//! - **Configuration** ([`config`]) - Process-wide default connection and database
//! - **Error handling** ([`error`]) - Error taxonomy and result types
//!
//! # Example
//!
//! ```ignore
//! use docmapper::prelude::*;
//! use bson::doc;
//!
//! let mut users = Model::new("User");
//! users.key("name", KeyType::String);
//! users.key("age", KeyType::Integer);
//!
//! let mut user = users.new_document(doc! { "name": "John", "age": "27" });
//! user.save().await?;
//! assert!(!user.is_new_record().await?);
//! ```

pub mod attributes;
pub mod backend;
pub mod coerce;
pub mod collection;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod key;
pub mod model;
pub mod schema;
