//! Shared handles to storage backends.
//!
//! A [`Connection`] is what models hold to reach their store. It is cheap to
//! clone; all clones share the same backend, and two connections compare equal
//! only when they share the same backend.
//!
//! # Example
//!
//! ```ignore
//! use docmapper::{connection::Connection, memory::InMemoryStore};
//!
//! let connection = Connection::new(InMemoryStore::new());
//! let backend = connection.downcast_ref::<InMemoryStore>();
//! assert!(backend.is_some());
//! ```

use std::{fmt, sync::Arc};

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    error::DocumentStoreResult,
};

/// A shared, dynamically dispatched handle to a store backend.
#[derive(Clone)]
pub struct Connection {
    backend: Arc<dyn DynStoreBackend>,
}

impl Connection {
    /// Wraps `backend` in a new connection handle.
    pub fn new<B: StoreBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wraps an already shared backend.
    pub fn from_arc(backend: Arc<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// The backend behind this connection.
    pub fn backend(&self) -> &dyn DynStoreBackend {
        &*self.backend
    }

    /// Returns the concrete backend if it is a `B`.
    pub fn downcast_ref<B: StoreBackend + 'static>(&self) -> Option<&B> {
        self.backend.as_any().downcast_ref::<B>()
    }

    /// Shuts the backend down.
    ///
    /// # Errors
    ///
    /// Fails with [`Backend`](crate::error::DocumentStoreError::Backend) while
    /// other clones of this connection, including ones held by models, are alive.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_shared().await
    }

    /// Whether both handles share the same backend.
    pub fn same_backend(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.same_backend(other)
    }
}

impl Eq for Connection {}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Connection")
            .field(&self.backend)
            .finish()
    }
}
