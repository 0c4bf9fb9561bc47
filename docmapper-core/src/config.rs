//! Process-wide default configuration.
//!
//! Models copy the default connection and database name when they are
//! composed with [`Model::new`](crate::model::Model::new). Overriding either on
//! a model never writes back here, and changing the defaults later does not
//! touch models that were already composed, with one exception: a model
//! composed before any default connection existed resolves the default
//! connection when it first needs one.
//!
//! ```ignore
//! use docmapper::{config, config::Settings, connection::Connection, memory::InMemoryStore};
//!
//! config::init(Connection::new(InMemoryStore::new()), Settings::default());
//! ```

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{connection::Connection, error::DocumentStoreResult};

/// Name of the database used when none is configured.
pub const DEFAULT_DATABASE: &str = "docmapper";

/// Serializable part of the default configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database that models persist into unless overridden.
    pub database: String,
}

impl Settings {
    /// Reads settings from a JSON value, filling missing fields with defaults.
    pub fn from_json(value: serde_json::Value) -> DocumentStoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Defaults {
    connection: Option<Connection>,
    settings: Settings,
}

static DEFAULTS: Lazy<RwLock<Defaults>> = Lazy::new(|| RwLock::new(Defaults::default()));

/// Installs the default connection and settings.
pub fn init(connection: Connection, settings: Settings) {
    debug!(database = %settings.database, "initializing default configuration");

    let mut defaults = DEFAULTS.write();
    defaults.connection = Some(connection);
    defaults.settings = settings;
}

/// Replaces the default connection.
pub fn set_connection(connection: Connection) {
    debug!("replacing default connection");

    DEFAULTS.write().connection = Some(connection);
}

/// Replaces the default database name.
pub fn set_database(database: impl Into<String>) {
    let database = database.into();
    debug!(%database, "replacing default database");

    DEFAULTS.write().settings.database = database;
}

/// The default connection, if one has been installed.
pub fn connection() -> Option<Connection> {
    DEFAULTS.read().connection.clone()
}

/// The default database name.
pub fn database() -> String {
    DEFAULTS.read().settings.database.clone()
}

/// A copy of the current default settings.
pub fn settings() -> Settings {
    DEFAULTS.read().settings.clone()
}

/// Drops the default connection and restores default settings.
pub fn reset() {
    debug!("resetting default configuration");

    *DEFAULTS.write() = Defaults::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_database() {
        assert_eq!(Settings::default().database, DEFAULT_DATABASE);
    }

    #[test]
    fn settings_read_from_json() {
        let settings = Settings::from_json(serde_json::json!({ "database": "app_test" })).unwrap();
        assert_eq!(settings.database, "app_test");

        let settings = Settings::from_json(serde_json::json!({})).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_reject_malformed_json() {
        let result = Settings::from_json(serde_json::json!({ "database": 12 }));

        assert!(result.is_err());
    }
}
