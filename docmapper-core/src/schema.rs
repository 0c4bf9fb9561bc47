//! Per-model schema registries.
//!
//! A [`Schema`] is the ordered set of [`Key`]s a model declares. Every schema
//! carries the implicit [`ID_KEY`] identifier key from the moment it is created.

use bson::Bson;

use crate::{coerce::KeyType, key::Key};

/// Name of the implicit identifier key present in every schema.
pub const ID_KEY: &str = "_id";

/// Name of the creation timestamp key declared by [`Schema::timestamps`].
pub const CREATED_AT_KEY: &str = "created_at";

/// Name of the modification timestamp key declared by [`Schema::timestamps`].
pub const UPDATED_AT_KEY: &str = "updated_at";

/// Insertion-ordered mapping from key name to [`Key`].
///
/// Key names are unique ignoring ASCII case. Re-declaring a name replaces the
/// existing descriptor in place, keeping its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    keys: Vec<Key>,
    timestamps: bool,
}

impl Schema {
    /// Creates a schema holding only the implicit identifier key.
    pub fn new() -> Self {
        Self {
            keys: vec![Key::new(ID_KEY, KeyType::ObjectId)],
            timestamps: false,
        }
    }

    /// Declares (or re-declares) a key and returns the stored descriptor.
    pub fn key(&mut self, name: impl Into<String>, key_type: KeyType) -> &Key {
        self.declare(Key::new(name, key_type))
    }

    /// Declares (or re-declares) a key with a default value.
    pub fn key_with_default(
        &mut self,
        name: impl Into<String>,
        key_type: KeyType,
        default: impl Into<Bson>,
    ) -> &Key {
        self.declare(Key::with_default(name, key_type, default))
    }

    /// Declares `created_at` and `updated_at` as [`KeyType::Time`] keys.
    pub fn timestamps(&mut self) {
        self.key(CREATED_AT_KEY, KeyType::Time);
        self.key(UPDATED_AT_KEY, KeyType::Time);
        self.timestamps = true;
    }

    /// Whether [`timestamps`](Self::timestamps) was declared.
    pub fn has_timestamps(&self) -> bool {
        self.timestamps
    }

    /// Inserts `key`, replacing any descriptor with the same name.
    pub fn declare(&mut self, key: Key) -> &Key {
        let index = match self.position(key.name()) {
            Some(index) => {
                self.keys[index] = key;
                index
            }
            None => {
                self.keys.push(key);
                self.keys.len() - 1
            }
        };

        &self.keys[index]
    }

    /// Looks up a key by name. Exact matches win over case-insensitive ones.
    pub fn get(&self, name: &str) -> Option<&Key> {
        self.position(name).map(|index| &self.keys[index])
    }

    /// Whether a key named `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates over the declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Iterates over the declared key names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(Key::name)
    }

    /// Number of declared keys, including the identifier key.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; the identifier key is always present.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.keys
            .iter()
            .position(|key| key.name() == name)
            .or_else(|| self.keys.iter().position(|key| key.matches(name)))
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}
