//! Key descriptors: the declared, typed fields of a model.

use bson::Bson;

use crate::coerce::KeyType;

/// An immutable schema entry: a key name, its declared type, and an optional default.
///
/// The default is coerced once when the key is declared, so it is always stored
/// in the canonical representation of the key's type.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    name: String,
    key_type: KeyType,
    default: Option<Bson>,
}

impl Key {
    /// Creates a key without a default value.
    pub fn new(name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
            default: None,
        }
    }

    /// Creates a key whose default is `default`, coerced to `key_type`.
    ///
    /// A default that coerces to `Null` is treated as no default.
    pub fn with_default(name: impl Into<String>, key_type: KeyType, default: impl Into<Bson>) -> Self {
        let default = key_type.coerce(default.into());

        Self {
            name: name.into(),
            key_type,
            default: (default != Bson::Null).then_some(default),
        }
    }

    /// The declared name of this key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of this key.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// The coerced default value, if one was declared.
    pub fn default_value(&self) -> Option<&Bson> {
        self.default.as_ref()
    }

    /// Coerces `value` into this key's canonical representation.
    pub fn coerce(&self, value: impl Into<Bson>) -> Bson {
        self.key_type.coerce(value.into())
    }

    /// Whether `name` refers to this key, ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
