//! Per-instance attribute storage.
//!
//! [`Attributes`] holds the coerced values of one document, keyed by the
//! declared key name. It only ever contains keys declared in the owning
//! schema; input entries with no matching key are dropped.

use bson::{Bson, Document as BsonDocument};
use tracing::trace;

use crate::{
    key::Key,
    schema::{ID_KEY, Schema},
};

/// Coerced attribute values of a single document.
///
/// Values are stored under the declared spelling of their key, so lookups by
/// any casing of a declared name land on the same entry. A `Null` value counts
/// as absent in [`snapshot`](Self::snapshot).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BsonDocument,
}

impl Attributes {
    /// Builds attributes from an input mapping.
    ///
    /// Every entry whose name matches a declared key is coerced and stored;
    /// other entries are dropped silently. Declared keys absent from the input
    /// receive their default, if any.
    pub fn from_input(schema: &Schema, input: BsonDocument) -> Self {
        let mut attributes = Self::default();
        attributes.assign(schema, input);

        for key in schema.keys() {
            if let Some(default) = key.default_value() {
                if !attributes.values.contains_key(key.name()) {
                    attributes.values.insert(key.name(), default.clone());
                }
            }
        }

        attributes
    }

    /// The stored value of `key`, or `None` when it was never assigned.
    ///
    /// An assigned `Null` is returned as `Some(&Bson::Null)`.
    pub fn get(&self, key: &Key) -> Option<&Bson> {
        self.values.get(key.name())
    }

    /// Coerces `value` for `key` and stores it, overwriting any previous value.
    pub fn set(&mut self, key: &Key, value: impl Into<Bson>) {
        self.values.insert(key.name(), key.coerce(value));
    }

    /// Mass-assigns every entry of `mapping` whose name is declared in `schema`.
    ///
    /// Keys absent from `mapping` are left untouched. Once an identifier is
    /// assigned, `_id` entries are ignored.
    pub fn assign(&mut self, schema: &Schema, mapping: BsonDocument) {
        for (name, value) in mapping {
            match schema.get(&name) {
                Some(key) if key.name() == ID_KEY && self.id().is_some() => {
                    trace!(attribute = %name, "ignoring identifier reassignment");
                }
                Some(key) => self.set(key, value),
                None => trace!(attribute = %name, "dropping undeclared attribute"),
            }
        }
    }

    /// All keys with non-null values, in assignment order.
    pub fn snapshot(&self) -> BsonDocument {
        self.values
            .iter()
            .filter(|(_, value)| !matches!(value, Bson::Null))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// The document handed to the store.
    ///
    /// Like [`snapshot`](Self::snapshot), but keys that declare a default keep
    /// an explicit `Null` when cleared, so reloading does not restore the default.
    pub fn stored(&self, schema: &Schema) -> BsonDocument {
        self.values
            .iter()
            .filter(|(name, value)| {
                !matches!(value, Bson::Null)
                    || schema.get(name).is_some_and(|key| key.default_value().is_some())
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// The document identifier, if one is assigned.
    pub fn id(&self) -> Option<&Bson> {
        self.values
            .get(ID_KEY)
            .filter(|id| !matches!(id, Bson::Null))
    }

    pub(crate) fn set_id(&mut self, id: Bson) {
        self.values.insert(ID_KEY, id);
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;
    use crate::coerce::KeyType;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.key("name", KeyType::String);
        schema.key("age", KeyType::Integer);
        schema
    }

    #[test]
    fn input_is_coerced_and_undeclared_keys_dropped() {
        let schema = schema();
        let attributes = Attributes::from_input(&schema, doc! { "name": 1234, "age": "21", "foobar": "baz" });

        assert_eq!(attributes.snapshot(), doc! { "name": "1234", "age": 21_i64 });
    }

    #[test]
    fn only_undeclared_input_yields_empty_snapshot() {
        let attributes = Attributes::from_input(&schema(), doc! { "foobar": "baz" });

        assert_eq!(attributes.snapshot(), doc! {});
    }

    #[test]
    fn null_values_are_omitted_from_snapshot() {
        let attributes = Attributes::from_input(&schema(), doc! { "name": "string", "age": Bson::Null });

        assert_eq!(attributes.snapshot(), doc! { "name": "string" });
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let schema = schema();
        let attributes = Attributes::from_input(&schema, doc! { "NAME": "string" });

        let key = schema.get("Name").unwrap();
        assert_eq!(attributes.get(key), Some(&Bson::String("string".into())));
        assert_eq!(attributes.snapshot(), doc! { "name": "string" });
    }

    #[test]
    fn assignment_leaves_omitted_keys_alone() {
        let schema = schema();
        let mut attributes = Attributes::from_input(&schema, doc! { "name": "foobar", "age": 10 });

        attributes.assign(&schema, doc! { "name": "new value", "foobar": "baz" });

        assert_eq!(attributes.snapshot(), doc! { "name": "new value", "age": 10_i64 });
    }

    #[test]
    fn defaults_fill_absent_keys_only() {
        let mut schema = schema();
        schema.key_with_default("role", KeyType::String, "member");

        let defaulted = Attributes::from_input(&schema, doc! {});
        let explicit = Attributes::from_input(&schema, doc! { "role": "admin" });

        assert_eq!(defaulted.snapshot(), doc! { "role": "member" });
        assert_eq!(explicit.snapshot(), doc! { "role": "admin" });
    }

    #[test]
    fn cleared_defaults_survive_a_store_round_trip() {
        let mut schema = schema();
        schema.key_with_default("role", KeyType::String, "member");

        let mut attributes = Attributes::from_input(&schema, doc! { "name": "John" });
        attributes.set(schema.get("role").unwrap(), Bson::Null);
        attributes.set(schema.get("age").unwrap(), Bson::Null);

        let stored = attributes.stored(&schema);
        assert_eq!(stored, doc! { "name": "John", "role": Bson::Null });

        let reloaded = Attributes::from_input(&schema, stored);
        assert_eq!(reloaded.snapshot(), attributes.snapshot());
    }

    #[test]
    fn assigned_identifiers_are_not_reassigned() {
        let schema = schema();
        let mut attributes = Attributes::from_input(&schema, doc! { "_id": 1, "name": "John" });

        attributes.assign(&schema, doc! { "_id": 99, "name": "Steve" });

        assert_eq!(attributes.id(), Some(&Bson::Int32(1)));
        assert_eq!(attributes.snapshot(), doc! { "_id": 1, "name": "Steve" });
    }

    #[test]
    fn identifier_can_be_assigned_while_unset() {
        let schema = schema();
        let mut attributes = Attributes::from_input(&schema, doc! {});

        attributes.assign(&schema, doc! { "_id": 7 });

        assert_eq!(attributes.id(), Some(&Bson::Int32(7)));
    }

    #[test]
    fn id_ignores_null() {
        let schema = schema();
        let mut attributes = Attributes::from_input(&schema, doc! { "_id": Bson::Null });
        assert_eq!(attributes.id(), None);

        attributes.set_id(Bson::Int32(1));
        assert_eq!(attributes.id(), Some(&Bson::Int32(1)));
    }
}
