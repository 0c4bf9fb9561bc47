//! Document instances: typed attributes bound to a model.
//!
//! A [`Document`] owns its [`Attributes`] and refers to the [`Model`] it was
//! built from. Two access surfaces exist:
//!
//! - the bracket surface ([`get`](Document::get), [`set`](Document::set) and
//!   `document["name"]`), which never fails and ignores undeclared names;
//! - the named-accessor surface ([`read_attribute`](Document::read_attribute),
//!   [`write_attribute`](Document::write_attribute)), which fails with
//!   [`DocumentStoreError::NoSuchAttribute`] for undeclared names.
//!
//! Both coerce on write.

use bson::{Bson, DateTime, Document as BsonDocument};
use chrono::Utc;
use std::ops::Index;
use tracing::trace;

use crate::{
    attributes::Attributes,
    collection::Collection,
    error::{DocumentStoreError, DocumentStoreResult},
    key::Key,
    model::Model,
    schema::{CREATED_AT_KEY, Schema, UPDATED_AT_KEY},
};

static NULL: Bson = Bson::Null;

/// One instance of a model.
///
/// Equality is identity: two documents are equal when they belong to the same
/// model and carry equal `_id` values. Two unsaved documents of the same model
/// (both without an id) are therefore equal.
#[derive(Debug, Clone)]
pub struct Document {
    model: Model,
    attributes: Attributes,
}

impl Document {
    pub(crate) fn new(model: Model, input: BsonDocument) -> Self {
        let attributes = Attributes::from_input(model.schema(), input);

        Self { model, attributes }
    }

    /// The model this document was built from.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The document identifier, if one is assigned.
    pub fn id(&self) -> Option<&Bson> {
        self.attributes.id()
    }

    /// The collection this document persists into.
    pub fn collection(&self) -> DocumentStoreResult<Collection> {
        self.model.collection()
    }

    /// Name of the collection this document persists into.
    pub fn collection_name(&self) -> &str {
        self.model.collection_name()
    }

    /// All attributes with non-null values, including `_id` once assigned.
    pub fn attributes(&self) -> BsonDocument {
        self.attributes.snapshot()
    }

    /// Mass-assigns every declared entry of `attributes`, ignoring the rest.
    pub fn set_attributes(&mut self, attributes: BsonDocument) {
        self.attributes.assign(self.model.schema(), attributes);
    }

    /// The value of `name`, or `None` when it is unset, null or undeclared.
    pub fn get(&self, name: &str) -> Option<&Bson> {
        self.model
            .schema()
            .get(name)
            .and_then(|key| self.attributes.get(key))
            .filter(|value| !matches!(value, Bson::Null))
    }

    /// Coerces and stores `value` under `name`. Undeclared names are ignored.
    pub fn set(&mut self, name: &str, value: impl Into<Bson>) {
        match self.model.schema().get(name) {
            Some(key) => self.attributes.set(key, value),
            None => trace!(model = %self.model.name(), attribute = %name, "ignoring undeclared attribute"),
        }
    }

    /// The value of `name`, or `None` when it is unset or null.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NoSuchAttribute`] if `name` is not declared.
    pub fn read_attribute(&self, name: &str) -> DocumentStoreResult<Option<&Bson>> {
        let key = self.declared(name)?;

        Ok(self
            .attributes
            .get(key)
            .filter(|value| !matches!(value, Bson::Null)))
    }

    /// Coerces and stores `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NoSuchAttribute`] if `name` is not declared.
    pub fn write_attribute(&mut self, name: &str, value: impl Into<Bson>) -> DocumentStoreResult<()> {
        let schema = self.model.schema();
        let key = schema
            .get(name)
            .ok_or_else(|| self.no_such_attribute(name))?;

        self.attributes.set(key, value);

        Ok(())
    }

    /// Whether `name` can be read through the named-accessor surface.
    pub fn is_reader(&self, name: &str) -> bool {
        self.model.schema().contains(name)
    }

    /// Whether `name` can be written through the named-accessor surface.
    ///
    /// A trailing `=` is accepted, so `"name="` probes the `name` writer.
    pub fn is_writer(&self, name: &str) -> bool {
        let name = name.strip_suffix('=').unwrap_or(name);

        self.model.schema().contains(name)
    }

    /// Whether this document is not yet stored.
    ///
    /// True when no id is assigned, or when the assigned id is not found in
    /// the store.
    pub async fn is_new_record(&self) -> DocumentStoreResult<bool> {
        match self.id() {
            None => Ok(true),
            Some(id) => Ok(self.collection()?.get(id).await?.is_none()),
        }
    }

    /// Inserts this document if it is new, otherwise writes back its full
    /// current attributes.
    pub async fn save(&mut self) -> DocumentStoreResult<&mut Self> {
        if self.is_new_record().await? {
            self.insert().await?;
        } else {
            self.replace().await?;
        }

        Ok(self)
    }

    /// Mass-assigns `attributes`, then [`save`](Self::save)s.
    pub async fn update_attributes(&mut self, attributes: BsonDocument) -> DocumentStoreResult<&mut Self> {
        self.set_attributes(attributes);
        self.save().await
    }

    /// Deletes the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if no id is assigned and
    /// [`DocumentStoreError::DocumentNotFound`] if the id is not stored.
    pub async fn destroy(&self) -> DocumentStoreResult<()> {
        let id = self
            .id()
            .ok_or_else(|| DocumentStoreError::InvalidDocument("cannot destroy a document without an id".to_string()))?;

        self.collection()?.delete(id).await
    }

    /// JSON view of [`attributes`](Self::attributes).
    pub fn to_json(&self) -> DocumentStoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self.attributes())?)
    }

    pub(crate) async fn insert(&mut self) -> DocumentStoreResult<()> {
        let collection = self.collection()?;
        let schema = self.model.schema();

        let mut attributes = self.attributes.clone();
        touch(schema, &mut attributes, true);

        let id = collection.insert(attributes.stored(schema)).await?;
        attributes.set_id(id);
        self.attributes = attributes;

        Ok(())
    }

    async fn replace(&mut self) -> DocumentStoreResult<()> {
        let collection = self.collection()?;
        let schema = self.model.schema();
        let id = self
            .id()
            .cloned()
            .ok_or_else(|| DocumentStoreError::InvalidDocument("cannot update a document without an id".to_string()))?;

        let mut attributes = self.attributes.clone();
        touch(schema, &mut attributes, false);

        collection.update(&id, attributes.stored(schema)).await?;
        self.attributes = attributes;

        Ok(())
    }

    fn declared(&self, name: &str) -> DocumentStoreResult<&Key> {
        self.model
            .schema()
            .get(name)
            .ok_or_else(|| self.no_such_attribute(name))
    }

    fn no_such_attribute(&self, name: &str) -> DocumentStoreError {
        DocumentStoreError::NoSuchAttribute(name.to_string(), self.model.name().to_string())
    }
}

/// Stamps `created_at` (first insert only) and `updated_at` when the schema
/// declares timestamps.
fn touch(schema: &Schema, attributes: &mut Attributes, inserting: bool) {
    if !schema.has_timestamps() {
        return;
    }

    let now = Bson::DateTime(DateTime::from_chrono(Utc::now()));

    if let Some(key) = schema.get(CREATED_AT_KEY) {
        if inserting && attributes.get(key).is_none_or(|value| matches!(value, Bson::Null)) {
            attributes.set(key, now.clone());
        }
    }

    if let Some(key) = schema.get(UPDATED_AT_KEY) {
        attributes.set(key, now);
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.model.is_same_model(&other.model) && self.id() == other.id()
    }
}

impl Index<&str> for Document {
    type Output = Bson;

    /// Reads `name` through the bracket surface; unset, null and undeclared
    /// names all yield `Bson::Null`.
    fn index(&self, name: &str) -> &Bson {
        self.get(name).unwrap_or(&NULL)
    }
}
