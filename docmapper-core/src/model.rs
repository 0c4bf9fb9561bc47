//! Models: class-level descriptors that own a schema and a store binding.
//!
//! A [`Model`] is composed once with [`Model::new`], which injects the implicit
//! `_id` key, copies the process-wide default connection and database from
//! [`config`](crate::config), and names the collection after the model. Keys
//! are then declared on it, and documents are built, created, found and
//! updated through it.
//!
//! Models are cheap to clone and share one descriptor. Declarations and
//! binding overrides are copy-on-write: documents built earlier keep the
//! descriptor they were built from, and no other model (nor the process-wide
//! default) observes the change. Model identity survives copy-on-write, so
//! documents built before and after a declaration still compare as the same
//! model.
//!
//! # Example
//!
//! ```ignore
//! use docmapper::prelude::*;
//! use bson::doc;
//!
//! let mut users = Model::new("User");
//! users.key("fname", KeyType::String);
//! users.key("age", KeyType::Integer);
//!
//! let john = users.create(doc! { "fname": "John", "age": "27" }).await?;
//! assert_eq!(john.get("age"), Some(&bson::Bson::Int64(27)));
//!
//! let john = users.update(john.id().cloned().unwrap(), doc! { "age": 40 }).await?;
//! ```

use bson::{Bson, Document as BsonDocument};
use convert_case::{Case, Casing};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::debug;

use crate::{
    backend::Namespace,
    coerce::KeyType,
    collection::Collection,
    config,
    connection::Connection,
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    key::Key,
    schema::{ID_KEY, Schema},
};

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
struct ModelInner {
    identity: u64,
    name: String,
    schema: Schema,
    connection: Option<Connection>,
    database: String,
    collection: String,
}

/// A document type: its schema plus the store collection it persists into.
#[derive(Debug, Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

impl Model {
    /// Composes a new model named `name`.
    ///
    /// Every call yields a distinct model identity, even for equal names.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let collection = tableize(&name);

        debug!(model = %name, %collection, "composing model");

        Self {
            inner: Arc::new(ModelInner {
                identity: NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed),
                name,
                schema: Schema::new(),
                connection: config::connection(),
                database: config::database(),
                collection,
            }),
        }
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether `other` is the same model, regardless of later declarations.
    pub fn is_same_model(&self, other: &Model) -> bool {
        self.inner.identity == other.inner.identity
    }

    /// The declared schema, including the implicit `_id` key.
    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// Iterates over the declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.inner.schema.keys()
    }

    /// Declares (or re-declares) a key.
    pub fn key(&mut self, name: impl Into<String>, key_type: KeyType) -> &Key {
        Arc::make_mut(&mut self.inner).schema.key(name, key_type)
    }

    /// Declares (or re-declares) a key with a default value.
    pub fn key_with_default(
        &mut self,
        name: impl Into<String>,
        key_type: KeyType,
        default: impl Into<Bson>,
    ) -> &Key {
        Arc::make_mut(&mut self.inner).schema.key_with_default(name, key_type, default)
    }

    /// Declares the `created_at` and `updated_at` keys, which
    /// [`Document::save`] then maintains.
    pub fn timestamps(&mut self) {
        Arc::make_mut(&mut self.inner).schema.timestamps();
    }

    /// The connection this model uses.
    ///
    /// Falls back to the current process-wide default when the model was
    /// composed before one existed and was never given its own.
    pub fn connection(&self) -> Option<Connection> {
        self.inner
            .connection
            .clone()
            .or_else(config::connection)
    }

    /// Points this model at another connection.
    pub fn set_connection(&mut self, connection: Connection) {
        debug!(model = %self.inner.name, "overriding connection");

        Arc::make_mut(&mut self.inner).connection = Some(connection);
    }

    /// The database this model persists into.
    pub fn database(&self) -> &str {
        &self.inner.database
    }

    /// Points this model at another database.
    pub fn set_database(&mut self, database: impl Into<String>) {
        let inner = Arc::make_mut(&mut self.inner);
        inner.database = database.into();

        debug!(model = %inner.name, database = %inner.database, "overriding database");
    }

    /// The collection name this model persists into.
    pub fn collection_name(&self) -> &str {
        &self.inner.collection
    }

    /// Points this model at another collection.
    pub fn set_collection(&mut self, collection: impl Into<String>) {
        let inner = Arc::make_mut(&mut self.inner);
        inner.collection = collection.into();

        debug!(model = %inner.name, collection = %inner.collection, "overriding collection");
    }

    /// The namespace this model resolves to.
    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.database(), self.collection_name())
    }

    /// Resolves the store collection for this model.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] if neither the model nor
    /// the process-wide configuration provides a connection.
    pub fn collection(&self) -> DocumentStoreResult<Collection> {
        let connection = self.connection().ok_or_else(|| {
            DocumentStoreError::Initialization(format!("no connection configured for model {}", self.name()))
        })?;

        Ok(Collection::new(self.namespace(), connection))
    }

    /// Builds an unsaved document from `attributes`.
    ///
    /// Undeclared entries are dropped; declared ones are coerced.
    pub fn new_document(&self, attributes: BsonDocument) -> Document {
        Document::new(self.clone(), attributes)
    }

    /// Inserts a new document built from `attributes` and returns it.
    pub async fn create(&self, attributes: BsonDocument) -> DocumentStoreResult<Document> {
        let mut document = self.new_document(attributes);
        document.insert().await?;

        Ok(document)
    }

    /// Inserts one document per entry of `attributes`, returning them in input order.
    ///
    /// Documents inserted before a failure stay inserted.
    pub async fn create_many(&self, attributes: Vec<BsonDocument>) -> DocumentStoreResult<Vec<Document>> {
        let mut documents = Vec::with_capacity(attributes.len());

        for entry in attributes {
            documents.push(self.create(entry).await?);
        }

        Ok(documents)
    }

    /// Overwrites the given attributes of the stored document `id`.
    ///
    /// Attributes absent from `attributes` keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Argument`] if `id` is null or `attributes`
    /// is not a document, before touching the store, and
    /// [`DocumentStoreError::DocumentNotFound`] if `id` is not stored.
    pub async fn update(&self, id: impl Into<Bson>, attributes: impl Into<Bson>) -> DocumentStoreResult<Document> {
        let (id, attributes) = validate_update(id.into(), attributes.into())?;

        self.apply_update(id, attributes).await
    }

    /// Applies [`update`](Self::update) to every `(id, attributes)` pair, in order.
    ///
    /// Every pair is validated before the first one is applied. Updates applied
    /// before a store failure stay applied.
    pub async fn update_many<I, K, V>(&self, updates: I) -> DocumentStoreResult<Vec<Document>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Bson>,
        V: Into<Bson>,
    {
        let updates = updates
            .into_iter()
            .map(|(id, attributes)| validate_update(id.into(), attributes.into()))
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        let mut documents = Vec::with_capacity(updates.len());

        for (id, attributes) in updates {
            documents.push(self.apply_update(id, attributes).await?);
        }

        Ok(documents)
    }

    /// Finds the stored document `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] if it is not stored.
    pub async fn find(&self, id: impl Into<Bson>) -> DocumentStoreResult<Document> {
        let id = self.coerce_id(id.into());

        self.find_by_id(id.clone())
            .await?
            .ok_or_else(|| DocumentStoreError::DocumentNotFound(id.to_string(), self.collection_name().to_string()))
    }

    /// Finds the stored document `id`, or `None` if it is not stored.
    pub async fn find_by_id(&self, id: impl Into<Bson>) -> DocumentStoreResult<Option<Document>> {
        let id = self.coerce_id(id.into());

        Ok(self
            .collection()?
            .get(&id)
            .await?
            .map(|stored| self.load(stored)))
    }

    /// Counts the stored documents of this model.
    pub async fn count(&self) -> DocumentStoreResult<u64> {
        self.collection()?.count().await
    }

    /// Removes every stored document of this model.
    pub async fn clear(&self) -> DocumentStoreResult<()> {
        self.collection()?.clear().await
    }

    /// Deletes the stored document `id`.
    pub async fn delete(&self, id: impl Into<Bson>) -> DocumentStoreResult<()> {
        let id = self.coerce_id(id.into());

        self.collection()?.delete(&id).await
    }

    pub(crate) fn load(&self, stored: BsonDocument) -> Document {
        Document::new(self.clone(), stored)
    }

    fn coerce_id(&self, id: Bson) -> Bson {
        match self.inner.schema.get(ID_KEY) {
            Some(key) => key.coerce(id),
            None => id,
        }
    }

    async fn apply_update(&self, id: Bson, attributes: BsonDocument) -> DocumentStoreResult<Document> {
        let mut document = self.find(id).await?;
        document.update_attributes(attributes).await?;

        Ok(document)
    }
}

fn validate_update(id: Bson, attributes: Bson) -> DocumentStoreResult<(Bson, BsonDocument)> {
    if matches!(id, Bson::Null | Bson::Undefined) {
        return Err(DocumentStoreError::Argument("update requires a document id".to_string()));
    }

    match attributes {
        Bson::Document(attributes) => Ok((id, attributes)),
        Bson::Null | Bson::Undefined => Err(DocumentStoreError::Argument(format!(
            "update of {id} requires attributes"
        ))),
        other => Err(DocumentStoreError::Argument(format!(
            "update of {id} expects an attribute document, got {:?}",
            other.element_type()
        ))),
    }
}

/// Derives a collection name from a model name: snake case, pluralized.
pub fn tableize(name: &str) -> String {
    pluralize(&name.to_case(Case::Snake))
}

fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }

    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tableize_pluralizes_snake_case() {
        assert_eq!(tableize("User"), "users");
        assert_eq!(tableize("BlogPost"), "blog_posts");
        assert_eq!(tableize("Category"), "categories");
        assert_eq!(tableize("Day"), "days");
        assert_eq!(tableize("Box"), "boxes");
        assert_eq!(tableize("Match"), "matches");
    }

    #[test]
    fn models_have_distinct_identities() {
        let users = Model::new("User");
        let others = Model::new("User");

        assert!(users.is_same_model(&users.clone()));
        assert!(!users.is_same_model(&others));
    }

    #[test]
    fn declarations_keep_identity_and_leave_clones_untouched() {
        let mut users = Model::new("User");
        let before = users.clone();

        users.key("name", KeyType::String);

        assert!(users.is_same_model(&before));
        assert!(users.schema().contains("name"));
        assert!(!before.schema().contains("name"));
    }

    #[test]
    fn collection_overrides_are_per_model() {
        let mut users = Model::new("User");
        let people = Model::new("Person");

        users.set_collection("foobar");
        users.set_database("alternate");

        assert_eq!(users.collection_name(), "foobar");
        assert_eq!(users.database(), "alternate");
        assert_eq!(people.collection_name(), "persons");
        assert_ne!(people.database(), "alternate");
    }

    #[test]
    fn update_arguments_are_validated() {
        assert!(matches!(
            validate_update(Bson::Null, Bson::Document(BsonDocument::new())),
            Err(DocumentStoreError::Argument(_))
        ));
        assert!(matches!(
            validate_update(Bson::Int32(1), Bson::Null),
            Err(DocumentStoreError::Argument(_))
        ));
        assert!(matches!(
            validate_update(Bson::Int32(1), Bson::Array(vec![Bson::Int32(1)])),
            Err(DocumentStoreError::Argument(_))
        ));
        assert!(validate_update(Bson::Int32(1), Bson::Document(BsonDocument::new())).is_ok());
    }
}
