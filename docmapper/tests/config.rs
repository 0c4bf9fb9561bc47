use bson::doc;
use docmapper::{memory::InMemoryStore, prelude::*};

// The process-wide defaults are shared by every test in a binary, so this
// file holds a single test.
#[tokio::test]
async fn models_bind_to_process_wide_defaults() {
    let mut early = Model::new("Early");
    early.key("name", KeyType::String);
    assert_eq!(early.connection(), None);
    assert_eq!(early.database(), config::DEFAULT_DATABASE);

    let connection = Connection::new(InMemoryStore::new());
    config::init(
        connection.clone(),
        Settings::from_json(serde_json::json!({ "database": "app" })).unwrap(),
    );

    // composed before a default existed: the connection falls back, the database does not
    assert_eq!(early.connection(), Some(connection.clone()));
    assert_eq!(early.database(), config::DEFAULT_DATABASE);

    let mut users = Model::new("User");
    users.key("name", KeyType::String);
    assert_eq!(users.connection(), Some(connection.clone()));
    assert_eq!(users.database(), "app");

    let john = users.create(doc! { "name": "John" }).await.unwrap();
    assert_eq!(users.count().await.unwrap(), 1);
    assert_eq!(users.find(john.id().cloned().unwrap()).await.unwrap(), john);

    let mut isolated = Model::new("User");
    isolated.set_connection(Connection::new(InMemoryStore::new()));
    isolated.set_database("other");
    assert_eq!(isolated.count().await.unwrap(), 0);
    assert_eq!(config::connection(), Some(connection.clone()));
    assert_eq!(config::database(), "app");

    config::set_database("changed");
    assert_eq!(users.database(), "app");
    assert_eq!(Model::new("User").database(), "changed");

    config::reset();
    assert_eq!(config::connection(), None);
    assert_eq!(config::database(), config::DEFAULT_DATABASE);
    assert_eq!(users.connection(), Some(connection));
}
