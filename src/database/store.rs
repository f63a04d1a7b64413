use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{DocumentFilter, FindOptions, ID_FIELD};

/// A stored record: a JSON object keyed by top-level field name
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Products,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Categories, Collection::Products, Collection::Users];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Products => "products",
            Collection::Users => "users",
        }
    }

    /// Fields that must be unique across the collection
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Categories | Collection::Products => &[ID_FIELD],
            Collection::Users => &[ID_FIELD, "email"],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Document database collaborator.
///
/// Implementations own their connection resources and are shared across
/// requests behind an `Arc`; any concurrency control is the backend's own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label for logs
    fn backend(&self) -> &'static str;

    async fn find(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, DatabaseError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
    ) -> Result<Option<Document>, DatabaseError> {
        let options = FindOptions {
            limit: Some(1),
            ..Default::default()
        };
        Ok(self.find(collection, filter, &options).await?.into_iter().next())
    }

    /// Number of documents matching `filter`; pagination never applies
    async fn count(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError>;

    /// Insert one document, assigning an identifier when it has none.
    /// Returns the stored identifier.
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<String, DatabaseError>;

    /// Insert all documents or none of them
    async fn insert_many(&self, collection: Collection, documents: Vec<Document>) -> Result<Vec<String>, DatabaseError>;

    /// Merge `set` into the first matching document. Returns the matched count.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        set: Document,
    ) -> Result<u64, DatabaseError>;

    /// Create collections and indexes; safe to call repeatedly
    async fn ensure_indexes(&self) -> Result<(), DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}

/// Ensure the document carries a non-empty string identifier and return it
pub fn assign_id(document: &mut Document) -> String {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => {
            let id = Uuid::new_v4().simple().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

/// Identifier is immutable once stored
pub fn strip_id(mut set: Document) -> Document {
    set.remove(ID_FIELD);
    set
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, DatabaseError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!(
            "expected a JSON object document, got {}",
            other
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, DatabaseError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
