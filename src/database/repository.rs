use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{to_document, Collection};
use crate::filter::DocumentFilter;

/// Typed access to one collection
pub struct Repository<T> {
    collection: Collection,
    db: DatabaseManager,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: DeserializeOwned + Serialize + Send,
{
    pub fn new(collection: Collection, db: &DatabaseManager) -> Self {
        Self {
            collection,
            db: db.clone(),
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn query(&self) -> QueryBuilder<T> {
        QueryBuilder::new(self.collection)
    }

    pub async fn select_any(&self, filter: DocumentFilter) -> Result<Vec<T>, DatabaseError> {
        self.query().filter(filter).select_all(&self.db).await
    }

    pub async fn select_one(&self, filter: DocumentFilter) -> Result<Option<T>, DatabaseError> {
        self.query().filter(filter).select_optional(&self.db).await
    }

    /// Like `select_one`, but absence is a `NotFound` carrying `message`
    pub async fn select_404(&self, filter: DocumentFilter, message: &str) -> Result<T, DatabaseError> {
        self.select_one(filter)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(message.to_string()))
    }

    pub async fn count(&self, filter: DocumentFilter) -> Result<u64, DatabaseError> {
        self.query().filter(filter).count(&self.db).await
    }

    /// Store a record and return its identifier
    pub async fn insert<R: Serialize>(&self, record: &R) -> Result<String, DatabaseError> {
        self.db.insert_one(self.collection, to_document(record)?).await
    }

    pub async fn insert_all<R: Serialize>(&self, records: &[R]) -> Result<Vec<String>, DatabaseError> {
        let documents = records.iter().map(to_document).collect::<Result<Vec<_>, _>>()?;
        self.db.insert_many(self.collection, documents).await
    }

    /// Replace the given fields of the record with `id`. Returns whether it existed.
    pub async fn update_by_id<R: Serialize>(&self, id: &str, fields: &R) -> Result<bool, DatabaseError> {
        let matched = self
            .db
            .update_one(self.collection, &DocumentFilter::by_id(id), to_document(fields)?)
            .await?;
        Ok(matched > 0)
    }
}
