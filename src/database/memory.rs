use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::store::{assign_id, strip_id, Collection, Document, DocumentStore};
use crate::filter::filter_order::FilterOrder;
use crate::filter::{DocumentFilter, FindOptions, SortDirection, SortField, SortSpec, ID_FIELD};

/// Process-local document store. Documents keep insertion order, which is
/// the natural order used to break sort ties.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();

        if let Some(spec) = &options.sort {
            // Stable sort keeps insertion order among equal keys
            matched.sort_by(|a, b| compare_documents(a, b, spec));
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError> {
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<String, DatabaseError> {
        let id = assign_id(&mut document);
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        check_unique(collection, docs, &document, None)?;
        docs.push(document);
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> Result<Vec<String>, DatabaseError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        // Validate the whole batch before touching the collection
        let mut staged: Vec<Document> = Vec::with_capacity(documents.len());
        let mut ids = Vec::with_capacity(documents.len());
        for mut document in documents {
            ids.push(assign_id(&mut document));
            check_unique(collection, docs, &document, None)?;
            check_unique(collection, &staged, &document, None)?;
            staged.push(document);
        }

        docs.extend(staged);
        Ok(ids)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        set: Document,
    ) -> Result<u64, DatabaseError> {
        let set = strip_id(set);
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let Some(index) = docs.iter().position(|d| filter.matches(d)) else {
            return Ok(0);
        };

        let mut updated = docs[index].clone();
        for (key, value) in set {
            updated.insert(key, value);
        }
        check_unique(collection, docs, &updated, Some(index))?;
        docs[index] = updated;
        Ok(1)
    }

    async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        let mut collections = self.collections.write().await;
        for collection in Collection::ALL {
            collections.entry(collection).or_default();
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {}
}

fn compare_documents(a: &Document, b: &Document, spec: &SortSpec) -> Ordering {
    let ordering = match &spec.field {
        SortField::Id => FilterOrder::compare_ids(a.get(ID_FIELD), b.get(ID_FIELD)),
        SortField::Field(name) => FilterOrder::compare_values(a.get(name), b.get(name)),
    };
    match spec.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn check_unique(
    collection: Collection,
    existing: &[Document],
    candidate: &Document,
    skip_index: Option<usize>,
) -> Result<(), DatabaseError> {
    for field in collection.unique_fields() {
        let Some(value) = candidate.get(*field).filter(|v| !v.is_null()) else {
            continue;
        };
        let clash = existing
            .iter()
            .enumerate()
            .any(|(i, doc)| Some(i) != skip_index && doc.get(*field) == Some(value));
        if clash {
            return Err(DatabaseError::Duplicate {
                collection: collection.name(),
                field: field.to_string(),
                value: display_value(value),
            });
        }
    }
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
