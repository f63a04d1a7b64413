use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::store::{from_document, Collection};
use crate::filter::{DocumentFilter, FilterError, FindOptions, PaginationParams, SortDirection, SortSpec};
use crate::filter::filter_order::FilterOrder;

/// One page of results with the unpaginated match count
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Builds a filtered, sorted, paginated read against one collection
pub struct QueryBuilder<T> {
    collection: Collection,
    filter: DocumentFilter,
    sort: Option<SortSpec>,
    skip: u64,
    limit: Option<u64>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: DeserializeOwned + Send,
{
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filter: DocumentFilter::new(),
            sort: None,
            skip: 0,
            limit: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Normalized list request: category filters, sort and offset window
    pub fn from_params(collection: Collection, params: &PaginationParams) -> Result<Self, FilterError> {
        Ok(Self::new(collection)
            .where_eq("category_id", params.category_id.as_deref())
            .where_eq("category_group", params.category_group.as_deref())
            .order(params.sort_field.as_deref(), params.sort_order)?
            .page(params.start, params.limit))
    }

    /// Equality condition; absent or empty values add nothing
    pub fn where_eq(mut self, field: &str, value: Option<&str>) -> Self {
        self.filter = self.filter.eq_opt(field, value);
        self
    }

    pub fn filter(mut self, filter: DocumentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order(mut self, field: Option<&str>, direction: SortDirection) -> Result<Self, FilterError> {
        self.sort = FilterOrder::validate_and_parse(field, direction)?;
        Ok(self)
    }

    pub fn page(mut self, start: u64, limit: u64) -> Self {
        self.skip = start;
        self.limit = Some(limit);
        self
    }

    fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: self.sort.clone(),
            skip: self.skip,
            limit: self.limit,
        }
    }

    pub async fn select_all(&self, db: &DatabaseManager) -> Result<Vec<T>, DatabaseError> {
        let documents = db
            .find(self.collection, &self.filter, &self.find_options())
            .await?;
        documents.into_iter().map(from_document).collect()
    }

    pub async fn select_optional(&self, db: &DatabaseManager) -> Result<Option<T>, DatabaseError> {
        db.find_one(self.collection, &self.filter)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Counts the filter only; sort and pagination never affect the total
    pub async fn count(&self, db: &DatabaseManager) -> Result<u64, DatabaseError> {
        db.count(self.collection, &self.filter).await
    }

    /// Count first, then fetch the requested window
    pub async fn select_page(&self, db: &DatabaseManager) -> Result<Page<T>, DatabaseError> {
        let total = self.count(db).await?;
        let items = self.select_all(db).await?;
        Ok(Page { items, total })
    }
}
