use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{DatabaseConfig, StoreBackend};
use crate::database::memory::MemoryDocumentStore;
use crate::database::postgres::PgDocumentStore;
use crate::database::store::{Collection, Document, DocumentStore};
use crate::filter::{DocumentFilter, FindOptions};

/// Errors from the document store and the code that drives it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate {field} '{value}' in {collection}")]
    Duplicate {
        collection: &'static str,
        field: String,
        value: String,
    },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Document encoding error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Explicitly constructed store client shared by every handler.
///
/// Cloning is cheap; all clones talk to the same backend. Each call is
/// bounded by `operation_timeout` and is never retried.
#[derive(Clone)]
pub struct DatabaseManager {
    store: Arc<dyn DocumentStore>,
    operation_timeout: Duration,
    slow_threshold: Option<Duration>,
}

impl DatabaseManager {
    pub fn new(store: Arc<dyn DocumentStore>, config: &DatabaseConfig) -> Self {
        Self {
            store,
            operation_timeout: config.operation_timeout(),
            slow_threshold: config.slow_query_threshold(),
        }
    }

    /// Fresh in-memory store with development timeouts
    pub fn in_memory() -> Self {
        let config = crate::config::AppConfig::in_memory().database;
        Self::new(Arc::new(MemoryDocumentStore::new()), &config)
    }

    /// Open the configured backend. Connection failures are fatal to the caller.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let store: Arc<dyn DocumentStore> = match config.backend {
            StoreBackend::Postgres => Arc::new(PgDocumentStore::connect(config).await?),
            StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        };
        info!("Connected to {} document store", store.backend());
        Ok(Self::new(store, config))
    }

    /// Same store, different per-operation bound (startup work runs longer)
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            operation_timeout: timeout,
            ..self.clone()
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn find(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, DatabaseError> {
        self.timed("find", collection, self.store.find(collection, filter, options))
            .await
    }

    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
    ) -> Result<Option<Document>, DatabaseError> {
        self.timed("find_one", collection, self.store.find_one(collection, filter))
            .await
    }

    pub async fn count(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError> {
        self.timed("count", collection, self.store.count(collection, filter))
            .await
    }

    pub async fn insert_one(&self, collection: Collection, document: Document) -> Result<String, DatabaseError> {
        self.timed("insert_one", collection, self.store.insert_one(collection, document))
            .await
    }

    pub async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> Result<Vec<String>, DatabaseError> {
        self.timed("insert_many", collection, self.store.insert_many(collection, documents))
            .await
    }

    pub async fn update_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        set: Document,
    ) -> Result<u64, DatabaseError> {
        self.timed("update_one", collection, self.store.update_one(collection, filter, set))
            .await
    }

    pub async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        let started = Instant::now();
        match tokio::time::timeout(self.operation_timeout, self.store.ensure_indexes()).await {
            Ok(result) => {
                result?;
                info!("Indexes ensured in {:?}", started.elapsed());
                Ok(())
            }
            Err(_) => Err(self.timeout_error("ensure_indexes")),
        }
    }

    /// Release backend resources (e.g., on shutdown)
    pub async fn close(&self) {
        self.store.close().await;
        info!("Closed {} document store", self.store.backend());
    }

    async fn timed<T, F>(&self, operation: &'static str, collection: Collection, fut: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, DatabaseError>>,
    {
        let started = Instant::now();
        let result = tokio::time::timeout(self.operation_timeout, fut).await;
        let elapsed = started.elapsed();

        if let Some(threshold) = self.slow_threshold {
            if elapsed > threshold {
                warn!("Slow {} on {}: {:?} (threshold {:?})", operation, collection, elapsed, threshold);
            }
        }

        match result {
            Ok(inner) => inner,
            Err(_) => {
                warn!("{} on {} timed out after {:?}", operation, collection, self.operation_timeout);
                Err(self.timeout_error(operation))
            }
        }
    }

    fn timeout_error(&self, operation: &'static str) -> DatabaseError {
        DatabaseError::Timeout {
            operation,
            after: self.operation_timeout,
        }
    }
}

/// Swap the database name into the URL path, keeping credentials and query
pub fn build_connection_string(base: &str, database_name: &str) -> Result<String, DatabaseError> {
    let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.cannot_be_a_base() {
        return Err(DatabaseError::InvalidDatabaseUrl);
    }
    url.set_path(&format!("/{}", database_name));
    Ok(url.into())
}
