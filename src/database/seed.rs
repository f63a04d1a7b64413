use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Category, Product, User};
use crate::database::repository::Repository;
use crate::database::store::Collection;
use crate::filter::DocumentFilter;

const SAMPLE_DATA: &str = include_str!("seed_data.json");

/// Default records inserted into empty collections
#[derive(Debug, Clone, Deserialize)]
pub struct SampleData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl SampleData {
    pub fn builtin() -> Result<Self, DatabaseError> {
        Ok(serde_json::from_str(SAMPLE_DATA)?)
    }
}

/// Number of records inserted per collection by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub users: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.categories == 0 && self.products == 0 && self.users == 0
    }
}

/// Create indexes, then seed the built-in sample data
pub async fn initialize(db: &DatabaseManager) -> Result<SeedReport, DatabaseError> {
    db.ensure_indexes().await?;
    seed(db, &SampleData::builtin()?).await
}

/// Insert sample records into every collection that is currently empty.
/// Collections holding any data are left untouched, so reruns are no-ops.
pub async fn seed(db: &DatabaseManager, data: &SampleData) -> Result<SeedReport, DatabaseError> {
    let report = SeedReport {
        categories: seed_collection(db, Collection::Categories, &data.categories).await?,
        products: seed_collection(db, Collection::Products, &data.products).await?,
        users: seed_collection(db, Collection::Users, &data.users).await?,
    };

    if report.is_empty() {
        info!("Database already initialized");
    } else {
        let roots = data.categories.iter().filter(|c| c.is_root()).count();
        info!(
            "Seeded {} categories ({} roots), {} products, {} users",
            report.categories, roots, report.products, report.users
        );
    }
    Ok(report)
}

async fn seed_collection<T>(db: &DatabaseManager, collection: Collection, records: &[T]) -> Result<usize, DatabaseError>
where
    T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    if records.is_empty() {
        return Ok(0);
    }

    let repo = Repository::<T>::new(collection, db);
    if repo.count(DocumentFilter::new()).await? > 0 {
        return Ok(0);
    }

    let ids = repo.insert_all(records).await?;
    info!("{} initialized successfully", collection);
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sample_data_parses() {
        let data = SampleData::builtin().unwrap();
        assert_eq!(data.users.len(), 2);
        assert_eq!(data.categories.len(), 10);
        assert!(!data.products.is_empty());
        assert!(data.users.iter().any(|u| u.email == "admin@gmail.com" && u.role == "admin"));
    }

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let db = DatabaseManager::in_memory();

        let first = initialize(&db).await.unwrap();
        assert_eq!(first.categories, 10);
        assert_eq!(first.users, 2);

        let second = initialize(&db).await.unwrap();
        assert!(second.is_empty());

        let all = DocumentFilter::new();
        assert_eq!(db.count(Collection::Categories, &all).await.unwrap(), 10);
        assert_eq!(db.count(Collection::Users, &all).await.unwrap(), 2);
        assert_eq!(
            db.count(Collection::Products, &all).await.unwrap() as usize,
            first.products
        );
    }

    #[tokio::test]
    async fn only_empty_collections_are_seeded() {
        let db = DatabaseManager::in_memory();
        let existing = Category {
            id: "99".into(),
            name: "Toys".into(),
            parent_id: None,
        };
        Repository::<Category>::new(Collection::Categories, &db)
            .insert(&existing)
            .await
            .unwrap();

        let report = initialize(&db).await.unwrap();
        assert_eq!(report.categories, 0);
        assert_eq!(report.users, 2);
        assert_eq!(
            db.count(Collection::Categories, &DocumentFilter::new()).await.unwrap(),
            1
        );
    }
}
