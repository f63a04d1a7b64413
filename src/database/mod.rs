pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod seed;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{Page, QueryBuilder};
pub use repository::Repository;
pub use store::{Collection, Document, DocumentStore};
