pub mod types;
pub mod filter_order;
pub mod params;
pub mod error;

pub use types::*;
pub use error::FilterError;
pub use params::{ListQuery, PaginationParams};
