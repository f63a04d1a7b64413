pub mod attribute;
pub mod category;
pub mod product;
pub mod user;

pub use attribute::{Attribute, AttributeType, AttributeValue};
pub use category::Category;
pub use product::{Product, ProductInput, ProductsResponse};
pub use user::{User, UserResponse};
