use serde::{Deserialize, Serialize};

use super::attribute::Attribute;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category_id: String,
    #[serde(default)]
    pub category_group: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Client-supplied product fields for create and full replace.
/// Any `id` in the body is ignored; the path or the store decides it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub category_group: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl ProductInput {
    /// Names of required fields that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.category_id.trim().is_empty() {
            missing.push("category_id");
        }
        missing
    }

    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            category_id: self.category_id,
            category_group: self.category_group,
            attributes: self.attributes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub total: u64,
}
