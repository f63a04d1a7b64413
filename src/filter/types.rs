use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logical identifier field shared by every collection
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact string "desc" sorts descending
    pub fn from_param(value: &str) -> Self {
        if value == "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sort key after alias resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortField {
    /// The identifier, compared exactly
    Id,
    /// Any other top-level document field
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Conjunction of top-level equality conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    conditions: Vec<(String, Value)>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().eq(ID_FIELD, Value::String(id.into()))
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Adds an equality condition only when a non-empty value is present.
    /// Empty strings mean "no filter", never "match empty".
    pub fn eq_opt(self, field: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.eq(field, v),
            _ => self,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn matches(&self, document: &serde_json::Map<String, Value>) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<SortSpec>,
    pub skip: u64,
    pub limit: Option<u64>,
}
