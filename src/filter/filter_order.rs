use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::types::{SortDirection, SortField, SortSpec, ID_FIELD};

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve a client-supplied sort field. `id` and `_id` both alias the identifier.
    pub fn parse_field(name: &str) -> Result<SortField, FilterError> {
        let name = name.trim();
        if name == ID_FIELD || name == "_id" {
            return Ok(SortField::Id);
        }
        if !is_valid_field_name(name) {
            return Err(FilterError::InvalidSortField(name.to_string()));
        }
        Ok(SortField::Field(name.to_string()))
    }

    /// Build a sort spec, or nothing when no field was requested
    pub fn validate_and_parse(
        field: Option<&str>,
        direction: SortDirection,
    ) -> Result<Option<SortSpec>, FilterError> {
        match field {
            Some(f) if !f.trim().is_empty() => Ok(Some(SortSpec {
                field: Self::parse_field(f)?,
                direction,
            })),
            _ => Ok(None),
        }
    }

    /// Ascending comparison of two document values.
    ///
    /// Missing and null sort first, then numbers, strings, objects, arrays and
    /// booleans. Strings compare case-insensitively so "apple" and "Apple"
    /// are equal keys.
    pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let (ra, rb) = (type_rank(a), type_rank(b));
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (a, b) {
            (Some(Value::Number(x)), Some(Value::Number(y))) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Some(Value::String(x)), Some(Value::String(y))) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }

    /// Identifier comparison is exact
    pub fn compare_ids(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a.and_then(Value::as_str), b.and_then(Value::as_str)) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => Self::compare_values(a, b),
        }
    }
}

/// Letters, digits and underscore; must not start with a digit
pub fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}
