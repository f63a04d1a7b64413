use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display hint for an attribute value. Not enforced against the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    Number,
    #[default]
    Text,
    Boolean,
    Tags,
    Url,
    /// Any type string outside the known set, kept verbatim
    Other(String),
}

impl AttributeType {
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::Number => "number",
            AttributeType::Text => "text",
            AttributeType::Boolean => "boolean",
            AttributeType::Tags => "tags",
            AttributeType::Url => "url",
            AttributeType::Other(s) => s,
        }
    }

    /// Whether `value` has the runtime shape this type suggests
    pub fn matches(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (AttributeType::Number, AttributeValue::Number(_)) => true,
            (AttributeType::Text | AttributeType::Url, AttributeValue::Text(_)) => true,
            (AttributeType::Boolean, AttributeValue::Bool(_)) => true,
            (AttributeType::Tags, AttributeValue::Tags(_)) => true,
            (AttributeType::Other(_), _) => true,
            _ => false,
        }
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "number" => AttributeType::Number,
            "text" => AttributeType::Text,
            "boolean" => AttributeType::Boolean,
            "tags" => AttributeType::Tags,
            "url" => AttributeType::Url,
            _ => AttributeType::Other(value),
        }
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        match value {
            AttributeType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Dynamically typed attribute value.
///
/// Deserialization tries each shape in order and falls back to `Other`, so
/// any JSON value is accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Tags(Vec<String>),
    Other(Value),
}

impl Default for AttributeValue {
    fn default() -> Self {
        AttributeValue::Other(Value::Null)
    }
}

/// One named, typed fact about a product. Order within a product is kept;
/// codes are not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub value: AttributeValue,
    #[serde(rename = "type", default)]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub label: String,
}

impl Attribute {
    pub fn is_consistent(&self) -> bool {
        self.attr_type.matches(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Attribute {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_every_value_shape() {
        let number = parse(json!({"code": "ram", "value": 16, "type": "number", "label": "RAM"}));
        assert!(matches!(number.value, AttributeValue::Number(_)));

        let text = parse(json!({"code": "brand", "value": "Acme", "type": "text", "label": "Brand"}));
        assert_eq!(text.value, AttributeValue::Text("Acme".into()));

        let flag = parse(json!({"code": "5g", "value": true, "type": "boolean", "label": "5G"}));
        assert_eq!(flag.value, AttributeValue::Bool(true));

        let tags = parse(json!({"code": "colors", "value": ["red", "blue"], "type": "tags", "label": "Colors"}));
        assert_eq!(tags.value, AttributeValue::Tags(vec!["red".into(), "blue".into()]));

        let mixed = parse(json!({"code": "odd", "value": [1, "a"], "type": "tags", "label": "Odd"}));
        assert_eq!(mixed.value, AttributeValue::Other(json!([1, "a"])));
    }

    #[test]
    fn serialization_is_a_structural_passthrough() {
        let raw = json!({"code": "weight", "value": 1.25, "type": "number", "label": "Weight (kg)"});
        let attr = parse(raw.clone());
        assert_eq!(serde_json::to_value(&attr).unwrap(), raw);

        let raw = json!({"code": "meta", "value": {"nested": [1, 2]}, "type": "json", "label": "Meta"});
        let attr = parse(raw.clone());
        assert_eq!(attr.attr_type, AttributeType::Other("json".into()));
        assert_eq!(serde_json::to_value(&attr).unwrap(), raw);
    }

    #[test]
    fn type_is_not_enforced_against_value() {
        let attr = parse(json!({"code": "ram", "value": "sixteen", "type": "number", "label": "RAM"}));
        assert!(!attr.is_consistent());

        let attr = parse(json!({"code": "site", "value": "https://acme.io", "type": "url", "label": "Site"}));
        assert!(attr.is_consistent());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let attr = parse(json!({"code": "x"}));
        assert_eq!(attr.attr_type, AttributeType::Text);
        assert_eq!(attr.value, AttributeValue::Other(Value::Null));
        assert_eq!(attr.label, "");
    }
}
