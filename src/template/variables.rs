//! Variable binding for template execution

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Map, Value};

/// Variables a template is rendered against.
///
/// Callers pick exactly one shape per render; both bind to the same
/// compiled template.
#[derive(Debug, Clone, PartialEq)]
pub enum Variables {
    /// Structured JSON document
    Document(Value),
    /// Flat string-keyed mapping
    Mapping(HashMap<String, Value>),
}

impl Variables {
    /// Present the variables in the shape the expression engine executes against
    pub fn bind(&self) -> Cow<'_, Value> {
        match self {
            Variables::Document(document) => Cow::Borrowed(document),
            Variables::Mapping(mapping) => {
                let object: Map<String, Value> = mapping
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                Cow::Owned(Value::Object(object))
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Variables::Document(Value::Object(map)) => map.is_empty(),
            Variables::Document(Value::Null) => true,
            Variables::Document(_) => false,
            Variables::Mapping(mapping) => mapping.is_empty(),
        }
    }

    /// Shape label used in logs
    pub fn shape(&self) -> &'static str {
        match self {
            Variables::Document(_) => "document",
            Variables::Mapping(_) => "mapping",
        }
    }
}

impl From<Value> for Variables {
    fn from(document: Value) -> Self {
        Variables::Document(document)
    }
}

impl From<Map<String, Value>> for Variables {
    fn from(object: Map<String, Value>) -> Self {
        Variables::Document(Value::Object(object))
    }
}

impl From<HashMap<String, Value>> for Variables {
    fn from(mapping: HashMap<String, Value>) -> Self {
        Variables::Mapping(mapping)
    }
}

impl From<HashMap<String, String>> for Variables {
    fn from(mapping: HashMap<String, String>) -> Self {
        Variables::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_binds_without_copy() {
        let variables = Variables::from(json!({"title": "My Blog"}));
        assert!(matches!(variables.bind(), Cow::Borrowed(_)));
        assert_eq!(variables.bind().as_ref(), &json!({"title": "My Blog"}));
    }

    #[test]
    fn test_mapping_binds_to_object() {
        let mut mapping = HashMap::new();
        mapping.insert("title".to_string(), json!("My Blog"));
        mapping.insert("count".to_string(), json!(3));

        let variables = Variables::from(mapping);
        assert_eq!(
            variables.bind().into_owned(),
            json!({"title": "My Blog", "count": 3})
        );
    }

    #[test]
    fn test_string_mapping() {
        let mut mapping = HashMap::new();
        mapping.insert("greeting".to_string(), "Hello John!".to_string());

        let variables = Variables::from(mapping);
        assert_eq!(variables.shape(), "mapping");
        assert_eq!(
            variables.bind().into_owned(),
            json!({"greeting": "Hello John!"})
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(Variables::from(json!({})).is_empty());
        assert!(Variables::from(HashMap::<String, Value>::new()).is_empty());
        assert!(!Variables::from(json!({"a": 1})).is_empty());
        assert!(!Variables::from(json!([1, 2])).is_empty());
    }
}
