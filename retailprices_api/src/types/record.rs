use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single price item as returned by the API.
///
/// The field set varies between services and API versions, so records stay
/// an untyped JSON object. Lookups of absent fields return `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Display text of `field`, or `None` when the record does not have it.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(display_value)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Renders a JSON value as plain cell text. Strings lose their quotes,
/// numbers and booleans print as-is, null is empty. Nested values fall back
/// to compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
