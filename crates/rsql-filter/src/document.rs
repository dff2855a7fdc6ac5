//! Native filter documents.

use serde::Serialize;
use serde_json::{Map, Value};

/// A filter document: field name to a single-key clause object.
///
/// Serializes as the plain JSON object a document-store driver expects, e.g.
/// `{"age": {"$gt": "30"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterDocument(Map<String, Value>);

impl FilterDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clause for `field`, replacing any earlier clause.
    ///
    /// Returns the replaced clause, if any.
    pub fn insert_clause(
        &mut self,
        field: impl Into<String>,
        keyword: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        let mut clause = Map::with_capacity(1);
        clause.insert(keyword.into(), value);
        self.0.insert(field.into(), Value::Object(clause))
    }

    /// Returns the clause for `field`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Number of fields with a clause.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field has a clause.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, clause)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying JSON map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Converts the document into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Renders the document as compact JSON text.
    pub fn to_json_string(&self) -> String {
        // String-keyed JSON maps always serialize.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl From<FilterDocument> for Value {
    fn from(document: FilterDocument) -> Self {
        document.into_value()
    }
}
