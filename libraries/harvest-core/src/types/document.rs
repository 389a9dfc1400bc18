//! Document store boundary types

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collection holding one profile document per account, keyed by uid
pub const USERS_COLLECTION: &str = "users";

/// Collection holding crop listings
pub const CROPS_COLLECTION: &str = "crops";

/// A document snapshot: store-assigned id plus its field map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned id (last path segment)
    pub id: String,
    /// Document fields
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Build a document from an id and a JSON object.
    ///
    /// Non-object values produce a document with no fields.
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a single field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Decode the field map into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// Comparison operator for a query predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOp {
    /// Field equals value
    Equal,
}

/// One conjunctive query predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Field name
    pub field: String,
    /// Operator
    pub op: FilterOp,
    /// Value compared against
    pub value: Value,
}

impl FieldFilter {
    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Equal,
            value: value.into(),
        }
    }

    /// Evaluate the predicate against a document
    pub fn matches(&self, doc: &Document) -> bool {
        match self.op {
            FilterOp::Equal => doc.field(&self.field) == Some(&self.value),
        }
    }
}
