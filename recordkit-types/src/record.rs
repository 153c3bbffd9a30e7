use crate::ids::RecordId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque key/value bag stored in the remote container.
///
/// The container owns the encoding of `fields`; RecordKit only moves
/// records across the boundary. The metadata fields (`created_at`,
/// `modified_at`, `change_tag`) are assigned by the container on save and
/// are ignored when a record is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub record_type: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Last modification time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_tag: Option<String>,
}

impl Record {
    /// Creates an empty record of the given type.
    pub fn new(id: RecordId, record_type: impl Into<String>) -> Self {
        Self {
            id,
            record_type: record_type.into(),
            fields: Map::new(),
            created_at: None,
            modified_at: None,
            change_tag: None,
        }
    }

    /// Builds a record whose fields are the serialized form of `value`.
    ///
    /// `value` must serialize to a JSON object.
    pub fn from_serializable<T: Serialize>(
        id: RecordId,
        record_type: impl Into<String>,
        value: &T,
    ) -> crate::Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self {
                fields,
                ..Self::new(id, record_type)
            }),
            other => Err(crate::Error::NotAnObject(json_kind(&other))),
        }
    }

    /// Deserializes the record's fields into `T`.
    pub fn deserialize_fields<T: DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    /// Sets a field, returning the record for chaining.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Returns true if `other` carries the same identity, type and fields,
    /// ignoring container-assigned metadata.
    #[must_use]
    pub fn same_content(&self, other: &Record) -> bool {
        self.id == other.id && self.record_type == other.record_type && self.fields == other.fields
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
