//! Self-describing documents
//!
//! Every message is a [`Document`]: an ordered map from field name to
//! [`Value`]. This is the only module that knows the text representation is
//! JSON; encoders and decoders work purely in terms of `Document`.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{Result, WireError};
use super::field::Field;

/// Maximum accepted message size (64 MB)
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Deepest nesting a message may carry, counting the message itself as level 1
///
/// Lists and documents each add a level. The JSON parser's own recursion
/// limit sits above this, so anything within it parses.
pub const MAX_DEPTH: usize = 64;

/// Field carrying the operation name of every message
pub const TYPE_FIELD: &str = "type";

/// A schema-free value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Covers the full range of both `i64` and `u64`
    Int(i128),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Document),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Map(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n as i128)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Int(n as i128)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Map(doc)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Ordered string-keyed map of values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a message document tagged with an operation name
    pub fn tagged(name: &str) -> Self {
        let mut doc = Self::new();
        doc.insert(TYPE_FIELD, name);
        doc
    }

    // =========================================================================
    // Raw access
    // =========================================================================

    /// Set a raw value; overwrites any previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    // =========================================================================
    // Typed access
    // =========================================================================

    /// Write a typed field; overwrites any previous value for `key`
    pub fn put<T: Field>(&mut self, key: &str, value: &T) {
        self.fields.insert(key.to_string(), value.to_value());
    }

    /// Read a typed field
    ///
    /// Fails with `MissingField` when absent and `TypeMismatch` when present
    /// but not convertible to `T`.
    pub fn get<T: Field>(&self, key: &str) -> Result<T> {
        let value = self
            .fields
            .get(key)
            .ok_or_else(|| WireError::MissingField(key.to_string()))?;

        T::from_value(value).ok_or_else(|| WireError::TypeMismatch {
            field: key.to_string(),
            expected: T::EXPECTED,
        })
    }

    /// Read a typed field, using `default` only when the field is absent
    pub fn get_or<T: Field>(&self, key: &str, default: T) -> Result<T> {
        if self.fields.contains_key(key) {
            self.get(key)
        } else {
            Ok(default)
        }
    }

    /// The message's operation name
    pub fn type_tag(&self) -> Result<&str> {
        match self.fields.get(TYPE_FIELD) {
            Some(Value::String(name)) => Ok(name),
            Some(_) => Err(WireError::Protocol(
                "'type' field is not a string".to_string(),
            )),
            None => Err(WireError::Protocol(
                "message has no 'type' field".to_string(),
            )),
        }
    }

    /// Fail with `Protocol` if the document nests deeper than [`MAX_DEPTH`]
    pub fn check_depth(&self) -> Result<()> {
        if map_within(self, MAX_DEPTH) {
            Ok(())
        } else {
            Err(WireError::Protocol(format!(
                "document nested deeper than {} levels",
                MAX_DEPTH
            )))
        }
    }

    // =========================================================================
    // Text form
    // =========================================================================

    /// Serialize to compact JSON text
    pub fn to_wire(&self) -> String {
        serde_json::Value::from(self).to_string()
    }

    /// Serialize to indented JSON text
    pub fn to_pretty(&self) -> String {
        format!("{:#}", serde_json::Value::from(self))
    }

    /// Parse JSON text, refusing anything over [`MAX_MESSAGE_SIZE`]
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with_limit(raw, MAX_MESSAGE_SIZE)
    }

    /// Parse JSON text, refusing anything over `max_size` bytes
    pub fn parse_with_limit(raw: &str, max_size: usize) -> Result<Self> {
        if raw.len() > max_size {
            return Err(WireError::MessageTooLarge {
                size: raw.len(),
                max: max_size,
            });
        }

        let json: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| WireError::Protocol(format!("malformed document: {}", e)))?;

        let doc = match Value::from(json) {
            Value::Map(doc) => doc,
            _ => {
                return Err(WireError::Protocol(
                    "message is not a key-value document".to_string(),
                ))
            }
        };
        doc.check_depth()?;
        Ok(doc)
    }
}

/// Whether `doc` fits in `levels`; never descends further than that
fn map_within(doc: &Document, levels: usize) -> bool {
    levels > 0 && doc.fields.values().all(|v| value_within(v, levels - 1))
}

fn value_within(value: &Value, levels: usize) -> bool {
    match value {
        Value::Map(doc) => map_within(doc, levels),
        Value::List(items) => levels > 0 && items.iter().all(|v| value_within(v, levels - 1)),
        _ => true,
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// =============================================================================
// JSON conversion
// =============================================================================

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i as i128)
                } else if let Some(u) = n.as_u64() {
                    Value::Int(u as i128)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => {
                if let Ok(i) = i64::try_from(*n) {
                    serde_json::Value::from(i)
                } else if let Ok(u) = u64::try_from(*n) {
                    serde_json::Value::from(u)
                } else {
                    // Outside both 64-bit ranges: only a float can carry it
                    float_to_json(*n as f64)
                }
            }
            Value::Float(f) => float_to_json(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(doc) => serde_json::Value::from(doc),
        }
    }
}

impl From<&Document> for serde_json::Value {
    fn from(doc: &Document) -> Self {
        serde_json::Value::Object(
            doc.fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }
}

/// Non-finite floats have no JSON form and are written as null
fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
