//! Typed fields
//!
//! [`Field`] converts between a Rust type and a document [`Value`]. Every
//! encoder and decoder is assembled from these conversions through
//! [`Document::put`] and [`Document::get`].

use std::collections::BTreeMap;

use crate::error::Result;
use crate::object::{InstanceId, Location, ObjectId, PayloadBlock};
use crate::status::{Status, StatusCode};
use super::document::{Document, Value};

/// A type that can be stored in a document field
pub trait Field: Sized {
    /// Name used in `TypeMismatch` errors
    const EXPECTED: &'static str;

    fn to_value(&self) -> Value;

    /// `None` when `value` is not a valid `Self`
    fn from_value(value: &Value) -> Option<Self>;
}

// =============================================================================
// Scalars
// =============================================================================

impl Field for Value {
    const EXPECTED: &'static str = "value";

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Field for String {
    const EXPECTED: &'static str = "string";

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Field for bool {
    const EXPECTED: &'static str = "boolean";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl Field for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| u64::try_from(n).ok())
    }
}

impl Field for i64 {
    const EXPECTED: &'static str = "integer";

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| i64::try_from(n).ok())
    }
}

impl Field for usize {
    const EXPECTED: &'static str = "unsigned integer";

    fn to_value(&self) -> Value {
        Value::Int(*self as i128)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| usize::try_from(n).ok())
    }
}

// =============================================================================
// Identifiers
// =============================================================================

impl Field for ObjectId {
    const EXPECTED: &'static str = "object id";

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl Field for InstanceId {
    const EXPECTED: &'static str = "instance id";

    fn to_value(&self) -> Value {
        Value::from(self.raw())
    }

    fn from_value(value: &Value) -> Option<Self> {
        u64::from_value(value).map(InstanceId::new)
    }
}

// =============================================================================
// Collections
// =============================================================================

impl<T: Field> Field for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Field::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

impl Field for Document {
    const EXPECTED: &'static str = "document";

    fn to_value(&self) -> Value {
        Value::Map(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_document().cloned()
    }
}

/// Maps keyed by object id are written as documents keyed by the id's text form
impl<T: Field> Field for BTreeMap<ObjectId, T> {
    const EXPECTED: &'static str = "map of object ids";

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(id, v)| (id.to_string(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_document()?
            .iter()
            .map(|(k, v)| Some((k.parse::<ObjectId>().ok()?, T::from_value(v)?)))
            .collect()
    }
}

// =============================================================================
// Buffers
// =============================================================================

impl Field for Location {
    const EXPECTED: &'static str = "location";

    fn to_value(&self) -> Value {
        let mut doc = Document::new();
        doc.put("segment", &self.segment);
        doc.put("offset", &self.offset);
        doc.put("map_size", &self.map_size);
        Value::Map(doc)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let doc = value.as_document()?;
        Some(Location {
            segment: doc.get("segment").ok()?,
            offset: doc.get("offset").ok()?,
            map_size: doc.get("map_size").ok()?,
        })
    }
}

impl Field for PayloadBlock {
    const EXPECTED: &'static str = "payload block";

    fn to_value(&self) -> Value {
        let mut doc = Document::new();
        doc.put("object_id", &self.object_id);
        doc.put("size", &self.size);
        doc.put("location", &self.location);
        Value::Map(doc)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let doc = value.as_document()?;
        Some(PayloadBlock {
            object_id: doc.get("object_id").ok()?,
            size: doc.get("size").ok()?,
            location: doc.get("location").ok()?,
        })
    }
}

// =============================================================================
// Status
// =============================================================================

/// Status as a `{code, message}` document, the same pair an error reply carries
impl Field for Status {
    const EXPECTED: &'static str = "status";

    fn to_value(&self) -> Value {
        let mut doc = Document::new();
        write_status(&mut doc, self);
        Value::Map(doc)
    }

    fn from_value(value: &Value) -> Option<Self> {
        read_status(value.as_document()?).ok()
    }
}

pub(crate) fn write_status(doc: &mut Document, status: &Status) {
    doc.put("code", &status.code().code());
    doc.put("message", &status.message().to_string());
}

pub(crate) fn read_status(doc: &Document) -> Result<Status> {
    let code: i64 = doc.get("code")?;
    let message: String = doc.get("message")?;
    Ok(Status::new(StatusCode::from_code(code), message))
}
