// ============================================================================
// Document Domain Model
// ============================================================================

use std::fmt;

use smallvec::SmallVec;
use uuid::Uuid;

use crate::numeric::{Decimal128, NumericValue};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value stored under a document field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldValue {
    Null,
    Bool(bool),
    String(String),
    Number(NumericValue),
}

impl FieldValue {
    /// Type name used in error messages (`null`, `bool`, `string`, or the
    /// numeric kind name)
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::String(_) => "string",
            FieldValue::Number(n) => n.kind().name(),
        }
    }

    pub fn as_number(&self) -> Option<&NumericValue> {
        match self {
            FieldValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Equality of stored form; see [`NumericValue::same_representation`].
    pub fn same_representation(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.same_representation(b),
            _ => self == other,
        }
    }
}

impl From<NumericValue> for FieldValue {
    fn from(value: NumericValue) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(NumericValue::Int32(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(NumericValue::Int64(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(NumericValue::Double(value))
    }
}

impl From<Decimal128> for FieldValue {
    fn from(value: Decimal128) -> Self {
        FieldValue::Number(NumericValue::Decimal128(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// A flat document: an id plus named fields in insertion order.
///
/// Most documents carry a handful of fields, so they are stored inline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    id: DocumentId,
    fields: SmallVec<[(String, FieldValue); 4]>,
}

impl Document {
    pub fn new() -> Self {
        Self::with_id(DocumentId::new())
    }

    pub fn with_id(id: DocumentId) -> Self {
        Self {
            id,
            fields: SmallVec::new(),
        }
    }

    /// Builder method: Add or replace a field
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value.into());
        self
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_number(&self, name: &str) -> Option<&NumericValue> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a field, keeping its position if it already exists
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Shell-style rendering: `{ "a" : NumberDecimal("11.0") }`
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " \"{}\" : {}", name, value)?;
        }
        f.write_str(" }")
    }
}
