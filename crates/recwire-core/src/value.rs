//! Record-side dynamic values.
//!
//! The wire tree is a `serde_json::Value`. This module defines the other side
//! of the codec: the values a record instance holds. It mirrors the wire's
//! scalar and container types but keeps the distinctions the wire loses
//! (tuples vs. lists, dates vs. strings, records vs. plain maps) and adds the
//! omit marker.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{Fault, Result};
use crate::schema::RecordType;

/// A value held by a record field, or by a container nested in one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Calendar date, encoded as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Date-time without an offset, encoded as `YYYY-MM-DDTHH:MM:SS[.f]`.
    DateTime(NaiveDateTime),
    /// Date-time with a fixed UTC offset, encoded as RFC 3339.
    Timestamp(DateTime<FixedOffset>),
    List(Vec<Value>),
    /// Fixed-size positional sequence. Encodes exactly like a list.
    Tuple(Vec<Value>),
    /// Key-value pairs in insertion order.
    Map(Vec<(String, Value)>),
    Record(RecordInstance),
    /// The omit marker: a record field holding it is left out of the wire tree.
    Omit,
}

impl Value {
    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Omit => "omit",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_omit(&self) -> bool {
        matches!(self, Value::Omit)
    }

    /// Truthiness in the usual scripting sense. The omit marker is never truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Omit => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Map(pairs) => !pairs.is_empty(),
            Value::Date(_) | Value::DateTime(_) | Value::Timestamp(_) | Value::Record(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordInstance> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Look up a key in a `Map` value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Value::Record(r) => r.get(key),
            _ => None,
        }
    }

    /// Convert a wire value structurally, without any type-directed coercion.
    ///
    /// Objects become `Map`, arrays become `List`, integers that fit `i64`
    /// become `Int` and every other number becomes `Float`.
    pub fn from_wire(wire: &serde_json::Value) -> Value {
        match wire {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_wire).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_wire(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<RecordInstance> for Value {
    fn from(r: RecordInstance) -> Self {
        Value::Record(r)
    }
}

/// One value per field descriptor of its record type, in declaration order.
#[derive(Clone)]
pub struct RecordInstance {
    ty: Arc<RecordType>,
    values: Vec<Value>,
}

impl RecordInstance {
    /// Build an instance from values in field declaration order.
    ///
    /// Fails if the number of values differs from the number of fields.
    pub fn new(ty: Arc<RecordType>, values: Vec<Value>) -> Result<Self> {
        if values.len() != ty.fields().len() {
            return Err(Fault::malformed(format!(
                "record '{}' has {} fields, got {} values",
                ty.name(),
                ty.fields().len(),
                values.len()
            )));
        }
        Ok(Self { ty, values })
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Field value by identifier.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.ty.index_of(name).map(|i| &self.values[i])
    }

    /// Iterate `(identifier, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }
}

impl PartialEq for RecordInstance {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.ty, &other.ty) || self.ty.same_shape(&other.ty))
            && self.values == other.values
    }
}

impl fmt::Debug for RecordInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.ty.name());
        for (name, value) in self.iter() {
            s.field(name, value);
        }
        s.finish()
    }
}
