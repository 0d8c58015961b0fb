//! Record schemas: type descriptors, field descriptors and record types.
//!
//! A record type is an explicit, ordered table of field descriptors built once
//! and shared read-only behind an `Arc`. Nothing here is discovered at runtime;
//! the decoder walks these tables to reconstruct values.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::naming::wire_key;
use crate::value::Value;

/// Custom per-field encoder: runs on the field's non-null value before it is encoded.
pub type EncodeHook = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Custom per-field decoder: runs on the field's non-null wire value and is terminal.
pub type DecodeHook = Arc<dyn Fn(&serde_json::Value) -> Result<Value, String> + Send + Sync>;

/// Zero-argument default factory, called afresh for every decode.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Declared type of a field, or of an element nested inside one.
#[derive(Clone)]
pub enum TypeDesc {
    /// Anything; the wire value is converted structurally.
    Any,
    Bool,
    Int,
    Float,
    Str,
    Date,
    DateTime,
    Timestamp,
    /// Only the wire `null` is accepted.
    Null,
    List(Box<TypeDesc>),
    Tuple(Vec<TypeDesc>),
    /// String-keyed mapping whose values share one type.
    Map(Box<TypeDesc>),
    /// Members are tried in declaration order; the first that decodes wins.
    Union(Vec<TypeDesc>),
    Record(Arc<RecordType>),
}

impl TypeDesc {
    pub fn list(inner: TypeDesc) -> Self {
        TypeDesc::List(Box::new(inner))
    }

    pub fn map(inner: TypeDesc) -> Self {
        TypeDesc::Map(Box::new(inner))
    }

    /// `inner | null`
    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Union(vec![inner, TypeDesc::Null])
    }
}

/// Structural equality; record types compare by shape.
impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeDesc::List(a), TypeDesc::List(b)) | (TypeDesc::Map(a), TypeDesc::Map(b)) => {
                a == b
            }
            (TypeDesc::Tuple(a), TypeDesc::Tuple(b))
            | (TypeDesc::Union(a), TypeDesc::Union(b)) => a == b,
            (TypeDesc::Record(a), TypeDesc::Record(b)) => Arc::ptr_eq(a, b) || a.same_shape(b),
            (TypeDesc::Any, TypeDesc::Any)
            | (TypeDesc::Bool, TypeDesc::Bool)
            | (TypeDesc::Int, TypeDesc::Int)
            | (TypeDesc::Float, TypeDesc::Float)
            | (TypeDesc::Str, TypeDesc::Str)
            | (TypeDesc::Date, TypeDesc::Date)
            | (TypeDesc::DateTime, TypeDesc::DateTime)
            | (TypeDesc::Timestamp, TypeDesc::Timestamp)
            | (TypeDesc::Null, TypeDesc::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => f.write_str("any"),
            TypeDesc::Bool => f.write_str("bool"),
            TypeDesc::Int => f.write_str("int"),
            TypeDesc::Float => f.write_str("float"),
            TypeDesc::Str => f.write_str("str"),
            TypeDesc::Date => f.write_str("date"),
            TypeDesc::DateTime => f.write_str("datetime"),
            TypeDesc::Timestamp => f.write_str("timestamp"),
            TypeDesc::Null => f.write_str("null"),
            TypeDesc::List(inner) => write!(f, "list[{inner}]"),
            TypeDesc::Map(inner) => write!(f, "map[str, {inner}]"),
            TypeDesc::Tuple(items) => {
                f.write_str("tuple[")?;
                write_joined(f, items, ", ")?;
                f.write_str("]")
            }
            TypeDesc::Union(members) => write_joined(f, members, " | "),
            TypeDesc::Record(ty) => f.write_str(ty.name()),
        }
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeDesc], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// How a field is filled when its wire key is absent.
#[derive(Clone)]
pub enum FieldDefault {
    Value(Value),
    Factory(DefaultFactory),
}

impl FieldDefault {
    /// Produce the default. Factories run on every call, so no two decoded
    /// instances share a default.
    pub fn produce(&self) -> Value {
        match self {
            FieldDefault::Value(v) => v.clone(),
            FieldDefault::Factory(factory) => factory(),
        }
    }
}

/// One named, typed field of a record type, with its wire overrides.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeDesc,
    default: Option<FieldDefault>,
    wire_name: Option<String>,
    encoder: Option<EncodeHook>,
    decoder: Option<DecodeHook>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            wire_name: None,
            encoder: None,
            decoder: None,
        }
    }

    /// Fixed wire key. Wins over the naming convention in both directions.
    pub fn wire_name(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    pub fn default_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(FieldDefault::Factory(Arc::new(factory)));
        self
    }

    pub fn encode_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(hook));
        self
    }

    pub fn decode_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    pub fn wire_name_override(&self) -> Option<&str> {
        self.wire_name.as_deref()
    }

    pub fn encoder(&self) -> Option<&EncodeHook> {
        self.encoder.as_ref()
    }

    pub fn decoder(&self) -> Option<&DecodeHook> {
        self.decoder.as_ref()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("has_default", &self.default.is_some())
            .field("wire_name", &self.wire_name)
            .field("has_encoder", &self.encoder.is_some())
            .field("has_decoder", &self.decoder.is_some())
            .finish()
    }
}

/// A named, ordered set of field descriptors. Immutable once built.
pub struct RecordType {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordType {
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Build a record type without the builder's checks.
    #[cfg(test)]
    pub(crate) fn unchecked(name: &str, fields: Vec<FieldDescriptor>) -> Arc<RecordType> {
        Arc::new(RecordType {
            name: name.to_string(),
            fields,
        })
    }

    /// Same name, and the same field names, wire names and declared types in
    /// the same order. Defaults and hooks are not compared.
    pub fn same_shape(&self, other: &RecordType) -> bool {
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| {
                a.name == b.name && a.wire_name == b.wire_name && a.ty == b.ty
            })
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Collects field descriptors in declaration order.
pub struct RecordTypeBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordTypeBuilder {
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the record type, rejecting empty or repeated field names and
    /// fields that would share a wire key with the naming convention off or on.
    pub fn build(self) -> Result<Arc<RecordType>, SchemaError> {
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyName(self.name));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    record: self.name,
                    field: field.name.clone(),
                });
            }
        }
        for camel_case in [false, true] {
            if let Some((first, second, key)) = first_collision(&self.fields, camel_case) {
                return Err(SchemaError::WireKeyCollision {
                    record: self.name,
                    first,
                    second,
                    key,
                });
            }
        }
        Ok(Arc::new(RecordType {
            name: self.name,
            fields: self.fields,
        }))
    }
}

fn first_collision(
    fields: &[FieldDescriptor],
    camel_case: bool,
) -> Option<(String, String, String)> {
    let mut seen: HashMap<Cow<'_, str>, &str> = HashMap::with_capacity(fields.len());
    for field in fields {
        let key = wire_key(field, camel_case);
        if let Some(first) = seen.get(&key) {
            return Some((first.to_string(), field.name.clone(), key.into_owned()));
        }
        seen.insert(key, &field.name);
    }
    None
}
