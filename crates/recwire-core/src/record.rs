//! Typed bridge between Rust structs and record instances.
//!
//! A struct becomes a record by implementing [`Record`]: it names its
//! [`RecordType`] table and converts itself to and from a [`RecordInstance`].
//! Field values cross the bridge through [`FieldValue`], which is implemented
//! here for the scalar, date-time and container types the codec understands.
//! [`record_field!`](crate::record_field) makes a record usable as a field of
//! another record.
//!
//! ```
//! use std::sync::{Arc, OnceLock};
//! use recwire_core::{
//!     from_dict, record_field, to_dict, CodecOptions, FieldDescriptor, FieldValue, Record,
//!     RecordInstance, RecordType, Result, TypeDesc,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Person {
//!     user_name: String,
//!     age: i64,
//! }
//!
//! impl Record for Person {
//!     fn record_type() -> Arc<RecordType> {
//!         static TYPE: OnceLock<Arc<RecordType>> = OnceLock::new();
//!         TYPE.get_or_init(|| {
//!             RecordType::builder("Person")
//!                 .field(FieldDescriptor::new("user_name", String::type_desc()))
//!                 .field(FieldDescriptor::new("age", i64::type_desc()).default_value(0))
//!                 .build()
//!                 .expect("valid schema")
//!         })
//!         .clone()
//!     }
//!
//!     fn to_instance(&self) -> Result<RecordInstance> {
//!         RecordInstance::new(
//!             Self::record_type(),
//!             vec![self.user_name.to_value()?, self.age.to_value()?],
//!         )
//!     }
//!
//!     fn from_instance(mut instance: RecordInstance) -> Result<Self> {
//!         Ok(Self {
//!             user_name: instance.take("user_name")?,
//!             age: instance.take("age")?,
//!         })
//!     }
//! }
//! record_field!(Person);
//!
//! let options = CodecOptions::new().camel_case(true);
//! let tree = to_dict(&Person { user_name: "Alice".into(), age: 30 }, &options).unwrap();
//! assert_eq!(tree, serde_json::json!({"userName": "Alice", "age": 30}));
//! let back: Person = from_dict(&tree, &options).unwrap();
//! assert_eq!(back.user_name, "Alice");
//! ```

use std::collections::BTreeMap;
use std::mem;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{Fault, Result};
use crate::schema::{RecordType, TypeDesc};
use crate::value::{RecordInstance, Value};

/// A Rust type that can sit in a record field.
pub trait FieldValue: Sized {
    /// The declared type the decoder reconstructs this value from.
    fn type_desc() -> TypeDesc;

    fn to_value(&self) -> Result<Value>;

    fn from_value(value: Value) -> Result<Self>;
}

/// A Rust struct with a fixed record type.
pub trait Record: Sized {
    /// The shared field descriptor table for this type.
    fn record_type() -> Arc<RecordType>;

    fn to_instance(&self) -> Result<RecordInstance>;

    fn from_instance(instance: RecordInstance) -> Result<Self>;
}

/// Typed form of the omit marker for a single field.
///
/// `Omitted` encodes as [`Value::Omit`], so the field is left out of the wire
/// tree. Give such a field the default `Value::Omit` to decode an absent key
/// back to `Omitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Omittable<T> {
    #[default]
    Omitted,
    Present(T),
}

impl<T> Omittable<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Omittable::Omitted)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Omittable::Omitted => None,
            Omittable::Present(v) => Some(v),
        }
    }
}

impl RecordInstance {
    /// Move a field's value out as `T`, leaving null in its place.
    pub fn take<T: FieldValue>(&mut self, name: &str) -> Result<T> {
        let index = self.record_type().index_of(name).ok_or_else(|| {
            Fault::malformed(format!(
                "record '{}' has no field '{name}'",
                self.record_type().name()
            ))
        })?;
        let value = mem::replace(&mut self.values_mut()[index], Value::Null);
        T::from_value(value).map_err(|e| Fault::malformed(format!("field '{name}': {e}")))
    }
}

fn unexpected(expected: &str, got: &Value) -> Fault {
    Fault::malformed(format!("expected {expected}, got {}", got.type_name()))
}

impl FieldValue for Value {
    fn type_desc() -> TypeDesc {
        TypeDesc::Any
    }

    fn to_value(&self) -> Result<Value> {
        Ok(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FieldValue for bool {
    fn type_desc() -> TypeDesc {
        TypeDesc::Bool
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(unexpected("bool", &other)),
        }
    }
}

impl FieldValue for i64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Int
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Int(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(unexpected("int", &other)),
        }
    }
}

macro_rules! narrow_int {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn type_desc() -> TypeDesc {
                TypeDesc::Int
            }

            fn to_value(&self) -> Result<Value> {
                Ok(Value::Int(i64::from(*self)))
            }

            fn from_value(value: Value) -> Result<Self> {
                let i = i64::from_value(value)?;
                <$t>::try_from(i).map_err(|_| {
                    Fault::malformed(format!("{i} is out of range for {}", stringify!($t)))
                })
            }
        }
    )*};
}

narrow_int!(i32, u32);

impl FieldValue for f64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Float
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Float(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            // JSON text drops the fraction of whole floats.
            Value::Int(i) => Ok(i as f64),
            other => Err(unexpected("float", &other)),
        }
    }
}

impl FieldValue for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::Str
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Str(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(unexpected("str", &other)),
        }
    }
}

impl FieldValue for NaiveDate {
    fn type_desc() -> TypeDesc {
        TypeDesc::Date
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Date(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(d),
            other => Err(unexpected("date", &other)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    fn type_desc() -> TypeDesc {
        TypeDesc::DateTime
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::DateTime(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(unexpected("datetime", &other)),
        }
    }
}

impl FieldValue for DateTime<FixedOffset> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Timestamp
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Timestamp(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            other => Err(unexpected("timestamp", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::list(T::type_desc())
    }

    fn to_value(&self) -> Result<Value> {
        self.iter()
            .map(FieldValue::to_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) | Value::Tuple(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(unexpected("list", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::optional(T::type_desc())
    }

    fn to_value(&self) -> Result<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Omittable<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn to_value(&self) -> Result<Value> {
        match self {
            Omittable::Omitted => Ok(Value::Omit),
            Omittable::Present(v) => v.to_value(),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Omit => Ok(Omittable::Omitted),
            other => T::from_value(other).map(Omittable::Present),
        }
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::map(T::type_desc())
    }

    fn to_value(&self) -> Result<Value> {
        self.iter()
            .map(|(k, v)| -> Result<(String, Value)> { Ok((k.clone(), v.to_value()?)) })
            .collect::<Result<Vec<_>>>()
            .map(Value::Map)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| -> Result<(String, T)> { Ok((k, T::from_value(v)?)) })
                .collect(),
            other => Err(unexpected("map", &other)),
        }
    }
}

macro_rules! tuple_field {
    ($len:literal => $($name:ident : $idx:tt),+) => {
        impl<$($name: FieldValue),+> FieldValue for ($($name,)+) {
            fn type_desc() -> TypeDesc {
                TypeDesc::Tuple(vec![$($name::type_desc()),+])
            }

            fn to_value(&self) -> Result<Value> {
                Ok(Value::Tuple(vec![$(self.$idx.to_value()?),+]))
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Tuple(items) | Value::List(items) if items.len() == $len => {
                        let mut items = items.into_iter();
                        Ok(($($name::from_value(items.next().unwrap_or(Value::Null))?,)+))
                    }
                    other => Err(unexpected(concat!("tuple of ", $len), &other)),
                }
            }
        }
    };
}

tuple_field!(2 => A: 0, B: 1);
tuple_field!(3 => A: 0, B: 1, C: 2);

/// Implement [`FieldValue`] for types that implement [`Record`], so they can
/// be nested inside other records, lists and options.
#[macro_export]
macro_rules! record_field {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::FieldValue for $ty {
            fn type_desc() -> $crate::TypeDesc {
                $crate::TypeDesc::Record(<$ty as $crate::Record>::record_type())
            }

            fn to_value(&self) -> $crate::Result<$crate::Value> {
                $crate::Record::to_instance(self).map($crate::Value::Record)
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                match value {
                    $crate::Value::Record(instance) => {
                        <$ty as $crate::Record>::from_instance(instance)
                    }
                    other => Err($crate::Fault::MalformedInput(format!(
                        "expected record, got {}",
                        other.type_name()
                    ))),
                }
            }
        }
    )+};
}
