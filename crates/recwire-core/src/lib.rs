//! # recwire-core
//!
//! Converts typed records to and from a generic JSON wire tree
//! (`serde_json::Value`), and onward to JSON text.
//!
//! A record type is an explicit table of field descriptors: a name, a declared
//! type, an optional default, and optional wire overrides (a fixed wire name,
//! a custom encoder, a custom decoder). The encoder walks a record instance
//! against that table; the decoder walks the table to rebuild an instance from
//! an untyped tree, recursing into nested records, lists, tuples, maps, unions
//! and date-time scalars.
//!
//! ## Quick start
//!
//! ```rust
//! use recwire_core::{
//!     CodecOptions, FieldDescriptor, RecordInstance, RecordType, TreeCodec, TypeDesc, Value,
//! };
//! use serde_json::json;
//!
//! let person = RecordType::builder("Person")
//!     .field(FieldDescriptor::new("user_name", TypeDesc::Str))
//!     .field(FieldDescriptor::new("user_age", TypeDesc::Int))
//!     .build()
//!     .unwrap();
//!
//! let values = vec![Value::from("Alice"), Value::Int(30)];
//! let alice = RecordInstance::new(person.clone(), values).unwrap();
//! let codec = TreeCodec::camel_case();
//!
//! let tree = codec.to_dict(&Value::Record(alice.clone()), &CodecOptions::new()).unwrap();
//! assert_eq!(tree, json!({"userName": "Alice", "userAge": 30}));
//!
//! let back = codec.from_dict(&TypeDesc::Record(person), &tree, &CodecOptions::new()).unwrap();
//! assert_eq!(back, Value::Record(alice));
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: `TypeDesc`, `FieldDescriptor`, `RecordType`
//! - [`value`]: record-side `Value` and `RecordInstance`
//! - [`naming`]: wire key resolution and the `snake_case` → `camelCase` transform
//! - [`encoder`]: `Value` → wire tree
//! - [`decoder`]: wire tree → `Value`, type-directed
//! - [`codec`]: the `Codec` contract and `TreeCodec`
//! - [`record`]: typed bridge (`Record`, `FieldValue`, `Omittable`)
//! - [`api`]: free functions over the default codec
//! - [`error`]: `CodecError`, `Fault`, `SchemaError`

pub mod api;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod naming;
pub mod record;
pub mod schema;
pub mod value;

pub use api::{
    decode, decode_with, encode, encode_with, from_dict, from_dict_with, from_json,
    from_json_with, to_dict, to_dict_with, to_json, to_json_with,
};
pub use codec::{Codec, CodecConfig, CodecOptions, TreeCodec};
pub use error::{CodecError, Fault, Op, Result, SchemaError};
pub use record::{FieldValue, Omittable, Record};
pub use schema::{FieldDefault, FieldDescriptor, RecordType, TypeDesc};
pub use value::{RecordInstance, Value};
