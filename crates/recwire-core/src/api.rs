//! Free functions over a codec.
//!
//! The plain forms use a default [`TreeCodec`]; the `_with` forms take the
//! codec explicitly. Dynamic functions work on [`Value`] and [`TypeDesc`],
//! typed ones on anything implementing [`Record`].

use crate::codec::{Codec, CodecOptions, TreeCodec};
use crate::error::{CodecError, Op};
use crate::record::Record;
use crate::schema::TypeDesc;
use crate::value::Value;

const DEFAULT_CODEC: TreeCodec = TreeCodec::new(crate::codec::CodecConfig { camel_case: false });

/// Encode a record value with the default tree codec.
pub fn encode(value: &Value, options: &CodecOptions) -> Result<serde_json::Value, CodecError> {
    DEFAULT_CODEC.encode(value, options)
}

/// Decode a wire tree into `target` with the default tree codec.
pub fn decode(
    target: &TypeDesc,
    data: &serde_json::Value,
    options: &CodecOptions,
) -> Result<Value, CodecError> {
    DEFAULT_CODEC.decode(target, data, options)
}

/// Encode a record value with any codec.
pub fn encode_with<C: Codec>(
    codec: &C,
    value: &Value,
    options: &CodecOptions,
) -> Result<C::Wire, CodecError> {
    codec.encode(value, options)
}

/// Decode with any codec.
pub fn decode_with<C: Codec>(
    codec: &C,
    target: &TypeDesc,
    data: &C::Wire,
    options: &CodecOptions,
) -> Result<Value, CodecError> {
    codec.decode(target, data, options)
}

/// Encode a typed record into a wire tree.
pub fn to_dict<R: Record>(
    record: &R,
    options: &CodecOptions,
) -> Result<serde_json::Value, CodecError> {
    to_dict_with(&DEFAULT_CODEC, record, options)
}

pub fn to_dict_with<R: Record>(
    codec: &TreeCodec,
    record: &R,
    options: &CodecOptions,
) -> Result<serde_json::Value, CodecError> {
    let instance = record
        .to_instance()
        .map_err(|cause| CodecError::new(Op::Encode, cause))?;
    codec.to_dict(&Value::Record(instance), options)
}

/// Decode a wire tree into a typed record.
pub fn from_dict<R: Record>(
    data: &serde_json::Value,
    options: &CodecOptions,
) -> Result<R, CodecError> {
    from_dict_with(&DEFAULT_CODEC, data, options)
}

pub fn from_dict_with<R: Record>(
    codec: &TreeCodec,
    data: &serde_json::Value,
    options: &CodecOptions,
) -> Result<R, CodecError> {
    let value = codec.from_dict(&TypeDesc::Record(R::record_type()), data, options)?;
    into_record(value)
}

/// Encode a typed record straight to JSON text.
pub fn to_json<R: Record>(record: &R, options: &CodecOptions) -> Result<String, CodecError> {
    to_json_with(&DEFAULT_CODEC, record, options)
}

pub fn to_json_with<R: Record>(
    codec: &TreeCodec,
    record: &R,
    options: &CodecOptions,
) -> Result<String, CodecError> {
    let tree = to_dict_with(codec, record, options)?;
    crate::codec::render(&tree, options.pretty)
}

/// Parse JSON text into a typed record.
pub fn from_json<R: Record>(text: &str, options: &CodecOptions) -> Result<R, CodecError> {
    from_json_with(&DEFAULT_CODEC, text, options)
}

pub fn from_json_with<R: Record>(
    codec: &TreeCodec,
    text: &str,
    options: &CodecOptions,
) -> Result<R, CodecError> {
    let value = codec.from_text(&TypeDesc::Record(R::record_type()), text, options)?;
    into_record(value)
}

fn into_record<R: Record>(value: Value) -> Result<R, CodecError> {
    match value {
        Value::Record(instance) => {
            R::from_instance(instance).map_err(|cause| CodecError::new(Op::Decode, cause))
        }
        other => Err(CodecError::new(
            Op::Decode,
            crate::error::Fault::UnsupportedInput(format!(
                "expected a record instance, found: {}",
                other.type_name()
            )),
        )),
    }
}
