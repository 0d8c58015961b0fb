//! Recursive, type-directed decoder: JSON wire tree → record-side [`Value`].
//!
//! The declared [`TypeDesc`] drives the walk, not the shape of the incoming
//! data. Record fields are looked up under the same wire key the encoder
//! would have written, so the naming convention needs no reverse transform.
//!
//! # Key design decisions
//!
//! - **Null at field level**: a present-but-null field is stored as
//!   [`Value::Null`] without consulting the declared type or the custom
//!   decoder. Nulls nested deeper (list elements, tuple slots) go through the
//!   declared type and need a `null` union member.
//! - **Custom decoders are terminal**: their output is stored as-is.
//! - **Unions are first-match**: members are tried in declaration order and
//!   any failure moves on to the next member. There is no scoring; an
//!   ambiguous value resolves to the first member that accepts it.
//! - **Scalars are not coerced**: a scalar-typed slot accepts any non-null
//!   wire value and converts it structurally.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::encoder::{DATETIME_FORMAT, DATE_FORMAT};
use crate::error::{Fault, Result};
use crate::naming::wire_key;
use crate::schema::{RecordType, TypeDesc};
use crate::value::{RecordInstance, Value};

/// Decode a wire object into an instance of `ty`.
///
/// Every field is resolved before the instance is built: absent keys fall back
/// to the field default (factories are called afresh) or fail with
/// [`Fault::MissingField`] carrying the wire key that was looked up.
pub fn decode_record(
    ty: &Arc<RecordType>,
    wire: &serde_json::Value,
    camel_case: bool,
) -> Result<RecordInstance> {
    let object = wire.as_object().ok_or_else(|| {
        Fault::malformed(format!(
            "expected an object for record '{}', got {}",
            ty.name(),
            wire_kind(wire)
        ))
    })?;

    let mut values = Vec::with_capacity(ty.fields().len());
    for field in ty.fields() {
        let key = wire_key(field, camel_case);
        let value = match object.get(key.as_ref()) {
            None => match field.default() {
                Some(default) => {
                    trace!(record = ty.name(), field = field.name(), "filled from default");
                    default.produce()
                }
                None => {
                    return Err(Fault::MissingField {
                        key: key.into_owned(),
                    })
                }
            },
            Some(serde_json::Value::Null) => Value::Null,
            Some(raw) => match field.decoder() {
                Some(hook) => hook(raw).map_err(|message| Fault::Hook {
                    field: field.name().to_string(),
                    message,
                })?,
                None => decode_value(field.ty(), raw, camel_case)?,
            },
        };
        values.push(value);
    }

    RecordInstance::new(Arc::clone(ty), values)
}

/// Decode a wire value against a declared type.
pub fn decode_value(ty: &TypeDesc, wire: &serde_json::Value, camel_case: bool) -> Result<Value> {
    match ty {
        TypeDesc::Record(record) => decode_record(record, wire, camel_case).map(Value::Record),
        TypeDesc::Tuple(members) => {
            let items = expect_array(ty, wire)?;
            if items.len() != members.len() {
                return Err(Fault::malformed(format!(
                    "expected {} elements for {ty}, got {}",
                    members.len(),
                    items.len()
                )));
            }
            members
                .iter()
                .zip(items)
                .map(|(member, item)| decode_value(member, item, camel_case))
                .collect::<Result<Vec<_>>>()
                .map(Value::Tuple)
        }
        TypeDesc::List(inner) => expect_array(ty, wire)?
            .iter()
            .map(|item| decode_value(inner, item, camel_case))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        TypeDesc::Map(inner) => {
            let object = wire.as_object().ok_or_else(|| mismatch(ty, wire))?;
            object
                .iter()
                .map(|(k, v)| -> Result<(String, Value)> {
                    Ok((k.clone(), decode_value(inner, v, camel_case)?))
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Map)
        }
        TypeDesc::Date => parse_date(expect_str(ty, wire)?).map(Value::Date),
        TypeDesc::DateTime => parse_datetime(expect_str(ty, wire)?).map(Value::DateTime),
        TypeDesc::Timestamp => parse_timestamp(expect_str(ty, wire)?).map(Value::Timestamp),
        TypeDesc::Null => {
            if wire.is_null() {
                Ok(Value::Null)
            } else {
                Err(Fault::malformed(format!("expected null, got {wire}")))
            }
        }
        TypeDesc::Union(members) => decode_union(ty, members, wire, camel_case),
        TypeDesc::Any => Ok(Value::from_wire(wire)),
        TypeDesc::Bool | TypeDesc::Int | TypeDesc::Float | TypeDesc::Str => {
            if wire.is_null() {
                Err(Fault::malformed(format!("expected type {ty}, got null")))
            } else {
                Ok(Value::from_wire(wire))
            }
        }
    }
}

/// Try each member in declaration order; the first success wins.
fn decode_union(
    ty: &TypeDesc,
    members: &[TypeDesc],
    wire: &serde_json::Value,
    camel_case: bool,
) -> Result<Value> {
    for member in members {
        match decode_value(member, wire, camel_case) {
            Ok(value) => return Ok(value),
            Err(error) => trace!(member = %member, %error, "union member rejected"),
        }
    }
    Err(Fault::malformed(format!(
        "expected {wire} to be of type {ty}, got {}",
        wire_kind(wire)
    )))
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    // Length check rejects the unpadded forms chrono would otherwise accept.
    if text.len() != 10 {
        return Err(Fault::malformed(format!("invalid date {text:?}")));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| Fault::malformed(format!("invalid date {text:?}: {e}")))
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    if text.len() < 19 || text.as_bytes()[10] != b'T' {
        return Err(Fault::malformed(format!("invalid datetime {text:?}")));
    }
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .map_err(|e| Fault::malformed(format!("invalid datetime {text:?}: {e}")))
}

/// RFC 3339 with an uppercase `T` separator and `Z` designator. chrono alone
/// also takes a space separator and lowercase letters.
fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    if text.len() < 20 || text.as_bytes()[10] != b'T' || text.ends_with('z') {
        return Err(Fault::malformed(format!("invalid timestamp {text:?}")));
    }
    DateTime::parse_from_rfc3339(text)
        .map_err(|e| Fault::malformed(format!("invalid timestamp {text:?}: {e}")))
}

fn expect_array<'a>(
    ty: &TypeDesc,
    wire: &'a serde_json::Value,
) -> Result<&'a Vec<serde_json::Value>> {
    wire.as_array().ok_or_else(|| mismatch(ty, wire))
}

fn expect_str<'a>(ty: &TypeDesc, wire: &'a serde_json::Value) -> Result<&'a str> {
    wire.as_str().ok_or_else(|| mismatch(ty, wire))
}

fn mismatch(ty: &TypeDesc, wire: &serde_json::Value) -> Fault {
    Fault::malformed(format!("expected type {ty}, got {}", wire_kind(wire)))
}

/// JSON kind name for error messages.
pub(crate) fn wire_kind(wire: &serde_json::Value) -> &'static str {
    match wire {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
