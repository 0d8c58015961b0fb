//! Recursive encoder: record-side [`Value`] → JSON wire tree.
//!
//! The walk is a single dispatch on the value variant:
//!
//! - **Records** emit an object with one key per field, in declaration order.
//!   Fields holding the omit marker are skipped. A field's custom encoder runs
//!   on its non-null value first, then the result is encoded recursively.
//! - **Dates and date-times** emit their canonical ISO-8601 text.
//! - **Lists and tuples** emit arrays of the same length.
//! - **Maps** emit objects; with the naming convention on, every key is
//!   converted, not just record field names.
//! - **Scalars** pass through.
//!
//! The first failure aborts the walk; no partial tree is returned.

use chrono::SecondsFormat;
use serde_json::{Map, Number};

use crate::error::{Fault, Result};
use crate::naming::{map_key, wire_key};
use crate::value::{RecordInstance, Value};

/// `strftime` pattern for offset-less date-times. `%.f` prints the fraction
/// only when it is non-zero.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encode any value into a wire tree.
///
/// `camel_case` selects the `snake_case` → `camelCase` naming convention for
/// record fields without an explicit wire name and for plain map keys.
pub fn encode_value(value: &Value, camel_case: bool) -> Result<serde_json::Value> {
    match value {
        Value::Record(record) => encode_record(record, camel_case),
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::Number(Number::from(*i))),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| Fault::malformed(format!("float {f} has no JSON representation"))),
        Value::Str(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Date(d) => Ok(serde_json::Value::String(d.format(DATE_FORMAT).to_string())),
        Value::DateTime(dt) => Ok(serde_json::Value::String(
            dt.format(DATETIME_FORMAT).to_string(),
        )),
        Value::Timestamp(ts) => Ok(serde_json::Value::String(
            ts.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        )),
        Value::List(items) | Value::Tuple(items) => encode_items(items, camel_case),
        Value::Map(pairs) => encode_map(pairs, camel_case),
        Value::Omit => Err(Fault::malformed(
            "the omit marker is only valid as a record field value",
        )),
    }
}

/// Emit a record's fields as an object, skipping omitted ones.
fn encode_record(record: &RecordInstance, camel_case: bool) -> Result<serde_json::Value> {
    let mut out = Map::new();
    for (field, value) in record.record_type().fields().iter().zip(record.values()) {
        if value.is_omit() {
            continue;
        }
        let key = wire_key(field, camel_case);
        if out.contains_key(key.as_ref()) {
            return Err(Fault::malformed(format!(
                "field '{}' of record '{}' collides on wire key '{key}'",
                field.name(),
                record.record_type().name()
            )));
        }
        let encoded = match field.encoder() {
            // Custom encoders never see null.
            Some(hook) if !value.is_null() => {
                let transformed = hook(value).map_err(|message| Fault::Hook {
                    field: field.name().to_string(),
                    message,
                })?;
                encode_value(&transformed, camel_case)?
            }
            _ => encode_value(value, camel_case)?,
        };
        out.insert(key.into_owned(), encoded);
    }
    Ok(serde_json::Value::Object(out))
}

fn encode_items(items: &[Value], camel_case: bool) -> Result<serde_json::Value> {
    items
        .iter()
        .map(|item| encode_value(item, camel_case))
        .collect::<Result<Vec<_>>>()
        .map(serde_json::Value::Array)
}

/// Plain maps have no descriptors, so the convention applies to every key.
/// Two keys that convert to the same wire key are rejected.
fn encode_map(pairs: &[(String, Value)], camel_case: bool) -> Result<serde_json::Value> {
    let mut out = Map::new();
    for (key, value) in pairs {
        let wire = map_key(key, camel_case);
        if out.contains_key(wire.as_ref()) {
            return Err(Fault::malformed(format!(
                "map key '{key}' collides with an earlier key on wire key '{wire}'"
            )));
        }
        out.insert(wire.into_owned(), encode_value(value, camel_case)?);
    }
    Ok(serde_json::Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use serde_json::json;

    #[test]
    fn fractional_seconds_only_when_present() {
        let whole = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let frac = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 250_000)
            .unwrap();
        assert_eq!(
            encode_value(&Value::DateTime(whole), false).unwrap(),
            json!("2023-01-01T12:00:00")
        );
        assert_eq!(
            encode_value(&Value::DateTime(frac), false).unwrap(),
            json!("2023-01-01T12:00:00.250")
        );
    }

    #[test]
    fn timestamp_keeps_its_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 6, 30, 8, 15, 0).unwrap();
        assert_eq!(
            encode_value(&Value::Timestamp(ts), false).unwrap(),
            json!("2024-06-30T08:15:00+02:00")
        );
    }

    #[test]
    fn nan_is_rejected() {
        let err = encode_value(&Value::Float(f64::NAN), false).unwrap_err();
        assert!(matches!(err, Fault::MalformedInput(_)));
    }

    #[test]
    fn colliding_field_keys_are_rejected_not_overwritten() {
        use crate::schema::{FieldDescriptor, RecordType, TypeDesc};
        use crate::value::RecordInstance;

        let ty = RecordType::unchecked(
            "Login",
            vec![
                FieldDescriptor::new("user_name", TypeDesc::Str),
                FieldDescriptor::new("login", TypeDesc::Str).wire_name("userName"),
            ],
        );
        let record =
            RecordInstance::new(ty, vec![Value::from("alice"), Value::from("a1")]).unwrap();
        assert!(encode_value(&Value::Record(record.clone()), false).is_ok());
        let err = encode_value(&Value::Record(record), true).unwrap_err();
        assert!(err.to_string().contains("wire key 'userName'"), "{err}");
    }

    #[test]
    fn colliding_map_keys_are_rejected() {
        let map = Value::Map(vec![
            ("first_key".to_string(), Value::Int(1)),
            ("firstKey".to_string(), Value::Int(2)),
        ]);
        assert!(encode_value(&map, false).is_ok());
        let err = encode_value(&map, true).unwrap_err();
        assert!(matches!(err, Fault::MalformedInput(_)));
    }

    #[test]
    fn omit_outside_a_record_field_is_rejected() {
        let err = encode_value(&Value::List(vec![Value::Omit]), false).unwrap_err();
        assert!(matches!(err, Fault::MalformedInput(_)));
    }
}
