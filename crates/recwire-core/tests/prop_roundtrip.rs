/// Property-based roundtrip tests for the record codec.
///
/// Generates random record instances over a fixed schema, and random
/// snake_case schemas, and checks that `decode(encode(r)) == r` holds with the
/// naming convention off and on, through both the wire tree and JSON text.
///
/// Floats are generated as short decimals so they survive text rendering
/// without last-digit drift.
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use recwire_core::naming::snake_to_camel;
use recwire_core::{
    CodecOptions, FieldDescriptor, RecordInstance, RecordType, TreeCodec, TypeDesc, Value,
};
use serde_json::{Map, Number};

// ============================================================================
// Schemas
// ============================================================================

fn address_type() -> Arc<RecordType> {
    RecordType::builder("Address")
        .field(FieldDescriptor::new("street_name", TypeDesc::Str))
        .field(FieldDescriptor::new("house_number", TypeDesc::Int))
        .build()
        .unwrap()
}

fn profile_type(address: &Arc<RecordType>) -> Arc<RecordType> {
    RecordType::builder("Profile")
        .field(FieldDescriptor::new("display_name", TypeDesc::Str))
        .field(FieldDescriptor::new("is_active", TypeDesc::Bool))
        .field(FieldDescriptor::new("score", TypeDesc::Float))
        .field(FieldDescriptor::new("joined_on", TypeDesc::Date))
        .field(FieldDescriptor::new("nick_name", TypeDesc::optional(TypeDesc::Str)))
        .field(FieldDescriptor::new("lucky_numbers", TypeDesc::list(TypeDesc::Int)))
        .field(FieldDescriptor::new("home_address", TypeDesc::Record(Arc::clone(address))))
        .field(FieldDescriptor::new(
            "past_addresses",
            TypeDesc::list(TypeDesc::Record(Arc::clone(address))),
        ))
        .field(FieldDescriptor::new("tags", TypeDesc::map(TypeDesc::Str)))
        .build()
        .unwrap()
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        Just(String::new()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("caf\u{00e9}".to_string()),
        Just("\u{4f60}\u{597d}".to_string()),
        Just("line1\nline2".to_string()),
        Just("say \"hi\"".to_string()),
    ]
}

fn arb_simple_float() -> impl Strategy<Value = f64> {
    (-100_000i64..100_000i64).prop_map(|n| n as f64 / 100.0)
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_address(ty: Arc<RecordType>) -> impl Strategy<Value = Value> {
    (arb_text(), -1000i64..100_000).prop_map(move |(street, number)| {
        Value::Record(
            RecordInstance::new(Arc::clone(&ty), vec![Value::Str(street), Value::Int(number)])
                .unwrap(),
        )
    })
}

fn arb_profile() -> impl Strategy<Value = Value> {
    let address = address_type();
    let profile = profile_type(&address);
    (
        arb_text(),
        any::<bool>(),
        arb_simple_float(),
        arb_date(),
        prop::option::of(arb_text()),
        prop::collection::vec(any::<i64>(), 0..8),
        arb_address(Arc::clone(&address)),
        prop::collection::vec(arb_address(Arc::clone(&address)), 0..4),
        prop::collection::btree_map("[a-z]{1,8}", arb_text(), 0..4),
    )
        .prop_map(
            move |(name, active, score, joined, nick, lucky, home, past, tags)| {
                let values = vec![
                    Value::Str(name),
                    Value::Bool(active),
                    Value::Float(score),
                    Value::Date(joined),
                    nick.map(Value::Str).unwrap_or(Value::Null),
                    Value::List(lucky.into_iter().map(Value::Int).collect()),
                    home,
                    Value::List(past),
                    Value::Map(tags.into_iter().map(|(k, v)| (k, Value::Str(v))).collect()),
                ];
                Value::Record(RecordInstance::new(Arc::clone(&profile), values).unwrap())
            },
        )
}

/// A snake_case identifier with up to three words.
fn arb_snake_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,6}(_[a-z]{1,6}){0,2}").unwrap()
}

/// Field names whose camelCase forms are pairwise distinct.
fn arb_field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_snake_name(), 1..8).prop_map(|names| {
        let mut seen = BTreeSet::new();
        names
            .into_iter()
            .filter(|n| seen.insert(snake_to_camel(n)))
            .collect()
    })
}

fn arb_json_inner(depth: u32) -> BoxedStrategy<serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(|n| serde_json::Value::Number(Number::from(n))),
        arb_text().prop_map(serde_json::Value::String),
    ];
    if depth == 0 {
        return leaf.boxed();
    }
    prop_oneof![
        2 => leaf,
        1 => prop::collection::vec(arb_json_inner(depth - 1), 0..4)
            .prop_map(serde_json::Value::Array),
        1 => prop::collection::vec(("[a-zA-Z_]{1,10}", arb_json_inner(depth - 1)), 0..4)
            .prop_map(|pairs| serde_json::Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
    ]
    .boxed()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Core roundtrip property over a nested schema, with the convention off and on.
    #[test]
    fn roundtrip_preserves_record(value in arb_profile()) {
        let ty = TypeDesc::Record(Arc::clone(value.as_record().unwrap().record_type()));
        for camel_case in [false, true] {
            let codec = TreeCodec::default();
            let options = CodecOptions::new().camel_case(camel_case);
            let tree = codec.to_dict(&value, &options).unwrap();
            let back = codec.from_dict(&ty, &tree, &options).unwrap();
            prop_assert_eq!(&back, &value, "tree: {}", tree);
        }
    }

    /// The same property through JSON text.
    #[test]
    fn text_roundtrip_preserves_record(value in arb_profile(), pretty in any::<bool>()) {
        let ty = TypeDesc::Record(Arc::clone(value.as_record().unwrap().record_type()));
        let codec = TreeCodec::camel_case();
        let options = CodecOptions::new().pretty(pretty);
        let text = codec.to_text(&value, &options).unwrap();
        let back = codec.from_text(&ty, &text, &options).unwrap();
        prop_assert_eq!(&back, &value, "text: {}", text);
    }

    /// Encoding is deterministic.
    #[test]
    fn encoding_is_idempotent(value in arb_profile()) {
        let codec = TreeCodec::camel_case();
        let options = CodecOptions::new();
        prop_assert_eq!(
            codec.to_dict(&value, &options).unwrap(),
            codec.to_dict(&value, &options).unwrap()
        );
    }

    /// Arbitrary snake_case schemas survive the camelCase convention.
    #[test]
    fn camel_case_roundtrip_for_any_schema(names in arb_field_names()) {
        let ty = names
            .iter()
            .fold(RecordType::builder("Generated"), |b, n| {
                b.field(FieldDescriptor::new(n.as_str(), TypeDesc::Int))
            })
            .build()
            .unwrap();
        let values: Vec<Value> = (0..names.len() as i64).map(Value::Int).collect();
        let value = Value::Record(RecordInstance::new(Arc::clone(&ty), values).unwrap());

        let codec = TreeCodec::camel_case();
        let options = CodecOptions::new();
        let tree = codec.to_dict(&value, &options).unwrap();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        prop_assert!(keys.iter().all(|k| !k.contains('_')), "keys: {:?}", keys);

        let back = codec.from_dict(&TypeDesc::Record(ty), &tree, &options).unwrap();
        prop_assert_eq!(back, value);
    }

    /// Converting an already converted name changes nothing.
    #[test]
    fn snake_to_camel_is_stable(name in arb_snake_name()) {
        let once = snake_to_camel(&name);
        prop_assert_eq!(snake_to_camel(&once), once.clone());
        prop_assert!(!once.contains('_'));
    }

    /// Decoding untrusted input either succeeds or fails cleanly.
    #[test]
    fn decode_never_panics(data in arb_json_inner(3)) {
        let address = address_type();
        let ty = TypeDesc::Record(profile_type(&address));
        let _ = TreeCodec::default().from_dict(&ty, &data, &CodecOptions::new());
    }
}
