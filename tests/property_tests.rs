//! Property-based tests for rust_hierarchical_logger using proptest

use base64::Engine;
use proptest::prelude::*;
use rust_hierarchical_logger::encoder::{write_entry, JsonEncoder};
use rust_hierarchical_logger::prelude::*;
use serde_json::Value;

fn encode(entry: &LogEntry) -> Value {
    let mut encoder = JsonEncoder::acquire();
    let bytes = write_entry(entry, &mut *encoder);
    assert_eq!(bytes.last(), Some(&b'\n'));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
    serde_json::from_slice(bytes).expect("Record should be valid JSON")
}

fn encode_field(field: Field) -> Value {
    let mut entry = LogEntry::acquire("prop.test", LogLevel::Debug, "field");
    entry.merge_fields([field]);
    encode(&entry)["value"].take()
}

/// The rendered text of a single field named `value`.
fn raw_value(field: Field) -> String {
    let mut entry = LogEntry::acquire("prop.test", LogLevel::Debug, "field");
    entry.merge_fields([field]);
    let mut encoder = JsonEncoder::acquire();
    let line = String::from_utf8(write_entry(&entry, &mut *encoder).to_vec()).expect("UTF-8 output");
    let start = line.rfind("\"value\":").expect("value key is present") + "\"value\":".len();
    line[start..].trim_end_matches('\n').trim_end_matches('}').to_string()
}

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Unknown),
        Just(LogLevel::NoLevel),
        Just(LogLevel::Error),
        Just(LogLevel::Warn),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Parsing the rendered name yields the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        prop_assume!(level != LogLevel::Unknown);
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(format!("{}", level), level.to_str());
    }

    /// A level lets through exactly the entries at or below its verbosity
    #[test]
    fn test_log_level_enables(configured in any_level(), entry in any_level()) {
        let expected = configured > LogLevel::NoLevel
            && entry > LogLevel::NoLevel
            && (entry as u8) <= (configured as u8);
        prop_assert_eq!(configured.enables(entry), expected);
    }

    /// Upper-case spellings are rejected
    #[test]
    fn test_log_level_case_sensitive(name in "(ERROR|WARNING|INFO|DEBUG|NEVER)") {
        prop_assert!(name.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Merge Tests
// ============================================================================

proptest! {
    /// Merging keeps one field per name, the last value wins and the first position is kept
    #[test]
    fn test_merge_rule(pairs in prop::collection::vec(("[a-e]", any::<i64>()), 0..40)) {
        let mut entry = LogEntry::acquire("prop.merge", LogLevel::Info, "merge");
        let (head, tail) = pairs.split_at(pairs.len() / 2);
        entry.merge_fields(head.iter().map(|(k, v)| Field::int64(k.clone(), *v)));
        entry.merge_fields(tail.iter().map(|(k, v)| Field::int64(k.clone(), *v)));

        let mut order: Vec<&str> = Vec::new();
        for (key, _) in &pairs {
            if !order.contains(&key.as_str()) {
                order.push(key);
            }
        }
        let names: Vec<&str> = entry.fields().iter().map(|f| f.name()).collect();
        prop_assert_eq!(&names, &order);

        let record = encode(&entry);
        for key in order {
            let last = pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| *v);
            prop_assert_eq!(record[key].as_i64(), last);
        }
    }
}

// ============================================================================
// Encoding Tests
// ============================================================================

proptest! {
    /// Any message and string field survives JSON escaping unchanged
    #[test]
    fn test_string_roundtrip(message in any::<String>(), value in any::<String>()) {
        let mut entry = LogEntry::acquire("prop.strings", LogLevel::Warn, &message);
        entry.merge_fields([Field::string("value", value.clone())]);

        let record = encode(&entry);
        prop_assert_eq!(record["message"].as_str(), Some(message.as_str()));
        prop_assert_eq!(record["value"].as_str(), Some(value.as_str()));
        prop_assert_eq!(record["level"].as_str(), Some("warning"));
    }

    /// Arbitrary bytes always produce valid JSON; valid UTF-8 comes back intact
    #[test]
    fn test_byte_string_is_valid_json(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let decoded = encode_field(Field::byte_string("value", bytes.clone()));
        let text = decoded.as_str().expect("byte string renders as a string");
        if let Ok(original) = std::str::from_utf8(&bytes) {
            prop_assert_eq!(text, original);
        }
    }

    #[test]
    fn test_integer_roundtrip(signed in any::<i64>(), unsigned in any::<u64>(), small in any::<i16>()) {
        prop_assert_eq!(encode_field(Field::int64("value", signed)).as_i64(), Some(signed));
        prop_assert_eq!(encode_field(Field::uint64("value", unsigned)).as_u64(), Some(unsigned));
        prop_assert_eq!(encode_field(Field::int16("value", small)).as_i64(), Some(i64::from(small)));
    }

    /// Finite floats render as JSON numbers that parse back to the exact same value
    #[test]
    fn test_float_roundtrip(
        double in any::<f64>().prop_filter("finite", |v| v.is_finite()),
        single in any::<f32>().prop_filter("finite", |v| v.is_finite()),
    ) {
        let text = raw_value(Field::float64("value", double));
        prop_assert_eq!(text.parse::<f64>().ok(), Some(double), "{}", text);
        prop_assert!(encode_field(Field::float64("value", double)).is_number());

        let text = raw_value(Field::float32("value", single));
        prop_assert_eq!(text.parse::<f32>().ok(), Some(single), "{}", text);
        prop_assert!(encode_field(Field::float32("value", single)).is_number());
    }

    #[test]
    fn test_binary_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let decoded = encode_field(Field::binary("value", bytes.clone()));
        let raw = base64::engine::general_purpose::STANDARD
            .decode(decoded.as_str().expect("binary renders as a string"))
            .expect("binary is base64");
        prop_assert_eq!(raw, bytes);
    }

    /// Integer slices render as arrays in order
    #[test]
    fn test_ints_roundtrip(values in prop::collection::vec(any::<i32>(), 0..16)) {
        let decoded = encode_field(Field::int32s("value", &values));
        let items: Vec<i64> = decoded
            .as_array()
            .expect("slice renders as an array")
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        let expected: Vec<i64> = values.into_iter().map(i64::from).collect();
        prop_assert_eq!(items, expected);
    }
}

// ============================================================================
// Name Tests
// ============================================================================

proptest! {
    /// Upper-case field names are folded to lower case
    #[test]
    fn test_field_names_lowercase(name in "[A-Za-z][A-Za-z0-9_]{0,12}") {
        let field = Field::bool(name.clone(), true);
        prop_assert_eq!(field.name(), name.to_lowercase());
    }

    /// Dotted lower-case names are accepted by the logger grammar
    #[test]
    fn test_logger_names_valid(segments in prop::collection::vec("[a-z][a-z0-9_]{1,5}[a-z0-9]", 1..5)) {
        let name = segments.join(".");
        prop_assert!(rust_hierarchical_logger::core::is_logger_name_valid(&name));
        prop_assert!(!rust_hierarchical_logger::core::is_logger_name_valid(&name.to_uppercase()));
    }
}
