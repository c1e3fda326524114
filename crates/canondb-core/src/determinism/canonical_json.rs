//! Canonical JSON serialization.
//!
//! Output rules: object keys sorted in lexicographic byte order at every
//! nesting level, no whitespace between tokens, minimal string escaping,
//! UTF-8 encoded. The output is identical for any two in-memory
//! representations of the same logical value regardless of original key
//! order, which is what makes artifact hashing reproducible.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

use super::CanonicalError;

/// Maximum recursion depth, to keep canonicalization total on hostile
/// input.
pub const MAX_DEPTH: usize = 128;

/// Serializes a JSON value to canonical bytes.
///
/// # Errors
///
/// Returns [`CanonicalError::MaxDepthExceeded`] if the value nests deeper
/// than [`MAX_DEPTH`] levels.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    let mut output = String::new();
    emit_value(value, &mut output, 0)?;
    Ok(output.into_bytes())
}

/// Parses a JSON document and serializes it to canonical bytes.
///
/// Duplicate object keys are rejected rather than silently resolved.
///
/// # Errors
///
/// Returns [`CanonicalError::ParseError`] for malformed JSON,
/// [`CanonicalError::DuplicateKey`] for repeated object keys, and
/// [`CanonicalError::MaxDepthExceeded`] for over-deep nesting.
pub fn canonical_json_from_str(input: &str) -> Result<Vec<u8>, CanonicalError> {
    let value = parse_with_duplicate_detection(input)?;
    canonical_json_bytes(&value)
}

/// Parses JSON with duplicate key detection using serde's visitor pattern.
///
/// Duplicates are checked on decoded keys, so escape-sequence aliases such
/// as `"\u0061"` for `"a"` are caught as well.
fn parse_with_duplicate_detection(input: &str) -> Result<Value, CanonicalError> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    let value = ValueWithDuplicateCheck::deserialize(&mut deserializer).map_err(|e| {
        let msg = e.to_string();
        if msg.starts_with("duplicate key: ") {
            // serde_json appends " at line X column Y"; keep just the key.
            let key_with_location = msg.strip_prefix("duplicate key: ").unwrap_or("");
            let key = key_with_location
                .split(" at line ")
                .next()
                .unwrap_or(key_with_location)
                .to_string();
            CanonicalError::DuplicateKey { key }
        } else {
            CanonicalError::ParseError { message: msg }
        }
    })?;
    Ok(value.0)
}

/// Wrapper for JSON values that rejects duplicate keys during
/// deserialization.
struct ValueWithDuplicateCheck(Value);

impl<'de> Deserialize<'de> for ValueWithDuplicateCheck {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(v.into()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(v.into()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Number::from_f64(v)
                    .map(Value::Number)
                    .ok_or_else(|| de::Error::custom("invalid float value"))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
                Ok(Value::String(v))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element::<ValueWithDuplicateCheck>()? {
                    vec.push(elem.0);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut seen_keys = BTreeSet::new();
                let mut obj = Map::new();

                while let Some(key) = map.next_key::<String>()? {
                    if !seen_keys.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate key: {key}")));
                    }
                    let value = map.next_value::<ValueWithDuplicateCheck>()?;
                    obj.insert(key, value.0);
                }
                Ok(Value::Object(obj))
            }
        }

        deserializer
            .deserialize_any(ValueVisitor)
            .map(ValueWithDuplicateCheck)
    }
}

/// Emits a JSON value in canonical form.
fn emit_value(value: &Value, output: &mut String, depth: usize) -> Result<(), CanonicalError> {
    if depth > MAX_DEPTH {
        return Err(CanonicalError::MaxDepthExceeded {
            max_depth: MAX_DEPTH,
        });
    }

    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            // serde_json renders integers in decimal and floats via
            // shortest-roundtrip formatting, both of which are stable
            // for a given value.
            let _ = write!(output, "{n}");
        },
        Value::String(s) => emit_string(s, output),
        Value::Array(arr) => {
            output.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                emit_value(item, output, depth + 1)?;
            }
            output.push(']');
        },
        Value::Object(obj) => emit_object(obj, output, depth)?,
    }
    Ok(())
}

/// Emits a string with minimal escaping.
///
/// Only the quotation mark, reverse solidus, and control characters
/// U+0000 through U+001F are escaped; short escapes are used where
/// defined.
fn emit_string(s: &str, output: &mut String) {
    output.push('"');
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if ('\u{0000}'..='\u{001F}').contains(&c) => {
                let _ = write!(output, "\\u{:04x}", c as u32);
            },
            c => output.push(c),
        }
    }
    output.push('"');
}

/// Emits an object with keys sorted in lexicographic byte order.
fn emit_object(
    obj: &Map<String, Value>,
    output: &mut String,
    depth: usize,
) -> Result<(), CanonicalError> {
    let mut sorted_keys: Vec<&String> = obj.keys().collect();
    sorted_keys.sort();

    output.push('{');
    for (i, key) in sorted_keys.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        emit_string(key, output);
        output.push(':');
        emit_value(&obj[*key], output, depth + 1)?;
    }
    output.push('}');
    Ok(())
}
