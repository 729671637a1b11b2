//! Canonical snapshot serialization.
//!
//! Both output paths ride the same `Serialize` implementations — values were
//! normalized once, at extraction — so the text and the in-memory structure
//! can never diverge.

use serde::Serialize;

/// Render `value` as canonical pretty-printed JSON text: 4-space
/// indentation, `,` and `: ` separators, deterministic field order.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if `value` fails to serialize.
#[allow(clippy::missing_panics_doc)]
pub fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json writes valid UTF-8"))
}

/// Convert `value` into an in-memory tree of only JSON-native types
/// (mappings, sequences, strings, numbers, booleans, null).
///
/// Applies the same rules as [`to_json_text`]: re-serializing the result
/// yields byte-identical text.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if `value` fails to serialize.
pub fn to_plain_structure<T: Serialize>(value: &T) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(value)
}
