//! Container-native values and their normalization to JSON.
//!
//! A [`NativeValue`] models the scalar and array values a container can hand
//! to the metadata collector: attribute values and fully materialized dataset
//! values. [`normalize`] converts a native value into a
//! [`serde_json::Value`] under a closed, documented set of rules, so the
//! textual and the in-memory snapshot outputs can never disagree about a
//! leaf value.

mod data_type;

pub use data_type::{DataType, UnsupportedDataTypeError};

use thiserror::Error;

/// A container-native scalar or array value.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    /// A boolean value.
    Bool(bool),
    /// A signed integer, up to 64 bits wide.
    Int(i64),
    /// An unsigned integer, up to 64 bits wide.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A text value.
    Text(String),
    /// A byte string, as containers store fixed- and variable-length text.
    Bytes(Vec<u8>),
    /// A value with no direct representation (compound elements, object
    /// references, exotic scalar types). Carries the container's type label
    /// and a human-readable rendition of the value.
    Opaque {
        /// The container's label for the value's type.
        type_name: String,
        /// A human-readable rendition of the value.
        repr: String,
    },
    /// An array of values, nested for multidimensional data. Element order is
    /// preserved; the shape is reported separately by the dataset record.
    Array(Vec<NativeValue>),
}

/// A byte string that is not valid UTF-8 text.
#[derive(Debug, Error)]
#[error("byte string is not valid UTF-8 text: {0}")]
pub struct DecodeError(#[from] std::string::FromUtf8Error);

/// A document value with no container-native counterpart.
#[derive(Debug, Error)]
#[error("unsupported document value: {0}")]
pub struct UnsupportedValueError(String);

impl NativeValue {
    /// The category label of the value: one of `bool`, `int`, `uint`,
    /// `float`, `string`, `binary`, `opaque`, or `array`.
    ///
    /// Snapshot records carry this label next to a normalized dataset value,
    /// which keeps the lossy [`NativeValue::Opaque`] fallback of
    /// [`normalize`] distinguishable from a genuinely string-valued dataset.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Bytes(_) => "binary",
            Self::Opaque { .. } => "opaque",
            Self::Array(_) => "array",
        }
    }

    /// Convert a container document value into a native value.
    ///
    /// Booleans, numbers, strings, and arrays map directly. Byte strings are
    /// written as `{"binary": "0x.."}` with a hex payload, so byte values
    /// that are not valid UTF-8 remain expressible. Opaque values are written
    /// as `{"opaque": {"type": .., "repr": ..}}`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedValueError`] for `null`, malformed hex payloads,
    /// and objects not matching one of the forms above.
    pub fn from_document(value: &serde_json::Value) -> Result<Self, UnsupportedValueError> {
        match value {
            serde_json::Value::Null => Err(UnsupportedValueError("null".to_string())),
            serde_json::Value::Bool(boolean) => Ok(Self::Bool(*boolean)),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(Self::Int(int))
                } else if let Some(uint) = number.as_u64() {
                    Ok(Self::UInt(uint))
                } else if let Some(float) = number.as_f64() {
                    Ok(Self::Float(float))
                } else {
                    Err(UnsupportedValueError(number.to_string()))
                }
            }
            serde_json::Value::String(text) => Ok(Self::Text(text.clone())),
            serde_json::Value::Array(elements) => Ok(Self::Array(
                elements
                    .iter()
                    .map(Self::from_document)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            serde_json::Value::Object(map) => Self::from_document_object(map),
        }
    }

    fn from_document_object(
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, UnsupportedValueError> {
        if map.len() == 1 {
            if let Some(serde_json::Value::String(hex)) = map.get("binary") {
                return hex_string_to_bytes(hex)
                    .map(Self::Bytes)
                    .ok_or_else(|| UnsupportedValueError(format!("binary payload {hex}")));
            }
            if let Some(serde_json::Value::Object(opaque)) = map.get("opaque") {
                if let (
                    Some(serde_json::Value::String(type_name)),
                    Some(serde_json::Value::String(repr)),
                ) = (opaque.get("type"), opaque.get("repr"))
                {
                    return Ok(Self::Opaque {
                        type_name: type_name.clone(),
                        repr: repr.clone(),
                    });
                }
            }
        }
        Err(UnsupportedValueError(
            serde_json::Value::Object(map.clone()).to_string(),
        ))
    }
}

/// Normalize a container-native value into a JSON value.
///
/// Rules, applied in order:
/// 1. Signed and unsigned 64-bit integers become JSON numbers. They are never
///    stringified or truncated; consumers restricted to IEEE 754 doubles lose
///    exactness above 2^53, a documented limitation of the output format.
/// 2. Byte strings are decoded as UTF-8 text. Invalid UTF-8 is a
///    [`DecodeError`], never silently dropped.
/// 3. Opaque values fall back to their human-readable `repr` string. This is
///    lossy; the accompanying `value_kind` field of a dataset record
///    identifies it as a fallback (see [`NativeValue::kind_label`]).
/// 4. Arrays are normalized element-wise, recursively, preserving order.
///
/// Non-finite floats have no JSON number form and normalize to the strings
/// `"Infinity"`, `"-Infinity"`, and `"NaN"`.
///
/// # Errors
///
/// Returns [`DecodeError`] if a byte string is not valid UTF-8 text.
pub fn normalize(value: &NativeValue) -> Result<serde_json::Value, DecodeError> {
    match value {
        NativeValue::Bool(boolean) => Ok(serde_json::Value::Bool(*boolean)),
        NativeValue::Int(int) => Ok(serde_json::Value::Number((*int).into())),
        NativeValue::UInt(uint) => Ok(serde_json::Value::Number((*uint).into())),
        NativeValue::Float(float) => Ok(serde_json::Number::from_f64(*float)
            .map_or_else(|| non_finite_to_string(*float), serde_json::Value::Number)),
        NativeValue::Text(text) => Ok(serde_json::Value::String(text.clone())),
        NativeValue::Bytes(bytes) => Ok(serde_json::Value::String(String::from_utf8(
            bytes.clone(),
        )?)),
        NativeValue::Opaque { repr, .. } => Ok(serde_json::Value::String(repr.clone())),
        NativeValue::Array(elements) => Ok(serde_json::Value::Array(
            elements.iter().map(normalize).collect::<Result<_, _>>()?,
        )),
    }
}

fn non_finite_to_string(float: f64) -> serde_json::Value {
    let string = if float.is_nan() {
        "NaN"
    } else if float > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    };
    serde_json::Value::String(string.to_string())
}

fn hex_string_to_bytes(s: &str) -> Option<Vec<u8>> {
    if s.starts_with("0x") && s.len() % 2 == 0 {
        (2..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
            .collect::<Result<Vec<_>, _>>()
            .ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wide_integers() {
        assert_eq!(
            normalize(&NativeValue::Int(i64::MAX)).unwrap(),
            serde_json::json!(9_223_372_036_854_775_807_i64)
        );
        assert_eq!(
            normalize(&NativeValue::UInt(u64::MAX)).unwrap(),
            serde_json::json!(18_446_744_073_709_551_615_u64)
        );
    }

    #[test]
    fn normalize_bytes() {
        assert_eq!(
            normalize(&NativeValue::Bytes(b"hi".to_vec())).unwrap(),
            serde_json::json!("hi")
        );
        let err = normalize(&NativeValue::Bytes(vec![0xff, 0xfe])).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn normalize_opaque_fallback() {
        let value = NativeValue::Opaque {
            type_name: "region_reference".to_string(),
            repr: "<region reference 0x30>".to_string(),
        };
        assert_eq!(value.kind_label(), "opaque");
        assert_eq!(
            normalize(&value).unwrap(),
            serde_json::json!("<region reference 0x30>")
        );
    }

    #[test]
    fn normalize_nested_array() {
        let value = NativeValue::Array(vec![
            NativeValue::Array(vec![NativeValue::Int(1), NativeValue::Int(2)]),
            NativeValue::Array(vec![NativeValue::Int(3), NativeValue::Int(4)]),
        ]);
        assert_eq!(normalize(&value).unwrap(), serde_json::json!([[1, 2], [3, 4]]));
    }

    #[test]
    fn normalize_non_finite_floats() {
        assert_eq!(
            normalize(&NativeValue::Float(f64::NAN)).unwrap(),
            serde_json::json!("NaN")
        );
        assert_eq!(
            normalize(&NativeValue::Float(f64::NEG_INFINITY)).unwrap(),
            serde_json::json!("-Infinity")
        );
    }

    #[test]
    fn from_document_scalars() {
        assert_eq!(
            NativeValue::from_document(&serde_json::json!(42)).unwrap(),
            NativeValue::Int(42)
        );
        assert_eq!(
            NativeValue::from_document(&serde_json::json!(18_446_744_073_709_551_615_u64))
                .unwrap(),
            NativeValue::UInt(u64::MAX)
        );
        assert_eq!(
            NativeValue::from_document(&serde_json::json!(0.5)).unwrap(),
            NativeValue::Float(0.5)
        );
        assert_eq!(
            NativeValue::from_document(&serde_json::json!("hi")).unwrap(),
            NativeValue::Text("hi".to_string())
        );
        assert!(NativeValue::from_document(&serde_json::Value::Null).is_err());
    }

    #[test]
    fn from_document_binary() {
        assert_eq!(
            NativeValue::from_document(&serde_json::json!({"binary": "0xfffe"})).unwrap(),
            NativeValue::Bytes(vec![0xff, 0xfe])
        );
        assert!(NativeValue::from_document(&serde_json::json!({"binary": "zz"})).is_err());
    }

    #[test]
    fn from_document_opaque() {
        assert_eq!(
            NativeValue::from_document(
                &serde_json::json!({"opaque": {"type": "compound", "repr": "(1, 2.5)"}})
            )
            .unwrap(),
            NativeValue::Opaque {
                type_name: "compound".to_string(),
                repr: "(1, 2.5)".to_string(),
            }
        );
        assert!(NativeValue::from_document(&serde_json::json!({"unknown": 1})).is_err());
    }
}
