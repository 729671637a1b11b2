//! Datatype descriptors for dataset elements.

use derive_more::From;
use thiserror::Error;

/// The datatype of a dataset's elements.
///
/// Descriptors name the on-disk element type; they carry no layout details
/// beyond what a metadata snapshot reports. Exotic element types a container
/// cannot map onto this set surface as [`UnsupportedDataTypeError`] when the
/// datatype is read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
#[rustfmt::skip]
pub enum DataType {
    /// `bool` Boolean.
    Bool,
    /// `int8` Integer in `[-2^7, 2^7-1]`.
    Int8,
    /// `int16` Integer in `[-2^15, 2^15-1]`.
    Int16,
    /// `int32` Integer in `[-2^31, 2^31-1]`.
    Int32,
    /// `int64` Integer in `[-2^63, 2^63-1]`.
    Int64,
    /// `uint8` Integer in `[0, 2^8-1]`.
    UInt8,
    /// `uint16` Integer in `[0, 2^16-1]`.
    UInt16,
    /// `uint32` Integer in `[0, 2^32-1]`.
    UInt32,
    /// `uint64` Integer in `[0, 2^64-1]`.
    UInt64,
    /// `float32` IEEE 754 single-precision floating point.
    Float32,
    /// `float64` IEEE 754 double-precision floating point.
    Float64,
    /// A UTF-8 encoded string.
    String,
    /// Variable-sized binary data.
    Binary,
    /// A compound element with named fields.
    Compound,
    /// A reference to another object in the container.
    Reference,
}

/// An unsupported data type error.
#[derive(Debug, Error, From)]
#[error("unsupported data type {0}")]
pub struct UnsupportedDataTypeError(String);

impl DataType {
    /// Returns the identifier.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Compound => "compound",
            Self::Reference => "reference",
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl core::str::FromStr for DataType {
    type Err = UnsupportedDataTypeError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        match descriptor {
            "bool" => Ok(Self::Bool),
            "int8" => Ok(Self::Int8),
            "int16" => Ok(Self::Int16),
            "int32" => Ok(Self::Int32),
            "int64" => Ok(Self::Int64),
            "uint8" => Ok(Self::UInt8),
            "uint16" => Ok(Self::UInt16),
            "uint32" => Ok(Self::UInt32),
            "uint64" => Ok(Self::UInt64),
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            "string" => Ok(Self::String),
            "binary" => Ok(Self::Binary),
            "compound" => Ok(Self::Compound),
            "reference" => Ok(Self::Reference),
            _ => Err(UnsupportedDataTypeError(descriptor.to_string())),
        }
    }
}

impl TryFrom<&str> for DataType {
    type Error = UnsupportedDataTypeError;

    fn try_from(descriptor: &str) -> Result<Self, Self::Error> {
        descriptor.parse()
    }
}
