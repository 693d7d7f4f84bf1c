//! Core element types for FilterPipe-RS
//!
//! This module contains the element types stored in data arrays and the
//! helpers used to parse fill values and report sizes.
//!
//! # Main Types
//!
//! - [`DataType`] - Enum of supported array element types (int8, float32, etc.)
//!
//! # Element Types
//!
//! Supports the usual numeric element types:
//! - Signed integers: int8, int16, int32, int64
//! - Unsigned integers: uint8, uint16, uint32, uint64
//! - Floating point: float32, float64
//! - Boolean values

use serde::{Deserialize, Serialize};

/// Represents the element type of a data array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit floating point
    #[default]
    Float32,
    /// 64-bit floating point
    Float64,
    /// Boolean value
    Boolean,
}

impl DataType {
    /// Get all available element types.
    pub fn all() -> &'static [DataType] {
        &[
            DataType::Int8,
            DataType::Int16,
            DataType::Int32,
            DataType::Int64,
            DataType::UInt8,
            DataType::UInt16,
            DataType::UInt32,
            DataType::UInt64,
            DataType::Float32,
            DataType::Float64,
            DataType::Boolean,
        ]
    }

    /// Returns the size in bytes of one element of this type
    pub fn size_bytes(&self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 | DataType::Boolean => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(
            self,
            DataType::Float32 | DataType::Float64 | DataType::Boolean
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Check that `text` parses as a value of this type.
    ///
    /// Used when validating fill values of array creation without
    /// allocating any storage.
    pub fn check_value(&self, text: &str) -> Result<(), String> {
        let text = text.trim();
        let ok = match self {
            DataType::Int8 => text.parse::<i8>().is_ok(),
            DataType::Int16 => text.parse::<i16>().is_ok(),
            DataType::Int32 => text.parse::<i32>().is_ok(),
            DataType::Int64 => text.parse::<i64>().is_ok(),
            DataType::UInt8 => text.parse::<u8>().is_ok(),
            DataType::UInt16 => text.parse::<u16>().is_ok(),
            DataType::UInt32 => text.parse::<u32>().is_ok(),
            DataType::UInt64 => text.parse::<u64>().is_ok(),
            DataType::Float32 => text.parse::<f32>().is_ok(),
            DataType::Float64 => text.parse::<f64>().is_ok(),
            DataType::Boolean => parse_bool(text).is_some(),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("'{}' is not a valid {} value", text, self))
        }
    }

    /// Parse a type name as written by [`Display`](std::fmt::Display).
    pub fn from_name(name: &str) -> Option<DataType> {
        DataType::all()
            .iter()
            .copied()
            .find(|t| t.to_string().eq_ignore_ascii_case(name.trim()))
    }
}

/// Parse a boolean fill value ("true"/"false"/"1"/"0").
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int8 => write!(f, "int8"),
            DataType::Int16 => write!(f, "int16"),
            DataType::Int32 => write!(f, "int32"),
            DataType::Int64 => write!(f, "int64"),
            DataType::UInt8 => write!(f, "uint8"),
            DataType::UInt16 => write!(f, "uint16"),
            DataType::UInt32 => write!(f, "uint32"),
            DataType::UInt64 => write!(f, "uint64"),
            DataType::Float32 => write!(f, "float32"),
            DataType::Float64 => write!(f, "float64"),
            DataType::Boolean => write!(f, "boolean"),
        }
    }
}
