//! Argument values.
//!
//! [`ArgValue`] is the closed set of value kinds a parameter can accept.
//! Reading a value back out with the wrong Rust type is a programmer error
//! and panics (see [`FromArgValue`]).

use crate::data::DataPath;
use crate::types::DataType;
use serde_json::Value as Json;

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    IntVec(Vec<i64>),
    FloatVec(Vec<f64>),
    StringVec(Vec<String>),
    Path(DataPath),
    PathVec(Vec<DataPath>),
    /// Index into a parameter's list of choices.
    Choice(usize),
    DataType(DataType),
}

/// Discriminant of [`ArgValue`], declared by every parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    IntVec,
    FloatVec,
    StringVec,
    Path,
    PathVec,
    Choice,
    DataType,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl ArgValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ArgValue::Bool(_) => ValueKind::Bool,
            ArgValue::Int(_) => ValueKind::Int,
            ArgValue::Float(_) => ValueKind::Float,
            ArgValue::String(_) => ValueKind::String,
            ArgValue::IntVec(_) => ValueKind::IntVec,
            ArgValue::FloatVec(_) => ValueKind::FloatVec,
            ArgValue::StringVec(_) => ValueKind::StringVec,
            ArgValue::Path(_) => ValueKind::Path,
            ArgValue::PathVec(_) => ValueKind::PathVec,
            ArgValue::Choice(_) => ValueKind::Choice,
            ArgValue::DataType(_) => ValueKind::DataType,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&DataPath> {
        match self {
            ArgValue::Path(v) => Some(v),
            _ => None,
        }
    }

    /// Default JSON encoding of the value.
    pub fn to_json(&self) -> Json {
        match self {
            ArgValue::Bool(v) => Json::from(*v),
            ArgValue::Int(v) => Json::from(*v),
            ArgValue::Float(v) => float_to_json(*v),
            ArgValue::String(v) => Json::from(v.as_str()),
            ArgValue::IntVec(v) => Json::from(v.clone()),
            ArgValue::FloatVec(v) => Json::Array(v.iter().map(|f| float_to_json(*f)).collect()),
            ArgValue::StringVec(v) => Json::from(v.clone()),
            ArgValue::Path(v) => Json::from(v.to_string()),
            ArgValue::PathVec(v) => Json::Array(v.iter().map(|p| Json::from(p.to_string())).collect()),
            ArgValue::Choice(v) => Json::from(*v as u64),
            ArgValue::DataType(v) => Json::from(v.to_string()),
        }
    }

    /// Decode a value of `kind` from its default JSON encoding.
    pub fn from_json(kind: ValueKind, json: &Json) -> Result<ArgValue, String> {
        let mismatch = || format!("Expected {} value, got {}", kind, json);
        let value = match kind {
            ValueKind::Bool => ArgValue::Bool(json.as_bool().ok_or_else(mismatch)?),
            ValueKind::Int => ArgValue::Int(json.as_i64().ok_or_else(mismatch)?),
            ValueKind::Float => ArgValue::Float(float_from_json(json).ok_or_else(mismatch)?),
            ValueKind::String => ArgValue::String(json.as_str().ok_or_else(mismatch)?.to_string()),
            ValueKind::IntVec => ArgValue::IntVec(
                json_array(json)
                    .ok_or_else(mismatch)?
                    .iter()
                    .map(|v| v.as_i64().ok_or_else(mismatch))
                    .collect::<Result<_, _>>()?,
            ),
            ValueKind::FloatVec => ArgValue::FloatVec(
                json_array(json)
                    .ok_or_else(mismatch)?
                    .iter()
                    .map(|v| float_from_json(v).ok_or_else(mismatch))
                    .collect::<Result<_, _>>()?,
            ),
            ValueKind::StringVec => ArgValue::StringVec(
                json_array(json)
                    .ok_or_else(mismatch)?
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).ok_or_else(mismatch))
                    .collect::<Result<_, _>>()?,
            ),
            ValueKind::Path => ArgValue::Path(parse_path(json).ok_or_else(mismatch)??),
            ValueKind::PathVec => ArgValue::PathVec(
                json_array(json)
                    .ok_or_else(mismatch)?
                    .iter()
                    .map(|v| parse_path(v).ok_or_else(mismatch)?)
                    .collect::<Result<_, _>>()?,
            ),
            ValueKind::Choice => {
                let index = json.as_u64().ok_or_else(mismatch)?;
                ArgValue::Choice(usize::try_from(index).map_err(|_| mismatch())?)
            }
            ValueKind::DataType => {
                let name = json.as_str().ok_or_else(mismatch)?;
                ArgValue::DataType(
                    DataType::from_name(name)
                        .ok_or_else(|| format!("Unknown data type '{}'", name))?,
                )
            }
        };
        Ok(value)
    }
}

/// JSON numbers cannot hold NaN or the infinities, so those are written as
/// the strings `"NaN"`, `"inf"` and `"-inf"`.
fn float_to_json(value: f64) -> Json {
    if value.is_nan() {
        Json::from("NaN")
    } else if value.is_infinite() {
        Json::from(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        Json::from(value)
    }
}

fn float_from_json(json: &Json) -> Option<f64> {
    match json.as_str() {
        Some("NaN") => Some(f64::NAN),
        Some("inf") => Some(f64::INFINITY),
        Some("-inf") => Some(f64::NEG_INFINITY),
        Some(_) => None,
        None => json.as_f64(),
    }
}

fn json_array(json: &Json) -> Option<&Vec<Json>> {
    json.as_array()
}

fn parse_path(json: &Json) -> Option<Result<DataPath, String>> {
    json.as_str()
        .map(|text| DataPath::parse(text).map_err(|e| e.to_string()))
}

macro_rules! impl_from_for_arg {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    ArgValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_arg! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => String,
    Vec<i64> => IntVec,
    Vec<f64> => FloatVec,
    Vec<String> => StringVec,
    DataPath => Path,
    Vec<DataPath> => PathVec,
    DataType => DataType,
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value as i64)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

/// Typed extraction out of an [`ArgValue`].
///
/// `usize` reads a [`ArgValue::Choice`] index.
pub trait FromArgValue: Sized {
    const KIND: ValueKind;

    fn from_arg(value: &ArgValue) -> Option<Self>;
}

macro_rules! impl_from_arg_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromArgValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_arg(value: &ArgValue) -> Option<Self> {
                    match value {
                        ArgValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_arg_value! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => String,
    Vec<i64> => IntVec,
    Vec<f64> => FloatVec,
    Vec<String> => StringVec,
    DataPath => Path,
    Vec<DataPath> => PathVec,
    usize => Choice,
    DataType => DataType,
}
