//! Parameter declarations, argument values and their validation.
//!
//! # Module Structure
//!
//! - [`value`] - `ArgValue`, the closed set of argument value kinds
//! - [`arguments`] - `Arguments`, the key → value bag
//! - [`parameter`] - descriptor traits
//! - [`collection`] - `Parameters`, ordered declarations with group links
//! - [`value_params`] / [`data_params`] - the descriptor catalog

pub mod arguments;
pub mod collection;
pub mod data_params;
pub mod parameter;
pub mod value;
pub mod value_params;

pub use arguments::Arguments;
pub use collection::Parameters;
pub use data_params::{
    ArrayCreationParameter, ArraySelectionParameter, DataGroupCreationParameter,
    DataGroupSelectionParameter, DataPathSelectionParameter, GeometrySelectionParameter,
    MultiArraySelectionParameter,
};
pub use parameter::{DataParameter, Parameter, ParameterInfo, ParameterKind, ValueParameter};
pub use value::{ArgValue, FromArgValue, ValueKind};
pub use value_params::{
    BoolParameter, ChoicesParameter, FloatParameter, FloatVectorParameter, IntVectorParameter,
    IntegerParameter, NumericTypeParameter, StringParameter,
};
