//! Parameter descriptor traits.
//!
//! Every descriptor implements [`Parameter`] and exactly one of the two
//! capability traits:
//! - [`ValueParameter`]: validates a value on its own
//! - [`DataParameter`]: validates a value against a read-only data store

use crate::data::DataStructure;
use crate::filter::FilterError;
use crate::parameters::value::{ArgValue, ValueKind};
use serde_json::Value as Json;

/// Which capability set a descriptor provides.
pub enum ParameterKind<'a> {
    Value(&'a dyn ValueParameter),
    Data(&'a dyn DataParameter),
}

/// Common descriptor interface.
pub trait Parameter: Send + Sync {
    /// Stable key the argument is stored under.
    fn name(&self) -> &str;

    fn human_name(&self) -> &str;

    fn help_text(&self) -> &str;

    /// The only value kind this parameter accepts.
    fn value_kind(&self) -> ValueKind;

    fn default_value(&self) -> ArgValue;

    /// Light normalisation applied while resolving arguments.
    fn construct(&self, value: ArgValue) -> ArgValue {
        value
    }

    fn to_json(&self, value: &ArgValue) -> Json {
        value.to_json()
    }

    fn from_json(&self, json: &Json) -> Result<ArgValue, String> {
        ArgValue::from_json(self.value_kind(), json)
    }

    fn kind(&self) -> ParameterKind<'_>;
}

pub trait ValueParameter: Parameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError>;
}

pub trait DataParameter: Parameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError>;
}

/// Name, label and help text shared by every descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub human_name: String,
    pub help_text: String,
}

impl ParameterInfo {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            human_name: human_name.into(),
            help_text: help_text.into(),
        }
    }
}

/// Implements the `Parameter` boilerplate for a descriptor holding an
/// `info: ParameterInfo` and a `default` field.
macro_rules! impl_parameter {
    ($ty:ty, $kind:ident, $capability:ident, |$this:ident| $default:expr) => {
        impl $crate::parameters::parameter::Parameter for $ty {
            fn name(&self) -> &str {
                &self.info.name
            }

            fn human_name(&self) -> &str {
                &self.info.human_name
            }

            fn help_text(&self) -> &str {
                &self.info.help_text
            }

            fn value_kind(&self) -> $crate::parameters::value::ValueKind {
                $crate::parameters::value::ValueKind::$kind
            }

            fn default_value(&self) -> $crate::parameters::value::ArgValue {
                let $this = self;
                $default
            }

            fn kind(&self) -> $crate::parameters::parameter::ParameterKind<'_> {
                $crate::parameters::parameter::ParameterKind::$capability(self)
            }
        }
    };
}

pub(crate) use impl_parameter;

/// Panic for a value whose kind the resolver should already have checked.
pub(crate) fn unexpected_kind(parameter: &str, value: &ArgValue) -> ! {
    panic!(
        "parameter '{}' was handed a {} value it does not accept",
        parameter,
        value.kind()
    )
}
