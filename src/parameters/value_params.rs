//! Self-contained value parameters.

use crate::filter::{codes, FilterError};
use crate::parameters::parameter::{impl_parameter, unexpected_kind, ParameterInfo, ValueParameter};
use crate::parameters::value::ArgValue;
use crate::types::DataType;

fn invalid(info: &ParameterInfo, code: i32, message: String) -> FilterError {
    FilterError::validation(code, format!("{}: {}", info.human_name, message))
}

// ─── Bool ────────────────────────────────────────────────────────────────────

pub struct BoolParameter {
    info: ParameterInfo,
    default: bool,
}

impl BoolParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: bool,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
        }
    }
}

impl_parameter!(BoolParameter, Bool, Value, |p| ArgValue::Bool(p.default));

impl ValueParameter for BoolParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        match value {
            ArgValue::Bool(_) => Ok(()),
            other => unexpected_kind(&self.info.name, other),
        }
    }
}

// ─── Integer ─────────────────────────────────────────────────────────────────

/// Integer with an optional inclusive range.
pub struct IntegerParameter {
    info: ParameterInfo,
    default: i64,
    range: Option<(i64, i64)>,
}

impl IntegerParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: i64,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            range: None,
        }
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        assert!(min <= max, "invalid range [{}, {}]", min, max);
        self.range = Some((min, max));
        self
    }
}

impl_parameter!(IntegerParameter, Int, Value, |p| ArgValue::Int(p.default));

impl ValueParameter for IntegerParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::Int(v) = value else {
            unexpected_kind(&self.info.name, value)
        };
        match self.range {
            Some((min, max)) if *v < min || *v > max => Err(invalid(
                &self.info,
                codes::VALUE_OUT_OF_RANGE,
                format!("Value {} is outside [{}, {}]", v, min, max),
            )),
            _ => Ok(()),
        }
    }
}

// ─── Float ───────────────────────────────────────────────────────────────────

/// Finite float with an optional inclusive range.
pub struct FloatParameter {
    info: ParameterInfo,
    default: f64,
    range: Option<(f64, f64)>,
}

impl FloatParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: f64,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            range: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        assert!(min <= max, "invalid range [{}, {}]", min, max);
        self.range = Some((min, max));
        self
    }
}

impl_parameter!(FloatParameter, Float, Value, |p| ArgValue::Float(p.default));

impl ValueParameter for FloatParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::Float(v) = value else {
            unexpected_kind(&self.info.name, value)
        };
        if !v.is_finite() {
            return Err(invalid(
                &self.info,
                codes::VALUE_OUT_OF_RANGE,
                format!("Value {} is not finite", v),
            ));
        }
        match self.range {
            Some((min, max)) if *v < min || *v > max => Err(invalid(
                &self.info,
                codes::VALUE_OUT_OF_RANGE,
                format!("Value {} is outside [{}, {}]", v, min, max),
            )),
            _ => Ok(()),
        }
    }
}

// ─── String ──────────────────────────────────────────────────────────────────

pub struct StringParameter {
    info: ParameterInfo,
    default: String,
    allow_empty: bool,
}

impl StringParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default: default.into(),
            allow_empty: true,
        }
    }

    pub fn non_empty(mut self) -> Self {
        self.allow_empty = false;
        self
    }
}

impl_parameter!(StringParameter, String, Value, |p| ArgValue::String(p.default.clone()));

impl ValueParameter for StringParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::String(v) = value else {
            unexpected_kind(&self.info.name, value)
        };
        if !self.allow_empty && v.is_empty() {
            return Err(invalid(
                &self.info,
                codes::EMPTY_VALUE,
                "Value must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Choices ─────────────────────────────────────────────────────────────────

/// Index into a fixed list of labels.
pub struct ChoicesParameter {
    info: ParameterInfo,
    default: usize,
    choices: Vec<String>,
}

impl ChoicesParameter {
    pub fn new<I, S>(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: usize,
        choices: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        assert!(
            default < choices.len(),
            "default choice {} out of {} choices",
            default,
            choices.len()
        );
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            choices,
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl_parameter!(ChoicesParameter, Choice, Value, |p| ArgValue::Choice(p.default));

impl ValueParameter for ChoicesParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::Choice(index) = value else {
            unexpected_kind(&self.info.name, value)
        };
        if *index >= self.choices.len() {
            return Err(invalid(
                &self.info,
                codes::INVALID_CHOICE,
                format!(
                    "Choice {} is out of range, {} choices available",
                    index,
                    self.choices.len()
                ),
            ));
        }
        Ok(())
    }
}

// ─── Vectors ─────────────────────────────────────────────────────────────────

/// Length rule for vector parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
enum VectorLength {
    /// One value per named component.
    Fixed(Vec<String>),
    /// Any non-zero number of values.
    Variable,
}

impl VectorLength {
    fn check(&self, info: &ParameterInfo, len: usize) -> Result<(), FilterError> {
        match self {
            VectorLength::Fixed(names) if names.len() != len => Err(invalid(
                info,
                codes::WRONG_LENGTH,
                format!("Expected {} values ({}), got {}", names.len(), names.join(", "), len),
            )),
            VectorLength::Variable if len == 0 => Err(invalid(
                info,
                codes::WRONG_LENGTH,
                "At least one value is required".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Integer vector with named components.
pub struct IntVectorParameter {
    info: ParameterInfo,
    default: Vec<i64>,
    length: VectorLength,
    min: Option<i64>,
}

impl IntVectorParameter {
    /// Fixed-length vector; `names` labels each component.
    pub fn new<I, S>(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: Vec<i64>,
        names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert_eq!(default.len(), names.len(), "default does not match component names");
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            length: VectorLength::Fixed(names),
            min: None,
        }
    }

    /// Vector of any non-zero length.
    pub fn variable(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: Vec<i64>,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            length: VectorLength::Variable,
            min: None,
        }
    }

    /// Lower bound applied to every component.
    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }
}

impl_parameter!(IntVectorParameter, IntVec, Value, |p| ArgValue::IntVec(p.default.clone()));

impl ValueParameter for IntVectorParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::IntVec(values) = value else {
            unexpected_kind(&self.info.name, value)
        };
        self.length.check(&self.info, values.len())?;
        if let Some(min) = self.min {
            if let Some(v) = values.iter().find(|v| **v < min) {
                return Err(invalid(
                    &self.info,
                    codes::VALUE_OUT_OF_RANGE,
                    format!("Value {} is below the minimum {}", v, min),
                ));
            }
        }
        Ok(())
    }
}

/// Float vector with named components.
pub struct FloatVectorParameter {
    info: ParameterInfo,
    default: Vec<f64>,
    length: VectorLength,
}

impl FloatVectorParameter {
    pub fn new<I, S>(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: Vec<f64>,
        names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert_eq!(default.len(), names.len(), "default does not match component names");
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            length: VectorLength::Fixed(names),
        }
    }
}

impl_parameter!(FloatVectorParameter, FloatVec, Value, |p| ArgValue::FloatVec(p.default.clone()));

impl ValueParameter for FloatVectorParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::FloatVec(values) = value else {
            unexpected_kind(&self.info.name, value)
        };
        self.length.check(&self.info, values.len())?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid(
                &self.info,
                codes::VALUE_OUT_OF_RANGE,
                "All values must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Numeric type ────────────────────────────────────────────────────────────

/// Element type selection; booleans are not numeric.
pub struct NumericTypeParameter {
    info: ParameterInfo,
    default: DataType,
}

impl NumericTypeParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataType,
    ) -> Self {
        assert!(default != DataType::Boolean, "boolean is not a numeric type");
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
        }
    }
}

impl_parameter!(NumericTypeParameter, DataType, Value, |p| ArgValue::DataType(p.default));

impl ValueParameter for NumericTypeParameter {
    fn validate(&self, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::DataType(data_type) = value else {
            unexpected_kind(&self.info.name, value)
        };
        if *data_type == DataType::Boolean {
            return Err(invalid(
                &self.info,
                codes::WRONG_DATA_TYPE,
                "boolean is not a numeric type".to_string(),
            ));
        }
        Ok(())
    }
}
