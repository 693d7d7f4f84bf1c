//! Diagnostics and result types shared by parameters, actions and filters.
//!
//! Recoverable problems are [`FilterError`]s with a numeric code; non-fatal
//! notes are [`Warning`]s. Warnings are always carried alongside the result
//! in an [`Outcome`], whether the operation succeeded or not.

use crate::actions::OutputActions;
use crate::data::StructureError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric diagnostic codes.
pub mod codes {
    pub const CANCELLED: i32 = -1;

    // Arguments and parameters
    pub const UNKNOWN_ARGUMENT: i32 = -10;
    pub const MISSING_JSON_KEY: i32 = -11;
    pub const UNKNOWN_JSON_KEY: i32 = -12;
    pub const INVALID_JSON: i32 = -13;
    pub const ARGUMENT_IGNORED: i32 = -14;
    pub const VALUE_OUT_OF_RANGE: i32 = -100;
    pub const EMPTY_VALUE: i32 = -101;
    pub const WRONG_LENGTH: i32 = -102;
    pub const INVALID_CHOICE: i32 = -103;
    pub const PATH_NOT_FOUND: i32 = -110;
    pub const PATH_EXISTS: i32 = -111;
    pub const WRONG_OBJECT_KIND: i32 = -112;
    pub const WRONG_DATA_TYPE: i32 = -113;
    pub const WRONG_COMPONENT_SHAPE: i32 = -114;
    pub const TUPLE_COUNT_MISMATCH: i32 = -115;
    pub const INVALID_VALUE: i32 = -116;

    // Structural actions
    pub const ACTION_FAILED: i32 = -200;
    pub const DEFERRED_ACTION_FAILED: i32 = -201;

    // Post-execute checks
    pub const STRUCTURE_INVALID: i32 = -300;

    // Filter bodies
    pub const EXECUTION_FAILED: i32 = -400;
}

/// A fatal diagnostic reported by preflight or execute.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum FilterError {
    /// A parameter value violates its own constraint or its data target.
    #[error("[{code}] {message}")]
    Validation { code: i32, message: String },

    /// An action would create a conflicting or invalid object, or the store
    /// broke an invariant after execute.
    #[error("[{code}] {message}")]
    Structural { code: i32, message: String },

    /// The filter body failed.
    #[error("[{code}] {message}")]
    Execution { code: i32, message: String },

    #[error("[{}] Filter was cancelled", codes::CANCELLED)]
    Cancelled,
}

impl FilterError {
    pub fn validation(code: i32, message: impl Into<String>) -> Self {
        FilterError::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn structural(code: i32, message: impl Into<String>) -> Self {
        FilterError::Structural {
            code,
            message: message.into(),
        }
    }

    pub fn execution(code: i32, message: impl Into<String>) -> Self {
        FilterError::Execution {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            FilterError::Validation { code, .. }
            | FilterError::Structural { code, .. }
            | FilterError::Execution { code, .. } => *code,
            FilterError::Cancelled => codes::CANCELLED,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FilterError::Validation { message, .. }
            | FilterError::Structural { message, .. }
            | FilterError::Execution { message, .. } => message,
            FilterError::Cancelled => "Filter was cancelled",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FilterError::Cancelled)
    }
}

impl From<StructureError> for FilterError {
    fn from(err: StructureError) -> Self {
        FilterError::structural(codes::ACTION_FAILED, err.to_string())
    }
}

/// A non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: i32,
    pub message: String,
}

impl Warning {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// A result plus the warnings gathered while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub result: Result<T, Vec<FilterError>>,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            result: Ok(value),
            warnings: Vec::new(),
        }
    }

    pub fn err(errors: Vec<FilterError>) -> Self {
        Self {
            result: Err(errors),
            warnings: Vec::new(),
        }
    }

    pub fn error(error: FilterError) -> Self {
        Self::err(vec![error])
    }

    pub fn cancelled() -> Self {
        Self::error(FilterError::Cancelled)
    }

    pub fn with_warning(mut self, warning: Warning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = Warning>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Put `warnings` in front of the ones already collected.
    pub fn prepend_warnings(mut self, mut warnings: Vec<Warning>) -> Self {
        warnings.append(&mut self.warnings);
        self.warnings = warnings;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn is_err(&self) -> bool {
        self.result.is_err()
    }

    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// Errors, empty on success.
    pub fn errors(&self) -> &[FilterError] {
        match &self.result {
            Ok(_) => &[],
            Err(errors) => errors,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            result: self.result.map(f),
            warnings: self.warnings,
        }
    }

    pub fn into_parts(self) -> (Result<T, Vec<FilterError>>, Vec<Warning>) {
        (self.result, self.warnings)
    }
}

impl<T> From<Result<T, FilterError>> for Outcome<T> {
    fn from(result: Result<T, FilterError>) -> Self {
        Self {
            result: result.map_err(|e| vec![e]),
            warnings: Vec::new(),
        }
    }
}

/// Informational value surfaced to callers (computed sizes, counts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreflightValue {
    pub name: String,
    pub value: String,
}

impl PreflightValue {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// Output of a filter's preflight.
#[derive(Debug, Clone, PartialEq)]
pub struct PreflightResult {
    pub output_actions: Outcome<OutputActions>,
    pub preflight_values: Vec<PreflightValue>,
}

impl PreflightResult {
    pub fn new(output_actions: Outcome<OutputActions>) -> Self {
        Self {
            output_actions,
            preflight_values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: PreflightValue) -> Self {
        self.preflight_values.push(value);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.output_actions.is_ok()
    }

    pub fn errors(&self) -> &[FilterError] {
        self.output_actions.errors()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.output_actions.warnings
    }
}

impl From<Outcome<OutputActions>> for PreflightResult {
    fn from(output_actions: Outcome<OutputActions>) -> Self {
        Self::new(output_actions)
    }
}

/// Output of a filter's execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteResult {
    pub result: Outcome<()>,
    pub output_values: Vec<PreflightValue>,
    /// Terminal state reached by the run. Set by the execute driver; values
    /// returned from a filter body are overwritten.
    pub state: FilterState,
}

impl ExecuteResult {
    pub fn ok() -> Self {
        Self::from(Outcome::ok(()))
    }

    pub fn with_value(mut self, value: PreflightValue) -> Self {
        self.output_values.push(value);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn errors(&self) -> &[FilterError] {
        self.result.errors()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.result.warnings
    }
}

impl From<Outcome<()>> for ExecuteResult {
    fn from(result: Outcome<()>) -> Self {
        let state = if result.is_ok() {
            FilterState::ExecuteSucceeded
        } else {
            FilterState::ExecuteFailed
        };
        Self {
            result,
            output_values: Vec::new(),
            state,
        }
    }
}

/// Lifecycle of one filter run.
///
/// ```text
/// Declared -> Preflighting -> PreflightFailed
///                          -> PreflightSucceeded -> Executing -> ExecuteFailed
///                                                             -> ExecuteSucceeded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterState {
    #[default]
    Declared,
    Preflighting,
    PreflightFailed,
    PreflightSucceeded,
    Executing,
    ExecuteFailed,
    ExecuteSucceeded,
}

impl FilterState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FilterState::PreflightFailed | FilterState::ExecuteFailed | FilterState::ExecuteSucceeded
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FilterState::PreflightFailed | FilterState::ExecuteFailed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: FilterState) -> bool {
        use FilterState::*;
        matches!(
            (self, next),
            (Declared, Preflighting)
                | (PreflightSucceeded, Preflighting)
                | (Preflighting, PreflightFailed)
                | (Preflighting, PreflightSucceeded)
                | (PreflightSucceeded, Executing)
                | (Executing, ExecuteFailed)
                | (Executing, ExecuteSucceeded)
        )
    }
}

impl std::fmt::Display for FilterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FilterError::validation(codes::PATH_NOT_FOUND, "missing");
        assert_eq!(err.code(), codes::PATH_NOT_FOUND);
        assert_eq!(err.to_string(), "[-110] missing");
        assert_eq!(FilterError::Cancelled.code(), codes::CANCELLED);
        assert!(FilterError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_outcome_warnings_survive_failure() {
        let outcome: Outcome<()> = Outcome::error(FilterError::Cancelled)
            .with_warning(Warning::new(1, "late"))
            .prepend_warnings(vec![Warning::new(0, "early")]);
        assert!(outcome.is_err());
        assert_eq!(outcome.errors().len(), 1);
        let codes: Vec<i32> = outcome.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![0, 1]);
    }

    #[test]
    fn test_state_transitions() {
        assert!(FilterState::Declared.can_transition_to(FilterState::Preflighting));
        assert!(FilterState::PreflightSucceeded.can_transition_to(FilterState::Executing));
        assert!(!FilterState::Declared.can_transition_to(FilterState::Executing));
        assert!(!FilterState::ExecuteSucceeded.can_transition_to(FilterState::Executing));
        assert!(FilterState::ExecuteFailed.is_terminal());
        assert!(!FilterState::PreflightSucceeded.is_terminal());
    }
}
