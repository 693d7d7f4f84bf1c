//! Ordered parameter declarations of one filter.
//!
//! Besides the descriptors themselves, [`Parameters`] records group links:
//! a *linkable* parameter can head a group, and dependent parameters are
//! only validated while a predicate over the resolved arguments holds.
//!
//! ```text
//! UseMask (Bool, group head)
//!   └── MaskArrayPath   active when UseMask == true
//! ```

use crate::data::DataStructure;
use crate::filter::{codes, FilterError, Outcome, Warning};
use crate::parameters::arguments::Arguments;
use crate::parameters::parameter::{Parameter, ParameterKind};
use crate::parameters::value::ArgValue;
use serde_json::{Map, Value as Json};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

type Predicate = Box<dyn Fn(&Arguments) -> bool + Send + Sync>;

/// Membership of a dependent parameter in a group.
struct GroupLink {
    head: String,
    /// Any predicate holding activates the dependent.
    predicates: Vec<Predicate>,
}

/// A filter's parameter declarations, in declaration order.
#[derive(Default)]
pub struct Parameters {
    entries: Vec<Box<dyn Parameter>>,
    group_heads: BTreeSet<String>,
    links: BTreeMap<String, GroupLink>,
}

impl std::fmt::Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameters")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("group_heads", &self.group_heads)
            .field(
                "links",
                &self
                    .links
                    .iter()
                    .map(|(child, link)| (child.as_str(), link.head.as_str()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter. Panics on a duplicate key.
    pub fn insert(&mut self, parameter: impl Parameter + 'static) {
        assert!(
            !self.contains(parameter.name()),
            "parameter '{}' is declared twice",
            parameter.name()
        );
        self.entries.push(Box::new(parameter));
    }

    /// Declare a parameter that may head a group.
    pub fn insert_linkable(&mut self, parameter: impl Parameter + 'static) {
        let name = parameter.name().to_string();
        self.insert(parameter);
        self.group_heads.insert(name);
    }

    /// Make `child` active only while the argument of `group` equals `value`.
    /// Linking the same child to the same group again adds an alternative.
    pub fn link_parameters(
        &mut self,
        group: &str,
        child: &str,
        value: impl Into<ArgValue>,
    ) {
        let value = value.into();
        let key = group.to_string();
        self.link_parameters_with(group, child, move |args| args.get(&key) == Some(&value));
    }

    /// Make `child` active only while `predicate` holds.
    pub fn link_parameters_with(
        &mut self,
        group: &str,
        child: &str,
        predicate: impl Fn(&Arguments) -> bool + Send + Sync + 'static,
    ) {
        assert!(
            self.group_heads.contains(group),
            "parameter '{}' was not declared linkable",
            group
        );
        assert!(self.contains(child), "cannot link unknown parameter '{}'", child);
        assert!(group != child, "parameter '{}' cannot depend on itself", child);
        assert!(
            !self.group_heads.contains(child),
            "group head '{}' cannot also be a dependent",
            child
        );
        let link = self
            .links
            .entry(child.to_string())
            .or_insert_with(|| GroupLink {
                head: group.to_string(),
                predicates: Vec::new(),
            });
        assert!(
            link.head == group,
            "parameter '{}' already belongs to group '{}'",
            child,
            link.head
        );
        link.predicates.push(Box::new(predicate));
    }

    pub fn get(&self, key: &str) -> Option<&dyn Parameter> {
        self.entries
            .iter()
            .find(|p| p.name() == key)
            .map(|p| p.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Parameter> {
        self.entries.iter().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_group_head(&self, key: &str) -> bool {
        self.group_heads.contains(key)
    }

    /// Head of the group `key` depends on, if any.
    pub fn group_of(&self, key: &str) -> Option<&str> {
        self.links.get(key).map(|link| link.head.as_str())
    }

    /// Whether `key` should be validated given resolved `args`.
    pub fn is_active(&self, key: &str, args: &Arguments) -> bool {
        match self.links.get(key) {
            Some(link) => link.predicates.iter().any(|p| p(args)),
            None => true,
        }
    }

    /// Resolve caller-supplied arguments against the declarations.
    ///
    /// Unknown keys are dropped with a warning, missing keys take their
    /// default, and every value goes through its parameter's `construct`.
    ///
    /// Panics if a supplied value has a kind the parameter does not accept.
    pub fn resolve(&self, supplied: &Arguments) -> (Arguments, Vec<Warning>) {
        let mut warnings = Vec::new();
        for key in supplied.keys() {
            if !self.contains(key) {
                warn!("Ignoring unknown argument '{}'", key);
                warnings.push(Warning::new(
                    codes::UNKNOWN_ARGUMENT,
                    format!("Argument '{}' does not match any parameter and was ignored", key),
                ));
            }
        }

        let resolved: Arguments = self
            .entries
            .iter()
            .map(|parameter| {
                let value = match supplied.get(parameter.name()) {
                    Some(value) => value.clone(),
                    None => {
                        debug!("Argument '{}' missing, using default", parameter.name());
                        parameter.default_value()
                    }
                };
                if value.kind() != parameter.value_kind() {
                    panic!(
                        "argument '{}' has kind {} but the parameter accepts {}",
                        parameter.name(),
                        value.kind(),
                        parameter.value_kind()
                    );
                }
                (parameter.name().to_string(), parameter.construct(value))
            })
            .collect();
        (resolved, warnings)
    }

    /// Validate resolved arguments.
    ///
    /// Group heads go first. A dependent is checked only when its head
    /// validated cleanly and one of its predicates holds.
    pub fn validate(&self, data: &DataStructure, args: &Arguments) -> Vec<FilterError> {
        let mut errors = Vec::new();
        let mut failed_heads = BTreeSet::new();

        let heads = self.entries.iter().filter(|p| self.is_group_head(p.name()));
        for parameter in heads {
            if let Err(e) = self.validate_one(parameter.as_ref(), data, args) {
                failed_heads.insert(parameter.name());
                errors.push(e);
            }
        }

        let others = self.entries.iter().filter(|p| !self.is_group_head(p.name()));
        for parameter in others {
            if let Some(link) = self.links.get(parameter.name()) {
                if failed_heads.contains(link.head.as_str()) || !self.is_active(parameter.name(), args) {
                    continue;
                }
            }
            if let Err(e) = self.validate_one(parameter.as_ref(), data, args) {
                errors.push(e);
            }
        }
        errors
    }

    fn validate_one(
        &self,
        parameter: &dyn Parameter,
        data: &DataStructure,
        args: &Arguments,
    ) -> Result<(), FilterError> {
        let Some(value) = args.get(parameter.name()) else {
            panic!(
                "argument '{}' is missing; arguments must be resolved before validation",
                parameter.name()
            );
        };
        match parameter.kind() {
            ParameterKind::Value(p) => p.validate(value),
            ParameterKind::Data(p) => p.validate(data, value),
        }
    }

    /// Encode arguments as a JSON object, one entry per declared key.
    pub fn to_json(&self, args: &Arguments) -> Json {
        let mut map = Map::new();
        for parameter in &self.entries {
            let value = match args.get(parameter.name()) {
                Some(value) => value.clone(),
                None => parameter.default_value(),
            };
            map.insert(parameter.name().to_string(), parameter.to_json(&value));
        }
        Json::Object(map)
    }

    /// Decode arguments. Missing keys take their default and unknown keys
    /// are ignored, each with a warning.
    pub fn from_json(&self, json: &Json) -> Outcome<Arguments> {
        let Some(object) = json.as_object() else {
            return Outcome::error(FilterError::validation(
                codes::INVALID_JSON,
                format!("Expected a JSON object of arguments, got {}", json),
            ));
        };

        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut args = Arguments::new();
        for parameter in &self.entries {
            match object.get(parameter.name()) {
                Some(value) => match parameter.from_json(value) {
                    Ok(value) => {
                        args.insert(parameter.name(), value);
                    }
                    Err(e) => errors.push(FilterError::validation(
                        codes::INVALID_JSON,
                        format!("Argument '{}': {}", parameter.name(), e),
                    )),
                },
                None => {
                    warnings.push(Warning::new(
                        codes::MISSING_JSON_KEY,
                        format!(
                            "Argument '{}' is missing from the JSON, using its default",
                            parameter.name()
                        ),
                    ));
                    args.insert(parameter.name(), parameter.default_value());
                }
            }
        }
        for key in object.keys() {
            if !self.contains(key) {
                warnings.push(Warning::new(
                    codes::UNKNOWN_JSON_KEY,
                    format!("JSON key '{}' does not match any parameter and was ignored", key),
                ));
            }
        }

        let outcome = if errors.is_empty() {
            Outcome::ok(args)
        } else {
            Outcome::err(errors)
        };
        outcome.with_warnings(warnings)
    }
}
