//! Key → value bag supplied to a filter.

use crate::parameters::value::{ArgValue, FromArgValue};
use std::collections::BTreeMap;

/// Arguments for one filter invocation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: BTreeMap<String, ArgValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Option<ArgValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ArgValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Typed read of a resolved argument.
    ///
    /// Panics if the key is missing or holds a different kind: both mean the
    /// caller built an `Arguments` that was never resolved against the
    /// filter's parameters.
    pub fn value<T: FromArgValue>(&self, key: &str) -> T {
        let Some(value) = self.values.get(key) else {
            panic!("argument '{}' is missing; arguments must be resolved first", key);
        };
        match T::from_arg(value) {
            Some(v) => v,
            None => panic!(
                "argument '{}' holds a {} value but {} was requested",
                key,
                value.kind(),
                T::KIND
            ),
        }
    }
}

impl FromIterator<(String, ArgValue)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
