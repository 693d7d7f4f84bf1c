//! Hierarchical addressing of objects in the data store.
//!
//! A [`DataPath`] is an immutable ordered list of names. It is written with
//! `/` separators (`"FeatureData/Omega3s"`); a leading or trailing `/` is
//! ignored when parsing. Equality is segment-wise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator used in the string form of a path.
pub const PATH_SEPARATOR: char = '/';

/// Ordered sequence of names addressing one object in a `DataStructure`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DataPath {
    segments: Vec<String>,
}

/// Reasons a string cannot be parsed into a [`DataPath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataPathParseError {
    #[error("Path '{0}' contains an empty segment")]
    EmptySegment(String),
}

impl DataPath {
    /// Create a path from already-split segments.
    ///
    /// Panics if a segment is empty or contains the separator; callers that
    /// handle user input should go through [`DataPath::parse`].
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            assert!(
                is_valid_name(segment),
                "invalid DataPath segment {:?}",
                segment
            );
        }
        Self { segments }
    }

    /// The empty path. It addresses the store root and never resolves to an object.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `"A/B/C"`.
    pub fn parse(text: &str) -> Result<Self, DataPathParseError> {
        let trimmed = text.trim().trim_matches(PATH_SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for part in trimmed.split(PATH_SEPARATOR) {
            if part.is_empty() {
                return Err(DataPathParseError::EmptySegment(text.to_string()));
            }
            segments.push(part.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any.
    pub fn target_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the containing object. The parent of a top-level path is the
    /// root (empty) path; the root has no parent.
    pub fn parent(&self) -> Option<DataPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one segment.
    pub fn child(&self, name: impl Into<String>) -> DataPath {
        let name = name.into();
        assert!(is_valid_name(&name), "invalid DataPath segment {:?}", name);
        let mut segments = self.segments.clone();
        segments.push(name);
        Self { segments }
    }

    /// Same path with the last segment replaced.
    pub fn with_name(&self, name: impl Into<String>) -> DataPath {
        match self.parent() {
            Some(parent) => parent.child(name),
            None => DataPath::root().child(name),
        }
    }

    /// True if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &DataPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

/// Object names must be non-empty and must not contain the path separator.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(PATH_SEPARATOR)
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for DataPath {
    type Err = DataPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataPath::parse(s)
    }
}

impl From<DataPath> for String {
    fn from(path: DataPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for DataPath {
    type Error = DataPathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DataPath::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_and_display() {
        let path = DataPath::parse("/FeatureData/Omega3s").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.target_name(), Some("Omega3s"));
        assert_eq!(path.to_string(), "FeatureData/Omega3s");
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert!(DataPath::parse("A//B").is_err());
    }

    #[test]
    fn test_root_path() {
        let root = DataPath::parse("/").unwrap();
        assert!(root.is_empty());
        assert_eq!(root.parent(), None);
        assert_eq!(DataPath::new(["A"]).parent(), Some(DataPath::root()));
    }

    #[test]
    fn test_child_and_with_name() {
        let base = DataPath::new(["Image", "CellData"]);
        let child = base.child("Phases");
        assert_eq!(child.to_string(), "Image/CellData/Phases");
        assert!(child.starts_with(&base));
        assert_eq!(child.with_name("Mask").to_string(), "Image/CellData/Mask");
        assert!(!base.starts_with(&child));
    }

    #[test]
    #[should_panic]
    fn test_new_rejects_separator() {
        let _ = DataPath::new(["A/B"]);
    }

    #[test]
    fn test_serde_as_string() {
        let path = DataPath::new(["A", "B"]);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!("A/B"));
        let back: DataPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }

    proptest! {
        #[test]
        fn test_display_parse_identity(
            segments in prop::collection::vec("[A-Za-z0-9_ .-]{1,12}", 0..6)
        ) {
            let path = DataPath::new(segments.clone());
            let reparsed = DataPath::parse(&path.to_string()).unwrap();
            // Surrounding whitespace is trimmed by the parser, so only compare
            // when the rendered form has none.
            let rendered = path.to_string();
            if rendered.trim() == rendered {
                prop_assert_eq!(reparsed, path);
            }
        }
    }
}
