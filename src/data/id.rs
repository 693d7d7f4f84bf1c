//! Identity type for objects in the data store.
//!
//! `DataId` is a newtype over `u64` handed out by a monotonic counter inside
//! [`DataStructure`](super::DataStructure). Ids are never reused within one
//! store, so two stores built by the same sequence of operations assign the
//! same ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a `DataObject` within one `DataStructure`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DataId(pub u64);

impl DataId {
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataId({})", self.0)
    }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_id() {
        let id = DataId(42);
        assert_eq!(id.value(), 42);
        assert_eq!(format!("{}", id), "DataId(42)");
        assert!(DataId(1) < DataId(2));
    }
}
