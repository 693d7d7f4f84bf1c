//! Hierarchical typed data store.
//!
//! # Module Structure
//!
//! - [`id`] - `DataId` newtype
//! - [`path`] - `DataPath` addressing
//! - [`array`] - Typed array storage
//! - [`geometry`] - Geometry payloads and their construction
//! - [`object`] - `DataObject` nodes and payload variants
//! - [`structure`] - `DataStructure`, the object forest

pub mod array;
pub mod geometry;
pub mod id;
pub mod object;
pub mod path;
pub mod structure;

pub use array::{
    byte_count, element_count, shape_product, ArrayBuffer, ArrayElement, DataArray,
};
pub use geometry::{Geometry, GeometryKind, GeometrySpec};
pub use id::DataId;
pub use object::{DataObject, ObjectKind, Payload};
pub use path::{is_valid_name, DataPath, DataPathParseError, PATH_SEPARATOR};
pub use structure::{DataStructure, StructureError, StructureResult};
