//! Typed array payload of the data store.
//!
//! A [`DataArray`] is a tuple-shape × component-shape block of elements of
//! one [`DataType`]. Storage lives in [`ArrayBuffer`]; the `Empty` variant
//! describes an array whose shape is known but whose elements were never
//! allocated. Preflight works exclusively on `Empty` arrays.

use crate::types::{parse_bool, DataType};
use std::ops::Range;

/// Backing storage of a [`DataArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayBuffer {
    /// Shape-only placeholder used by preview copies.
    Empty,
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Boolean(Vec<bool>),
}

/// Element types that can be viewed as typed slices of an [`ArrayBuffer`].
pub trait ArrayElement: Copy + Default + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    fn slice(buffer: &ArrayBuffer) -> Option<&[Self]>;
    fn slice_mut(buffer: &mut ArrayBuffer) -> Option<&mut [Self]>;
}

macro_rules! impl_array_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                const DATA_TYPE: DataType = DataType::$variant;

                fn slice(buffer: &ArrayBuffer) -> Option<&[Self]> {
                    match buffer {
                        ArrayBuffer::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }

                fn slice_mut(buffer: &mut ArrayBuffer) -> Option<&mut [Self]> {
                    match buffer {
                        ArrayBuffer::$variant(v) => Some(v.as_mut_slice()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_array_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Boolean,
}

macro_rules! filled {
    ($variant:ident, $ty:ty, $text:expr, $len:expr) => {
        $text
            .trim()
            .parse::<$ty>()
            .map(|v| ArrayBuffer::$variant(vec![v; $len]))
            .ok()
    };
}

macro_rules! fill_tuples {
    ($target:expr, $source:expr, $tuples:expr, $components:expr, $mask:expr, $($variant:ident),*) => {
        match ($target, $source) {
            $((ArrayBuffer::$variant(dst), ArrayBuffer::$variant(src)) => {
                let value = src[0];
                let mut count = 0;
                for tuple in $tuples {
                    if $mask.map_or(true, |m: &[bool]| m[tuple]) {
                        dst[tuple * $components..(tuple + 1) * $components].fill(value);
                        count += 1;
                    }
                }
                count
            })*
            _ => 0,
        }
    };
}

macro_rules! resized {
    ($buffer:expr, $len:expr, $($variant:ident),*) => {
        match $buffer {
            ArrayBuffer::Empty => {}
            $(ArrayBuffer::$variant(v) => v.resize($len, Default::default()),)*
        }
    };
}

impl ArrayBuffer {
    /// Allocate `len` elements of `data_type`, all set to `fill`.
    pub fn filled(data_type: DataType, len: usize, fill: &str) -> Result<Self, String> {
        let buffer = match data_type {
            DataType::Int8 => filled!(Int8, i8, fill, len),
            DataType::Int16 => filled!(Int16, i16, fill, len),
            DataType::Int32 => filled!(Int32, i32, fill, len),
            DataType::Int64 => filled!(Int64, i64, fill, len),
            DataType::UInt8 => filled!(UInt8, u8, fill, len),
            DataType::UInt16 => filled!(UInt16, u16, fill, len),
            DataType::UInt32 => filled!(UInt32, u32, fill, len),
            DataType::UInt64 => filled!(UInt64, u64, fill, len),
            DataType::Float32 => filled!(Float32, f32, fill, len),
            DataType::Float64 => filled!(Float64, f64, fill, len),
            DataType::Boolean => parse_bool(fill).map(|v| ArrayBuffer::Boolean(vec![v; len])),
        };
        buffer.ok_or_else(|| format!("'{}' is not a valid {} value", fill.trim(), data_type))
    }

    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self, ArrayBuffer::Empty)
    }

    fn resize(&mut self, len: usize) {
        resized!(
            self, len, Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32, UInt64, Float32,
            Float64, Boolean
        );
    }
}

/// Element data plus its tuple/component layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    data_type: DataType,
    tuple_shape: Vec<usize>,
    component_shape: Vec<usize>,
    buffer: ArrayBuffer,
}

impl DataArray {
    /// Shape-only array, no element storage.
    pub fn empty(data_type: DataType, tuple_shape: Vec<usize>, component_shape: Vec<usize>) -> Self {
        Self {
            data_type,
            tuple_shape,
            component_shape,
            buffer: ArrayBuffer::Empty,
        }
    }

    /// Allocated array with every element set to `fill`.
    pub fn filled(
        data_type: DataType,
        tuple_shape: Vec<usize>,
        component_shape: Vec<usize>,
        fill: &str,
    ) -> Result<Self, String> {
        let len = element_count(&tuple_shape, &component_shape)?;
        byte_count(data_type, len)?;
        let buffer = ArrayBuffer::filled(data_type, len, fill)?;
        Ok(Self {
            data_type,
            tuple_shape,
            component_shape,
            buffer,
        })
    }

    /// Wrap existing values. The value count must match the shapes.
    pub fn from_vec<T: ArrayElement>(
        values: Vec<T>,
        tuple_shape: Vec<usize>,
        component_shape: Vec<usize>,
    ) -> Result<Self, String>
    where
        Vec<T>: Into<ArrayBuffer>,
    {
        let expected = element_count(&tuple_shape, &component_shape)?;
        if values.len() != expected {
            return Err(format!(
                "Expected {} values for tuple shape {:?} and component shape {:?}, got {}",
                expected,
                tuple_shape,
                component_shape,
                values.len()
            ));
        }
        Ok(Self {
            data_type: T::DATA_TYPE,
            tuple_shape,
            component_shape,
            buffer: values.into(),
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn tuple_shape(&self) -> &[usize] {
        &self.tuple_shape
    }

    pub fn component_shape(&self) -> &[usize] {
        &self.component_shape
    }

    pub fn tuple_count(&self) -> usize {
        saturating_product(&self.tuple_shape)
    }

    pub fn component_count(&self) -> usize {
        saturating_product(&self.component_shape)
    }

    /// Total element count described by the shapes.
    pub fn len(&self) -> usize {
        self.tuple_count().saturating_mul(self.component_count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// False for preview (shape-only) arrays.
    pub fn is_allocated(&self) -> bool {
        !self.buffer.is_empty_placeholder()
    }

    pub fn buffer(&self) -> &ArrayBuffer {
        &self.buffer
    }

    /// Typed view. `None` if `T` is not the element type or the array is not allocated.
    pub fn as_slice<T: ArrayElement>(&self) -> Option<&[T]> {
        T::slice(&self.buffer)
    }

    pub fn as_mut_slice<T: ArrayElement>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.buffer)
    }

    /// Change the tuple shape, truncating or zero-extending allocated storage.
    /// The array is left untouched when the new shape does not fit in memory.
    pub fn resize_tuples(&mut self, tuple_shape: Vec<usize>) -> Result<(), String> {
        let len = element_count(&tuple_shape, &self.component_shape)?;
        if self.is_allocated() {
            byte_count(self.data_type, len)?;
        }
        self.tuple_shape = tuple_shape;
        self.buffer.resize(len);
        Ok(())
    }

    /// Set every component of the tuples in `tuples` to `fill`, skipping
    /// tuples whose `mask` entry is false. Returns the number of tuples written.
    pub fn fill_tuples(
        &mut self,
        tuples: Range<usize>,
        fill: &str,
        mask: Option<&[bool]>,
    ) -> Result<usize, String> {
        if !self.is_allocated() {
            return Err("array has no element storage".to_string());
        }
        if tuples.end > self.tuple_count() {
            return Err(format!(
                "tuple range {:?} exceeds tuple count {}",
                tuples,
                self.tuple_count()
            ));
        }
        if let Some(mask) = mask {
            if mask.len() != self.tuple_count() {
                return Err(format!(
                    "mask has {} tuples, array has {}",
                    mask.len(),
                    self.tuple_count()
                ));
            }
        }
        let source = ArrayBuffer::filled(self.data_type, 1, fill)?;
        let components = self.component_count();
        Ok(fill_tuples!(
            &mut self.buffer, &source, tuples, components, mask, Int8, Int16, Int32, Int64, UInt8,
            UInt16, UInt32, UInt64, Float32, Float64, Boolean
        ))
    }

    /// Same layout without element storage.
    pub fn to_placeholder(&self) -> Self {
        Self::empty(
            self.data_type,
            self.tuple_shape.clone(),
            self.component_shape.clone(),
        )
    }
}

macro_rules! impl_buffer_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for ArrayBuffer {
                fn from(values: Vec<$ty>) -> Self {
                    ArrayBuffer::$variant(values)
                }
            }
        )*
    };
}

impl_buffer_from_vec! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Boolean,
}

/// Product of a shape's extents, `None` when it does not fit in a `usize`.
/// An empty shape describes zero elements.
pub fn shape_product(shape: &[usize]) -> Option<usize> {
    if shape.is_empty() {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
}

/// Elements described by a tuple shape and a component shape together.
pub fn element_count(tuple_shape: &[usize], component_shape: &[usize]) -> Result<usize, String> {
    shape_product(tuple_shape)
        .zip(shape_product(component_shape))
        .and_then(|(tuples, components)| tuples.checked_mul(components))
        .ok_or_else(|| {
            format!(
                "Tuple shape {:?} with component shape {:?} overflows the element count",
                tuple_shape, component_shape
            )
        })
}

/// Bytes needed for `len` elements of `data_type`, bounded by what one
/// allocation can hold.
pub fn byte_count(data_type: DataType, len: usize) -> Result<usize, String> {
    len.checked_mul(data_type.size_bytes())
        .filter(|bytes| *bytes <= isize::MAX as usize)
        .ok_or_else(|| format!("{} {} elements do not fit in memory", len, data_type))
}

/// Shapes stored in a [`DataArray`] or attribute matrix were checked on the
/// way in, so this only saturates for hand-built placeholders.
pub(crate) fn saturating_product(shape: &[usize]) -> usize {
    if shape.is_empty() {
        return 0;
    }
    shape.iter().fold(1usize, |acc, &extent| acc.saturating_mul(extent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_array() {
        let array = DataArray::filled(DataType::Float32, vec![10], vec![3], "1.5").unwrap();
        assert_eq!(array.tuple_count(), 10);
        assert_eq!(array.component_count(), 3);
        assert_eq!(array.len(), 30);
        let values = array.as_slice::<f32>().unwrap();
        assert!(values.iter().all(|&v| v == 1.5));
        assert!(array.as_slice::<f64>().is_none());
    }

    #[test]
    fn test_invalid_fill() {
        assert!(DataArray::filled(DataType::UInt8, vec![4], vec![1], "-1").is_err());
        assert!(DataArray::filled(DataType::Boolean, vec![4], vec![1], "maybe").is_err());
    }

    #[test]
    fn test_placeholder_has_no_storage() {
        let array = DataArray::filled(DataType::Int32, vec![2, 3], vec![1], "7").unwrap();
        let placeholder = array.to_placeholder();
        assert!(!placeholder.is_allocated());
        assert_eq!(placeholder.tuple_count(), 6);
        assert!(placeholder.as_slice::<i32>().is_none());
    }

    #[test]
    fn test_resize_tuples() {
        let mut array = DataArray::from_vec(vec![1u16, 2, 3], vec![3], vec![1]).unwrap();
        array.resize_tuples(vec![5]).unwrap();
        assert_eq!(array.as_slice::<u16>().unwrap(), &[1, 2, 3, 0, 0]);
        array.resize_tuples(vec![2]).unwrap();
        assert_eq!(array.as_slice::<u16>().unwrap(), &[1, 2]);
    }

    #[test]
    fn test_resize_tuples_overflow_keeps_array() {
        let mut array = DataArray::from_vec(vec![1u16, 2, 3], vec![3], vec![1]).unwrap();
        assert!(array.resize_tuples(vec![1 << 32, 1 << 32]).is_err());
        assert_eq!(array.tuple_shape(), &[3]);
        assert_eq!(array.as_slice::<u16>().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_fill_tuples_with_mask() {
        let mut array = DataArray::filled(DataType::Int16, vec![4], vec![2], "0").unwrap();
        let mask = [true, false, true, false];
        let count = array.fill_tuples(0..4, "9", Some(&mask)).unwrap();
        assert_eq!(count, 2);
        assert_eq!(array.as_slice::<i16>().unwrap(), &[9, 9, 0, 0, 9, 9, 0, 0]);
    }

    #[test]
    fn test_fill_tuples_rejects_bad_input() {
        let mut array = DataArray::filled(DataType::UInt8, vec![3], vec![1], "0").unwrap();
        assert!(array.fill_tuples(0..4, "1", None).is_err());
        assert!(array.fill_tuples(0..3, "300", None).is_err());
        assert!(array.fill_tuples(0..3, "1", Some(&[true])).is_err());
        let mut placeholder = array.to_placeholder();
        assert!(placeholder.fill_tuples(0..1, "1", None).is_err());
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        assert!(DataArray::from_vec(vec![1.0f64, 2.0], vec![3], vec![1]).is_err());
    }

    #[test]
    fn test_shape_product() {
        assert_eq!(shape_product(&[]), Some(0));
        assert_eq!(shape_product(&[2, 3, 4]), Some(24));
        assert_eq!(shape_product(&[1 << 32, 1 << 32]), None);
        assert_eq!(shape_product(&[usize::MAX, 0]), Some(0));
    }

    #[test]
    fn test_element_count_overflow() {
        assert_eq!(element_count(&[4, 3], &[2]), Ok(24));
        assert!(element_count(&[1 << 32], &[1 << 32]).is_err());
        assert!(element_count(&[1 << 32, 1 << 32], &[1]).is_err());
    }

    #[test]
    fn test_oversized_arrays_are_rejected() {
        let err = DataArray::filled(DataType::Float64, vec![1 << 32, 1 << 32], vec![1], "0")
            .unwrap_err();
        assert!(err.contains("overflows"), "{}", err);
        assert!(DataArray::filled(DataType::Float64, vec![usize::MAX / 4], vec![1], "0").is_err());
        assert!(DataArray::from_vec(vec![0u8], vec![1 << 32, 1 << 32], vec![1]).is_err());
    }
}
