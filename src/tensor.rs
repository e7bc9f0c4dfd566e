// In: src/tensor.rs

//! The in-memory tensor model: a shaped, typed, contiguous raw buffer.
//!
//! The central invariant lives here: a tensor's buffer length is always
//! exactly `num_elements(shape) * dtype.item_size()`. Violating it is a
//! construction error, never a runtime condition to be tolerated, which is
//! why the fields are private and every constructor validates.

use crate::error::TenarcError;
use crate::types::{Element, ElementType};
use crate::utils;
use ndarray::{ArrayD, IxDyn};

/// Number of elements implied by a shape, as a `u64` so that large dims
/// cannot overflow the size math on 32-bit hosts.
///
/// An empty shape denotes a scalar and yields exactly one element (the empty
/// product). A zero anywhere in the shape yields zero elements. The product
/// saturates at `u64::MAX`: shape dims can come from a hostile header, and a
/// wrapped product would let a corrupt shape pass the buffer-length checks.
/// No real buffer can match the saturated value, so every downstream check
/// fails loudly instead.
pub fn num_elements(shape: &[u32]) -> u64 {
    shape
        .iter()
        .fold(1u64, |acc, &d| acc.saturating_mul(d as u64))
}

/// A shaped, typed, contiguous row-major buffer of numeric elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dtype: ElementType,
    shape: Vec<u32>,
    data: Vec<u8>,
}

impl Tensor {
    /// Constructs a tensor from raw parts, validating the buffer-length invariant.
    pub fn new(dtype: ElementType, shape: Vec<u32>, data: Vec<u8>) -> Result<Self, TenarcError> {
        let expected = num_elements(&shape).saturating_mul(dtype.item_size() as u64);
        if data.len() as u64 != expected {
            return Err(TenarcError::InvalidTensor(format!(
                "buffer holds {} bytes, but shape {:?} of {} requires {}",
                data.len(),
                shape,
                dtype,
                expected
            )));
        }
        Ok(Self { dtype, shape, data })
    }

    /// Constructs a tensor from a typed value vector.
    pub fn from_vec<T: Element>(shape: Vec<u32>, values: Vec<T>) -> Result<Self, TenarcError> {
        Self::new(T::DTYPE, shape, utils::typed_slice_to_bytes(&values))
    }

    /// Constructs a scalar tensor: empty shape, exactly one element.
    pub fn scalar<T: Element>(value: T) -> Self {
        // A single element always matches the empty shape, so this cannot fail.
        Self {
            dtype: T::DTYPE,
            shape: Vec::new(),
            data: utils::typed_slice_to_bytes(&[value]),
        }
    }

    pub fn dtype(&self) -> ElementType {
        self.dtype
    }

    pub fn shape(&self) -> &[u32] {
        &self.shape
    }

    /// The raw row-major element buffer, exactly as it appears on disk.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn num_elements(&self) -> u64 {
        num_elements(&self.shape)
    }

    /// `true` for the empty shape (one element, rank zero).
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Copies the buffer out as a typed vector.
    ///
    /// Fails if `T` does not match the tensor's element type. The copy (rather
    /// than a borrowed slice) is deliberate: the byte buffer carries no
    /// alignment guarantee for multi-byte element types.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, TenarcError> {
        if T::DTYPE != self.dtype {
            return Err(TenarcError::PodCast(format!(
                "cannot view a {} tensor as {}",
                self.dtype,
                T::DTYPE
            )));
        }
        Ok(utils::bytes_to_typed_vec(&self.data))
    }

    /// Materializes the tensor as a dynamic-dimensional ndarray for consumers
    /// that want shaped access (e.g. the render module's channel slicing).
    pub fn to_array<T: Element>(&self) -> Result<ArrayD<T>, TenarcError> {
        let dims: Vec<usize> = self.shape.iter().map(|&d| d as usize).collect();
        ArrayD::from_shape_vec(IxDyn(&dims), self.to_vec()?)
            .map_err(|e| TenarcError::UnsupportedShape(e.to_string()))
    }
}
