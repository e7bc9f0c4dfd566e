//! Small byte/slice reinterpretation helpers shared across the crate.
//! Everything here delegates to `bytemuck`; no `unsafe` of our own.

use bytemuck::Pod;

/// Copies a typed slice into a fresh little-endian byte buffer.
pub fn typed_slice_to_bytes<T: Pod>(slice: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(slice).to_vec()
}

/// Copies a byte buffer into a fresh typed vector.
///
/// `pod_collect_to_vec` is used instead of `try_cast_slice` because a
/// `Vec<u8>` carries no alignment guarantee for wider element types; the
/// copy sidesteps alignment entirely. Callers are expected to pass a buffer
/// whose length is an exact multiple of `size_of::<T>()`.
pub fn bytes_to_typed_vec<T: Pod>(bytes: &[u8]) -> Vec<T> {
    bytemuck::pod_collect_to_vec(bytes)
}
