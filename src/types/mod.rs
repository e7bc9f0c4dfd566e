//! This module defines the core, strongly-typed data representations used
//! throughout the tenarc codec.
//!
//! It includes the canonical `ElementType` enum, which replaces fragile
//! string-based dtypes with a safe, serializable enum, and the `Element`
//! trait linking Rust scalar types to their archive representation.

pub mod element_type;

// Re-export the main type(s) for easier access.
pub use element_type::ElementType;

use bytemuck::Pod;

/// Links a Rust scalar type to the `ElementType` it is stored as.
///
/// The `Pod` bound is what lets the codec reinterpret raw buffers as typed
/// slices without any `unsafe` code of its own.
pub trait Element: Pod {
    const DTYPE: ElementType;
}

impl Element for f32 {
    const DTYPE: ElementType = ElementType::Float32;
}

impl Element for f64 {
    const DTYPE: ElementType = ElementType::Float64;
}

impl Element for i32 {
    const DTYPE: ElementType = ElementType::Int32;
}

impl Element for u8 {
    const DTYPE: ElementType = ElementType::UInt8;
}
