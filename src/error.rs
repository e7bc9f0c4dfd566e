// In: src/error.rs

//! This module defines the single, unified error type for the entire tenarc library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenarcError {
    // =========================================================================
    // === Codec Errors (the format's failure taxonomy)
    // =========================================================================
    /// A dtype tag has no known byte width or reciprocal encoding.
    #[error("Unsupported dtype tag: {0:?}")]
    UnsupportedDtype(String),

    /// Fewer bytes remain than a declared field or data block requires.
    #[error("Truncated input: {0}")]
    TruncatedInput(String),

    /// A name or dtype-tag field was not valid UTF-8.
    #[error("Invalid UTF-8 in {0} field")]
    InvalidUtf8(String),

    /// A tensor's buffer length disagrees with its declared shape/dtype.
    #[error("Invalid tensor: {0}")]
    InvalidTensor(String),

    // =========================================================================
    // === Consumer Errors (listing / rendering collaborators)
    // =========================================================================
    #[error("Archive entry not found: {0:?}")]
    MissingEntry(String),

    #[error("Unsupported tensor shape: {0}")]
    UnsupportedShape(String),

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, during schema agreement (de)serialization.
    #[error("Schema serialization/deserialization failed: {0}")]
    SchemaFormat(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for TenarcError {
    fn from(err: bytemuck::PodCastError) -> Self {
        TenarcError::PodCast(err.to_string())
    }
}
