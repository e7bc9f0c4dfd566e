//! This file is the root of the `tenarc` Rust crate.
//!
//! tenarc is a small, self-describing binary container for named
//! multi-dimensional numeric arrays: a metadata header (entry count, then
//! per-entry name / shape / dtype-tag records) followed by the raw data
//! blocks in the same order. The crate provides the encoder/decoder pair,
//! a headerless fixed-schema mode for statically agreed layouts, a
//! header-only manifest peek, and read-only listing/rendering helpers for
//! decoded archives.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod archive;
pub mod codec;
pub mod error;
pub mod format;
pub mod inspect;
pub mod render;
pub mod tensor;
pub mod types;

mod utils;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use archive::Archive;
pub use codec::{
    decode_archive, decode_archive_from_path, decode_with_schema, encode_archive,
    encode_archive_to_path, encode_with_schema, peek_manifest,
};
pub use error::TenarcError;
pub use format::{Manifest, Schema, SchemaEntry};
pub use tensor::Tensor;
pub use types::{Element, ElementType};

//==================================================================================
// 3. Logging Toggle
//==================================================================================
use std::sync::Once;

static LOG_INIT: Once = Once::new();

/// Turns on `env_logger` output for ad-hoc debugging of the codec
/// (`RUST_LOG=tenarc=trace` for per-block detail). Safe to call more than
/// once; only the first call installs the logger.
pub fn enable_verbose_logging() {
    LOG_INIT.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    });
}
