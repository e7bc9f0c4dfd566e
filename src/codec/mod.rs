// In: src/codec/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Codec Layer
// ====================================================================================
//
// The `codec` is the public-facing API of the tenarc library: a pair of pure,
// stateless transforms over fully in-memory values.
//
// Data Flow (Encode):
//
//   [Archive (in memory)] -> encode_archive -> [Vec<u8>: header + data blocks]
//                         -> encode_with_schema (headerless, agreed layout)
//
// Data Flow (Decode):
//
//   [&[u8]] -> peek_manifest  -> [Manifest]  (header only, no data read)
//           -> decode_archive -> [Archive]   (two-pass: manifest, then blocks)
//           -> decode_with_schema            (same block loop, external manifest)
//
// There is no cross-call state, no streaming and no partial success: each call
// either yields a complete value or a single distinguishable error.
// ====================================================================================

mod reader;
mod writer;

pub use reader::{decode_archive, decode_with_schema, peek_manifest};
pub use writer::{encode_archive, encode_with_schema};

use std::path::Path;

use crate::archive::Archive;
use crate::error::TenarcError;

/// Encodes an archive and writes it to `path` in one call.
pub fn encode_archive_to_path(
    archive: &Archive,
    path: impl AsRef<Path>,
) -> Result<(), TenarcError> {
    let bytes = encode_archive(archive)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Reads `path` fully and decodes it as a general-mode archive.
pub fn decode_archive_from_path(path: impl AsRef<Path>) -> Result<Archive, TenarcError> {
    let bytes = std::fs::read(path)?;
    decode_archive(&bytes)
}

#[cfg(test)]
mod tests;
