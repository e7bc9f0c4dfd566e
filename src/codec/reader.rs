// In: src/codec/reader.rs

//! The decoder half of the tenarc codec.
//!
//! Decoding is strictly two-pass: ALL metadata records are parsed before a
//! single data byte is read. Data blocks carry no length prefixes of their
//! own; each block's size is derivable only from its matching metadata
//! record, so the full manifest must be known before any block can be
//! sliced out. That ordering is the correctness-critical property of the
//! format, not an implementation convenience.
//!
//! Fixed-schema mode reuses the same block-reading loop and simply swaps
//! the manifest source: an externally supplied `Schema` instead of the
//! parsed header.

use std::io::{Cursor, Read};

use log::{debug, trace};

use crate::archive::Archive;
use crate::error::TenarcError;
use crate::format::{Manifest, Schema, SchemaEntry};
use crate::tensor::Tensor;
use crate::types::ElementType;

/// Decodes a byte stream in the self-describing general format.
///
/// Fails eagerly at the first violation: `TruncatedInput` if the stream ends
/// inside a declared field or data block, `InvalidUtf8` for malformed name or
/// tag bytes, `UnsupportedDtype` for an unrecognized tag. Never returns a
/// partial archive.
pub fn decode_archive(bytes: &[u8]) -> Result<Archive, TenarcError> {
    let manifest = peek_manifest(bytes)?;
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(manifest.header_size as u64);
    read_blocks(&mut cursor, &manifest.entries)
}

/// Decodes a headerless stream against an externally agreed schema.
///
/// This mode trusts the caller completely: if the schema disagrees with the
/// actual byte layout but enough bytes are present, the result is silently
/// wrong data (a wrong reshape), not a detected error. Callers needing
/// safety should use the general mode. Trailing bytes beyond what the
/// schema declares are ignored, like the original headerless reader.
pub fn decode_with_schema(bytes: &[u8], schema: &Schema) -> Result<Archive, TenarcError> {
    let mut cursor = Cursor::new(bytes);
    read_blocks(&mut cursor, &schema.entries)
}

/// Parses the metadata header only, without touching the data blocks.
///
/// Besides powering `decode_archive`, this is the cheap listing primitive:
/// names, shapes and dtypes of every entry from just the header bytes. Also
/// validates that the data the header declares actually fits the buffer, so
/// a successful peek means the block-reading pass cannot run out of bytes.
pub fn peek_manifest(bytes: &[u8]) -> Result<Manifest, TenarcError> {
    let mut cursor = Cursor::new(bytes);

    let entry_count = read_u32(&mut cursor, "entry count")?;
    debug!("decoding header: {} entries declared", entry_count);

    // Cap the pre-allocation: entry_count is attacker-controlled and each
    // real entry needs at least 12 more header bytes to parse.
    let mut entries = Vec::with_capacity(entry_count.min(4096) as usize);
    for _ in 0..entry_count {
        let name = read_prefixed_string(&mut cursor, "name")?;

        let rank = read_u32(&mut cursor, "shape rank")?;
        let mut shape = Vec::with_capacity(rank.min(64) as usize);
        for _ in 0..rank {
            shape.push(read_u32(&mut cursor, "shape dim")?);
        }

        let tag = read_prefixed_string(&mut cursor, "dtype tag")?;
        let dtype = ElementType::from_tag(&tag)?;

        entries.push(SchemaEntry { name, shape, dtype });
    }

    let header_size = cursor.position() as usize;
    // Saturating, like the per-entry sizes: a wrapped total would slip past
    // the fits-check below.
    let data_size = entries
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.data_len()));
    let remaining = (bytes.len() - header_size) as u64;
    if data_size > remaining {
        return Err(TenarcError::TruncatedInput(format!(
            "header declares {} data bytes but only {} remain after the header",
            data_size, remaining
        )));
    }

    Ok(Manifest {
        entries,
        header_size,
        data_size,
    })
}

/// The single block-reading loop shared by both decode modes: slice one data
/// block per manifest entry, in manifest order, and bind it under the
/// entry's name.
fn read_blocks(cursor: &mut Cursor<&[u8]>, entries: &[SchemaEntry]) -> Result<Archive, TenarcError> {
    let mut archive = Archive::new();
    for entry in entries {
        let len = usize::try_from(entry.data_len()).map_err(|_| {
            TenarcError::TruncatedInput(format!(
                "data block for {:?} declares {} bytes, beyond addressable memory",
                entry.name,
                entry.data_len()
            ))
        })?;

        // Validate against the remaining bytes before allocating, so a
        // declared size the stream cannot possibly satisfy never turns into
        // a huge allocation (the fixed-schema path has no peek to do this).
        let remaining = cursor.get_ref().len() - cursor.position() as usize;
        if len > remaining {
            return Err(TenarcError::TruncatedInput(format!(
                "data block for {:?} needs {} bytes but only {} remain",
                entry.name, len, remaining
            )));
        }

        let mut data = vec![0u8; len];
        cursor.read_exact(&mut data).map_err(|_| {
            TenarcError::TruncatedInput(format!(
                "data block for {:?} needs {} bytes but the stream ended early",
                entry.name, len
            ))
        })?;
        trace!("data block {:?}: {} bytes", entry.name, len);

        let tensor = Tensor::new(entry.dtype, entry.shape.clone(), data)?;
        archive.insert(entry.name.clone(), tensor);
    }
    Ok(archive)
}

//==================================================================================
// Private Helpers
//==================================================================================

fn read_u32(cursor: &mut Cursor<&[u8]>, field: &str) -> Result<u32, TenarcError> {
    let mut buf = [0u8; 4];
    cursor.read_exact(&mut buf).map_err(|_| {
        TenarcError::TruncatedInput(format!("stream ended inside {} field", field))
    })?;
    Ok(u32::from_le_bytes(buf))
}

fn read_prefixed_string(cursor: &mut Cursor<&[u8]>, field: &str) -> Result<String, TenarcError> {
    let len = read_u32(cursor, field)? as usize;

    // Validate the declared length against the remaining bytes before
    // allocating, so a corrupt length cannot trigger a huge allocation.
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(TenarcError::TruncatedInput(format!(
            "{} field declares {} bytes but only {} remain",
            field, len, remaining
        )));
    }

    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf).map_err(|_| {
        TenarcError::TruncatedInput(format!("stream ended inside {} field", field))
    })?;
    String::from_utf8(buf).map_err(|_| TenarcError::InvalidUtf8(field.to_string()))
}
