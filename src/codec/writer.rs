// In: src/codec/writer.rs

//! The encoder half of the tenarc codec.
//!
//! The output is assembled in two passes over the archive: every metadata
//! record first, then every raw data block in the same order. Writing
//! targets a `Vec<u8>`, so byte appending itself is infallible; every
//! failure mode is validated before the first byte of output exists.

use log::{debug, trace};

use crate::archive::Archive;
use crate::error::TenarcError;
use crate::format::Schema;
use crate::tensor::{num_elements, Tensor};

/// Serializes an archive into the self-describing general format.
///
/// Deterministic: the same archive (same layout order) always yields
/// byte-identical output. Pure function of its input, no side effects.
pub fn encode_archive(archive: &Archive) -> Result<Vec<u8>, TenarcError> {
    // Validate every entry up front so a failure writes no output at all.
    for (name, tensor) in archive.iter() {
        check_buffer(name, tensor)?;
    }

    let header_size: usize = 4 + archive
        .iter()
        .map(|(name, tensor)| metadata_record_len(name, tensor))
        .sum::<usize>();
    let data_size: usize = archive.iter().map(|(_, t)| t.data().len()).sum();
    let mut out = Vec::with_capacity(header_size + data_size);

    debug!(
        "encoding archive: {} entries, {} header bytes, {} data bytes",
        archive.len(),
        header_size,
        data_size
    );

    out.extend_from_slice(&(archive.len() as u32).to_le_bytes());
    for (name, tensor) in archive.iter() {
        write_metadata_record(&mut out, name, tensor);
    }
    for (name, tensor) in archive.iter() {
        trace!("data block {:?}: {} bytes", name, tensor.data().len());
        out.extend_from_slice(tensor.data());
    }

    Ok(out)
}

/// Serializes an archive in headerless fixed-schema mode: the concatenated
/// data blocks for `schema`'s entries, in schema order, nothing else.
///
/// Unlike the decode side, the writer does verify the archive against the
/// agreement; emitting bytes a peer will misinterpret helps nobody.
pub fn encode_with_schema(archive: &Archive, schema: &Schema) -> Result<Vec<u8>, TenarcError> {
    for entry in &schema.entries {
        let tensor = archive
            .get(&entry.name)
            .ok_or_else(|| TenarcError::MissingEntry(entry.name.clone()))?;
        if tensor.dtype() != entry.dtype || tensor.shape() != entry.shape.as_slice() {
            return Err(TenarcError::InvalidTensor(format!(
                "entry {:?} is {} {:?}, but the schema declares {} {:?}",
                entry.name,
                tensor.dtype(),
                tensor.shape(),
                entry.dtype,
                entry.shape
            )));
        }
    }

    let mut out = Vec::with_capacity(schema.data_len() as usize);
    for entry in &schema.entries {
        // Lookup cannot fail: the loop above resolved every name.
        if let Some(tensor) = archive.get(&entry.name) {
            trace!("data block {:?}: {} bytes", entry.name, tensor.data().len());
            out.extend_from_slice(tensor.data());
        }
    }
    Ok(out)
}

/// Defensive re-check of the `Tensor` length invariant.
///
/// The validating constructors already guarantee this, but the check is O(1)
/// per entry and keeps the encoder's contract independent of how the tensor
/// was built.
fn check_buffer(name: &str, tensor: &Tensor) -> Result<(), TenarcError> {
    let expected = num_elements(tensor.shape()).saturating_mul(tensor.dtype().item_size() as u64);
    if tensor.data().len() as u64 != expected {
        return Err(TenarcError::InvalidTensor(format!(
            "entry {:?}: buffer holds {} bytes, but shape {:?} of {} requires {}",
            name,
            tensor.data().len(),
            tensor.shape(),
            tensor.dtype(),
            expected
        )));
    }
    Ok(())
}

fn metadata_record_len(name: &str, tensor: &Tensor) -> usize {
    // name_len + name + rank + dims + tag_len + tag
    4 + name.len() + 4 + 4 * tensor.shape().len() + 4 + tensor.dtype().tag().len()
}

fn write_metadata_record(out: &mut Vec<u8>, name: &str, tensor: &Tensor) {
    out.extend_from_slice(&(name.len() as u32).to_le_bytes());
    out.extend_from_slice(name.as_bytes());

    out.extend_from_slice(&(tensor.shape().len() as u32).to_le_bytes());
    for &dim in tensor.shape() {
        out.extend_from_slice(&dim.to_le_bytes());
    }

    let tag = tensor.dtype().tag();
    out.extend_from_slice(&(tag.len() as u32).to_le_bytes());
    out.extend_from_slice(tag.as_bytes());
}
