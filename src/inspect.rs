// In: src/inspect.rs

//! Read-only listing of archive contents: name, shape, dtype and byte count
//! per entry, either from a decoded archive or straight from the header of
//! an encoded stream. Imposes nothing on the codec.

use colored::Colorize;

use crate::archive::Archive;
use crate::codec::peek_manifest;
use crate::error::TenarcError;
use crate::types::ElementType;

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    pub shape: Vec<u32>,
    pub dtype: ElementType,
    pub num_elements: u64,
    pub data_len: u64,
}

/// Summaries for every entry of a decoded archive, in layout order.
pub fn describe(archive: &Archive) -> Vec<EntrySummary> {
    archive
        .iter()
        .map(|(name, tensor)| EntrySummary {
            name: name.to_string(),
            shape: tensor.shape().to_vec(),
            dtype: tensor.dtype(),
            num_elements: tensor.num_elements(),
            data_len: tensor.data().len() as u64,
        })
        .collect()
}

/// Summaries straight from an encoded stream's header, without reading any
/// data blocks.
pub fn describe_bytes(bytes: &[u8]) -> Result<Vec<EntrySummary>, TenarcError> {
    let manifest = peek_manifest(bytes)?;
    Ok(manifest
        .entries
        .into_iter()
        .map(|entry| EntrySummary {
            num_elements: entry.num_elements(),
            data_len: entry.data_len(),
            name: entry.name,
            shape: entry.shape,
            dtype: entry.dtype,
        })
        .collect())
}

/// Dumps a listing to stdout, one entry per line plus a total.
pub fn print_summary(summaries: &[EntrySummary]) {
    for s in summaries {
        println!(
            "{}: {}  shape: {:?}  dtype: {}  ({} bytes)",
            "entry".bold(),
            s.name.green(),
            s.shape,
            s.dtype.to_string().cyan(),
            s.data_len
        );
    }
    let total: u64 = summaries.iter().map(|s| s.data_len).sum();
    println!(
        "{} entries, {} data bytes total",
        summaries.len().to_string().bold(),
        total
    );
}
