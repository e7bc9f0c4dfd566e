// In: src/format.rs

//! Defines the on-disk structures and agreements for the tenarc format.
//! This is the single source of truth for the self-describing header layout
//! and for the fixed-schema agreement used by the headerless mode.
//!
//! General mode, all integers little-endian u32:
//!
//! ```text
//! u32                      entry_count
//! repeat entry_count:
//!   u32                    name_len
//!   byte[name_len]         name (UTF-8)
//!   u32                    shape_rank
//!   u32[shape_rank]        shape dims
//!   u32                    dtype_tag_len
//!   byte[dtype_tag_len]    dtype_tag (UTF-8)
//! repeat entry_count (same order):
//!   byte[num_elements*itemsize]   raw tensor data, row-major
//! ```
//!
//! Fixed-schema mode omits the entire metadata section: the stream is just
//! the concatenated data blocks for a statically agreed `Schema`, in agreed
//! order. Metadata-record order always equals data-block order; that pairing
//! is what lets the decoder size each block without per-block length prefixes.

use crate::archive::Archive;
use crate::error::TenarcError;
use crate::tensor::num_elements;
use crate::types::ElementType;
use serde::{Deserialize, Serialize};

/// One (name, shape, dtype) triple of an archive layout.
///
/// This is both a parsed metadata record (general mode) and one row of an
/// external agreement (fixed-schema mode).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub shape: Vec<u32>,
    pub dtype: ElementType,
}

impl SchemaEntry {
    pub fn num_elements(&self) -> u64 {
        num_elements(&self.shape)
    }

    /// The exact byte length of this entry's data block.
    ///
    /// Saturates at `u64::MAX` rather than wrapping: entries can be parsed
    /// from a hostile header, and the saturated value always fails the
    /// decoder's fits-the-buffer checks.
    pub fn data_len(&self) -> u64 {
        self.num_elements().saturating_mul(self.dtype.item_size() as u64)
    }
}

/// The externally agreed, ordered layout for fixed-schema mode.
///
/// Serde-derived so that an agreement can be pinned and exchanged as JSON
/// (dtype serializes as its canonical tag string) instead of being hardcoded
/// at both ends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn new(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    /// The schema an archive would encode under, in its layout order.
    pub fn of_archive(archive: &Archive) -> Self {
        Self {
            entries: archive
                .iter()
                .map(|(name, tensor)| SchemaEntry {
                    name: name.to_string(),
                    shape: tensor.shape().to_vec(),
                    dtype: tensor.dtype(),
                })
                .collect(),
        }
    }

    /// Total byte length of all data blocks the schema declares, saturating
    /// like `SchemaEntry::data_len`.
    pub fn data_len(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.data_len()))
    }

    pub fn to_json(&self) -> Result<String, TenarcError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, TenarcError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Header-only view of an encoded archive, as returned by `peek_manifest`.
/// Lets callers list names/shapes/dtypes without touching the data blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Parsed metadata records, in layout order.
    pub entries: Vec<SchemaEntry>,
    /// Byte offset where the data blocks begin.
    pub header_size: usize,
    /// Total byte length of all declared data blocks.
    pub data_size: u64,
}
