//! This module defines the canonical, type-safe representation of tensor
//! element types used throughout the tenarc codec.

use crate::error::TenarcError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical, closed enumeration of element types the archive format understands.
///
/// This enum replaces the runtime dtype objects of the original tooling with a
/// compile-time checked enum paired with a byte-width table, eliminating an
/// entire class of reflection-style runtime errors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Float32,
    Float64,
    Int32,
    UInt8,
}

impl ElementType {
    /// Every recognized element type. Extending the format means extending this
    /// table together with `tag`/`from_tag` and `item_size`.
    pub const ALL: [ElementType; 4] = [
        ElementType::Float32,
        ElementType::Float64,
        ElementType::Int32,
        ElementType::UInt8,
    ];

    /// The width of a single element in bytes.
    pub fn item_size(&self) -> usize {
        match self {
            Self::Float32 => 4,
            Self::Float64 => 8,
            Self::Int32 => 4,
            Self::UInt8 => 1,
        }
    }

    /// The canonical on-disk tag string. These strings are part of the public
    /// wire contract and must never change for existing variants.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::UInt8 => "uint8",
        }
    }

    /// Parses an on-disk dtype tag.
    ///
    /// This is the single boundary where an out-of-enumeration dtype can enter
    /// the system; everywhere else the closed enum makes an unsupported dtype
    /// unrepresentable.
    pub fn from_tag(tag: &str) -> Result<Self, TenarcError> {
        match tag {
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            "int32" => Ok(Self::Int32),
            "uint8" => Ok(Self::UInt8),
            other => Err(TenarcError::UnsupportedDtype(other.to_string())),
        }
    }
}

/// Provides the canonical string representation for an `ElementType`.
impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip_for_every_variant() {
        for et in ElementType::ALL {
            assert_eq!(ElementType::from_tag(et.tag()).unwrap(), et);
        }
    }

    #[test]
    fn test_item_sizes_match_wire_contract() {
        assert_eq!(ElementType::Float32.item_size(), 4);
        assert_eq!(ElementType::Float64.item_size(), 8);
        assert_eq!(ElementType::Int32.item_size(), 4);
        assert_eq!(ElementType::UInt8.item_size(), 1);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = ElementType::from_tag("complex64").unwrap_err();
        match err {
            TenarcError::UnsupportedDtype(tag) => assert_eq!(tag, "complex64"),
            other => panic!("expected UnsupportedDtype, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_uses_tag_strings() {
        let json = serde_json::to_string(&ElementType::UInt8).unwrap();
        assert_eq!(json, "\"uint8\"");
        let back: ElementType = serde_json::from_str("\"float64\"").unwrap();
        assert_eq!(back, ElementType::Float64);
    }
}
