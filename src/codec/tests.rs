// In: src/codec/tests.rs

//! Integration tests for the codec layer: wire-level layout checks,
//! round-trips across all element types, and rejection of malformed input.

use super::*;
use crate::error::TenarcError;
use crate::format::{Schema, SchemaEntry};
use crate::tensor::Tensor;
use crate::types::ElementType;
use rand::Rng;

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Archive with one entry of every supported dtype, including a scalar,
/// so truncation/round-trip tests cover the whole enumeration.
fn mixed_archive() -> Archive {
    let mut archive = Archive::new();
    archive.insert(
        "gsd_10",
        Tensor::from_vec(vec![2, 2, 3], (0..12).map(|v| v as f32 * 0.5).collect()).unwrap(),
    );
    archive.insert("scl", Tensor::from_vec(vec![2, 2], vec![4u8, 5, 4, 6]).unwrap());
    archive.insert("offsets", Tensor::from_vec(vec![3], vec![-1i32, 0, 7]).unwrap());
    archive.insert("mean", Tensor::scalar(2.25f64));
    archive
}

#[test]
fn test_single_float32_entry_has_exact_wire_layout() {
    // {"a": float32 [2,2] = [1.0, 2.0, 3.0, 4.0]}, byte for byte.
    let mut archive = Archive::new();
    archive.insert(
        "a",
        Tensor::from_vec(vec![2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap(),
    );

    let mut expected = Vec::new();
    push_u32(&mut expected, 1); // entry_count
    push_u32(&mut expected, 1); // name_len
    expected.extend_from_slice(b"a");
    push_u32(&mut expected, 2); // shape_rank
    push_u32(&mut expected, 2);
    push_u32(&mut expected, 2);
    push_u32(&mut expected, 7); // dtype_tag_len
    expected.extend_from_slice(b"float32");
    for v in [1.0f32, 2.0, 3.0, 4.0] {
        expected.extend_from_slice(&v.to_le_bytes());
    }

    let bytes = encode_archive(&archive).unwrap();
    assert_eq!(bytes, expected);

    let decoded = decode_archive(&bytes).unwrap();
    assert_eq!(decoded, archive);
    assert_eq!(
        decoded.get("a").unwrap().to_vec::<f32>().unwrap(),
        vec![1.0, 2.0, 3.0, 4.0]
    );
}

#[test]
fn test_roundtrip_preserves_names_order_shapes_dtypes_bytes() {
    let archive = mixed_archive();
    let decoded = decode_archive(&encode_archive(&archive).unwrap()).unwrap();

    assert_eq!(decoded, archive);
    let names: Vec<&str> = decoded.names().collect();
    assert_eq!(names, vec!["gsd_10", "scl", "offsets", "mean"]);
}

#[test]
fn test_scalar_and_vector_entries_stay_independent() {
    // One uint8 scalar (shape []) and one int32 [3]; order and per-entry
    // shapes/dtypes must survive independently.
    let mut archive = Archive::new();
    archive.insert("flag", Tensor::scalar(7u8));
    archive.insert("triple", Tensor::from_vec(vec![3], vec![1i32, 2, 3]).unwrap());

    let decoded = decode_archive(&encode_archive(&archive).unwrap()).unwrap();
    let names: Vec<&str> = decoded.names().collect();
    assert_eq!(names, vec!["flag", "triple"]);

    let flag = decoded.get("flag").unwrap();
    assert!(flag.is_scalar());
    assert_eq!(flag.shape(), &[] as &[u32]);
    assert_eq!(flag.dtype(), ElementType::UInt8);
    assert_eq!(flag.to_vec::<u8>().unwrap(), vec![7]);

    let triple = decoded.get("triple").unwrap();
    assert_eq!(triple.shape(), &[3]);
    assert_eq!(triple.to_vec::<i32>().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_scalar_is_not_promoted_to_one_element_vector() {
    let mut archive = Archive::new();
    archive.insert("mean", Tensor::scalar(1.5f64));

    let decoded = decode_archive(&encode_archive(&archive).unwrap()).unwrap();
    let mean = decoded.get("mean").unwrap();
    assert!(mean.is_scalar());
    assert_ne!(mean.shape(), &[1]);
    assert_eq!(mean.to_vec::<f64>().unwrap(), vec![1.5]);
}

#[test]
fn test_encoding_is_deterministic() {
    let archive = mixed_archive();
    assert_eq!(encode_archive(&archive).unwrap(), encode_archive(&archive).unwrap());

    // Re-inserting an existing entry must not disturb the layout either.
    let mut reinserted = mixed_archive();
    reinserted.insert("scl", Tensor::from_vec(vec![2, 2], vec![4u8, 5, 4, 6]).unwrap());
    assert_eq!(
        encode_archive(&archive).unwrap(),
        encode_archive(&reinserted).unwrap()
    );
}

#[test]
fn test_layout_order_follows_insertion_order() {
    let mut ab = Archive::new();
    ab.insert("a", Tensor::scalar(1u8));
    ab.insert("b", Tensor::scalar(2u8));

    let mut ba = Archive::new();
    ba.insert("b", Tensor::scalar(2u8));
    ba.insert("a", Tensor::scalar(1u8));

    assert_ne!(encode_archive(&ab).unwrap(), encode_archive(&ba).unwrap());
}

#[test]
fn test_empty_archive_roundtrips() {
    let archive = Archive::new();
    let bytes = encode_archive(&archive).unwrap();
    assert_eq!(bytes, vec![0, 0, 0, 0]);
    assert!(decode_archive(&bytes).unwrap().is_empty());
}

#[test]
fn test_every_strict_prefix_fails_as_truncated() {
    let bytes = encode_archive(&mixed_archive()).unwrap();
    for end in 0..bytes.len() {
        match decode_archive(&bytes[..end]) {
            Err(TenarcError::TruncatedInput(_)) => {}
            other => panic!("prefix of {} bytes: expected TruncatedInput, got {:?}", end, other),
        }
    }
}

#[test]
fn test_entry_count_exceeding_metadata_is_truncated() {
    // Declares two entries but carries metadata for only one: must fail,
    // never return a one-entry archive.
    let mut bytes = Vec::new();
    push_u32(&mut bytes, 2);
    push_u32(&mut bytes, 1);
    bytes.extend_from_slice(b"a");
    push_u32(&mut bytes, 0); // rank 0 (scalar)
    push_u32(&mut bytes, 5);
    bytes.extend_from_slice(b"uint8");

    assert!(matches!(
        decode_archive(&bytes),
        Err(TenarcError::TruncatedInput(_))
    ));
}

#[test]
fn test_overflowing_declared_shape_is_rejected_as_truncated() {
    // A tiny header can declare dims whose element-count product exceeds
    // u64: the size math must saturate and fail the fits-check, never panic
    // or wrap into a size the buffer appears to satisfy.
    let mut bytes = Vec::new();
    push_u32(&mut bytes, 1);
    push_u32(&mut bytes, 1);
    bytes.extend_from_slice(b"a");
    push_u32(&mut bytes, 3); // rank
    push_u32(&mut bytes, u32::MAX);
    push_u32(&mut bytes, u32::MAX);
    push_u32(&mut bytes, u32::MAX);
    push_u32(&mut bytes, 7);
    bytes.extend_from_slice(b"float64");

    assert!(matches!(
        decode_archive(&bytes),
        Err(TenarcError::TruncatedInput(_))
    ));
    assert!(matches!(
        peek_manifest(&bytes),
        Err(TenarcError::TruncatedInput(_))
    ));
}

#[test]
fn test_unrecognized_dtype_tag_is_rejected() {
    let mut bytes = Vec::new();
    push_u32(&mut bytes, 1);
    push_u32(&mut bytes, 1);
    bytes.extend_from_slice(b"a");
    push_u32(&mut bytes, 0);
    push_u32(&mut bytes, 9);
    bytes.extend_from_slice(b"complex64");

    match decode_archive(&bytes) {
        Err(TenarcError::UnsupportedDtype(tag)) => assert_eq!(tag, "complex64"),
        other => panic!("expected UnsupportedDtype, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_name_is_rejected() {
    let mut bytes = Vec::new();
    push_u32(&mut bytes, 1);
    push_u32(&mut bytes, 2);
    bytes.extend_from_slice(&[0xFF, 0xFE]); // not UTF-8
    push_u32(&mut bytes, 0);
    push_u32(&mut bytes, 5);
    bytes.extend_from_slice(b"uint8");

    assert!(matches!(
        decode_archive(&bytes),
        Err(TenarcError::InvalidUtf8(_))
    ));
}

#[test]
fn test_corrupt_name_length_cannot_trigger_huge_allocation() {
    let mut bytes = Vec::new();
    push_u32(&mut bytes, 1);
    push_u32(&mut bytes, u32::MAX); // absurd name_len
    bytes.extend_from_slice(b"a");

    assert!(matches!(
        decode_archive(&bytes),
        Err(TenarcError::TruncatedInput(_))
    ));
}

#[test]
fn test_peek_manifest_reads_header_only() {
    let archive = mixed_archive();
    let bytes = encode_archive(&archive).unwrap();

    let manifest = peek_manifest(&bytes).unwrap();
    assert_eq!(manifest.entries, Schema::of_archive(&archive).entries);
    assert_eq!(manifest.header_size as u64 + manifest.data_size, bytes.len() as u64);

    // A header with its data blocks stripped still declares them; peek must
    // notice the mismatch rather than defer the failure.
    assert!(matches!(
        peek_manifest(&bytes[..manifest.header_size]),
        Err(TenarcError::TruncatedInput(_))
    ));
}

#[test]
fn test_fixed_schema_roundtrip_matches_general_mode() {
    let archive = mixed_archive();
    let schema = Schema::of_archive(&archive);

    let headerless = encode_with_schema(&archive, &schema).unwrap();
    assert_eq!(headerless.len() as u64, schema.data_len());

    let decoded = decode_with_schema(&headerless, &schema).unwrap();
    assert_eq!(decoded, archive);
}

#[test]
fn test_fixed_schema_mismatch_is_silently_wrong_not_an_error() {
    // The fixed-schema mode trusts the caller: enough bytes + wrong schema
    // yields a wrong reshape, not a detected failure.
    let mut archive = Archive::new();
    archive.insert(
        "m",
        Tensor::from_vec(vec![2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap(),
    );
    let payload = encode_with_schema(&archive, &Schema::of_archive(&archive)).unwrap();

    let lying_schema = Schema::new(vec![SchemaEntry {
        name: "m".to_string(),
        shape: vec![4],
        dtype: ElementType::Float32,
    }]);
    let decoded = decode_with_schema(&payload, &lying_schema).unwrap();

    let m = decoded.get("m").unwrap();
    assert_eq!(m.shape(), &[4]);
    assert_eq!(m.to_vec::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_fixed_schema_truncation_is_still_detected() {
    let archive = mixed_archive();
    let schema = Schema::of_archive(&archive);
    let payload = encode_with_schema(&archive, &schema).unwrap();

    assert!(matches!(
        decode_with_schema(&payload[..payload.len() - 1], &schema),
        Err(TenarcError::TruncatedInput(_))
    ));
}

#[test]
fn test_fixed_schema_ignores_trailing_bytes() {
    let archive = mixed_archive();
    let schema = Schema::of_archive(&archive);
    let mut payload = encode_with_schema(&archive, &schema).unwrap();
    payload.extend_from_slice(&[0xAB; 16]);

    assert_eq!(decode_with_schema(&payload, &schema).unwrap(), archive);
}

#[test]
fn test_encode_with_schema_rejects_layout_disagreement() {
    let archive = mixed_archive();
    let mut schema = Schema::of_archive(&archive);
    schema.entries[0].shape = vec![12]; // disagrees with the actual [2, 2, 3]

    assert!(matches!(
        encode_with_schema(&archive, &schema),
        Err(TenarcError::InvalidTensor(_))
    ));

    schema.entries[0].name = "missing".to_string();
    assert!(matches!(
        encode_with_schema(&archive, &schema),
        Err(TenarcError::MissingEntry(_))
    ));
}

#[test]
fn test_duplicate_wire_names_overwrite_at_first_position() {
    // Undefined by the format; the in-memory insert semantics apply.
    let mut bytes = Vec::new();
    push_u32(&mut bytes, 2);
    for _ in 0..2 {
        push_u32(&mut bytes, 1);
        bytes.extend_from_slice(b"x");
        push_u32(&mut bytes, 0);
        push_u32(&mut bytes, 5);
        bytes.extend_from_slice(b"uint8");
    }
    bytes.push(1); // first block
    bytes.push(2); // second block

    let decoded = decode_archive(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get("x").unwrap().to_vec::<u8>().unwrap(), vec![2]);
}

#[test]
fn test_randomized_roundtrip() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let mut archive = Archive::new();
        let entries = rng.random_range(1..6);
        for i in 0..entries {
            let rank = rng.random_range(0..4);
            let shape: Vec<u32> = (0..rank).map(|_| rng.random_range(0..8)).collect();
            let n = crate::tensor::num_elements(&shape) as usize;
            let values: Vec<f32> = (0..n).map(|_| rng.random_range(-1.0f32..1.0)).collect();
            archive.insert(format!("t{}", i), Tensor::from_vec(shape, values).unwrap());
        }
        let decoded = decode_archive(&encode_archive(&archive).unwrap()).unwrap();
        assert_eq!(decoded, archive);
    }
}

#[test]
fn test_path_helpers_roundtrip() {
    let archive = mixed_archive();
    let path = std::env::temp_dir().join(format!("tenarc-codec-test-{}.bin", std::process::id()));

    encode_archive_to_path(&archive, &path).unwrap();
    let decoded = decode_archive_from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(decoded, archive);
}
