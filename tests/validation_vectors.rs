#![cfg(feature = "alloc")]

//! Decode-side strictness vectors (spec §4.3/§8): every form CBOR permits but canonical
//! DAG-CBOR forbids must be a hard decode failure, with a precise `ErrorCode` and offset.

use dagcbor::{decode, decode_concat, ErrorCode};

fn err_code(bytes: &[u8]) -> ErrorCode {
    decode(bytes).unwrap_err().code
}

#[test]
fn rejects_non_canonical_one_byte_uint_argument() {
    // 0x18 0x17 encodes 23 via the one-byte extension, but 23 fits inline.
    assert_eq!(err_code(&[0x18, 0x17]), ErrorCode::NonCanonicalEncoding);
}

#[test]
fn rejects_non_canonical_two_byte_uint_argument() {
    assert_eq!(
        err_code(&[0x19, 0x00, 0xff]),
        ErrorCode::NonCanonicalEncoding
    );
}

#[test]
fn rejects_indefinite_length_array() {
    // 0x9f = array, additional info 31 (indefinite), 0xff = break.
    assert_eq!(
        err_code(&[0x9f, 0x01, 0xff]),
        ErrorCode::IndefiniteLengthForbidden
    );
}

#[test]
fn rejects_indefinite_length_text_string() {
    assert_eq!(err_code(&[0x7f, 0xff]), ErrorCode::IndefiniteLengthForbidden);
}

#[test]
fn rejects_indefinite_length_byte_string() {
    assert_eq!(err_code(&[0x5f, 0xff]), ErrorCode::IndefiniteLengthForbidden);
}

#[test]
fn rejects_indefinite_length_map() {
    assert_eq!(err_code(&[0xbf, 0xff]), ErrorCode::IndefiniteLengthForbidden);
}

#[test]
fn rejects_reserved_additional_info() {
    assert_eq!(err_code(&[0x1c]), ErrorCode::ReservedAdditionalInfo);
    assert_eq!(err_code(&[0x1d]), ErrorCode::ReservedAdditionalInfo);
    assert_eq!(err_code(&[0x1e]), ErrorCode::ReservedAdditionalInfo);
}

#[test]
fn rejects_out_of_order_map_keys() {
    // {"b": 1, "a": 2}: "b" > "a" under canonical order.
    let bytes = [
        0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0x02,
    ];
    let err = decode(&bytes).unwrap_err();
    assert_eq!(err.code, ErrorCode::NonCanonicalMapOrder);
    assert_eq!(err.offset, 4);
}

#[test]
fn rejects_duplicate_map_keys() {
    let bytes = [
        0xa2, 0x61, b'a', 0x01, 0x61, b'a', 0x02,
    ];
    assert_eq!(err_code(&bytes), ErrorCode::DuplicateMapKey);
}

#[test]
fn rejects_non_text_map_key() {
    // {1: "x"}: integer key instead of text.
    let bytes = [0xa1, 0x01, 0x61, b'x'];
    assert_eq!(err_code(&bytes), ErrorCode::MapKeyMustBeText);
}

#[test]
fn rejects_nan_float() {
    let bytes = [0xfb, 0x7f, 0xf8, 0, 0, 0, 0, 0, 0];
    assert_eq!(err_code(&bytes), ErrorCode::DisallowedFloat);
}

#[test]
fn rejects_positive_infinity() {
    let bytes = [0xfb, 0x7f, 0xf0, 0, 0, 0, 0, 0, 0];
    assert_eq!(err_code(&bytes), ErrorCode::DisallowedFloat);
}

#[test]
fn rejects_negative_infinity() {
    let bytes = [0xfb, 0xff, 0xf0, 0, 0, 0, 0, 0, 0];
    assert_eq!(err_code(&bytes), ErrorCode::DisallowedFloat);
}

#[test]
fn rejects_half_and_single_precision_floats() {
    // ai=25 (f16) and ai=26 (f32) are not float64; only ai=27 is permitted.
    assert_eq!(err_code(&[0xf9, 0, 0]), ErrorCode::UnsupportedSimpleValue);
    assert_eq!(
        err_code(&[0xfa, 0, 0, 0, 0]),
        ErrorCode::UnsupportedSimpleValue
    );
}

#[test]
fn rejects_tag_other_than_42() {
    // tag 1 (epoch-based date) wrapping an integer.
    assert_eq!(err_code(&[0xc1, 0x00]), ErrorCode::UnexpectedTag);
}

#[test]
fn rejects_tag_42_over_non_byte_string() {
    assert_eq!(err_code(&[0xd8, 0x2a, 0x01]), ErrorCode::UnexpectedTag);
}

#[test]
fn rejects_tag_42_missing_multibase_identity_prefix() {
    // tag 42 over a byte string whose first byte isn't 0x00.
    let bytes = [0xd8, 0x2a, 0x44, 0x01, 0x02, 0x03, 0x04];
    assert_eq!(err_code(&bytes), ErrorCode::InvalidCidPrefix);
}

#[test]
fn decodes_valid_tag_42_cid() {
    let bytes = [0xd8, 0x2a, 0x45, 0x00, 0x01, 0x02, 0x03, 0x04];
    let value = decode(&bytes).unwrap();
    assert_eq!(value.as_cid().unwrap().as_bytes(), &[1, 2, 3, 4]);
}

#[test]
fn trailing_bytes_rejected_by_strict_decode() {
    // Two concatenated `0` integers: `decode` requires exactly one top-level item.
    let bytes = [0x00, 0x00];
    assert_eq!(err_code(&bytes), ErrorCode::TrailingBytes);
}

#[test]
fn trailing_bytes_permitted_and_reported_by_decode_concat() {
    let bytes = [0x00, 0x00];
    let (value, consumed) = decode_concat(&bytes).unwrap();
    assert_eq!(value.as_int().unwrap().get(), 0);
    assert_eq!(consumed, 1);
}

#[test]
fn rejects_truncated_input() {
    // Byte-string head declares length 4 but only 2 bytes follow.
    let bytes = [0x44, 0x01, 0x02];
    assert_eq!(err_code(&bytes), ErrorCode::UnexpectedEof);
}

#[test]
fn rejects_invalid_utf8_text() {
    let bytes = [0x61, 0xff];
    assert_eq!(err_code(&bytes), ErrorCode::Utf8Invalid);
}
