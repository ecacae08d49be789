#![cfg(feature = "alloc")]

//! Structural invariants from spec §3/§4 that hold for every value, not just hand-picked
//! vectors: round-tripping, canonicality, map ordering, and depth limiting.

use dagcbor::{decode_with_limits, Cid, DecodeLimits, ErrorCode, IpldMap, IpldValue};

fn round_trip(value: &IpldValue) -> IpldValue {
    let bytes = value.encode().unwrap();
    dagcbor::decode(&bytes).unwrap()
}

#[test]
fn scalars_round_trip() {
    assert_eq!(round_trip(&IpldValue::Null), IpldValue::Null);
    assert_eq!(round_trip(&IpldValue::Bool(true)), IpldValue::Bool(true));
    assert_eq!(
        round_trip(&IpldValue::int(-12345).unwrap()),
        IpldValue::int(-12345).unwrap()
    );
    assert_eq!(
        round_trip(&IpldValue::float(2.5).unwrap()),
        IpldValue::float(2.5).unwrap()
    );
    assert_eq!(
        round_trip(&IpldValue::Bytes(vec![9, 8, 7])),
        IpldValue::Bytes(vec![9, 8, 7])
    );
    assert_eq!(round_trip(&IpldValue::text("abc")), IpldValue::text("abc"));
}

#[test]
fn full_integer_range_round_trips() {
    for v in [dagcbor::INT_MIN, dagcbor::INT_MIN + 1, -1, 0, 1, dagcbor::INT_MAX - 1, dagcbor::INT_MAX] {
        let value = IpldValue::int(v).unwrap();
        assert_eq!(round_trip(&value), value);
    }
}

#[test]
fn integer_just_outside_range_is_rejected_at_construction() {
    assert_eq!(
        IpldValue::int(dagcbor::INT_MAX + 1).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
    assert_eq!(
        IpldValue::int(dagcbor::INT_MIN - 1).unwrap_err().code,
        ErrorCode::IntegerOutOfRange
    );
}

#[test]
fn nested_containers_round_trip() {
    let map = IpldMap::new(vec![
        ("list".into(), IpldValue::List(vec![
            IpldValue::int(1).unwrap(),
            IpldValue::Null,
            IpldValue::Bool(false),
        ])),
        ("nested".into(), IpldValue::Map(
            IpldMap::new(vec![("inner".into(), IpldValue::text("x"))]).unwrap(),
        )),
    ])
    .unwrap();
    let value = IpldValue::Map(map);
    assert_eq!(round_trip(&value), value);
}

#[test]
fn cid_round_trips_through_tag_42() {
    let cid = Cid::from_bytes(vec![0x12, 0x20, 0xaa, 0xbb]);
    let value = IpldValue::Cid(cid);
    assert_eq!(round_trip(&value), value);
}

#[test]
fn every_canonical_encoding_is_its_own_unique_form() {
    // Re-encoding a decoded value must reproduce the exact same bytes: canonical bytes
    // are the value, so there is no second encoding that decodes to the same thing.
    let map = IpldMap::new(vec![
        ("zz".into(), IpldValue::int(1).unwrap()),
        ("a".into(), IpldValue::int(2).unwrap()),
        ("bb".into(), IpldValue::int(3).unwrap()),
    ])
    .unwrap();
    let original = IpldValue::Map(map).encode().unwrap();
    let decoded = dagcbor::decode(&original).unwrap();
    let reencoded = decoded.encode().unwrap();
    assert_eq!(original, reencoded);
}

#[test]
fn map_iteration_order_is_always_canonical() {
    let map = IpldMap::new(vec![
        ("zz".into(), IpldValue::Null),
        ("a".into(), IpldValue::Null),
        ("bb".into(), IpldValue::Null),
    ])
    .unwrap();
    let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["a", "bb", "zz"]);
}

#[test]
fn depth_limit_rejects_excessively_nested_input() {
    let mut bytes = Vec::new();
    for _ in 0..10 {
        bytes.push(0x81); // array of length 1
    }
    bytes.push(0x00); // innermost: integer 0
    let limits = DecodeLimits {
        max_depth: 5,
        ..DecodeLimits::unbounded()
    };
    let err = decode_with_limits(&bytes, limits).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
}

#[test]
fn depth_within_limit_succeeds() {
    let mut bytes = Vec::new();
    for _ in 0..3 {
        bytes.push(0x81);
    }
    bytes.push(0x00);
    let limits = DecodeLimits {
        max_depth: 5,
        ..DecodeLimits::unbounded()
    };
    assert!(decode_with_limits(&bytes, limits).is_ok());
}
