//! Canonical DAG-CBOR decoder (spec §4.3).

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::alloc_util::{try_vec_from_slice, try_vec_with_capacity};
use crate::diagnostics::Path;
use crate::float::validate_f64_bits;
use crate::limits::DecodeLimits;
use crate::order::is_strictly_increasing;
use crate::utf8;
use crate::value::{Int, IpldMap, IpldValue};
use crate::wire::{len_to_usize, read_argument, read_length, Cursor};
use crate::{Cid, CodecError, ErrorCode};

/// Called once per decoded item, purely for observability; it never affects parsing and its
/// return value (if any) is ignored.
pub trait Observer {
    /// Invoked just after an item has been decoded, with the path leading to it and the
    /// byte offset where it started.
    fn on_item(&mut self, path: &Path, offset: usize);
}

impl<F: FnMut(&Path, usize)> Observer for F {
    fn on_item(&mut self, path: &Path, offset: usize) {
        self(path, offset);
    }
}

struct State<'a> {
    limits: DecodeLimits,
    total_items: usize,
    observer: Option<&'a mut dyn Observer>,
}

impl State<'_> {
    fn count_item(&mut self, offset: usize) -> Result<(), CodecError> {
        self.total_items += 1;
        if self.total_items > self.limits.max_total_items {
            return Err(CodecError::decode(
                ErrorCode::TotalItemsLimitExceeded,
                offset,
            ));
        }
        Ok(())
    }

    fn notify(&mut self, path: &Path, offset: usize) {
        if let Some(obs) = self.observer.as_deref_mut() {
            obs.on_item(path, offset);
        }
    }
}

/// Attach the live container `path` to an error raised by a lower layer (the head codec,
/// UTF-8 validation, fallible allocation) that has no notion of `Path` of its own. This is
/// the single point where every decode error picks up the container stack leading to the
/// byte that failed (spec §4.3/§4.4/§7).
#[inline]
fn at<T>(result: Result<T, CodecError>, path: &Path) -> Result<T, CodecError> {
    result.map_err(|e| e.with_path(path.clone()))
}

/// Decode exactly one canonical DAG-CBOR item, rejecting any trailing bytes, using default
/// limits derived from the input's length (see [`DecodeLimits::for_input`]).
///
/// # Errors
///
/// Returns an error on any non-canonical, malformed, or out-of-range input, or if the
/// input contains anything after the single top-level item.
pub fn decode(bytes: &[u8]) -> Result<IpldValue, CodecError> {
    decode_with_limits(bytes, DecodeLimits::for_input(bytes.len()))
}

/// Like [`decode`], with explicit resource limits.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_limits(bytes: &[u8], limits: DecodeLimits) -> Result<IpldValue, CodecError> {
    let (value, consumed) = decode_concat_inner(bytes, limits, None)?;
    if consumed != bytes.len() {
        return Err(CodecError::decode(ErrorCode::TrailingBytes, consumed));
    }
    Ok(value)
}

/// Decode the first canonical DAG-CBOR item in `bytes`, permitting (and reporting) trailing
/// bytes. Returns the decoded value and the number of bytes it occupied.
///
/// # Errors
///
/// Returns an error on any non-canonical, malformed, or out-of-range leading item.
pub fn decode_concat(bytes: &[u8]) -> Result<(IpldValue, usize), CodecError> {
    decode_concat_inner(bytes, DecodeLimits::for_input(bytes.len()), None)
}

/// Like [`decode_concat`], with explicit resource limits.
///
/// # Errors
///
/// See [`decode_concat`].
pub fn decode_concat_with_limits(
    bytes: &[u8],
    limits: DecodeLimits,
) -> Result<(IpldValue, usize), CodecError> {
    decode_concat_inner(bytes, limits, None)
}

/// Like [`decode_with_limits`], additionally invoking `observer` once per decoded item.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_observed(
    bytes: &[u8],
    limits: DecodeLimits,
    observer: &mut dyn Observer,
) -> Result<IpldValue, CodecError> {
    let (value, consumed) = decode_concat_inner(bytes, limits, Some(observer))?;
    if consumed != bytes.len() {
        return Err(CodecError::decode(ErrorCode::TrailingBytes, consumed));
    }
    Ok(value)
}

fn decode_concat_inner(
    bytes: &[u8],
    limits: DecodeLimits,
    observer: Option<&mut dyn Observer>,
) -> Result<(IpldValue, usize), CodecError> {
    if bytes.len() > limits.max_input_len {
        return Err(CodecError::decode(ErrorCode::MessageLenLimitExceeded, 0));
    }
    let mut state = State {
        limits,
        total_items: 0,
        observer,
    };
    let mut cursor = Cursor::with_pos(bytes, 0);
    let mut path = Path::root();
    let value = decode_one(&mut cursor, &mut state, &mut path, 0)?;
    Ok((value, cursor.position()))
}

fn decode_one(
    cursor: &mut Cursor<'_>,
    state: &mut State<'_>,
    path: &mut Path,
    depth: usize,
) -> Result<IpldValue, CodecError> {
    let item_offset = cursor.position();
    at(state.limits.check_depth(depth, item_offset), path)?;
    at(state.count_item(item_offset), path)?;

    let (major, ai) = at(cursor.read_head_byte(), path)?;
    let value = match major {
        0 => {
            let v = at(read_argument(cursor, ai, item_offset), path)?;
            IpldValue::Int(Int::new_unchecked(i128::from(v)))
        }
        1 => {
            let v = at(read_argument(cursor, ai, item_offset), path)?;
            IpldValue::Int(Int::new_unchecked(-1 - i128::from(v)))
        }
        2 => decode_bytes(cursor, state, ai, item_offset, path)?,
        3 => decode_text(cursor, state, ai, item_offset, path)?,
        4 => decode_list(cursor, state, path, ai, item_offset, depth)?,
        5 => decode_map(cursor, state, path, ai, item_offset, depth)?,
        6 => decode_tagged(cursor, state, ai, item_offset, path)?,
        7 => decode_simple(cursor, ai, item_offset, path)?,
        _ => unreachable!("major type is 3 bits, always 0..=7"),
    };

    state.notify(path, item_offset);
    Ok(value)
}

fn decode_bytes(
    cursor: &mut Cursor<'_>,
    state: &State<'_>,
    ai: u8,
    head_offset: usize,
    path: &Path,
) -> Result<IpldValue, CodecError> {
    let raw_len = at(read_length(cursor, ai, head_offset), path)?;
    let len = at(len_to_usize(raw_len, head_offset), path)?;
    if len > state.limits.max_bytes_len {
        return Err(CodecError::decode_at(
            ErrorCode::BytesLenLimitExceeded,
            head_offset,
            path.clone(),
        ));
    }
    let slice = at(cursor.read_exact(len), path)?;
    Ok(IpldValue::Bytes(at(
        try_vec_from_slice(slice, head_offset),
        path,
    )?))
}

fn decode_text(
    cursor: &mut Cursor<'_>,
    state: &State<'_>,
    ai: u8,
    head_offset: usize,
    path: &Path,
) -> Result<IpldValue, CodecError> {
    let raw_len = at(read_length(cursor, ai, head_offset), path)?;
    let len = at(len_to_usize(raw_len, head_offset), path)?;
    if len > state.limits.max_text_len {
        return Err(CodecError::decode_at(
            ErrorCode::TextLenLimitExceeded,
            head_offset,
            path.clone(),
        ));
    }
    let slice = at(cursor.read_exact(len), path)?;
    let s = utf8::trusted(slice)
        .map_err(|()| CodecError::decode_at(ErrorCode::Utf8Invalid, head_offset, path.clone()))?;
    let boxed: Box<str> = at(crate::alloc_util::try_box_str_from_str(s, head_offset), path)?;
    Ok(IpldValue::String(boxed))
}

fn decode_list(
    cursor: &mut Cursor<'_>,
    state: &mut State<'_>,
    path: &mut Path,
    ai: u8,
    head_offset: usize,
    depth: usize,
) -> Result<IpldValue, CodecError> {
    let raw_len = at(read_length(cursor, ai, head_offset), path)?;
    let len = at(len_to_usize(raw_len, head_offset), path)?;
    if len > state.limits.max_array_len {
        return Err(CodecError::decode_at(
            ErrorCode::ArrayLenLimitExceeded,
            head_offset,
            path.clone(),
        ));
    }
    if len > cursor.remaining() {
        return Err(CodecError::decode_at(
            ErrorCode::UnexpectedEof,
            head_offset,
            path.clone(),
        ));
    }
    let mut items = at(try_vec_with_capacity(len, head_offset), path)?;
    for i in 0..len {
        path.push_index(i);
        let item = decode_one(cursor, state, path, depth + 1)?;
        path.pop();
        items.try_reserve(1).map_err(|_| {
            CodecError::decode_at(ErrorCode::AllocationFailed, cursor.position(), path.clone())
        })?;
        items.push(item);
    }
    Ok(IpldValue::List(items))
}

fn decode_map(
    cursor: &mut Cursor<'_>,
    state: &mut State<'_>,
    path: &mut Path,
    ai: u8,
    head_offset: usize,
    depth: usize,
) -> Result<IpldValue, CodecError> {
    let raw_len = at(read_length(cursor, ai, head_offset), path)?;
    let len = at(len_to_usize(raw_len, head_offset), path)?;
    if len > state.limits.max_map_len {
        return Err(CodecError::decode_at(
            ErrorCode::MapLenLimitExceeded,
            head_offset,
            path.clone(),
        ));
    }
    if len > cursor.remaining() {
        return Err(CodecError::decode_at(
            ErrorCode::UnexpectedEof,
            head_offset,
            path.clone(),
        ));
    }
    let mut entries: Vec<(Box<str>, IpldValue)> = at(try_vec_with_capacity(len, head_offset), path)?;
    let mut prev_key: Option<Box<str>> = None;
    for _ in 0..len {
        let key_offset = cursor.position();
        let (key_major, key_ai) = at(cursor.read_head_byte(), path)?;
        if key_major != 3 {
            return Err(CodecError::decode_at(
                ErrorCode::MapKeyMustBeText,
                key_offset,
                path.clone(),
            ));
        }
        let raw_key_len = at(read_length(cursor, key_ai, key_offset), path)?;
        let key_len = at(len_to_usize(raw_key_len, key_offset), path)?;
        if key_len > state.limits.max_text_len {
            return Err(CodecError::decode_at(
                ErrorCode::TextLenLimitExceeded,
                key_offset,
                path.clone(),
            ));
        }
        let key_slice = at(cursor.read_exact(key_len), path)?;
        let key_str = utf8::trusted(key_slice).map_err(|()| {
            CodecError::decode_at(ErrorCode::Utf8Invalid, key_offset, path.clone())
        })?;

        if let Some(prev) = &prev_key {
            if !is_strictly_increasing(prev, key_str) {
                let code = if prev.as_ref() == key_str {
                    ErrorCode::DuplicateMapKey
                } else {
                    ErrorCode::NonCanonicalMapOrder
                };
                return Err(CodecError::decode_at(code, key_offset, path.clone()));
            }
        }
        let key: Box<str> = at(
            crate::alloc_util::try_box_str_from_str(key_str, key_offset),
            path,
        )?;

        path.push_key(&key);
        let value = decode_one(cursor, state, path, depth + 1)?;
        path.pop();

        prev_key = Some(key.clone());
        entries.try_reserve(1).map_err(|_| {
            CodecError::decode_at(ErrorCode::AllocationFailed, cursor.position(), path.clone())
        })?;
        entries.push((key, value));
    }
    Ok(IpldValue::Map(IpldMap::from_sorted_entries(entries)))
}

fn decode_tagged(
    cursor: &mut Cursor<'_>,
    state: &mut State<'_>,
    ai: u8,
    head_offset: usize,
    path: &Path,
) -> Result<IpldValue, CodecError> {
    let tag = at(read_argument(cursor, ai, head_offset), path)?;
    if tag != 42 {
        return Err(CodecError::decode_at(
            ErrorCode::UnexpectedTag,
            head_offset,
            path.clone(),
        ));
    }
    let content_offset = cursor.position();
    let (content_major, content_ai) = at(cursor.read_head_byte(), path)?;
    if content_major != 2 {
        return Err(CodecError::decode_at(
            ErrorCode::UnexpectedTag,
            content_offset,
            path.clone(),
        ));
    }
    let raw_len = at(read_length(cursor, content_ai, content_offset), path)?;
    let len = at(len_to_usize(raw_len, content_offset), path)?;
    if len > state.limits.max_bytes_len {
        return Err(CodecError::decode_at(
            ErrorCode::BytesLenLimitExceeded,
            content_offset,
            path.clone(),
        ));
    }
    let slice = at(cursor.read_exact(len), path)?;
    match slice.split_first() {
        Some((0x00, rest)) => Ok(IpldValue::Cid(Cid::from_bytes(at(
            try_vec_from_slice(rest, content_offset),
            path,
        )?))),
        _ => Err(CodecError::decode_at(
            ErrorCode::InvalidCidPrefix,
            content_offset,
            path.clone(),
        )),
    }
}

fn decode_simple(
    cursor: &mut Cursor<'_>,
    ai: u8,
    head_offset: usize,
    path: &Path,
) -> Result<IpldValue, CodecError> {
    match ai {
        20 => Ok(IpldValue::Bool(false)),
        21 => Ok(IpldValue::Bool(true)),
        22 => Ok(IpldValue::Null),
        27 => {
            let raw = at(cursor.read_exact(8), path)?;
            let bits =
                u64::from_be_bytes(raw.try_into().expect("read_exact(8) yields 8 bytes"));
            validate_f64_bits(bits)
                .map_err(|code| CodecError::decode_at(code, head_offset, path.clone()))?;
            Ok(IpldValue::Float(crate::value::Float::new_unchecked(bits)))
        }
        28..=30 => Err(CodecError::decode_at(
            ErrorCode::ReservedAdditionalInfo,
            head_offset,
            path.clone(),
        )),
        31 => Err(CodecError::decode_at(
            ErrorCode::IndefiniteLengthForbidden,
            head_offset,
            path.clone(),
        )),
        _ => Err(CodecError::decode_at(
            ErrorCode::UnsupportedSimpleValue,
            head_offset,
            path.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_small_map() {
        let encoded = crate::encode::encode_to_vec(&IpldValue::Map(
            IpldMap::new(alloc::vec![
                (Box::from("a"), IpldValue::int(12).unwrap()),
                (Box::from("b"), IpldValue::text("hello!")),
            ])
            .unwrap(),
        ))
        .unwrap();
        let decoded = decode(&encoded).unwrap();
        let map = decoded.as_map().unwrap();
        assert_eq!(map.get("a").and_then(IpldValue::as_int).map(Int::get), Some(12));
        assert_eq!(map.get("b").and_then(IpldValue::as_str), Some("hello!"));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = crate::encode::encode_to_vec(&IpldValue::Bool(true)).unwrap();
        bytes.push(0x00);
        let err = decode(&bytes).unwrap_err();
        assert_eq!(err.code, ErrorCode::TrailingBytes);
    }

    #[test]
    fn decode_concat_reports_consumed_length_and_allows_trailing() {
        let mut bytes = crate::encode::encode_to_vec(&IpldValue::Bool(true)).unwrap();
        let first_len = bytes.len();
        bytes.push(0xf6);
        let (value, consumed) = decode_concat(&bytes).unwrap();
        assert_eq!(value.as_bool(), Some(true));
        assert_eq!(consumed, first_len);
    }

    #[test]
    fn rejects_out_of_order_map_keys() {
        // {"b": null, "a": null} -- wrong order
        let data = [0xa2, 0x61, b'b', 0xf6, 0x61, b'a', 0xf6];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::NonCanonicalMapOrder);
    }

    #[test]
    fn rejects_duplicate_map_keys() {
        let data = [0xa2, 0x61, b'a', 0xf6, 0x61, b'a', 0xf6];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateMapKey);
    }

    #[test]
    fn rejects_non_text_map_key() {
        let data = [0xa1, 0x01, 0xf6];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::MapKeyMustBeText);
    }

    #[test]
    fn rejects_nan_float() {
        let mut data = alloc::vec![0xfb];
        data.extend_from_slice(&f64::NAN.to_bits().to_be_bytes());
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::DisallowedFloat);
    }

    #[test]
    fn rejects_indefinite_length_array() {
        let data = [0x9f, 0xff];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::IndefiniteLengthForbidden);
    }

    #[test]
    fn decodes_tag_42_cid() {
        let mut data = alloc::vec![0xd8, 0x2a, 0x44, 0x00];
        data.extend_from_slice(&[1, 2, 3]);
        let value = decode(&data).unwrap();
        assert_eq!(value.as_cid().unwrap().as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn rejects_cid_without_zero_prefix() {
        let data = [0xd8, 0x2a, 0x43, 1, 2, 3];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCidPrefix);
    }

    #[test]
    fn rejects_non_canonical_length_argument() {
        // byte string header says 1-byte extension for a length that fits in 0..=23
        let data = [0x58, 0x01, 0xff];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::NonCanonicalEncoding);
    }

    #[test]
    fn error_path_reflects_the_container_stack_at_failure() {
        // {"x": [<break byte, invalid here>]}
        let data = [0xa1, 0x61, b'x', 0x81, 0xff];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::IndefiniteLengthForbidden);
        assert_eq!(err.path.to_string(), "root/map[\"x\"]/list[0]");
    }

    #[test]
    fn error_path_is_root_when_the_outermost_head_is_malformed() {
        let data = [0x1c];
        let err = decode(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservedAdditionalInfo);
        assert_eq!(err.path.to_string(), "root");
    }
}
