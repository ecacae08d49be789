//! Canonical DAG-CBOR encoder (spec §4.2).
//!
//! Two entry points share the same low-level head/length routines: a tree-walking
//! [`encode_to_vec`] that takes a fully built [`IpldValue`], and a streaming [`Encoder`]
//! builder whose `array`/`map` methods enforce the declared length and canonical key order
//! as entries are written, for callers assembling output incrementally.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::diagnostics::Path;
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::value::{Float, Int, IpldMap, IpldValue};
use crate::{Cid, CodecError, ErrorCode};

/// Attach the live value-tree path to an error raised by a leaf writer (head codec, length
/// overflow, allocation) that has no notion of `Path` of its own.
#[inline]
fn at<T>(result: Result<T, CodecError>, path: &Path) -> Result<T, CodecError> {
    result.map_err(|e| e.with_path(path.clone()))
}

trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError>;

    fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        self.write(&[byte])
    }

    fn position(&self) -> usize;
}

struct VecSink {
    buf: Vec<u8>,
}

impl VecSink {
    const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self { buf }
    }

    fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    fn reserve(&mut self, additional: usize) -> Result<(), CodecError> {
        let available = self.buf.capacity().saturating_sub(self.buf.len());
        if additional <= available {
            return Ok(());
        }
        self.buf
            .try_reserve(additional)
            .map_err(|_| CodecError::encode(ErrorCode::AllocationFailed))
    }
}

impl Sink for VecSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn position(&self) -> usize {
        self.buf.len()
    }
}

fn encode_major_uint<S: Sink>(sink: &mut S, major: u8, value: u64) -> Result<(), CodecError> {
    debug_assert!(major <= 7);
    if value < 24 {
        let v = u8::try_from(value).expect("checked < 24");
        return sink.write_u8((major << 5) | v);
    }
    if value <= 0xff {
        let v = u8::try_from(value).expect("checked <= 0xff");
        sink.write_u8((major << 5) | 24)?;
        return sink.write_u8(v);
    }
    if value <= 0xffff {
        let v = u16::try_from(value).expect("checked <= 0xffff");
        sink.write_u8((major << 5) | 25)?;
        return sink.write(&v.to_be_bytes());
    }
    if value <= 0xffff_ffff {
        let v = u32::try_from(value).expect("checked <= 0xffff_ffff");
        sink.write_u8((major << 5) | 26)?;
        return sink.write(&v.to_be_bytes());
    }
    sink.write_u8((major << 5) | 27)?;
    sink.write(&value.to_be_bytes())
}

fn encode_major_len<S: Sink>(sink: &mut S, major: u8, len: usize) -> Result<(), CodecError> {
    let len_u64 = u64::try_from(len).map_err(|_| CodecError::encode(ErrorCode::LengthOverflow))?;
    encode_major_uint(sink, major, len_u64)
}

fn encode_int<S: Sink>(sink: &mut S, value: Int) -> Result<(), CodecError> {
    let v = value.get();
    if v >= 0 {
        let u = u64::try_from(v).map_err(|_| CodecError::encode(ErrorCode::LengthOverflow))?;
        encode_major_uint(sink, 0, u)
    } else {
        let n = -1_i128 - v;
        let u = u64::try_from(n).map_err(|_| CodecError::encode(ErrorCode::LengthOverflow))?;
        encode_major_uint(sink, 1, u)
    }
}

fn encode_bytes<S: Sink>(sink: &mut S, bytes: &[u8]) -> Result<(), CodecError> {
    encode_major_len(sink, 2, bytes.len())?;
    sink.write(bytes)
}

fn encode_text<S: Sink>(sink: &mut S, s: &str) -> Result<(), CodecError> {
    let b = s.as_bytes();
    encode_major_len(sink, 3, b.len())?;
    sink.write(b)
}

fn encode_float<S: Sink>(sink: &mut S, value: Float) -> Result<(), CodecError> {
    let mut buf = [0u8; 9];
    buf[0] = 0xfb;
    buf[1..9].copy_from_slice(&value.bits().to_be_bytes());
    sink.write(&buf)
}

fn encode_cid<S: Sink>(sink: &mut S, cid: &Cid) -> Result<(), CodecError> {
    encode_major_uint(sink, 6, 42)?;
    let raw = cid.as_bytes();
    let len = raw
        .len()
        .checked_add(1)
        .ok_or_else(|| CodecError::encode(ErrorCode::LengthOverflow))?;
    encode_major_len(sink, 2, len)?;
    sink.write_u8(0x00)?;
    sink.write(raw)
}

fn encode_value_rec<S: Sink>(
    sink: &mut S,
    value: &IpldValue,
    depth: usize,
    path: &mut Path,
) -> Result<(), CodecError> {
    if depth > DEFAULT_MAX_DEPTH {
        return Err(CodecError::encode_at(ErrorCode::NestingTooDeep, path.clone()));
    }
    match value {
        IpldValue::Null => at(sink.write_u8(0xf6), path),
        IpldValue::Bool(b) => at(sink.write_u8(if *b { 0xf5 } else { 0xf4 }), path),
        IpldValue::Int(i) => at(encode_int(sink, *i), path),
        IpldValue::Float(f) => at(encode_float(sink, *f), path),
        IpldValue::Bytes(b) => at(encode_bytes(sink, b), path),
        IpldValue::String(s) => at(encode_text(sink, s), path),
        IpldValue::List(items) => {
            at(encode_major_len(sink, 4, items.len()), path)?;
            for (i, item) in items.iter().enumerate() {
                path.push_index(i);
                let res = encode_value_rec(sink, item, depth + 1, path);
                path.pop();
                res?;
            }
            Ok(())
        }
        IpldValue::Map(map) => {
            at(encode_major_len(sink, 5, map.len()), path)?;
            for (key, val) in map.entries() {
                at(encode_text(sink, key), path)?;
                path.push_key(key);
                let res = encode_value_rec(sink, val, depth + 1, path);
                path.pop();
                res?;
            }
            Ok(())
        }
        IpldValue::Cid(cid) => at(encode_cid(sink, cid), path),
    }
}

/// Encode a value to a freshly allocated `Vec<u8>`.
///
/// # Errors
///
/// Returns an error if allocation fails, a length overflows on the current target, or the
/// value tree exceeds the maximum nesting depth.
pub fn encode_to_vec(value: &IpldValue) -> Result<Vec<u8>, CodecError> {
    let mut sink = VecSink::new();
    let mut path = Path::root();
    encode_value_rec(&mut sink, value, 0, &mut path)?;
    Ok(sink.into_vec())
}

/// Encode a value into an existing [`crate::stream::ByteSink`], returning the number of
/// bytes written.
///
/// # Errors
///
/// Returns the same errors as [`encode_to_vec`], plus any error the sink itself reports.
pub fn encode_into(
    value: &IpldValue,
    out: &mut impl crate::stream::ByteSink,
) -> Result<usize, CodecError> {
    let bytes = encode_to_vec(value)?;
    out.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Streaming encoder that writes canonical DAG-CBOR directly into a `Vec<u8>`.
pub struct Encoder {
    sink: VecSink,
    depth: usize,
    root_done: bool,
}

impl Encoder {
    /// Create a new empty encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sink: VecSink::new(),
            depth: 0,
            root_done: false,
        }
    }

    /// Create an encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sink: VecSink::with_capacity(capacity),
            depth: 0,
            root_done: false,
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sink.buf.len()
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sink.buf.is_empty()
    }

    /// Consume the encoder, returning the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.sink.into_vec()
    }

    /// Borrow the bytes emitted so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.sink.buf
    }

    fn begin_value(&self) -> Result<bool, CodecError> {
        if self.depth == 0 {
            if self.root_done {
                return Err(CodecError::encode(ErrorCode::TrailingBytes));
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn finish_value(&mut self, root: bool) {
        if root {
            self.root_done = true;
        }
    }

    /// Encode a complete value (any of the nine kinds, recursively) as the next item.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not the first top-level value written, or if encoding
    /// fails for any of the reasons [`encode_to_vec`] can fail.
    pub fn value(&mut self, value: &IpldValue) -> Result<(), CodecError> {
        let root = self.begin_value()?;
        let mut path = Path::root();
        encode_value_rec(&mut self.sink, value, self.depth, &mut path)?;
        self.finish_value(root);
        Ok(())
    }

    /// Encode a definite-length list and fill it via the provided builder.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or if the builder emits a different number of
    /// items than `len`.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), CodecError>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), CodecError>,
    {
        let root = self.begin_value()?;
        let start = self.sink.buf.len();
        if let Err(err) = encode_major_len(&mut self.sink, 4, len) {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        self.depth += 1;
        let (res, remaining) = {
            let mut a = ArrayEncoder {
                enc: self,
                remaining: len,
                index: 0,
            };
            let res = f(&mut a);
            (res, a.remaining)
        };
        self.depth -= 1;
        if let Err(err) = res {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        if remaining != 0 {
            self.sink.buf.truncate(start);
            return Err(CodecError::encode(ErrorCode::ArrayLenMismatch));
        }
        self.finish_value(root);
        Ok(())
    }

    /// Encode a definite-length map and fill it via the provided builder.
    ///
    /// Entries must be written in canonical key order; out-of-order or duplicate keys
    /// fail the whole map.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails, keys are out of order or duplicated, or the
    /// builder emits a different number of entries than `len`.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), CodecError>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), CodecError>,
    {
        let root = self.begin_value()?;
        let start = self.sink.buf.len();
        if let Err(err) = encode_major_len(&mut self.sink, 5, len) {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        self.depth += 1;
        let (res, remaining) = {
            let mut m = MapEncoder {
                enc: self,
                remaining: len,
                prev_key: None,
            };
            let res = f(&mut m);
            (res, m.remaining)
        };
        self.depth -= 1;
        if let Err(err) = res {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        if remaining != 0 {
            self.sink.buf.truncate(start);
            return Err(CodecError::encode(ErrorCode::MapLenMismatch));
        }
        self.finish_value(root);
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for writing list elements into a canonical DAG-CBOR stream.
pub struct ArrayEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
    index: usize,
}

impl ArrayEncoder<'_> {
    fn consume_one(&mut self) -> Result<(), CodecError> {
        if self.remaining == 0 {
            return Err(CodecError::encode(ErrorCode::ArrayLenMismatch));
        }
        self.remaining -= 1;
        Ok(())
    }

    /// Encode the next element.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared length has already been filled or if encoding fails.
    pub fn value(&mut self, value: &IpldValue) -> Result<(), CodecError> {
        self.consume_one()?;
        let mut path = Path::root();
        path.push_index(self.index);
        self.index += 1;
        encode_value_rec(&mut self.enc.sink, value, self.enc.depth, &mut path)
    }
}

/// Builder for writing map entries into a canonical DAG-CBOR stream.
pub struct MapEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
    prev_key: Option<alloc::boxed::Box<str>>,
}

impl MapEncoder<'_> {
    /// Insert the next map entry. Keys must be supplied in canonical order; out-of-order or
    /// duplicate keys fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared length has already been filled, the key is out of
    /// canonical order (or equal to the previous key), or encoding the value fails.
    pub fn entry(&mut self, key: &str, value: &IpldValue) -> Result<(), CodecError> {
        let mut path = Path::root();
        path.push_key(key);
        if self.remaining == 0 {
            return Err(CodecError::encode_at(ErrorCode::MapLenMismatch, path));
        }
        if let Some(prev) = &self.prev_key {
            match crate::order::canonical_key_cmp(prev, key) {
                core::cmp::Ordering::Less => {}
                core::cmp::Ordering::Equal => {
                    return Err(CodecError::encode_at(ErrorCode::DuplicateMapKey, path));
                }
                core::cmp::Ordering::Greater => {
                    return Err(CodecError::encode_at(ErrorCode::NonCanonicalMapOrder, path));
                }
            }
        }
        let entry_start = self.enc.sink.buf.len();
        if let Err(err) = at(encode_text(&mut self.enc.sink, key), &path) {
            self.enc.sink.buf.truncate(entry_start);
            return Err(err);
        }
        if let Err(err) = encode_value_rec(&mut self.enc.sink, value, self.enc.depth, &mut path) {
            self.enc.sink.buf.truncate(entry_start);
            return Err(err);
        }
        self.prev_key = Some(key.into());
        self.remaining -= 1;
        Ok(())
    }
}

/// Check that a candidate set of map entries has a single key each, succeeding iff every
/// key is a (UTF-8) string and unique within the set — spec §3's map-key well-formedness
/// rule, checked fail-fast before a caller pays for sorting and building an [`IpldMap`].
///
/// Entries need not be pre-sorted; this checks uniqueness against canonical key order
/// rather than the caller's insertion order, so it also catches a caller accidentally
/// handing the same key twice under different insertion positions.
///
/// # Errors
///
/// Returns `DuplicateMapKey` if two entries share a key.
pub fn check_key_compliance(entries: &[(&str, &IpldValue)]) -> Result<(), CodecError> {
    let mut keys: Vec<&str> = Vec::new();
    keys.try_reserve_exact(entries.len())
        .map_err(|_| CodecError::encode(ErrorCode::AllocationFailed))?;
    keys.extend(entries.iter().map(|(k, _)| *k));
    keys.sort_unstable_by(|a, b| crate::order::canonical_key_cmp(a, b));
    if keys.windows(2).any(|w| w[0] == w[1]) {
        return Err(CodecError::encode(ErrorCode::DuplicateMapKey));
    }
    Ok(())
}
