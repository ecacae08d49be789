//! Thin adapter over the byte-oriented core routines (spec §5/§6).
//!
//! [`ByteSink`] and [`ByteSource`] are the streaming counterparts of the buffer-oriented
//! `encode`/`decode` entry points. This layer does no validation of its own: `encode_into`
//! still builds canonical bytes with [`crate::encode`] before handing them to the sink, and
//! [`decode_from_source`] still decodes through [`crate::decode`] once the source has been
//! drained into a buffer. Callers who already have a full buffer should prefer the
//! buffer-oriented functions directly; these traits exist for callers who only have a
//! `Read`/`Write`-shaped collaborator.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::{CodecError, ErrorCode};

/// A sink bytes can be written into, returning the number of bytes actually accepted.
///
/// A `write` that returns `Ok(0)` for non-empty input is treated by [`ByteSink::write_all`]
/// as a failure, matching the usual `std::io::Write` convention.
pub trait ByteSink {
    /// Write as much of `bytes` as the sink can currently accept, returning the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying sink reports a failure.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, CodecError>;

    /// Write all of `bytes`, looping until the sink has accepted every byte.
    ///
    /// # Errors
    ///
    /// Returns `SinkWriteFailed` if the sink stalls (reports `Ok(0)` for non-empty input),
    /// or whatever error `write` itself returns.
    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), CodecError> {
        while !bytes.is_empty() {
            let n = self.write(bytes)?;
            if n == 0 {
                return Err(CodecError::encode(ErrorCode::SinkWriteFailed));
            }
            bytes = &bytes[n..];
        }
        Ok(())
    }
}

/// A source bytes can be read from, returning fewer bytes than requested only at end of
/// input (spec §6).
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`, returning the count actually read. `Ok(0)`
    /// signals end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source reports a failure.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError>;

    /// Read the source to exhaustion, accumulating at most `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if the source has not ended after `limit` bytes,
    /// or whatever error `read` itself returns.
    #[cfg(feature = "alloc")]
    fn read_to_end(&mut self, limit: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            if out.len() + n > limit {
                return Err(CodecError::decode(ErrorCode::MessageLenLimitExceeded, out.len()));
            }
            out.try_reserve(n)
                .map_err(|_| CodecError::decode(ErrorCode::AllocationFailed, out.len()))?;
            out.extend_from_slice(&chunk[..n]);
        }
    }
}

#[cfg(all(feature = "alloc", not(feature = "std")))]
impl ByteSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, CodecError> {
        self.try_reserve(bytes.len())
            .map_err(|_| CodecError::encode(ErrorCode::AllocationFailed))?;
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

/// A cursor over an in-memory byte slice, implementing [`ByteSource`] without requiring
/// `std`.
#[derive(Clone, Copy)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Construct a source reading from `data`, starting at its first byte.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for W {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, CodecError> {
        std::io::Write::write(self, bytes).map_err(|_| CodecError::encode(ErrorCode::SinkWriteFailed))
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for R {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        std::io::Read::read(self, buf).map_err(|_| CodecError::decode(ErrorCode::SourceReadFailed, 0))
    }
}

/// Decode a single canonical DAG-CBOR item from a [`ByteSource`], draining it to exhaustion
/// first (the core decoder is buffer-oriented; see module docs).
///
/// # Errors
///
/// Returns `MessageLenLimitExceeded` if the source yields more than `limits.max_input_len`
/// bytes, or any error [`crate::decode::decode_with_limits`] can return.
#[cfg(feature = "alloc")]
pub fn decode_from_source(
    source: &mut impl ByteSource,
    limits: crate::DecodeLimits,
) -> Result<crate::IpldValue, CodecError> {
    let buf = source.read_to_end(limits.max_input_len)?;
    crate::decode::decode_with_limits(&buf, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_reads_in_chunks() {
        let data = [1u8, 2, 3, 4, 5];
        let mut src = SliceSource::new(&data);
        let mut buf = [0u8; 2];
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [3, 4]);
        assert_eq!(src.read(&mut buf).unwrap(), 1);
        assert_eq!(src.read(&mut buf).unwrap(), 0);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn read_to_end_collects_all_bytes() {
        let data = [9u8; 10];
        let mut src = SliceSource::new(&data);
        let out = src.read_to_end(100).unwrap();
        assert_eq!(out, data);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn read_to_end_rejects_oversized_source() {
        let data = [0u8; 10];
        let mut src = SliceSource::new(&data);
        let err = src.read_to_end(5).unwrap_err();
        assert_eq!(err.code, ErrorCode::MessageLenLimitExceeded);
    }
}
