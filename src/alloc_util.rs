//! Fallible-allocation helpers used by the decoder (spec §5): growth is always via
//! `try_reserve_exact` so a hostile declared length reports `AllocationFailed` instead of
//! aborting the process.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{CodecError, ErrorCode};

#[inline]
pub const fn alloc_failed(offset: usize) -> CodecError {
    CodecError::decode(ErrorCode::AllocationFailed, offset)
}

#[inline]
pub fn try_vec_from_slice(bytes: &[u8], offset: usize) -> Result<Vec<u8>, CodecError> {
    let mut v = Vec::new();
    v.try_reserve_exact(bytes.len())
        .map_err(|_| alloc_failed(offset))?;
    v.extend_from_slice(bytes);
    Ok(v)
}

#[inline]
pub fn try_box_str_from_str(s: &str, offset: usize) -> Result<Box<str>, CodecError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|_| alloc_failed(offset))?;
    out.push_str(s);
    Ok(out.into_boxed_str())
}

#[inline]
pub fn try_vec_with_capacity<T>(cap: usize, offset: usize) -> Result<Vec<T>, CodecError> {
    let mut v: Vec<T> = Vec::new();
    v.try_reserve_exact(cap).map_err(|_| alloc_failed(offset))?;
    Ok(v)
}
