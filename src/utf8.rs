//! UTF-8 validation for decoded text (spec §3: "Decoded strings are valid UTF-8; an invalid
//! sequence is a hard failure").

#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
#[inline]
pub fn validate(bytes: &[u8]) -> Result<&str, ()> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).map_err(|_| ())
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).map_err(|_| ())
    }
}

/// Returns a `&str` from canonical-trusted bytes.
///
/// With the `unsafe-utf8` feature this skips validation and relies on the caller's promise
/// that `bytes` came from a source that already enforces UTF-8 validity (e.g. bytes this
/// crate itself encoded). Without it, this is identical to [`validate`].
#[cfg(feature = "unsafe-utf8")]
#[inline]
#[allow(clippy::unnecessary_wraps)]
#[allow(clippy::missing_const_for_fn)]
pub fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    // Safety: callers only use this for canonical-validated bytes.
    Ok(unsafe { core::str::from_utf8_unchecked(bytes) })
}

/// Returns a `&str` from canonical-trusted bytes.
#[cfg(not(feature = "unsafe-utf8"))]
#[inline]
pub fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    validate(bytes)
}
