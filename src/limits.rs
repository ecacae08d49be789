use crate::{CodecError, ErrorCode};

/// Default maximum nesting depth, as suggested by spec §4.2.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum container length (array/map item count) used by
/// [`DecodeLimits::for_input`].
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 16;

/// Decode-time resource limits.
///
/// Limits are enforced deterministically: no background timers, no retries. Per spec §5,
/// the decoder must not let a maliciously large declared length force a huge allocation
/// before the input has actually been read; these limits (together with capping
/// pre-allocation at the bytes remaining in the input) are how that's achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum nesting depth (lists and maps only; scalars don't add depth).
    pub max_depth: usize,
    /// Maximum total number of decoded items across the whole value
    /// (`sum(list_len) + sum(2 * map_len)`, maps counting both keys and values).
    pub max_total_items: usize,
    /// Maximum list length.
    pub max_array_len: usize,
    /// Maximum map length (in pairs).
    pub max_map_len: usize,
    /// Maximum byte-string length.
    pub max_bytes_len: usize,
    /// Maximum text-string length, in UTF-8 bytes.
    pub max_text_len: usize,
    /// Maximum total input length accepted.
    pub max_input_len: usize,
}

impl DecodeLimits {
    /// Construct limits with no meaningful ceiling beyond `usize::MAX` and the spec's
    /// default depth. Useful for tests and trusted inputs; production callers should
    /// prefer [`DecodeLimits::for_input`].
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: usize::MAX,
            max_array_len: usize::MAX,
            max_map_len: usize::MAX,
            max_bytes_len: usize::MAX,
            max_text_len: usize::MAX,
            max_input_len: usize::MAX,
        }
    }

    /// Construct conservative limits derived from the size of the input about to be
    /// decoded. No single byte/text/array/map declared length can exceed what could
    /// plausibly fit in `max_input_bytes`, which is enough to block the classic
    /// "one-byte header claims a gigabyte body" attack without callers tuning every
    /// field by hand.
    #[must_use]
    pub const fn for_input(max_input_bytes: usize) -> Self {
        let max_container_len = if max_input_bytes < DEFAULT_MAX_CONTAINER_LEN {
            max_input_bytes
        } else {
            DEFAULT_MAX_CONTAINER_LEN
        };
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: max_input_bytes,
            max_array_len: max_container_len,
            max_map_len: max_container_len,
            max_bytes_len: max_input_bytes,
            max_text_len: max_input_bytes,
            max_input_len: max_input_bytes,
        }
    }

    pub(crate) fn check_depth(&self, depth: usize, offset: usize) -> Result<(), CodecError> {
        if depth > self.max_depth {
            return Err(CodecError::decode(ErrorCode::DepthLimitExceeded, offset));
        }
        Ok(())
    }
}
