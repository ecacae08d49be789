//! # dagcbor
//!
//! A strict, deterministic binary codec for a fixed [IPLD](https://ipld.io/) value model,
//! encoding to and decoding from the unique canonical byte representation mandated by
//! [DAG-CBOR](https://ipld.io/specs/codecs/dag-cbor/spec/): a restriction of CBOR used for
//! content-addressed data.
//!
//! ## Design principles
//!
//! - **Canonical bytes are the value.** There is exactly one valid encoding for any value in
//!   the data model (§3), so semantic equality reduces to byte equality.
//! - **The decoder never guesses.** Any byte sequence that CBOR permits but DAG-CBOR
//!   forbids — indefinite lengths, non-minimal integer arguments, non-text map keys,
//!   out-of-order or duplicate map keys, tags other than 42, NaN/±Infinity — is a hard
//!   decode failure, not a silent normalisation.
//! - **Errors are structured, not strings.** [`ErrorCode`] is a closed, string-free enum;
//!   [`CodecError`] adds a byte offset and (with `alloc`) a container [`Path`] for
//!   diagnostics, with human-readable text living only in its `Display` impl.
//!
//! ## Data model
//!
//! Exactly nine value kinds, all represented by [`IpldValue`]: `Null`, `Bool`, `Int`,
//! `Float`, `Bytes`, `String`, `List`, `Map` ([`IpldMap`]), and `Cid`. There is no extension
//! point — encoding exhaustively matches these nine kinds, so no kind is ever silently
//! treated as "unsupported" at run time.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CodecError`] and provides
//!   blanket [`ByteSink`]/[`ByteSource`] impls over `std::io::Write`/`std::io::Read`.
//! - `alloc` *(default)*: enables the owned [`IpldValue`] tree, the tree-walking encoder and
//!   decoder, and the streaming [`Encoder`]/[`ByteSource::read_to_end`] helpers. Without it,
//!   only the allocation-free head codec ([`crate::wire`]) and scalar validation helpers
//!   ([`crate::float`], map-key ordering) are available.
//! - `simdutf8`: uses SIMD-accelerated UTF-8 validation where supported.
//! - `unsafe-utf8`: skips UTF-8 validation on decode, trusting the input is already valid
//!   UTF-8. An explicit, documented unsafe opt-in; the default is always to validate.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code unless the `unsafe-utf8` feature is enabled, in which
//! case the only `unsafe` block is the unchecked UTF-8 conversion in [`crate::utf8::trusted`].
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible given an allocator: disable default features and enable
//! `alloc` (the codec's value model owns its data, so there is no allocation-free decode
//! path — only `alloc`'s owned types let the decoder materialise a value).

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "unsafe-utf8"), forbid(unsafe_code))]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod error;
mod float;
mod limits;
mod order;
pub(crate) mod utf8;
mod wire;

#[cfg(feature = "alloc")]
mod alloc_util;
#[cfg(feature = "alloc")]
mod cid;
#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
mod diagnostics;
#[cfg(feature = "alloc")]
mod encode;
mod stream;
#[cfg(feature = "alloc")]
mod value;

pub use crate::error::{CodecError, ErrorCode, ErrorKind};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH};
pub use crate::order::canonical_key_cmp;
pub use crate::stream::{ByteSink, ByteSource, SliceSource};

#[cfg(feature = "alloc")]
pub use crate::order::canonical_order;

#[cfg(feature = "alloc")]
pub use crate::cid::Cid;
#[cfg(feature = "alloc")]
pub use crate::decode::{
    decode, decode_concat, decode_concat_with_limits, decode_observed, decode_with_limits,
    Observer,
};
#[cfg(feature = "alloc")]
pub use crate::diagnostics::{hex_snippet, Path, PathElem};
#[cfg(feature = "alloc")]
pub use crate::encode::{check_key_compliance, encode_into, ArrayEncoder, Encoder, MapEncoder};
#[cfg(feature = "alloc")]
pub use crate::stream::decode_from_source;
#[cfg(feature = "alloc")]
pub use crate::value::{Float, Int, IpldMap, IpldValue, INT_MAX, INT_MIN};

/// Encode a value into a freshly allocated canonical DAG-CBOR byte buffer (spec §6).
///
/// This is the tree-walking entry point named by the external interface: given any
/// [`IpldValue`], produce its unique canonical encoding. For building output incrementally
/// without first assembling an owned value tree, see [`Encoder`].
///
/// # Errors
///
/// Returns an error if the value is not representable (shouldn't happen for a tree built
/// through this crate's validated constructors), if a length overflows, or if allocation
/// fails.
#[cfg(feature = "alloc")]
pub fn encode(value: &IpldValue) -> Result<alloc::vec::Vec<u8>, CodecError> {
    crate::encode::encode_to_vec(value)
}
