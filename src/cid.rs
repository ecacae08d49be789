//! The narrow external-CID abstraction (spec §6).
//!
//! This codec never parses or validates CID internals — multicodec, multihash, or
//! version byte layout are someone else's problem (the real `cid`/`multiformats` crate,
//! kept out of scope per spec §1). All the codec needs is: the post-multibase-identity-
//! prefix bytes, opaque, to tag with CBOR tag 42 and a leading `0x00` byte on the wire.

use alloc::boxed::Box;
use alloc::vec::Vec;

/// An opaque content identifier, carried as raw bytes with no internal interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cid(Box<[u8]>);

impl Cid {
    /// Wrap raw CID bytes (the multihash/version/codec bytes, *not* including the
    /// multibase identity prefix the wire encoding adds).
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }

    /// Borrow the raw CID bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the CID, returning its raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Box<[u8]> {
        self.0
    }
}

impl From<Vec<u8>> for Cid {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for Cid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_raw_bytes() {
        let cid = Cid::from_bytes(alloc::vec![1, 2, 3]);
        assert_eq!(cid.as_bytes(), &[1, 2, 3]);
    }
}
