//! Canonical map-key ordering (spec §3/§6): CBOR text keys sort by UTF-8 byte length,
//! then bytewise lexicographically. Comparing by encoded length (header + payload) and
//! comparing by raw string length agree here because the length-prefix header grows
//! monotonically with payload length, so the simpler length-first rule below is
//! equivalent to the teacher's "compare by full encoded key bytes" rule for text keys.

use core::cmp::Ordering;

/// Compare two map keys by canonical CBOR map-key order.
#[inline]
#[must_use]
pub fn canonical_key_cmp(a: &str, b: &str) -> Ordering {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.as_bytes().cmp(b.as_bytes()),
        other => other,
    }
}

/// Sort `keys` in place under canonical map-key order.
#[cfg(feature = "alloc")]
pub fn canonical_order(keys: &mut [&str]) {
    keys.sort_unstable_by(|a, b| canonical_key_cmp(a, b));
}

/// Returns true iff `prev < curr` under canonical CBOR map-key order.
#[inline]
#[must_use]
pub fn is_strictly_increasing(prev: &str, curr: &str) -> bool {
    canonical_key_cmp(prev, curr) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_keys_sort_first_regardless_of_bytes() {
        assert_eq!(canonical_key_cmp("z", "aa"), Ordering::Less);
    }

    #[test]
    fn equal_length_keys_sort_lexicographically() {
        assert_eq!(canonical_key_cmp("ab", "ac"), Ordering::Less);
    }

    #[test]
    fn canonical_order_sorts_in_place() {
        let mut keys = ["bb", "a", "ccc"];
        canonical_order(&mut keys);
        assert_eq!(keys, ["a", "bb", "ccc"]);
    }
}
