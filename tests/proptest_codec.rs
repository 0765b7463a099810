//! Property-based tests for the codec.
//!
//! - decode(encode(x)) == x for arbitrary buffers
//! - encoding is deterministic
//! - codes are prefix-free
//! - the tree minimizes total weighted code length
//!
//! Run with: cargo test --test proptest_codec

use proptest::prelude::*;

use piedpiper::{decode, encode, CodeTable, FrequencyTable, HuffmanTree};

/// Buffers drawn from a handful of symbols, so frequencies repeat and tie.
fn skewed_bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![Just(b'a'), Just(b'b'), Just(b'c'), Just(b'd'), any::<u8>()],
        0..512,
    )
}

/// Optimal weighted code length computed independently by repeated merging of
/// the two smallest weights; each merge adds its weight once per level.
fn optimal_cost(frequencies: &FrequencyTable) -> u64 {
    let mut weights: Vec<u64> = frequencies.iter().map(|(_, count)| count as u64).collect();
    if weights.len() == 1 {
        return weights[0];
    }

    let mut cost = 0;
    while weights.len() > 1 {
        weights.sort_unstable_by(|a, b| b.cmp(a));
        let merged = weights.pop().unwrap() + weights.pop().unwrap();
        cost += merged;
        weights.push(merged);
    }
    cost
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: decoding an encoded buffer reproduces it exactly.
    #[test]
    fn prop_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let container = encode(&data).unwrap();
        prop_assert_eq!(decode(&container).unwrap(), data);
    }

    /// Property: repeated symbols and ties still round-trip.
    #[test]
    fn prop_roundtrip_skewed(data in skewed_bytes_strategy()) {
        prop_assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);
    }

    /// Property: the same buffer always yields the same container.
    #[test]
    fn prop_deterministic(data in skewed_bytes_strategy()) {
        prop_assert_eq!(encode(&data).unwrap(), encode(&data).unwrap());
    }

    /// Property: no code is a prefix of another.
    #[test]
    fn prop_prefix_free(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        let table = CodeTable::from_tree(&tree);
        let codes: Vec<_> = table.iter().collect();
        for (i, (a_symbol, a)) in codes.iter().enumerate() {
            for (b_symbol, b) in codes.iter().skip(i + 1) {
                let n = a.len().min(b.len());
                prop_assert!(
                    a[..n] != b[..n],
                    "code of {} and {} share a prefix", a_symbol, b_symbol
                );
            }
        }
    }

    /// Property: total encoded length matches the optimal Huffman cost.
    #[test]
    fn prop_minimal(data in skewed_bytes_strategy()) {
        prop_assume!(!data.is_empty());
        let frequencies = FrequencyTable::from_bytes(&data);
        let tree = HuffmanTree::build(&frequencies).unwrap();
        let codes = CodeTable::from_tree(&tree);
        prop_assert_eq!(codes.weighted_length(&frequencies), optimal_cost(&frequencies));
    }

    /// Property: decoding arbitrary bytes never panics.
    #[test]
    fn prop_decode_garbage(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&data);
    }
}
