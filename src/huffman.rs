use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use bitvec::prelude::*;
use tracing::{debug, trace};

use crate::frequency::FrequencyTable;

/// A prefix code: the path from the root to a leaf, `false` = left.
pub type Code = BitVec<u8, Msb0>;
type CodeDictionary = BTreeMap<u8, Code>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        frequency: u32,
        symbol: u8,
    },
    Internal {
        frequency: u32,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: u8, frequency: u32) -> Self {
        HuffmanNode::Leaf { frequency, symbol }
    }

    /// Joins two nodes under a new parent; `left` is the first one popped.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffmanNode::Internal {
            frequency: left.frequency().saturating_add(right.frequency()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn frequency(&self) -> u32 {
        match self {
            HuffmanNode::Leaf { frequency, .. } => *frequency,
            HuffmanNode::Internal { frequency, .. } => *frequency,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Secondary priority key. Leaves sort before internal nodes of equal
/// frequency, leaves by symbol, internal nodes by creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Leaf(u8),
    Internal(usize),
}

#[derive(Debug)]
struct QueueEntry {
    frequency: u32,
    rank: Rank,
    node: HuffmanNode,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.frequency, self.rank).cmp(&(other.frequency, other.rank))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Builds the optimal tree for `table`, or `None` when the table is empty.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut queue: BinaryHeap<Reverse<QueueEntry>> = table
            .iter()
            .map(|(symbol, frequency)| {
                Reverse(QueueEntry {
                    frequency,
                    rank: Rank::Leaf(symbol),
                    node: HuffmanNode::leaf(symbol, frequency),
                })
            })
            .collect();

        let mut merges = 0;
        while queue.len() > 1 {
            let Reverse(first) = queue.pop()?;
            let Reverse(second) = queue.pop()?;

            let node = HuffmanNode::merge(first.node, second.node);
            queue.push(Reverse(QueueEntry {
                frequency: node.frequency(),
                rank: Rank::Internal(merges),
                node,
            }));
            merges += 1;
        }

        let Reverse(root) = queue.pop()?;
        let tree = HuffmanTree { root: root.node };
        debug!(
            symbols = table.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Some(tree)
    }

    pub(crate) fn from_root(root: HuffmanNode) -> Self {
        HuffmanTree { root }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    pub fn frequency(&self) -> u32 {
        self.root.frequency()
    }

    /// Longest root-to-leaf path in edges; a single-leaf tree has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }
}

/// Symbol to prefix code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: CodeDictionary,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = CodeDictionary::new();

        match tree.root() {
            // A lone leaf still needs one bit per occurrence.
            HuffmanNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, bitvec![u8, Msb0; 0]);
            }
            root => {
                let mut path = Code::new();
                Self::assign(root, &mut path, &mut codes);
            }
        }

        CodeTable { codes }
    }

    fn assign(node: &HuffmanNode, path: &mut Code, codes: &mut CodeDictionary) {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                trace!(symbol, code = %format_code(path), "assigned code");
                codes.insert(*symbol, path.clone());
            }
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                Self::assign(left, path, codes);
                path.pop();

                path.push(true);
                Self::assign(right, path, codes);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    /// Codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .map(|(symbol, code)| (*symbol, code.as_bitslice()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Total encoded length in bits of a buffer with these frequencies.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| {
                self.codes
                    .get(&symbol)
                    .map(|code| count as u64 * code.len() as u64)
            })
            .sum()
    }
}

/// Renders a code as a string of `0` and `1`.
pub fn format_code(code: &BitSlice<u8, Msb0>) -> String {
    code.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}
