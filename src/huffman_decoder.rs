use bitvec::prelude::*;
use tracing::debug;

use crate::bits::unpack_bits;
use crate::container::Container;
use crate::error::{HuffmanError, Result};
use crate::huffman::{HuffmanNode, HuffmanTree};
use crate::tree_codec::deserialize_tree;

#[derive(Debug, Default)]
pub struct HuffmanDecoder {
    tree: Option<HuffmanTree>,
}

impl HuffmanDecoder {
    /// Decodes a complete container back into the original bytes.
    pub fn unpack(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let container = Container::parse(data)?;
        let tree = deserialize_tree(container.tree_block)?;
        let bits = unpack_bits(container.packed_bits, container.bit_count)?;

        let output = match &tree {
            Some(tree) => walk(tree.root(), bits)?,
            None if bits.is_empty() => Vec::new(),
            None => {
                return Err(HuffmanError::malformed_bitstream(format!(
                    "{} bits with no tree",
                    bits.len()
                )))
            }
        };

        debug!(
            container_len = data.len(),
            bit_count = bits.len(),
            output_len = output.len(),
            "decoded container"
        );

        self.tree = tree;
        Ok(output)
    }

    /// Tree of the last container unpacked successfully.
    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }
}

/// Descends from `root` one bit at a time, emitting a symbol and restarting
/// at the root whenever a leaf is reached. The last bit must land on a leaf.
fn walk(root: &HuffmanNode, bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
    if let HuffmanNode::Leaf { symbol, .. } = root {
        return Ok(vec![*symbol; bits.len()]);
    }

    let mut output = Vec::new();
    let mut node = root;
    let mut depth = 0;

    for (bit_offset, bit) in bits.iter().by_vals().enumerate() {
        node = match node {
            HuffmanNode::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
            HuffmanNode::Leaf { .. } => return Err(HuffmanError::InvalidCharCode { bit_offset }),
        };
        depth += 1;

        if let HuffmanNode::Leaf { symbol, .. } = node {
            output.push(*symbol);
            node = root;
            depth = 0;
        }
    }

    if depth != 0 {
        return Err(HuffmanError::IncompleteTrailingCode {
            bit_count: bits.len(),
            depth,
        });
    }

    Ok(output)
}

/// Decompresses a container produced by [`crate::huffman_encoder::encode`].
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanDecoder::default().unpack(data)
}
