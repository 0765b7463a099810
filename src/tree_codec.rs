//! Tree block encoding.
//!
//! Trees are stored as nested JSON objects with short keys:
//! `{"fr":4,"l":{"fr":2,"ilf":true,"v":97},"r":{...}}`. Zero frequencies, a
//! zero symbol, `false` leaf flags and missing children are omitted.

use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};
use crate::huffman::{HuffmanNode, HuffmanTree};

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

fn is_zero_u8(value: &u8) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NodeRecord {
    #[serde(rename = "fr", default, skip_serializing_if = "is_zero_u32")]
    frequency: u32,
    #[serde(rename = "l", default, skip_serializing_if = "Option::is_none")]
    left: Option<Box<NodeRecord>>,
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    right: Option<Box<NodeRecord>>,
    #[serde(rename = "ilf", default, skip_serializing_if = "is_false")]
    is_leaf: bool,
    #[serde(rename = "v", default, skip_serializing_if = "is_zero_u8")]
    value: u8,
}

impl From<&HuffmanNode> for NodeRecord {
    fn from(node: &HuffmanNode) -> Self {
        match node {
            HuffmanNode::Leaf { frequency, symbol } => NodeRecord {
                frequency: *frequency,
                is_leaf: true,
                value: *symbol,
                ..Default::default()
            },
            HuffmanNode::Internal {
                frequency,
                left,
                right,
            } => NodeRecord {
                frequency: *frequency,
                left: Some(Box::new(left.as_ref().into())),
                right: Some(Box::new(right.as_ref().into())),
                ..Default::default()
            },
        }
    }
}

impl TryFrom<NodeRecord> for HuffmanNode {
    type Error = HuffmanError;

    fn try_from(record: NodeRecord) -> Result<Self> {
        if record.is_leaf {
            if record.left.is_some() || record.right.is_some() {
                return Err(HuffmanError::malformed_tree(format!(
                    "leaf 0x{:02x} has children",
                    record.value
                )));
            }
            return Ok(HuffmanNode::leaf(record.value, record.frequency));
        }

        let (left, right) = match (record.left, record.right) {
            (Some(left), Some(right)) => (
                HuffmanNode::try_from(*left)?,
                HuffmanNode::try_from(*right)?,
            ),
            _ => {
                return Err(HuffmanError::malformed_tree(
                    "internal node without two children",
                ))
            }
        };

        let children = left.frequency().checked_add(right.frequency());
        if children != Some(record.frequency) {
            return Err(HuffmanError::malformed_tree(format!(
                "internal node frequency {} does not match its children ({} + {})",
                record.frequency,
                left.frequency(),
                right.frequency()
            )));
        }

        Ok(HuffmanNode::Internal {
            frequency: record.frequency,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Encodes `tree`; no tree encodes to an empty block.
pub fn serialize_tree(tree: Option<&HuffmanTree>) -> Result<Vec<u8>> {
    match tree {
        None => Ok(Vec::new()),
        Some(tree) => serde_json::to_vec(&NodeRecord::from(tree.root()))
            .map_err(|e| HuffmanError::malformed_tree(format!("failed to encode tree: {}", e))),
    }
}

/// Rebuilds a tree from its block. An empty block or `null` means no tree.
pub fn deserialize_tree(block: &[u8]) -> Result<Option<HuffmanTree>> {
    if block.is_empty() {
        return Ok(None);
    }

    let record: Option<NodeRecord> = serde_json::from_slice(block)
        .map_err(|e| HuffmanError::malformed_tree(format!("failed to parse tree: {}", e)))?;

    record
        .map(|record| HuffmanNode::try_from(record).map(HuffmanTree::from_root))
        .transpose()
}
