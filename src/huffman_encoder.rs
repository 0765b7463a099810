use tracing::debug;

use crate::bits::BitPacker;
use crate::container::ContainerWriter;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::huffman::{CodeTable, HuffmanTree};
use crate::tree_codec::serialize_tree;

/// Sizes of the container produced by [`HuffmanEncoder::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    pub input_len: usize,
    pub symbols: usize,
    pub tree_block_len: usize,
    pub bit_count: usize,
    pub packed_len: usize,
    pub container_len: usize,
}

#[derive(Debug, Default)]
pub struct HuffmanEncoder {
    tree: Option<HuffmanTree>,
    code_table: CodeTable,
    compressed: BitPacker,
    input_len: usize,
}

impl HuffmanEncoder {
    /// Builds the tree for `data` and packs its codes, replacing anything
    /// packed before.
    pub fn pack(&mut self, data: &[u8]) -> Result<()> {
        if u32::try_from(data.len()).is_err() {
            return Err(HuffmanError::FieldOverflow {
                field: "input length",
                value: data.len(),
            });
        }

        let frequencies = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::build(&frequencies);
        let code_table = tree.as_ref().map(CodeTable::from_tree).unwrap_or_default();

        let mut compressed =
            BitPacker::with_capacity(code_table.weighted_length(&frequencies) as usize);
        for (offset, &symbol) in data.iter().enumerate() {
            let code = code_table
                .get(symbol)
                .ok_or(HuffmanError::UnknownSymbol { symbol, offset })?;
            compressed.push_code(code);
        }

        debug!(
            input_len = data.len(),
            symbols = code_table.len(),
            bit_count = compressed.bit_count(),
            "packed input"
        );

        self.tree = tree;
        self.code_table = code_table;
        self.compressed = compressed;
        self.input_len = data.len();
        Ok(())
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    /// Serializes the tree and frames it with the packed bits.
    pub fn finish(self) -> Result<(EncodeReport, Vec<u8>)> {
        let tree_block = serialize_tree(self.tree.as_ref())?;
        let (bit_count, packed) = self.compressed.finish();
        let container = ContainerWriter::new(&tree_block, bit_count, &packed)?.into_bytes();

        let report = EncodeReport {
            input_len: self.input_len,
            symbols: self.code_table.len(),
            tree_block_len: tree_block.len(),
            bit_count,
            packed_len: packed.len(),
            container_len: container.len(),
        };
        debug!(?report, "encoded container");

        Ok((report, container))
    }
}

/// Compresses `data` into a container.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = HuffmanEncoder::default();
    encoder.pack(data)?;
    let (_, container) = encoder.finish()?;
    Ok(container)
}
