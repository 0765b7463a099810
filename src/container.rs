//! Container framing.
//!
//! ```text
//! offset 0     u32 BE  tree block length (n)
//! offset 4     n bytes tree block
//! offset 4+n   u32 BE  bit count (m)
//! offset 8+n   ceil(m/8) bytes packed bits
//! ```

use byteorder::{BigEndian, ByteOrder};

use crate::bits::packed_len;
use crate::error::{HuffmanError, Result};

pub const LENGTH_FIELD_SIZE: usize = 4;

fn to_field(field: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| HuffmanError::FieldOverflow { field, value })
}

/// Assembles a container from its two blocks.
#[derive(Debug, Default)]
pub struct ContainerWriter {
    bytes: Vec<u8>,
}

impl ContainerWriter {
    pub fn new(tree_block: &[u8], bit_count: usize, packed_bits: &[u8]) -> Result<Self> {
        let tree_len = to_field("tree block length", tree_block.len())?;
        let bit_count_field = to_field("bit count", bit_count)?;
        debug_assert_eq!(packed_bits.len(), packed_len(bit_count));

        let mut bytes =
            Vec::with_capacity(2 * LENGTH_FIELD_SIZE + tree_block.len() + packed_bits.len());
        let mut field = [0u8; LENGTH_FIELD_SIZE];

        BigEndian::write_u32(&mut field, tree_len);
        bytes.extend_from_slice(&field);
        bytes.extend_from_slice(tree_block);

        BigEndian::write_u32(&mut field, bit_count_field);
        bytes.extend_from_slice(&field);
        bytes.extend_from_slice(packed_bits);

        Ok(Self { bytes })
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Bounds-checked cursor over container bytes.
#[derive(Debug)]
pub struct ContainerReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ContainerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(HuffmanError::TruncatedInput {
                field,
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }

        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        self.read_bytes(field, LENGTH_FIELD_SIZE)
            .map(BigEndian::read_u32)
    }

    /// Takes the rest of the input, which must be exactly `len` bytes.
    pub fn read_exact_tail(&mut self, field: &'static str, len: usize) -> Result<&'a [u8]> {
        if self.remaining() > len {
            return Err(HuffmanError::OverlongInput {
                offset: self.offset,
                expected: len,
                actual: self.remaining(),
            });
        }
        self.read_bytes(field, len)
    }
}

/// Header fields of a container plus borrowed views of its blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    pub tree_block: &'a [u8],
    pub bit_count: usize,
    pub packed_bits: &'a [u8],
}

impl<'a> Container<'a> {
    /// Splits `data` into its blocks, checking every length field.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = ContainerReader::new(data);

        let tree_len = reader.read_u32("tree block length")? as usize;
        let tree_block = reader.read_bytes("tree block", tree_len)?;

        let bit_count = reader.read_u32("bit count")? as usize;
        let packed_bits = reader.read_exact_tail("packed bits", packed_len(bit_count))?;

        Ok(Self {
            tree_block,
            bit_count,
            packed_bits,
        })
    }

    pub fn header(&self) -> ContainerHeader {
        ContainerHeader {
            tree_block_len: self.tree_block.len(),
            bit_count: self.bit_count,
            packed_len: self.packed_bits.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub tree_block_len: usize,
    pub bit_count: usize,
    pub packed_len: usize,
}

impl ContainerHeader {
    pub fn container_len(&self) -> usize {
        2 * LENGTH_FIELD_SIZE + self.tree_block_len + self.packed_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_layout() {
        let bytes = ContainerWriter::new(b"tree", 9, &[254, 128])
            .unwrap()
            .into_bytes();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 4, b't', b'r', b'e', b'e', 0, 0, 0, 9, 254, 128]
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let bytes = ContainerWriter::new(b"tree", 9, &[254, 128])
            .unwrap()
            .into_bytes();
        let container = Container::parse(&bytes).unwrap();
        assert_eq!(container.tree_block, b"tree");
        assert_eq!(container.bit_count, 9);
        assert_eq!(container.packed_bits, &[254, 128]);
        assert_eq!(container.header().container_len(), bytes.len());
    }

    #[test]
    fn test_parse_empty_container() {
        let container = Container::parse(&[0; 8]).unwrap();
        assert!(container.tree_block.is_empty());
        assert_eq!(container.bit_count, 0);
        assert!(container.packed_bits.is_empty());
    }

    #[test]
    fn test_parse_missing_fields() {
        assert_eq!(
            Container::parse(&[]),
            Err(HuffmanError::TruncatedInput {
                field: "tree block length",
                offset: 0,
                needed: 4,
                available: 0,
            })
        );
        assert_eq!(
            Container::parse(&[0, 0, 0, 10, b'a', b'b']),
            Err(HuffmanError::TruncatedInput {
                field: "tree block",
                offset: 4,
                needed: 10,
                available: 2,
            })
        );
        assert!(matches!(
            Container::parse(&[0, 0, 0, 1, b'a', 0, 0]),
            Err(HuffmanError::TruncatedInput {
                field: "bit count",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_payload_size_mismatch() {
        assert_eq!(
            Container::parse(&[0, 0, 0, 0, 0, 0, 0, 10, 192]),
            Err(HuffmanError::TruncatedInput {
                field: "packed bits",
                offset: 8,
                needed: 2,
                available: 1,
            })
        );
        assert_eq!(
            Container::parse(&[0, 0, 0, 0, 0, 0, 0, 1, 192, 1]),
            Err(HuffmanError::OverlongInput {
                offset: 8,
                expected: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_reader_tracks_remaining() {
        let mut reader = ContainerReader::new(&[0, 0, 1, 0, 7]);
        assert_eq!(reader.read_u32("field").unwrap(), 256);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_exact_tail("tail", 1).unwrap(), &[7]);
    }
}
