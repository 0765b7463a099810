//! MSB-first packing of bit sequences into bytes.
//!
//! Bit `i` of a sequence lives in byte `i / 8` at position `7 - i % 8`.
//! Unused bits of the final byte are zero when packing and ignored when
//! unpacking.

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};

/// Number of bytes needed to hold `bit_count` bits.
pub fn packed_len(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

#[derive(Debug, Default)]
pub struct BitPacker {
    bits: BitVec<u8, Msb0>,
}

impl BitPacker {
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(bits),
        }
    }

    pub fn push_code(&mut self, code: &BitSlice<u8, Msb0>) {
        self.bits.extend_from_bitslice(code);
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    /// Returns the logical bit count and the zero-padded bytes.
    pub fn finish(mut self) -> (usize, Vec<u8>) {
        let bit_count = self.bits.len();
        self.bits.resize(packed_len(bit_count) * 8, false);
        (bit_count, self.bits.into_vec())
    }
}

/// Reads exactly `bit_count` bits out of `bytes`.
///
/// `bytes` must be exactly `ceil(bit_count / 8)` long.
pub fn unpack_bits(bytes: &[u8], bit_count: usize) -> Result<&BitSlice<u8, Msb0>> {
    let expected = packed_len(bit_count);
    if bytes.len() != expected {
        return Err(HuffmanError::malformed_bitstream(format!(
            "{} bits need {} bytes, got {}",
            bit_count,
            expected,
            bytes.len()
        )));
    }

    Ok(&bytes.view_bits::<Msb0>()[..bit_count])
}
