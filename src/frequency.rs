/// Occurrence count of every byte value present in a buffer.
///
/// Counts are `u32`; callers reject buffers longer than `u32::MAX` before
/// counting, so no count can overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; 256],
    distinct: usize,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            distinct: 0,
        }
    }
}

impl FrequencyTable {
    /// Counts every byte of `data`.
    ///
    /// `data` must be at most `u32::MAX` bytes long; longer buffers saturate
    /// their counts. [`crate::HuffmanEncoder::pack`] rejects such input with
    /// `FieldOverflow` before counting.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::default();
        for &byte in data {
            let count = &mut table.counts[byte as usize];
            if *count == 0 {
                table.distinct += 1;
            }
            *count = count.saturating_add(1);
        }
        table
    }

    /// Count for `symbol`, or `None` when it never occurs.
    pub fn get(&self, symbol: u8) -> Option<u32> {
        match self.counts[symbol as usize] {
            0 => None,
            count => Some(count),
        }
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Present symbols in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| count as u64).sum()
    }
}
