//! Error types for encoding and decoding containers.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// A length field declares more bytes than the container holds.
    #[error("truncated {field} at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedInput {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Bytes remain after the packed bits the bit count calls for.
    #[error("overlong bit payload at offset {offset}: expected {expected} bytes, got {actual}")]
    OverlongInput {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("malformed tree block: {reason}")]
    MalformedTree { reason: String },

    #[error("malformed bitstream: {reason}")]
    MalformedBitstream { reason: String },

    /// The last code of the bitstream stops inside the tree.
    #[error("incorrect last character code: {bit_count} bits consumed, stopped at depth {depth}")]
    IncompleteTrailingCode { bit_count: usize, depth: usize },

    #[error("invalid char code at bit {bit_offset}")]
    InvalidCharCode { bit_offset: usize },

    #[error("byte 0x{symbol:02x} at offset {offset} is not in the prefix code table")]
    UnknownSymbol { symbol: u8, offset: usize },

    /// A length does not fit the container's 32-bit length fields.
    #[error("{field} of {value} does not fit in a 32-bit length field")]
    FieldOverflow { field: &'static str, value: usize },
}

impl HuffmanError {
    pub fn malformed_tree(reason: impl Into<String>) -> Self {
        HuffmanError::MalformedTree {
            reason: reason.into(),
        }
    }

    pub fn malformed_bitstream(reason: impl Into<String>) -> Self {
        HuffmanError::MalformedBitstream {
            reason: reason.into(),
        }
    }

    /// True when the container bytes themselves are bad, as opposed to an
    /// encoder-side failure.
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            HuffmanError::UnknownSymbol { .. } | HuffmanError::FieldOverflow { .. }
        )
    }

    /// Get error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            HuffmanError::TruncatedInput { .. } => "truncated_input",
            HuffmanError::OverlongInput { .. } => "overlong_input",
            HuffmanError::MalformedTree { .. } => "malformed_tree",
            HuffmanError::MalformedBitstream { .. } => "malformed_bitstream",
            HuffmanError::IncompleteTrailingCode { .. } => "incomplete_trailing_code",
            HuffmanError::InvalidCharCode { .. } => "invalid_char_code",
            HuffmanError::UnknownSymbol { .. } => "unknown_symbol",
            HuffmanError::FieldOverflow { .. } => "field_overflow",
        }
    }
}
