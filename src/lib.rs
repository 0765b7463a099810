//! # piedpiper
//!
//! Static Huffman compression of in-memory byte buffers.
//!
//! A container is a length-prefixed tree block followed by a bit count and
//! the packed, MSB-first code bits:
//!
//! ```rust
//! use piedpiper::{decode, encode};
//!
//! let container = encode(b"abca")?;
//! assert_eq!(decode(&container)?, b"abca");
//! # Ok::<(), piedpiper::HuffmanError>(())
//! ```

pub mod bits;
pub mod container;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod huffman_decoder;
pub mod huffman_encoder;
pub mod tree_codec;

pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman::{CodeTable, HuffmanNode, HuffmanTree};
pub use huffman_decoder::{decode, HuffmanDecoder};
pub use huffman_encoder::{encode, EncodeReport, HuffmanEncoder};
