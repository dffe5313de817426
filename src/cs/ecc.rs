//! Error detection and correction code implementations.
//!
//! This module provides:
//! - An additive checksum with an 8, 16 or 32-bit register
//! - Hamming(7,4) codes with single-bit error correction
//! - Batch checksumming of named inputs
//!
//! Error detection codes let a receiver notice that data changed in transit or storage.
//! Error correction codes add enough redundancy to repair some of those changes.
//!
//! # Examples
//!
//! ```rust
//! use ecc_kernel::cs::ecc::{compute_checksum, hamming_decode, hamming_encode};
//!
//! assert_eq!(compute_checksum("A", 16, 0).unwrap(), "0041");
//!
//! let codeword = hamming_encode("1011").unwrap();
//! assert_eq!(hamming_decode(&codeword).unwrap(), ("1011".to_string(), None));
//! ```

use crate::cs::error::Error;

/// Result type for error correction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Batch checksumming of files and other named inputs
pub mod batch;
pub use batch::{checksum_batch, BatchItem, BatchRecord, ChecksumSource};

/// Additive checksums
pub mod checksum;
pub use checksum::{compute_checksum, BitWidth, ChecksumConfig, ChecksumEngine};

/// Hamming(7,4) codes
pub mod hamming;
pub use hamming::{
    flip_bit, hamming_decode, hamming_decode_bytes, hamming_encode, hamming_encode_bytes,
    inject_random_error, Codeword, DecodeOutcome, HammingCodec, Payload,
};
