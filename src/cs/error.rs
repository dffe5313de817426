//! Error types shared by the checksum and Hamming modules.
//!
//! Every failure here is an input-validation failure reported straight back to
//! the caller. Nothing is retried and nothing is partially applied.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A payload or codeword did not have the required number of bits
    #[error("invalid length: expected {expected} bits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A strict binary string contained something other than '0' or '1'
    #[error("invalid character {character:?} at position {position}: expected '0' or '1'")]
    InvalidCharacter { character: char, position: usize },

    /// Checksum configuration outside the supported set
    #[error("unsupported configuration: {0}")]
    UnsupportedConfig(String),

    /// Bit index outside a fixed-width codeword
    #[error("bit index {index} out of range for {len}-bit codeword")]
    BitIndexOutOfRange { index: usize, len: usize },

    /// A Hamming byte stream must hold whole pairs of codewords
    #[error("encoded byte stream has odd length {len}: codewords come in pairs")]
    OddByteLength { len: usize },

    /// Reading batch input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true for errors caused by malformed encoded input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidLength { .. }
                | Error::InvalidCharacter { .. }
                | Error::OddByteLength { .. }
        )
    }
}
