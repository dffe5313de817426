//! Hamming(7,4) error correction code implementation.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! The (7,4) code encodes 4 data bits into 7 bits by adding 3 even-parity bits, and corrects any
//! single flipped bit through syndrome decoding.
//!
//! Positions are 1-indexed. Parity bits sit at the powers of two (1, 2, 4) and data bits fill the
//! remaining positions (3, 5, 6, 7) in payload order, giving the layout `[p1, p2, d0, p3, d1, d2, d3]`.
//! Each parity bit covers every position whose index has that power-of-two bit set:
//!
//! - `p1 = d0 ^ d1 ^ d3`
//! - `p2 = d0 ^ d2 ^ d3`
//! - `p3 = d1 ^ d2 ^ d3`
//!
//! Decoding recomputes the three checks over the received word. Read as a binary number the
//! syndrome is the 1-indexed position of a single error, or 0 when the word is consistent.
//! Two or more flipped bits produce a syndrome that points at the wrong position; the decoder
//! still flips that position, which is inherent to the code.
//!
//! # Applications
//!
//! - Computer memory (ECC RAM)
//! - Satellite communications
//! - Teaching error injection and correction
//!
//! # Examples
//!
//! ```
//! use ecc_kernel::cs::ecc::hamming::{Codeword, HammingCodec, Payload};
//!
//! let codec = HammingCodec::new();
//! let payload: Payload = "1011".parse().unwrap();
//! let codeword = codec.encode(&payload);
//! assert_eq!(codeword.to_string(), "0110011");
//!
//! let damaged = codeword.flip_bit(4).unwrap();
//! let outcome = codec.decode(&damaged);
//! assert_eq!(outcome.corrected_payload, payload);
//! assert_eq!(outcome.error_position, Some(5));
//! ```

use crate::cs::ecc::{ErrorCorrection, Result};
use crate::cs::error::Error;
use bitvec::prelude::*;
use rand::Rng;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of data bits in a payload
pub const PAYLOAD_BITS: usize = 4;
/// Number of bits in a codeword
pub const CODEWORD_BITS: usize = 7;
/// Number of parity bits in a codeword
pub const PARITY_BITS: usize = CODEWORD_BITS - PAYLOAD_BITS;

/// 1-indexed codeword positions holding data bits, in payload order
const DATA_POSITIONS: [usize; PAYLOAD_BITS] = [3, 5, 6, 7];

type Bits = BitArray<u8, Msb0>;

/// Parses a strict binary string of exactly `expected` characters.
///
/// Characters are validated before the length so that a stray symbol is reported as such even
/// when the string also has the wrong length.
fn parse_bits(text: &str, expected: usize) -> Result<Bits> {
    let mut bits = Bits::ZERO;
    let mut count = 0;

    for (position, character) in text.chars().enumerate() {
        let bit = match character {
            '0' => false,
            '1' => true,
            other => {
                return Err(Error::InvalidCharacter {
                    character: other,
                    position,
                })
            }
        };
        if position < expected {
            bits.set(position, bit);
        }
        count += 1;
    }

    if count != expected {
        return Err(Error::InvalidLength {
            expected,
            actual: count,
        });
    }
    Ok(bits)
}

fn render_bits(bits: &Bits, len: usize, f: &mut Formatter<'_>) -> std::fmt::Result {
    for bit in bits[..len].iter().by_vals() {
        f.write_str(if bit { "1" } else { "0" })?;
    }
    Ok(())
}

/// Four data bits `d0..d3` in transmission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payload {
    bits: Bits,
}

impl Payload {
    /// Builds a payload from individual bits, `d0` first.
    pub fn from_bits(bits: [bool; PAYLOAD_BITS]) -> Self {
        let mut payload = Bits::ZERO;
        for (i, bit) in bits.into_iter().enumerate() {
            payload.set(i, bit);
        }
        Self { bits: payload }
    }

    /// Builds a payload from the low nibble of `value`; bit 3 becomes `d0`.
    pub fn from_nibble(value: u8) -> Self {
        Self {
            bits: Bits::new((value & 0x0F) << 4),
        }
    }

    /// Inverse of [`Payload::from_nibble`].
    pub fn to_nibble(&self) -> u8 {
        self.bits.into_inner() >> 4
    }

    /// Data bit `d{index}`, 0-based.
    pub fn bit(&self, index: usize) -> Option<bool> {
        (index < PAYLOAD_BITS).then(|| self.bits[index])
    }
}

impl FromStr for Payload {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self {
            bits: parse_bits(s, PAYLOAD_BITS)?,
        })
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        render_bits(&self.bits, PAYLOAD_BITS, f)
    }
}

/// Seven-bit codeword laid out as `[p1, p2, d0, p3, d1, d2, d3]`.
///
/// A codeword is a plain value: flipping a bit returns a new codeword and leaves the original
/// untouched, so callers can keep the received word for display next to the corrected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codeword {
    bits: Bits,
}

impl Codeword {
    /// Builds a codeword from the low 7 bits of `value`; bit 6 becomes position 1.
    pub fn from_raw(value: u8) -> Self {
        Self {
            bits: Bits::new((value & 0x7F) << 1),
        }
    }

    /// Inverse of [`Codeword::from_raw`]. The top bit is always zero.
    pub fn to_raw(&self) -> u8 {
        self.bits.into_inner() >> 1
    }

    /// Bit at 1-indexed `position`.
    pub fn bit(&self, position: usize) -> Option<bool> {
        (1..=CODEWORD_BITS)
            .contains(&position)
            .then(|| self.bits[position - 1])
    }

    /// Returns a copy with the bit at 0-based `index` toggled.
    pub fn flip_bit(&self, index: usize) -> Result<Codeword> {
        if index >= CODEWORD_BITS {
            return Err(Error::BitIndexOutOfRange {
                index,
                len: CODEWORD_BITS,
            });
        }
        Ok(self.toggled(index))
    }

    /// Syndrome of the received word: 0 when consistent, otherwise the 1-indexed position a
    /// single error would occupy.
    pub fn syndrome(&self) -> u8 {
        (0..PARITY_BITS).fold(0, |syndrome, r| {
            if self.check(r) {
                syndrome | (1 << r)
            } else {
                syndrome
            }
        })
    }

    /// Data bits at positions 3, 5, 6, 7 with no correction applied.
    pub fn payload(&self) -> Payload {
        let mut payload = Bits::ZERO;
        for (i, &position) in DATA_POSITIONS.iter().enumerate() {
            payload.set(i, self.bits[position - 1]);
        }
        Payload { bits: payload }
    }

    fn toggled(&self, index: usize) -> Codeword {
        let mut bits = self.bits;
        let current = bits[index];
        bits.set(index, !current);
        Codeword { bits }
    }

    /// XOR of every position covered by parity bit `r`, the parity bit itself included.
    fn check(&self, r: usize) -> bool {
        (1..=CODEWORD_BITS)
            .filter(|&position| position & (1usize << r) != 0)
            .fold(false, |parity, position| parity ^ self.bits[position - 1])
    }
}

impl FromStr for Codeword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self {
            bits: parse_bits(s, CODEWORD_BITS)?,
        })
    }
}

impl Display for Codeword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        render_bits(&self.bits, CODEWORD_BITS, f)
    }
}

/// Result of decoding one received codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Data bits read from the corrected codeword
    pub corrected_payload: Payload,
    /// 1-indexed position that was flipped back, `None` when the syndrome was zero
    pub error_position: Option<u8>,
    /// Working copy after correction
    pub corrected_codeword: Codeword,
}

impl DecodeOutcome {
    /// True when the syndrome was nonzero and a bit was flipped back.
    pub fn had_error(&self) -> bool {
        self.error_position.is_some()
    }
}

/// Hamming(7,4) encoder and syndrome decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingCodec;

impl HammingCodec {
    pub fn new() -> Self {
        HammingCodec
    }

    /// Encodes four data bits into a seven-bit codeword with even parity.
    pub fn encode(&self, payload: &Payload) -> Codeword {
        let mut bits = Bits::ZERO;

        // Data bits fill the non-power-of-two positions
        for (i, &position) in DATA_POSITIONS.iter().enumerate() {
            bits.set(position - 1, payload.bits[i]);
        }

        // Parity bits are still zero, so each check is exactly the parity to store
        let mut codeword = Codeword { bits };
        for r in 0..PARITY_BITS {
            let parity = codeword.check(r);
            codeword.bits.set((1 << r) - 1, parity);
        }
        codeword
    }

    /// Decodes a received codeword, correcting at most one flipped bit.
    ///
    /// Correction happens on a working copy; `received` is left as it was.
    pub fn decode(&self, received: &Codeword) -> DecodeOutcome {
        let syndrome = received.syndrome();
        let (corrected_codeword, error_position) = match syndrome {
            0 => (*received, None),
            position => (received.toggled(position as usize - 1), Some(position)),
        };

        DecodeOutcome {
            corrected_payload: corrected_codeword.payload(),
            error_position,
            corrected_codeword,
        }
    }

    /// Gets the number of encoded bytes needed for a given number of input bytes
    pub fn encoded_bytes_needed(&self, input_bytes: usize) -> usize {
        input_bytes * 2
    }
}

impl ErrorCorrection for HammingCodec {
    /// Encodes each byte as two codewords, high nibble first, one codeword per output byte.
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(hamming_encode_bytes(data))
    }

    /// Decodes pairs of codewords back into bytes, correcting one error per codeword.
    ///
    /// The unused top bit of every input byte is ignored.
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() % 2 != 0 {
            return Err(Error::OddByteLength { len: data.len() });
        }

        Ok(data
            .chunks_exact(2)
            .map(|pair| {
                let high = HammingCodec::decode(self, &Codeword::from_raw(pair[0]));
                let low = HammingCodec::decode(self, &Codeword::from_raw(pair[1]));
                (high.corrected_payload.to_nibble() << 4) | low.corrected_payload.to_nibble()
            })
            .collect())
    }
}

/// Flips one uniformly chosen bit and returns the damaged codeword with its 1-indexed position.
pub fn inject_random_error<R: Rng + ?Sized>(codeword: &Codeword, rng: &mut R) -> (Codeword, u8) {
    let index = rng.gen_range(0..CODEWORD_BITS);
    (codeword.toggled(index), index as u8 + 1)
}

/// Encodes a 4-character binary string into a 7-character codeword string.
pub fn hamming_encode(payload: &str) -> Result<String> {
    let payload: Payload = payload.parse()?;
    Ok(HammingCodec::new().encode(&payload).to_string())
}

/// Decodes a 7-character codeword string into the corrected payload and error position.
pub fn hamming_decode(codeword: &str) -> Result<(String, Option<u8>)> {
    let codeword: Codeword = codeword.parse()?;
    let outcome = HammingCodec::new().decode(&codeword);
    Ok((outcome.corrected_payload.to_string(), outcome.error_position))
}

/// Toggles the bit at 0-based `index` of a 7-character codeword string.
pub fn flip_bit(codeword: &str, index: usize) -> Result<String> {
    let codeword: Codeword = codeword.parse()?;
    Ok(codeword.flip_bit(index)?.to_string())
}

/// Encodes bytes as Hamming(7,4) codewords, one codeword per output byte.
pub fn hamming_encode_bytes(data: &[u8]) -> Vec<u8> {
    let codec = HammingCodec::new();
    let mut encoded = Vec::with_capacity(codec.encoded_bytes_needed(data.len()));
    encoded.extend(
        data.iter()
            .flat_map(|&byte| [byte >> 4, byte & 0x0F])
            .map(|nibble| codec.encode(&Payload::from_nibble(nibble)).to_raw()),
    );
    encoded
}

/// Decodes bytes produced by [`hamming_encode_bytes`].
pub fn hamming_decode_bytes(encoded: &[u8]) -> Result<Vec<u8>> {
    ErrorCorrection::decode(&HammingCodec::new(), encoded)
}
