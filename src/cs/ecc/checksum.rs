//! Additive checksum implementation.
//!
//! The checksum adds the numeric code of every input unit to an accumulator that
//! starts at a configurable initial value, then truncates the sum to a fixed
//! register width of 8, 16 or 32 bits. Masking is applied once, to the final
//! sum, so overflow past the register width during accumulation simply wraps.
//!
//! Text is summed over its UTF-16 code units. Raw byte input sums one addend per
//! byte.
//!
//! **Note**: an additive checksum only detects accidental corruption and is
//! blind to reordering. It has no cryptographic strength whatsoever.
//!
//! # Examples
//!
//! ```
//! use ecc_kernel::cs::ecc::checksum::{ChecksumConfig, ChecksumEngine};
//!
//! let config = ChecksumConfig::new(16, 0).unwrap();
//! let engine = ChecksumEngine::new(config);
//! assert_eq!(engine.compute("A"), "0041");
//! ```

use crate::cs::ecc::Result;
use crate::cs::error::Error;
use std::fmt::{Display, Formatter};

/// Register widths supported by the checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitWidth {
    /// 8-bit register, rendered as 2 hex digits
    Bits8,
    /// 16-bit register, rendered as 4 hex digits
    Bits16,
    /// 32-bit register, rendered as 8 hex digits
    Bits32,
}

impl BitWidth {
    /// Number of bits in the register
    pub fn bits(self) -> u32 {
        match self {
            BitWidth::Bits8 => 8,
            BitWidth::Bits16 => 16,
            BitWidth::Bits32 => 32,
        }
    }

    /// Mask of `2^bits - 1`
    pub fn mask(self) -> u64 {
        (1u64 << self.bits()) - 1
    }

    /// Number of hex digits in the rendered checksum
    pub fn hex_digits(self) -> usize {
        (self.bits() / 4) as usize
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(BitWidth::Bits8),
            16 => Ok(BitWidth::Bits16),
            32 => Ok(BitWidth::Bits32),
            other => Err(Error::UnsupportedConfig(format!(
                "bit width {} is not one of 8, 16, 32",
                other
            ))),
        }
    }
}

impl Display for BitWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Checksum parameters: register width and initial accumulator value.
///
/// The initial value is not truncated on input. Only the low `bit_width` bits of
/// the final sum matter, so an oversized initial value still contributes its
/// full amount before masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumConfig {
    bit_width: BitWidth,
    initial_value: u64,
}

impl Default for ChecksumConfig {
    fn default() -> Self {
        Self::with_width(BitWidth::Bits16)
    }
}

impl ChecksumConfig {
    /// Creates a configuration, rejecting widths other than 8, 16 and 32.
    pub fn new(bit_width: u32, initial_value: u64) -> Result<Self> {
        let bit_width = BitWidth::try_from(bit_width)?;
        Ok(Self::with_width(bit_width).with_initial_value(initial_value))
    }

    /// Creates a configuration from an already validated width.
    pub fn with_width(bit_width: BitWidth) -> Self {
        Self {
            bit_width,
            initial_value: 0,
        }
    }

    /// Sets the initial accumulator value.
    pub fn with_initial_value(mut self, initial_value: u64) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn bit_width(&self) -> BitWidth {
        self.bit_width
    }

    pub fn initial_value(&self) -> u64 {
        self.initial_value
    }
}

/// Stateless additive checksum engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumEngine {
    config: ChecksumConfig,
}

impl ChecksumEngine {
    /// Creates an engine for the given configuration.
    pub fn new(config: ChecksumConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChecksumConfig {
        &self.config
    }

    /// Masked register value for a text message, summed over UTF-16 code units.
    pub fn register(&self, message: &str) -> u64 {
        self.accumulate(message.encode_utf16().map(u64::from))
    }

    /// Masked register value for raw bytes.
    pub fn register_bytes(&self, data: &[u8]) -> u64 {
        self.accumulate(data.iter().map(|&b| u64::from(b)))
    }

    /// Computes the checksum of a text message as uppercase, zero-padded hex.
    ///
    /// An empty message yields the masked initial value, never an empty string.
    pub fn compute(&self, message: &str) -> String {
        self.render(self.register(message))
    }

    /// Computes the checksum of raw bytes as uppercase, zero-padded hex.
    pub fn compute_bytes(&self, data: &[u8]) -> String {
        self.render(self.register_bytes(data))
    }

    /// Checks a message against a previously rendered checksum.
    ///
    /// Hex letters compare case-insensitively; the digit count must match the
    /// configured width exactly.
    pub fn verify(&self, message: &str, expected: &str) -> bool {
        let actual = self.compute(message);
        actual.len() == expected.len() && actual.eq_ignore_ascii_case(expected)
    }

    fn accumulate<I>(&self, addends: I) -> u64
    where
        I: IntoIterator<Item = u64>,
    {
        // Wrapping mod 2^64 leaves the low 32 bits identical to an unbounded sum.
        let sum = addends
            .into_iter()
            .fold(self.config.initial_value, u64::wrapping_add);
        sum & self.config.bit_width.mask()
    }

    fn render(&self, value: u64) -> String {
        // Two hex digits per byte, taken from the low end of the register
        let bytes = value.to_be_bytes();
        let width = self.config.bit_width.hex_digits() / 2;
        hex::encode_upper(&bytes[bytes.len() - width..])
    }
}

impl Display for ChecksumEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "additive checksum ({}, initial value 0x{:X})",
            self.config.bit_width, self.config.initial_value
        )
    }
}

/// Computes an additive checksum of `message` in one call.
pub fn compute_checksum(message: &str, bit_width: u32, initial_value: u64) -> Result<String> {
    let config = ChecksumConfig::new(bit_width, initial_value)?;
    Ok(ChecksumEngine::new(config).compute(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(width: u32, init: u64) -> ChecksumEngine {
        ChecksumEngine::new(ChecksumConfig::new(width, init).unwrap())
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(compute_checksum("", 8, 0).unwrap(), "00");
        assert_eq!(compute_checksum("", 16, 0).unwrap(), "0000");
        assert_eq!(compute_checksum("", 32, 0).unwrap(), "00000000");
    }

    #[test]
    fn test_empty_message_keeps_initial_value() {
        assert_eq!(compute_checksum("", 16, 0xBEEF).unwrap(), "BEEF");
        // Initial value is masked only at the end
        assert_eq!(compute_checksum("", 8, 0x1FF).unwrap(), "FF");
    }

    #[test]
    fn test_single_character() {
        assert_eq!(engine(16, 0).compute("A"), "0041");
        assert_eq!(engine(8, 0).compute("A"), "41");
        assert_eq!(engine(32, 0).compute("A"), "00000041");
    }

    #[test]
    fn test_known_sum() {
        // 'a' + 'b' + 'c' = 97 + 98 + 99 = 294 = 0x126
        assert_eq!(engine(16, 0).compute("abc"), "0126");
        assert_eq!(engine(8, 0).compute("abc"), "26");
    }

    #[test]
    fn test_overflow_wraps() {
        // 0x80 + 0x80 = 256 through two U+0080 characters
        let sum_256 = "\u{80}\u{80}";
        let sum_257 = "\u{80}\u{81}";
        assert_eq!(engine(8, 0).compute(sum_256), "00");
        assert_eq!(engine(8, 0).compute(sum_257), "01");
        assert_eq!(engine(16, 0).compute(sum_256), "0100");
    }

    #[test]
    fn test_initial_value_offsets_result() {
        let message = "Hello, world";
        for width in [8u32, 16, 32] {
            let base = engine(width, 0).register(message);
            for init in [1u64, 0xFF, 0x1234, 0xFFFF_FFFF, u64::MAX] {
                let shifted = engine(width, init).register(message);
                let mask = BitWidth::try_from(width).unwrap().mask();
                assert_eq!(shifted, base.wrapping_add(init) & mask);
            }
        }
    }

    #[test]
    fn test_utf16_code_units() {
        // U+1F600 is the surrogate pair D83D DE00
        let expected = (0xD83Du64 + 0xDE00) & 0xFFFF;
        assert_eq!(engine(16, 0).register("\u{1F600}"), expected);
        assert_eq!(engine(32, 0).compute("\u{1F600}"), "0001B63D");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(engine(8, 0).compute_bytes(&[0xFF, 0x02]), "01");
        assert_eq!(engine(16, 0).compute_bytes(b"abc"), "0126");
        assert_eq!(engine(16, 0).compute_bytes(&[]), "0000");
    }

    #[test]
    fn test_unsupported_width() {
        for width in [0u32, 4, 24, 64] {
            let result = compute_checksum("msg", width, 0);
            assert!(matches!(result, Err(Error::UnsupportedConfig(_))));
        }
    }

    #[test]
    fn test_verify() {
        let engine = engine(16, 0);
        assert!(engine.verify("abc", "0126"));
        assert!(engine.verify("ÿ", "00ff"));
        assert!(!engine.verify("abc", "126"));
        assert!(!engine.verify("abd", "0126"));
    }

    #[test]
    fn test_bit_width_geometry() {
        let cases = [
            (BitWidth::Bits8, 8, 0xFF, 2),
            (BitWidth::Bits16, 16, 0xFFFF, 4),
            (BitWidth::Bits32, 32, 0xFFFF_FFFF, 8),
        ];
        for (width, bits, mask, digits) in cases {
            assert_eq!(width.bits(), bits);
            assert_eq!(width.mask(), mask);
            assert_eq!(width.hex_digits(), digits);
            assert_eq!(BitWidth::try_from(bits).unwrap(), width);

            let engine = ChecksumEngine::new(ChecksumConfig::with_width(width));
            assert_eq!(engine.compute("").len(), digits);
            assert_eq!(engine.compute("\u{FFFF}\u{FFFF}").len(), digits);
        }
    }

    #[test]
    fn test_config_builder() {
        let config = ChecksumConfig::with_width(BitWidth::Bits8).with_initial_value(0x1FE);
        assert_eq!(config.bit_width(), BitWidth::Bits8);
        assert_eq!(config.initial_value(), 0x1FE);
        assert_eq!(config, ChecksumConfig::new(8, 0x1FE).unwrap());
        // 0x1FE + 'A' = 0x23F
        assert_eq!(ChecksumEngine::new(config).compute("A"), "3F");
    }

    #[test]
    fn test_default_and_display() {
        let engine = ChecksumEngine::default();
        assert_eq!(engine.config().bit_width(), BitWidth::Bits16);
        assert_eq!(engine.config().initial_value(), 0);
        assert_eq!(
            engine.to_string(),
            "additive checksum (16-bit, initial value 0x0)"
        );
    }
}
