//! Bit strings and byte strings.

use std::fmt;
use std::fmt::Write as _;

use crate::error::{Error, Result};

/// Token rendered for a zero-length bit string.
pub const EMPTY_BITS_LITERAL: &str = "\\~?";

/// Token rendered for a zero-length byte string.
pub const EMPTY_BYTES_LITERAL: &str = "\\~+";

/// Ordered string of bits, packed most-significant bit first.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    packed: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Creates an empty bit string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bit string from individual bits.
    #[must_use]
    pub fn from_bools(bits: &[bool]) -> Self {
        bits.iter().copied().collect()
    }

    /// Parses a run of `0` and `1` digits.
    ///
    /// # Errors
    ///
    /// Returns an invalid digit error for any other character.
    pub fn parse(digits: &str) -> Result<Self> {
        digits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::invalid_digit(2, other)),
            })
            .collect()
    }

    /// Returns the number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| self.packed[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Returns an iterator over the bits.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(|i| self.get(i))
    }

    /// Renders the canonical literal.
    #[must_use]
    pub fn literal(&self) -> String {
        if self.is_empty() {
            return EMPTY_BITS_LITERAL.to_string();
        }
        let mut out = String::with_capacity(self.len + 5);
        out.push_str(EMPTY_BITS_LITERAL);
        out.push_str("0b");
        out.extend(self.iter().map(|b| if b { '1' } else { '0' }));
        out
    }

    fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.packed.push(0);
        }
        if bit {
            let last = self.packed.len() - 1;
            self.packed[last] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = Self::new();
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({})", self.literal())
    }
}

/// Ordered string of octets.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteString(Vec<u8>);

impl ByteString {
    /// Creates a byte string from octets.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parses pairs of hexadecimal digits.
    ///
    /// # Errors
    ///
    /// Returns an invalid digit error for a non-hex character or a
    /// dangling half octet.
    pub fn parse_hex(digits: &str) -> Result<Self> {
        let nibbles = digits
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .and_then(|d| u8::try_from(d).ok())
                    .ok_or_else(|| Error::invalid_digit(16, c))
            })
            .collect::<Result<Vec<u8>>>()?;
        if nibbles.len() % 2 != 0 {
            return Err(Error::invalid_digit(16, digits.chars().last().unwrap_or('0'))
                .with_context("odd number of hex digits"));
        }
        Ok(Self(
            nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect(),
        ))
    }

    /// Returns the octets.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of octets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no octets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the canonical literal.
    #[must_use]
    pub fn literal(&self) -> String {
        if self.is_empty() {
            return EMPTY_BYTES_LITERAL.to_string();
        }
        let mut out = String::with_capacity(self.0.len() * 2 + 5);
        out.push_str(EMPTY_BYTES_LITERAL);
        out.push_str("0x");
        for byte in &self.0 {
            let _ = write!(out, "{byte:02X}");
        }
        out
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteString({})", self.literal())
    }
}
