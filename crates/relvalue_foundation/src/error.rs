//! Error types for value construction and payload access.
//!
//! Every error here is a programming error: input that a caller should have
//! validated before asking for a value. Domain-level failures such as
//! division by zero are ordinary `Excuse` values instead, and interning
//! ceilings never surface at all.

use thiserror::Error;

use crate::kind::BaseKind;

/// The main error type for relvalue operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional description of the operation that failed.
    pub context: Option<String>,
}

/// Result alias used throughout relvalue.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a wrong-kind unwrap error.
    #[must_use]
    pub fn wrong_kind(expected: BaseKind, actual: BaseKind) -> Self {
        Self::new(ErrorKind::WrongKind { expected, actual })
    }

    /// Creates a zero-denominator error.
    #[must_use]
    pub fn zero_denominator() -> Self {
        Self::new(ErrorKind::ZeroDenominator)
    }

    /// Creates an unpaired-surrogate error.
    #[must_use]
    pub fn unpaired_surrogate(index: usize, unit: u16) -> Self {
        Self::new(ErrorKind::UnpairedSurrogate { index, unit })
    }

    /// Creates a non-positive multiplicity error.
    #[must_use]
    pub fn non_positive_multiplicity() -> Self {
        Self::new(ErrorKind::NonPositiveMultiplicity)
    }

    /// Creates a duplicate attribute name error.
    #[must_use]
    pub fn duplicate_attr_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateAttrName(name.into()))
    }

    /// Creates an invalid digit error.
    #[must_use]
    pub fn invalid_digit(radix: u32, digit: char) -> Self {
        Self::new(ErrorKind::InvalidDigit { radix, digit })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A payload accessor was used on a value of another kind.
    #[error("wrong kind: expected {expected}, got {actual}")]
    WrongKind {
        /// The kind the accessor reads.
        expected: BaseKind,
        /// The kind the value actually has.
        actual: BaseKind,
    },

    /// A rational was requested with a zero denominator.
    #[error("zero denominator")]
    ZeroDenominator,

    /// UTF-16 input contained a surrogate half without its partner.
    #[error("unpaired surrogate 0x{unit:04X} at code unit {index}")]
    UnpairedSurrogate {
        /// Position of the offending code unit.
        index: usize,
        /// The offending code unit.
        unit: u16,
    },

    /// A code point in the surrogate range was given as a character.
    #[error("surrogate code point 0x{0:04X} is not a character")]
    SurrogateCodePoint(u32),

    /// A code point above U+10FFFF was given.
    #[error("code point 0x{0:X} is out of range")]
    InvalidCodePoint(u32),

    /// A repetition count or multiplicity of zero was given.
    #[error("multiplicity must be positive")]
    NonPositiveMultiplicity,

    /// The same attribute name was given twice for one tuple.
    #[error("duplicate attribute name: {0}")]
    DuplicateAttrName(String),

    /// A digit string contained a character outside its radix.
    #[error("invalid digit {digit:?} for radix {radix}")]
    InvalidDigit {
        /// The radix being parsed.
        radix: u32,
        /// The offending character.
        digit: char,
    },

    /// A decimal literal did not match `-?digits(.digits)?`.
    #[error("malformed decimal literal: {0:?}")]
    MalformedDecimal(String),
}
