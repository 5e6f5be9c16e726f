//! Base-kind discriminants and derived-type classifications.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of base kinds every value belongs to.
///
/// This enumeration is stable: embedding layers may rely on its variants
/// to choose a payload accessor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BaseKind {
    /// `true` or `false`.
    Boolean,
    /// Arbitrary-precision integer.
    Integer,
    /// Exact rational number.
    Rational,
    /// Ordered string of bits.
    BitString,
    /// Ordered string of octets.
    ByteString,
    /// Unicode text.
    Text,
    /// Ordered sequence, duplicates allowed.
    Sequence,
    /// Unordered collection without duplicates.
    Set,
    /// Unordered collection with multiplicities.
    Multiset,
    /// Unordered name-to-value mapping.
    Tuple,
    /// Label plus attribute tuple.
    Article,
    /// Mutable cell holding a value.
    Variable,
    /// Opaque process handle.
    Process,
    /// Opaque stream handle.
    Stream,
    /// Opaque foreign object.
    External,
    /// First-class "no answer" outcome.
    Excuse,
}

impl BaseKind {
    /// Every base kind, in declaration order.
    pub const ALL: [BaseKind; 16] = [
        Self::Boolean,
        Self::Integer,
        Self::Rational,
        Self::BitString,
        Self::ByteString,
        Self::Text,
        Self::Sequence,
        Self::Set,
        Self::Multiset,
        Self::Tuple,
        Self::Article,
        Self::Variable,
        Self::Process,
        Self::Stream,
        Self::External,
        Self::Excuse,
    ];

    /// Returns the kind's name as used in diagnostics and placeholders.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Rational => "Rational",
            Self::BitString => "BitString",
            Self::ByteString => "ByteString",
            Self::Text => "Text",
            Self::Sequence => "Sequence",
            Self::Set => "Set",
            Self::Multiset => "Multiset",
            Self::Tuple => "Tuple",
            Self::Article => "Article",
            Self::Variable => "Variable",
            Self::Process => "Process",
            Self::Stream => "Stream",
            Self::External => "External",
            Self::Excuse => "Excuse",
        }
    }

    /// Returns true for opaque handle kinds, which never compare structurally.
    #[must_use]
    pub const fn is_handle(self) -> bool {
        matches!(
            self,
            Self::Variable | Self::Process | Self::Stream | Self::External
        )
    }

    /// Returns true for the symbolic collection kinds.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::Sequence | Self::Set | Self::Multiset)
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derived types whose membership is cached per value.
///
/// The set is closed at compile time so a value's cache fits in two bit
/// masks. Each variant's index is its bit position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DerivedType {
    /// A Tuple whose every attribute value is Boolean `true`.
    Heading = 0,
    /// A Text usable as a bare attribute name.
    Identifier = 1,
    /// An Integer >= 0.
    NonNegativeInteger = 2,
    /// An Integer > 0.
    PositiveInteger = 3,
    /// A Rational expressible as a finite decimal.
    TerminatingRational = 4,
    /// A Set whose members are Tuples sharing one heading.
    Relation = 5,
    /// A Multiset whose members are Tuples sharing one heading.
    MultiRelation = 6,
}

impl DerivedType {
    /// Every derived type, in bit order.
    pub const ALL: [DerivedType; 7] = [
        Self::Heading,
        Self::Identifier,
        Self::NonNegativeInteger,
        Self::PositiveInteger,
        Self::TerminatingRational,
        Self::Relation,
        Self::MultiRelation,
    ];

    /// Returns the bit mask for this type in a membership cache.
    #[must_use]
    pub const fn mask(self) -> u16 {
        1 << (self as u8)
    }

    /// Returns the type's label, as carried by articles of this type.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Heading => "Heading",
            Self::Identifier => "Identifier",
            Self::NonNegativeInteger => "Non_Negative_Integer",
            Self::PositiveInteger => "Positive_Integer",
            Self::TerminatingRational => "Terminating_Rational",
            Self::Relation => "Relation",
            Self::MultiRelation => "Multi_Relation",
        }
    }
}

impl fmt::Display for DerivedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tri-state answer of a derived-type cache lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Membership {
    /// Not yet classified.
    #[default]
    Unknown,
    /// Known to be a member.
    Yes,
    /// Known not to be a member.
    No,
}

impl Membership {
    /// Converts a known answer.
    #[must_use]
    pub const fn from_bool(is_member: bool) -> Self {
        if is_member { Self::Yes } else { Self::No }
    }

    /// Returns the known answer, if any.
    #[must_use]
    pub const fn known(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }
}
