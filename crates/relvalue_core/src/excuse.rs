//! Excuses: first-class, named "no answer" outcomes.
//!
//! An excuse carries a tuple of attributes; attribute `0` holds its name as
//! Text. The engine only builds excuses. Deciding when an operation answers
//! with one is the interpreter's business.

use std::fmt;

use relvalue_foundation::Text;

use crate::tuple::Tuple;

/// Excuses the memory pool preallocates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownExcuse {
    /// Division by zero.
    DivByZero,
    /// No member at the requested ordinal position.
    NoSuchOrdPos,
    /// No attribute with the requested name.
    NoSuchAttrName,
    /// Operands with different headings.
    NotSameHeading,
    /// No reason given.
    NoReason,
}

impl WellKnownExcuse {
    /// Every well-known excuse, in preallocation order.
    pub const ALL: [WellKnownExcuse; 5] = [
        Self::DivByZero,
        Self::NoSuchOrdPos,
        Self::NoSuchAttrName,
        Self::NotSameHeading,
        Self::NoReason,
    ];

    /// Returns the excuse name stored in attribute `0`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DivByZero => "Div_By_Zero",
            Self::NoSuchOrdPos => "No_Such_Ord_Pos",
            Self::NoSuchAttrName => "No_Such_Attr_Name",
            Self::NotSameHeading => "Not_Same_Heading",
            Self::NoReason => "No_Reason",
        }
    }

    /// Looks up a well-known excuse by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WellKnownExcuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the excuse name of an excuse's attributes, if it has one.
#[must_use]
pub fn excuse_name(attrs: &Tuple) -> Option<&Text> {
    attrs.get("0").and_then(|v| v.as_text())
}
