//! Unicode text.
//!
//! Text is a sequence of Unicode code points. Rust strings already enforce
//! that, so the work here is at the boundaries: UTF-16 input from an
//! embedding host must pair its surrogates, and raw code points must be
//! scalar values.

use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

use crate::error::{Error, ErrorKind, Result};

/// Unicode text value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Text(Rc<str>);

impl Text {
    /// Creates text from a Rust string.
    #[must_use]
    pub fn new(s: &str) -> Self {
        Self(Rc::from(s))
    }

    /// Decodes UTF-16 code units.
    ///
    /// A surrogate pair becomes one code point.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnpairedSurrogate`] for a lone surrogate half.
    pub fn from_utf16(units: &[u16]) -> Result<Self> {
        let mut out = String::with_capacity(units.len());
        let mut index = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    index += c.len_utf16();
                    out.push(c);
                }
                Err(e) => return Err(Error::unpaired_surrogate(index, e.unpaired_surrogate())),
            }
        }
        Ok(Self(Rc::from(out)))
    }

    /// Builds text from raw code points.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SurrogateCodePoint`] or
    /// [`ErrorKind::InvalidCodePoint`] for values that are not characters.
    pub fn from_code_points(points: &[u32]) -> Result<Self> {
        let text = points
            .iter()
            .map(|&cp| {
                char::from_u32(cp).ok_or_else(|| {
                    if (0xD800..=0xDFFF).contains(&cp) {
                        Error::new(ErrorKind::SurrogateCodePoint(cp))
                    } else {
                        Error::new(ErrorKind::InvalidCodePoint(cp))
                    }
                })
            })
            .collect::<Result<String>>()?;
        Ok(Self(Rc::from(text)))
    }

    /// Returns the text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of code points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Returns true if there are no code points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if this text can be written as a bare attribute name.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        is_identifier(&self.0)
    }

    /// Renders the canonical quoted literal.
    #[must_use]
    pub fn literal(&self) -> String {
        quote(&self.0)
    }
}

/// Returns true for `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quotes `s`, escaping the reserved characters and every control
/// character.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:X}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Self(Rc::from(s))
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
