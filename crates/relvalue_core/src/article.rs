//! Articles: a label plus an attribute tuple.

use relvalue_foundation::{BaseKind, Error, Result};

use crate::tuple::Tuple;
use crate::value::{Payload, Value};

/// Generic labelled wrapper around an attribute tuple.
///
/// Any derived type that is not built in can be represented as an article
/// whose label names the type.
#[derive(Clone, Debug)]
pub struct Article {
    label: Value,
    attrs: Value,
}

impl Article {
    /// Creates an article.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if `attrs` is not a Tuple.
    pub fn new(label: Value, attrs: Value) -> Result<Self> {
        if !matches!(attrs.payload(), Payload::Tuple(_)) {
            return Err(Error::wrong_kind(BaseKind::Tuple, attrs.kind()).with_context("Article::new"));
        }
        Ok(Self { label, attrs })
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &Value {
        &self.label
    }

    /// Returns the attribute tuple as a value.
    #[must_use]
    pub fn attrs(&self) -> &Value {
        &self.attrs
    }

    /// Returns the attribute tuple.
    #[must_use]
    pub fn tuple(&self) -> Option<&Tuple> {
        self.attrs.as_tuple()
    }
}
