//! Tuples: unordered, duplicate-free attribute mappings.
//!
//! Argument lists are the most common tuples and they are positional, so
//! attributes `0`, `1` and `2` live in dedicated slots. All other names go
//! in a persistent ordered map.

use std::rc::Rc;

use relvalue_foundation::{Error, Result};

use crate::value::Value;

const POSITIONAL_NAMES: [&str; 3] = ["0", "1", "2"];

fn positional_slot(name: &str) -> Option<usize> {
    POSITIONAL_NAMES.iter().position(|p| *p == name)
}

/// Attribute mapping from names to values.
#[derive(Clone, Default)]
pub struct Tuple {
    positional: [Option<Value>; 3],
    named: im::OrdMap<Rc<str>, Value>,
}

impl Tuple {
    /// Creates a tuple from name/value pairs.
    ///
    /// # Errors
    ///
    /// Returns a duplicate attribute name error if a name repeats.
    pub fn new<N, I>(attrs: I) -> Result<Self>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let mut tuple = Self::default();
        for (name, value) in attrs {
            let name = name.as_ref();
            let taken = match positional_slot(name) {
                Some(slot) => tuple.positional[slot].replace(value).is_some(),
                None => tuple.named.insert(Rc::from(name), value).is_some(),
            };
            if taken {
                return Err(Error::duplicate_attr_name(name));
            }
        }
        Ok(tuple)
    }

    /// Creates a tuple with attributes `0..n` from an argument list.
    #[must_use]
    pub fn from_positional(values: impl IntoIterator<Item = Value>) -> Self {
        let mut tuple = Self::default();
        for (i, value) in values.into_iter().enumerate() {
            match tuple.positional.get_mut(i) {
                Some(slot) => *slot = Some(value),
                None => {
                    tuple.named.insert(Rc::from(i.to_string()), value);
                }
            }
        }
        tuple
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.positional.iter().flatten().count() + self.named.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.degree() == 0
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match positional_slot(name) {
            Some(slot) => self.positional[slot].as_ref(),
            None => self.named.get(name),
        }
    }

    /// Returns the value of positional attribute `index`.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Value> {
        match self.positional.get(index) {
            Some(slot) => slot.as_ref(),
            None => self.named.get(index.to_string().as_str()),
        }
    }

    /// Returns true if the named attribute exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the attribute names in code-point order.
    #[must_use]
    pub fn names(&self) -> Vec<Rc<str>> {
        self.attrs().into_iter().map(|(name, _)| name).collect()
    }

    /// Returns the attributes in code-point order of their names.
    #[must_use]
    pub fn attrs(&self) -> Vec<(Rc<str>, Value)> {
        let mut attrs: Vec<(Rc<str>, Value)> = POSITIONAL_NAMES
            .iter()
            .zip(&self.positional)
            .filter_map(|(name, slot)| slot.as_ref().map(|v| (Rc::from(*name), v.clone())))
            .chain(self.named.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect();
        attrs.sort_by(|a, b| a.0.cmp(&b.0));
        attrs
    }

    /// Returns a tuple with `name` set to `value`, sharing the rest.
    #[must_use]
    pub fn with(&self, name: &str, value: Value) -> Self {
        let mut tuple = self.clone();
        match positional_slot(name) {
            Some(slot) => tuple.positional[slot] = Some(value),
            None => {
                tuple.named.insert(Rc::from(name), value);
            }
        }
        tuple
    }

    /// Returns true if both tuples have exactly the same attribute names.
    #[must_use]
    pub fn has_same_heading(&self, other: &Tuple) -> bool {
        self.positional
            .iter()
            .zip(&other.positional)
            .all(|(a, b)| a.is_some() == b.is_some())
            && self.named.len() == other.named.len()
            && self.named.keys().zip(other.named.keys()).all(|(a, b)| a == b)
    }

    /// Returns true if every attribute value is Boolean `true`.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.values().all(|v| v.as_boolean() == Some(true))
    }

    /// Iterates over the values in unspecified order.
    fn values(&self) -> impl Iterator<Item = &Value> {
        self.positional.iter().flatten().chain(self.named.values())
    }
}
