//! The flyweight memory pool.
//!
//! One pool is created per virtual machine. It owns the singleton values
//! (booleans, empty collections, zero, a small-integer window, well-known
//! excuses) and bounded value-keyed tables for integers, attribute names
//! and headings. Tables only grow; once a table reaches its ceiling, new
//! values of that species are allocated fresh. Caching never changes what
//! `same` answers.

use std::any::Any;
use std::borrow::Borrow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use num_traits::{ToPrimitive, Zero};
use relvalue_foundation::{
    BigInt, BitString, ByteString, DerivedType, PoolConfig, Rational, Result, Text,
};
use tracing::debug;

use crate::article::Article;
use crate::bag::{Bag, Counted};
use crate::excuse::WellKnownExcuse;
use crate::handle::{self, Handle, Variable};
use crate::sequence::Sequence;
use crate::tuple::Tuple;
use crate::value::{Payload, Value};

/// A bounded value-keyed lookup table.
struct InternTable<K> {
    species: &'static str,
    ceiling: usize,
    entries: RefCell<HashMap<K, Value>>,
    saturated: Cell<bool>,
}

impl<K: Eq + Hash> InternTable<K> {
    fn new(species: &'static str, ceiling: usize) -> Self {
        Self {
            species,
            ceiling,
            entries: RefCell::new(HashMap::new()),
            saturated: Cell::new(false),
        }
    }

    fn lookup<Q>(&self, key: &Q) -> Option<Value>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.borrow().get(key).cloned()
    }

    /// Remembers `value` under `key` unless the table is full.
    fn remember(&self, key: K, value: &Value) {
        let mut entries = self.entries.borrow_mut();
        if entries.len() < self.ceiling {
            entries.insert(key, value.clone());
        } else if !self.saturated.replace(true) {
            debug!(
                "{} table reached its ceiling of {}; further values are uncached",
                self.species, self.ceiling
            );
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Sizes of a pool's interning tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Cached integers outside the preallocated window.
    pub integers: usize,
    /// Cached attribute names.
    pub attr_names: usize,
    /// Cached headings.
    pub headings: usize,
}

/// Owner of the shared singleton and interned values.
pub struct MemoryPool {
    config: PoolConfig,

    false_value: Value,
    true_value: Value,
    zero: Value,
    rational_zero: Value,
    empty_text: Value,
    empty_bits: Value,
    empty_bytes: Value,
    empty_sequence: Value,
    empty_set: Value,
    empty_multiset: Value,
    empty_tuple: Value,
    small_integers: Vec<Value>,
    excuses: Vec<Value>,
    derived_labels: Vec<Value>,

    integers: InternTable<BigInt>,
    attr_names: InternTable<Rc<str>>,
    headings: InternTable<Vec<Rc<str>>>,
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl MemoryPool {
    /// Creates a pool and preallocates its singletons.
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        let zero = Value::new(Payload::Integer(BigInt::zero()));
        let small_integers: Vec<Value> = (config.small_integer_min..=config.small_integer_max)
            .map(|n| {
                if n == 0 {
                    zero.clone()
                } else {
                    Value::new(Payload::Integer(BigInt::from(n)))
                }
            })
            .collect();

        let excuses = WellKnownExcuse::ALL
            .into_iter()
            .map(|excuse| {
                let name = Value::new(Payload::Text(Text::new(excuse.name())));
                Value::new(Payload::Excuse(Tuple::from_positional([name])))
            })
            .collect();

        let derived_labels = DerivedType::ALL
            .into_iter()
            .map(|ty| Value::new(Payload::Text(Text::new(ty.label()))))
            .collect();

        let empty_tuple = Value::new(Payload::Tuple(Tuple::default()));
        empty_tuple.declare(DerivedType::Heading, true);

        debug!(
            "Created memory pool: ceiling {}, small integers {}..={}",
            config.cache_ceiling, config.small_integer_min, config.small_integer_max
        );

        Self {
            false_value: Value::new(Payload::Boolean(false)),
            true_value: Value::new(Payload::Boolean(true)),
            zero,
            rational_zero: Value::new(Payload::Rational(Rational::zero())),
            empty_text: Value::new(Payload::Text(Text::new(""))),
            empty_bits: Value::new(Payload::BitString(BitString::new())),
            empty_bytes: Value::new(Payload::ByteString(ByteString::default())),
            empty_sequence: Value::new(Payload::Sequence(Sequence::empty())),
            empty_set: Value::new(Payload::Set(Bag::empty())),
            empty_multiset: Value::new(Payload::Multiset(Bag::empty())),
            empty_tuple,
            small_integers,
            excuses,
            derived_labels,
            integers: InternTable::new("integer", config.cache_ceiling),
            attr_names: InternTable::new("attribute name", config.cache_ceiling),
            headings: InternTable::new("heading", config.cache_ceiling),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the current sizes of the interning tables.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            integers: self.integers.len(),
            attr_names: self.attr_names.len(),
            headings: self.headings.len(),
        }
    }

    /// Returns the shared instance for `payload` if one exists, otherwise a
    /// fresh value. A Set payload is filtered to multiplicity one.
    #[must_use]
    pub fn intern(&self, payload: Payload) -> Value {
        match payload {
            Payload::Boolean(b) => self.boolean(b),
            Payload::Integer(n) => self.intern_integer(n),
            Payload::Rational(r) if r.is_zero() => self.rational_zero.clone(),
            Payload::BitString(b) if b.is_empty() => self.empty_bits.clone(),
            Payload::ByteString(b) if b.is_empty() => self.empty_bytes.clone(),
            Payload::Text(t) if t.is_empty() => self.empty_text.clone(),
            Payload::Sequence(s) if s.is_empty() => self.empty_sequence.clone(),
            Payload::Set(b) if b.is_empty() => self.empty_set.clone(),
            Payload::Set(b) => Value::new(Payload::Set(b.into_unique())),
            Payload::Multiset(b) if b.is_empty() => self.empty_multiset.clone(),
            Payload::Tuple(t) => self.intern_tuple(t),
            payload => Value::new(payload),
        }
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    /// Returns the shared Boolean.
    #[must_use]
    pub fn boolean(&self, value: bool) -> Value {
        if value {
            self.true_value.clone()
        } else {
            self.false_value.clone()
        }
    }

    /// Returns an integer value.
    #[must_use]
    pub fn integer(&self, n: impl Into<BigInt>) -> Value {
        self.intern_integer(n.into())
    }

    fn intern_integer(&self, n: BigInt) -> Value {
        if n.is_zero() {
            return self.zero.clone();
        }
        if let Some(small) = n.to_i64().filter(|n| self.config.in_small_window(*n)) {
            let slot = usize::try_from(small - self.config.small_integer_min).ok();
            if let Some(value) = slot.and_then(|i| self.small_integers.get(i)) {
                return value.clone();
            }
        }
        let cacheable = n
            .magnitude()
            .to_u64()
            .is_some_and(|m| m <= self.config.interned_integer_magnitude);
        if !cacheable {
            return Value::new(Payload::Integer(n));
        }
        if let Some(value) = self.integers.lookup(&n) {
            return value;
        }
        let value = Value::new(Payload::Integer(n.clone()));
        self.integers.remember(n, &value);
        value
    }

    /// Returns `numerator / denominator`.
    ///
    /// # Errors
    ///
    /// Returns a zero-denominator error if `denominator` is zero.
    pub fn rational(
        &self,
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Value> {
        Ok(self.intern(Payload::Rational(Rational::new(numerator, denominator)?)))
    }

    /// Returns `mantissa / 10^scale`, keeping the decimal form.
    #[must_use]
    pub fn rational_decimal(&self, mantissa: impl Into<BigInt>, scale: u32) -> Value {
        self.intern(Payload::Rational(Rational::from_decimal(mantissa, scale)))
    }

    /// Parses a decimal literal such as `-12.50`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-decimal error if `text` is not `-?digits(.digits)?`.
    pub fn parse_decimal(&self, text: &str) -> Result<Value> {
        Ok(self.intern(Payload::Rational(Rational::parse_decimal(text)?)))
    }

    /// Returns a bit string value.
    #[must_use]
    pub fn bits(&self, bits: BitString) -> Value {
        self.intern(Payload::BitString(bits))
    }

    /// Returns a byte string value.
    #[must_use]
    pub fn bytes(&self, bytes: impl Into<Vec<u8>>) -> Value {
        self.intern(Payload::ByteString(ByteString::new(bytes)))
    }

    /// Returns a text value.
    #[must_use]
    pub fn text(&self, s: &str) -> Value {
        self.intern(Payload::Text(Text::new(s)))
    }

    /// Decodes UTF-16 code units into a text value.
    ///
    /// # Errors
    ///
    /// Returns an unpaired-surrogate error for a lone surrogate half.
    pub fn text_from_utf16(&self, units: &[u16]) -> Result<Value> {
        Ok(self.intern(Payload::Text(Text::from_utf16(units)?)))
    }

    /// Builds a text value from code points.
    ///
    /// # Errors
    ///
    /// Returns an error for surrogate or out-of-range code points.
    pub fn text_from_code_points(&self, points: &[u32]) -> Result<Value> {
        Ok(self.intern(Payload::Text(Text::from_code_points(points)?)))
    }

    /// Returns the text value for an attribute name, interned when short.
    #[must_use]
    pub fn attr_name(&self, name: &str) -> Value {
        if name.is_empty() {
            return self.empty_text.clone();
        }
        if name.chars().count() > self.config.max_interned_name_len {
            return Value::new(Payload::Text(Text::new(name)));
        }
        if let Some(value) = self.attr_names.lookup(name) {
            return value;
        }
        let value = Value::new(Payload::Text(Text::new(name)));
        self.attr_names.remember(Rc::from(name), &value);
        value
    }

    /// Returns the text label of a derived type.
    #[must_use]
    pub fn derived_type_label(&self, ty: DerivedType) -> Value {
        self.derived_labels[ty as usize].clone()
    }

    // =========================================================================
    // Sequences
    // =========================================================================

    /// Returns a sequence of `members` in order.
    #[must_use]
    pub fn sequence(&self, members: Vec<Value>) -> Value {
        self.intern(Payload::Sequence(Sequence::from_members(members)))
    }

    /// Returns `member` repeated `count` times.
    ///
    /// # Errors
    ///
    /// Returns a non-positive multiplicity error if `count` is zero.
    pub fn sequence_repeat(&self, member: Value, count: u64) -> Result<Value> {
        Ok(self.intern(Payload::Sequence(Sequence::singular(member, count)?)))
    }

    /// Returns the symbolic concatenation of two sequences.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if either operand is not a Sequence.
    pub fn concat(&self, left: &Value, right: &Value) -> Result<Value> {
        let (l, r) = (left.try_sequence()?, right.try_sequence()?);
        Ok(self.intern(Payload::Sequence(Sequence::concat(l.clone(), r.clone()))))
    }

    // =========================================================================
    // Multisets and sets
    // =========================================================================

    /// Returns a multiset where each given member counts once.
    #[must_use]
    pub fn multiset(&self, members: Vec<Value>) -> Value {
        self.intern(Payload::Multiset(Bag::from_members(members)))
    }

    /// Returns a multiset from members with multiplicities.
    ///
    /// # Errors
    ///
    /// Returns a non-positive multiplicity error if any count is zero.
    pub fn multiset_counted(&self, entries: Vec<Counted>) -> Result<Value> {
        Ok(self.intern(Payload::Multiset(Bag::from_counted(entries)?)))
    }

    /// Returns `member` with multiplicity `count`.
    ///
    /// # Errors
    ///
    /// Returns a non-positive multiplicity error if `count` is zero.
    pub fn multiset_repeat(&self, member: Value, count: u64) -> Result<Value> {
        Ok(self.intern(Payload::Multiset(Bag::singular(member, count)?)))
    }

    /// Returns the set of `members`; duplicates collapse.
    #[must_use]
    pub fn set(&self, members: Vec<Value>) -> Value {
        if members.is_empty() {
            return self.empty_set.clone();
        }
        self.intern(Payload::Set(Bag::unique(Bag::from_members(members))))
    }

    /// Returns the symbolic multiset sum.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if either operand is not a Multiset.
    pub fn multiset_sum(&self, left: &Value, right: &Value) -> Result<Value> {
        let (l, r) = (left.try_multiset()?, right.try_multiset()?);
        Ok(self.intern(Payload::Multiset(Bag::sum(l.clone(), r.clone()))))
    }

    /// Returns the symbolic set union.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if either operand is not a Set.
    pub fn union(&self, left: &Value, right: &Value) -> Result<Value> {
        let (l, r) = (left.try_set()?, right.try_set()?);
        Ok(self.intern(Payload::Set(Bag::unique(Bag::sum(l.clone(), r.clone())))))
    }

    /// Returns the set of a multiset's distinct members.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if `multiset` is not a Multiset.
    pub fn unique(&self, multiset: &Value) -> Result<Value> {
        let bag = multiset.try_multiset()?;
        Ok(self.intern(Payload::Set(Bag::unique(bag.clone()))))
    }

    // =========================================================================
    // Tuples and headings
    // =========================================================================

    /// Returns a tuple of the given attributes.
    ///
    /// # Errors
    ///
    /// Returns a duplicate attribute name error if a name repeats.
    pub fn tuple<N, I>(&self, attrs: I) -> Result<Value>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        Ok(self.intern_tuple(Tuple::new(attrs)?))
    }

    /// Returns a tuple with attributes `0..n`.
    #[must_use]
    pub fn arguments(&self, values: impl IntoIterator<Item = Value>) -> Value {
        self.intern_tuple(Tuple::from_positional(values))
    }

    fn intern_tuple(&self, tuple: Tuple) -> Value {
        if tuple.is_empty() {
            return self.empty_tuple.clone();
        }
        if tuple.degree() > self.config.max_interned_heading_degree || !tuple.is_heading() {
            return Value::new(Payload::Tuple(tuple));
        }
        let names = tuple.names();
        if let Some(value) = self.headings.lookup(&names) {
            return value;
        }
        let value = Value::new(Payload::Tuple(tuple));
        value.declare(DerivedType::Heading, true);
        self.headings.remember(names, &value);
        value
    }

    /// Returns the heading with the given attribute names.
    ///
    /// # Errors
    ///
    /// Returns a duplicate attribute name error if a name repeats.
    pub fn heading<N, I>(&self, names: I) -> Result<Value>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = N>,
    {
        let attrs = names.into_iter().map(|name| (name, self.true_value.clone()));
        let value = self.intern_tuple(Tuple::new(attrs)?);
        value.declare(DerivedType::Heading, true);
        Ok(value)
    }

    /// Returns the heading of a tuple: its attribute names, values dropped.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if `tuple` is not a Tuple.
    pub fn heading_of(&self, tuple: &Value) -> Result<Value> {
        let names = tuple.try_tuple()?.names();
        self.heading(names.iter().map(AsRef::<str>::as_ref))
    }

    // =========================================================================
    // Wrappers
    // =========================================================================

    /// Returns an article.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error if `attrs` is not a Tuple.
    pub fn article(&self, label: Value, attrs: Value) -> Result<Value> {
        Ok(self.intern(Payload::Article(Article::new(label, attrs)?)))
    }

    /// Returns the shared instance of a well-known excuse.
    #[must_use]
    pub fn excuse(&self, excuse: WellKnownExcuse) -> Value {
        self.excuses[excuse.index()].clone()
    }

    /// Returns an excuse with the given name and no other attributes.
    #[must_use]
    pub fn excuse_named(&self, name: &str) -> Value {
        match WellKnownExcuse::from_name(name) {
            Some(excuse) => self.excuse(excuse),
            None => self.excuse_with(Tuple::from_positional([self.text(name)])),
        }
    }

    /// Returns an excuse carrying arbitrary attributes.
    #[must_use]
    pub fn excuse_with(&self, attrs: Tuple) -> Value {
        self.intern(Payload::Excuse(attrs))
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// Returns a fresh variable holding `initial`.
    #[must_use]
    pub fn variable(&self, initial: Value) -> Value {
        Value::new(Payload::Variable(Variable::new(handle::next_serial(), initial)))
    }

    /// Returns a fresh process handle.
    #[must_use]
    pub fn process(&self, object: Rc<dyn Any>) -> Value {
        Value::new(Payload::Process(Handle::new(handle::next_serial(), object)))
    }

    /// Returns a fresh stream handle.
    #[must_use]
    pub fn stream(&self, object: Rc<dyn Any>) -> Value {
        Value::new(Payload::Stream(Handle::new(handle::next_serial(), object)))
    }

    /// Returns a fresh handle to a foreign object.
    #[must_use]
    pub fn external(&self, object: Rc<dyn Any>) -> Value {
        Value::new(Payload::External(Handle::new(handle::next_serial(), object)))
    }
}
