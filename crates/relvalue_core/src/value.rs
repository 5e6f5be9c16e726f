//! The tagged value handle.
//!
//! A [`Value`] is a cheaply cloneable handle to an immutable payload plus
//! three lazily filled caches: derived-type membership, the canonical
//! identity string, and a representative link. The link implements the
//! equality engine's node merging: once two values are proven equal, one
//! becomes the representative of the other, union-find style, so later
//! comparisons between any members of the group stop at a pointer check.

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use num_traits::Signed;
use relvalue_foundation::{
    BaseKind, BigInt, BitString, ByteString, DerivedType, Error, Membership, Rational, Result,
    Text,
};

use crate::article::Article;
use crate::bag::Bag;
use crate::handle::{Handle, Variable};
use crate::render;
use crate::sequence::Sequence;
use crate::tuple::Tuple;

/// Kind-specific contents of a value.
pub enum Payload {
    /// `true` or `false`.
    Boolean(bool),
    /// Arbitrary-precision integer.
    Integer(BigInt),
    /// Exact rational.
    Rational(Rational),
    /// Bit string.
    BitString(BitString),
    /// Byte string.
    ByteString(ByteString),
    /// Unicode text.
    Text(Text),
    /// Symbolic sequence tree.
    Sequence(Sequence),
    /// Symbolic multiset tree whose multiplicities are all one.
    Set(Bag),
    /// Symbolic multiset tree.
    Multiset(Bag),
    /// Attribute mapping.
    Tuple(Tuple),
    /// Label plus attributes.
    Article(Article),
    /// Mutable cell.
    Variable(Variable),
    /// Opaque process handle.
    Process(Handle),
    /// Opaque stream handle.
    Stream(Handle),
    /// Opaque foreign object.
    External(Handle),
    /// Named "no answer" outcome; attribute `0` holds the name.
    Excuse(Tuple),
}

impl Payload {
    /// Returns the base kind of this payload.
    #[must_use]
    pub fn kind(&self) -> BaseKind {
        match self {
            Self::Boolean(_) => BaseKind::Boolean,
            Self::Integer(_) => BaseKind::Integer,
            Self::Rational(_) => BaseKind::Rational,
            Self::BitString(_) => BaseKind::BitString,
            Self::ByteString(_) => BaseKind::ByteString,
            Self::Text(_) => BaseKind::Text,
            Self::Sequence(_) => BaseKind::Sequence,
            Self::Set(_) => BaseKind::Set,
            Self::Multiset(_) => BaseKind::Multiset,
            Self::Tuple(_) => BaseKind::Tuple,
            Self::Article(_) => BaseKind::Article,
            Self::Variable(_) => BaseKind::Variable,
            Self::Process(_) => BaseKind::Process,
            Self::Stream(_) => BaseKind::Stream,
            Self::External(_) => BaseKind::External,
            Self::Excuse(_) => BaseKind::Excuse,
        }
    }
}

/// Tri-state derived-type membership, one bit per [`DerivedType`].
#[derive(Default)]
struct DerivedCache {
    known: Cell<u16>,
    truth: Cell<u16>,
}

impl DerivedCache {
    fn get(&self, ty: DerivedType) -> Membership {
        if self.known.get() & ty.mask() == 0 {
            Membership::Unknown
        } else {
            Membership::from_bool(self.truth.get() & ty.mask() != 0)
        }
    }

    fn set(&self, ty: DerivedType, is_member: bool) {
        self.known.set(self.known.get() | ty.mask());
        let truth = self.truth.get() & !ty.mask();
        self.truth
            .set(if is_member { truth | ty.mask() } else { truth });
    }

    /// Copies every classification `other` knows and this cache does not.
    fn absorb(&self, other: &Self) {
        let missing = other.known.get() & !self.known.get();
        self.known.set(self.known.get() | missing);
        self.truth
            .set(self.truth.get() | (other.truth.get() & missing));
    }
}

struct ValueCell {
    payload: Payload,
    derived: DerivedCache,
    identity: OnceCell<Rc<str>>,
    representative: RefCell<Option<Value>>,
}

/// Universal value handle.
///
/// Cloning is O(1). Equality (`==`) is the structural "same value"
/// relation of [`crate::same`]; use [`Value::ptr_eq`] for reference
/// identity.
#[derive(Clone)]
pub struct Value(Rc<ValueCell>);

impl Value {
    pub(crate) fn new(payload: Payload) -> Self {
        Self(Rc::new(ValueCell {
            payload,
            derived: DerivedCache::default(),
            identity: OnceCell::new(),
            representative: RefCell::new(None),
        }))
    }

    /// Returns true if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Returns the base kind.
    #[must_use]
    pub fn kind(&self) -> BaseKind {
        self.0.payload.kind()
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.0.payload
    }

    /// Returns the canonical identity string, computing it on first use.
    #[must_use]
    pub fn identity(&self) -> Rc<str> {
        render::identity_string(self)
    }

    /// Returns how many handles share this node.
    pub(crate) fn share_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub(crate) fn cached_identity(&self) -> Option<Rc<str>> {
        self.0.identity.get().cloned()
    }

    pub(crate) fn fill_identity(&self, identity: Rc<str>) {
        let _ = self.0.identity.set(identity);
    }

    // =========================================================================
    // Representative links
    // =========================================================================

    /// Returns the root of this value's merge group, compressing the path.
    pub(crate) fn representative(&self) -> Value {
        let parent = self.0.representative.borrow().clone();
        match parent {
            None => self.clone(),
            Some(parent) => {
                let root = parent.representative();
                if !Value::ptr_eq(&root, &parent) {
                    *self.0.representative.borrow_mut() = Some(root.clone());
                }
                root
            }
        }
    }

    /// Links `other`'s merge group under this value's group.
    ///
    /// Both values must already be known equal.
    pub(crate) fn absorb(&self, other: &Value) {
        let root = self.representative();
        let leaf = other.representative();
        if Value::ptr_eq(&root, &leaf) {
            return;
        }
        if let Some(identity) = leaf.cached_identity() {
            root.fill_identity(identity);
        }
        if let Some(identity) = root.cached_identity() {
            leaf.fill_identity(identity);
        }
        root.0.derived.absorb(&leaf.0.derived);
        *leaf.0.representative.borrow_mut() = Some(root);
    }

    // =========================================================================
    // Derived-type cache
    // =========================================================================

    /// Returns the cached classification without computing anything.
    #[must_use]
    pub fn declared(&self, ty: DerivedType) -> Membership {
        match self.0.derived.get(ty) {
            Membership::Unknown => {
                let root = self.representative();
                if Value::ptr_eq(&root, self) {
                    Membership::Unknown
                } else {
                    root.0.derived.get(ty)
                }
            }
            known => known,
        }
    }

    /// Records a classification computed elsewhere, on this value and on
    /// its merge group's representative.
    pub fn declare(&self, ty: DerivedType, is_member: bool) {
        self.0.derived.set(ty, is_member);
        let root = self.representative();
        if !Value::ptr_eq(&root, self) {
            root.0.derived.set(ty, is_member);
        }
    }

    /// Returns true if this value belongs to `ty`, classifying and caching
    /// on first use.
    #[must_use]
    pub fn is_a(&self, ty: DerivedType) -> bool {
        if let Some(known) = self.declared(ty).known() {
            return known;
        }
        let is_member = self.classify(ty);
        self.declare(ty, is_member);
        is_member
    }

    fn classify(&self, ty: DerivedType) -> bool {
        match (ty, self.payload()) {
            (DerivedType::Heading, Payload::Tuple(t)) => t.is_heading(),
            (DerivedType::Identifier, Payload::Text(t)) => t.is_identifier(),
            (DerivedType::NonNegativeInteger, Payload::Integer(n)) => !n.is_negative(),
            (DerivedType::PositiveInteger, Payload::Integer(n)) => n.is_positive(),
            (DerivedType::TerminatingRational, Payload::Rational(r)) => r.is_terminating_decimal(),
            (DerivedType::Relation, Payload::Set(b))
            | (DerivedType::MultiRelation, Payload::Multiset(b)) => b.is_relational(),
            _ => false,
        }
    }

    // =========================================================================
    // Payload accessors
    // =========================================================================

    /// Attempts to extract a boolean.
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self.payload() {
            Payload::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self.payload() {
            Payload::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Attempts to extract a rational.
    #[must_use]
    pub fn as_rational(&self) -> Option<&Rational> {
        match self.payload() {
            Payload::Rational(r) => Some(r),
            _ => None,
        }
    }

    /// Attempts to extract a bit string.
    #[must_use]
    pub fn as_bits(&self) -> Option<&BitString> {
        match self.payload() {
            Payload::BitString(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract a byte string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&ByteString> {
        match self.payload() {
            Payload::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract text.
    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        match self.payload() {
            Payload::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Attempts to extract a sequence tree.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self.payload() {
            Payload::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract the multiset tree of a Set or Multiset.
    #[must_use]
    pub fn as_bag(&self) -> Option<&Bag> {
        match self.payload() {
            Payload::Set(b) | Payload::Multiset(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self.payload() {
            Payload::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// Attempts to extract an article.
    #[must_use]
    pub fn as_article(&self) -> Option<&Article> {
        match self.payload() {
            Payload::Article(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to extract an excuse's attributes.
    #[must_use]
    pub fn as_excuse(&self) -> Option<&Tuple> {
        match self.payload() {
            Payload::Excuse(t) => Some(t),
            _ => None,
        }
    }

    /// Attempts to extract a variable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&Variable> {
        match self.payload() {
            Payload::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract a process, stream or external handle.
    #[must_use]
    pub fn as_handle(&self) -> Option<&Handle> {
        match self.payload() {
            Payload::Process(h) | Payload::Stream(h) | Payload::External(h) => Some(h),
            _ => None,
        }
    }

    /// Extracts an integer or reports the kind mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_integer(&self) -> Result<&BigInt> {
        self.as_integer()
            .ok_or_else(|| Error::wrong_kind(BaseKind::Integer, self.kind()))
    }

    /// Extracts a rational or reports the kind mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_rational(&self) -> Result<&Rational> {
        self.as_rational()
            .ok_or_else(|| Error::wrong_kind(BaseKind::Rational, self.kind()))
    }

    /// Extracts text or reports the kind mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_text(&self) -> Result<&Text> {
        self.as_text()
            .ok_or_else(|| Error::wrong_kind(BaseKind::Text, self.kind()))
    }

    /// Extracts a sequence tree or reports the kind mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_sequence(&self) -> Result<&Sequence> {
        self.as_sequence()
            .ok_or_else(|| Error::wrong_kind(BaseKind::Sequence, self.kind()))
    }

    /// Extracts the tree of a Multiset (not a Set) or reports the mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_multiset(&self) -> Result<&Bag> {
        match self.payload() {
            Payload::Multiset(b) => Ok(b),
            _ => Err(Error::wrong_kind(BaseKind::Multiset, self.kind())),
        }
    }

    /// Extracts the tree of a Set or reports the mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_set(&self) -> Result<&Bag> {
        match self.payload() {
            Payload::Set(b) => Ok(b),
            _ => Err(Error::wrong_kind(BaseKind::Set, self.kind())),
        }
    }

    /// Extracts a tuple or reports the kind mismatch.
    ///
    /// # Errors
    ///
    /// Returns a wrong-kind error for any other kind.
    pub fn try_tuple(&self) -> Result<&Tuple> {
        self.as_tuple()
            .ok_or_else(|| Error::wrong_kind(BaseKind::Tuple, self.kind()))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::same(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.identity())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}
