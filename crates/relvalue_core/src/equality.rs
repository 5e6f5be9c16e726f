//! The "same value" relation.
//!
//! [`same`] is total, reflexive and symmetric, and never fails: values of
//! different kinds are simply unequal. Handles are equal only to
//! themselves. Once two composite values are proven equal they are merged
//! into one representative group so the next comparison is a pointer check.

use tracing::trace;

use crate::bag::Bag;
use crate::sequence::{SeqShape, Sequence};
use crate::tuple::Tuple;
use crate::value::{Payload, Value};

/// Returns true if `a` and `b` denote the same value.
#[must_use]
pub fn same(a: &Value, b: &Value) -> bool {
    if Value::ptr_eq(a, b) {
        return true;
    }
    if a.kind() != b.kind() || a.kind().is_handle() {
        return false;
    }
    let (a, b) = (a.representative(), b.representative());
    if Value::ptr_eq(&a, &b) {
        return true;
    }

    // Identity strings are injective, so two cached strings decide outright.
    if let (Some(x), Some(y)) = (a.cached_identity(), b.cached_identity()) {
        if x == y {
            merge(&a, &b);
            return true;
        }
        return false;
    }

    let equal = match (a.payload(), b.payload()) {
        (Payload::Boolean(x), Payload::Boolean(y)) => x == y,
        (Payload::Integer(x), Payload::Integer(y)) => x == y,
        (Payload::Rational(x), Payload::Rational(y)) => x.same(y),
        (Payload::BitString(x), Payload::BitString(y)) => x == y,
        (Payload::ByteString(x), Payload::ByteString(y)) => x == y,
        (Payload::Text(x), Payload::Text(y)) => x == y,
        (Payload::Sequence(x), Payload::Sequence(y)) => same_sequence(x, y),
        (Payload::Set(x), Payload::Set(y)) | (Payload::Multiset(x), Payload::Multiset(y)) => {
            same_bag(x, y)
        }
        (Payload::Tuple(x), Payload::Tuple(y)) | (Payload::Excuse(x), Payload::Excuse(y)) => {
            same_tuple(x, y)
        }
        (Payload::Article(x), Payload::Article(y)) => {
            same(x.label(), y.label()) && same(x.attrs(), y.attrs())
        }
        _ => false,
    };
    if equal && is_composite(&a) {
        merge(&a, &b);
    }
    equal
}

fn is_composite(value: &Value) -> bool {
    matches!(
        value.payload(),
        Payload::Sequence(_)
            | Payload::Set(_)
            | Payload::Multiset(_)
            | Payload::Tuple(_)
            | Payload::Article(_)
            | Payload::Excuse(_)
    )
}

/// Links the less shared group under the more shared one.
fn merge(a: &Value, b: &Value) {
    trace!("Merging equal {} values", a.kind());
    if a.share_count() >= b.share_count() {
        a.absorb(b);
    } else {
        b.absorb(a);
    }
}

fn same_sequence(x: &Sequence, y: &Sequence) -> bool {
    if x.ptr_eq(y) {
        return true;
    }
    if x.len() != y.len() {
        return false;
    }
    let (x, y) = (x.collapse(), y.collapse());
    match (x.shape(), y.shape()) {
        (SeqShape::Empty, SeqShape::Empty) => true,
        (
            SeqShape::Singular { member: m, count: c },
            SeqShape::Singular { member: n, count: d },
        ) => c == d && same(m, n),
        (SeqShape::Flat(xs), SeqShape::Flat(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(m, n)| same(m, n))
        }
        (SeqShape::Singular { member, count }, SeqShape::Flat(flat))
        | (SeqShape::Flat(flat), SeqShape::Singular { member, count }) => {
            *count == flat.len() as u64 && flat.iter().all(|m| same(m, member))
        }
        _ => false,
    }
}

fn same_bag(x: &Bag, y: &Bag) -> bool {
    if x.ptr_eq(y) {
        return true;
    }
    let (xs, ys) = (x.index(), y.index());
    xs.len() == ys.len()
        && xs.iter().all(|(key, entry)| {
            ys.get(key)
                .is_some_and(|other| other.count == entry.count && same(&entry.member, &other.member))
        })
}

fn same_tuple(x: &Tuple, y: &Tuple) -> bool {
    if x.degree() != y.degree() || !x.has_same_heading(y) {
        return false;
    }
    x.attrs()
        .iter()
        .zip(y.attrs().iter())
        .all(|((_, m), (_, n))| same(m, n))
}
