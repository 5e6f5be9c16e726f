//! Canonical text codec.
//!
//! The canonical literal of a value doubles as its identity string: equal
//! values render identically and unequal values never do. Unordered
//! containers list their members sorted by identity string; sequences keep
//! positional order. Handles render as a non-parseable `<Kind#serial>`.

use std::fmt::Write;
use std::rc::Rc;

use relvalue_foundation::text::{is_identifier, quote};

use crate::bag::Bag;
use crate::sequence::Sequence;
use crate::tuple::Tuple;
use crate::value::{Payload, Value};

/// Boolean `false` literal.
pub const FALSE_LITERAL: &str = "0bFALSE";

/// Boolean `true` literal.
pub const TRUE_LITERAL: &str = "0bTRUE";

/// Returns the canonical literal of `value`.
#[must_use]
pub fn render(value: &Value) -> String {
    identity_string(value).to_string()
}

/// Returns the identity string of `value`, computing and caching it on
/// first use.
///
/// A value merged with an equal one reuses its group's cached string.
#[must_use]
pub fn identity_string(value: &Value) -> Rc<str> {
    if let Some(identity) = value.cached_identity() {
        return identity;
    }
    let root = value.representative();
    let identity = match root.cached_identity() {
        Some(identity) => identity,
        None => {
            let identity: Rc<str> = Rc::from(literal(&root));
            root.fill_identity(identity.clone());
            identity
        }
    };
    value.fill_identity(identity.clone());
    identity
}

fn literal(value: &Value) -> String {
    match value.payload() {
        Payload::Boolean(b) => (if *b { TRUE_LITERAL } else { FALSE_LITERAL }).to_string(),
        Payload::Integer(n) => n.to_string(),
        Payload::Rational(r) => r.literal(),
        Payload::BitString(b) => b.literal(),
        Payload::ByteString(b) => b.literal(),
        Payload::Text(t) => t.literal(),
        Payload::Sequence(seq) => sequence_literal(seq),
        Payload::Set(bag) => set_literal(bag),
        Payload::Multiset(bag) => multiset_literal(bag),
        Payload::Tuple(tuple) => tuple_literal(tuple),
        Payload::Article(article) => format!(
            "\\*({} : {})",
            identity_string(article.label()),
            identity_string(article.attrs())
        ),
        Payload::Excuse(tuple) => format!("\\!{}", tuple_literal(tuple)),
        Payload::Variable(var) => format!("<{}#{}>", value.kind(), var.serial()),
        Payload::Process(h) | Payload::Stream(h) | Payload::External(h) => {
            format!("<{}#{}>", value.kind(), h.serial())
        }
    }
}

fn sequence_literal(seq: &Sequence) -> String {
    let mut out = String::from("[");
    for (i, member) in seq.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&identity_string(&member));
    }
    out.push(']');
    out
}

fn set_literal(bag: &Bag) -> String {
    let mut out = String::from("\\?{");
    for (i, key) in bag.index().keys().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
    }
    out.push('}');
    out
}

fn multiset_literal(bag: &Bag) -> String {
    let mut out = String::from("\\+{");
    for (i, (key, entry)) in bag.index().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key} : {}", entry.count);
    }
    out.push('}');
    out
}

fn tuple_literal(tuple: &Tuple) -> String {
    let mut out = String::from("(");
    for (i, (name, value)) in tuple.attrs().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if is_identifier(name) {
            out.push_str(name);
        } else {
            out.push_str(&quote(name));
        }
        out.push_str(" : ");
        out.push_str(&identity_string(value));
    }
    out.push(')');
    out
}
