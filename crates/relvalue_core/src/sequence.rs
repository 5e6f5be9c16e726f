//! Symbolic sequence trees.
//!
//! A sequence is built from four node shapes. Concatenation stays
//! symbolic until something needs the members in order; [`Sequence::collapse`]
//! then flattens the subtree once and caches the result on the node.
//! Every node records its length so `len` and positional lookup never
//! force a collapse.

use std::cell::OnceCell;
use std::rc::Rc;

use relvalue_foundation::{Error, Result};

use crate::value::Value;

/// Shape of one sequence node.
pub enum SeqShape {
    /// No members.
    Empty,
    /// One member repeated `count` times, `count >= 1`.
    Singular {
        /// The repeated member.
        member: Value,
        /// Repetitions.
        count: u64,
    },
    /// Explicit members in order; at least two.
    Flat(Rc<[Value]>),
    /// Left members followed by right members.
    Concat(Sequence, Sequence),
}

struct SeqNode {
    shape: SeqShape,
    len: u64,
    collapsed: OnceCell<Sequence>,
}

/// Handle to a sequence tree node. Cloning shares the node.
#[derive(Clone)]
pub struct Sequence(Rc<SeqNode>);

impl Sequence {
    fn from_shape(shape: SeqShape, len: u64) -> Self {
        Self(Rc::new(SeqNode {
            shape,
            len,
            collapsed: OnceCell::new(),
        }))
    }

    /// Creates the empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_shape(SeqShape::Empty, 0)
    }

    /// Creates `member` repeated `count` times.
    ///
    /// # Errors
    ///
    /// Returns a non-positive multiplicity error if `count` is zero.
    pub fn singular(member: Value, count: u64) -> Result<Self> {
        if count == 0 {
            return Err(Error::non_positive_multiplicity().with_context("Sequence::singular"));
        }
        Ok(Self::from_shape(SeqShape::Singular { member, count }, count))
    }

    /// Creates a sequence of explicit members, picking the smallest shape.
    #[must_use]
    pub fn from_members(mut members: Vec<Value>) -> Self {
        match members.len() {
            0 => Self::empty(),
            1 => {
                let member = members.remove(0);
                Self::from_shape(SeqShape::Singular { member, count: 1 }, 1)
            }
            n => Self::from_shape(SeqShape::Flat(members.into()), n as u64),
        }
    }

    /// Creates the symbolic concatenation of two sequences.
    ///
    /// # Panics
    ///
    /// Panics if the combined length overflows `u64`.
    #[must_use]
    pub fn concat(left: Sequence, right: Sequence) -> Self {
        let len = left
            .len()
            .checked_add(right.len())
            .expect("sequence length overflow");
        Self::from_shape(SeqShape::Concat(left, right), len)
    }

    /// Returns this node's shape.
    #[must_use]
    pub fn shape(&self) -> &SeqShape {
        &self.0.shape
    }

    /// Returns the number of members, counting repeats.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.0.len
    }

    /// Returns true if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.len == 0
    }

    /// Returns true if both handles share one node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the member at `index` without collapsing.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<Value> {
        let mut node = self.clone();
        let mut index = index;
        loop {
            if index >= node.len() {
                return None;
            }
            let next = match node.shape() {
                SeqShape::Empty => return None,
                SeqShape::Singular { member, .. } => return Some(member.clone()),
                SeqShape::Flat(members) => {
                    return usize::try_from(index)
                        .ok()
                        .and_then(|i| members.get(i))
                        .cloned();
                }
                SeqShape::Concat(left, right) => {
                    if index < left.len() {
                        left.clone()
                    } else {
                        index -= left.len();
                        right.clone()
                    }
                }
            };
            node = next;
        }
    }

    /// Returns the first member.
    #[must_use]
    pub fn first(&self) -> Option<Value> {
        self.get(0)
    }

    /// Returns an equivalent node of shape Empty, Singular or Flat.
    ///
    /// An empty child collapses away and the other side is returned as
    /// collapsed, without materializing a copy. The result is cached.
    /// Collapse walks the tree with an explicit stack, so arbitrarily deep
    /// concatenation chains are safe.
    #[must_use]
    pub fn collapse(&self) -> Sequence {
        if !matches!(self.shape(), SeqShape::Concat(..)) {
            return self.clone();
        }
        self.0
            .collapsed
            .get_or_init(|| self.compute_collapsed())
            .clone()
    }

    fn compute_collapsed(&self) -> Sequence {
        let mut node = self.clone();
        loop {
            let next = match node.shape() {
                SeqShape::Concat(left, right) if left.is_empty() => right.clone(),
                SeqShape::Concat(left, right) if right.is_empty() => left.clone(),
                _ => break,
            };
            node = next;
        }
        if !node.ptr_eq(self) {
            return node.collapse();
        }
        let mut members = Vec::with_capacity(usize::try_from(self.len()).unwrap_or(0));
        self.extend_into(&mut members);
        Sequence::from_members(members)
    }

    /// Returns true if this node has been collapsed (or never needed to be).
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        !matches!(self.shape(), SeqShape::Concat(..)) || self.0.collapsed.get().is_some()
    }

    /// Returns the members in order, expanding repeats.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        let mut members = Vec::with_capacity(usize::try_from(self.len()).unwrap_or(0));
        self.collapse().extend_into(&mut members);
        members
    }

    /// Returns an iterator over the members in order.
    pub fn iter(&self) -> impl Iterator<Item = Value> {
        self.to_vec().into_iter()
    }

    /// Appends the members in order, reusing cached collapses of subtrees.
    fn extend_into(&self, out: &mut Vec<Value>) {
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            match node.shape() {
                SeqShape::Empty => {}
                SeqShape::Singular { member, count } => {
                    for _ in 0..*count {
                        out.push(member.clone());
                    }
                }
                SeqShape::Flat(members) => out.extend(members.iter().cloned()),
                SeqShape::Concat(left, right) => match node.0.collapsed.get() {
                    Some(done) => stack.push(done.clone()),
                    None => {
                        stack.push(right.clone());
                        stack.push(left.clone());
                    }
                },
            }
        }
    }
}

impl Drop for SeqNode {
    /// Unlinks uniquely owned children iteratively so deep chains drop
    /// without recursion.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let SeqShape::Concat(left, right) = std::mem::replace(&mut self.shape, SeqShape::Empty) {
            pending.push(left);
            pending.push(right);
        }
        pending.extend(self.collapsed.take());
        while let Some(seq) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(seq.0) {
                if let SeqShape::Concat(left, right) =
                    std::mem::replace(&mut node.shape, SeqShape::Empty)
                {
                    pending.push(left);
                    pending.push(right);
                }
                pending.extend(node.collapsed.take());
            }
        }
    }
}
