//! Symbolic multiset trees, shared by the Set and Multiset kinds.
//!
//! Set is a multiset under a [`BagShape::Unique`] filter. Sums and
//! uniqueness filters stay symbolic; [`Bag::collapse`] groups members by
//! identity string into an [`Index`] when membership, deduplicated size or
//! equality is needed, and caches the result on the node.

use std::cell::OnceCell;
use std::rc::Rc;

use relvalue_foundation::{Error, Result};

use crate::value::Value;

/// A member and how many times it occurs.
#[derive(Clone)]
pub struct Counted {
    /// The member.
    pub member: Value,
    /// Multiplicity, at least one.
    pub count: u64,
}

/// Members keyed by identity string.
pub type Index = im::OrdMap<Rc<str>, Counted>;

/// Shape of one multiset node.
pub enum BagShape {
    /// No members.
    Empty,
    /// One member with multiplicity `count >= 1`.
    Singular {
        /// The member.
        member: Value,
        /// Multiplicity.
        count: u64,
    },
    /// Members with multiplicities, not yet deduplicated; at least two entries.
    Flat(Rc<[Counted]>),
    /// Deduplicated members.
    Indexed(Index),
    /// The child with every multiplicity forced to one.
    Unique(Bag),
    /// Multiset sum of two children.
    Sum(Bag, Bag),
}

struct BagNode {
    shape: BagShape,
    collapsed: OnceCell<Bag>,
    relational: OnceCell<bool>,
    member: OnceCell<Option<Value>>,
}

/// Handle to a multiset tree node. Cloning shares the node.
#[derive(Clone)]
pub struct Bag(Rc<BagNode>);

fn add_counts(a: u64, b: u64) -> u64 {
    a.checked_add(b).expect("multiplicity overflow")
}

impl Bag {
    fn from_shape(shape: BagShape) -> Self {
        Self(Rc::new(BagNode {
            shape,
            collapsed: OnceCell::new(),
            relational: OnceCell::new(),
            member: OnceCell::new(),
        }))
    }

    /// Creates the empty multiset.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_shape(BagShape::Empty)
    }

    /// Creates one member with multiplicity `count`.
    ///
    /// # Errors
    ///
    /// Returns a non-positive multiplicity error if `count` is zero.
    pub fn singular(member: Value, count: u64) -> Result<Self> {
        if count == 0 {
            return Err(Error::non_positive_multiplicity().with_context("Bag::singular"));
        }
        Ok(Self::from_shape(BagShape::Singular { member, count }))
    }

    /// Creates a multiset from members with multiplicities.
    ///
    /// Duplicates are kept as given; grouping happens on collapse.
    ///
    /// # Errors
    ///
    /// Returns a non-positive multiplicity error if any count is zero.
    pub fn from_counted(mut entries: Vec<Counted>) -> Result<Self> {
        if entries.iter().any(|e| e.count == 0) {
            return Err(Error::non_positive_multiplicity().with_context("Bag::from_counted"));
        }
        Ok(match entries.len() {
            0 => Self::empty(),
            1 => {
                let Counted { member, count } = entries.remove(0);
                Self::from_shape(BagShape::Singular { member, count })
            }
            _ => Self::from_shape(BagShape::Flat(entries.into())),
        })
    }

    /// Creates a multiset where each given member counts once.
    #[must_use]
    pub fn from_members(members: Vec<Value>) -> Self {
        let entries: Vec<Counted> = members
            .into_iter()
            .map(|member| Counted { member, count: 1 })
            .collect();
        match entries.len() {
            0 => Self::empty(),
            1 => {
                let member = entries[0].member.clone();
                Self::from_shape(BagShape::Singular { member, count: 1 })
            }
            _ => Self::from_shape(BagShape::Flat(entries.into())),
        }
    }

    /// Wraps an index, picking the smallest shape.
    fn from_index(index: Index) -> Self {
        match index.len() {
            0 => Self::empty(),
            1 => match index.values().next() {
                Some(Counted { member, count }) => Self::from_shape(BagShape::Singular {
                    member: member.clone(),
                    count: *count,
                }),
                None => Self::empty(),
            },
            _ => Self::from_shape(BagShape::Indexed(index)),
        }
    }

    /// Creates the symbolic multiset sum.
    #[must_use]
    pub fn sum(left: Bag, right: Bag) -> Self {
        Self::from_shape(BagShape::Sum(left, right))
    }

    /// Creates the symbolic uniqueness filter over `child`.
    #[must_use]
    pub fn unique(child: Bag) -> Self {
        Self::from_shape(BagShape::Unique(child))
    }

    /// Returns `self` if every multiplicity is already one by construction,
    /// otherwise wraps it in a uniqueness filter.
    #[must_use]
    pub fn into_unique(self) -> Self {
        let already = matches!(
            self.shape(),
            BagShape::Empty | BagShape::Unique(_) | BagShape::Singular { count: 1, .. }
        );
        if already { self } else { Self::unique(self) }
    }

    /// Returns this node's shape.
    #[must_use]
    pub fn shape(&self) -> &BagShape {
        &self.0.shape
    }

    /// Returns true if both handles share one node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Bag) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // =========================================================================
    // Cheap queries
    // =========================================================================

    /// Returns true if there are no members, without collapsing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(done) = node.0.collapsed.get() {
                if !matches!(done.shape(), BagShape::Empty) {
                    return false;
                }
                continue;
            }
            match node.shape() {
                BagShape::Empty => {}
                BagShape::Singular { .. } | BagShape::Flat(_) => return false,
                BagShape::Indexed(index) => {
                    if !index.is_empty() {
                        return false;
                    }
                }
                BagShape::Unique(child) => stack.push(child),
                BagShape::Sum(left, right) => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        true
    }

    /// Returns some member, without collapsing. The answer is cached.
    #[must_use]
    pub fn arbitrary_member(&self) -> Option<Value> {
        self.0
            .member
            .get_or_init(|| {
                let mut stack = vec![self];
                while let Some(node) = stack.pop() {
                    if let Some(found) = node.0.member.get() {
                        if found.is_some() {
                            return found.clone();
                        }
                        continue;
                    }
                    match node.shape() {
                        BagShape::Empty => {}
                        BagShape::Singular { member, .. } => return Some(member.clone()),
                        BagShape::Flat(entries) => {
                            if let Some(entry) = entries.first() {
                                return Some(entry.member.clone());
                            }
                        }
                        BagShape::Indexed(index) => {
                            if let Some(entry) = index.values().next() {
                                return Some(entry.member.clone());
                            }
                        }
                        BagShape::Unique(child) => stack.push(child),
                        BagShape::Sum(left, right) => {
                            stack.push(right);
                            stack.push(left);
                        }
                    }
                }
                None
            })
            .clone()
    }

    /// Returns the number of members counting multiplicity.
    ///
    /// Sums add their children without collapsing; only a uniqueness
    /// filter needs the deduplicated form.
    ///
    /// # Panics
    ///
    /// Panics if the total overflows `u64`.
    #[must_use]
    pub fn count(&self) -> u64 {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let here = match node.shape() {
                BagShape::Empty => 0,
                BagShape::Singular { count, .. } => *count,
                BagShape::Flat(entries) => {
                    entries.iter().fold(0, |acc, e| add_counts(acc, e.count))
                }
                BagShape::Indexed(index) => {
                    index.values().fold(0, |acc, e| add_counts(acc, e.count))
                }
                BagShape::Unique(_) => node.distinct_count(),
                BagShape::Sum(left, right) => {
                    stack.push(right);
                    stack.push(left);
                    continue;
                }
            };
            total = add_counts(total, here);
        }
        total
    }

    /// Returns the number of distinct members.
    #[must_use]
    pub fn distinct_count(&self) -> u64 {
        match self.collapse(false).shape() {
            BagShape::Singular { .. } => 1,
            BagShape::Indexed(index) => index.len() as u64,
            _ => 0,
        }
    }

    /// Returns how many times `member` occurs.
    #[must_use]
    pub fn multiplicity(&self, member: &Value) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.index()
            .get(&member.identity())
            .map_or(0, |entry| entry.count)
    }

    /// Returns true if `member` occurs at least once.
    #[must_use]
    pub fn contains(&self, member: &Value) -> bool {
        self.multiplicity(member) > 0
    }

    /// Returns the deduplicated members, ordered by identity string.
    #[must_use]
    pub fn members(&self) -> Vec<Counted> {
        self.index().values().cloned().collect()
    }

    // =========================================================================
    // Collapse
    // =========================================================================

    /// Returns an equivalent deduplicated node.
    ///
    /// The result is Empty, Singular or Indexed; with `want_indexed` a
    /// Singular result is upgraded to a one-entry Indexed node.
    #[must_use]
    pub fn collapse(&self, want_indexed: bool) -> Bag {
        let canonical = self.canonical();
        if want_indexed {
            if let BagShape::Singular { member, count } = canonical.shape() {
                let mut index = Index::new();
                index.insert(
                    member.identity(),
                    Counted {
                        member: member.clone(),
                        count: *count,
                    },
                );
                return Self::from_shape(BagShape::Indexed(index));
            }
        }
        canonical
    }

    /// Returns the deduplicated members keyed by identity string.
    #[must_use]
    pub fn index(&self) -> Index {
        match self.collapse(true).shape() {
            BagShape::Indexed(index) => index.clone(),
            _ => Index::new(),
        }
    }

    /// Returns true if this node has been collapsed (or never needed to be).
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        matches!(
            self.shape(),
            BagShape::Empty | BagShape::Singular { .. } | BagShape::Indexed(_)
        ) || self.0.collapsed.get().is_some()
    }

    fn canonical(&self) -> Bag {
        match self.shape() {
            BagShape::Empty | BagShape::Singular { .. } | BagShape::Indexed(_) => self.clone(),
            _ => self
                .0
                .collapsed
                .get_or_init(|| self.compute_canonical())
                .clone(),
        }
    }

    /// Folds the tree left to right with an explicit stack, reusing any
    /// subtree that is already canonical or has a cached collapse.
    fn compute_canonical(&self) -> Bag {
        let mut steps = vec![Step::Visit(self)];
        let mut tallies: Vec<Tally> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => {
                    if let Some(tally) = Tally::of_leaf(node) {
                        tallies.push(tally);
                        continue;
                    }
                    match node.shape() {
                        BagShape::Sum(left, right) => {
                            steps.push(Step::Add);
                            steps.push(Step::Visit(right));
                            steps.push(Step::Visit(left));
                        }
                        BagShape::Unique(child) => {
                            steps.push(Step::Flatten);
                            steps.push(Step::Visit(child));
                        }
                        _ => {}
                    }
                }
                Step::Add => {
                    if let (Some(right), Some(left)) = (tallies.pop(), tallies.pop()) {
                        tallies.push(left.add(right));
                    }
                }
                Step::Flatten => {
                    if let Some(tally) = tallies.pop() {
                        tallies.push(tally.flatten());
                    }
                }
            }
        }
        tallies
            .pop()
            .map_or_else(Self::empty, |tally| Self::from_index(tally.index))
    }

    // =========================================================================
    // Relational predicate
    // =========================================================================

    /// Returns true if every member is a Tuple and all members share one
    /// heading. The empty multiset is relational.
    ///
    /// Computed bottom-up and cached per node: a sum is relational iff both
    /// sides are and an arbitrary member of each agrees on the heading.
    #[must_use]
    pub fn is_relational(&self) -> bool {
        if let Some(known) = self.0.relational.get() {
            return *known;
        }
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if node.0.relational.get().is_some() {
                continue;
            }
            match node.shape() {
                BagShape::Unique(child) if !expanded => {
                    stack.push((node, true));
                    stack.push((child, false));
                }
                BagShape::Sum(left, right) if !expanded => {
                    stack.push((node, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
                _ => {
                    let _ = node.0.relational.set(node.relational_from_children());
                }
            }
        }
        self.0.relational.get().copied().unwrap_or(false)
    }

    /// Decides the predicate for one node whose children are already cached.
    fn relational_from_children(&self) -> bool {
        match self.shape() {
            BagShape::Empty => true,
            BagShape::Singular { member, .. } => member.as_tuple().is_some(),
            BagShape::Flat(entries) => all_share_heading(entries.iter().map(|e| &e.member)),
            BagShape::Indexed(index) => all_share_heading(index.values().map(|e| &e.member)),
            BagShape::Unique(child) => child.is_relational(),
            BagShape::Sum(left, right) => {
                left.is_relational()
                    && right.is_relational()
                    && match (left.arbitrary_member(), right.arbitrary_member()) {
                        (Some(a), Some(b)) => match (a.as_tuple(), b.as_tuple()) {
                            (Some(x), Some(y)) => x.has_same_heading(y),
                            _ => false,
                        },
                        _ => true,
                    }
            }
        }
    }
}

impl Drop for BagNode {
    /// Unlinks uniquely owned children iteratively so deep chains drop
    /// without recursion.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        unlink(&mut self.shape, &mut pending);
        pending.extend(self.collapsed.take());
        while let Some(bag) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(bag.0) {
                unlink(&mut node.shape, &mut pending);
                pending.extend(node.collapsed.take());
            }
        }
    }
}

fn unlink(shape: &mut BagShape, pending: &mut Vec<Bag>) {
    match std::mem::replace(shape, BagShape::Empty) {
        BagShape::Unique(child) => pending.push(child),
        BagShape::Sum(left, right) => {
            pending.push(left);
            pending.push(right);
        }
        _ => {}
    }
}

/// Pending work while folding a multiset tree.
enum Step<'a> {
    Visit(&'a Bag),
    Add,
    Flatten,
}

/// Members gathered so far during a collapse.
struct Tally {
    index: Index,
    /// Keys that may have multiplicity above one; `None` when not tracked.
    repeated: Option<Vec<Rc<str>>>,
}

impl Tally {
    /// Returns the contents of a node that needs no further folding.
    fn of_leaf(node: &Bag) -> Option<Tally> {
        let canonical = match node.shape() {
            BagShape::Flat(entries) => {
                let mut index = Index::new();
                for entry in entries.iter() {
                    insert_summed(&mut index, entry.member.identity(), entry);
                }
                let repeated = index
                    .iter()
                    .filter(|(_, e)| e.count > 1)
                    .map(|(key, _)| key.clone())
                    .collect();
                return Some(Tally {
                    index,
                    repeated: Some(repeated),
                });
            }
            BagShape::Empty | BagShape::Singular { .. } | BagShape::Indexed(_) => node.clone(),
            BagShape::Unique(_) | BagShape::Sum(..) => node.0.collapsed.get()?.clone(),
        };
        let filtered = matches!(node.shape(), BagShape::Unique(_));
        Some(match canonical.shape() {
            BagShape::Singular { member, count } => {
                let key = member.identity();
                let repeated = if *count > 1 { vec![key.clone()] } else { Vec::new() };
                let mut index = Index::new();
                index.insert(
                    key,
                    Counted {
                        member: member.clone(),
                        count: *count,
                    },
                );
                Tally {
                    index,
                    repeated: Some(repeated),
                }
            }
            BagShape::Indexed(index) => Tally {
                index: index.clone(),
                repeated: filtered.then(Vec::new),
            },
            _ => Tally {
                index: Index::new(),
                repeated: Some(Vec::new()),
            },
        })
    }

    /// Multiset sum, inserting the smaller side into the larger.
    fn add(self, other: Tally) -> Tally {
        let (mut big, small) = if self.index.len() >= other.index.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut repeated = match (big.repeated.take(), small.repeated) {
            (Some(mut a), Some(b)) => {
                a.extend(b);
                Some(a)
            }
            _ => None,
        };
        for (key, entry) in small.index.iter() {
            let existed = big.index.contains_key(key);
            insert_summed(&mut big.index, key.clone(), entry);
            if existed {
                if let Some(keys) = repeated.as_mut() {
                    keys.push(key.clone());
                }
            }
        }
        Tally {
            index: big.index,
            repeated,
        }
    }

    /// Forces every multiplicity to one.
    fn flatten(mut self) -> Tally {
        match self.repeated.take() {
            Some(keys) => {
                for key in keys {
                    let member = self
                        .index
                        .get(&key)
                        .filter(|e| e.count > 1)
                        .map(|e| e.member.clone());
                    if let Some(member) = member {
                        self.index.insert(key, Counted { member, count: 1 });
                    }
                }
            }
            None => {
                self.index = self
                    .index
                    .into_iter()
                    .map(|(key, entry)| {
                        (
                            key,
                            Counted {
                                member: entry.member,
                                count: 1,
                            },
                        )
                    })
                    .collect();
            }
        }
        self.repeated = Some(Vec::new());
        self
    }
}

fn insert_summed(index: &mut Index, key: Rc<str>, entry: &Counted) {
    let combined = match index.get(&key) {
        Some(existing) => Counted {
            member: existing.member.clone(),
            count: add_counts(existing.count, entry.count),
        },
        None => entry.clone(),
    };
    index.insert(key, combined);
}

fn all_share_heading<'a>(mut members: impl Iterator<Item = &'a Value>) -> bool {
    let Some(first) = members.next() else {
        return true;
    };
    let Some(first) = first.as_tuple() else {
        return false;
    };
    members.all(|m| m.as_tuple().is_some_and(|t| t.has_same_heading(first)))
}
