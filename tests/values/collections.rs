//! Integration tests for symbolic sequences, multisets and sets

use relvalue_core::{Bag, BagShape, Counted, MemoryPool, Payload, SeqShape, Value, render, same};
use relvalue_foundation::{DerivedType, ErrorKind};

fn ints(pool: &MemoryPool, ns: &[i64]) -> Value {
    pool.sequence(ns.iter().map(|&n| pool.integer(n)).collect())
}

// =============================================================================
// Sequences
// =============================================================================

#[test]
fn sequence_length_is_known_without_collapse() {
    let pool = MemoryPool::default();
    let left = ints(&pool, &[1, 2]);
    let right = pool.sequence_repeat(pool.integer(9), 1_000).unwrap();
    let joined = pool.concat(&left, &right).unwrap();
    let seq = joined.as_sequence().unwrap();
    assert_eq!(seq.len(), 1_002);
    assert_eq!(seq.get(1_001), Some(pool.integer(9)));
    assert!(!seq.is_collapsed());
}

#[test]
fn sequence_repeat_rejects_zero() {
    let pool = MemoryPool::default();
    let err = pool.sequence_repeat(pool.integer(1), 0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonPositiveMultiplicity);
}

#[test]
fn concat_rejects_non_sequences() {
    let pool = MemoryPool::default();
    let err = pool.concat(&ints(&pool, &[1]), &pool.text("x")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongKind { .. }));
}

#[test]
fn collapse_of_empty_side_reuses_the_other() {
    let pool = MemoryPool::default();
    let right = ints(&pool, &[2, 3]);
    let joined = pool.concat(&pool.sequence(vec![]), &right).unwrap();
    let collapsed = joined.as_sequence().unwrap().collapse();
    assert!(collapsed.ptr_eq(right.as_sequence().unwrap()));
}

#[test]
fn collapse_produces_flat_members() {
    let pool = MemoryPool::default();
    let joined = pool
        .concat(&ints(&pool, &[1]), &pool.sequence_repeat(pool.integer(2), 2).unwrap())
        .unwrap();
    let collapsed = joined.as_sequence().unwrap().collapse();
    match collapsed.shape() {
        SeqShape::Flat(members) => assert_eq!(members.len(), 3),
        _ => panic!("expected a flat sequence"),
    }
}

// =============================================================================
// Multisets and Sets
// =============================================================================

#[test]
fn multiset_counts_with_and_without_multiplicity() {
    let pool = MemoryPool::default();
    let bag = pool
        .multiset_counted(vec![
            Counted { member: pool.text("a"), count: 3 },
            Counted { member: pool.text("b"), count: 1 },
            Counted { member: pool.text("a"), count: 2 },
        ])
        .unwrap();
    let bag = bag.as_bag().unwrap();
    assert_eq!(bag.count(), 6);
    assert_eq!(bag.distinct_count(), 2);
    assert_eq!(bag.multiplicity(&pool.text("a")), 5);
}

#[test]
fn sum_merges_members_present_on_one_side() {
    let pool = MemoryPool::default();
    let x = pool.multiset(vec![pool.integer(1), pool.integer(2)]);
    let y = pool.multiset_repeat(pool.integer(3), 4).unwrap();
    let sum = pool.multiset_sum(&x, &y).unwrap();
    let bag = sum.as_bag().unwrap();
    assert_eq!(bag.count(), 6);
    assert_eq!(bag.multiplicity(&pool.integer(3)), 4);
    assert!(matches!(bag.collapse(false).shape(), BagShape::Indexed(i) if i.len() == 3));
}

#[test]
fn set_union_forces_multiplicity_one() {
    let pool = MemoryPool::default();
    let x = pool.set(vec![pool.integer(1), pool.integer(2)]);
    let y = pool.set(vec![pool.integer(2), pool.integer(3)]);
    let union = pool.union(&x, &y).unwrap();
    let bag = union.as_bag().unwrap();
    assert_eq!(bag.count(), 3);
    assert_eq!(bag.multiplicity(&pool.integer(2)), 1);
}

#[test]
fn unique_turns_a_multiset_into_a_set() {
    let pool = MemoryPool::default();
    let bag = pool.multiset_repeat(pool.text("x"), 7).unwrap();
    let set = pool.unique(&bag).unwrap();
    assert!(set.try_set().is_ok());
    assert_eq!(set.as_bag().unwrap().count(), 1);
}

#[test]
fn relation_classification() {
    let pool = MemoryPool::default();
    let row = |id: i64| pool.tuple([("id", pool.integer(id))]).unwrap();
    let relation = pool.set(vec![row(1), row(2)]);
    assert!(relation.is_a(DerivedType::Relation));
    assert!(!relation.is_a(DerivedType::MultiRelation));

    let mixed = pool.set(vec![row(1), pool.tuple([("name", pool.integer(1))]).unwrap()]);
    assert!(!mixed.is_a(DerivedType::Relation));

    let multi = pool.multiset(vec![row(1), row(1)]);
    assert!(multi.is_a(DerivedType::MultiRelation));
}

#[test]
fn tuple_accessors() {
    let pool = MemoryPool::default();
    let args = pool.arguments([pool.integer(10), pool.integer(20)]);
    let tuple = args.as_tuple().unwrap();
    assert_eq!(tuple.degree(), 2);
    assert_eq!(tuple.positional(1), Some(&pool.integer(20)));
    assert!(tuple.get("2").is_none());
}

#[test]
fn declared_classification_is_respected() {
    let pool = MemoryPool::default();
    let v = pool.text("not an identifier");
    assert!(!v.is_a(DerivedType::Identifier));
    let w = pool.text("Point");
    w.declare(DerivedType::Identifier, false);
    assert!(!w.is_a(DerivedType::Identifier));
}

// =============================================================================
// Deep trees and raw payloads
// =============================================================================

#[test]
fn appending_one_at_a_time_collapses_and_renders() {
    let pool = MemoryPool::default();
    let mut acc = pool.sequence(vec![]);
    for i in 0..100_000 {
        acc = pool.concat(&acc, &pool.sequence(vec![pool.integer(i)])).unwrap();
    }
    let seq = acc.as_sequence().unwrap();
    assert_eq!(seq.len(), 100_000);
    assert!(matches!(seq.collapse().shape(), SeqShape::Flat(m) if m.len() == 100_000));
    let text = render(&acc);
    assert!(text.starts_with("[0, 1, 2, "));
    assert!(text.ends_with("99999]"));

    let flat = pool.sequence((0..100_000).map(|i| pool.integer(i)).collect());
    assert!(same(&acc, &flat));
}

#[test]
fn repeated_multiset_sums_collapse() {
    let pool = MemoryPool::default();
    let mut acc = pool.multiset(vec![]);
    for i in 0..100_000 {
        acc = pool.multiset_sum(&acc, &pool.multiset(vec![pool.integer(i % 10)])).unwrap();
    }
    let bag = acc.as_bag().unwrap();
    assert_eq!(bag.count(), 100_000);
    assert_eq!(bag.distinct_count(), 10);
    let expected: Vec<String> = (0..10).map(|n| format!("{n} : 10000")).collect();
    assert_eq!(render(&acc), format!("\\+{{{}}}", expected.join(", ")));
}

#[test]
fn repeated_unions_stay_sets() {
    let pool = MemoryPool::default();
    let mut acc = pool.set(vec![]);
    for i in 0..50_000 {
        acc = pool.union(&acc, &pool.set(vec![pool.integer(i % 3)])).unwrap();
    }
    assert_eq!(acc, pool.set(vec![pool.integer(0), pool.integer(1), pool.integer(2)]));
}

#[test]
fn interned_set_payload_never_repeats_members() {
    let pool = MemoryPool::default();
    let one = pool.integer(1);
    let raw = pool.intern(Payload::Set(Bag::from_members(vec![one.clone(), one.clone()])));
    let real = pool.set(vec![one.clone()]);
    assert!(same(&raw, &real));
    assert_eq!(raw.as_bag().unwrap().multiplicity(&one), 1);

    let fresh = pool.intern(Payload::Set(Bag::from_members(vec![one.clone(), one.clone()])));
    let other = pool.set(vec![one]);
    assert_eq!(fresh.identity(), other.identity());
    assert!(same(&fresh, &other));
    assert_eq!(raw.is_a(DerivedType::Relation), real.is_a(DerivedType::Relation));
}
