//! Integration tests for the equality engine

use std::collections::HashSet;

use relvalue_core::{MemoryPool, Value, same};

fn ints(pool: &MemoryPool, ns: &[i64]) -> Value {
    pool.sequence(ns.iter().map(|&n| pool.integer(n)).collect())
}

#[test]
fn equality_is_reflexive_for_every_kind() {
    let pool = MemoryPool::default();
    let values = vec![
        pool.boolean(true),
        pool.integer(12_345_678_901_i64),
        pool.rational(2, 3).unwrap(),
        pool.text("x"),
        pool.bytes(vec![1, 2]),
        ints(&pool, &[1, 2]),
        pool.set(vec![pool.integer(1)]),
        pool.tuple([("a", pool.integer(1))]).unwrap(),
        pool.excuse_named("Custom"),
        pool.variable(pool.integer(0)),
    ];
    for v in &values {
        assert!(same(v, v), "{v:?} should equal itself");
    }
}

#[test]
fn mismatched_kinds_are_unequal() {
    let pool = MemoryPool::default();
    let int = pool.integer(2);
    let rat = pool.rational(2, 1).unwrap();
    let seq = ints(&pool, &[2]);
    let bag = pool.multiset(vec![pool.integer(2)]);
    assert!(!same(&int, &rat));
    assert!(!same(&seq, &bag));
    assert!(!same(&pool.text(""), &pool.sequence(vec![])));
}

#[test]
fn rationals_from_different_sources() {
    let pool = MemoryPool::default();
    let half = pool.rational(-3, -6).unwrap();
    assert_eq!(half, pool.rational(1, 2).unwrap());
    assert_eq!(half, pool.rational_decimal(5, 1));
    assert_eq!(pool.parse_decimal("1.50").unwrap(), pool.parse_decimal("1.5").unwrap());
    assert_ne!(half, pool.rational(1, 3).unwrap());
}

#[test]
fn text_from_surrogates_equals_direct_text() {
    let pool = MemoryPool::default();
    let decoded = pool.text_from_utf16(&[0xD83D, 0xDE00]).unwrap();
    let direct = pool.text_from_code_points(&[0x1F600]).unwrap();
    assert_eq!(decoded, direct);
    assert_eq!(decoded.as_text().unwrap().len(), 1);
}

#[test]
fn tuples_with_different_headings_are_unequal() {
    let pool = MemoryPool::default();
    let a = pool.tuple([("a", pool.integer(1))]).unwrap();
    let b = pool.tuple([("b", pool.integer(1))]).unwrap();
    assert_ne!(a, b);
    let c = pool.tuple([("a", pool.integer(1)), ("b", pool.integer(2))]).unwrap();
    let d = pool.tuple([("b", pool.integer(2)), ("a", pool.integer(1))]).unwrap();
    assert_eq!(c, d);
}

#[test]
fn articles_compare_label_and_attrs() {
    let pool = MemoryPool::default();
    let attrs = |x: i64| pool.tuple([("x", pool.integer(x))]).unwrap();
    let a = pool.article(pool.text("Point"), attrs(1)).unwrap();
    let b = pool.article(pool.text("Point"), attrs(1)).unwrap();
    let c = pool.article(pool.text("Vector"), attrs(1)).unwrap();
    let d = pool.article(pool.text("Point"), attrs(2)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, d);
}

#[test]
fn excuses_compare_by_attributes() {
    let pool = MemoryPool::default();
    let custom = pool.excuse_named("Out_Of_Fuel");
    assert_eq!(custom, pool.excuse_named("Out_Of_Fuel"));
    assert_ne!(custom, pool.excuse_named("Out_Of_Time"));
    let tuple = pool.tuple([("0", pool.text("Out_Of_Fuel"))]).unwrap();
    assert_ne!(custom, tuple);
}

#[test]
fn equal_values_hash_alike() {
    let pool = MemoryPool::new(relvalue_foundation::PoolConfig::uncached());
    let mut seen = HashSet::new();
    seen.insert(ints(&pool, &[1, 2, 3]));
    let tree = pool
        .concat(&ints(&pool, &[1]), &ints(&pool, &[2, 3]))
        .unwrap();
    assert!(seen.contains(&tree));
    assert!(!seen.contains(&ints(&pool, &[3, 2, 1])));
}
