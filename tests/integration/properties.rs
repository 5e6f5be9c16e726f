//! Property tests for equality and collapse

use proptest::prelude::*;

use relvalue::values::{MemoryPool, Value, same};

fn ints(pool: &MemoryPool, ns: &[i64]) -> Value {
    pool.sequence(ns.iter().map(|&n| pool.integer(n)).collect())
}

fn bag(pool: &MemoryPool, ns: &[i64]) -> Value {
    pool.multiset(ns.iter().map(|&n| pool.integer(n)).collect())
}

proptest! {
    #[test]
    fn same_is_symmetric(xs in prop::collection::vec(-3i64..3, 0..5),
                         ys in prop::collection::vec(-3i64..3, 0..5)) {
        let pool = MemoryPool::default();
        let (a, b) = (bag(&pool, &xs), bag(&pool, &ys));
        prop_assert!(same(&a, &a));
        prop_assert_eq!(same(&a, &b), same(&b, &a));
    }

    #[test]
    fn concat_is_associative(xs in prop::collection::vec(any::<i64>(), 0..4),
                             ys in prop::collection::vec(any::<i64>(), 0..4),
                             zs in prop::collection::vec(any::<i64>(), 0..4)) {
        let pool = MemoryPool::default();
        let (a, b, c) = (ints(&pool, &xs), ints(&pool, &ys), ints(&pool, &zs));
        let left = pool.concat(&pool.concat(&a, &b).unwrap(), &c).unwrap();
        let right = pool.concat(&a, &pool.concat(&b, &c).unwrap()).unwrap();
        let flat: Vec<i64> = xs.iter().chain(&ys).chain(&zs).copied().collect();
        let direct = ints(&pool, &flat);
        prop_assert!(same(&left, &right));
        prop_assert!(same(&left, &direct));
        prop_assert_eq!(left.identity(), direct.identity());
    }

    #[test]
    fn multiset_sum_commutes(xs in prop::collection::vec(-4i64..4, 0..6),
                             ys in prop::collection::vec(-4i64..4, 0..6)) {
        let pool = MemoryPool::default();
        let (x, y) = (bag(&pool, &xs), bag(&pool, &ys));
        let xy = pool.multiset_sum(&x, &y).unwrap();
        let yx = pool.multiset_sum(&y, &x).unwrap();
        prop_assert!(same(&xy, &yx));
        prop_assert_eq!(
            xy.as_bag().unwrap().count(),
            (xs.len() + ys.len()) as u64
        );
    }

    #[test]
    fn rational_render_matches_equality(n in -50i64..50, d in 1i64..50,
                                        m in -50i64..50, e in 1i64..50) {
        let pool = MemoryPool::default();
        let a = pool.rational(n, d).unwrap();
        let b = pool.rational(m, e).unwrap();
        prop_assert_eq!(same(&a, &b), n * e == m * d);
        prop_assert_eq!(same(&a, &b), a.identity() == b.identity());
    }
}
