//! End-to-end scenarios

use relvalue::foundation::PoolConfig;
use relvalue::values::{MemoryPool, PoolStats, SeqShape, Value, same};

fn ints(pool: &MemoryPool, ns: &[i64]) -> Value {
    pool.sequence(ns.iter().map(|&n| pool.integer(n)).collect())
}

#[test]
fn concatenation_collapses_to_the_direct_sequence() {
    let pool = MemoryPool::default();
    let one = ints(&pool, &[1]);
    let none = ints(&pool, &[]);
    let two_three = ints(&pool, &[2, 3]);
    let joined = pool
        .concat(&pool.concat(&one, &none).unwrap(), &two_three)
        .unwrap();

    let collapsed = joined.as_sequence().unwrap().collapse();
    match collapsed.shape() {
        SeqShape::Flat(members) => {
            let got: Vec<_> = members.iter().map(|m| m.as_integer().cloned()).collect();
            assert_eq!(got, vec![Some(1.into()), Some(2.into()), Some(3.into())]);
        }
        _ => panic!("expected a flat sequence"),
    }

    let direct = ints(&pool, &[1, 2, 3]);
    assert!(same(&joined, &direct));
    assert_eq!(joined.identity(), direct.identity());
    assert_eq!(joined.identity().as_ref(), "[1, 2, 3]");
}

#[test]
fn rational_canonical_forms() {
    let pool = MemoryPool::default();
    assert_eq!(pool.rational(1, 3).unwrap().identity().as_ref(), "1/3");
    assert_eq!(pool.rational(1, 4).unwrap().identity().as_ref(), "0.25");
    let zero = pool.rational(0, 5).unwrap();
    assert!(Value::ptr_eq(&zero, &pool.rational(0, 1).unwrap()));
    assert!(same(&pool.rational(-3, -6).unwrap(), &pool.rational(1, 2).unwrap()));
}

#[test]
fn interning_soundness() {
    let pool = MemoryPool::default();
    assert!(Value::ptr_eq(&pool.sequence(vec![]), &pool.sequence(vec![])));
    assert!(Value::ptr_eq(&pool.integer(0), &pool.integer(0)));
    assert!(Value::ptr_eq(
        &pool.heading(["id"]).unwrap(),
        &pool.heading(["id"]).unwrap()
    ));
}

#[test]
fn relation_of_rows_from_two_sources() {
    let pool = MemoryPool::default();
    let row = |id: i64, name: &str| {
        pool.tuple([("id", pool.integer(id)), ("name", pool.text(name))])
            .unwrap()
    };
    let first = pool.set(vec![row(1, "Ada"), row(2, "Grace")]);
    let second = pool.set(vec![row(2, "Grace"), row(3, "Edsger")]);
    let all = pool.union(&first, &second).unwrap();
    let direct = pool.set(vec![row(3, "Edsger"), row(1, "Ada"), row(2, "Grace")]);

    assert_eq!(all, direct);
    assert_eq!(all.as_bag().unwrap().count(), 3);
    assert!(all.is_a(relvalue::foundation::DerivedType::Relation));
    assert_eq!(
        pool.heading_of(&row(9, "x")).unwrap(),
        pool.heading(["name", "id"]).unwrap()
    );
}

#[test]
fn caching_never_changes_answers() {
    let cached = MemoryPool::default();
    let uncached = MemoryPool::new(PoolConfig::uncached());
    for pool in [&cached, &uncached] {
        let a = pool.tuple([("k", pool.integer(300))]).unwrap();
        let b = pool.tuple([("k", pool.integer(300))]).unwrap();
        assert!(same(&a, &b));
        assert_eq!(a.identity(), b.identity());
        let h1 = pool.heading(["p", "q"]).unwrap();
        let h2 = pool.heading(["q", "p"]).unwrap();
        assert!(same(&h1, &h2));
    }
    assert_eq!(uncached.stats(), PoolStats::default());
}

#[test]
fn merged_values_share_identity() {
    let pool = MemoryPool::new(PoolConfig::uncached());
    let a = ints(&pool, &[4, 5]);
    let b = pool.concat(&ints(&pool, &[4]), &ints(&pool, &[5])).unwrap();
    assert!(same(&a, &b));
    let id = a.identity();
    assert!(std::rc::Rc::ptr_eq(&id, &b.identity()));
}
