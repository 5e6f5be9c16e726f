//! Integration tests for the canonical text codec

use relvalue_core::{Counted, MemoryPool, render};
use relvalue_foundation::BitString;

#[test]
fn scalar_literals() {
    let pool = MemoryPool::default();
    assert_eq!(render(&pool.boolean(false)), "0bFALSE");
    assert_eq!(render(&pool.integer(-17)), "-17");
    assert_eq!(render(&pool.rational(1, 3).unwrap()), "1/3");
    assert_eq!(render(&pool.rational(1, 4).unwrap()), "0.25");
    assert_eq!(render(&pool.bits(BitString::from_bools(&[true, false]))), "\\~?0b10");
    assert_eq!(render(&pool.bytes(Vec::new())), "\\~+");
    assert_eq!(render(&pool.text("tab\there")), "\"tab\\there\"");
}

#[test]
fn unordered_members_render_sorted() {
    let pool = MemoryPool::default();
    let a = pool.set(vec![pool.text("b"), pool.text("a")]);
    let b = pool.set(vec![pool.text("a"), pool.text("b"), pool.text("a")]);
    assert_eq!(render(&a), "\\?{\"a\", \"b\"}");
    assert_eq!(render(&a), render(&b));
}

#[test]
fn multiset_renders_multiplicities() {
    let pool = MemoryPool::default();
    let bag = pool
        .multiset_counted(vec![
            Counted { member: pool.integer(2), count: 1 },
            Counted { member: pool.integer(1), count: 3 },
        ])
        .unwrap();
    assert_eq!(render(&bag), "\\+{1 : 3, 2 : 1}");
}

#[test]
fn nested_values_render_recursively() {
    let pool = MemoryPool::default();
    let inner = pool.sequence(vec![pool.integer(1), pool.text("x")]);
    let tuple = pool
        .tuple([("items", inner), ("first name", pool.boolean(true))])
        .unwrap();
    assert_eq!(
        render(&tuple),
        "(\"first name\" : 0bTRUE, items : [1, \"x\"])"
    );
}

#[test]
fn handles_render_as_placeholders() {
    let pool = MemoryPool::default();
    let process = pool.process(std::rc::Rc::new(()));
    let text = render(&process);
    assert!(text.starts_with("<Process#"));
    assert!(text.ends_with('>'));
}

#[test]
fn display_matches_render() {
    let pool = MemoryPool::default();
    let v = pool.tuple([("a", pool.integer(1))]).unwrap();
    assert_eq!(v.to_string(), render(&v));
    assert_eq!(format!("{v:?}"), "Tuple((a : 1))");
}
