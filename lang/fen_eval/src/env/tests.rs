use super::*;
use pretty_assertions::assert_eq;

fn name(raw: u32) -> Name {
    Name::from_raw(raw)
}

fn value(index: u32) -> ValueId {
    ValueId { index, gen: 1 }
}

#[test]
fn add_and_get() {
    let mut env = Environment::new(None);
    assert!(env.add(name(1), value(10)));
    assert_eq!(env.get(name(1)), Some(value(10)));
    assert_eq!(env.get(name(2)), None);
}

#[test]
fn add_rejects_duplicates() {
    let mut env = Environment::new(None);
    assert!(env.add(name(1), value(10)));
    // Append-only: rebinding fails and leaves the original in place.
    assert!(!env.add(name(1), value(20)));
    assert_eq!(env.get(name(1)), Some(value(10)));
    assert_eq!(env.len(), 1);
}

#[test]
fn parent_link() {
    let parent = value(99);
    let env = Environment::new(Some(parent));
    assert_eq!(env.parent(), Some(parent));
    assert_eq!(Environment::new(None).parent(), None);
}

#[test]
fn values_iterate_in_insertion_order() {
    let mut env = Environment::new(None);
    assert!(env.add(name(3), value(30)));
    assert!(env.add(name(1), value(10)));
    assert!(env.add(name(2), value(20)));
    let values: Vec<ValueId> = env.values().collect();
    assert_eq!(values, vec![value(30), value(10), value(20)]);
}

#[test]
fn empty_env() {
    let env = Environment::new(None);
    assert!(env.is_empty());
    assert_eq!(env.len(), 0);
    assert!(env.entries().is_empty());
}
