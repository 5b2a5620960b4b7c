//! Integration tests for the triple store.
//!
//! Exercises the public surface end to end: add/remove round trips, pattern
//! streams across all eight pattern shapes, value-equivalent object queries,
//! and iteration under mutation.

use std::collections::HashSet;
use triplemem::{Error, Node, Triple, TriplePattern, TripleStore};

fn spo(s: &str, p: &str, o: &str) -> Triple<Node> {
    Triple::new(Node::iri(s), Node::iri(p), Node::iri(o))
}

fn collect(store: &TripleStore, pattern: &TriplePattern<Node>) -> HashSet<Triple<Node>> {
    store.stream(pattern).unwrap().collect()
}

// ============================================================================
// Add / remove round trips
// ============================================================================

#[test]
fn test_duplicate_add_leaves_one_triple() {
    let store = TripleStore::new();
    store.add(spo("s1", "p1", "o1")).unwrap();
    store.add(spo("s1", "p1", "o1")).unwrap();

    assert_eq!(store.count(), 1);
    assert!(store
        .contains(&TriplePattern::exact(
            Node::iri("s1"),
            Node::iri("p1"),
            Node::iri("o1"),
        ))
        .unwrap());
}

#[test]
fn test_add_then_remove_restores_emptiness() {
    let store = TripleStore::new();
    store.add(spo("s1", "p1", "o1")).unwrap();
    store.remove(&spo("s1", "p1", "o1")).unwrap();

    assert_eq!(store.count(), 0);
    assert!(!store.contains_triple(&spo("s1", "p1", "o1")).unwrap());
    let stats = store.stats();
    assert_eq!(stats.subject_keys, 0);
    assert_eq!(stats.predicate_keys, 0);
    assert_eq!(stats.object_keys, 0);
}

#[test]
fn test_remove_one_of_two_keeps_the_other() {
    let store = TripleStore::new();
    store.add(spo("s1", "p1", "o1")).unwrap();
    store.add(spo("s1", "p2", "o2")).unwrap();

    store.remove(&spo("s1", "p1", "o1")).unwrap();

    assert!(!store.contains_triple(&spo("s1", "p1", "o1")).unwrap());
    assert!(store.contains_triple(&spo("s1", "p2", "o2")).unwrap());
    assert_eq!(store.count(), 1);
    // The shared subject key survives.
    assert_eq!(store.stats().subject_keys, 1);
}

#[test]
fn test_clear_is_idempotent() {
    let store = TripleStore::new();
    store.add(spo("s", "p", "o")).unwrap();

    store.clear().unwrap();
    assert_eq!(store.count(), 0);
    store.clear().unwrap();
    assert_eq!(store.count(), 0);
}

// ============================================================================
// Pattern streams
// ============================================================================

#[test]
fn test_stream_by_predicate() {
    let store = TripleStore::new();
    store.add(spo("s1", "p1", "o1")).unwrap();
    store.add(spo("s2", "p1", "o1")).unwrap();

    let found = collect(&store, &TriplePattern::predicate(Node::iri("p1")));
    let expected: HashSet<_> = [spo("s1", "p1", "o1"), spo("s2", "p1", "o1")]
        .into_iter()
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_stream_by_subject_past_promotion() {
    let store = TripleStore::new();
    for i in 1..=20 {
        store.add(spo("s1", "p1", &format!("o{}", i))).unwrap();
    }
    assert_eq!(store.count(), 20);

    let found = collect(&store, &TriplePattern::subject(Node::iri("s1")));
    assert_eq!(found.len(), 20);
    for i in 1..=20 {
        assert!(found.contains(&spo("s1", "p1", &format!("o{}", i))));
    }
}

#[test]
fn test_stream_all_eight_pattern_shapes() {
    let store = TripleStore::new();
    store.add(spo("s1", "p1", "o1")).unwrap();
    store.add(spo("s1", "p2", "o2")).unwrap();
    store.add(spo("s2", "p1", "o1")).unwrap();

    let s1 = || Node::iri("s1");
    let p1 = || Node::iri("p1");
    let o1 = || Node::iri("o1");

    // (s, p, o)
    assert_eq!(
        collect(&store, &TriplePattern::exact(s1(), p1(), o1())).len(),
        1
    );
    // (s, p, *)
    assert_eq!(
        collect(&store, &TriplePattern::subject(s1()).with_predicate(p1())).len(),
        1
    );
    // (s, *, o)
    assert_eq!(
        collect(&store, &TriplePattern::subject(s1()).with_object(o1())).len(),
        1
    );
    // (s, *, *)
    assert_eq!(collect(&store, &TriplePattern::subject(s1())).len(), 2);
    // (*, p, o)
    assert_eq!(
        collect(&store, &TriplePattern::predicate(p1()).with_object(o1())).len(),
        2
    );
    // (*, p, *)
    assert_eq!(collect(&store, &TriplePattern::predicate(p1())).len(), 2);
    // (*, *, o)
    assert_eq!(collect(&store, &TriplePattern::object(o1())).len(), 2);
    // (*, *, *)
    assert_eq!(collect(&store, &TriplePattern::any()).len(), 3);
}

#[test]
fn test_wildcard_stream_on_empty_store() {
    let store: TripleStore = TripleStore::new();
    assert_eq!(store.stream(&TriplePattern::any()).unwrap().count(), 0);
}

#[test]
fn test_every_added_triple_is_streamed() {
    let store = TripleStore::new();
    let pattern = TriplePattern::predicate(Node::iri("knows"));

    assert!(!store.contains(&pattern).unwrap());
    store.add(spo("alice", "knows", "bob")).unwrap();

    assert!(store.contains(&pattern).unwrap());
    let found = collect(&store, &pattern);
    assert!(found.contains(&spo("alice", "knows", "bob")));
}

// ============================================================================
// Value-equivalent objects
// ============================================================================

#[test]
fn test_object_query_matches_by_value() {
    let store = TripleStore::new();
    store
        .add(Triple::new(
            Node::iri("s1"),
            Node::iri("p1"),
            Node::typed("1", "xsd:integer"),
        ))
        .unwrap();

    // Value-equal but structurally distinct object forms.
    for lexical in ["01", "1.0"] {
        let pattern = TriplePattern::object(Node::typed(lexical, "xsd:double"));
        let found: Vec<_> = store.stream(&pattern).unwrap().collect();
        assert_eq!(found.len(), 1, "object form {:?} must match", lexical);
        assert_eq!(found[0].subject(), &Node::iri("s1"));
    }

    // Fully concrete containment honors value equality too.
    assert!(store
        .contains(&TriplePattern::exact(
            Node::iri("s1"),
            Node::iri("p1"),
            Node::typed("1.0", "xsd:double"),
        ))
        .unwrap());
}

#[test]
fn test_json_object_matches_by_value() {
    let store = TripleStore::new();
    store
        .add(Triple::new(
            Node::iri("doc"),
            Node::iri("payload"),
            Node::json(serde_json::json!({"a": 1, "b": [true, null]})),
        ))
        .unwrap();

    let reordered = Node::typed("{\"b\":[true,null],\"a\":1}", "rdf:JSON");
    assert!(store
        .contains(&TriplePattern::object(reordered))
        .unwrap());
}

// ============================================================================
// Iteration under mutation
// ============================================================================

#[test]
fn test_find_fails_fast_after_unrelated_mutation() {
    let store = TripleStore::new();
    for i in 0..10 {
        store.add(spo(&format!("s{}", i), "p1", "o1")).unwrap();
    }

    let mut iter = store.find(&TriplePattern::predicate(Node::iri("p1"))).unwrap();
    assert!(iter.next().unwrap().is_ok());

    store.add(spo("s3", "p2", "o3")).unwrap();

    match iter.next() {
        Some(Err(Error::ConcurrentModification { .. })) => {}
        other => panic!("expected concurrent-modification error, got {:?}", other.map(|r| r.map(|t| t.to_string()))),
    }
    // The iterator is terminated.
    assert!(iter.next().is_none());
}

#[test]
fn test_remove_during_iteration_detaches_iterator() {
    let store = TripleStore::new();
    for i in 0..10 {
        store.add(spo(&format!("s{}", i), "p1", "o1")).unwrap();
    }

    let mut iter = store.find(&TriplePattern::predicate(Node::iri("p1"))).unwrap();
    let first = iter.next().unwrap().unwrap();
    iter.remove().unwrap();

    // Mutations after the first remove no longer fault the iterator.
    store.add(spo("s99", "p2", "o3")).unwrap();

    let mut seen = 0;
    for triple in iter.by_ref() {
        triple.unwrap();
        seen += 1;
    }
    assert_eq!(seen, 9);

    // The removed element is gone from the store.
    assert!(!store.contains_triple(&first).unwrap());
    assert_eq!(store.count(), 10); // 10 - 1 removed + 1 added
}

#[test]
fn test_iterator_remove_before_next_is_illegal() {
    let store = TripleStore::new();
    store.add(spo("s", "p", "o")).unwrap();

    let mut iter = store.find(&TriplePattern::any()).unwrap();
    assert!(matches!(iter.remove(), Err(Error::IllegalState(_))));
}

#[test]
fn test_iterator_double_remove_is_illegal() {
    let store = TripleStore::new();
    store.add(spo("s", "p", "o")).unwrap();
    store.add(spo("s2", "p", "o")).unwrap();

    let mut iter = store.find(&TriplePattern::any()).unwrap();
    iter.next().unwrap().unwrap();
    iter.remove().unwrap();
    assert!(matches!(iter.remove(), Err(Error::IllegalState(_))));
}

#[test]
fn test_iterator_remove_after_end_is_illegal() {
    let store = TripleStore::new();
    store.add(spo("s", "p", "o")).unwrap();

    let mut iter = store.find(&TriplePattern::any()).unwrap();
    while let Some(triple) = iter.next() {
        triple.unwrap();
    }
    assert!(matches!(iter.remove(), Err(Error::IllegalState(_))));
}

#[test]
fn test_remove_matches_empties_selection() {
    let store = TripleStore::new();
    for i in 0..30 {
        store.add(spo(&format!("s{}", i), "p1", "o1")).unwrap();
        store.add(spo(&format!("s{}", i), "p2", "o2")).unwrap();
    }

    let removed = store
        .remove_matches(&TriplePattern::predicate(Node::iri("p1")))
        .unwrap();
    assert_eq!(removed, 30);
    assert_eq!(store.count(), 30);
    assert!(!store
        .contains(&TriplePattern::predicate(Node::iri("p1")))
        .unwrap());
}

// ============================================================================
// Streams are detached snapshots
// ============================================================================

#[test]
fn test_stream_is_unaffected_by_later_mutations() {
    let store = TripleStore::new();
    for i in 0..5 {
        store.add(spo(&format!("s{}", i), "p1", "o1")).unwrap();
    }

    let stream = store.stream(&TriplePattern::predicate(Node::iri("p1"))).unwrap();
    store.add(spo("s9", "p1", "o1")).unwrap();

    // The snapshot predates the add.
    assert_eq!(stream.count(), 5);
}

// ============================================================================
// Larger mixed workload
// ============================================================================

#[test]
fn test_mixed_workload_consistency() {
    let store = TripleStore::new();

    for i in 0..50 {
        for j in 0..5 {
            store
                .add(spo(&format!("s{}", i), &format!("p{}", j), &format!("o{}", i % 7)))
                .unwrap();
        }
    }
    assert_eq!(store.count(), 250);

    // Remove every triple of one predicate.
    for i in 0..50 {
        store
            .remove(&spo(&format!("s{}", i), "p0", &format!("o{}", i % 7)))
            .unwrap();
    }
    assert_eq!(store.count(), 200);

    assert_eq!(collect(&store, &TriplePattern::predicate(Node::iri("p0"))).len(), 0);
    assert_eq!(collect(&store, &TriplePattern::predicate(Node::iri("p1"))).len(), 50);
    assert_eq!(collect(&store, &TriplePattern::object(Node::iri("o0"))).len(), 32);
    assert_eq!(collect(&store, &TriplePattern::any()).len(), 200);
}
