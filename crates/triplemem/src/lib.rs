//! triplemem - In-memory RDF triple store
//!
//! A storage engine for RDF statements: holds a set of `(subject, predicate,
//! object)` triples and answers pattern queries where each position is either
//! a concrete term or a wildcard. It does not parse RDF, execute SPARQL, or
//! persist to disk.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       TripleStore                         │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                           │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │                  Pattern planner                    │  │
//! │  │  8-way classification │ index pick │ residual filter │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                           │                               │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │                    Index maps                       │  │
//! │  │  ┌──────────┐  ┌────────────┐  ┌──────────┐        │  │
//! │  │  │ subject  │  │ predicate  │  │  object  │        │  │
//! │  │  └──────────┘  └────────────┘  └──────────┘        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                           │                               │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │                  Adaptive bunches                   │  │
//! │  │  small array  ──promotes──▶  open-addressed table   │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each index maps a position's indexing hash to a *bunch*: the set of
//! triples colliding on that hash. A bunch starts as a small array and
//! promotes, one-way, to an open-addressed hash table when it outgrows
//! sixteen entries. Writes fan out to all three indexes, with the by-subject
//! index acting as the duplicate-detection authority; reads pick one index
//! and verify the rest with a residual filter.
//!
//! # Quick Start
//!
//! ```
//! use triplemem::{Node, Triple, TriplePattern, TripleStore};
//!
//! let store = TripleStore::new();
//!
//! store.add(Triple::new(
//!     Node::iri("user:alice"),
//!     Node::iri("has_title"),
//!     Node::literal("Doctor"),
//! ))?;
//!
//! // Pattern positions are concrete terms or wildcards.
//! let doctors = TriplePattern::object(Node::literal("Doctor"));
//! assert!(store.contains(&doctors)?);
//!
//! for triple in store.stream(&doctors)? {
//!     println!("{}", triple);
//! }
//! # Ok::<(), triplemem::Error>(())
//! ```
//!
//! # Value equivalence
//!
//! Typed literals can be equal by value while differing in syntax; object
//! position queries honor that:
//!
//! ```
//! use triplemem::{Node, Triple, TriplePattern, TripleStore};
//!
//! let store = TripleStore::new();
//! store.add(Triple::new(
//!     Node::iri("m:pi"),
//!     Node::iri("approx"),
//!     Node::typed("3.0", "xsd:double"),
//! ))?;
//!
//! // "3" and "3.0" are the same value.
//! let pattern = TriplePattern::object(Node::typed("3", "xsd:integer"));
//! assert!(store.contains(&pattern)?);
//! # Ok::<(), triplemem::Error>(())
//! ```
//!
//! # Iteration under mutation
//!
//! [`TripleStore::find`] returns a fail-fast iterator: stepping it after an
//! unrelated mutation yields a concurrent-modification error. Calling
//! [`FindIter::remove`] instead deletes during iteration and detaches the
//! iterator onto a snapshot of the remaining matches.

pub mod bunch;
pub mod error;
pub mod hashed;
pub mod index;
pub mod iter;
pub mod node;
pub mod pattern;
pub mod store;
pub mod term;
pub mod triple;

// Re-exports
pub use bunch::{TripleBunch, ARRAY_BUNCH_MAX};
pub use error::{Error, Result};
pub use hashed::TripleTable;
pub use index::{BunchMap, Position};
pub use iter::{FindIter, MatchStream};
pub use node::{Literal, Node};
pub use pattern::{PatternKind, TriplePattern};
pub use store::{StoreStats, TripleStore};
pub use term::{stable_hash, Term};
pub use triple::Triple;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_store() {
        let store: TripleStore = TripleStore::new();
        assert_eq!(store.count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_public_surface_roundtrip() {
        let store = TripleStore::new();
        let triple = Triple::new(
            Node::iri("user:alice"),
            Node::iri("has_name"),
            Node::literal("Alice"),
        );

        store.add(triple.clone()).unwrap();
        assert!(store.contains_triple(&triple).unwrap());

        store.remove(&triple).unwrap();
        assert!(!store.contains_triple(&triple).unwrap());
        assert!(store.is_empty());
    }
}
