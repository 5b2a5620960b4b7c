//! The term adapter: the seam between opaque RDF terms and the store core.
//!
//! The store never inspects a term's structure. Everything it needs crosses
//! this trait: structural equality (via [`Eq`]), a stable structural hash, an
//! indexing hash that may collapse value-equivalent forms, and a value-based
//! equivalence predicate for terms where value equality differs from
//! structural equality.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Computes a stable 64-bit hash of a value.
///
/// Uses a hasher with fixed keys, so the result is deterministic within a
/// process run. Suitable as the basis for [`Term::term_hash`].
pub fn stable_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// An RDF term as seen by the store core.
///
/// Implementors must uphold two laws:
///
/// - `a == b` implies `a.term_hash() == b.term_hash()`;
/// - `a.value_eq(&b)` implies `a.indexing_hash() == b.indexing_hash()`, so
///   value-equivalent terms land in the same index bunch.
///
/// The default implementations make any `Clone + Eq + Hash` type a term with
/// purely structural semantics; override [`indexing_hash`](Term::indexing_hash),
/// [`value_eq`](Term::value_eq), and [`value_eq_matters`](Term::value_eq_matters)
/// for term types (typically typed literals) whose value equality is coarser
/// than their syntax.
pub trait Term: Clone + Eq + Hash + fmt::Debug {
    /// Stable structural hash of this term.
    fn term_hash(&self) -> u64 {
        stable_hash(self)
    }

    /// Hash used as an index key.
    ///
    /// May collapse value-equivalent forms onto the same key. Used only for
    /// bunch selection, never as an equality arbiter.
    fn indexing_hash(&self) -> u64 {
        self.term_hash()
    }

    /// Value-based equivalence.
    ///
    /// Falls back to structural equality for terms where the two coincide.
    fn value_eq(&self, other: &Self) -> bool {
        self == other
    }

    /// Whether [`value_eq`](Term::value_eq) can differ from structural
    /// equality for this term.
    ///
    /// When this returns `true` for a query object, match predicates must use
    /// `value_eq` and identity-hash probes are not usable.
    fn value_eq_matters(&self) -> bool {
        false
    }
}
