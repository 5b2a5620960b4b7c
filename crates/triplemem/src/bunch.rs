//! The adaptive bunch: the set of triples sharing one position's indexing
//! hash.
//!
//! A bunch starts as a small array scanned linearly and promotes, one-way,
//! to an open-addressed hash table once it outgrows
//! [`ARRAY_BUNCH_MAX`]. Callers see a single uniform operation set; the
//! representation is internal.

use crate::hashed::TripleTable;
use crate::node::Node;
use crate::term::Term;
use crate::triple::{identity_hash, Triple};
use std::sync::Arc;

/// Largest size of the array form; the next insert promotes.
pub const ARRAY_BUNCH_MAX: usize = 16;

/// A set of triples colliding on one position's indexing hash.
///
/// The owning index determines which position that is; the bunch itself is
/// position-agnostic.
#[derive(Debug)]
pub enum TripleBunch<N = Node> {
    /// Small contiguous form: linear scan, swap-with-last deletion.
    Array(Vec<Arc<Triple<N>>>),
    /// Promoted form: open-addressed hash table keyed on the triple hash.
    Hashed(TripleTable<N>),
}

impl<N: Term> TripleBunch<N> {
    /// Creates an empty array-form bunch.
    pub fn new() -> Self {
        Self::Array(Vec::new())
    }

    /// Number of triples held.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(v) => v.len(),
            Self::Hashed(t) => t.len(),
        }
    }

    /// Returns `true` if the bunch holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the bunch has promoted to hashed form.
    pub fn is_hashed(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }

    /// Inserts if absent; returns whether the triple was inserted.
    pub fn try_add(&mut self, triple: Arc<Triple<N>>) -> bool {
        if let Self::Hashed(t) = self {
            return t.try_insert(triple);
        }
        if self.contains(&triple) {
            return false;
        }
        self.push_or_promote(triple);
        true
    }

    /// Inserts assuming the triple is absent.
    ///
    /// Used by secondary indices once the primary has confirmed insertion.
    pub fn add_unchecked(&mut self, triple: Arc<Triple<N>>) {
        if let Self::Hashed(t) = self {
            t.insert_unchecked(triple);
            return;
        }
        self.push_or_promote(triple);
    }

    /// Array-form insert that promotes when the array is full.
    fn push_or_promote(&mut self, triple: Arc<Triple<N>>) {
        if let Self::Array(v) = self {
            if v.len() < ARRAY_BUNCH_MAX {
                v.push(triple);
                return;
            }
        }
        self.promote_with(triple);
    }

    /// Removes if present; returns whether a triple was removed.
    pub fn try_remove(&mut self, triple: &Triple<N>) -> bool {
        match self {
            Self::Array(v) => match v.iter().position(|t| **t == *triple) {
                Some(i) => {
                    v.swap_remove(i);
                    true
                }
                None => false,
            },
            Self::Hashed(t) => t.try_remove(triple),
        }
    }

    /// Removes assuming the triple is present.
    pub fn remove_unchecked(&mut self, triple: &Triple<N>) {
        let removed = self.try_remove(triple);
        debug_assert!(removed, "triple missing from secondary bunch");
    }

    /// Returns `true` if an equal triple is present.
    pub fn contains(&self, triple: &Triple<N>) -> bool {
        match self {
            Self::Array(v) => v.iter().any(|t| **t == *triple),
            Self::Hashed(t) => t.contains(triple),
        }
    }

    /// Returns `true` if the bunch holds a triple matching the three
    /// concrete terms, with the object compared by value equivalence where
    /// that differs from structural equality.
    ///
    /// When the object compares structurally, the hashed form probes by the
    /// identity hash; a value-comparable object makes that hash unusable, so
    /// the bunch is scanned.
    pub fn contains_match(&self, s: &N, p: &N, o: &N) -> bool {
        if o.value_eq_matters() {
            let matches =
                |t: &Triple<N>| t.subject() == s && t.predicate() == p && o.value_eq(t.object());
            match self {
                Self::Array(v) => v.iter().any(|t| matches(t)),
                Self::Hashed(table) => table.iter().any(|t| matches(t)),
            }
        } else {
            let hash = identity_hash(s.term_hash(), p.term_hash(), o.term_hash());
            let matches =
                |t: &Triple<N>| t.subject() == s && t.predicate() == p && t.object() == o;
            match self {
                Self::Array(v) => v.iter().any(|t| matches(t)),
                Self::Hashed(table) => table.probe_any(hash, matches),
            }
        }
    }

    /// Snapshot of the current contents, detached from the live bunch.
    pub fn snapshot(&self) -> Vec<Arc<Triple<N>>> {
        match self {
            Self::Array(v) => v.clone(),
            Self::Hashed(t) => t.snapshot(),
        }
    }

    /// Replaces the array form with a hashed form holding the existing
    /// triples plus `extra`. One-way.
    fn promote_with(&mut self, extra: Arc<Triple<N>>) {
        if let Self::Array(v) = self {
            log::trace!("promoting bunch to hashed form ({} triples)", v.len() + 1);
            let mut table = TripleTable::with_capacity_for(v.len() + 1);
            for triple in v.drain(..) {
                table.insert_unchecked(triple);
            }
            table.insert_unchecked(extra);
            *self = Self::Hashed(table);
        }
    }
}

impl<N: Term> Default for TripleBunch<N> {
    fn default() -> Self {
        Self::new()
    }
}
