//! The triple record: an immutable `(subject, predicate, object)` statement.
//!
//! A triple precomputes the indexing hash of each position and a combined
//! identity hash at construction, so index writes and probes never re-hash
//! terms.

use crate::node::Node;
use crate::term::Term;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Combines three structural term hashes into a triple identity hash.
pub(crate) fn identity_hash(s: u64, p: u64, o: u64) -> u64 {
    s.wrapping_mul(31)
        .wrapping_add(p)
        .wrapping_mul(31)
        .wrapping_add(o)
}

/// An immutable RDF statement.
///
/// Two triples are equal iff all three positions are equal by term equality;
/// the cached hashes never participate in comparison.
///
/// # Examples
///
/// ```
/// use triplemem::{Node, Triple};
///
/// let triple = Triple::new(
///     Node::iri("ex:alice"),
///     Node::iri("ex:knows"),
///     Node::iri("ex:bob"),
/// );
///
/// assert_eq!(triple.subject(), &Node::iri("ex:alice"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(
    from = "RawTriple<N>",
    into = "RawTriple<N>",
    bound(
        serialize = "N: Serialize + Clone",
        deserialize = "N: serde::de::DeserializeOwned + Term"
    )
)]
pub struct Triple<N = Node> {
    subject: N,
    predicate: N,
    object: N,
    s_hash: u64,
    p_hash: u64,
    o_hash: u64,
    hash: u64,
}

/// Serialized shape of a triple: the three terms, caches recomputed on the
/// way back in.
#[derive(Serialize, Deserialize)]
#[serde(rename = "Triple")]
struct RawTriple<N> {
    subject: N,
    predicate: N,
    object: N,
}

impl<N: Term> Triple<N> {
    /// Creates a triple, precomputing all cached hashes.
    pub fn new(subject: N, predicate: N, object: N) -> Self {
        let s_hash = subject.indexing_hash();
        let p_hash = predicate.indexing_hash();
        let o_hash = object.indexing_hash();
        let hash = identity_hash(
            subject.term_hash(),
            predicate.term_hash(),
            object.term_hash(),
        );
        Self {
            subject,
            predicate,
            object,
            s_hash,
            p_hash,
            o_hash,
            hash,
        }
    }

    /// The subject term.
    pub fn subject(&self) -> &N {
        &self.subject
    }

    /// The predicate term.
    pub fn predicate(&self) -> &N {
        &self.predicate
    }

    /// The object term.
    pub fn object(&self) -> &N {
        &self.object
    }

    /// Cached indexing hash of the subject.
    pub fn subject_hash(&self) -> u64 {
        self.s_hash
    }

    /// Cached indexing hash of the predicate.
    pub fn predicate_hash(&self) -> u64 {
        self.p_hash
    }

    /// Cached indexing hash of the object.
    pub fn object_hash(&self) -> u64 {
        self.o_hash
    }

    /// Cached whole-triple identity hash.
    pub fn triple_hash(&self) -> u64 {
        self.hash
    }

    /// Decomposes the triple into its three terms.
    pub fn into_parts(self) -> (N, N, N) {
        (self.subject, self.predicate, self.object)
    }
}

impl<N: Term> PartialEq for Triple<N> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.subject == other.subject
            && self.predicate == other.predicate
            && self.object == other.object
    }
}

impl<N: Term> Eq for Triple<N> {}

impl<N: Term> Hash for Triple<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<N: fmt::Debug> fmt::Debug for Triple<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triple")
            .field("subject", &self.subject)
            .field("predicate", &self.predicate)
            .field("object", &self.object)
            .finish()
    }
}

impl<N: Term + fmt::Display> fmt::Display for Triple<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl<N: Term> From<RawTriple<N>> for Triple<N> {
    fn from(raw: RawTriple<N>) -> Self {
        Self::new(raw.subject, raw.predicate, raw.object)
    }
}

impl<N: Clone> From<Triple<N>> for RawTriple<N> {
    fn from(triple: Triple<N>) -> Self {
        Self {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
        }
    }
}

impl<N: Term> From<(N, N, N)> for Triple<N> {
    fn from((s, p, o): (N, N, N)) -> Self {
        Self::new(s, p, o)
    }
}
