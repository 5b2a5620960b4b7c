//! Triple patterns: the query shape accepted by `contains`, `stream`, and
//! `find`.
//!
//! Each position is either a concrete term or a wildcard (`None`). A pattern
//! classifies into one of eight cases, which the planner maps onto an index
//! scan plus a residual filter.

use crate::index::Position;
use crate::node::Node;
use crate::term::Term;
use crate::triple::Triple;
use serde::{Deserialize, Serialize};

/// A pattern over `(subject, predicate, object)`.
///
/// `None` positions act as wildcards.
///
/// # Examples
///
/// Match all triples with a specific subject:
///
/// ```
/// use triplemem::{Node, TriplePattern};
///
/// let pattern = TriplePattern::subject(Node::iri("ex:alice"));
/// ```
///
/// Match triples with a specific subject and predicate:
///
/// ```
/// use triplemem::{Node, TriplePattern};
///
/// let pattern = TriplePattern::subject(Node::iri("ex:alice"))
///     .with_predicate(Node::iri("ex:knows"));
/// ```
///
/// Match everything:
///
/// ```
/// use triplemem::TriplePattern;
///
/// let pattern = TriplePattern::<triplemem::Node>::any();
/// assert!(pattern.is_wildcard());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriplePattern<N = Node> {
    /// An optional constraint on the subject.
    pub subject: Option<N>,
    /// An optional constraint on the predicate.
    pub predicate: Option<N>,
    /// An optional constraint on the object.
    pub object: Option<N>,
}

/// The eight pattern cases, named by which positions are concrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `(s, p, o)`: all concrete.
    ConcreteAll,
    /// `(s, p, *)`
    SubjectPredicate,
    /// `(s, *, o)`
    SubjectObject,
    /// `(s, *, *)`
    SubjectOnly,
    /// `(*, p, o)`
    PredicateObject,
    /// `(*, p, *)`
    PredicateOnly,
    /// `(*, *, o)`
    ObjectOnly,
    /// `(*, *, *)`: all wildcards.
    Unconstrained,
}

impl<N: Term> TriplePattern<N> {
    /// The pattern that matches every triple.
    pub fn any() -> Self {
        Self {
            subject: None,
            predicate: None,
            object: None,
        }
    }

    /// A pattern constraining only the subject.
    pub fn subject(subject: N) -> Self {
        Self {
            subject: Some(subject),
            ..Self::any()
        }
    }

    /// A pattern constraining only the predicate.
    pub fn predicate(predicate: N) -> Self {
        Self {
            predicate: Some(predicate),
            ..Self::any()
        }
    }

    /// A pattern constraining only the object.
    pub fn object(object: N) -> Self {
        Self {
            object: Some(object),
            ..Self::any()
        }
    }

    /// A fully concrete pattern.
    pub fn exact(subject: N, predicate: N, object: N) -> Self {
        Self {
            subject: Some(subject),
            predicate: Some(predicate),
            object: Some(object),
        }
    }

    /// The pattern matching exactly this triple.
    pub fn of(triple: &Triple<N>) -> Self {
        Self::exact(
            triple.subject().clone(),
            triple.predicate().clone(),
            triple.object().clone(),
        )
    }

    /// Adds a subject constraint.
    pub fn with_subject(mut self, subject: N) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Adds a predicate constraint.
    pub fn with_predicate(mut self, predicate: N) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Adds an object constraint.
    pub fn with_object(mut self, object: N) -> Self {
        self.object = Some(object);
        self
    }

    /// Returns `true` if the triple matches this pattern.
    ///
    /// Subject and predicate compare structurally; the object compares by
    /// value equivalence, which collapses to structural equality for terms
    /// where the two coincide.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::{Node, Triple, TriplePattern};
    ///
    /// let triple = Triple::new(
    ///     Node::iri("ex:alice"),
    ///     Node::iri("ex:age"),
    ///     Node::integer(30),
    /// );
    ///
    /// assert!(TriplePattern::subject(Node::iri("ex:alice")).matches(&triple));
    /// assert!(TriplePattern::object(Node::typed("30.0", "xsd:double")).matches(&triple));
    /// assert!(!TriplePattern::subject(Node::iri("ex:bob")).matches(&triple));
    /// ```
    pub fn matches(&self, triple: &Triple<N>) -> bool {
        if let Some(s) = &self.subject {
            if s != triple.subject() {
                return false;
            }
        }
        if let Some(p) = &self.predicate {
            if p != triple.predicate() {
                return false;
            }
        }
        if let Some(o) = &self.object {
            if !o.value_eq(triple.object()) {
                return false;
            }
        }
        true
    }

    /// Residual match check for a triple pulled from the `scanned` index.
    ///
    /// Tests the positions the scan did not serve first (they fail fastest),
    /// then the object by value equivalence, then the scanned position. The
    /// scanned position must still be verified because distinct terms can
    /// collide on an indexing hash.
    pub(crate) fn matches_scanned(&self, triple: &Triple<N>, scanned: Position) -> bool {
        if scanned != Position::Subject {
            if let Some(s) = &self.subject {
                if s != triple.subject() {
                    return false;
                }
            }
        }
        if scanned != Position::Predicate {
            if let Some(p) = &self.predicate {
                if p != triple.predicate() {
                    return false;
                }
            }
        }
        if scanned != Position::Object {
            if let Some(o) = &self.object {
                if !o.value_eq(triple.object()) {
                    return false;
                }
            }
        }
        match scanned {
            Position::Subject => self
                .subject
                .as_ref()
                .map_or(true, |s| s == triple.subject()),
            Position::Predicate => self
                .predicate
                .as_ref()
                .map_or(true, |p| p == triple.predicate()),
            Position::Object => self
                .object
                .as_ref()
                .map_or(true, |o| o.value_eq(triple.object())),
        }
    }

    /// Classifies the pattern into one of the eight planner cases.
    pub fn classify(&self) -> PatternKind {
        match (&self.subject, &self.predicate, &self.object) {
            (Some(_), Some(_), Some(_)) => PatternKind::ConcreteAll,
            (Some(_), Some(_), None) => PatternKind::SubjectPredicate,
            (Some(_), None, Some(_)) => PatternKind::SubjectObject,
            (Some(_), None, None) => PatternKind::SubjectOnly,
            (None, Some(_), Some(_)) => PatternKind::PredicateObject,
            (None, Some(_), None) => PatternKind::PredicateOnly,
            (None, None, Some(_)) => PatternKind::ObjectOnly,
            (None, None, None) => PatternKind::Unconstrained,
        }
    }

    /// Returns `true` if all three positions are concrete.
    pub fn is_exact(&self) -> bool {
        self.classify() == PatternKind::ConcreteAll
    }

    /// Returns `true` if all three positions are wildcards.
    pub fn is_wildcard(&self) -> bool {
        self.classify() == PatternKind::Unconstrained
    }
}

impl<N> Default for TriplePattern<N> {
    fn default() -> Self {
        Self {
            subject: None,
            predicate: None,
            object: None,
        }
    }
}
