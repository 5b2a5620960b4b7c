//! The iteration layer: match streams and the remove-capable find iterator.
//!
//! Both iterate a snapshot of the candidate bunch contents taken at creation
//! and apply the residual match filter lazily. [`FindIter`] additionally
//! checks the store's modification counter on every step and supports
//! deletion during iteration via snapshot-after-remove.

use crate::error::{Error, Result};
use crate::index::Position;
use crate::node::Node;
use crate::pattern::TriplePattern;
use crate::store::TripleStore;
use crate::term::Term;
use crate::triple::Triple;
use std::collections::VecDeque;
use std::sync::Arc;

/// Flattening iterator over a sequence of bunch snapshots.
pub(crate) struct BunchChain<N> {
    current: std::vec::IntoIter<Arc<Triple<N>>>,
    rest: std::vec::IntoIter<Vec<Arc<Triple<N>>>>,
}

impl<N> BunchChain<N> {
    pub(crate) fn empty() -> Self {
        Self {
            current: Vec::new().into_iter(),
            rest: Vec::new().into_iter(),
        }
    }

    pub(crate) fn single(bunch: Vec<Arc<Triple<N>>>) -> Self {
        Self {
            current: bunch.into_iter(),
            rest: Vec::new().into_iter(),
        }
    }

    pub(crate) fn chained(bunches: Vec<Vec<Arc<Triple<N>>>>) -> Self {
        Self {
            current: Vec::new().into_iter(),
            rest: bunches.into_iter(),
        }
    }
}

impl<N> Iterator for BunchChain<N> {
    type Item = Arc<Triple<N>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(triple) = self.current.next() {
                return Some(triple);
            }
            match self.rest.next() {
                Some(bunch) => self.current = bunch.into_iter(),
                None => return None,
            }
        }
    }
}

/// A lazy stream of triples matching a pattern.
///
/// Returned by [`TripleStore::stream`]. The stream iterates a snapshot taken
/// when it was created, so later store mutations neither affect nor fault
/// it. Finite and non-restartable.
pub struct MatchStream<N = Node> {
    source: BunchChain<N>,
    pattern: TriplePattern<N>,
    scanned: Position,
}

impl<N: Term> MatchStream<N> {
    pub(crate) fn new(pattern: TriplePattern<N>, scanned: Position, source: BunchChain<N>) -> Self {
        Self {
            source,
            pattern,
            scanned,
        }
    }
}

impl<N: Term> Iterator for MatchStream<N> {
    type Item = Triple<N>;

    fn next(&mut self) -> Option<Self::Item> {
        for triple in self.source.by_ref() {
            if self.pattern.matches_scanned(&triple, self.scanned) {
                return Some((*triple).clone());
            }
        }
        None
    }
}

/// A fail-fast iterator over matching triples, with optional removal.
///
/// Returned by [`TripleStore::find`]. Each step compares the store's
/// modification counter against the value captured at creation and yields
/// [`Error::ConcurrentModification`] if the store changed.
///
/// [`remove`](FindIter::remove) deletes the just-yielded triple from the
/// store and switches the iterator into snapshot mode: the remaining matches
/// are materialized, further store mutations no longer fault the iterator,
/// and later removals keep delegating to the store.
///
/// # Examples
///
/// ```
/// use triplemem::{Node, Triple, TriplePattern, TripleStore};
///
/// let store = TripleStore::new();
/// store.add(Triple::new(Node::iri("s"), Node::iri("p"), Node::iri("o")))?;
///
/// let mut iter = store.find(&TriplePattern::subject(Node::iri("s")))?;
/// while let Some(triple) = iter.next() {
///     let _triple = triple?;
///     iter.remove()?;
/// }
/// assert_eq!(store.count(), 0);
/// # Ok::<(), triplemem::Error>(())
/// ```
pub struct FindIter<N = Node> {
    store: TripleStore<N>,
    source: MatchStream<N>,
    expected_version: u64,
    current: Option<Triple<N>>,
    snapshot: Option<VecDeque<Triple<N>>>,
    finished: bool,
}

impl<N: Term> FindIter<N> {
    pub(crate) fn new(store: TripleStore<N>, source: MatchStream<N>, version: u64) -> Self {
        Self {
            store,
            source,
            expected_version: version,
            current: None,
            snapshot: None,
            finished: false,
        }
    }

    /// Removes the just-yielded triple from the store.
    ///
    /// The first call switches the iterator into snapshot mode; see the type
    /// docs. Calling before the first yielded element, after the iterator is
    /// exhausted, or twice without an intervening step returns
    /// [`Error::IllegalState`].
    pub fn remove(&mut self) -> Result<()> {
        let triple = self
            .current
            .take()
            .ok_or(Error::IllegalState("no current triple to remove"))?;
        if self.snapshot.is_none() {
            self.snapshot = Some(self.source.by_ref().collect());
        }
        self.store.remove(&triple)?;
        Ok(())
    }
}

impl<N: Term> Iterator for FindIter<N> {
    type Item = Result<Triple<N>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(snapshot) = &mut self.snapshot {
            match snapshot.pop_front() {
                Some(triple) => {
                    self.current = Some(triple.clone());
                    return Some(Ok(triple));
                }
                None => {
                    self.current = None;
                    self.finished = true;
                    return None;
                }
            }
        }

        match self.store.version() {
            Ok(found) if found == self.expected_version => {}
            Ok(found) => {
                self.finished = true;
                return Some(Err(Error::ConcurrentModification {
                    expected: self.expected_version,
                    found,
                }));
            }
            Err(err) => {
                self.finished = true;
                return Some(Err(err));
            }
        }

        match self.source.next() {
            Some(triple) => {
                self.current = Some(triple.clone());
                Some(Ok(triple))
            }
            None => {
                self.current = None;
                self.finished = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn triple(i: usize) -> Arc<Triple<Node>> {
        Arc::new(Triple::new(
            Node::iri(format!("s{}", i)),
            Node::iri("p"),
            Node::iri("o"),
        ))
    }

    #[test]
    fn test_bunch_chain_flattens() {
        let chain = BunchChain::chained(vec![
            vec![triple(0), triple(1)],
            vec![],
            vec![triple(2)],
        ]);
        assert_eq!(chain.count(), 3);
    }

    #[test]
    fn test_bunch_chain_empty() {
        assert_eq!(BunchChain::<Node>::empty().count(), 0);
    }

    #[test]
    fn test_match_stream_filters() {
        let source = BunchChain::single(vec![triple(0), triple(1), triple(2)]);
        let pattern = TriplePattern::subject(Node::iri("s1"));
        let stream = MatchStream::new(pattern, Position::Predicate, source);
        let found: Vec<_> = stream.collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].subject(), &Node::iri("s1"));
    }
}
