//! The store façade: three per-position indexes behind one add / remove /
//! query surface.
//!
//! Writes fan out to all three indexes. The by-subject index is the
//! duplicate-detection authority: the other two trust its verdict and take
//! unchecked writes, so a successful add costs one checked probe plus two
//! blind inserts. Reads go through the pattern planner, which picks one
//! index to scan and leaves the rest to the residual filter.

use crate::error::{Error, Result};
use crate::index::{BunchMap, Position};
use crate::iter::{BunchChain, FindIter, MatchStream};
use crate::node::Node;
use crate::pattern::TriplePattern;
use crate::term::Term;
use crate::triple::Triple;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Bunch size below which a concrete term's bunch is scanned directly
/// instead of being compared against another index's bunch.
const DIRECT_SCAN_LIMIT: usize = 80;

/// An in-memory triple store with adaptive three-way indexing.
///
/// Every triple is indexed by subject, predicate, and object. Lookups accept
/// a [`TriplePattern`] with any combination of concrete and wildcard
/// positions and scan the cheapest applicable index.
///
/// The store is single-writer: mutations are serialized by an internal lock,
/// and methods take `&self`. Cloning a `TripleStore` returns a handle to the
/// same store.
///
/// # Examples
///
/// ```
/// use triplemem::{Node, Triple, TriplePattern, TripleStore};
///
/// let store = TripleStore::new();
///
/// store.add(Triple::new(
///     Node::iri("ex:alice"),
///     Node::iri("ex:knows"),
///     Node::iri("ex:bob"),
/// ))?;
///
/// assert_eq!(store.count(), 1);
///
/// let knows_bob = TriplePattern::predicate(Node::iri("ex:knows"))
///     .with_object(Node::iri("ex:bob"));
/// assert!(store.contains(&knows_bob)?);
///
/// for triple in store.stream(&knows_bob)? {
///     println!("{}", triple);
/// }
/// # Ok::<(), triplemem::Error>(())
/// ```
pub struct TripleStore<N = Node> {
    inner: Arc<RwLock<StoreInner<N>>>,
}

/// The mutable state: three index maps, the cached triple count, and the
/// modification counter read by iterators.
pub(crate) struct StoreInner<N> {
    by_subject: BunchMap<N>,
    by_predicate: BunchMap<N>,
    by_object: BunchMap<N>,
    len: usize,
    version: u64,
}

/// Statistics about the contents of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of triples.
    pub triple_count: usize,
    /// Number of distinct subject index keys.
    pub subject_keys: usize,
    /// Number of distinct predicate index keys.
    pub predicate_keys: usize,
    /// Number of distinct object index keys.
    pub object_keys: usize,
}

impl<N: Term> TripleStore<N> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                by_subject: BunchMap::new(),
                by_predicate: BunchMap::new(),
                by_object: BunchMap::new(),
                len: 0,
                version: 0,
            })),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner<N>>> {
        self.inner.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner<N>>> {
        self.inner.write().map_err(|_| Error::LockPoisoned)
    }

    /// Adds a triple. Returns whether it was newly inserted; adding a triple
    /// that is already present is a silent no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::{Node, Triple, TripleStore};
    ///
    /// let store = TripleStore::new();
    /// let triple = Triple::new(Node::iri("s"), Node::iri("p"), Node::iri("o"));
    ///
    /// assert!(store.add(triple.clone())?);
    /// assert!(!store.add(triple)?);
    /// assert_eq!(store.count(), 1);
    /// # Ok::<(), triplemem::Error>(())
    /// ```
    pub fn add(&self, triple: Triple<N>) -> Result<bool> {
        let triple = Arc::new(triple);
        let mut inner = self.write()?;

        let bunch = inner.by_subject.get_or_insert(triple.subject_hash());
        if !bunch.try_add(Arc::clone(&triple)) {
            return Ok(false);
        }
        inner
            .by_predicate
            .get_or_insert(triple.predicate_hash())
            .add_unchecked(Arc::clone(&triple));
        inner
            .by_object
            .get_or_insert(triple.object_hash())
            .add_unchecked(triple);
        inner.len += 1;
        inner.version += 1;
        Ok(true)
    }

    /// Adds every triple from an iterator. Returns the number newly
    /// inserted; duplicates are silently skipped.
    pub fn add_all<I>(&self, triples: I) -> Result<usize>
    where
        I: IntoIterator<Item = Triple<N>>,
    {
        let mut inserted = 0;
        for triple in triples {
            if self.add(triple)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Removes a triple. Returns whether it was present; removing an absent
    /// triple is a silent no-op.
    pub fn remove(&self, triple: &Triple<N>) -> Result<bool> {
        let mut inner = self.write()?;

        let s_key = triple.subject_hash();
        let (removed, s_empty) = match inner.by_subject.get_mut(s_key) {
            Some(bunch) => (bunch.try_remove(triple), bunch.is_empty()),
            None => return Ok(false),
        };
        if !removed {
            return Ok(false);
        }
        if s_empty {
            inner.by_subject.remove(s_key);
        }

        let p_key = triple.predicate_hash();
        let p_empty = match inner.by_predicate.get_mut(p_key) {
            Some(bunch) => {
                bunch.remove_unchecked(triple);
                bunch.is_empty()
            }
            None => false,
        };
        if p_empty {
            inner.by_predicate.remove(p_key);
        }

        let o_key = triple.object_hash();
        let o_empty = match inner.by_object.get_mut(o_key) {
            Some(bunch) => {
                bunch.remove_unchecked(triple);
                bunch.is_empty()
            }
            None => false,
        };
        if o_empty {
            inner.by_object.remove(o_key);
        }

        inner.len -= 1;
        inner.version += 1;
        Ok(true)
    }

    /// Removes every triple matching the pattern. Returns the number
    /// removed.
    pub fn remove_matches(&self, pattern: &TriplePattern<N>) -> Result<usize> {
        let mut iter = self.find(pattern)?;
        let mut removed = 0;
        while let Some(triple) = iter.next() {
            triple?;
            iter.remove()?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Returns `true` if any triple matches the pattern.
    ///
    /// A fully concrete pattern is a single membership probe against the
    /// by-subject index; anything else runs the planner and stops at the
    /// first match.
    pub fn contains(&self, pattern: &TriplePattern<N>) -> Result<bool> {
        let inner = self.read()?;
        if let (Some(s), Some(p), Some(o)) =
            (&pattern.subject, &pattern.predicate, &pattern.object)
        {
            return Ok(match inner.by_subject.get(s.indexing_hash()) {
                Some(bunch) => bunch.contains_match(s, p, o),
                None => false,
            });
        }
        let (scanned, chain) = inner.scan(pattern);
        drop(inner);
        Ok(MatchStream::new(pattern.clone(), scanned, chain)
            .next()
            .is_some())
    }

    /// Returns `true` if the exact triple is present.
    pub fn contains_triple(&self, triple: &Triple<N>) -> Result<bool> {
        self.contains(&TriplePattern::of(triple))
    }

    /// The number of triples. O(1).
    pub fn count(&self) -> usize {
        self.inner.read().map(|inner| inner.len).unwrap_or(0)
    }

    /// Returns `true` if the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Drops every triple and resets the indexes to minimum capacity.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.write()?;
        log::debug!("clearing store ({} triples)", inner.len);
        inner.by_subject.clear();
        inner.by_predicate.clear();
        inner.by_object.clear();
        inner.len = 0;
        inner.version += 1;
        Ok(())
    }

    /// A lazy stream of the triples matching the pattern.
    ///
    /// The stream iterates a snapshot taken now; later mutations neither
    /// affect nor fault it. Use [`find`](Self::find) for fail-fast iteration
    /// or remove-during-iteration.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::{Node, Triple, TriplePattern, TripleStore};
    ///
    /// let store = TripleStore::new();
    /// store.add(Triple::new(Node::iri("a"), Node::iri("p"), Node::iri("x")))?;
    /// store.add(Triple::new(Node::iri("b"), Node::iri("p"), Node::iri("x")))?;
    ///
    /// let subjects: Vec<_> = store
    ///     .stream(&TriplePattern::object(Node::iri("x")))?
    ///     .map(|t| t.subject().clone())
    ///     .collect();
    /// assert_eq!(subjects.len(), 2);
    /// # Ok::<(), triplemem::Error>(())
    /// ```
    pub fn stream(&self, pattern: &TriplePattern<N>) -> Result<MatchStream<N>> {
        let inner = self.read()?;
        let (scanned, chain) = inner.scan(pattern);
        Ok(MatchStream::new(pattern.clone(), scanned, chain))
    }

    /// A fail-fast iterator over the triples matching the pattern, with
    /// optional removal.
    ///
    /// Stepping the iterator after an unrelated store mutation yields
    /// [`Error::ConcurrentModification`], unless
    /// [`FindIter::remove`] has switched it into snapshot mode.
    pub fn find(&self, pattern: &TriplePattern<N>) -> Result<FindIter<N>> {
        let inner = self.read()?;
        let version = inner.version;
        let (scanned, chain) = inner.scan(pattern);
        drop(inner);
        Ok(FindIter::new(
            self.clone(),
            MatchStream::new(pattern.clone(), scanned, chain),
            version,
        ))
    }

    /// A lazy stream of every triple in the store.
    pub fn iter(&self) -> Result<MatchStream<N>> {
        self.stream(&TriplePattern::any())
    }

    /// Statistics about the store contents.
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read().ok();
        StoreStats {
            triple_count: inner.as_ref().map(|i| i.len).unwrap_or(0),
            subject_keys: inner.as_ref().map(|i| i.by_subject.len()).unwrap_or(0),
            predicate_keys: inner.as_ref().map(|i| i.by_predicate.len()).unwrap_or(0),
            object_keys: inner.as_ref().map(|i| i.by_object.len()).unwrap_or(0),
        }
    }

    /// Current modification counter.
    pub(crate) fn version(&self) -> Result<u64> {
        Ok(self.read()?.version)
    }
}

impl<N: Term> Default for TripleStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for TripleStore<N> {
    /// Returns a handle to the same store, not a copy of its contents.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Term> StoreInner<N> {
    fn map(&self, position: Position) -> &BunchMap<N> {
        match position {
            Position::Subject => &self.by_subject,
            Position::Predicate => &self.by_predicate,
            Position::Object => &self.by_object,
        }
    }

    fn single_scan(&self, position: Position, key: u64) -> (Position, BunchChain<N>) {
        match self.map(position).get(key) {
            Some(bunch) => (position, BunchChain::single(bunch.snapshot())),
            None => (position, BunchChain::empty()),
        }
    }

    /// Plans a scan for any pattern. The concrete planner rejects the
    /// all-wildcard case; the fallback walks the index with the fewest keys.
    pub(crate) fn scan(&self, pattern: &TriplePattern<N>) -> (Position, BunchChain<N>) {
        match self.scan_concrete(pattern) {
            Ok(plan) => plan,
            Err(_) => self.scan_everything(),
        }
    }

    /// Plans a scan for a pattern with at least one concrete position.
    ///
    /// Picks the index per the dispatch table; for the two-sided cases the
    /// smaller of the applicable bunches wins, unless the primary bunch is
    /// small enough to scan outright.
    pub(crate) fn scan_concrete(
        &self,
        pattern: &TriplePattern<N>,
    ) -> Result<(Position, BunchChain<N>)> {
        match (&pattern.subject, &pattern.predicate, &pattern.object) {
            (None, None, None) => Err(Error::WildcardPlan),

            // s p o / s p * / s * * : the subject bunch serves the scan.
            (Some(s), Some(_), _) | (Some(s), None, None) => {
                Ok(self.single_scan(Position::Subject, s.indexing_hash()))
            }

            // s * o : subject or object bunch, whichever is smaller.
            (Some(s), None, Some(o)) => {
                let s_key = s.indexing_hash();
                let Some(s_bunch) = self.by_subject.get(s_key) else {
                    return Ok((Position::Subject, BunchChain::empty()));
                };
                if s_bunch.len() < DIRECT_SCAN_LIMIT {
                    return Ok((Position::Subject, BunchChain::single(s_bunch.snapshot())));
                }
                let Some(o_bunch) = self.by_object.get(o.indexing_hash()) else {
                    return Ok((Position::Object, BunchChain::empty()));
                };
                if o_bunch.len() < s_bunch.len() {
                    Ok((Position::Object, BunchChain::single(o_bunch.snapshot())))
                } else {
                    Ok((Position::Subject, BunchChain::single(s_bunch.snapshot())))
                }
            }

            // * p o : object or predicate bunch, whichever is smaller.
            (None, Some(p), Some(o)) => {
                let o_key = o.indexing_hash();
                let Some(o_bunch) = self.by_object.get(o_key) else {
                    return Ok((Position::Object, BunchChain::empty()));
                };
                if o_bunch.len() < DIRECT_SCAN_LIMIT {
                    return Ok((Position::Object, BunchChain::single(o_bunch.snapshot())));
                }
                let Some(p_bunch) = self.by_predicate.get(p.indexing_hash()) else {
                    return Ok((Position::Predicate, BunchChain::empty()));
                };
                if p_bunch.len() < o_bunch.len() {
                    Ok((Position::Predicate, BunchChain::single(p_bunch.snapshot())))
                } else {
                    Ok((Position::Object, BunchChain::single(o_bunch.snapshot())))
                }
            }

            (None, Some(p), None) => {
                Ok(self.single_scan(Position::Predicate, p.indexing_hash()))
            }
            (None, None, Some(o)) => Ok(self.single_scan(Position::Object, o.indexing_hash())),
        }
    }

    /// Full scan: walks every bunch of the index with the fewest keys.
    fn scan_everything(&self) -> (Position, BunchChain<N>) {
        let position = self.smallest_index();
        let bunches = self.map(position).bunches().map(|b| b.snapshot()).collect();
        (position, BunchChain::chained(bunches))
    }

    fn smallest_index(&self) -> Position {
        let s = self.by_subject.len();
        let p = self.by_predicate.len();
        let o = self.by_object.len();
        if s <= p && s <= o {
            Position::Subject
        } else if p <= o {
            Position::Predicate
        } else {
            Position::Object
        }
    }

    #[cfg(test)]
    fn subject_bunch(&self, term: &N) -> Option<&crate::bunch::TripleBunch<N>> {
        self.by_subject.get(term.indexing_hash())
    }
}
