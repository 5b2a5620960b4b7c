//! Open-addressed hash set over triples, keyed on the whole-triple identity
//! hash.
//!
//! Power-of-two capacity, linear probing, `None` slot terminates a probe.
//! Deletion rearranges displaced neighbors back toward their home slot, so
//! no tombstones are ever needed and probes stay short. Capacity is
//! grow-only.

use crate::node::Node;
use crate::term::Term;
use crate::triple::Triple;
use std::sync::Arc;

/// Smallest capacity a table is created with.
pub(crate) const INITIAL_TABLE_CAPACITY: usize = 64;

/// Folds a 64-bit hash before masking to the table capacity.
pub(crate) fn fold(hash: u64) -> usize {
    (hash ^ (hash >> 16)) as usize
}

/// The hashed form of a bunch: a linear-probed set of shared triples.
#[derive(Debug)]
pub struct TripleTable<N = Node> {
    slots: Vec<Option<Arc<Triple<N>>>>,
    len: usize,
}

impl<N: Term> TripleTable<N> {
    /// Creates a table sized to hold `n` triples below the load limit.
    pub fn with_capacity_for(n: usize) -> Self {
        let capacity = n
            .saturating_mul(2)
            .next_power_of_two()
            .max(INITIAL_TABLE_CAPACITY);
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            len: 0,
        }
    }

    /// Number of triples held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    fn home(&self, hash: u64) -> usize {
        fold(hash) & self.mask()
    }

    /// Inserts if absent; returns whether the triple was inserted.
    pub fn try_insert(&mut self, triple: Arc<Triple<N>>) -> bool {
        self.reserve_one();
        let mask = self.mask();
        let mut i = self.home(triple.triple_hash());
        loop {
            match &self.slots[i] {
                Some(existing) => {
                    if **existing == *triple {
                        return false;
                    }
                    i = (i + 1) & mask;
                }
                None => {
                    self.slots[i] = Some(triple);
                    self.len += 1;
                    return true;
                }
            }
        }
    }

    /// Inserts assuming the triple is absent; the caller guarantees
    /// uniqueness.
    pub fn insert_unchecked(&mut self, triple: Arc<Triple<N>>) {
        self.reserve_one();
        self.place(triple);
    }

    /// Probes to the first free slot without equality checks.
    fn place(&mut self, triple: Arc<Triple<N>>) {
        let mask = self.mask();
        let mut i = self.home(triple.triple_hash());
        while self.slots[i].is_some() {
            i = (i + 1) & mask;
        }
        self.slots[i] = Some(triple);
        self.len += 1;
    }

    /// Returns `true` if an equal triple is present.
    pub fn contains(&self, triple: &Triple<N>) -> bool {
        self.probe_any(triple.triple_hash(), |t| t == triple)
    }

    /// Probes the chain starting at `hash` and tests each occupant.
    ///
    /// A `None` slot terminates the probe, so this only visits the collision
    /// chain, not the whole table.
    pub fn probe_any<F>(&self, hash: u64, pred: F) -> bool
    where
        F: Fn(&Triple<N>) -> bool,
    {
        let mask = self.mask();
        let mut i = self.home(hash);
        while let Some(t) = &self.slots[i] {
            if pred(t) {
                return true;
            }
            i = (i + 1) & mask;
        }
        false
    }

    /// Removes if present; returns whether a triple was removed.
    pub fn try_remove(&mut self, triple: &Triple<N>) -> bool {
        let mask = self.mask();
        let mut i = self.home(triple.triple_hash());
        loop {
            match &self.slots[i] {
                Some(existing) => {
                    if **existing == *triple {
                        self.remove_at(i);
                        return true;
                    }
                    i = (i + 1) & mask;
                }
                None => return false,
            }
        }
    }

    /// Clears slot `i`, then pulls displaced neighbors back toward their
    /// home slot so that `None` keeps terminating every probe chain.
    fn remove_at(&mut self, i: usize) {
        let mask = self.mask();
        self.slots[i] = None;
        self.len -= 1;

        let mut gap = i;
        let mut j = (gap + 1) & mask;
        while let Some(t) = &self.slots[j] {
            let home = self.home(t.triple_hash());
            let displacement = j.wrapping_sub(home) & mask;
            let gap_distance = j.wrapping_sub(gap) & mask;
            if displacement >= gap_distance {
                self.slots[gap] = self.slots[j].take();
                gap = j;
            }
            j = (j + 1) & mask;
        }
    }

    fn reserve_one(&mut self) {
        if (self.len + 1) * 2 > self.slots.len() {
            self.grow();
        }
    }

    /// Doubles capacity and re-places every triple.
    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        log::trace!("growing triple table to {} slots", new_capacity);
        let old = std::mem::replace(
            &mut self.slots,
            std::iter::repeat_with(|| None).take(new_capacity).collect(),
        );
        self.len = 0;
        for triple in old.into_iter().flatten() {
            self.place(triple);
        }
    }

    /// Borrowing iteration over the occupied slots. No order guarantee.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Triple<N>>> {
        self.slots.iter().flatten()
    }

    /// Snapshot of the current contents, detached from the live table.
    pub fn snapshot(&self) -> Vec<Arc<Triple<N>>> {
        self.slots.iter().flatten().cloned().collect()
    }
}
