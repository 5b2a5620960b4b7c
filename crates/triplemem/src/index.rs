//! The per-position index: an open-addressed map from indexing hash to
//! bunch.
//!
//! The store holds three instances (by subject, by predicate, by object).
//! Keys are raw 64-bit indexing hashes; because distinct terms may collide on
//! a key, a bunch can hold triples for more than one term and the residual
//! match filter resolves the actual term during scans.
//!
//! Same probing discipline as the hashed bunch: power-of-two capacity,
//! linear probing, `None` terminates a probe, deletion rearranges displaced
//! neighbors, growth doubles and never shrinks outside [`clear`](BunchMap::clear).

use crate::bunch::TripleBunch;
use crate::hashed::fold;
use crate::node::Node;
use crate::term::Term;

/// Smallest capacity a map is created with, and the capacity `clear` resets
/// to.
pub(crate) const MIN_MAP_CAPACITY: usize = 16;

/// Which triple position an index serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// The by-subject index.
    Subject,
    /// The by-predicate index.
    Predicate,
    /// The by-object index.
    Object,
}

/// A bunch-valued map keyed on a position's indexing hash.
#[derive(Debug)]
pub struct BunchMap<N = Node> {
    slots: Vec<Option<Slot<N>>>,
    len: usize,
}

#[derive(Debug)]
struct Slot<N> {
    key: u64,
    bunch: TripleBunch<N>,
}

enum Probe {
    Found(usize),
    Free(usize),
}

impl<N: Term> BunchMap<N> {
    /// Creates an empty map at minimum capacity.
    pub fn new() -> Self {
        Self {
            slots: std::iter::repeat_with(|| None)
                .take(MIN_MAP_CAPACITY)
                .collect(),
            len: 0,
        }
    }

    /// Number of keys (bunches) held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no bunches.
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

    fn probe(&self, key: u64) -> Probe {
        let mask = self.mask();
        let mut i = fold(key) & mask;
        loop {
            match &self.slots[i] {
                Some(slot) if slot.key == key => return Probe::Found(i),
                Some(_) => i = (i + 1) & mask,
                None => return Probe::Free(i),
            }
        }
    }

    /// The bunch for `key`, if present.
    pub fn get(&self, key: u64) -> Option<&TripleBunch<N>> {
        match self.probe(key) {
            Probe::Found(i) => self.slots[i].as_ref().map(|s| &s.bunch),
            Probe::Free(_) => None,
        }
    }

    /// Mutable access to the bunch for `key`, if present.
    pub fn get_mut(&mut self, key: u64) -> Option<&mut TripleBunch<N>> {
        match self.probe(key) {
            Probe::Found(i) => self.slots[i].as_mut().map(|s| &mut s.bunch),
            Probe::Free(_) => None,
        }
    }

    /// The bunch for `key`, installing an empty one if absent.
    pub fn get_or_insert(&mut self, key: u64) -> &mut TripleBunch<N> {
        if (self.len + 1) * 2 > self.slots.len() {
            self.grow();
        }
        let i = match self.probe(key) {
            Probe::Found(i) => i,
            Probe::Free(i) => {
                self.slots[i] = Some(Slot {
                    key,
                    bunch: TripleBunch::new(),
                });
                self.len += 1;
                i
            }
        };
        match &mut self.slots[i] {
            Some(slot) => &mut slot.bunch,
            None => unreachable!("slot just probed or filled"),
        }
    }

    /// Removes and returns the bunch for `key`.
    ///
    /// The caller invokes this exactly when a bunch transitions to empty, so
    /// no empty bunch ever stays mapped.
    pub fn remove(&mut self, key: u64) -> Option<TripleBunch<N>> {
        match self.probe(key) {
            Probe::Found(i) => {
                let slot = self.slots[i].take();
                self.len -= 1;
                self.rearrange_from(i);
                slot.map(|s| s.bunch)
            }
            Probe::Free(_) => None,
        }
    }

    /// Pulls displaced neighbors back toward their home slot after the slot
    /// at `i` was vacated.
    fn rearrange_from(&mut self, i: usize) {
        let mask = self.mask();
        let mut gap = i;
        let mut j = (gap + 1) & mask;
        while let Some(slot) = &self.slots[j] {
            let home = fold(slot.key) & mask;
            let displacement = j.wrapping_sub(home) & mask;
            let gap_distance = j.wrapping_sub(gap) & mask;
            if displacement >= gap_distance {
                self.slots[gap] = self.slots[j].take();
                gap = j;
            }
            j = (j + 1) & mask;
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        log::trace!("growing bunch map to {} slots", new_capacity);
        let old = std::mem::replace(
            &mut self.slots,
            std::iter::repeat_with(|| None).take(new_capacity).collect(),
        );
        let mask = self.mask();
        for slot in old.into_iter().flatten() {
            let mut i = fold(slot.key) & mask;
            while self.slots[i].is_some() {
                i = (i + 1) & mask;
            }
            self.slots[i] = Some(slot);
        }
    }

    /// Iterates over the bunches. No order guarantee.
    pub fn bunches(&self) -> impl Iterator<Item = &TripleBunch<N>> {
        self.slots.iter().flatten().map(|s| &s.bunch)
    }

    /// Total triples across all bunches. O(keys).
    pub fn flattened_len(&self) -> usize {
        self.bunches().map(|b| b.len()).sum()
    }

    /// Drops every bunch and resets to minimum capacity.
    pub fn clear(&mut self) {
        self.slots = std::iter::repeat_with(|| None)
            .take(MIN_MAP_CAPACITY)
            .collect();
        self.len = 0;
    }
}

impl<N: Term> Default for BunchMap<N> {
    fn default() -> Self {
        Self::new()
    }
}
