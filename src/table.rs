//! RecencyTable: fixed-capacity hash table with O(1) most/least-recent access.

use crate::error::TableError;
use crate::hasher::{hash_key, DefaultState};
use crate::recency::{RecencyList, Walk};
use crate::reentrancy::DebugReentrancy;
use crate::slot_array::{Probe, Slot, SlotArray};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use log::{debug, trace};

pub struct RecencyTable<K, V, S = DefaultState> {
    hasher: S,
    slots: SlotArray<K, V>,
    recency: RecencyList,
    reentrancy: DebugReentrancy,
}

impl<K, V> RecencyTable<K, V>
where
    K: Eq + Hash,
{
    /// Create a table with `capacity` slots and a randomly seeded hasher.
    ///
    /// Fails with `InvalidArgument` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher(capacity, DefaultState::default())
    }
}

impl<K, V, S> RecencyTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidArgument);
        }
        debug!("recency table created with capacity {}", capacity);
        Ok(Self {
            hasher,
            slots: SlotArray::new(capacity),
            recency: RecencyList::new(),
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Insert `key -> value`, or overwrite the value of an existing key.
    ///
    /// Either way the entry becomes the most recent. A new key that finds
    /// no empty slot or tombstone in one full probe cycle is rejected with
    /// `Full` and the table is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TableError> {
        let _g = self.reentrancy.enter("insert");
        let hash = hash_key(&self.hasher, &key);
        match self.slots.probe(hash, &key) {
            Probe::Match(idx) => {
                if let Some(e) = self.slots.entry_mut(idx) {
                    e.value = value;
                }
                self.recency.move_to_front(&mut self.slots, idx);
                trace!("updated slot {} and moved it to front", idx);
                Ok(())
            }
            Probe::InsertionPoint(idx) => {
                if self.slots.is_tombstone(idx) {
                    trace!("reusing tombstone at slot {}", idx);
                }
                self.slots.claim(idx, hash, key, value);
                self.recency.push_front(&mut self.slots, idx);
                Ok(())
            }
            Probe::Full => {
                debug!(
                    "insert rejected: all {} slots hold live entries",
                    self.slots.capacity()
                );
                Err(TableError::Full)
            }
        }
    }

    /// Look up `key`. Reads never change recency.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let idx = self.find(key).ok_or(TableError::NotFound)?;
        self.slots
            .entry(idx)
            .map(|e| &e.value)
            .ok_or(TableError::NotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        self.find(key).is_some()
    }

    /// Remove `key`, leaving a tombstone in its slot. Returns the value.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let idx = self.find(key).ok_or(TableError::NotFound)?;
        self.recency.unlink(&mut self.slots, idx);
        let (_key, value) = self.slots.vacate(idx);
        Ok(value)
    }

    /// Most recently inserted or updated entry.
    pub fn get_last(&self) -> Result<(&K, &V), TableError> {
        let _g = self.reentrancy.enter("get_last");
        self.pair_at(self.recency.peek_head())
    }

    /// Least recently inserted or updated entry.
    pub fn get_first(&self) -> Result<(&K, &V), TableError> {
        let _g = self.reentrancy.enter("get_first");
        self.pair_at(self.recency.peek_tail())
    }

    /// Rebuild the slot array from the live entries, dropping every
    /// tombstone. Contents and recency order are preserved; slot positions
    /// may change. Runs in O(capacity) and returns the number of
    /// tombstones reclaimed.
    pub fn compact(&mut self) -> usize {
        let _g = self.reentrancy.enter("compact");
        let reclaimed = self.slots.tombstones();
        if reclaimed == 0 {
            return 0;
        }

        let order: Vec<usize> = self.recency.iter(&self.slots).collect();
        let mut old = self.slots.drain_slots();
        self.recency = RecencyList::new();

        // Least recent first, so each push_front restores the old order.
        for idx in order.into_iter().rev() {
            let Slot::Occupied(entry) = core::mem::replace(&mut old[idx], Slot::Empty) else {
                unreachable!("recency list pointed at vacant slot {idx}");
            };
            let (hash, key, value) = entry.into_parts();
            let Probe::InsertionPoint(dst) = self.slots.probe(hash, &key) else {
                unreachable!("replayed key collided during compaction");
            };
            self.slots.claim(dst, hash, key, value);
            self.recency.push_front(&mut self.slots, dst);
        }

        debug!(
            "compacted table: reclaimed {} tombstones, {} live entries",
            reclaimed,
            self.slots.occupied()
        );
        reclaimed
    }

    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = hash_key(&self.hasher, key);
        match self.slots.probe(hash, key) {
            Probe::Match(idx) => Some(idx),
            Probe::InsertionPoint(_) | Probe::Full => None,
        }
    }
}

impl<K, V, S> RecencyTable<K, V, S> {
    pub fn len(&self) -> usize {
        self.slots.occupied()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.occupied() == 0
    }
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
    pub fn tombstones(&self) -> usize {
        self.slots.tombstones()
    }

    /// Share of slots that are occupied or tombstoned. Probe length grows
    /// with this ratio; `compact` brings it back down to `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        (self.slots.occupied() + self.slots.tombstones()) as f64 / self.slots.capacity() as f64
    }

    /// Live entries in slot order. The order depends on hashing and says
    /// nothing about recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.slots().iter(),
            remaining: self.slots.occupied(),
        }
    }

    /// Live entries from most recent to least recent.
    pub fn recency_iter(&self) -> RecencyIter<'_, K, V> {
        RecencyIter {
            slots: &self.slots,
            walk: self.recency.iter(&self.slots),
            remaining: self.slots.occupied(),
        }
    }

    fn pair_at(&self, idx: Option<usize>) -> Result<(&K, &V), TableError> {
        let idx = idx.ok_or(TableError::Empty)?;
        self.slots
            .entry(idx)
            .map(|e| (&e.key, &e.value))
            .ok_or(TableError::Empty)
    }
}

impl<K, V, S> core::fmt::Debug for RecencyTable<K, V, S>
where
    K: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.recency_iter()).finish()
    }
}

/// Iterator over live entries in slot order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.it.by_ref() {
            if let Slot::Occupied(e) = slot {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over live entries from most to least recent.
pub struct RecencyIter<'a, K, V> {
    slots: &'a SlotArray<K, V>,
    walk: Walk<'a, SlotArray<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for RecencyIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.walk.next()?;
        let e = self.slots.entry(idx)?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RecencyIter<'_, K, V> {}

#[cfg(test)]
impl<K, V, S> RecencyTable<K, V, S>
where
    K: Eq + Hash + Clone + core::fmt::Debug,
    S: BuildHasher,
{
    /// Panics unless every structural invariant holds.
    pub(crate) fn assert_invariants(&self) {
        use crate::recency::Links;
        use std::collections::HashSet;

        let cap = self.slots.capacity();
        let live = self.slots.occupied();
        assert!(live + self.slots.tombstones() <= cap);

        // Counters match the slots themselves.
        let occupied: Vec<usize> = self.slots.occupied_entries().map(|(i, _)| i).collect();
        assert_eq!(occupied.len(), live);
        let tombs = (0..cap).filter(|&i| self.slots.is_tombstone(i)).count();
        assert_eq!(tombs, self.slots.tombstones());

        // Uniqueness of keys.
        let keys: HashSet<K> = self
            .slots
            .occupied_entries()
            .map(|(_, e)| e.key.clone())
            .collect();
        assert_eq!(keys.len(), live, "duplicate key in table");

        // Recency list covers exactly the occupied slots, both directions.
        let fwd: Vec<usize> = self.recency.iter(&self.slots).collect();
        assert_eq!(fwd.len(), live);
        let fwd_set: HashSet<usize> = fwd.iter().copied().collect();
        let occ_set: HashSet<usize> = occupied.iter().copied().collect();
        assert_eq!(fwd_set, occ_set);
        let mut back = Vec::new();
        let mut cur = self.recency.peek_tail();
        while let Some(i) = cur {
            back.push(i);
            cur = self.slots.prev(i);
        }
        back.reverse();
        assert_eq!(fwd, back);

        // Every key is reachable from its home slot by probing.
        for (idx, e) in self.slots.occupied_entries() {
            assert_eq!(e.hash, hash_key(&self.hasher, &e.key));
            assert_eq!(self.slots.probe(e.hash, &e.key), Probe::Match(idx), "{:?}", e.key);
        }
    }
}
