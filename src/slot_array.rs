//! SlotArray: fixed-length open-addressing storage with linear probing.
//!
//! Storage is a boxed slice sized once at construction; there is no method
//! that grows it. Each slot is `Empty`, `Tombstone`, or `Occupied`. Only
//! occupied slots carry a key, value, stored hash and recency links, so a
//! vacant slot cannot be read as if it held data.
//!
//! Counters for occupied slots and tombstones live here and are kept in step
//! by `claim`/`vacate`; `occupied + tombstones <= capacity` always holds.

use crate::hasher::home_slot;
use crate::recency::Links;
use core::borrow::Borrow;

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    /// Consume the entry, dropping its links: `(hash, key, value)`.
    pub(crate) fn into_parts(self) -> (u64, K, V) {
        (self.hash, self.key, self.value)
    }
}

#[derive(Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(Entry<K, V>),
}

impl<K, V> Slot<K, V> {
    #[cfg(test)]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Outcome of scanning the probe sequence for a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// An occupied slot holds the key.
    Match(usize),
    /// Key absent; a new entry should claim this slot (first tombstone
    /// seen, else the terminating empty slot).
    InsertionPoint(usize),
    /// Key absent and every slot is occupied by a live key.
    Full,
}

pub(crate) struct SlotArray<K, V> {
    slots: Box<[Slot<K, V>]>,
    occupied: usize,
    tombstones: usize,
}

impl<K, V> SlotArray<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let slots: Box<[Slot<K, V>]> = (0..capacity).map(|_| Slot::Empty).collect();
        Self {
            slots,
            occupied: 0,
            tombstones: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Scan at most `capacity` slots starting at the key's home slot.
    ///
    /// Tombstones never stop the scan: the key may sit further along the
    /// chain it was originally inserted into. Only an empty slot proves
    /// absence early.
    pub(crate) fn probe<Q>(&self, hash: u64, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let cap = self.capacity();
        let mut idx = home_slot(hash, cap);
        let mut first_tombstone = None;
        for _ in 0..cap {
            match &self.slots[idx] {
                Slot::Empty => {
                    return Probe::InsertionPoint(first_tombstone.unwrap_or(idx));
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(idx);
                    }
                }
                Slot::Occupied(e) => {
                    if e.hash == hash && e.key.borrow() == key {
                        return Probe::Match(idx);
                    }
                }
            }
            idx += 1;
            if idx == cap {
                idx = 0;
            }
        }
        first_tombstone.map_or(Probe::Full, Probe::InsertionPoint)
    }

    /// Occupy `idx` with a fresh, unlinked entry. The caller links it into
    /// the recency list.
    pub(crate) fn claim(&mut self, idx: usize, hash: u64, key: K, value: V) {
        let entry = Entry {
            key,
            value,
            hash,
            prev: None,
            next: None,
        };
        match core::mem::replace(&mut self.slots[idx], Slot::Occupied(entry)) {
            Slot::Empty => {}
            Slot::Tombstone => self.tombstones -= 1,
            Slot::Occupied(_) => panic!("claim on occupied slot {idx}"),
        }
        self.occupied += 1;
        assert!(
            self.occupied + self.tombstones <= self.capacity(),
            "slot accounting exceeds capacity"
        );
    }

    /// Turn an occupied slot into a tombstone and hand back its contents.
    /// The caller must have unlinked it from the recency list already.
    pub(crate) fn vacate(&mut self, idx: usize) -> (K, V) {
        match core::mem::replace(&mut self.slots[idx], Slot::Tombstone) {
            Slot::Occupied(e) => {
                debug_assert!(e.prev.is_none() && e.next.is_none());
                self.occupied -= 1;
                self.tombstones += 1;
                (e.key, e.value)
            }
            other => {
                // Put the vacant slot back before failing.
                self.slots[idx] = other;
                panic!("vacate on unoccupied slot {idx}")
            }
        }
    }

    #[inline]
    pub(crate) fn is_tombstone(&self, idx: usize) -> bool {
        matches!(self.slots[idx], Slot::Tombstone)
    }

    #[inline]
    pub(crate) fn entry(&self, idx: usize) -> Option<&Entry<K, V>> {
        match &self.slots[idx] {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, idx: usize) -> Option<&mut Entry<K, V>> {
        match &mut self.slots[idx] {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    fn linked(&self, idx: usize) -> &Entry<K, V> {
        match &self.slots[idx] {
            Slot::Occupied(e) => e,
            _ => unreachable!("recency link read on vacant slot {idx}"),
        }
    }

    fn linked_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        match &mut self.slots[idx] {
            Slot::Occupied(e) => e,
            _ => unreachable!("recency link write on vacant slot {idx}"),
        }
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    /// Occupied entries in slot order, with their indices.
    #[cfg(test)]
    pub(crate) fn occupied_entries(&self) -> impl Iterator<Item = (usize, &Entry<K, V>)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| match s {
            Slot::Occupied(e) => Some((i, e)),
            _ => None,
        })
    }

    /// Move every slot out, leaving this array all-empty with zeroed
    /// counters. Used by compaction to replay live entries.
    pub(crate) fn drain_slots(&mut self) -> Box<[Slot<K, V>]> {
        let fresh: Box<[Slot<K, V>]> = (0..self.capacity()).map(|_| Slot::Empty).collect();
        self.occupied = 0;
        self.tombstones = 0;
        core::mem::replace(&mut self.slots, fresh)
    }
}

impl<K, V> Links for SlotArray<K, V> {
    #[inline]
    fn prev(&self, idx: usize) -> Option<usize> {
        self.linked(idx).prev
    }

    #[inline]
    fn next(&self, idx: usize) -> Option<usize> {
        self.linked(idx).next
    }

    #[inline]
    fn set_prev(&mut self, idx: usize, to: Option<usize>) {
        self.linked_mut(idx).prev = to;
    }

    #[inline]
    fn set_next(&mut self, idx: usize, to: Option<usize>) {
        self.linked_mut(idx).next = to;
    }
}

impl<K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for SlotArray<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotArray")
            .field("capacity", &self.capacity())
            .field("occupied", &self.occupied)
            .field("tombstones", &self.tombstones)
            .finish()
    }
}
