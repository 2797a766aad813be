//! Hashing capability injected into `RecencyTable`.
//!
//! The table only ever asks its hasher for one thing: a `u64` for a key,
//! via `BuildHasher::hash_one`. The value is reduced modulo the table's
//! capacity to pick the first slot of the probe sequence.
//!
//! `DefaultState` is randomly seeded per process, so slot layout differs
//! across runs while observable contents do not. Use `FixedState` when the
//! internal layout has to be reproducible (snapshot tests, debugging).

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

/// Default hasher for `RecencyTable`: hashbrown's randomly seeded builder.
pub type DefaultState = hashbrown::hash_map::DefaultHashBuilder;

/// Deterministic hasher builder. Two tables built with the same seed and
/// fed the same operations end up with identical slot layouts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FixedState {
    seed: u64,
}

impl FixedState {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BuildHasher for FixedState {
    type Hasher = DefaultHasher;

    fn build_hasher(&self) -> DefaultHasher {
        // DefaultHasher::new() uses fixed keys; mixing the seed in first
        // keeps different seeds on different layouts.
        let mut h = DefaultHasher::new();
        h.write_u64(self.seed);
        h
    }
}

/// Initial probe position for `hash` in a table of `capacity` slots.
#[inline]
pub(crate) fn home_slot(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}

/// Hash `key` with `hasher`. Kept as a free function so the slot array and
/// compaction never need to know which builder is in use.
#[inline]
pub(crate) fn hash_key<S, Q>(hasher: &S, key: &Q) -> u64
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    hasher.hash_one(key)
}
