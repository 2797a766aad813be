//! recency-table: a fixed-capacity open-addressing hash table that also
//! knows, in O(1), which entry was touched most and least recently.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep three coupled invariants (slot occupancy, probe-chain
//!   continuity across deletions, a total recency order over live entries)
//!   true under insert/update/remove, each in O(1) expected time.
//! - Layers:
//!   - `hasher`: the injected `BuildHasher`; `DefaultState` is randomly
//!     seeded, `FixedState` is reproducible.
//!   - `SlotArray<K, V>`: boxed slice of `Empty`/`Tombstone`/`Occupied`
//!     slots with linear probing; owns the occupied/tombstone counters.
//!   - `RecencyList`: intrusive doubly-linked list threaded through the
//!     occupied slots' prev/next indices.
//!   - `RecencyTable<K, V, S>`: public API composing the three.
//!
//! Constraints
//! - Capacity is fixed at construction. Storage has no growth method and
//!   there is no rehash; a new key that finds no free slot fails with
//!   `TableError::Full`.
//! - No per-entry heap allocation: recency links are slot indices into the
//!   same array, so a slot index is the node handle.
//! - Single-threaded: mutation takes `&mut self`; wrap the whole table in a
//!   lock to share it. A debug-only reentrancy guard catches hashers or
//!   `Eq` impls that call back into the table mid-operation.
//!
//! Probing and deletion
//! - Probing starts at `hash mod capacity` and steps by one with
//!   wraparound, for at most `capacity` slots. An empty slot ends the scan;
//!   a tombstone does not, because the key may live further along.
//! - New keys claim the first tombstone seen, else the terminating empty
//!   slot. Slots never become empty again after first use; probe chains
//!   only grow as tombstones accumulate, until `compact` rebuilds the array.
//!
//! Recency rules
//! - Insert and update move the entry to the head (most recent).
//! - `get`/`contains_key` never reorder.
//! - `remove` unlinks the entry; the rest keep their relative order.
//!
//! Hasher invariants
//! - Each entry stores its `u64` hash. Compaction replays entries using the
//!   stored hash and never calls the hasher.
//! - Slot layout depends on the hasher's seed. Observable contents and
//!   recency order do not.
//!
//! Notes and non-goals
//! - No resizing, persistence, or ordering by key or value.
//! - No cryptographic guarantees from either hasher.

mod error;
pub mod hasher;
mod recency;
mod reentrancy;
mod slot_array;
mod table;
mod table_proptest;
pub mod word_count;

// Public surface
pub use error::TableError;
pub use hasher::{DefaultState, FixedState};
pub use table::{Iter, RecencyIter, RecencyTable};
pub use word_count::{build_word_counts, count_words};
