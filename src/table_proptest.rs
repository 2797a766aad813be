#![cfg(test)]

// Property tests for RecencyTable kept inside the crate so they can check
// structural invariants through crate-private accessors.

use crate::error::TableError;
use crate::hasher::FixedState;
use crate::table::RecencyTable;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i64),
    Get(usize),
    Remove(usize),
    Contains(String),
    GetFirst,
    GetLast,
    Compact,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=8, proptest::collection::vec("[a-z]{0,4}", 1..=12)).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => "[a-z]{0,4}".prop_map(OpI::Contains),
            1 => Just(OpI::GetFirst),
            1 => Just(OpI::GetLast),
            1 => Just(OpI::Compact),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

// Reference model: live entries ordered most recent first.
#[derive(Default)]
struct Model {
    entries: Vec<(String, i64)>,
}

impl Model {
    fn position(&self, k: &str) -> Option<usize> {
        self.entries.iter().position(|(kk, _)| kk == k)
    }
    fn get(&self, k: &str) -> Option<i64> {
        self.position(k).map(|i| self.entries[i].1)
    }
    fn touch(&mut self, k: String, v: i64) {
        if let Some(i) = self.position(&k) {
            self.entries.remove(i);
        }
        self.entries.insert(0, (k, v));
    }
    fn remove(&mut self, k: &str) -> Option<i64> {
        self.position(k).map(|i| self.entries.remove(i).1)
    }
}

fn run_scenario<S: BuildHasher>(
    mut sut: RecencyTable<String, i64, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let cap = sut.capacity();
    let mut model = Model::default();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let present = model.get(&k).is_some();
                match sut.insert(k.clone(), v) {
                    Ok(()) => {
                        prop_assert!(present || model.entries.len() < cap);
                        model.touch(k, v);
                    }
                    Err(TableError::Full) => {
                        prop_assert!(!present, "update must never report Full");
                        prop_assert_eq!(model.entries.len(), cap);
                    }
                    Err(e) => prop_assert!(false, "unexpected insert error {:?}", e),
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(v) => prop_assert_eq!(sut.get(k.as_str()), Ok(&v)),
                    None => prop_assert_eq!(sut.get(k.as_str()), Err(TableError::NotFound)),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                match model.remove(k) {
                    Some(v) => prop_assert_eq!(sut.remove(k.as_str()), Ok(v)),
                    None => prop_assert_eq!(sut.remove(k.as_str()), Err(TableError::NotFound)),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.get(&s).is_some());
            }
            OpI::GetFirst => match model.entries.last() {
                Some((k, v)) => prop_assert_eq!(sut.get_first(), Ok((k, v))),
                None => prop_assert_eq!(sut.get_first(), Err(TableError::Empty)),
            },
            OpI::GetLast => match model.entries.first() {
                Some((k, v)) => prop_assert_eq!(sut.get_last(), Ok((k, v))),
                None => prop_assert_eq!(sut.get_last(), Err(TableError::Empty)),
            },
            OpI::Compact => {
                let tombs = sut.tombstones();
                prop_assert_eq!(sut.compact(), tombs);
                prop_assert_eq!(sut.tombstones(), 0);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.entries.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Post-conditions after each op
        // 1) Recency order matches the model exactly
        let order: Vec<(String, i64)> = sut.recency_iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&order, &model.entries);
        // 2) Size parity
        prop_assert_eq!(sut.len(), model.entries.len());
        prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
        prop_assert!(sut.len() + sut.tombstones() <= cap);
        // 3) Structural invariants: uniqueness, list/slot parity, probe reachability
        sut.assert_invariants();
    }
    Ok(())
}

// Property: state-machine equivalence against a recency-ordered model.
// Invariants exercised across random operation sequences:
// - Updates never duplicate a key and always move it to the front.
// - `Full` is reported exactly when a new key meets a table of live entries.
// - Removal leaves every other key reachable; tombstones get reused.
// - get_first/get_last track the model's ends; `Empty` when nothing is live.
// - Compaction preserves contents and order while clearing tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario(), seed in any::<u64>()) {
        let sut = RecencyTable::with_hasher(cap, FixedState::new(seed)).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher so every key shares one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions, where every probe
// walks the single chain and tombstone handling decides correctness.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((cap, pool, ops) in arb_scenario()) {
        let sut = RecencyTable::with_hasher(cap, ConstBuildHasher).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}
