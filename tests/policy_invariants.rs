// ==============================================
// MODEL-BASED PROPERTY TESTS
// ==============================================
//
// Each cache is driven with random operation sequences alongside a naive
// model that finds its victim by linear scan.

use eviction_cache::{Cache, LfuCache, LruCache};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set(i64, i64),
    Get(i64),
    Contains(i64),
    Remove(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0i64..20, any::<i64>()).prop_map(|(k, v)| Op::Set(k, v)),
        4 => (0i64..20).prop_map(Op::Get),
        1 => (0i64..20).prop_map(Op::Contains),
        1 => (0i64..20).prop_map(Op::Remove),
    ]
}

// Entries ordered from least to most recently used.
#[derive(Default)]
struct LruModel {
    entries: Vec<(i64, i64)>,
}

impl LruModel {
    fn touch(&mut self, key: i64) -> Option<i64> {
        let pos = self.entries.iter().position(|&(k, _)| k == key)?;
        let entry = self.entries.remove(pos);
        self.entries.push(entry);
        Some(entry.1)
    }

    fn set(&mut self, capacity: usize, key: i64, value: i64) {
        if self.touch(key).is_some() {
            if let Some(last) = self.entries.last_mut() {
                last.1 = value;
            }
            return;
        }
        if self.entries.len() == capacity {
            self.entries.remove(0);
        }
        self.entries.push((key, value));
    }
}

struct LfuModelEntry {
    key: i64,
    value: i64,
    usage: u64,
    seq: u64,
}

#[derive(Default)]
struct LfuModel {
    entries: Vec<LfuModelEntry>,
    seq: u64,
}

impl LfuModel {
    fn touch(&mut self, key: i64) -> Option<&mut LfuModelEntry> {
        let seq = self.seq;
        let entry = self.entries.iter_mut().find(|e| e.key == key)?;
        self.seq += 1;
        entry.usage += 1;
        entry.seq = seq;
        Some(entry)
    }

    fn victim(&self) -> Option<i64> {
        self.entries
            .iter()
            .min_by_key(|e| (e.usage, e.seq))
            .map(|e| e.key)
    }

    fn set(&mut self, capacity: usize, key: i64, value: i64) {
        if let Some(entry) = self.touch(key) {
            entry.value = value;
            return;
        }
        if self.entries.len() == capacity {
            if let Some(victim) = self.victim() {
                self.entries.retain(|e| e.key != victim);
            }
        }
        self.entries.push(LfuModelEntry {
            key,
            value,
            usage: 0,
            seq: self.seq,
        });
        self.seq += 1;
    }
}

proptest! {
    /// LRU matches the model after every operation, and its structures agree.
    #[test]
    fn prop_lru_matches_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache = LruCache::new(capacity).unwrap();
        let mut model = LruModel::default();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    cache.set(k, v);
                    model.set(capacity, k, v);
                }
                Op::Get(k) => {
                    prop_assert_eq!(cache.get(k).ok(), model.touch(k));
                }
                Op::Contains(k) => {
                    let before = cache.keys_by_recency();
                    prop_assert_eq!(cache.contains(k), model.entries.iter().any(|e| e.0 == k));
                    prop_assert_eq!(cache.keys_by_recency(), before);
                }
                Op::Remove(k) => {
                    let expected = model
                        .entries
                        .iter()
                        .position(|e| e.0 == k)
                        .map(|pos| model.entries.remove(pos).1);
                    prop_assert_eq!(cache.remove(k), expected);
                }
            }
            let mut expected: Vec<i64> = model.entries.iter().map(|e| e.0).collect();
            expected.reverse();
            prop_assert_eq!(cache.keys_by_recency(), expected);
            prop_assert!(cache.len() <= cache.capacity());
            prop_assert!(cache.check_invariants().is_ok());
        }
    }

    /// LFU matches the model after every operation, and its structures agree.
    #[test]
    fn prop_lfu_matches_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache = LfuCache::new(capacity).unwrap();
        let mut model = LfuModel::default();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    cache.set(k, v);
                    model.set(capacity, k, v);
                }
                Op::Get(k) => {
                    prop_assert_eq!(cache.get(k).ok(), model.touch(k).map(|e| e.value));
                }
                Op::Contains(k) => {
                    let before = cache.keys_by_priority();
                    prop_assert_eq!(cache.contains(k), model.entries.iter().any(|e| e.key == k));
                    prop_assert_eq!(cache.keys_by_priority(), before);
                }
                Op::Remove(k) => {
                    let expected = model
                        .entries
                        .iter()
                        .position(|e| e.key == k)
                        .map(|pos| model.entries.remove(pos).value);
                    prop_assert_eq!(cache.remove(k), expected);
                }
            }
            prop_assert_eq!(cache.victim(), model.victim());
            prop_assert_eq!(cache.len(), model.entries.len());
            prop_assert!(cache.len() <= cache.capacity());
            prop_assert!(cache.check_invariants().is_ok());
        }
    }

    /// Repeated gets of one key leave the relative order of the others alone.
    #[test]
    fn prop_lru_repeated_get_keeps_others_in_order(
        keys in prop::collection::vec(0i64..50, 1..30),
        pick in any::<prop::sample::Index>(),
        repeats in 1usize..5
    ) {
        let mut cache = LruCache::new(16).unwrap();
        for &k in &keys {
            cache.set(k, k);
        }
        let resident = cache.keys_by_recency();
        let target = resident[pick.index(resident.len())];
        let others: Vec<i64> = resident.iter().copied().filter(|&k| k != target).collect();

        for _ in 0..repeats {
            cache.get(target).unwrap();
        }
        let after = cache.keys_by_recency();
        prop_assert_eq!(after[0], target);
        prop_assert_eq!(&after[1..], &others[..]);
    }

    /// set followed by get returns the value just written.
    #[test]
    fn prop_set_then_get_round_trips(
        capacity in 1usize..8,
        prefix in prop::collection::vec((any::<i64>(), any::<i64>()), 0..20),
        key in any::<i64>(),
        value in any::<i64>()
    ) {
        let mut lru = LruCache::new(capacity).unwrap();
        let mut lfu = LfuCache::new(capacity).unwrap();
        for &(k, v) in &prefix {
            lru.set(k, v);
            lfu.set(k, v);
        }
        lru.set(key, value);
        lfu.set(key, value);
        prop_assert_eq!(lru.get(key), Ok(value));
        prop_assert_eq!(lfu.get(key), Ok(value));
    }
}
