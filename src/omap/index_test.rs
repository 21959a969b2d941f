use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;
use crate::omap::OSet;

// insertion-ordered reference model.
struct Model {
    entries: Vec<(u64, u64)>,
}

impl Model {
    fn new() -> Model {
        Model { entries: vec![] }
    }

    fn set(&mut self, key: u64, value: u64) -> Option<u64> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        let off = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(off).1)
    }

    fn get(&self, key: u64) -> Option<&u64> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

#[test]
fn test_omap() {
    let seed: u128 = random();
    // let seed: u128 = 25511066468701481121522498457372047183;
    println!("test_omap seed:{}", seed);
    let mut seed32 = [0u8; 32];
    let seed16 = seed.to_le_bytes();
    seed32[..16].copy_from_slice(&seed16);
    seed32[16..].copy_from_slice(&seed16);
    let mut rng = SmallRng::from_seed(seed32);

    let token = Token::new();
    let mut omap: OMap<u64, u64> = OMap::new();
    let mut model = Model::new();

    let key_space = 2000;
    for i in 0..20_000 {
        let key = rng.gen::<u64>() % key_space;
        match rng.gen::<usize>() % 3 {
            0 | 1 => {
                let value: u64 = rng.gen::<u64>() % 1000;
                let (m, old) = omap.set(key, value, Some(&token)).unwrap();
                assert_eq!(old, model.set(key, value));
                omap = m;
            }
            _ => {
                let (m, old) = omap.remove(&key, Some(&token)).unwrap();
                assert_eq!(old, model.remove(key));
                omap = m;
            }
        }
        assert_eq!(omap.get(&key), model.get(key));
        if i % 2500 == 0 {
            omap.validate().unwrap();
        }
    }

    omap.validate().unwrap();
    assert_eq!(omap.len(), model.entries.len());

    // iteration yields the model's insertion order exactly.
    let pairs: Vec<(u64, u64)> = omap.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, model.entries);
}

#[test]
fn test_omap_insertion_order() {
    let token = Token::new();
    let mut omap: OMap<String, u64> = OMap::new();
    for i in 0..100_u64 {
        omap = omap.set(format!("key-{}", i), i, Some(&token)).unwrap().0;
    }

    // updating an existing key must not change its position.
    omap = omap.set("key-10".to_string(), 1010, None).unwrap().0;
    let keys: Vec<&String> = omap.iter().map(|(k, _)| k).collect();
    assert_eq!(keys[10], "key-10");
    assert_eq!(omap.get("key-10"), Some(&1010));

    // removing and re-inserting moves the key to the end.
    omap = omap.remove("key-10", None).unwrap().0;
    omap = omap.set("key-10".to_string(), 2020, None).unwrap().0;
    let keys: Vec<&String> = omap.iter().map(|(k, _)| k).collect();
    assert_eq!(keys[99], "key-10");

    omap.validate().unwrap();
}

#[test]
fn test_omap_identity() {
    let token = Token::new();
    let mut omap: OMap<u64, u64> = OMap::new();
    for key in 0..100 {
        omap = omap.set(key, key, Some(&token)).unwrap().0;
    }

    let (same, old) = omap.set(50, 50, None).unwrap();
    assert!(same.same_as(&omap));
    assert_eq!(old, Some(50));

    let (same, old) = omap.remove(&1000, None).unwrap();
    assert!(same.same_as(&omap));
    assert_eq!(old, None);
}

#[test]
fn test_omap_compaction() {
    let token = Token::new();
    let mut omap: OMap<u64, u64> = OMap::new();
    for key in 0..1000 {
        omap = omap.set(key, key, Some(&token)).unwrap().0;
    }

    // removing most entries crosses holes > size/2 and compacts; the
    // sidecar must stay observationally identical throughout.
    for key in 0..900 {
        omap = omap.remove(&key, Some(&token)).unwrap().0;
        omap.validate().unwrap();
    }

    assert_eq!(omap.len(), 100);
    let pairs: Vec<(u64, u64)> = omap.iter().map(|(k, v)| (*k, *v)).collect();
    let expect: Vec<(u64, u64)> = (900..1000).map(|k| (k, k)).collect();
    assert_eq!(pairs, expect);
    for key in 900..1000 {
        assert_eq!(omap.get(&key), Some(&key));
    }

    // small sidecars are never compacted, tombstones linger harmlessly.
    let mut small: OMap<u64, u64> = OMap::new();
    for key in 0..20 {
        small = small.set(key, key, None).unwrap().0;
    }
    for key in 0..19 {
        small = small.remove(&key, None).unwrap().0;
    }
    small.validate().unwrap();
    assert_eq!(small.len(), 1);
    assert_eq!(small.iter().count(), 1);
}

#[test]
fn test_omap_persistent() {
    let token = Token::new();
    let mut omap: OMap<u64, u64> = OMap::new();
    for key in 0..500 {
        omap = omap.set(key, key, Some(&token)).unwrap().0;
    }

    let (grown, _) = omap.set(999, 999, None).unwrap();
    let (shrunk, _) = omap.remove(&250, None).unwrap();

    assert_eq!(omap.len(), 500);
    assert_eq!(grown.len(), 501);
    assert_eq!(shrunk.len(), 499);
    assert_eq!(omap.get(&250), Some(&250));
    assert_eq!(shrunk.get(&250), None);

    omap.validate().unwrap();
    grown.validate().unwrap();
    shrunk.validate().unwrap();
}

#[test]
fn test_oset() {
    let seed: u128 = random();
    println!("test_oset seed:{}", seed);
    let mut seed32 = [0u8; 32];
    let seed16 = seed.to_le_bytes();
    seed32[..16].copy_from_slice(&seed16);
    seed32[16..].copy_from_slice(&seed16);
    let mut rng = SmallRng::from_seed(seed32);

    let token = Token::new();
    let mut oset: OSet<u64> = OSet::new();
    let mut model: Vec<u64> = vec![];

    for _ in 0..10_000 {
        let key = rng.gen::<u64>() % 1000;
        if rng.gen::<bool>() {
            let (s, added) = oset.insert(key, Some(&token)).unwrap();
            assert_eq!(added, !model.contains(&key));
            if added {
                model.push(key);
            }
            oset = s;
        } else {
            let (s, removed) = oset.remove(&key, Some(&token)).unwrap();
            assert_eq!(removed, model.contains(&key));
            model.retain(|k| *k != key);
            oset = s;
        }
    }

    oset.validate().unwrap();
    assert_eq!(oset.len(), model.len());
    let elements: Vec<u64> = oset.iter().cloned().collect();
    assert_eq!(elements, model);

    // identity short-circuits.
    if let Some(key) = model.first() {
        let (same, added) = oset.insert(*key, None).unwrap();
        assert!(same.same_as(&oset) && !added);
    }
    let (same, removed) = oset.remove(&100_000, None).unwrap();
    assert!(same.same_as(&oset) && !removed);
}
