use std::{borrow::Borrow, convert::TryFrom, iter::FromIterator};

use crate::{
    hash::TrieHash,
    token::Token,
    trie::Trie,
    vector::Vector,
    Error, Result,
};

/// Tombstone threshold; sidecars at or below this many live entries are
/// never compacted.
pub const COMPACT_MIN: usize = 32;

/// Position in the order arrays. Deleted positions carry a tombstone
/// until compaction sweeps them out.
#[derive(Clone, PartialEq, Debug)]
pub enum Slot<T> {
    Live(T),
    Tomb,
}

/// Persistent keyed mapping that iterates in insertion order.
///
/// Composed of a hash trie from key to assigned index, an ordered
/// sequence from index to key, and a parallel sequence from index to
/// value. Updating an existing key rewrites only its value slot and does
/// not change its position; removing a key leaves a tombstone.
#[derive(Clone)]
pub struct OMap<K, V> {
    next: u64,
    holes: usize,
    keys: Vector<Slot<K>>,
    vals: Vector<Slot<V>>,
    index: Trie<K, u64>,
}

impl<K, V> Default for OMap<K, V>
where
    K: Clone,
    V: Clone,
{
    fn default() -> OMap<K, V> {
        OMap::new()
    }
}

impl<K, V> OMap<K, V>
where
    K: Clone,
    V: Clone,
{
    pub fn new() -> OMap<K, V> {
        OMap {
            next: 0,
            holes: 0,
            keys: Vector::new(),
            vals: Vector::new(),
            index: Trie::new(),
        }
    }

    /// Return the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        (self.next as usize) - self.holes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two handles share all three sub-indexes by identity.
    pub fn same_as(&self, other: &OMap<K, V>) -> bool {
        self.next == other.next
            && self.holes == other.holes
            && self.keys.same_as(&other.keys)
            && self.vals.same_as(&other.vals)
            && self.index.same_as(&other.index)
    }

    /// Drop every entry.
    pub fn clear(&self) -> OMap<K, V> {
        OMap::new()
    }

    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            inner: self.keys.iter().zip(self.vals.iter()),
        }
    }
}

impl<K, V> OMap<K, V>
where
    K: TrieHash + Eq + Clone,
    V: Clone + PartialEq,
{
    /// Return a reference to `key`'s value, or None when absent.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: TrieHash + Eq + ?Sized,
    {
        let off = *self.index.get(key)? as usize;
        match self.vals.get(off) {
            Some(Slot::Live(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TrieHash + Eq + ?Sized,
    {
        self.index.get(key).is_some()
    }

    /// Insert or overwrite `key`. A new key is assigned the next dense
    /// position; an existing key keeps its position and only the value
    /// slot is rewritten. Setting a key to its present value is a no-op
    /// returning the same sidecar by identity.
    pub fn set(&self, key: K, value: V, token: Option<&Token>) -> Result<(OMap<K, V>, Option<V>)> {
        match self.index.get(&key) {
            Some(&off) => {
                let off = off as usize;
                let old = match self.vals.get(off) {
                    Some(Slot::Live(old)) => old.clone(),
                    _ => return err_at!(Fatal, msg: "live key without value at {}", off),
                };
                if old == value {
                    return Ok((self.clone(), Some(old)));
                }
                let mut omap = self.clone();
                omap.vals = omap.vals.set(off, Slot::Live(value), token)?;
                Ok((omap, Some(old)))
            }
            None => {
                let mut omap = self.clone();
                omap.keys = omap.keys.push(Slot::Live(key.clone()), token);
                omap.vals = omap.vals.push(Slot::Live(value), token);
                omap.index = omap.index.set(key, omap.next, token).0;
                omap.next += 1;
                Ok((omap, None))
            }
        }
    }

    /// Remove `key`, leaving tombstones at its position. Removing an
    /// absent key is a no-op returning the same sidecar by identity.
    /// Positions of other entries are never renumbered outside
    /// compaction.
    pub fn remove<Q>(&self, key: &Q, token: Option<&Token>) -> Result<(OMap<K, V>, Option<V>)>
    where
        K: Borrow<Q>,
        Q: TrieHash + Eq + ?Sized,
    {
        let off = match self.index.get(key) {
            Some(&off) => off as usize,
            None => return Ok((self.clone(), None)),
        };
        let old = match self.vals.get(off) {
            Some(Slot::Live(old)) => old.clone(),
            _ => return err_at!(Fatal, msg: "live key without value at {}", off),
        };

        let mut omap = self.clone();
        omap.keys = omap.keys.set(off, Slot::Tomb, token)?;
        omap.vals = omap.vals.set(off, Slot::Tomb, token)?;
        omap.index = omap.index.remove(key, token).0;
        omap.holes += 1;

        Ok((omap.maybe_compact(token)?, Some(old)))
    }

    // rebuild the sidecar densely once tombstones dominate. Live entries
    // keep their relative order, fresh positions are 0..len.
    fn maybe_compact(self, token: Option<&Token>) -> Result<OMap<K, V>> {
        if self.holes <= self.len() / 2 || self.len() <= COMPACT_MIN {
            return Ok(self);
        }

        let mut omap = OMap::new();
        for (key, value) in self.iter() {
            let (key, value) = (key.clone(), value.clone());
            omap.keys = omap.keys.push(Slot::Live(key.clone()), token);
            omap.vals = omap.vals.push(Slot::Live(value), token);
            omap.index = omap.index.set(key, omap.next, token).0;
            omap.next += 1;
        }
        Ok(omap)
    }

    /// Validate sidecar invariants:
    ///
    /// * Order arrays are parallel, `next` long, with `holes` tombstones.
    /// * The trie maps exactly the live keys to their positions.
    /// * The compaction threshold is never left crossed.
    pub fn validate(&self) -> Result<()> {
        self.keys.validate()?;
        self.vals.validate()?;
        self.index.validate()?;

        let next = usize::try_from(self.next).unwrap();
        if self.keys.len() != next || self.vals.len() != next {
            return err_at!(
                Fatal, msg: "order arrays {}/{}/{}", self.keys.len(), self.vals.len(), next
            );
        }
        if self.index.len() != self.len() {
            return err_at!(Fatal, msg: "index {} != {}", self.index.len(), self.len());
        }
        if self.holes > self.len() / 2 && self.len() > COMPACT_MIN {
            return err_at!(Fatal, msg: "uncompacted {}/{}", self.holes, self.len());
        }

        let mut holes = 0;
        for (off, slot) in self.keys.iter().enumerate() {
            match slot {
                Slot::Live(key) => {
                    let off = off as u64;
                    if self.index.get(key) != Some(&off) {
                        return err_at!(Fatal, msg: "stale index at {}", off);
                    }
                    match self.vals.get(off as usize) {
                        Some(Slot::Live(_)) => (),
                        _ => return err_at!(Fatal, msg: "value tomb under live key {}", off),
                    }
                }
                Slot::Tomb => {
                    holes += 1;
                    match self.vals.get(off) {
                        Some(Slot::Tomb) => (),
                        _ => return err_at!(Fatal, msg: "live value under tomb {}", off),
                    }
                }
            }
        }
        if holes != self.holes {
            return err_at!(Fatal, msg: "holes {} != {}", self.holes, holes);
        }

        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for OMap<K, V>
where
    K: TrieHash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn from_iter<I>(iter: I) -> OMap<K, V>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let token = Token::new();
        let mut omap = OMap::new();
        for (key, value) in iter {
            omap = match omap.set(key, value, Some(&token)) {
                Ok((omap, _)) => omap,
                Err(_) => unreachable!(),
            };
        }
        omap
    }
}

impl<K, V> PartialEq for OMap<K, V>
where
    K: TrieHash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn eq(&self, other: &OMap<K, V>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V> std::fmt::Debug for OMap<K, V>
where
    K: Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over an [OMap], yielding `(key, value)` in insertion order,
/// skipping tombstones.
pub struct Iter<'a, K, V> {
    inner: std::iter::Zip<crate::vector::Iter<'a, Slot<K>>, crate::vector::Iter<'a, Slot<V>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Clone,
    V: Clone,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        loop {
            match self.inner.next()? {
                (Slot::Live(key), Slot::Live(value)) => break Some((key, value)),
                _ => (),
            }
        }
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
