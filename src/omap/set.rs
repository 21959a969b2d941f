use std::{borrow::Borrow, iter::FromIterator};

use crate::{hash::TrieHash, omap::OMap, token::Token, Result};

/// Persistent element set that iterates in insertion order.
///
/// Shares the keyed-mapping machinery wholesale; the value slot is a
/// singleton marker.
#[derive(Clone)]
pub struct OSet<K> {
    map: OMap<K, ()>,
}

impl<K> Default for OSet<K>
where
    K: Clone,
{
    fn default() -> OSet<K> {
        OSet::new()
    }
}

impl<K> OSet<K>
where
    K: Clone,
{
    pub fn new() -> OSet<K> {
        OSet { map: OMap::new() }
    }

    /// Return the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Whether two handles share the underlying sidecar by identity.
    pub fn same_as(&self, other: &OSet<K>) -> bool {
        self.map.same_as(&other.map)
    }

    /// Drop every element.
    pub fn clear(&self) -> OSet<K> {
        OSet::new()
    }

    pub fn iter(&self) -> SetIter<K> {
        SetIter {
            inner: self.map.iter(),
        }
    }
}

impl<K> OSet<K>
where
    K: TrieHash + Eq + Clone,
{
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TrieHash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Add `key`. Adding a present element is a no-op returning the same
    /// set by identity.
    pub fn insert(&self, key: K, token: Option<&Token>) -> Result<(OSet<K>, bool)> {
        let (map, old) = self.map.set(key, (), token)?;
        Ok((OSet { map }, old.is_none()))
    }

    /// Remove `key`. Removing an absent element is a no-op returning the
    /// same set by identity.
    pub fn remove<Q>(&self, key: &Q, token: Option<&Token>) -> Result<(OSet<K>, bool)>
    where
        K: Borrow<Q>,
        Q: TrieHash + Eq + ?Sized,
    {
        let (map, old) = self.map.remove(key, token)?;
        Ok((OSet { map }, old.is_some()))
    }

    pub fn validate(&self) -> Result<()> {
        self.map.validate()
    }
}

impl<K> FromIterator<K> for OSet<K>
where
    K: TrieHash + Eq + Clone,
{
    fn from_iter<I>(iter: I) -> OSet<K>
    where
        I: IntoIterator<Item = K>,
    {
        OSet {
            map: iter.into_iter().map(|key| (key, ())).collect(),
        }
    }
}

impl<K> PartialEq for OSet<K>
where
    K: TrieHash + Eq + Clone,
{
    fn eq(&self, other: &OSet<K>) -> bool {
        self.map == other.map
    }
}

impl<K> std::fmt::Debug for OSet<K>
where
    K: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over an [OSet], yielding elements in insertion order.
pub struct SetIter<'a, K> {
    inner: crate::omap::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for SetIter<'a, K>
where
    K: Clone,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }
}
