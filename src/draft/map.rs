use std::sync::Arc;

use crate::{
    draft,
    omap::OMap,
    token::Token,
    value::{Key, Value},
    Error, Result,
};

/// Recording draft over a keyed mapping.
#[derive(Clone)]
pub struct MapDraft {
    token: Token,
    dirty: bool,
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Native(Vec<(Key, Value)>),
    Indexed(OMap<Key, Value>),
}

impl MapDraft {
    pub(crate) fn from_value(base: &Value, token: Token) -> Result<MapDraft> {
        let repr = match base {
            Value::Map(pairs) if draft::draft_indexed(pairs.len()) => {
                Repr::Indexed(draft::build_omap(pairs.iter().map(|(k, v)| (k, v)), &token)?)
            }
            Value::Map(pairs) => Repr::Native(pairs.as_ref().clone()),
            Value::IMap(omap) => Repr::Indexed(omap.as_ref().clone()),
            _ => return err_at!(WrongKind, msg: "mapping draft over non-mapping"),
        };
        Ok(MapDraft {
            token,
            dirty: false,
            repr,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Native(pairs) => pairs.len(),
            Repr::Indexed(omap) => omap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read `key`'s value, or None when absent.
    pub fn get(&self, key: &Key) -> Option<Value> {
        match &self.repr {
            Repr::Native(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value.clone()),
            Repr::Indexed(omap) => omap.get(key).cloned(),
        }
    }

    pub fn has(&self, key: &Key) -> bool {
        match &self.repr {
            Repr::Native(pairs) => pairs.iter().any(|(k, _)| k == key),
            Repr::Indexed(omap) => omap.contains_key(key),
        }
    }

    /// Insert or overwrite `key`. Writing the present value is not
    /// recorded. An existing key keeps its iteration position.
    pub fn set(&mut self, key: Key, value: Value) -> Result<()> {
        if self.get(&key).map_or(false, |old| old == value) {
            return Ok(());
        }

        match &mut self.repr {
            Repr::Native(pairs) => match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(pair) => pair.1 = value,
                None => pairs.push((key, value)),
            },
            Repr::Indexed(omap) => *omap = omap.set(key, value, Some(&self.token))?.0,
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove `key`; removing an absent key is a no-op absence. Returns
    /// whether a key was removed.
    pub fn delete(&mut self, key: &Key) -> Result<bool> {
        let deleted = match &mut self.repr {
            Repr::Native(pairs) => match pairs.iter().position(|(k, _)| k == key) {
                Some(off) => {
                    pairs.remove(off);
                    true
                }
                None => false,
            },
            Repr::Indexed(omap) => {
                let (m, old) = omap.remove(key, Some(&self.token))?;
                *omap = m;
                old.is_some()
            }
        };
        if deleted {
            self.dirty = true;
        }
        Ok(deleted)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if self.len() == 0 {
            return;
        }
        match &mut self.repr {
            Repr::Native(pairs) => pairs.clear(),
            Repr::Indexed(omap) => *omap = OMap::new(),
        }
        self.dirty = true;
    }

    /// Copy out the current entries in insertion order.
    pub fn entries(&self) -> Vec<(Key, Value)> {
        match &self.repr {
            Repr::Native(pairs) => pairs.clone(),
            Repr::Indexed(omap) => omap.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    pub(crate) fn commit(self) -> Result<Value> {
        let value = match self.repr {
            Repr::Native(pairs) => Value::Map(Arc::new(pairs)),
            Repr::Indexed(omap) => Value::IMap(Arc::new(omap)),
        };
        Ok(value)
    }
}
