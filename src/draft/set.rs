use std::sync::Arc;

use crate::{
    draft,
    omap::OSet,
    token::Token,
    value::{Key, Value},
    Error, Result,
};

/// Recording draft over an element set.
#[derive(Clone)]
pub struct SetDraft {
    token: Token,
    dirty: bool,
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Native(Vec<Key>),
    Indexed(OSet<Key>),
}

impl SetDraft {
    pub(crate) fn from_value(base: &Value, token: Token) -> Result<SetDraft> {
        let repr = match base {
            Value::Set(keys) if draft::draft_indexed(keys.len()) => {
                Repr::Indexed(draft::build_oset(keys.iter(), &token)?)
            }
            Value::Set(keys) => Repr::Native(keys.as_ref().clone()),
            Value::ISet(oset) => Repr::Indexed(oset.as_ref().clone()),
            _ => return err_at!(WrongKind, msg: "set draft over non-set"),
        };
        Ok(SetDraft {
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
            Repr::Native(keys) => keys.len(),
            Repr::Indexed(oset) => oset.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has(&self, key: &Key) -> bool {
        match &self.repr {
            Repr::Native(keys) => keys.contains(key),
            Repr::Indexed(oset) => oset.contains(key),
        }
    }

    /// Add `key`; adding a present element is not recorded.
    pub fn add(&mut self, key: Key) -> Result<()> {
        if self.has(&key) {
            return Ok(());
        }
        match &mut self.repr {
            Repr::Native(keys) => keys.push(key),
            Repr::Indexed(oset) => *oset = oset.insert(key, Some(&self.token))?.0,
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove `key`; removing an absent element is a no-op absence.
    /// Returns whether an element was removed.
    pub fn delete(&mut self, key: &Key) -> Result<bool> {
        let deleted = match &mut self.repr {
            Repr::Native(keys) => match keys.iter().position(|k| k == key) {
                Some(off) => {
                    keys.remove(off);
                    true
                }
                None => false,
            },
            Repr::Indexed(oset) => {
                let (s, removed) = oset.remove(key, Some(&self.token))?;
                *oset = s;
                removed
            }
        };
        if deleted {
            self.dirty = true;
        }
        Ok(deleted)
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        if self.len() == 0 {
            return;
        }
        match &mut self.repr {
            Repr::Native(keys) => keys.clear(),
            Repr::Indexed(oset) => *oset = OSet::new(),
        }
        self.dirty = true;
    }

    /// Copy out the current elements in insertion order.
    pub fn elements(&self) -> Vec<Key> {
        match &self.repr {
            Repr::Native(keys) => keys.clone(),
            Repr::Indexed(oset) => oset.iter().cloned().collect(),
        }
    }

    pub(crate) fn commit(self) -> Result<Value> {
        let value = match self.repr {
            Repr::Native(keys) => Value::Set(Arc::new(keys)),
            Repr::Indexed(oset) => Value::ISet(Arc::new(oset)),
        };
        Ok(value)
    }
}
