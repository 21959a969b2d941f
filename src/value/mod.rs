//! Module ``value`` implement the runtime value model.
//!
//! Four kinds of container values are recognised, refer [Kind], and each
//! kind has two interchangeable representations: _native_, the ordinary
//! in-memory layout, and _indexed_, a handle wrapping one of the
//! persistent index structures. Equality compares contents and never the
//! representation; [Value::same] compares identity, which is what the
//! producer engines use to honor the no-op contract.

mod key;

pub use key::{Ident, Key};

use std::sync::Arc;

use crate::{omap::OMap, omap::OSet, vector::Vector};

/// Runtime kind of a container value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Sequence,
    Mapping,
    ElementSet,
    Record,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Kind::Sequence => write!(f, "sequence"),
            Kind::Mapping => write!(f, "mapping"),
            Kind::ElementSet => write!(f, "element-set"),
            Kind::Record => write!(f, "record"),
        }
    }
}

/// Dynamically typed value, scalar or container, native or indexed.
///
/// Container payloads sit behind `Arc`, so cloning a value is cheap and
/// two clones share identity until a producer derives a new value from
/// one of them.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(Arc<str>),
    /// Native ordered sequence.
    Seq(Arc<Vec<Value>>),
    /// Native keyed mapping, pairs in insertion order.
    Map(Arc<Vec<(Key, Value)>>),
    /// Native element set, elements in insertion order.
    Set(Arc<Vec<Key>>),
    /// Native record, properties in insertion order.
    Rec(Arc<Vec<(Arc<str>, Value)>>),
    /// Indexed ordered sequence.
    ISeq(Arc<Vector<Value>>),
    /// Indexed keyed mapping.
    IMap(Arc<OMap<Key, Value>>),
    /// Indexed element set.
    ISet(Arc<OSet<Key>>),
    /// Indexed record.
    IRec(Arc<OMap<Arc<str>, Value>>),
}

impl Value {
    pub fn seq(items: Vec<Value>) -> Value {
        Value::Seq(Arc::new(items))
    }

    pub fn mapping(pairs: Vec<(Key, Value)>) -> Value {
        Value::Map(Arc::new(pairs))
    }

    pub fn element_set(keys: Vec<Key>) -> Value {
        Value::Set(Arc::new(keys))
    }

    pub fn record<S>(pairs: Vec<(S, Value)>) -> Value
    where
        S: Into<Arc<str>>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        Value::Rec(Arc::new(pairs))
    }

    /// Return the runtime kind, None for scalars.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::Seq(_) | Value::ISeq(_) => Some(Kind::Sequence),
            Value::Map(_) | Value::IMap(_) => Some(Kind::Mapping),
            Value::Set(_) | Value::ISet(_) => Some(Kind::ElementSet),
            Value::Rec(_) | Value::IRec(_) => Some(Kind::Record),
            _ => None,
        }
    }

    /// Return the element count, None for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(items.len()),
            Value::ISeq(vector) => Some(vector.len()),
            Value::Map(pairs) => Some(pairs.len()),
            Value::IMap(omap) => Some(omap.len()),
            Value::Set(keys) => Some(keys.len()),
            Value::ISet(oset) => Some(oset.len()),
            Value::Rec(pairs) => Some(pairs.len()),
            Value::IRec(omap) => Some(omap.len()),
            _ => None,
        }
    }

    /// Whether this value is backed by an indexed representation.
    pub fn is_indexed(&self) -> bool {
        matches!(
            self,
            Value::ISeq(_) | Value::IMap(_) | Value::ISet(_) | Value::IRec(_)
        )
    }

    /// Identity relation: `Arc` pointer equality for containers, plain
    /// equality for scalars. The no-op guarantees of the producer engines
    /// are stated against this relation.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => Arc::ptr_eq(a, b),
            (Value::Seq(a), Value::Seq(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Arc::ptr_eq(a, b),
            (Value::Rec(a), Value::Rec(b)) => Arc::ptr_eq(a, b),
            (Value::ISeq(a), Value::ISeq(b)) => Arc::ptr_eq(a, b),
            (Value::IMap(a), Value::IMap(b)) => Arc::ptr_eq(a, b),
            (Value::ISet(a), Value::ISet(b)) => Arc::ptr_eq(a, b),
            (Value::IRec(a), Value::IRec(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn iter_seq(&self) -> Option<SeqIter> {
        match self {
            Value::Seq(items) => Some(SeqIter::Native(items.iter())),
            Value::ISeq(vector) => Some(SeqIter::Indexed(vector.iter())),
            _ => None,
        }
    }

    pub(crate) fn iter_map(&self) -> Option<MapIter> {
        match self {
            Value::Map(pairs) => Some(MapIter::Native(pairs.iter())),
            Value::IMap(omap) => Some(MapIter::Indexed(omap.iter())),
            _ => None,
        }
    }

    pub(crate) fn iter_set(&self) -> Option<SetIter> {
        match self {
            Value::Set(keys) => Some(SetIter::Native(keys.iter())),
            Value::ISet(oset) => Some(SetIter::Indexed(oset.iter())),
            _ => None,
        }
    }

    pub(crate) fn iter_rec(&self) -> Option<RecIter> {
        match self {
            Value::Rec(pairs) => Some(RecIter::Native(pairs.iter())),
            Value::IRec(omap) => Some(RecIter::Indexed(omap.iter())),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    // contents, not representation: a native sequence equals an indexed
    // sequence holding the same elements in the same order.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.kind(), other.kind()) {
                (Some(Kind::Sequence), Some(Kind::Sequence)) => {
                    self.len() == other.len()
                        && self.iter_seq().unwrap().eq(other.iter_seq().unwrap())
                }
                (Some(Kind::Mapping), Some(Kind::Mapping)) => {
                    self.len() == other.len()
                        && self.iter_map().unwrap().eq(other.iter_map().unwrap())
                }
                (Some(Kind::ElementSet), Some(Kind::ElementSet)) => {
                    self.len() == other.len()
                        && self.iter_set().unwrap().eq(other.iter_set().unwrap())
                }
                (Some(Kind::Record), Some(Kind::Record)) => {
                    self.len() == other.len()
                        && self.iter_rec().unwrap().eq(other.iter_rec().unwrap())
                }
                _ => false,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Text(Arc::from(value.as_str()))
    }
}

pub(crate) enum SeqIter<'a> {
    Native(std::slice::Iter<'a, Value>),
    Indexed(crate::vector::Iter<'a, Value>),
}

impl<'a> Iterator for SeqIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self {
            SeqIter::Native(iter) => iter.next(),
            SeqIter::Indexed(iter) => iter.next(),
        }
    }
}

pub(crate) enum MapIter<'a> {
    Native(std::slice::Iter<'a, (Key, Value)>),
    Indexed(crate::omap::Iter<'a, Key, Value>),
}

impl<'a> Iterator for MapIter<'a> {
    type Item = (&'a Key, &'a Value);

    fn next(&mut self) -> Option<(&'a Key, &'a Value)> {
        match self {
            MapIter::Native(iter) => iter.next().map(|(k, v)| (k, v)),
            MapIter::Indexed(iter) => iter.next(),
        }
    }
}

pub(crate) enum SetIter<'a> {
    Native(std::slice::Iter<'a, Key>),
    Indexed(crate::omap::SetIter<'a, Key>),
}

impl<'a> Iterator for SetIter<'a> {
    type Item = &'a Key;

    fn next(&mut self) -> Option<&'a Key> {
        match self {
            SetIter::Native(iter) => iter.next(),
            SetIter::Indexed(iter) => iter.next(),
        }
    }
}

pub(crate) enum RecIter<'a> {
    Native(std::slice::Iter<'a, (Arc<str>, Value)>),
    Indexed(crate::omap::Iter<'a, Arc<str>, Value>),
}

impl<'a> Iterator for RecIter<'a> {
    type Item = (&'a Arc<str>, &'a Value);

    fn next(&mut self) -> Option<(&'a Arc<str>, &'a Value)> {
        match self {
            RecIter::Native(iter) => iter.next().map(|(k, v)| (k, v)),
            RecIter::Indexed(iter) => iter.next(),
        }
    }
}
