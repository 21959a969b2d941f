use std::sync::Arc;

use crate::hash::{self, fold64, fmix32, TrieHash};

/// Identity tag for keys that are neither text, integer nor boolean.
///
/// A tag is assigned from the process-wide monotonic counter on
/// construction and never recycled; clones share the tag, so a cloned
/// ident hashes and compares as the same key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ident {
    tag: u64,
}

impl Ident {
    pub fn new() -> Ident {
        Ident {
            tag: hash::new_ident_tag(),
        }
    }

    #[inline]
    pub fn to_tag(&self) -> u64 {
        self.tag
    }
}

impl Default for Ident {
    fn default() -> Ident {
        Ident::new()
    }
}

/// Key into a keyed mapping, or element of an element set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Key {
    Bool(bool),
    Integer(i64),
    Text(Arc<str>),
    Ident(Ident),
}

impl TrieHash for Key {
    fn hash32(&self) -> u32 {
        match self {
            Key::Bool(value) => fmix32(u32::from(*value)),
            Key::Integer(value) => fold64(*value as u64),
            Key::Text(text) => text.hash32(),
            Key::Ident(ident) => fold64(ident.to_tag()),
        }
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Key {
        Key::Bool(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Key {
        Key::Integer(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Key {
        Key::Text(Arc::from(value))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Key {
        Key::Text(Arc::from(value.as_str()))
    }
}

impl From<Ident> for Key {
    fn from(ident: Ident) -> Key {
        Key::Ident(ident)
    }
}
