use std::sync::Arc;

use crate::{
    hash::popcount,
    token::{owned_by, Token},
};

/// Bits of hash consumed per trie level.
pub const BITS: u32 = 5;
/// Mask selecting one level's chunk of the hash.
pub const MASK: u32 = 0x1f;
/// Width of the hash digest; levels at or beyond this shift have
/// exhausted the hash and fall back to collision nodes.
pub const HASH_BITS: u32 = 32;

#[derive(Clone)]
pub enum Node<K, V> {
    Branch(Branch<K, V>),
    Leaf(Leaf<K, V>),
    Collision(Collision<K, V>),
}

#[derive(Clone)]
pub struct Branch<K, V> {
    pub token: Option<Token>,
    pub bitmap: u32,
    pub slots: Vec<Arc<Node<K, V>>>,
}

#[derive(Clone)]
pub struct Leaf<K, V> {
    pub hash: u32,
    pub key: K,
    pub value: V,
}

#[derive(Clone)]
pub struct Collision<K, V> {
    pub token: Option<Token>,
    pub hash: u32,
    pub entries: Vec<(K, V)>,
}

impl<K, V> Branch<K, V> {
    /// Dense position of chunk `c`'s child within the slot array.
    #[inline]
    pub fn position(&self, c: u32) -> usize {
        popcount(self.bitmap & ((1 << c) - 1)) as usize
    }

    #[inline]
    pub fn has(&self, c: u32) -> bool {
        self.bitmap & (1 << c) != 0
    }
}

impl<K, V> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    pub fn empty_branch() -> Arc<Node<K, V>> {
        let branch = Branch {
            token: None,
            bitmap: 0,
            slots: Vec::default(),
        };
        Arc::new(Node::Branch(branch))
    }

    pub fn new_leaf(hash: u32, key: K, value: V) -> Arc<Node<K, V>> {
        Arc::new(Node::Leaf(Leaf { hash, key, value }))
    }

    /// Join two nodes whose hashes differ somewhere at or above `shift`,
    /// creating one branch per further chunk of agreement.
    pub fn join(
        shift: u32,
        a: Arc<Node<K, V>>,
        hash_a: u32,
        b: Arc<Node<K, V>>,
        hash_b: u32,
        token: Option<&Token>,
    ) -> Arc<Node<K, V>> {
        let ca = (hash_a >> shift) & MASK;
        let cb = (hash_b >> shift) & MASK;

        let branch = if ca == cb {
            Branch {
                token: token.cloned(),
                bitmap: 1 << ca,
                slots: vec![Self::join(shift + BITS, a, hash_a, b, hash_b, token)],
            }
        } else if ca < cb {
            Branch {
                token: token.cloned(),
                bitmap: (1 << ca) | (1 << cb),
                slots: vec![a, b],
            }
        } else {
            Branch {
                token: token.cloned(),
                bitmap: (1 << ca) | (1 << cb),
                slots: vec![b, a],
            }
        };
        Arc::new(Node::Branch(branch))
    }

    fn stamp(&self) -> &Option<Token> {
        match self {
            Node::Branch(branch) => &branch.token,
            Node::Collision(collision) => &collision.token,
            // leaves are replaced wholesale, never mutated in place.
            Node::Leaf(_) => &None,
        }
    }

    fn clone_with(&self, token: Option<&Token>) -> Node<K, V> {
        let mut node = self.clone();
        match &mut node {
            Node::Branch(branch) => branch.token = token.cloned(),
            Node::Collision(collision) => collision.token = token.cloned(),
            Node::Leaf(_) => (),
        }
        node
    }

    /// Return a mutable reference into `slot`, mutating in place when the
    /// node is stamped with the caller's token and uniquely referenced,
    /// copying the node otherwise.
    pub fn editable<'a>(slot: &'a mut Arc<Node<K, V>>, token: Option<&Token>) -> &'a mut Node<K, V> {
        let in_place = owned_by(slot.stamp(), token) && Arc::get_mut(slot).is_some();
        if !in_place {
            *slot = Arc::new(slot.clone_with(token));
        }
        Arc::get_mut(slot).unwrap()
    }

    pub fn as_branch(&self) -> &Branch<K, V> {
        match self {
            Node::Branch(branch) => branch,
            _ => unreachable!(),
        }
    }

    pub fn as_branch_mut(&mut self) -> &mut Branch<K, V> {
        match self {
            Node::Branch(branch) => branch,
            _ => unreachable!(),
        }
    }
}
