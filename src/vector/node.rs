use std::sync::Arc;

use crate::token::{owned_by, Token};

/// Tree fan-out, and also the capacity of the tail buffer.
pub const BRANCH: usize = 32;
/// Bits of index consumed per tree level.
pub const BITS: usize = 5;
/// Mask selecting one level's chunk of the index.
pub const MASK: usize = 0x1f;

// Inner nodes hold child pointers, leaf nodes hold elements. The tail
// buffer is a leaf living outside the tree.
#[derive(Clone)]
pub enum Node<V> {
    Inner(Inner<V>),
    Leaf(Leaf<V>),
}

#[derive(Clone)]
pub struct Inner<V> {
    pub token: Option<Token>,
    pub slots: Vec<Arc<Node<V>>>,
}

#[derive(Clone)]
pub struct Leaf<V> {
    pub token: Option<Token>,
    pub items: Vec<V>,
}

impl<V> Node<V>
where
    V: Clone,
{
    pub fn empty_inner() -> Arc<Node<V>> {
        let inner = Inner {
            token: None,
            slots: Vec::default(),
        };
        Arc::new(Node::Inner(inner))
    }

    pub fn empty_leaf() -> Arc<Node<V>> {
        let leaf = Leaf {
            token: None,
            items: Vec::default(),
        };
        Arc::new(Node::Leaf(leaf))
    }

    pub fn new_leaf(items: Vec<V>, token: Option<&Token>) -> Arc<Node<V>> {
        let leaf = Leaf {
            token: token.cloned(),
            items,
        };
        Arc::new(Node::Leaf(leaf))
    }

    /// Build a spine of inner nodes from `level` down to `node`.
    pub fn new_path(level: usize, node: Arc<Node<V>>, token: Option<&Token>) -> Arc<Node<V>> {
        if level == 0 {
            node
        } else {
            let inner = Inner {
                token: token.cloned(),
                slots: vec![Self::new_path(level - BITS, node, token)],
            };
            Arc::new(Node::Inner(inner))
        }
    }

    fn stamp(&self) -> &Option<Token> {
        match self {
            Node::Inner(inner) => &inner.token,
            Node::Leaf(leaf) => &leaf.token,
        }
    }

    fn clone_with(&self, token: Option<&Token>) -> Node<V> {
        let mut node = self.clone();
        match &mut node {
            Node::Inner(inner) => inner.token = token.cloned(),
            Node::Leaf(leaf) => leaf.token = token.cloned(),
        }
        node
    }

    /// Return a mutable reference into `slot`, mutating in place when the
    /// node is stamped with the caller's token and uniquely referenced,
    /// copying the node otherwise.
    pub fn editable<'a>(slot: &'a mut Arc<Node<V>>, token: Option<&Token>) -> &'a mut Node<V> {
        let in_place = owned_by(slot.stamp(), token) && Arc::get_mut(slot).is_some();
        if !in_place {
            *slot = Arc::new(slot.clone_with(token));
        }
        Arc::get_mut(slot).unwrap()
    }

    pub fn as_inner(&self) -> &Inner<V> {
        match self {
            Node::Inner(inner) => inner,
            Node::Leaf(_) => unreachable!(),
        }
    }

    pub fn as_leaf(&self) -> &Leaf<V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Inner(_) => unreachable!(),
        }
    }

    pub fn as_inner_mut(&mut self) -> &mut Inner<V> {
        match self {
            Node::Inner(inner) => inner,
            Node::Leaf(_) => unreachable!(),
        }
    }

    pub fn as_leaf_mut(&mut self) -> &mut Leaf<V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Inner(_) => unreachable!(),
        }
    }
}
