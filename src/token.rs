//! Module ``token`` implement the call-scoped ownership token that
//! authorizes in-place mutation of interior nodes.
//!
//! Every producer call mints one [Token]. Interior nodes created while the
//! call is in flight are stamped with that token; a node may be mutated in
//! place only when its stamp matches the active token, otherwise the
//! mutation copies the node. Tokens compare by identity, not by value, and
//! they are dropped before the producer call returns, so a committed tree
//! can never be stomped by a later call.

use std::sync::Arc;

/// Unique, non-forgeable identity scoped to a single producer call.
#[derive(Clone, Debug)]
pub struct Token(Arc<u32>);

impl Token {
    pub fn new() -> Token {
        Token(Arc::new(0))
    }

    /// Token equality is by identity. Two tokens match iff they are clones
    /// of the same mint.
    #[inline]
    pub fn matches(&self, other: &Token) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Token {
    fn default() -> Token {
        Token::new()
    }
}

/// Whether a node stamped with `stamp` may be mutated in place by a caller
/// holding `token`.
#[inline]
pub fn owned_by(stamp: &Option<Token>, token: Option<&Token>) -> bool {
    match (stamp, token) {
        (Some(stamp), Some(token)) => stamp.matches(token),
        _ => false,
    }
}
