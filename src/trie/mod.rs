//! Module ``trie`` implement a persistent keyed index as a
//! bitmap-compressed hash-array-mapped-trie.
//!
//! Keys digest to 32 bits, refer [crate::hash], and the digest is consumed
//! 5 bits per level. A branch holds a 32-bit occupancy bitmap and a dense
//! child array; the child for chunk `c` exists iff bit `c` is set and sits
//! at position `popcount(bitmap & ((1 << c) - 1))`. Keys whose digests
//! collide on all 32 bits share a collision node scanned linearly.
//!
//! Iteration over a bare [Trie] yields hash order; keyed collections that
//! must yield insertion order layer [crate::omap] on top.

mod index;
mod node;

pub use index::{Iter, Trie};
