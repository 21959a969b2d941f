//! Module ``vector`` implement a persistent ordered sequence.
//!
//! [Vector] is a wide-branching balanced tree, every inner node holding up
//! to 32 children and every leaf holding exactly 32 elements, with a tail
//! buffer of up to 32 elements absorbing appends before they are flushed
//! into the tree. Reads cost one pointer chase per 5 bits of index, writes
//! copy one root-to-leaf path and share everything else with the input by
//! reference.

mod index;
mod node;

pub use index::{Iter, Vector};
