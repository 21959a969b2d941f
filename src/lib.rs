//! Package pcoll implement persistent, immutable collections with an
//! adaptive representation strategy and a producer API for batched
//! immutable updates.
//!
//! Four kinds of values are recognised at runtime - [Sequence], [Mapping],
//! [ElementSet] and [Record] - refer [Kind]. A value of each kind is either
//! _native_, the ordinary in-memory layout, or _indexed_, a handle wrapping
//! a persistent index structure. Both forms are observationally equivalent,
//! and values move between them at the 512-element boundary, refer
//! [policy] module.
//!
//! Index structures backing large collections:
//!
//! * [Vector], wide-branching balanced tree for ordered sequences, with a
//!   tail buffer for cheap appends.
//! * [Trie], bitmap-compressed hash-array-mapped-trie for keyed lookups.
//! * [OMap] and [OSet], insertion-order sidecar layered on top of [Vector]
//!   and [Trie], so that keyed iteration yields insertion order.
//!
//! Batched mutation goes through one of two producer engines, refer
//! [produce] and [produce_fast]. Either engine hands a draft of the input
//! to application supplied recipe, commits the recorded mutations into the
//! index structures under a call-scoped ownership [Token], and returns a
//! new value sharing unchanged substructure with the input. A recipe that
//! mutates nothing gets back the input by identity.
//!
//! [Sequence]: Kind::Sequence
//! [Mapping]: Kind::Mapping
//! [ElementSet]: Kind::ElementSet
//! [Record]: Kind::Record

use std::result;

/// Short form to compose Error values.
///
/// Here are few possible ways:
///
/// ```ignore
/// use crate::Error;
/// err_at!(Fatal, msg: "fatal failure")
/// ```
///
/// ```ignore
/// use crate::Error;
/// err_at!(Fatal, std::io::read(buf))
/// ```
///
/// ```ignore
/// use crate::Error;
/// err_at!(Fatal, std::fs::read(file_path), "reading file")
/// ```
///
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

/// Error variants that can be returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the failing
/// call-site, and a message describing the failure.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Unrecoverable failure, an invariant of the index structures broke.
    Fatal(String, String),
    /// API called with invalid arguments.
    InvalidInput(String, String),
    /// Sequence index addressed outside `0..count`.
    IndexOutofBound(String, String),
    /// Operation applied to a draft of the wrong kind, like pushing into
    /// a mapping draft.
    WrongKind(String, String),
    /// Key missing from a keyed collection, where absence is a failure.
    KeyNotFound(String, String),
    /// Failure raised from within an application supplied recipe.
    Recipe(String, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> result::Result<(), std::fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, m) => write!(f, "{} Fatal: {}", p, m),
            InvalidInput(p, m) => write!(f, "{} InvalidInput: {}", p, m),
            IndexOutofBound(p, m) => write!(f, "{} IndexOutofBound: {}", p, m),
            WrongKind(p, m) => write!(f, "{} WrongKind: {}", p, m),
            KeyNotFound(p, m) => write!(f, "{} KeyNotFound: {}", p, m),
            Recipe(p, m) => write!(f, "{} Recipe: {}", p, m),
        }
    }
}

impl std::error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;

pub mod hash;
mod token;

pub mod omap;
pub mod trie;
pub mod vector;

pub mod draft;
mod policy;
pub mod produce;
pub mod value;

pub use crate::omap::{OMap, OSet};
pub use crate::policy::ADAPT_CUTOFF;
pub use crate::produce::{is_persistent, produce, produce_fast, unwrap_value, wrap};
pub use crate::produce::{Op, Ops, Path};
pub use crate::token::Token;
pub use crate::trie::Trie;
pub use crate::value::{Ident, Key, Kind, Value};
pub use crate::vector::Vector;
