use std::sync::Arc;

use crate::value::{Key, Value};

/// Property path into nested records. The empty path addresses the value
/// under production itself.
pub type Path = Vec<Arc<str>>;

pub(crate) fn to_path(parts: &[&str]) -> Path {
    parts.iter().map(|part| Arc::from(*part)).collect()
}

/// One explicit operation recorded by a `produce_fast` recipe.
///
/// Paths select nested records by property name; sequence, mapping and
/// set operations address their target by position or key once the path
/// has been walked.
#[derive(Clone)]
pub enum Op {
    /// Overwrite the record property at `path`.
    Set { path: Path, value: Value },
    /// Apply a function to the record property at `path`, absent values
    /// included.
    Update {
        path: Path,
        apply: Arc<dyn Fn(Option<Value>) -> Value>,
    },
    /// Remove the record property at `path`.
    Delete { path: Path },
    /// Merge a partial record, property by property, into the record at
    /// `path`.
    Merge { path: Path, value: Value },
    /// Append to the sequence at `path`.
    Push { path: Path, value: Value },
    /// Drop the last element of the sequence at `path`.
    Pop { path: Path },
    /// Overwrite one position of the sequence at `path`.
    SetIndex {
        path: Path,
        index: usize,
        value: Value,
    },
    /// Replace `del` elements at `off` of the sequence at `path`.
    Splice {
        path: Path,
        off: usize,
        del: usize,
        values: Vec<Value>,
    },
    /// Keep only approved elements of the sequence at `path`.
    Retain {
        path: Path,
        keep: Arc<dyn Fn(&Value) -> bool>,
    },
    /// Add an element to the set at `path`.
    Add { path: Path, key: Key },
    /// Remove an element from the set at `path`.
    DelElem { path: Path, key: Key },
    /// Insert or overwrite a key of the mapping at `path`.
    MapSet { path: Path, key: Key, value: Value },
    /// Remove a key of the mapping at `path`.
    MapDel { path: Path, key: Key },
    /// Drop every element of the container at `path`.
    Clear { path: Path },
}

/// Operation recorder handed to `produce_fast` recipes.
///
/// The recorder collects operations in recipe order; nothing touches the
/// input until the producer commits them through one draft under one
/// token.
#[derive(Clone, Default)]
pub struct Ops {
    ops: Vec<Op>,
}

impl Ops {
    pub(crate) fn new() -> Ops {
        Ops { ops: Vec::default() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn set(&mut self, path: &[&str], value: Value) -> &mut Self {
        self.ops.push(Op::Set {
            path: to_path(path),
            value,
        });
        self
    }

    pub fn update<F>(&mut self, path: &[&str], apply: F) -> &mut Self
    where
        F: Fn(Option<Value>) -> Value + 'static,
    {
        self.ops.push(Op::Update {
            path: to_path(path),
            apply: Arc::new(apply),
        });
        self
    }

    pub fn delete(&mut self, path: &[&str]) -> &mut Self {
        self.ops.push(Op::Delete { path: to_path(path) });
        self
    }

    pub fn merge(&mut self, path: &[&str], value: Value) -> &mut Self {
        self.ops.push(Op::Merge {
            path: to_path(path),
            value,
        });
        self
    }

    pub fn push(&mut self, path: &[&str], value: Value) -> &mut Self {
        self.ops.push(Op::Push {
            path: to_path(path),
            value,
        });
        self
    }

    pub fn pop(&mut self, path: &[&str]) -> &mut Self {
        self.ops.push(Op::Pop { path: to_path(path) });
        self
    }

    pub fn set_index(&mut self, path: &[&str], index: usize, value: Value) -> &mut Self {
        self.ops.push(Op::SetIndex {
            path: to_path(path),
            index,
            value,
        });
        self
    }

    pub fn splice(&mut self, path: &[&str], off: usize, del: usize, values: Vec<Value>) -> &mut Self {
        self.ops.push(Op::Splice {
            path: to_path(path),
            off,
            del,
            values,
        });
        self
    }

    pub fn retain<F>(&mut self, path: &[&str], keep: F) -> &mut Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.ops.push(Op::Retain {
            path: to_path(path),
            keep: Arc::new(keep),
        });
        self
    }

    pub fn add(&mut self, path: &[&str], key: Key) -> &mut Self {
        self.ops.push(Op::Add {
            path: to_path(path),
            key,
        });
        self
    }

    pub fn del_elem(&mut self, path: &[&str], key: Key) -> &mut Self {
        self.ops.push(Op::DelElem {
            path: to_path(path),
            key,
        });
        self
    }

    pub fn map_set(&mut self, path: &[&str], key: Key, value: Value) -> &mut Self {
        self.ops.push(Op::MapSet {
            path: to_path(path),
            key,
            value,
        });
        self
    }

    pub fn map_del(&mut self, path: &[&str], key: Key) -> &mut Self {
        self.ops.push(Op::MapDel {
            path: to_path(path),
            key,
        });
        self
    }

    pub fn clear(&mut self, path: &[&str]) -> &mut Self {
        self.ops.push(Op::Clear { path: to_path(path) });
        self
    }
}
