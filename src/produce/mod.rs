//! Module ``produce`` implement the producer engines and the public
//! conversion utilities.
//!
//! [produce] hands the recipe a recording draft with ordinary container
//! semantics; [produce_fast] hands it an operation recorder addressed by
//! property paths. Either way the engine mints one ownership token,
//! drives the recorded mutations through the draft layer, and applies
//! the adaptive representation policy to the committed output. A recipe
//! that changes nothing gets the input back by identity, and a recipe
//! that fails leaves the input untouched.

mod commit;
mod ops;

pub use ops::{Op, Ops, Path};

use std::sync::Arc;

use crate::{
    draft::Draft,
    policy,
    token::Token,
    value::Value,
    Error, Result,
};

/// Produce a new value by running `recipe` against a recording draft of
/// `base`.
///
/// A recipe returning `Some(value)` replaces the committed output with
/// that value, which must be of the input's kind; returning `None`
/// commits the draft. A recipe that observes no mutation yields `base`
/// back by identity. A failing recipe re-raises and `base` is untouched.
pub fn produce<F>(base: &Value, recipe: F) -> Result<Value>
where
    F: FnOnce(&mut Draft) -> Result<Option<Value>>,
{
    let token = Token::new();
    let mut draft = Draft::from_value(base, token)?;

    match recipe(&mut draft)? {
        Some(value) => {
            if value.kind() != base.kind() {
                return err_at!(
                    WrongKind, msg: "recipe returned {:?} over {:?}", value.kind(), base.kind()
                );
            }
            if value.same(base) {
                return Ok(base.clone());
            }
            Ok(policy::adapt(value))
        }
        None if !draft.is_dirty() => Ok(base.clone()),
        None => Ok(policy::adapt(draft.commit()?)),
    }
}

/// Produce a new value by running `recipe` against an operation
/// recorder, then committing the recorded operations in recipe order
/// through one draft under one token.
///
/// An empty or no-change recording yields `base` back by identity. A
/// failing recipe re-raises and `base` is untouched.
pub fn produce_fast<F>(base: &Value, recipe: F) -> Result<Value>
where
    F: FnOnce(&mut Ops) -> Result<()>,
{
    let mut ops = Ops::new();
    recipe(&mut ops)?;
    if ops.is_empty() {
        return Ok(base.clone());
    }

    let token = Token::new();
    let mut draft = Draft::from_value(base, token)?;
    for op in ops.into_ops() {
        commit::apply_op(&mut draft, op)?;
    }

    if !draft.is_dirty() {
        return Ok(base.clone());
    }
    Ok(policy::adapt(draft.commit()?))
}

/// Convert `value` to the representation the adaptive policy prescribes
/// for its size: already-indexed values come back by identity, large
/// native containers are indexed, small native containers come back as a
/// shallow copy. Nested containers are left alone; they convert on
/// demand when a producer reaches them.
pub fn wrap(value: &Value) -> Value {
    match value {
        value if value.is_indexed() => value.clone(),
        Value::Seq(items) if items.len() < policy::ADAPT_CUTOFF => {
            Value::Seq(Arc::new(items.as_ref().clone()))
        }
        Value::Map(pairs) if pairs.len() < policy::ADAPT_CUTOFF => {
            Value::Map(Arc::new(pairs.as_ref().clone()))
        }
        Value::Set(keys) if keys.len() < policy::ADAPT_CUTOFF => {
            Value::Set(Arc::new(keys.as_ref().clone()))
        }
        Value::Rec(pairs) if pairs.len() < policy::ADAPT_CUTOFF => {
            Value::Rec(Arc::new(pairs.as_ref().clone()))
        }
        value => policy::promote(value),
    }
}

/// Rebuild `value` as a deep native copy: native values come back by
/// identity, indexed values are extracted recursively, child indexed
/// values included.
pub fn unwrap_value(value: &Value) -> Value {
    if !value.is_indexed() {
        return value.clone();
    }
    deep_native(value)
}

fn deep_native(value: &Value) -> Value {
    let native = policy::demote(value);
    match native {
        Value::Seq(items) => {
            let items = items.iter().map(unwrap_child).collect();
            Value::Seq(Arc::new(items))
        }
        Value::Map(pairs) => {
            let pairs = pairs
                .iter()
                .map(|(key, value)| (key.clone(), unwrap_child(value)))
                .collect();
            Value::Map(Arc::new(pairs))
        }
        Value::Rec(pairs) => {
            let pairs = pairs
                .iter()
                .map(|(name, value)| (Arc::clone(name), unwrap_child(value)))
                .collect();
            Value::Rec(Arc::new(pairs))
        }
        // set elements are keys, nothing nested to convert.
        native => native,
    }
}

fn unwrap_child(value: &Value) -> Value {
    if value.is_indexed() {
        deep_native(value)
    } else {
        value.clone()
    }
}

/// Whether `value` is currently backed by an indexed representation.
pub fn is_persistent(value: &Value) -> bool {
    value.is_indexed()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
