//! Module ``policy`` implement the adaptive representation policy.
//!
//! Small containers stay in their native layout, where linear scans beat
//! tree walks; large containers move to the indexed layout, where writes
//! share structure instead of copying. The cutoff applies uniformly to
//! all four kinds at the element-count boundary, and transitions happen
//! only at operation boundaries - a no-op bypasses the policy entirely
//! and keeps the input's identity.

use std::sync::Arc;

use crate::value::Value;

/// Element count at which a native container is promoted to the indexed
/// representation, and below which an indexed container is demoted back.
pub const ADAPT_CUTOFF: usize = 512;

/// Apply the representation policy to a post-mutation value.
pub(crate) fn adapt(value: Value) -> Value {
    match value.len() {
        Some(n) if n >= ADAPT_CUTOFF && !value.is_indexed() => promote(&value),
        Some(n) if n < ADAPT_CUTOFF && value.is_indexed() => demote(&value),
        _ => value,
    }
}

/// Build the indexed representation of a native container. The
/// conversion is shallow, children keep their own representations.
pub(crate) fn promote(value: &Value) -> Value {
    match value {
        Value::Seq(items) => {
            let vector: crate::Vector<Value> = items.iter().cloned().collect();
            Value::ISeq(Arc::new(vector))
        }
        Value::Map(pairs) => {
            let omap: crate::OMap<crate::Key, Value> = pairs.iter().cloned().collect();
            Value::IMap(Arc::new(omap))
        }
        Value::Set(keys) => {
            let oset: crate::OSet<crate::Key> = keys.iter().cloned().collect();
            Value::ISet(Arc::new(oset))
        }
        Value::Rec(pairs) => {
            let omap: crate::OMap<Arc<str>, Value> = pairs.iter().cloned().collect();
            Value::IRec(Arc::new(omap))
        }
        value => value.clone(),
    }
}

/// Extract the native representation out of an indexed container. The
/// conversion is shallow, children keep their own representations.
pub(crate) fn demote(value: &Value) -> Value {
    match value {
        Value::ISeq(vector) => Value::Seq(Arc::new(vector.to_vec())),
        Value::IMap(omap) => {
            let pairs = omap.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            Value::Map(Arc::new(pairs))
        }
        Value::ISet(oset) => Value::Set(Arc::new(oset.iter().cloned().collect())),
        Value::IRec(omap) => {
            let pairs = omap.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            Value::Rec(Arc::new(pairs))
        }
        value => value.clone(),
    }
}
