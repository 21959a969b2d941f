use std::sync::Arc;

use crate::{draft, token::Token, value::Value, vector::Vector, Error, Result};

/// Recording draft over a sequence.
#[derive(Clone)]
pub struct SeqDraft {
    token: Token,
    dirty: bool,
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Native(Vec<Value>),
    Indexed(Vector<Value>),
}

impl SeqDraft {
    pub(crate) fn from_value(base: &Value, token: Token) -> Result<SeqDraft> {
        let repr = match base {
            Value::Seq(items) if draft::draft_indexed(items.len()) => {
                Repr::Indexed(draft::build_vector(items.iter(), &token))
            }
            Value::Seq(items) => Repr::Native(items.as_ref().clone()),
            Value::ISeq(vector) => Repr::Indexed(vector.as_ref().clone()),
            _ => return err_at!(WrongKind, msg: "sequence draft over non-sequence"),
        };
        Ok(SeqDraft {
            token,
            dirty: false,
            repr,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Native(items) => items.len(),
            Repr::Indexed(vector) => vector.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the element at `index`, or None when out of range.
    pub fn get(&self, index: usize) -> Option<Value> {
        match &self.repr {
            Repr::Native(items) => items.get(index).cloned(),
            Repr::Indexed(vector) => vector.get(index).cloned(),
        }
    }

    /// Overwrite the element at `index`. Writing the present value is not
    /// recorded. Out of range is a fatal boundary violation.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        match self.get(index) {
            Some(old) if old == value => return Ok(()),
            Some(_) => (),
            None => return err_at!(IndexOutofBound, msg: "set index {}/{}", index, self.len()),
        }

        match &mut self.repr {
            Repr::Native(items) => items[index] = value,
            Repr::Indexed(vector) => *vector = vector.set(index, value, Some(&self.token))?,
        }
        self.dirty = true;
        Ok(())
    }

    pub fn push(&mut self, value: Value) {
        match &mut self.repr {
            Repr::Native(items) => items.push(value),
            Repr::Indexed(vector) => *vector = vector.push(value, Some(&self.token)),
        }
        self.dirty = true;
    }

    /// Drop and return the right-most element; popping an empty draft is
    /// a no-op absence.
    pub fn pop(&mut self) -> Option<Value> {
        let value = match &mut self.repr {
            Repr::Native(items) => items.pop(),
            Repr::Indexed(vector) => {
                let (v, value) = vector.pop(Some(&self.token));
                *vector = v;
                value
            }
        };
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    /// Replace the `del` elements starting at `off` with `values`.
    pub fn splice(&mut self, off: usize, del: usize, values: Vec<Value>) -> Result<()> {
        let n = self.len();
        if off > n || off + del > n {
            return err_at!(IndexOutofBound, msg: "splice {}+{}/{}", off, del, n);
        }
        if del == 0 && values.is_empty() {
            return Ok(());
        }

        match &mut self.repr {
            Repr::Native(items) => {
                items.splice(off..off + del, values);
            }
            Repr::Indexed(vector) => {
                let mut out = Vector::new();
                for value in vector.iter().take(off) {
                    out = out.push(value.clone(), Some(&self.token));
                }
                for value in values {
                    out = out.push(value, Some(&self.token));
                }
                for value in vector.iter().skip(off + del) {
                    out = out.push(value.clone(), Some(&self.token));
                }
                *vector = out;
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Keep only the elements `keep` approves, preserving their order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Value) -> bool,
    {
        let n = self.len();
        match &mut self.repr {
            Repr::Native(items) => items.retain(|value| keep(value)),
            Repr::Indexed(vector) => {
                let kept: Vector<Value> = {
                    let mut out = Vector::new();
                    for value in vector.iter().filter(|value| keep(value)) {
                        out = out.push(value.clone(), Some(&self.token));
                    }
                    out
                };
                *vector = kept;
            }
        }
        if self.len() != n {
            self.dirty = true;
        }
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        if self.len() == 0 {
            return;
        }
        match &mut self.repr {
            Repr::Native(items) => items.clear(),
            Repr::Indexed(vector) => *vector = Vector::new(),
        }
        self.dirty = true;
    }

    /// Copy out the current elements, element for element.
    pub fn to_vec(&self) -> Vec<Value> {
        match &self.repr {
            Repr::Native(items) => items.clone(),
            Repr::Indexed(vector) => vector.to_vec(),
        }
    }

    pub(crate) fn commit(self) -> Result<Value> {
        let value = match self.repr {
            Repr::Native(items) => Value::Seq(Arc::new(items)),
            Repr::Indexed(vector) => Value::ISeq(Arc::new(vector)),
        };
        Ok(value)
    }
}
