use std::sync::Arc;

use crate::{
    draft::{self, Draft},
    omap::OMap,
    token::Token,
    value::Value,
    Error, Result,
};

/// Recording draft over a record.
///
/// Property writes are recorded as an edit slot per property name; the
/// base representation is never touched until commit. Reading a nested
/// container through [RecDraft::child_mut] materializes a child draft
/// bound to the same token, so a recipe can descend any number of record
/// levels and only the dirty paths are rewritten on commit. Unvisited
/// children are reused by identity.
#[derive(Clone)]
pub struct RecDraft {
    token: Token,
    repr: Repr,
    edits: Vec<(Arc<str>, Edit)>,
}

#[derive(Clone)]
enum Repr {
    Native(Vec<(Arc<str>, Value)>),
    Indexed(OMap<Arc<str>, Value>),
}

#[derive(Clone)]
struct Edit {
    // a property deleted and written back moves to the end of the
    // iteration order, like a fresh insertion.
    fresh: bool,
    op: EditOp,
}

#[derive(Clone)]
enum EditOp {
    Set(Value),
    Delete,
    Child {
        draft: Box<Draft>,
        // a child materialized out of an already-recorded overwrite
        // stays a change even when the recipe leaves the draft clean.
        forced: bool,
    },
}

impl RecDraft {
    pub(crate) fn from_value(base: &Value, token: Token) -> Result<RecDraft> {
        let repr = match base {
            Value::Rec(pairs) if draft::draft_indexed(pairs.len()) => {
                Repr::Indexed(draft::build_orec(pairs.iter().map(|(k, v)| (k, v)), &token)?)
            }
            Value::Rec(pairs) => Repr::Native(pairs.as_ref().clone()),
            Value::IRec(omap) => Repr::Indexed(omap.as_ref().clone()),
            _ => return err_at!(WrongKind, msg: "record draft over non-record"),
        };
        Ok(RecDraft {
            token,
            repr,
            edits: Vec::default(),
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.edits.iter().any(|(_, edit)| match &edit.op {
            EditOp::Set(_) | EditOp::Delete => true,
            EditOp::Child { draft, forced } => *forced || draft.is_dirty(),
        })
    }

    fn base_get(&self, name: &str) -> Option<Value> {
        match &self.repr {
            Repr::Native(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_ref() == name)
                .map(|(_, value)| value.clone()),
            Repr::Indexed(omap) => omap.get(name).cloned(),
        }
    }

    fn edit_of(&self, name: &str) -> Option<&Edit> {
        self.edits
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, edit)| edit)
    }

    /// Read the property `name`'s current effective value.
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        match self.edit_of(name).map(|edit| &edit.op) {
            Some(EditOp::Set(value)) => Ok(Some(value.clone())),
            Some(EditOp::Delete) => Ok(None),
            Some(EditOp::Child { draft, .. }) => Ok(Some(draft.preview()?)),
            None => Ok(self.base_get(name)),
        }
    }

    pub fn has(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.is_some())
    }

    /// The current effective property count.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the property `name`. Writing the present value is not
    /// recorded.
    pub fn set<S>(&mut self, name: S, value: Value) -> Result<()>
    where
        S: Into<Arc<str>>,
    {
        let name: Arc<str> = name.into();
        match self.get(&name)? {
            Some(old) if old == value => return Ok(()),
            _ => (),
        }

        match self.slot_of(&name) {
            Some(off) => {
                let edit = &mut self.edits[off].1;
                // writing over a recorded delete re-inserts at the end.
                edit.fresh = edit.fresh || matches!(edit.op, EditOp::Delete);
                edit.op = EditOp::Set(value);
            }
            None => {
                let edit = Edit {
                    fresh: false,
                    op: EditOp::Set(value),
                };
                self.edits.push((name, edit));
            }
        }
        Ok(())
    }

    /// Remove the property `name`; removing an absent property is a
    /// no-op absence. Returns whether a property was removed.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        if self.get(name)?.is_none() {
            return Ok(false);
        }

        let op = EditOp::Delete;
        match self.slot_of(name) {
            Some(off) => {
                self.edits[off].1 = Edit { fresh: false, op };
            }
            None => {
                self.edits.push((Arc::from(name), Edit { fresh: false, op }));
            }
        }
        Ok(true)
    }

    /// Borrow a draft of the nested container at property `name`,
    /// materializing it on first access. Scalar or absent properties
    /// return None.
    pub fn child_mut(&mut self, name: &str) -> Result<Option<&mut Draft>> {
        let off = match self.slot_of(name) {
            Some(off) => {
                let differs = match &self.edits[off].1.op {
                    EditOp::Child { .. } => None,
                    EditOp::Delete => return Ok(None),
                    EditOp::Set(value) if value.kind().is_none() => return Ok(None),
                    EditOp::Set(value) => Some(Draft::from_value(value, self.token.clone())?),
                };
                if let Some(child) = differs {
                    let edit = &mut self.edits[off].1;
                    edit.op = EditOp::Child {
                        draft: Box::new(child),
                        forced: true,
                    };
                }
                off
            }
            None => match self.base_get(name) {
                Some(value) if value.kind().is_some() => {
                    let child = Draft::from_value(&value, self.token.clone())?;
                    let edit = Edit {
                        fresh: false,
                        op: EditOp::Child {
                            draft: Box::new(child),
                            forced: false,
                        },
                    };
                    self.edits.push((Arc::from(name), edit));
                    self.edits.len() - 1
                }
                _ => return Ok(None),
            },
        };

        match &mut self.edits[off].1.op {
            EditOp::Child { draft, .. } => Ok(Some(draft.as_mut())),
            _ => unreachable!(),
        }
    }

    /// Current effective property names: base order first, fresh
    /// properties appended in first-write order.
    pub fn keys(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = vec![];
        let base: Vec<Arc<str>> = match &self.repr {
            Repr::Native(pairs) => pairs.iter().map(|(k, _)| Arc::clone(k)).collect(),
            Repr::Indexed(omap) => omap.iter().map(|(k, _)| Arc::clone(k)).collect(),
        };
        for name in base {
            match self.edit_of(&name) {
                Some(edit) if matches!(edit.op, EditOp::Delete) => (),
                Some(edit) if edit.fresh => (),
                _ => names.push(name),
            }
        }
        for (name, edit) in self.edits.iter() {
            let appended = edit.fresh || self.base_get(name).is_none();
            match edit.op {
                EditOp::Delete => (),
                _ if appended => names.push(Arc::clone(name)),
                _ => (),
            }
        }
        names
    }

    fn slot_of(&self, name: &str) -> Option<usize> {
        self.edits.iter().position(|(k, _)| k.as_ref() == name)
    }

    pub(crate) fn commit(self) -> Result<Value> {
        let token = self.token;
        match self.repr {
            Repr::Native(mut pairs) => {
                for (name, edit) in self.edits {
                    Self::commit_native(&mut pairs, name, edit)?;
                }
                Ok(Value::Rec(Arc::new(pairs)))
            }
            Repr::Indexed(mut omap) => {
                for (name, edit) in self.edits {
                    omap = Self::commit_indexed(omap, name, edit, &token)?;
                }
                Ok(Value::IRec(Arc::new(omap)))
            }
        }
    }

    fn commit_native(pairs: &mut Vec<(Arc<str>, Value)>, name: Arc<str>, edit: Edit) -> Result<()> {
        let value = match edit.op {
            EditOp::Set(value) => Some(value),
            EditOp::Delete => None,
            EditOp::Child { draft, forced } if forced || draft.is_dirty() => Some(draft.commit()?),
            // untouched child, base value reused by identity.
            EditOp::Child { .. } => return Ok(()),
        };

        let off = pairs.iter().position(|(k, _)| *k == name);
        match (value, off) {
            (Some(value), Some(off)) if edit.fresh => {
                pairs.remove(off);
                pairs.push((name, value));
            }
            (Some(value), Some(off)) => pairs[off].1 = value,
            (Some(value), None) => pairs.push((name, value)),
            (None, Some(off)) => {
                pairs.remove(off);
            }
            (None, None) => (),
        }
        Ok(())
    }

    fn commit_indexed(
        omap: OMap<Arc<str>, Value>,
        name: Arc<str>,
        edit: Edit,
        token: &Token,
    ) -> Result<OMap<Arc<str>, Value>> {
        let value = match edit.op {
            EditOp::Set(value) => Some(value),
            EditOp::Delete => None,
            EditOp::Child { draft, forced } if forced || draft.is_dirty() => Some(draft.commit()?),
            EditOp::Child { .. } => return Ok(omap),
        };

        match value {
            Some(value) if edit.fresh => {
                let (omap, _) = omap.remove(name.as_ref(), Some(token))?;
                Ok(omap.set(name, value, Some(token))?.0)
            }
            Some(value) => Ok(omap.set(name, value, Some(token))?.0),
            None => Ok(omap.remove(name.as_ref(), Some(token))?.0),
        }
    }
}
