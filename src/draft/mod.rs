//! Module ``draft`` implement the recording draft surface.
//!
//! A draft presents the value under production to the recipe with
//! ordinary container semantics - index reads and writes on sequences,
//! keyed reads and writes on mappings, membership on sets, property
//! access on records. Writes that change nothing are not recorded, so an
//! untouched draft commits back to the input by identity. Records
//! materialize child drafts lazily on first access; commit rewrites only
//! dirty paths and reuses every unvisited child by identity.

mod map;
mod rec;
mod seq;
mod set;

pub use map::MapDraft;
pub use rec::RecDraft;
pub use seq::SeqDraft;
pub use set::SetDraft;

use std::sync::Arc;

use crate::{
    policy::ADAPT_CUTOFF,
    token::Token,
    value::{Key, Kind, Value},
    Error, Result,
};

/// Kind-dispatched recording draft, one flavor per container kind.
#[derive(Clone)]
pub enum Draft {
    Seq(SeqDraft),
    Map(MapDraft),
    Set(SetDraft),
    Rec(RecDraft),
}

impl Draft {
    /// Build a draft over `base`. Small native inputs draft over a
    /// shallow native copy; large native inputs draft over a freshly
    /// built indexed representation stamped with `token`; indexed inputs
    /// draft over the index structure itself.
    pub fn from_value(base: &Value, token: Token) -> Result<Draft> {
        let draft = match base.kind() {
            Some(Kind::Sequence) => Draft::Seq(SeqDraft::from_value(base, token)?),
            Some(Kind::Mapping) => Draft::Map(MapDraft::from_value(base, token)?),
            Some(Kind::ElementSet) => Draft::Set(SetDraft::from_value(base, token)?),
            Some(Kind::Record) => Draft::Rec(RecDraft::from_value(base, token)?),
            None => return err_at!(WrongKind, msg: "cannot draft a scalar"),
        };
        Ok(draft)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Draft::Seq(_) => Kind::Sequence,
            Draft::Map(_) => Kind::Mapping,
            Draft::Set(_) => Kind::ElementSet,
            Draft::Rec(_) => Kind::Record,
        }
    }

    /// Whether any recorded write changes the committed output.
    pub fn is_dirty(&self) -> bool {
        match self {
            Draft::Seq(draft) => draft.is_dirty(),
            Draft::Map(draft) => draft.is_dirty(),
            Draft::Set(draft) => draft.is_dirty(),
            Draft::Rec(draft) => draft.is_dirty(),
        }
    }

    /// Commit recorded writes into a value. The result carries the
    /// draft's working representation; the producer engine applies the
    /// adaptive policy on top.
    pub fn commit(self) -> Result<Value> {
        match self {
            Draft::Seq(draft) => draft.commit(),
            Draft::Map(draft) => draft.commit(),
            Draft::Set(draft) => draft.commit(),
            Draft::Rec(draft) => draft.commit(),
        }
    }

    /// Current effective value of the draft, without consuming it.
    pub fn preview(&self) -> Result<Value> {
        self.clone().commit()
    }

    pub fn as_seq_mut(&mut self) -> Result<&mut SeqDraft> {
        match self {
            Draft::Seq(draft) => Ok(draft),
            draft => err_at!(WrongKind, msg: "sequence op on {} draft", draft.kind()),
        }
    }

    pub fn as_map_mut(&mut self) -> Result<&mut MapDraft> {
        match self {
            Draft::Map(draft) => Ok(draft),
            draft => err_at!(WrongKind, msg: "mapping op on {} draft", draft.kind()),
        }
    }

    pub fn as_set_mut(&mut self) -> Result<&mut SetDraft> {
        match self {
            Draft::Set(draft) => Ok(draft),
            draft => err_at!(WrongKind, msg: "set op on {} draft", draft.kind()),
        }
    }

    pub fn as_rec_mut(&mut self) -> Result<&mut RecDraft> {
        match self {
            Draft::Rec(draft) => Ok(draft),
            draft => err_at!(WrongKind, msg: "record op on {} draft", draft.kind()),
        }
    }
}

// token-stamped builders, so that commit can keep mutating the freshly
// built structure in place.

pub(crate) fn build_vector<'a, I>(iter: I, token: &Token) -> crate::Vector<Value>
where
    I: Iterator<Item = &'a Value>,
{
    let mut vector = crate::Vector::new();
    for value in iter {
        vector = vector.push(value.clone(), Some(token));
    }
    vector
}

pub(crate) fn build_omap<'a, I>(iter: I, token: &Token) -> Result<crate::OMap<Key, Value>>
where
    I: Iterator<Item = (&'a Key, &'a Value)>,
{
    let mut omap = crate::OMap::new();
    for (key, value) in iter {
        omap = omap.set(key.clone(), value.clone(), Some(token))?.0;
    }
    Ok(omap)
}

pub(crate) fn build_oset<'a, I>(iter: I, token: &Token) -> Result<crate::OSet<Key>>
where
    I: Iterator<Item = &'a Key>,
{
    let mut oset = crate::OSet::new();
    for key in iter {
        oset = oset.insert(key.clone(), Some(token))?.0;
    }
    Ok(oset)
}

pub(crate) fn build_orec<'a, I>(iter: I, token: &Token) -> Result<crate::OMap<Arc<str>, Value>>
where
    I: Iterator<Item = (&'a Arc<str>, &'a Value)>,
{
    let mut omap = crate::OMap::new();
    for (name, value) in iter {
        omap = omap.set(Arc::clone(name), value.clone(), Some(token))?.0;
    }
    Ok(omap)
}

// whether a native container of `len` elements should draft over the
// indexed representation from the start.
#[inline]
pub(crate) fn draft_indexed(len: usize) -> bool {
    len >= ADAPT_CUTOFF
}
