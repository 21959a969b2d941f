use std::sync::Arc;

use crate::{
    draft::{Draft, RecDraft},
    produce::ops::Op,
    value::{Kind, Value},
    Error, Result,
};

/// Apply one recorded operation onto the draft, walking its path through
/// nested record drafts. Operations on a wrong-kind target and walks
/// through missing properties are boundary violations.
pub(crate) fn apply_op(draft: &mut Draft, op: Op) -> Result<()> {
    match op {
        Op::Set { path, value } => {
            let (rec, name) = descend_to_parent(draft, &path)?;
            rec.set(name, value)
        }
        Op::Update { path, apply } => {
            let (rec, name) = descend_to_parent(draft, &path)?;
            let value = apply(rec.get(&name)?);
            rec.set(name, value)
        }
        Op::Delete { path } => {
            let (rec, name) = descend_to_parent(draft, &path)?;
            rec.delete(&name)?;
            Ok(())
        }
        Op::Merge { path, value } => {
            let rec = descend(draft, &path)?.as_rec_mut()?;
            match value {
                Value::Rec(pairs) => {
                    for (name, value) in pairs.iter() {
                        rec.set(Arc::clone(name), value.clone())?;
                    }
                    Ok(())
                }
                Value::IRec(omap) => {
                    for (name, value) in omap.iter() {
                        rec.set(Arc::clone(name), value.clone())?;
                    }
                    Ok(())
                }
                _ => err_at!(WrongKind, msg: "merge with a non-record"),
            }
        }
        Op::Push { path, value } => {
            descend(draft, &path)?.as_seq_mut()?.push(value);
            Ok(())
        }
        Op::Pop { path } => {
            descend(draft, &path)?.as_seq_mut()?.pop();
            Ok(())
        }
        Op::SetIndex { path, index, value } => {
            descend(draft, &path)?.as_seq_mut()?.set(index, value)
        }
        Op::Splice {
            path,
            off,
            del,
            values,
        } => descend(draft, &path)?.as_seq_mut()?.splice(off, del, values),
        Op::Retain { path, keep } => {
            descend(draft, &path)?.as_seq_mut()?.retain(|value| keep(value));
            Ok(())
        }
        Op::Add { path, key } => descend(draft, &path)?.as_set_mut()?.add(key),
        Op::DelElem { path, key } => {
            descend(draft, &path)?.as_set_mut()?.delete(&key)?;
            Ok(())
        }
        Op::MapSet { path, key, value } => {
            descend(draft, &path)?.as_map_mut()?.set(key, value)
        }
        Op::MapDel { path, key } => {
            descend(draft, &path)?.as_map_mut()?.delete(&key)?;
            Ok(())
        }
        Op::Clear { path } => {
            let target = descend(draft, &path)?;
            match target.kind() {
                Kind::Sequence => target.as_seq_mut()?.clear(),
                Kind::Mapping => target.as_map_mut()?.clear(),
                Kind::ElementSet => target.as_set_mut()?.clear(),
                Kind::Record => return err_at!(WrongKind, msg: "clear on record draft"),
            }
            Ok(())
        }
    }
}

// walk the full path, every segment selecting a nested container child.
fn descend<'a>(mut draft: &'a mut Draft, path: &[Arc<str>]) -> Result<&'a mut Draft> {
    for name in path.iter() {
        let rec = Draft::as_rec_mut(draft)?;
        draft = match RecDraft::child_mut(rec, name)? {
            Some(child) => child,
            None => return err_at!(KeyNotFound, msg: "no container at property {:?}", name),
        };
    }
    Ok(draft)
}

// walk to the record holding the path's final property, returning the
// record draft and that property name.
fn descend_to_parent<'a>(
    draft: &'a mut Draft,
    path: &[Arc<str>],
) -> Result<(&'a mut RecDraft, Arc<str>)> {
    let name = match path.last() {
        Some(name) => Arc::clone(name),
        None => return err_at!(InvalidInput, msg: "empty path addresses no property"),
    };
    let parent = descend(draft, &path[..path.len() - 1])?;
    Ok((Draft::as_rec_mut(parent)?, name))
}
