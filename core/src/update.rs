//! Immutable updates of instances.
//!
//! [`apply_patch`] produces a patched copy, copying only the containers along
//! the patched paths; everything else keeps its reference. Copies are
//! unbranded and unfrozen, so the owning type re-validates them with
//! [`Type::update`](crate::Type::update).

use crate::{
    Box, Vec,
    api::{Error, Runtime},
    format,
    values::{Value, stringify},
};

/// Computes a new value from the current one.
pub type ApplyFn<'a> = dyn Fn(Value<'a>) -> Value<'a> + 'a;

/// Removes `delete` elements at `start` and inserts `insert` in their place.
#[derive(Debug, Clone)]
pub struct Splice<'a> {
    pub start: usize,
    pub delete: usize,
    pub insert: Vec<Value<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKey<'a> {
    Field(&'a str),
    Index(usize),
}

/// A single update command.
pub enum Patch<'a> {
    /// Replaces the value.
    Set(Value<'a>),
    /// Replaces the value with `f(value)`.
    Apply(Box<ApplyFn<'a>>),
    /// Appends to an array.
    Push(Vec<Value<'a>>),
    /// Prepends to an array.
    Unshift(Vec<Value<'a>>),
    Splice(Vec<Splice<'a>>),
    /// Removes keys from an object.
    Remove(Vec<&'a str>),
    /// Swaps two array elements.
    Swap { from: usize, to: usize },
    /// Shallow-merges fields into an object.
    Merge(Vec<(&'a str, Value<'a>)>),
    /// Applies nested patches to fields or elements.
    At(Vec<(PatchKey<'a>, Patch<'a>)>),
}

impl<'a> Patch<'a> {
    pub fn apply<F>(f: F) -> Self
    where
        F: Fn(Value<'a>) -> Value<'a> + 'a,
    {
        Patch::Apply(Box::new(f))
    }

    pub fn field(name: &'a str, patch: Patch<'a>) -> Self {
        Patch::At(alloc::vec![(PatchKey::Field(name), patch)])
    }

    pub fn index(index: usize, patch: Patch<'a>) -> Self {
        Patch::At(alloc::vec![(PatchKey::Index(index), patch)])
    }
}

/// Applies `patch` to `value` without mutating it.
pub fn apply_patch<'a>(
    rt: &Runtime<'a>,
    value: Value<'a>,
    patch: &Patch<'a>,
) -> Result<Value<'a>, Error> {
    match patch {
        Patch::Set(v) => Ok(*v),
        Patch::Apply(f) => Ok(f(value)),
        Patch::Push(items) => {
            let mut out = array_items(value, "push")?;
            out.extend_from_slice(items);
            Ok(rt.array(out))
        }
        Patch::Unshift(items) => {
            let mut out = items.clone();
            out.extend(array_items(value, "unshift")?);
            Ok(rt.array(out))
        }
        Patch::Splice(splices) => {
            let mut out = array_items(value, "splice")?;
            for splice in splices {
                if splice.start > out.len() {
                    return Err(Error::invalid_update(format!(
                        "splice start {} is out of bounds for length {}",
                        splice.start,
                        out.len()
                    )));
                }
                let end = (splice.start + splice.delete).min(out.len());
                let _ = out.splice(splice.start..end, splice.insert.iter().copied());
            }
            Ok(rt.array(out))
        }
        Patch::Swap { from, to } => {
            let mut out = array_items(value, "swap")?;
            if *from >= out.len() || *to >= out.len() {
                return Err(Error::invalid_update(format!(
                    "swap indices {} and {} are out of bounds for length {}",
                    from,
                    to,
                    out.len()
                )));
            }
            out.swap(*from, *to);
            Ok(rt.array(out))
        }
        Patch::Remove(keys) => {
            let mut out = object_entries(value, "remove")?;
            out.retain(|(k, _)| !keys.contains(k));
            Ok(rt.object(out))
        }
        Patch::Merge(fields) => {
            let mut out = object_entries(value, "merge")?;
            for &(key, field) in fields {
                match out.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = field,
                    None => out.push((key, field)),
                }
            }
            Ok(rt.object(out))
        }
        Patch::At(entries) => apply_nested(rt, value, entries),
    }
}

fn apply_nested<'a>(
    rt: &Runtime<'a>,
    value: Value<'a>,
    entries: &[(PatchKey<'a>, Patch<'a>)],
) -> Result<Value<'a>, Error> {
    match value {
        Value::Object(obj) => {
            let mut out = obj.entries();
            let mut changed = false;
            for (key, patch) in entries {
                let PatchKey::Field(name) = *key else {
                    return Err(Error::invalid_update("index patch applied to an object"));
                };
                let current = obj.get(name).unwrap_or(Value::Nil);
                let next = apply_patch(rt, current, patch)?;
                if next.same(current) && obj.contains_key(name) {
                    continue;
                }
                changed = true;
                match out.iter_mut().find(|(k, _)| *k == name) {
                    Some(entry) => entry.1 = next,
                    None => out.push((name, next)),
                }
            }
            Ok(if changed { rt.object(out) } else { value })
        }
        Value::Array(arr) => {
            let mut out = arr.to_vec();
            let mut changed = false;
            for (key, patch) in entries {
                let PatchKey::Index(i) = *key else {
                    return Err(Error::invalid_update("field patch applied to an array"));
                };
                let Some(current) = out.get(i).copied() else {
                    return Err(Error::invalid_update(format!(
                        "index {} is out of bounds for length {}",
                        i,
                        out.len()
                    )));
                };
                let next = apply_patch(rt, current, patch)?;
                if !next.same(current) {
                    out[i] = next;
                    changed = true;
                }
            }
            Ok(if changed { rt.array(out) } else { value })
        }
        other => Err(Error::invalid_update(format!(
            "cannot apply nested patch to {}",
            stringify(other)
        ))),
    }
}

fn array_items<'a>(value: Value<'a>, command: &str) -> Result<Vec<Value<'a>>, Error> {
    match value {
        Value::Array(arr) => Ok(arr.to_vec()),
        other => Err(Error::invalid_update(format!(
            "{} expects an array, got {}",
            command,
            stringify(other)
        ))),
    }
}

fn object_entries<'a>(value: Value<'a>, command: &str) -> Result<Vec<(&'a str, Value<'a>)>, Error> {
    match value {
        Value::Object(obj) => Ok(obj.entries()),
        other => Err(Error::invalid_update(format!(
            "{} expects an object, got {}",
            command,
            stringify(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_set_copies_only_the_path() {
        let arena = Bump::new();
        let rt = Runtime::new(&arena);
        let inner = rt.object([("x", Value::from(1))]);
        let other = rt.array([Value::from(1)]);
        let outer = rt.object([("inner", inner), ("other", other)]);

        let patch = Patch::field("inner", Patch::field("x", Patch::Set(Value::from(2))));
        let patched = apply_patch(&rt, outer, &patch).unwrap();

        assert!(!patched.same(outer));
        assert_eq!(patched.get("other"), other);
        assert_eq!(patched.get("inner").get("x"), Value::from(2));
        assert_eq!(inner.get("x"), Value::from(1));
    }

    #[test]
    fn test_unchanged_patch_keeps_reference() {
        let arena = Bump::new();
        let rt = Runtime::new(&arena);
        let value = rt.object([("x", Value::from(1))]);
        let patch = Patch::field("x", Patch::Set(Value::from(1)));
        assert_eq!(apply_patch(&rt, value, &patch).unwrap(), value);
    }

    #[test]
    fn test_array_commands() {
        let arena = Bump::new();
        let rt = Runtime::new(&arena);
        let arr = rt.array([Value::from(1), Value::from(2), Value::from(3)]);

        let pushed = apply_patch(&rt, arr, &Patch::Push(alloc::vec![Value::from(4)])).unwrap();
        assert_eq!(pushed.to_string(), "[1,2,3,4]");

        let unshifted = apply_patch(&rt, arr, &Patch::Unshift(alloc::vec![Value::from(0)])).unwrap();
        assert_eq!(unshifted.to_string(), "[0,1,2,3]");

        let spliced = apply_patch(
            &rt,
            arr,
            &Patch::Splice(alloc::vec![Splice {
                start: 1,
                delete: 1,
                insert: alloc::vec![Value::from(9), Value::from(8)],
            }]),
        )
        .unwrap();
        assert_eq!(spliced.to_string(), "[1,9,8,3]");

        let swapped = apply_patch(&rt, arr, &Patch::Swap { from: 0, to: 2 }).unwrap();
        assert_eq!(swapped.to_string(), "[3,2,1]");
        assert_eq!(arr.to_string(), "[1,2,3]");
    }

    #[test]
    fn test_object_commands() {
        let arena = Bump::new();
        let rt = Runtime::new(&arena);
        let obj = rt.object([("a", Value::from(1)), ("b", Value::from(2))]);

        let removed = apply_patch(&rt, obj, &Patch::Remove(alloc::vec!["a"])).unwrap();
        assert_eq!(removed.to_string(), r#"{"b":2}"#);

        let merged = apply_patch(
            &rt,
            obj,
            &Patch::Merge(alloc::vec![("b", Value::from(3)), ("c", Value::from(4))]),
        )
        .unwrap();
        assert_eq!(merged.to_string(), r#"{"a":1,"b":3,"c":4}"#);

        let applied = apply_patch(
            &rt,
            obj,
            &Patch::field("a", Patch::apply(|v| Value::Number(v.as_number().unwrap_or(0.0) * 10.0))),
        )
        .unwrap();
        assert_eq!(applied.get("a"), Value::from(10));
    }

    #[test]
    fn test_misapplied_commands() {
        let arena = Bump::new();
        let rt = Runtime::new(&arena);
        let err = apply_patch(&rt, Value::from(1), &Patch::Push(alloc::vec![])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid update: push expects an array, got 1");

        let arr = rt.array([Value::from(1)]);
        let err = apply_patch(&rt, arr, &Patch::Swap { from: 0, to: 5 }).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid update: swap indices 0 and 5 are out of bounds for length 1"
        );
    }
}
