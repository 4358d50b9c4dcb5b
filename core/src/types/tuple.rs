//! Fixed-length arrays with cycle-safe hydration.
//!
//! The output array is allocated and registered before it is filled, like a
//! struct. Unlike a struct, a tuple reports a real idempotency verdict: when
//! every element hydrates to its own input and no cycle re-entered the value,
//! the input array itself is frozen and returned. A frozen array that already
//! matches is returned untouched, which keeps cyclic instances idempotent.

use crate::{
    api::Error,
    format,
    hydrate::{Hydration, Path, Segment},
    types::{Combinator, Meta, Type, TypeKey, matches_once},
    values::{IdentitySet, Value, ValueId},
};

pub struct TupleType<'a> {
    name: &'a str,
    types: &'a [Type<'a>],
}

impl<'a> TupleType<'a> {
    pub(crate) fn new(name: &'a str, types: &'a [Type<'a>]) -> Self {
        Self { name, types }
    }
}

impl<'a> Combinator<'a> for TupleType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Tuple { types: self.types }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        let Value::Array(items) = value else {
            return Ok(false);
        };
        if items.len() != self.types.len() {
            return Ok(false);
        }
        matches_once(seen, ValueId::of(items), TypeKey::of(self), |seen| {
            for (ty, item) in self.types.iter().zip(items.to_vec()) {
                if !ty.matches_in(item, seen)? {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        let len = self.types.len();
        let raw = match value {
            Value::Array(items) if items.len() == len => items,
            _ => {
                return Err(path.bad_value(value, Some(format!("an array of length {}", len))));
            }
        };

        if raw.is_frozen() && self.matches(value, &mut IdentitySet::new())? {
            return Ok(value);
        }

        let key = TypeKey::of(self);
        let id = ValueId::of(raw);
        if let Some(result) = cx.state().lookup(id, key) {
            return Ok(result);
        }

        let out = cx
            .runtime()
            .alloc_array(core::iter::repeat_n(Value::Nil, len));
        let result = Value::Array(out);
        cx.state().register(id, key, result);
        cx.state().enter(id, key);

        let items = raw.to_vec();
        let mut unchanged = true;
        loop {
            let i = cx.state().cursor(id, key);
            if i >= len {
                break;
            }
            let ty = self.types[i];
            let hydrated = cx.hydrate_at(ty, items[i], path, Segment::Index(i, ty.name()))?;
            unchanged &= hydrated.same(items[i]);
            out.fill(i, hydrated);
            cx.state().advance(id, key);
        }
        cx.state().leave(id, key);

        if unchanged && cx.state().is_idempotent(id, key) {
            tracing::debug!(ty = self.name, ?id, "Reusing input array");
            raw.freeze();
            cx.state().resolve(id, key, value);
            return Ok(value);
        }
        out.freeze();
        cx.state().resolve(id, key, result);
        Ok(result)
    }
}
