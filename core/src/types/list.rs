use crate::{
    Vec,
    api::Error,
    hydrate::{Hydration, Path, Segment},
    types::{Combinator, Meta, Type, TypeKey, matches_once},
    values::{IdentitySet, Value, ValueId},
};

/// Homogeneous arrays. Elements already satisfying the element type are kept
/// as-is; the input array is reused when no element changed.
pub struct ListType<'a> {
    name: &'a str,
    ty: Type<'a>,
}

impl<'a> ListType<'a> {
    pub(crate) fn new(name: &'a str, ty: Type<'a>) -> Self {
        Self { name, ty }
    }
}

impl<'a> Combinator<'a> for ListType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::List { ty: self.ty }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        let Value::Array(items) = value else {
            return Ok(false);
        };
        matches_once(seen, ValueId::of(items), TypeKey::of(self), |seen| {
            for item in items.to_vec() {
                if !self.ty.matches_in(item, seen)? {
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
        let Value::Array(raw) = value else {
            return Err(path.bad_value(value, Some("an array".into())));
        };
        let key = TypeKey::of(self);
        let id = ValueId::of(raw);
        if let Some(result) = cx.state().lookup(id, key) {
            return Ok(result);
        }
        if !cx.state().enter(id, key) {
            return Err(path.bad_value(value, Some("an acyclic value".into())));
        }

        let items = raw.to_vec();
        let mut out = Vec::with_capacity(items.len());
        let mut unchanged = true;
        for (i, &item) in items.iter().enumerate() {
            let hydrated = if self.ty.matches(item)? {
                item
            } else {
                cx.hydrate_at(self.ty, item, path, Segment::Index(i, self.ty.name()))?
            };
            unchanged &= hydrated.same(item);
            out.push(hydrated);
        }
        cx.state().leave(id, key);

        let result = if unchanged {
            raw.freeze();
            value
        } else {
            let copy = cx.runtime().alloc_array(out);
            copy.freeze();
            Value::Array(copy)
        };
        cx.state().remember(id, key, result);
        Ok(result)
    }
}
