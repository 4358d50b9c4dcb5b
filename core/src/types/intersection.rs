use crate::{
    api::Error,
    hydrate::{Hydration, Path, Segment},
    types::{Combinator, Meta, Type},
    values::{IdentitySet, Value},
};

/// Values satisfying every member type. Members are checked in order and the
/// first failure is reported; the value itself is returned unchanged.
pub struct IntersectionType<'a> {
    name: &'a str,
    types: &'a [Type<'a>],
}

impl<'a> IntersectionType<'a> {
    pub(crate) fn new(name: &'a str, types: &'a [Type<'a>]) -> Self {
        Self { name, types }
    }
}

impl<'a> Combinator<'a> for IntersectionType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Intersection { types: self.types }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        for ty in self.types {
            if !ty.matches_in(value, seen)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn hydrate(
        &'a self,
        _cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        for ty in self.types {
            if !ty.matches(value)? {
                path.push(Segment::Label(ty.name()));
                let err = path.bad_value(value, None);
                path.pop();
                return Err(err);
            }
        }
        Ok(value)
    }
}
