use crate::{
    api::Error,
    hydrate::{Hydration, Path},
    types::{Combinator, Meta, Type},
    values::{IdentitySet, Value},
};

/// `ty` or nil.
pub struct MaybeType<'a> {
    name: &'a str,
    ty: Type<'a>,
}

impl<'a> MaybeType<'a> {
    pub(crate) fn new(name: &'a str, ty: Type<'a>) -> Self {
        Self { name, ty }
    }
}

impl<'a> Combinator<'a> for MaybeType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Maybe { ty: self.ty }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        if value.is_nil() {
            return Ok(true);
        }
        self.ty.matches_in(value, seen)
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        if value.is_nil() {
            return Ok(Value::Nil);
        }
        cx.hydrate(self.ty, value, path)
    }
}
