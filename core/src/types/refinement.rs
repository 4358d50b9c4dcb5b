use crate::{
    api::Error,
    hydrate::{Hydration, Path},
    types::{Combinator, Meta, Predicate, Type},
    values::{IdentitySet, Value},
};

/// Values of `ty` that also satisfy a predicate.
pub struct RefinementType<'a> {
    name: &'a str,
    ty: Type<'a>,
    predicate: &'a Predicate<'a>,
}

impl<'a> RefinementType<'a> {
    pub(crate) fn new(name: &'a str, ty: Type<'a>, predicate: &'a Predicate<'a>) -> Self {
        Self {
            name,
            ty,
            predicate,
        }
    }
}

impl<'a> Combinator<'a> for RefinementType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Refinement {
            ty: self.ty,
            predicate: self.predicate,
        }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        Ok(self.ty.matches_in(value, seen)? && (self.predicate)(value))
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        let instance = cx.hydrate(self.ty, value, path)?;
        if (self.predicate)(instance) {
            Ok(instance)
        } else {
            Err(path.bad_value(value, None))
        }
    }
}
