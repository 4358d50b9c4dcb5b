use crate::{
    api::Error,
    hydrate::{Hydration, Path},
    types::{Combinator, Meta, Predicate},
    values::{IdentitySet, Value},
};

/// A leaf type defined by a predicate.
pub struct IrreducibleType<'a> {
    name: &'a str,
    predicate: &'a Predicate<'a>,
}

impl<'a> IrreducibleType<'a> {
    pub(crate) fn new(name: &'a str, predicate: &'a Predicate<'a>) -> Self {
        Self { name, predicate }
    }
}

impl<'a> Combinator<'a> for IrreducibleType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Irreducible {
            predicate: self.predicate,
        }
    }

    fn matches(&self, value: Value<'a>, _seen: &mut IdentitySet) -> Result<bool, Error> {
        Ok((self.predicate)(value))
    }

    fn hydrate(
        &'a self,
        _cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        if (self.predicate)(value) {
            Ok(value)
        } else {
            Err(path.bad_value(value, None))
        }
    }
}

pub(crate) fn is_finite_number(value: Value<'_>) -> bool {
    matches!(value, Value::Number(n) if n.is_finite())
}

pub(crate) fn is_integer(value: Value<'_>) -> bool {
    matches!(value, Value::Number(n) if n % 1.0 == 0.0)
}
