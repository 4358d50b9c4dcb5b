//! Tagged alternatives chosen by an explicit dispatch function.

use crate::{
    api::Error,
    hydrate::{Hydration, Path, Segment},
    types::{Combinator, Meta, Type},
    values::{IdentitySet, Value},
};
use bumpalo::Bump;
use core::cell::Cell;

/// Chooses the member type that should build a value.
pub type DispatchFn<'a> = dyn Fn(Value<'a>) -> Option<Type<'a>> + 'a;

pub struct UnionType<'a> {
    name: &'a str,
    types: &'a [Type<'a>],
    dispatch: Cell<Option<&'a DispatchFn<'a>>>,
    arena: &'a Bump,
}

impl<'a> UnionType<'a> {
    pub(crate) fn new(name: &'a str, types: &'a [Type<'a>], arena: &'a Bump) -> Self {
        Self {
            name,
            types,
            dispatch: Cell::new(None),
            arena,
        }
    }
}

impl<'a> Combinator<'a> for UnionType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Union { types: self.types }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        for ty in self.types {
            if ty.matches_in(value, seen)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        let Some(ty) = self.dispatch(value)? else {
            return Err(path.no_constructor(value));
        };
        let depth = path.depth();
        path.push(Segment::Dispatched(ty.name()));
        let result = cx.hydrate(ty, value, path);
        path.pop();
        match result {
            // The chosen type rejected the value as a whole, not one of its
            // fields: dispatch picked the wrong constructor.
            Err(Error::BadValue { path: failed, .. }) if failed.len() == depth => {
                Err(path.no_constructor(value))
            }
            other => other,
        }
    }

    fn dispatch(&self, value: Value<'a>) -> Result<Option<Type<'a>>, Error> {
        match self.dispatch.get() {
            Some(dispatch) => Ok(dispatch(value)),
            None => Err(Error::UnimplementedDispatch {
                union: self.name.into(),
            }),
        }
    }
}

/// Handle to a union type.
#[derive(Clone, Copy)]
pub struct Union<'a> {
    inner: &'a UnionType<'a>,
}

impl<'a> Union<'a> {
    pub(crate) fn new(inner: &'a UnionType<'a>) -> Self {
        Self { inner }
    }

    pub fn ty(self) -> Type<'a> {
        Type::new(self.inner)
    }

    pub fn types(self) -> &'a [Type<'a>] {
        self.inner.types
    }

    /// Installs the dispatch function, replacing any previous one.
    pub fn set_dispatch<F>(self, dispatch: F) -> Self
    where
        F: Fn(Value<'a>) -> Option<Type<'a>> + 'a,
    {
        let dispatch: &'a DispatchFn<'a> = self.inner.arena.alloc(dispatch);
        self.inner.dispatch.set(Some(dispatch));
        self
    }

    /// Dispatches to the first member whose `is` accepts the value.
    pub fn use_first_match(self) -> Self {
        let types = self.inner.types;
        self.set_dispatch(move |value| types.iter().copied().find(|ty| ty.is(value)))
    }

    pub fn dispatch(self, value: Value<'a>) -> Result<Option<Type<'a>>, Error> {
        self.inner.dispatch(value)
    }
}

impl<'a> From<Union<'a>> for Type<'a> {
    fn from(u: Union<'a>) -> Self {
        u.ty()
    }
}
