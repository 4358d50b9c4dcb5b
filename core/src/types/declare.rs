//! Forward references for recursive type graphs.
//!
//! A declaration is usable as a child type immediately but can only validate
//! values once [`Declare::define`] has bound it, exactly once.

use crate::{
    api::{DeclareMisuse, Error},
    hydrate::{Hydration, Path},
    types::{Combinator, Meta, Type},
    values::{IdentitySet, Value},
};
use core::cell::OnceCell;

pub struct DeclareType<'a> {
    name: &'a str,
    target: OnceCell<Type<'a>>,
}

impl<'a> DeclareType<'a> {
    pub(crate) fn new(name: &'a str) -> Self {
        Self {
            name,
            target: OnceCell::new(),
        }
    }

    fn target(&self) -> Result<Type<'a>, Error> {
        self.target.get().copied().ok_or_else(|| Error::DeclareMisuse {
            name: self.name.into(),
            misuse: DeclareMisuse::Undefined,
        })
    }
}

impl<'a> Combinator<'a> for DeclareType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        match self.target.get() {
            Some(target) => target.meta(),
            None => Meta::Declare { name: self.name },
        }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        self.target()?.matches_in(value, seen)
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        cx.hydrate(self.target()?, value, path)
    }

    fn dispatch(&self, value: Value<'a>) -> Result<Option<Type<'a>>, Error> {
        self.target()?.dispatch(value)
    }
}

/// Handle to a declared type.
#[derive(Clone, Copy)]
pub struct Declare<'a> {
    inner: &'a DeclareType<'a>,
}

impl<'a> Declare<'a> {
    pub(crate) fn new(inner: &'a DeclareType<'a>) -> Self {
        Self { inner }
    }

    pub fn ty(self) -> Type<'a> {
        Type::new(self.inner)
    }

    pub fn is_defined(self) -> bool {
        self.inner.target.get().is_some()
    }

    /// Binds the declaration. Fails if it is already bound.
    pub fn define(self, ty: impl Into<Type<'a>>) -> Result<Type<'a>, Error> {
        let ty = ty.into();
        if ty == self.ty() {
            return Err(Error::combinator(
                "declare",
                crate::format!("type {} cannot be defined as itself", self.inner.name),
            ));
        }
        self.inner.target.set(ty).map_err(|_| Error::DeclareMisuse {
            name: self.inner.name.into(),
            misuse: DeclareMisuse::Redefined,
        })?;
        tracing::trace!(name = self.inner.name, target = ty.name(), "Defined declaration");
        Ok(self.ty())
    }
}

impl<'a> From<Declare<'a>> for Type<'a> {
    fn from(d: Declare<'a>) -> Self {
        d.ty()
    }
}
