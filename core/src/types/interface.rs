//! Structural records: any object whose declared props have the right types.

use crate::{
    Vec,
    api::Error,
    format,
    hydrate::{Hydration, Path, Segment},
    types::{
        Combinator, Meta, Prop, Type, TypeKey, TypeManager, matches_once,
        props::{add_prop, describe_props, mixin_props},
    },
    values::{IdentitySet, Value, ValueId},
};

pub struct InterfaceType<'a> {
    name: &'a str,
    props: &'a [Prop<'a>],
    strict: bool,
}

impl<'a> InterfaceType<'a> {
    fn extra_key(&self, keys: &[&'a str]) -> Option<&'a str> {
        keys.iter()
            .copied()
            .find(|key| !self.props.iter().any(|(name, _)| name == key))
    }
}

impl<'a> Combinator<'a> for InterfaceType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Interface {
            props: self.props,
            strict: self.strict,
        }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        let Value::Object(obj) = value else {
            return Ok(false);
        };
        if self.strict && self.extra_key(&obj.keys()).is_some() {
            return Ok(false);
        }
        matches_once(seen, ValueId::of(obj), TypeKey::of(self), |seen| {
            for &(name, ty) in self.props {
                if !ty.matches_in(value.get(name), seen)? {
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
        let Value::Object(raw) = value else {
            return Err(path.bad_value(value, Some("an object".into())));
        };
        if self.strict {
            if let Some(extra) = self.extra_key(&raw.keys()) {
                return Err(path.unexpected_prop(extra));
            }
        }
        let key = TypeKey::of(self);
        let id = ValueId::of(raw);
        if let Some(result) = cx.state().lookup(id, key) {
            return Ok(result);
        }
        if !cx.state().enter(id, key) {
            return Err(path.bad_value(value, Some("an acyclic value".into())));
        }

        // Undeclared own props are carried over untouched.
        let mut out = raw.entries();
        let mut unchanged = true;
        for &(name, ty) in self.props {
            let actual = raw.get(name).unwrap_or(Value::Nil);
            let hydrated = cx.hydrate_at(ty, actual, path, Segment::Field(name, ty.name()))?;
            unchanged &= hydrated.same(actual);
            match out.iter_mut().find(|(k, _)| *k == name) {
                Some(entry) => entry.1 = hydrated,
                None => out.push((name, hydrated)),
            }
        }
        cx.state().leave(id, key);

        let result = if unchanged {
            raw.freeze();
            value
        } else {
            let copy = cx.runtime().object(out);
            if let Value::Object(obj) = copy {
                obj.freeze();
            }
            copy
        };
        cx.state().remember(id, key, result);
        Ok(result)
    }
}

/// Handle to an interface type.
#[derive(Clone, Copy)]
pub struct Interface<'a> {
    inner: &'a InterfaceType<'a>,
    types: &'a TypeManager<'a>,
}

impl<'a> Interface<'a> {
    pub fn ty(self) -> Type<'a> {
        Type::new(self.inner)
    }

    pub fn props(self) -> &'a [Prop<'a>] {
        self.inner.props
    }

    /// Starts a new interface with this interface's props.
    pub fn extend(self) -> InterfaceBuilder<'a> {
        InterfaceBuilder::new(self.types)
            .strict(self.inner.strict)
            .mixin(self)
    }
}

impl<'a> From<Interface<'a>> for Type<'a> {
    fn from(i: Interface<'a>) -> Self {
        i.ty()
    }
}

/// Builder returned by [`TypeManager::interface`].
pub struct InterfaceBuilder<'a> {
    types: &'a TypeManager<'a>,
    name: Option<&'a str>,
    props: Vec<Prop<'a>>,
    strict: bool,
    error: Option<Error>,
}

impl<'a> InterfaceBuilder<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>) -> Self {
        Self {
            types,
            name: None,
            props: Vec::new(),
            strict: false,
            error: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        let name: &'a str = self.types.arena().alloc_str(name);
        self.name = Some(name);
        self
    }

    pub fn field(mut self, name: &str, ty: impl Into<Type<'a>>) -> Self {
        if self.error.is_none() {
            let name: &'a str = self.types.arena().alloc_str(name);
            if let Err(err) = add_prop(&mut self.props, "interface", name, ty.into()) {
                self.error = Some(err);
            }
        }
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn mixin(mut self, ty: impl Into<Type<'a>>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let result = mixin_props("interface", ty.into()).and_then(|props| {
            props
                .iter()
                .try_for_each(|&(name, t)| add_prop(&mut self.props, "interface", name, t))
        });
        if let Err(err) = result {
            self.error = Some(err);
        }
        self
    }

    pub fn build(self) -> Result<Interface<'a>, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let arena = self.types.arena();
        let name = match self.name {
            Some(name) => name,
            None => &*arena.alloc_str(&describe_props(&self.props)),
        };
        let inner = arena.alloc(InterfaceType {
            name,
            props: arena.alloc_slice_copy(&self.props),
            strict: self.strict,
        });
        Ok(Interface {
            inner,
            types: self.types,
        })
    }
}
