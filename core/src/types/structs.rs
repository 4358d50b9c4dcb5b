//! Branded records with cycle-safe hydration.
//!
//! A struct instance is a frozen object branded with the struct's
//! [`TypeKey`]. The container is allocated and registered in the
//! [`TreeState`](crate::hydrate::TreeState) before any field is hydrated, so a
//! field that points back at the value being built receives the unfinished
//! container.

use crate::{
    Vec,
    api::Error,
    format,
    hydrate::{Hydration, Path, Segment},
    types::{
        Combinator, Meta, Prop, Type, TypeKey, TypeManager,
        props::{add_prop, describe_props, mixin_props},
    },
    values::{IdentitySet, Value, ValueId},
};

pub struct StructType<'a> {
    name: &'a str,
    props: &'a [Prop<'a>],
    defaults: &'a [(&'a str, Value<'a>)],
    strict: bool,
    mutable: bool,
}

impl<'a> StructType<'a> {
    fn default_for(&self, field: &str) -> Option<Value<'a>> {
        self.defaults
            .iter()
            .find(|(name, _)| *name == field)
            .map(|&(_, v)| v)
    }
}

impl<'a> Combinator<'a> for StructType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Struct {
            props: self.props,
            strict: self.strict,
            defaults: self.defaults,
        }
    }

    fn matches(&self, value: Value<'a>, _seen: &mut IdentitySet) -> Result<bool, Error> {
        Ok(matches!(value, Value::Object(obj) if obj.brand() == Some(TypeKey::of(self))))
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        let key = TypeKey::of(self);
        let Value::Object(raw) = value else {
            return Err(path.bad_value(value, Some("an object".into())));
        };
        if raw.brand() == Some(key) {
            return Ok(value);
        }

        let id = ValueId::of(raw);
        if let Some(result) = cx.state().lookup(id, key) {
            return Ok(result);
        }

        if self.strict {
            for field in raw.keys() {
                if !self.props.iter().any(|(name, _)| *name == field) {
                    return Err(path.unexpected_prop(field));
                }
            }
        }

        let instance = cx.runtime().alloc_object();
        instance.set_brand(key);
        let result = Value::Object(instance);
        tracing::trace!(ty = self.name, ?id, "Allocated struct instance");

        // The state is discarded with the call on error, so early returns
        // below need no cleanup.
        cx.state().register(id, key, result);
        cx.state().enter(id, key);
        for &(field, ty) in self.props {
            let mut actual = raw.get(field).unwrap_or(Value::Nil);
            if actual.is_nil() {
                if let Some(default) = self.default_for(field) {
                    actual = default;
                }
            }
            let hydrated = cx.hydrate_at(ty, actual, path, Segment::Field(field, ty.name()))?;
            instance.init(field, hydrated);
            cx.state().advance(id, key);
        }
        cx.state().leave(id, key);
        cx.state().resolve(id, key, result);

        if !self.mutable {
            instance.freeze();
        }
        Ok(result)
    }
}

/// Handle to a struct type.
#[derive(Clone, Copy)]
pub struct Struct<'a> {
    inner: &'a StructType<'a>,
    types: &'a TypeManager<'a>,
}

impl<'a> Struct<'a> {
    pub fn ty(self) -> Type<'a> {
        Type::new(self.inner)
    }

    pub fn name(self) -> &'a str {
        self.inner.name
    }

    pub fn props(self) -> &'a [Prop<'a>] {
        self.inner.props
    }

    /// Starts a new struct with this struct's props and defaults.
    pub fn extend(self) -> StructBuilder<'a> {
        StructBuilder::new(self.types).mixin(self)
    }
}

impl<'a> From<Struct<'a>> for Type<'a> {
    fn from(s: Struct<'a>) -> Self {
        s.ty()
    }
}

/// Builder returned by [`TypeManager::structure`].
pub struct StructBuilder<'a> {
    types: &'a TypeManager<'a>,
    name: Option<&'a str>,
    props: Vec<Prop<'a>>,
    defaults: Vec<(&'a str, Value<'a>)>,
    strict: bool,
    mutable: bool,
    error: Option<Error>,
}

impl<'a> StructBuilder<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>) -> Self {
        Self {
            types,
            name: None,
            props: Vec::new(),
            defaults: Vec::new(),
            strict: false,
            mutable: false,
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
            if let Err(err) = add_prop(&mut self.props, "struct", name, ty.into()) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Value used when the raw field is nil or missing.
    pub fn default_value(mut self, name: &str, value: Value<'a>) -> Self {
        let name: &'a str = self.types.arena().alloc_str(name);
        match self.defaults.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.defaults.push((name, value)),
        }
        self
    }

    /// Rejects own keys that are not declared props.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Skips freezing of instances.
    pub fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    /// Copies the props of a struct or interface (and a struct's defaults).
    pub fn mixin(mut self, ty: impl Into<Type<'a>>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let ty = ty.into();
        let result = mixin_props("struct", ty).and_then(|props| {
            props
                .iter()
                .try_for_each(|&(name, t)| add_prop(&mut self.props, "struct", name, t))
        });
        match result {
            Ok(()) => {
                if let Meta::Struct { defaults, .. } = ty.meta() {
                    for &(name, value) in defaults {
                        if !self.defaults.iter().any(|(k, _)| *k == name) {
                            self.defaults.push((name, value));
                        }
                    }
                }
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    pub fn build(self) -> Result<Struct<'a>, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }
        for (name, _) in &self.defaults {
            if !self.props.iter().any(|(prop, _)| prop == name) {
                return Err(Error::combinator(
                    "struct",
                    format!("default for undeclared property \"{}\"", name),
                ));
            }
        }
        let arena = self.types.arena();
        let name = match self.name {
            Some(name) => name,
            None => &*arena.alloc_str(&format!("Struct{}", describe_props(&self.props))),
        };
        let inner = arena.alloc(StructType {
            name,
            props: arena.alloc_slice_copy(&self.props),
            defaults: arena.alloc_slice_copy(&self.defaults),
            strict: self.strict,
            mutable: self.mutable,
        });
        Ok(Struct {
            inner,
            types: self.types,
        })
    }
}
