//! Function signatures and instrumented functions.
//!
//! [`Func::of`] wraps a host function so every call validates its arguments
//! as a tuple of the domain types and its result with the codomain.

use crate::{
    Vec,
    api::{Error, Runtime},
    format,
    hydrate::{Hydration, Path},
    types::{Combinator, Kind, Meta, Type, join_names, tuple::TupleType},
    values::{FuncObj, IdentitySet, NativeFn, Signature, Value},
};
use bumpalo::Bump;

pub struct FuncType<'a> {
    name: &'a str,
    domain: &'a [Type<'a>],
    codomain: Option<Type<'a>>,
    /// Arguments from this index on are all optional.
    optional_from: usize,
    /// `arguments[n]` validates the first `n` arguments.
    arguments: &'a [TupleType<'a>],
}

impl<'a> FuncType<'a> {
    pub(crate) fn new_in(
        arena: &'a Bump,
        name: &'a str,
        domain: &[Type<'a>],
        codomain: Option<Type<'a>>,
    ) -> &'a FuncType<'a> {
        let domain: &'a [Type<'a>] = arena.alloc_slice_copy(domain);
        let label: &'a str = arena.alloc_str(&format!("arguments of function {}", name));
        let arguments = arena.alloc_slice_fill_iter(
            (0..domain.len() + 1).map(|n| TupleType::new(label, &domain[..n])),
        );
        let optional_from = domain
            .iter()
            .rposition(|ty| ty.kind() != Kind::Maybe)
            .map_or(0, |i| i + 1);
        arena.alloc(FuncType {
            name,
            domain,
            codomain,
            optional_from,
            arguments,
        })
    }

    /// `true` if `f` is instrumented with exactly this signature.
    fn accepts(&self, f: &FuncObj<'a>) -> bool {
        f.signature().is_some_and(|sig| {
            sig.domain.len() == self.domain.len()
                && sig.domain.iter().zip(self.domain).all(|(a, b)| a == b)
                && sig.codomain == self.codomain
        })
    }

    fn instrument(&'a self, rt: &Runtime<'a>, f: &'a FuncObj<'a>, curried: bool) -> Value<'a> {
        if self.accepts(f) {
            return Value::Func(f);
        }
        let body = move |rt: &Runtime<'a>, args: &[Value<'a>]| self.invoke(rt, f, curried, args);
        let body: &'a NativeFn<'a> = rt.arena().alloc(body);
        let signature = Signature {
            domain: self.domain,
            codomain: self.codomain,
            original: f,
        };
        Value::Func(rt.alloc_function(f.name(), self.domain.len(), body, Some(signature)))
    }

    fn invoke(
        &'a self,
        rt: &Runtime<'a>,
        f: &'a FuncObj<'a>,
        curried: bool,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, Error> {
        let len = self.domain.len();
        let tuple_len = if curried {
            args.len()
        } else {
            args.len().max(self.optional_from)
        };
        let mut padded: Vec<Value<'a>> = args.to_vec();
        padded.resize(tuple_len, Value::Nil);

        let tuple = &self.arguments[tuple_len.min(len)];
        let mut cx = Hydration::new(*rt);
        let mut path = Path::root(tuple.name());
        let checked = tuple
            .hydrate(&mut cx, rt.array(padded), &mut path)
            .map_err(|err| rt.fail(err))?;
        let mut call_args = checked.as_array().map(|a| a.to_vec()).unwrap_or_default();

        if curried && call_args.len() < len {
            if call_args.is_empty() {
                return Err(rt.fail(Error::combinator(
                    "func",
                    format!("Invalid arguments.length = 0 for curried function {}", self.name),
                )));
            }
            return Ok(self.partial(rt, f, &call_args));
        }

        call_args.resize(len, Value::Nil);
        let result = f.invoke(rt, &call_args)?;
        match self.codomain {
            Some(codomain) => codomain.call(rt, result),
            None => Ok(result),
        }
    }

    /// Binds `bound` and returns a curried function over the remaining domain.
    fn partial(&self, rt: &Runtime<'a>, f: &'a FuncObj<'a>, bound: &[Value<'a>]) -> Value<'a> {
        let arena = rt.arena();
        let bound: &'a [Value<'a>] = arena.alloc_slice_copy(bound);
        let body = move |rt: &Runtime<'a>, rest: &[Value<'a>]| {
            let mut all = bound.to_vec();
            all.extend_from_slice(rest);
            f.invoke(rt, &all)
        };
        let body: &'a NativeFn<'a> = arena.alloc(body);
        let remaining = &self.domain[bound.len()..];
        let partial = rt.alloc_function(f.name(), remaining.len(), body, None);

        let to = self.codomain.map_or("Any", |t| t.name());
        let name: &'a str = arena.alloc_str(&format!("({}) => {}", join_names(remaining, ", "), to));
        let rest = FuncType::new_in(arena, name, remaining, self.codomain);
        rest.instrument(rt, partial, true)
    }
}

impl<'a> Combinator<'a> for FuncType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Func {
            domain: self.domain,
            codomain: self.codomain,
        }
    }

    fn matches(&self, value: Value<'a>, _seen: &mut IdentitySet) -> Result<bool, Error> {
        Ok(matches!(value, Value::Func(f) if self.accepts(f)))
    }

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        match value {
            Value::Func(f) if f.signature().is_none() => {
                let rt = *cx.runtime();
                Ok(self.instrument(&rt, f, false))
            }
            Value::Func(f) if self.accepts(f) => Ok(value),
            Value::Func(_) => Err(path.bad_value(value, None)),
            _ => Err(path.bad_value(value, Some("a function".into()))),
        }
    }
}

/// Handle to a function type.
#[derive(Clone, Copy)]
pub struct Func<'a> {
    inner: &'a FuncType<'a>,
}

impl<'a> Func<'a> {
    pub(crate) fn new(inner: &'a FuncType<'a>) -> Self {
        Self { inner }
    }

    pub fn ty(self) -> Type<'a> {
        Type::new(self.inner)
    }

    pub fn domain(self) -> &'a [Type<'a>] {
        self.inner.domain
    }

    pub fn codomain(self) -> Option<Type<'a>> {
        self.inner.codomain
    }

    /// Instruments `f`. With `curried`, calls with fewer arguments than the
    /// domain return a partially applied instrumented function.
    pub fn of(self, rt: &Runtime<'a>, f: Value<'a>, curried: bool) -> Result<Value<'a>, Error> {
        match f {
            Value::Func(obj) => Ok(self.inner.instrument(rt, obj, curried)),
            other => Err(rt.fail(
                Path::root(self.inner.name).bad_value(other, Some("a function".into())),
            )),
        }
    }
}

impl<'a> From<Func<'a>> for Type<'a> {
    fn from(f: Func<'a>) -> Self {
        f.ty()
    }
}
