use crate::{
    api::{Error, RuntimeOptions},
    values::{ArrayObj, FuncObj, NativeFn, ObjectObj, Signature, Value, stringify},
};
use bumpalo::Bump;

/// Allocation context for values plus the injected options.
///
/// Every array, object and function a type builds is allocated through the
/// runtime's arena, so instances live as long as the arena.
#[derive(Clone, Copy, Debug)]
pub struct Runtime<'a> {
    arena: &'a Bump,
    options: RuntimeOptions<'a>,
}

impl<'a> Runtime<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self::with_options(arena, RuntimeOptions::default())
    }

    pub fn with_options(arena: &'a Bump, options: RuntimeOptions<'a>) -> Self {
        Self { arena, options }
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    pub fn options(&self) -> &RuntimeOptions<'a> {
        &self.options
    }

    pub fn str(&self, s: &str) -> Value<'a> {
        Value::Str(self.arena.alloc_str(s))
    }

    pub fn regexp(&self, source: &str) -> Value<'a> {
        Value::RegExp(self.arena.alloc_str(source))
    }

    pub fn error(&self, message: &str) -> Value<'a> {
        Value::Error(self.arena.alloc_str(message))
    }

    pub fn date(&self, millis: i64) -> Value<'a> {
        Value::Date(millis)
    }

    /// Allocates a new, unfrozen array.
    pub fn array(&self, items: impl IntoIterator<Item = Value<'a>>) -> Value<'a> {
        Value::Array(self.alloc_array(items))
    }

    /// Allocates a new, unfrozen object. Later duplicates of a key win.
    pub fn object<K: AsRef<str>>(
        &self,
        fields: impl IntoIterator<Item = (K, Value<'a>)>,
    ) -> Value<'a> {
        let obj = self.alloc_object();
        for (key, value) in fields {
            obj.init(key.as_ref(), value);
        }
        Value::Object(obj)
    }

    /// Wraps a closure as a host function value.
    pub fn function<F>(&self, name: &str, arity: usize, body: F) -> Value<'a>
    where
        F: Fn(&Runtime<'a>, &[Value<'a>]) -> Result<Value<'a>, Error> + 'a,
    {
        let body: &'a NativeFn<'a> = self.arena.alloc(body);
        Value::Func(self.alloc_function(name, arity, body, None))
    }

    pub fn call(&self, f: Value<'a>, args: &[Value<'a>]) -> Result<Value<'a>, Error> {
        match f {
            Value::Func(func) => func.invoke(self, args),
            other => Err(Error::NotCallable {
                value: stringify(other),
            }),
        }
    }

    pub(crate) fn alloc_array(
        &self,
        items: impl IntoIterator<Item = Value<'a>>,
    ) -> &'a ArrayObj<'a> {
        self.arena.alloc(ArrayObj::new_in(self.arena, items))
    }

    pub(crate) fn alloc_object(&self) -> &'a ObjectObj<'a> {
        self.arena.alloc(ObjectObj::new_in(self.arena))
    }

    pub(crate) fn alloc_function(
        &self,
        name: &str,
        arity: usize,
        body: &'a NativeFn<'a>,
        signature: Option<Signature<'a>>,
    ) -> &'a FuncObj<'a> {
        let name = self.arena.alloc_str(name);
        self.arena.alloc(FuncObj::new(name, arity, body, signature))
    }

    /// Hands a failure to the fail hook before it is returned to the caller.
    pub(crate) fn fail(&self, err: Error) -> Error {
        if let Some(hook) = self.options.on_fail {
            tracing::debug!(error = %err, "Invoking fail hook");
            hook(&err);
        }
        err
    }
}
