use crate::{
    fmt,
    values::{
        identity::ValueId,
        objects::{ArrayObj, FuncObj, ObjectObj},
        stringify::write_value,
    },
};
use static_assertions::{assert_impl_all, assert_not_impl_any};

/// A dynamically-typed host value.
///
/// Scalars are stored inline; arrays, objects and functions are references
/// into the runtime arena and compare by identity.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Number(f64),
    Str(&'a str),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    /// Source of a regular expression.
    RegExp(&'a str),
    /// Message of an error object.
    Error(&'a str),
    Func(&'a FuncObj<'a>),
    Array(&'a ArrayObj<'a>),
    Object(&'a ObjectObj<'a>),
}

assert_impl_all!(Value<'static>: Copy);
assert_not_impl_any!(Value<'static>: Send, Sync);

impl<'a> Value<'a> {
    /// Strict equality: identity for heap values, value equality for scalars.
    pub fn same(self, other: Value<'a>) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::RegExp(a), Value::RegExp(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => core::ptr::eq(a, b),
            (Value::Array(a), Value::Array(b)) => core::ptr::eq(a, b),
            (Value::Object(a), Value::Object(b)) => core::ptr::eq(a, b),
            _ => false,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&'a ArrayObj<'a>> {
        match *self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&'a ObjectObj<'a>> {
        match *self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&'a FuncObj<'a>> {
        match *self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Identity of heap values; `None` for scalars.
    pub fn id(&self) -> Option<ValueId> {
        match *self {
            Value::Func(f) => Some(ValueId::of(f)),
            Value::Array(a) => Some(ValueId::of(a)),
            Value::Object(o) => Some(ValueId::of(o)),
            _ => None,
        }
    }

    /// Property lookup; absent keys and non-objects yield `Nil`.
    pub fn get(&self, key: &str) -> Value<'a> {
        match *self {
            Value::Object(o) => o.get(key).unwrap_or(Value::Nil),
            _ => Value::Nil,
        }
    }

    /// Element lookup; out-of-range indices and non-arrays yield `Nil`.
    pub fn at(&self, index: usize) -> Value<'a> {
        match *self {
            Value::Array(a) => a.get(index).unwrap_or(Value::Nil),
            _ => Value::Nil,
        }
    }

    /// Scalars are always frozen.
    pub fn is_frozen(&self) -> bool {
        match *self {
            Value::Array(a) => a.is_frozen(),
            Value::Object(o) => o.is_frozen(),
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::RegExp(_) => "regexp",
            Value::Error(_) => "error",
            Value::Func(_) => "function",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same(*other)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, *self)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, *self)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value<'_> {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(s)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
