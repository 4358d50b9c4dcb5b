//! Heap values: arrays, objects and functions.
//!
//! All three live in the runtime arena and have reference identity. Arrays and
//! objects are interior-mutable until frozen.

use crate::{
    String, ToString, Vec,
    api::{Error, Runtime},
    fmt,
    types::{Type, TypeKey},
    values::Value,
};
use bumpalo::Bump;
use core::cell::{Cell, RefCell};

type ArenaVec<'a, T> = allocator_api2::vec::Vec<T, &'a Bump>;

/// Signature of a native function body.
pub type NativeFn<'a> = dyn Fn(&Runtime<'a>, &[Value<'a>]) -> Result<Value<'a>, Error> + 'a;

pub struct ArrayObj<'a> {
    items: RefCell<ArenaVec<'a, Value<'a>>>,
    frozen: Cell<bool>,
}

impl<'a> ArrayObj<'a> {
    pub(crate) fn new_in(arena: &'a Bump, items: impl IntoIterator<Item = Value<'a>>) -> Self {
        let mut vec = ArenaVec::new_in(arena);
        vec.extend(items);
        Self {
            items: RefCell::new(vec),
            frozen: Cell::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        self.items.borrow().get(index).copied()
    }

    /// Snapshot of the current elements.
    pub fn to_vec(&self) -> Vec<Value<'a>> {
        self.items.borrow().iter().copied().collect()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    /// Writes `index`; writing at `len()` appends.
    pub fn set(&self, index: usize, value: Value<'a>) -> Result<(), Error> {
        if self.is_frozen() {
            return Err(Error::Frozen {
                key: index.to_string(),
            });
        }
        let mut items = self.items.borrow_mut();
        let len = items.len();
        if index < len {
            items[index] = value;
        } else if index == len {
            items.push(value);
        } else {
            return Err(Error::host(crate::format!(
                "index {} out of bounds for array of length {}",
                index, len
            )));
        }
        Ok(())
    }

    pub fn push(&self, value: Value<'a>) -> Result<(), Error> {
        let len = self.len();
        self.set(len, value)
    }

    /// Fills a slot of an array under construction.
    pub(crate) fn fill(&self, index: usize, value: Value<'a>) {
        if let Some(slot) = self.items.borrow_mut().get_mut(index) {
            *slot = value;
        }
    }
}

pub struct ObjectObj<'a> {
    fields: RefCell<ArenaVec<'a, (&'a str, Value<'a>)>>,
    frozen: Cell<bool>,
    brand: Cell<Option<TypeKey>>,
    arena: &'a Bump,
}

impl<'a> ObjectObj<'a> {
    pub(crate) fn new_in(arena: &'a Bump) -> Self {
        Self {
            fields: RefCell::new(ArenaVec::new_in(arena)),
            frozen: Cell::new(false),
            brand: Cell::new(None),
            arena,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value<'a>> {
        self.fields
            .borrow()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.borrow().iter().any(|(k, _)| *k == key)
    }

    /// Own keys in insertion order.
    pub fn keys(&self) -> Vec<&'a str> {
        self.fields.borrow().iter().map(|&(k, _)| k).collect()
    }

    /// Own entries in insertion order.
    pub fn entries(&self) -> Vec<(&'a str, Value<'a>)> {
        self.fields.borrow().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    /// Key of the struct type that built this object, if any.
    pub fn brand(&self) -> Option<TypeKey> {
        self.brand.get()
    }

    pub(crate) fn set_brand(&self, brand: TypeKey) {
        self.brand.set(Some(brand));
    }

    pub fn set(&self, key: &str, value: Value<'a>) -> Result<(), Error> {
        if self.is_frozen() {
            return Err(Error::Frozen {
                key: key.to_string(),
            });
        }
        self.init(key, value);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<Option<Value<'a>>, Error> {
        if self.is_frozen() {
            return Err(Error::Frozen {
                key: key.to_string(),
            });
        }
        let mut fields = self.fields.borrow_mut();
        let position = fields.iter().position(|(k, _)| *k == key);
        Ok(position.map(|i| fields.remove(i).1))
    }

    /// Writes a field regardless of the frozen flag.
    pub(crate) fn init(&self, key: &str, value: Value<'a>) {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => {
                let key = self.arena.alloc_str(key);
                fields.push((key, value));
            }
        }
    }
}

/// Declared signature of an instrumented function.
#[derive(Clone, Copy)]
pub struct Signature<'a> {
    pub domain: &'a [Type<'a>],
    pub codomain: Option<Type<'a>>,
    /// The uninstrumented function being wrapped.
    pub original: &'a FuncObj<'a>,
}

pub struct FuncObj<'a> {
    name: &'a str,
    arity: usize,
    body: &'a NativeFn<'a>,
    signature: Option<Signature<'a>>,
}

impl<'a> FuncObj<'a> {
    pub(crate) fn new(
        name: &'a str,
        arity: usize,
        body: &'a NativeFn<'a>,
        signature: Option<Signature<'a>>,
    ) -> Self {
        Self {
            name,
            arity,
            body,
            signature,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn signature(&self) -> Option<&Signature<'a>> {
        self.signature.as_ref()
    }

    pub(crate) fn invoke(&self, rt: &Runtime<'a>, args: &[Value<'a>]) -> Result<Value<'a>, Error> {
        (self.body)(rt, args)
    }
}

impl fmt::Debug for FuncObj<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncObj")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("instrumented", &self.signature.is_some())
            .finish()
    }
}

impl fmt::Debug for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domain: Vec<String> = self.domain.iter().map(|t| t.name().to_string()).collect();
        f.debug_struct("Signature")
            .field("domain", &domain)
            .field("codomain", &self.codomain.map(|t| t.name()))
            .finish()
    }
}
