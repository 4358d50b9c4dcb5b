//! Types and the combinators that build them.
//!
//! Every type is an arena-allocated [`Combinator`] behind a `Copy` [`Type`]
//! handle. Identity is the handle's address: two types are equal only if they
//! are the same allocation.

pub mod declare;
pub mod dict;
pub mod enums;
pub mod func;
pub mod interface;
pub mod intersection;
pub mod irreducible;
pub mod list;
pub mod manager;
pub mod maybe;
pub mod props;
pub mod refinement;
pub mod structs;
pub mod tuple;
pub mod union;

pub use declare::Declare;
pub use func::Func;
pub use interface::{Interface, InterfaceBuilder};
pub use manager::TypeManager;
pub use structs::{Struct, StructBuilder};
pub use union::{DispatchFn, Union};

use crate::{
    String,
    api::{Error, Runtime},
    fmt,
    hydrate::{Hydration, Path, Segment},
    update::{Patch, apply_patch},
    values::{IdentitySet, Value, ValueId},
};
use core::hash::{Hash, Hasher};


/// Predicate over raw values used by irreducible and refinement types.
pub type Predicate<'a> = dyn Fn(Value<'a>) -> bool + 'a;

/// A named field of a struct or interface.
pub type Prop<'a> = (&'a str, Type<'a>);

/// Identity of a type, stable for the arena's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(usize);

impl TypeKey {
    pub fn of<T: ?Sized>(target: &T) -> Self {
        Self(target as *const T as *const () as usize)
    }
}

/// Behaviour shared by every combinator.
pub trait Combinator<'a> {
    fn name(&self) -> &'a str;

    fn meta(&self) -> Meta<'a>;

    /// Mirrors `hydrate`'s acceptance without constructing anything.
    /// Fails only when an undefined declaration is reached.
    ///
    /// `seen` holds the (container, type) pairs whose check is in progress
    /// further up; containers go through [`matches_once`].
    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error>;

    fn hydrate(
        &'a self,
        cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error>;

    /// Picks the member type for `value`. Only unions dispatch.
    fn dispatch(&self, _value: Value<'a>) -> Result<Option<Type<'a>>, Error> {
        Err(Error::combinator(
            "dispatch",
            crate::format!("type {} is not a union", self.name()),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Irreducible,
    Struct,
    Interface,
    Tuple,
    List,
    Dict,
    Maybe,
    Union,
    Refinement,
    Intersection,
    Enums,
    Func,
    Declare,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Irreducible => "irreducible",
            Kind::Struct => "struct",
            Kind::Interface => "interface",
            Kind::Tuple => "tuple",
            Kind::List => "list",
            Kind::Dict => "dict",
            Kind::Maybe => "maybe",
            Kind::Union => "union",
            Kind::Refinement => "subtype",
            Kind::Intersection => "intersection",
            Kind::Enums => "enums",
            Kind::Func => "func",
            Kind::Declare => "declare",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific metadata of a type.
#[derive(Clone, Copy)]
pub enum Meta<'a> {
    Irreducible {
        predicate: &'a Predicate<'a>,
    },
    Struct {
        props: &'a [Prop<'a>],
        strict: bool,
        defaults: &'a [(&'a str, Value<'a>)],
    },
    Interface {
        props: &'a [Prop<'a>],
        strict: bool,
    },
    Tuple {
        types: &'a [Type<'a>],
    },
    List {
        ty: Type<'a>,
    },
    Dict {
        domain: Type<'a>,
        codomain: Type<'a>,
    },
    Maybe {
        ty: Type<'a>,
    },
    Union {
        types: &'a [Type<'a>],
    },
    Refinement {
        ty: Type<'a>,
        predicate: &'a Predicate<'a>,
    },
    Intersection {
        types: &'a [Type<'a>],
    },
    Enums {
        map: &'a [(&'a str, Value<'a>)],
    },
    Func {
        domain: &'a [Type<'a>],
        codomain: Option<Type<'a>>,
    },
    /// A declaration that has not been defined yet.
    Declare {
        name: &'a str,
    },
}

impl<'a> Meta<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Meta::Irreducible { .. } => Kind::Irreducible,
            Meta::Struct { .. } => Kind::Struct,
            Meta::Interface { .. } => Kind::Interface,
            Meta::Tuple { .. } => Kind::Tuple,
            Meta::List { .. } => Kind::List,
            Meta::Dict { .. } => Kind::Dict,
            Meta::Maybe { .. } => Kind::Maybe,
            Meta::Union { .. } => Kind::Union,
            Meta::Refinement { .. } => Kind::Refinement,
            Meta::Intersection { .. } => Kind::Intersection,
            Meta::Enums { .. } => Kind::Enums,
            Meta::Func { .. } => Kind::Func,
            Meta::Declare { .. } => Kind::Declare,
        }
    }

    /// Declared props of a struct or interface.
    pub fn props(&self) -> Option<&'a [Prop<'a>]> {
        match *self {
            Meta::Struct { props, .. } | Meta::Interface { props, .. } => Some(props),
            _ => None,
        }
    }
}

impl fmt::Debug for Meta<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Meta({})", self.kind())
    }
}

/// Handle to an arena-allocated type.
#[derive(Clone, Copy)]
pub struct Type<'a>(&'a dyn Combinator<'a>);

impl<'a> Type<'a> {
    pub(crate) fn new(combinator: &'a dyn Combinator<'a>) -> Self {
        Self(combinator)
    }

    pub(crate) fn combinator(self) -> &'a dyn Combinator<'a> {
        self.0
    }

    pub fn key(self) -> TypeKey {
        TypeKey::of(self.0)
    }

    pub fn name(self) -> &'a str {
        self.0.name()
    }

    pub fn meta(self) -> Meta<'a> {
        self.0.meta()
    }

    pub fn kind(self) -> Kind {
        self.meta().kind()
    }

    /// `true` if `value` is already an instance of this type.
    ///
    /// An undefined declaration answers `false`.
    pub fn is(self, value: Value<'a>) -> bool {
        match self.matches(value) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(ty = self.name(), error = %err, "Type check failed");
                false
            }
        }
    }

    pub fn matches(self, value: Value<'a>) -> Result<bool, Error> {
        self.0.matches(value, &mut IdentitySet::new())
    }

    pub(crate) fn matches_in(
        self,
        value: Value<'a>,
        seen: &mut IdentitySet,
    ) -> Result<bool, Error> {
        self.0.matches(value, seen)
    }

    /// Validates and hydrates `value` into an instance.
    pub fn call(self, rt: &Runtime<'a>, value: Value<'a>) -> Result<Value<'a>, Error> {
        let mut path = Path::root(self.name());
        self.run(rt, value, &mut path)
    }

    /// Like [`call`](Self::call) with a caller-supplied path prefix.
    pub fn call_at(
        self,
        rt: &Runtime<'a>,
        value: Value<'a>,
        prefix: &[&str],
    ) -> Result<Value<'a>, Error> {
        if prefix.is_empty() {
            return self.call(rt, value);
        }
        let mut path = Path::new();
        for segment in prefix {
            path.push(Segment::Label(rt.arena().alloc_str(segment)));
        }
        self.run(rt, value, &mut path)
    }

    fn run(
        self,
        rt: &Runtime<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        let mut cx = Hydration::new(*rt);
        cx.hydrate(self, value, path).map_err(|err| rt.fail(err))
    }

    /// Applies `patch` to `instance` copy-on-write and validates the result.
    pub fn update(
        self,
        rt: &Runtime<'a>,
        instance: Value<'a>,
        patch: &Patch<'a>,
    ) -> Result<Value<'a>, Error> {
        match self.kind() {
            Kind::Union => {
                let chosen = self.dispatch(instance).map_err(|err| rt.fail(err))?;
                match chosen {
                    Some(ty) => ty.update(rt, instance, patch),
                    None => Err(rt.fail(Path::root(self.name()).no_constructor(instance))),
                }
            }
            Kind::Struct
            | Kind::Interface
            | Kind::Tuple
            | Kind::List
            | Kind::Dict
            | Kind::Refinement => {
                let patched = apply_patch(rt, instance, patch).map_err(|err| rt.fail(err))?;
                self.call(rt, patched)
            }
            kind => Err(rt.fail(Error::combinator(
                "update",
                crate::format!("{} types do not support update", kind),
            ))),
        }
    }

    pub fn dispatch(self, value: Value<'a>) -> Result<Option<Type<'a>>, Error> {
        self.0.dispatch(value)
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Type<'_> {}

impl Hash for Type<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.name())
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks a container against a type unless the same pair is already being
/// checked further up the stack, in which case the pair counts as a match.
/// This keeps `is` finite on cyclic values.
pub(crate) fn matches_once(
    seen: &mut IdentitySet,
    id: ValueId,
    ty: TypeKey,
    check: impl FnOnce(&mut IdentitySet) -> Result<bool, Error>,
) -> Result<bool, Error> {
    if !seen.insert(id, ty) {
        return Ok(true);
    }
    let result = check(seen);
    seen.remove(id, ty);
    result
}

/// Joins type names for default display names.
pub(crate) fn join_names(types: &[Type<'_>], separator: &str) -> String {
    let mut out = String::new();
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(ty.name());
    }
    out
}
