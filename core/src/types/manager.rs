use crate::{
    String, Vec,
    api::Error,
    format,
    types::{
        Declare, Func, InterfaceBuilder, Kind, Predicate, StructBuilder, Type, Union, join_names,
        declare::DeclareType,
        dict::DictType,
        enums::EnumsType,
        func::FuncType,
        intersection::IntersectionType,
        irreducible::{IrreducibleType, is_finite_number, is_integer},
        list::ListType,
        maybe::MaybeType,
        refinement::RefinementType,
        tuple::TupleType,
        union::UnionType,
    },
    values::Value,
};
use bumpalo::Bump;

/// Factory and owner of all types built in one arena.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use runtype_core::{Runtime, TypeManager, Value};
///
/// let arena = Bump::new();
/// let types = TypeManager::new(&arena);
/// let rt = Runtime::new(&arena);
///
/// let tags = types.list(types.string(), None);
/// assert_eq!(tags.name(), "Array<String>");
/// let raw = rt.array([rt.str("a"), rt.str("b")]);
/// assert_eq!(tags.call(&rt, raw).unwrap(), raw);
/// ```
pub struct TypeManager<'a> {
    arena: &'a Bump,
    any: Type<'a>,
    nil: Type<'a>,
    string: Type<'a>,
    number: Type<'a>,
    integer: Type<'a>,
    boolean: Type<'a>,
    array: Type<'a>,
    object: Type<'a>,
    function: Type<'a>,
    error: Type<'a>,
    regexp: Type<'a>,
    date: Type<'a>,
}

impl<'a> TypeManager<'a> {
    pub fn new(arena: &'a Bump) -> &'a TypeManager<'a> {
        let leaf = |name: &'static str, predicate: fn(Value<'a>) -> bool| -> Type<'a> {
            let predicate: &'a Predicate<'a> = arena.alloc(predicate);
            Type::new(arena.alloc(IrreducibleType::new(name, predicate)))
        };
        let number = leaf("Number", is_finite_number);
        let integer_predicate: &'a Predicate<'a> = arena.alloc(is_integer as fn(Value<'a>) -> bool);
        let integer = Type::new(arena.alloc(RefinementType::new(
            "Integer",
            number,
            integer_predicate,
        )));

        arena.alloc(TypeManager {
            arena,
            any: leaf("Any", |_| true),
            nil: leaf("Nil", |v| v.is_nil()),
            string: leaf("String", |v| matches!(v, Value::Str(_))),
            number,
            integer,
            boolean: leaf("Boolean", |v| matches!(v, Value::Bool(_))),
            array: leaf("Array", |v| matches!(v, Value::Array(_))),
            object: leaf("Object", |v| matches!(v, Value::Object(_))),
            function: leaf("Function", |v| matches!(v, Value::Func(_))),
            error: leaf("Error", |v| matches!(v, Value::Error(_))),
            regexp: leaf("RegExp", |v| matches!(v, Value::RegExp(_))),
            date: leaf("Date", |v| matches!(v, Value::Date(_))),
        })
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    pub fn any(&self) -> Type<'a> {
        self.any
    }

    pub fn nil(&self) -> Type<'a> {
        self.nil
    }

    pub fn string(&self) -> Type<'a> {
        self.string
    }

    /// Finite numbers.
    pub fn number(&self) -> Type<'a> {
        self.number
    }

    pub fn integer(&self) -> Type<'a> {
        self.integer
    }

    pub fn boolean(&self) -> Type<'a> {
        self.boolean
    }

    pub fn array(&self) -> Type<'a> {
        self.array
    }

    pub fn object(&self) -> Type<'a> {
        self.object
    }

    pub fn function(&self) -> Type<'a> {
        self.function
    }

    pub fn error(&self) -> Type<'a> {
        self.error
    }

    pub fn regexp(&self) -> Type<'a> {
        self.regexp
    }

    pub fn date(&self) -> Type<'a> {
        self.date
    }

    fn alloc_name(&self, name: Option<&str>, default: impl FnOnce() -> String) -> &'a str {
        match name {
            Some(name) => self.arena.alloc_str(name),
            None => self.arena.alloc_str(&default()),
        }
    }

    /// A leaf type accepting exactly the values `predicate` holds for.
    pub fn irreducible<F>(&self, name: &str, predicate: F) -> Type<'a>
    where
        F: Fn(Value<'a>) -> bool + 'a,
    {
        let name = self.arena.alloc_str(name);
        let predicate: &'a Predicate<'a> = self.arena.alloc(predicate);
        Type::new(self.arena.alloc(IrreducibleType::new(name, predicate)))
    }

    pub fn structure(&'a self) -> StructBuilder<'a> {
        StructBuilder::new(self)
    }

    pub fn interface(&'a self) -> InterfaceBuilder<'a> {
        InterfaceBuilder::new(self)
    }

    pub fn tuple(&self, types: &[Type<'a>], name: Option<&str>) -> Type<'a> {
        let name = self.alloc_name(name, || format!("[{}]", join_names(types, ", ")));
        let types = self.arena.alloc_slice_copy(types);
        Type::new(self.arena.alloc(TupleType::new(name, types)))
    }

    pub fn list(&self, ty: Type<'a>, name: Option<&str>) -> Type<'a> {
        let name = self.alloc_name(name, || format!("Array<{}>", ty.name()));
        Type::new(self.arena.alloc(ListType::new(name, ty)))
    }

    pub fn dict(&self, domain: Type<'a>, codomain: Type<'a>, name: Option<&str>) -> Type<'a> {
        let name = self.alloc_name(name, || {
            format!("{{[key: {}]: {}}}", domain.name(), codomain.name())
        });
        Type::new(self.arena.alloc(DictType::new(name, domain, codomain)))
    }

    /// `ty` or nil. Returns `ty` itself when it already accepts nil.
    pub fn maybe(&self, ty: Type<'a>, name: Option<&str>) -> Type<'a> {
        if ty.kind() == Kind::Maybe || ty == self.any || ty == self.nil {
            return ty;
        }
        let name = self.alloc_name(name, || format!("?{}", ty.name()));
        Type::new(self.arena.alloc(MaybeType::new(name, ty)))
    }

    /// A union of at least two types. Install a dispatch before calling it.
    pub fn union(&self, types: &[Type<'a>], name: Option<&str>) -> Result<Union<'a>, Error> {
        if types.len() < 2 {
            return Err(Error::combinator(
                "union",
                format!("expected at least two types, got {}", types.len()),
            ));
        }
        let name = self.alloc_name(name, || join_names(types, " | "));
        let types = self.arena.alloc_slice_copy(types);
        Ok(Union::new(self.arena.alloc(UnionType::new(name, types, self.arena))))
    }

    pub fn refinement<F>(&self, ty: Type<'a>, predicate: F, name: Option<&str>) -> Type<'a>
    where
        F: Fn(Value<'a>) -> bool + 'a,
    {
        let name = self.alloc_name(name, || format!("{{{} | <predicate>}}", ty.name()));
        let predicate: &'a Predicate<'a> = self.arena.alloc(predicate);
        Type::new(self.arena.alloc(RefinementType::new(name, ty, predicate)))
    }

    pub fn intersection(&self, types: &[Type<'a>], name: Option<&str>) -> Result<Type<'a>, Error> {
        if types.len() < 2 {
            return Err(Error::combinator(
                "intersection",
                format!("expected at least two types, got {}", types.len()),
            ));
        }
        let name = self.alloc_name(name, || join_names(types, " & "));
        let types = self.arena.alloc_slice_copy(types);
        Ok(Type::new(self.arena.alloc(IntersectionType::new(name, types))))
    }

    /// Keys of `map` are the accepted values.
    pub fn enums(&self, map: &[(&str, Value<'a>)], name: Option<&str>) -> Type<'a> {
        let entries: Vec<(&'a str, Value<'a>)> = map
            .iter()
            .map(|&(key, value)| (&*self.arena.alloc_str(key), value))
            .collect();
        let name = self.alloc_name(name, || {
            let keys: Vec<String> = entries.iter().map(|(k, _)| format!("{:?}", k)).collect();
            keys.join(" | ")
        });
        let map = self.arena.alloc_slice_copy(&entries);
        Type::new(self.arena.alloc(EnumsType::new(name, map)))
    }

    /// Enums whose values equal their keys.
    pub fn enums_from(&self, keys: &[&str], name: Option<&str>) -> Type<'a> {
        let entries: Vec<(&str, Value<'a>)> = keys
            .iter()
            .map(|&key| {
                let key: &'a str = self.arena.alloc_str(key);
                (key, Value::Str(key))
            })
            .collect();
        self.enums(&entries, name)
    }

    /// Enums from a space-separated list of keys: `"small medium large"`.
    pub fn enums_of(&self, keys: &str, name: Option<&str>) -> Type<'a> {
        let keys: Vec<&str> = keys.split_whitespace().collect();
        self.enums_from(&keys, name)
    }

    pub fn func(&self, domain: &[Type<'a>], codomain: Option<Type<'a>>, name: Option<&str>) -> Func<'a> {
        let name = self.alloc_name(name, || {
            let to = codomain.map_or("Any", |t| t.name());
            format!("({}) => {}", join_names(domain, ", "), to)
        });
        Func::new(FuncType::new_in(self.arena, name, domain, codomain))
    }

    /// A placeholder to be bound later with [`Declare::define`].
    pub fn declare(&self, name: &str) -> Declare<'a> {
        let name = self.arena.alloc_str(name);
        Declare::new(self.arena.alloc(DeclareType::new(name)))
    }
}
