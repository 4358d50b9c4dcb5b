use crate::{
    api::Error,
    hydrate::{Hydration, Path},
    types::{Combinator, Meta},
    values::{IdentitySet, Value, stringify},
};

/// Values that are keys of a fixed map.
pub struct EnumsType<'a> {
    name: &'a str,
    map: &'a [(&'a str, Value<'a>)],
}

impl<'a> EnumsType<'a> {
    pub(crate) fn new(name: &'a str, map: &'a [(&'a str, Value<'a>)]) -> Self {
        Self { name, map }
    }

    fn has_key(&self, key: &str) -> bool {
        self.map.iter().any(|(k, _)| *k == key)
    }
}

impl<'a> Combinator<'a> for EnumsType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Enums { map: self.map }
    }

    fn matches(&self, value: Value<'a>, _seen: &mut IdentitySet) -> Result<bool, Error> {
        Ok(match value {
            Value::Str(key) => self.has_key(key),
            // Numeric keys match their canonical rendering: `1` matches "1".
            Value::Number(_) => self.has_key(&stringify(value)),
            _ => false,
        })
    }

    fn hydrate(
        &'a self,
        _cx: &mut Hydration<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        if self.matches(value, &mut IdentitySet::new())? {
            Ok(value)
        } else {
            Err(path.bad_value(value, None))
        }
    }
}
