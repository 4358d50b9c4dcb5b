use crate::{
    Vec,
    api::Error,
    hydrate::{Hydration, Path, Segment},
    types::{Combinator, Meta, Type, TypeKey, matches_once},
    values::{IdentitySet, Value, ValueId},
};

/// Objects with arbitrary keys validated by `domain` and values validated by
/// `codomain`.
pub struct DictType<'a> {
    name: &'a str,
    domain: Type<'a>,
    codomain: Type<'a>,
}

impl<'a> DictType<'a> {
    pub(crate) fn new(name: &'a str, domain: Type<'a>, codomain: Type<'a>) -> Self {
        Self {
            name,
            domain,
            codomain,
        }
    }
}

impl<'a> Combinator<'a> for DictType<'a> {
    fn name(&self) -> &'a str {
        self.name
    }

    fn meta(&self) -> Meta<'a> {
        Meta::Dict {
            domain: self.domain,
            codomain: self.codomain,
        }
    }

    fn matches(&self, value: Value<'a>, seen: &mut IdentitySet) -> Result<bool, Error> {
        let Value::Object(obj) = value else {
            return Ok(false);
        };
        matches_once(seen, ValueId::of(obj), TypeKey::of(self), |seen| {
            for (key, item) in obj.entries() {
                if !self.domain.matches_in(Value::Str(key), seen)?
                    || !self.codomain.matches_in(item, seen)?
                {
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
        let key = TypeKey::of(self);
        let id = ValueId::of(raw);
        if let Some(result) = cx.state().lookup(id, key) {
            return Ok(result);
        }
        if !cx.state().enter(id, key) {
            return Err(path.bad_value(value, Some("an acyclic value".into())));
        }

        let entries = raw.entries();
        let mut out = Vec::with_capacity(entries.len());
        let mut unchanged = true;
        for (k, item) in entries {
            let domain_segment = Segment::Label(self.domain.name());
            let hydrated_key = cx.hydrate_at(self.domain, Value::Str(k), path, domain_segment)?;
            let Value::Str(new_key) = hydrated_key else {
                path.push(domain_segment);
                let err = path.bad_value(hydrated_key, Some("a string key".into()));
                path.pop();
                return Err(err);
            };
            let segment = Segment::Field(new_key, self.codomain.name());
            let hydrated = cx.hydrate_at(self.codomain, item, path, segment)?;
            unchanged &= new_key == k && hydrated.same(item);
            out.push((new_key, hydrated));
        }
        cx.state().leave(id, key);

        let result = if unchanged {
            raw.freeze();
            value
        } else {
            let rt = cx.runtime();
            let copy = rt.object(out);
            if let Value::Object(obj) = copy {
                obj.freeze();
            }
            copy
        };
        cx.state().remember(id, key, result);
        Ok(result)
    }
}
