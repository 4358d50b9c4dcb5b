//! Metadata-driven decoding of JSON documents into typed instances.
//!
//! The decoder walks a type's [`Meta`] alongside the JSON tree, builds raw
//! values bottom-up and finishes every level by calling the type on the raw
//! value. JSON documents are trees, so no hydration state is shared between
//! levels.

use crate::error::DecodeError;
use chrono::DateTime;
use hashbrown::HashMap;
use runtype_core::{Meta, Runtime, Type, TypePath, Value, types::TypeKey};
use serde_json::Value as Json;

/// Turns a JSON value into a raw value for one specific type.
pub type CustomDecodeFn<'a> = dyn Fn(&Runtime<'a>, &Json) -> Result<Value<'a>, String> + 'a;

/// Decodes JSON into instances of runtime types.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use runtype_core::{Runtime, TypeManager};
/// use runtype_json::Decoder;
///
/// let arena = Bump::new();
/// let types = TypeManager::new(&arena);
/// let rt = Runtime::new(&arena);
/// let point = types
///     .structure()
///     .named("Point")
///     .field("x", types.number())
///     .field("y", types.number())
///     .build()
///     .unwrap()
///     .ty();
///
/// let decoder = Decoder::new(rt);
/// let p = decoder.decode_str(point, r#"{"x": 1, "y": 2}"#).unwrap();
/// assert!(point.is(p));
///
/// let err = decoder.decode_str(point, r#"{"x": "1", "y": 2}"#).unwrap_err();
/// assert_eq!(err.to_string(), r#"Invalid value "1" supplied to Point/x: Number"#);
/// ```
pub struct Decoder<'a> {
    rt: Runtime<'a>,
    custom: HashMap<TypeKey, &'a CustomDecodeFn<'a>>,
}

impl<'a> Decoder<'a> {
    pub fn new(rt: Runtime<'a>) -> Self {
        Self {
            rt,
            custom: HashMap::new(),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_decoder<F>(mut self, ty: impl Into<Type<'a>>, decode: F) -> Self
    where
        F: Fn(&Runtime<'a>, &Json) -> Result<Value<'a>, String> + 'a,
    {
        self.register(ty, decode);
        self
    }

    /// Installs a decoder used instead of metadata-driven decoding whenever
    /// `ty` is reached. Its result is still validated by `ty`.
    pub fn register<F>(&mut self, ty: impl Into<Type<'a>>, decode: F)
    where
        F: Fn(&Runtime<'a>, &Json) -> Result<Value<'a>, String> + 'a,
    {
        let ty = ty.into();
        let decode: &'a CustomDecodeFn<'a> = self.rt.arena().alloc(decode);
        if self.custom.insert(ty.key(), decode).is_some() {
            tracing::debug!(ty = ty.name(), "Replaced custom decoder");
        }
    }

    pub fn runtime(&self) -> &Runtime<'a> {
        &self.rt
    }

    pub fn decode(&self, ty: Type<'a>, json: &Json) -> Result<Value<'a>, DecodeError> {
        let mut path = vec![ty.name().to_string()];
        self.decode_at(ty, json, &mut path)
    }

    pub fn decode_str(&self, ty: Type<'a>, source: &str) -> Result<Value<'a>, DecodeError> {
        let json: Json = serde_json::from_str(source)?;
        self.decode(ty, &json)
    }

    fn decode_at(
        &self,
        ty: Type<'a>,
        json: &Json,
        path: &mut Vec<String>,
    ) -> Result<Value<'a>, DecodeError> {
        let rt = &self.rt;
        if let Some(custom) = self.custom.get(&ty.key()) {
            let raw = custom(rt, json).map_err(|message| DecodeError::Custom {
                path: TypePath::new(path.clone()),
                message,
            })?;
            return self.finish(ty, raw, path);
        }

        let raw = match ty.meta() {
            Meta::Maybe { ty: inner } => {
                if json.is_null() {
                    Value::Nil
                } else {
                    self.decode_at(inner, json, path)?
                }
            }
            Meta::Refinement { ty: inner, .. } => self.decode_at(inner, json, path)?,
            Meta::Struct { props, .. } | Meta::Interface { props, .. } => {
                let fields = expect_object(json, path)?;
                let mut entries = Vec::with_capacity(fields.len());
                for (key, field) in fields {
                    let value = match props.iter().find(|(name, _)| name == key) {
                        Some(&(name, prop)) => {
                            self.decode_child(prop, field, path, format!("{}: {}", name, prop))?
                        }
                        // Strictness is enforced by the final call.
                        None => json_to_value(rt, field),
                    };
                    entries.push((key.as_str(), value));
                }
                rt.object(entries)
            }
            Meta::List { ty: item } => {
                let items = expect_array(json, path)?;
                let mut values = Vec::with_capacity(items.len());
                for (i, x) in items.iter().enumerate() {
                    values.push(self.decode_child(item, x, path, format!("{}: {}", i, item))?);
                }
                rt.array(values)
            }
            Meta::Tuple { types } => {
                let items = expect_array(json, path)?;
                let mut values = Vec::with_capacity(items.len());
                for (i, x) in items.iter().enumerate() {
                    values.push(match types.get(i) {
                        Some(&t) => self.decode_child(t, x, path, format!("{}: {}", i, t))?,
                        None => json_to_value(rt, x),
                    });
                }
                rt.array(values)
            }
            Meta::Dict { codomain, .. } => {
                let fields = expect_object(json, path)?;
                let mut entries = Vec::with_capacity(fields.len());
                for (key, x) in fields {
                    let value =
                        self.decode_child(codomain, x, path, format!("{}: {}", key, codomain))?;
                    entries.push((key.as_str(), value));
                }
                rt.object(entries)
            }
            Meta::Union { .. } => {
                let raw = json_to_value(rt, json);
                match ty.dispatch(raw) {
                    Ok(Some(member)) => {
                        let label = path.pop().unwrap_or_default();
                        path.push(format!("{}({})", label, member));
                        let decoded = self.decode_at(member, json, path);
                        path.pop();
                        path.push(label);
                        decoded?
                    }
                    // Let the union report the dispatch failure.
                    _ => raw,
                }
            }
            _ => json_to_value(rt, json),
        };
        self.finish(ty, raw, path)
    }

    fn decode_child(
        &self,
        ty: Type<'a>,
        json: &Json,
        path: &mut Vec<String>,
        segment: String,
    ) -> Result<Value<'a>, DecodeError> {
        path.push(segment);
        let result = self.decode_at(ty, json, path);
        path.pop();
        result
    }

    fn finish(&self, ty: Type<'a>, raw: Value<'a>, path: &[String]) -> Result<Value<'a>, DecodeError> {
        let prefix: Vec<&str> = path.iter().map(String::as_str).collect();
        Ok(ty.call_at(&self.rt, raw, &prefix)?)
    }
}

fn expect_object<'j>(
    json: &'j Json,
    path: &[String],
) -> Result<&'j serde_json::Map<String, Json>, DecodeError> {
    json.as_object().ok_or_else(|| DecodeError::Shape {
        path: TypePath::new(path.to_vec()),
        expected: "an object",
        found: json_kind(json),
    })
}

fn expect_array<'j>(json: &'j Json, path: &[String]) -> Result<&'j [Json], DecodeError> {
    json.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| DecodeError::Shape {
            path: TypePath::new(path.to_vec()),
            expected: "an array",
            found: json_kind(json),
        })
}

pub(crate) fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Converts JSON into an untyped raw value.
pub fn json_to_value<'a>(rt: &Runtime<'a>, json: &Json) -> Value<'a> {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => rt.str(s),
        Json::Array(items) => rt.array(items.iter().map(|x| json_to_value(rt, x))),
        Json::Object(fields) => rt.object(
            fields
                .iter()
                .map(|(key, x)| (key.as_str(), json_to_value(rt, x))),
        ),
    }
}

/// Decoder for date types: accepts RFC 3339 strings and epoch milliseconds.
pub fn decode_date<'a>(rt: &Runtime<'a>, json: &Json) -> Result<Value<'a>, String> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .map(|millis| rt.date(millis))
            .ok_or_else(|| format!("{} is not a whole number of milliseconds", n)),
        Json::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|date| rt.date(date.timestamp_millis()))
            .map_err(|err| format!("{:?} is not an RFC 3339 date ({})", s, err)),
        other => Err(format!("expected a date, found {}", json_kind(other))),
    }
}

/// Decodes `json` as an instance of `ty` without custom decoders.
pub fn from_json<'a>(rt: &Runtime<'a>, ty: Type<'a>, json: &Json) -> Result<Value<'a>, DecodeError> {
    Decoder::new(*rt).decode(ty, json)
}

pub fn from_json_str<'a>(
    rt: &Runtime<'a>,
    ty: Type<'a>,
    source: &str,
) -> Result<Value<'a>, DecodeError> {
    Decoder::new(*rt).decode_str(ty, source)
}
