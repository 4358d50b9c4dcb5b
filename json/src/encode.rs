use crate::error::EncodeError;
use chrono::{DateTime, SecondsFormat};
use hashbrown::HashSet;
use runtype_core::{Value, values::ValueId};
use serde_json::Value as Json;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Encodes a value as JSON.
///
/// Integral numbers become JSON integers, non-finite numbers become `null`
/// and dates become RFC 3339 strings in UTC. Cycles, functions, regular
/// expressions and errors are rejected.
pub fn to_json(value: Value<'_>) -> Result<Json, EncodeError> {
    let mut encoder = Encoder {
        active: HashSet::new(),
        path: Vec::new(),
    };
    encoder.encode(value)
}

struct Encoder {
    /// Containers on the current path from the root.
    active: HashSet<ValueId>,
    path: Vec<String>,
}

impl Encoder {
    fn encode(&mut self, value: Value<'_>) -> Result<Json, EncodeError> {
        match value {
            Value::Nil => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(b)),
            Value::Number(n) => Ok(number(n)),
            Value::Str(s) => Ok(Json::String(s.to_string())),
            Value::Date(millis) => DateTime::from_timestamp_millis(millis)
                .map(|date| Json::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)))
                .ok_or_else(|| self.unsupported("an out of range date")),
            Value::Array(arr) => {
                let id = self.enter(ValueId::of(arr))?;
                let mut items = Vec::with_capacity(arr.len());
                for (i, item) in arr.to_vec().into_iter().enumerate() {
                    self.path.push(i.to_string());
                    let encoded = self.encode(item);
                    self.path.pop();
                    items.push(encoded?);
                }
                self.active.remove(&id);
                Ok(Json::Array(items))
            }
            Value::Object(obj) => {
                let id = self.enter(ValueId::of(obj))?;
                let mut fields = serde_json::Map::new();
                for (key, field) in obj.entries() {
                    self.path.push(key.to_string());
                    let encoded = self.encode(field);
                    self.path.pop();
                    fields.insert(key.to_string(), encoded?);
                }
                self.active.remove(&id);
                Ok(Json::Object(fields))
            }
            other => Err(self.unsupported(other.type_name())),
        }
    }

    fn enter(&mut self, id: ValueId) -> Result<ValueId, EncodeError> {
        if !self.active.insert(id) {
            return Err(EncodeError::Cycle { path: self.render() });
        }
        Ok(id)
    }

    fn unsupported(&self, kind: &'static str) -> EncodeError {
        EncodeError::Unsupported {
            kind,
            path: self.render(),
        }
    }

    fn render(&self) -> String {
        if self.path.is_empty() {
            return "/".to_string();
        }
        self.path.iter().map(|segment| format!("/{}", segment)).collect()
    }
}

fn number(n: f64) -> Json {
    if !n.is_finite() {
        return Json::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Json::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(Json::Null, Json::Number)
}
