//! Compact JSON-like rendering used in error messages.

use crate::{String, Vec, fmt, values::Value, values::identity::ValueId};
use core::fmt::Write;

pub fn stringify(value: Value<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_value(&mut out, value);
    out
}

pub(crate) fn write_value<W: Write>(out: &mut W, value: Value<'_>) -> fmt::Result {
    let mut stack = Vec::new();
    write_inner(out, value, &mut stack)
}

fn write_inner<W: Write>(out: &mut W, value: Value<'_>, stack: &mut Vec<ValueId>) -> fmt::Result {
    match value {
        Value::Nil => out.write_str("null"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Number(n) => write_number(out, n),
        Value::Str(s) => write_quoted(out, s),
        Value::Date(ms) => write!(out, "Date({})", ms),
        Value::RegExp(src) => write!(out, "/{}/", src),
        Value::Error(msg) => write!(out, "[Error: {}]", msg),
        Value::Func(f) => write!(out, "[Function: {}]", f.name()),
        Value::Array(items) => {
            let id = ValueId::of(items);
            if stack.contains(&id) {
                return out.write_str("[Circular]");
            }
            stack.push(id);
            out.write_char('[')?;
            for (i, item) in items.to_vec().into_iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_inner(out, item, stack)?;
            }
            stack.pop();
            out.write_char(']')
        }
        Value::Object(obj) => {
            let id = ValueId::of(obj);
            if stack.contains(&id) {
                return out.write_str("[Circular]");
            }
            stack.push(id);
            out.write_char('{')?;
            for (i, (key, field)) in obj.entries().into_iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_quoted(out, key)?;
                out.write_char(':')?;
                write_inner(out, field, stack)?;
            }
            stack.pop();
            out.write_char('}')
        }
    }
}

fn write_number<W: Write>(out: &mut W, n: f64) -> fmt::Result {
    if !n.is_finite() {
        return out.write_str("null");
    }
    if n == (n as i64) as f64 {
        write!(out, "{}", n as i64)
    } else {
        write!(out, "{}", n)
    }
}

fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}
