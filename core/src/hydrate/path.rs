use crate::{
    String, ToString, Vec,
    api::{Error, TypePath},
    format,
    values::{Value, stringify},
};
use smallvec::SmallVec;

/// One step of the breadcrumb built while hydrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A bare label, usually a type name.
    Label(&'a str),
    /// `name: Type` for a struct or interface field.
    Field(&'a str, &'a str),
    /// `i: Type` for a tuple or list element.
    Index(usize, &'a str),
    /// `(Type)` appended to the previous segment when a union dispatches.
    Dispatched(&'a str),
}

#[derive(Debug, Clone, Default)]
pub struct Path<'a> {
    segments: SmallVec<[Segment<'a>; 8]>,
}

impl<'a> Path<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(name: &'a str) -> Self {
        let mut path = Self::new();
        path.push(Segment::Label(name));
        path
    }

    pub fn push(&mut self, segment: Segment<'a>) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment<'a>> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Number of segments once dispatch markers are folded into their parent.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Dispatched(_) if i > 0 => {}
                _ => depth += 1,
            }
        }
        depth
    }

    pub fn render(&self) -> TypePath {
        let mut out: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match *segment {
                Segment::Label(label) => out.push(label.to_string()),
                Segment::Field(name, ty) => out.push(format!("{}: {}", name, ty)),
                Segment::Index(i, ty) => out.push(format!("{}: {}", i, ty)),
                Segment::Dispatched(ty) => match out.last_mut() {
                    Some(last) => {
                        last.push('(');
                        last.push_str(ty);
                        last.push(')');
                    }
                    None => out.push(format!("({})", ty)),
                },
            }
        }
        TypePath::new(out)
    }

    pub fn bad_value(&self, value: Value<'_>, expected: Option<String>) -> Error {
        Error::BadValue {
            value: stringify(value),
            path: self.render(),
            expected,
        }
    }

    pub fn unexpected_prop(&self, prop: &str) -> Error {
        Error::UnexpectedProp {
            prop: prop.to_string(),
            path: self.render(),
        }
    }

    pub fn no_constructor(&self, value: Value<'_>) -> Error {
        Error::NoConstructorFound {
            value: stringify(value),
            path: self.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_segments() {
        let mut path = Path::root("Shape");
        path.push(Segment::Dispatched("Circle"));
        path.push(Segment::Field("center", "Point"));
        path.push(Segment::Index(0, "Number"));
        assert_eq!(
            path.render().to_string(),
            "Shape(Circle)/center: Point/0: Number"
        );
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_bad_value_with_expectation() {
        let path = Path::root("Point");
        let err = path.bad_value(Value::Number(1.0), Some("an object".to_string()));
        assert_eq!(
            err.to_string(),
            "Invalid value 1 supplied to Point (expected an object)"
        );
    }
}
