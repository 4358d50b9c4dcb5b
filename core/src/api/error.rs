//! Public error types.
//!
//! Every failing operation returns an [`Error`]. Validation errors carry the
//! [`TypePath`] breadcrumb of the field that failed, rendered as
//! `Point/x: Number`.

use crate::{String, ToString, Vec, fmt};
use thiserror::Error;

/// Slash-delimited breadcrumb identifying where validation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePath(Vec<String>);

impl TypePath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for TypePath {
    fn from(segment: &str) -> Self {
        Self(alloc::vec![segment.to_string()])
    }
}

/// The ways a declared type can be misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclareMisuse {
    /// The declaration was used before `define` was called.
    Undefined,
    /// `define` was called a second time.
    Redefined,
}

impl fmt::Display for DeclareMisuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclareMisuse::Undefined => f.write_str("is declared but not defined"),
            DeclareMisuse::Redefined => f.write_str("is already defined"),
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CombinatorArgument,
    BadValue,
    UnimplementedDispatch,
    NoConstructorFound,
    DeclareMisuse,
    Update,
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A combinator was built from malformed arguments.
    #[error("Invalid argument supplied to {combinator}: {message}")]
    CombinatorArgument {
        combinator: &'static str,
        message: String,
    },

    /// A value failed a shape or predicate check.
    #[error("Invalid value {value} supplied to {path}{}", expected_suffix(.expected))]
    BadValue {
        value: String,
        path: TypePath,
        expected: Option<String>,
    },

    /// A strict struct or interface received a key it does not declare.
    #[error("Invalid additional prop \"{prop}\" supplied to {path}")]
    UnexpectedProp { prop: String, path: TypePath },

    /// A union was called before a dispatch function was installed.
    #[error("unimplemented {union}.dispatch()")]
    UnimplementedDispatch { union: String },

    /// The union's dispatch did not produce a type able to build the value.
    #[error("Invalid value {value} supplied to {path} (no constructor returned by dispatch)")]
    NoConstructorFound { value: String, path: TypePath },

    #[error("type {name} {misuse}")]
    DeclareMisuse { name: String, misuse: DeclareMisuse },

    /// Write attempted on a frozen array or object.
    #[error("Cannot assign to {key} of a frozen value")]
    Frozen { key: String },

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    #[error("{value} is not a function")]
    NotCallable { value: String },

    /// Failure raised by a native function body.
    #[error("{0}")]
    Host(String),
}

fn expected_suffix(expected: &Option<String>) -> String {
    match expected {
        Some(expected) => crate::format!(" (expected {})", expected),
        None => String::new(),
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CombinatorArgument { .. } => ErrorKind::CombinatorArgument,
            Error::BadValue { .. } | Error::UnexpectedProp { .. } => ErrorKind::BadValue,
            Error::UnimplementedDispatch { .. } => ErrorKind::UnimplementedDispatch,
            Error::NoConstructorFound { .. } => ErrorKind::NoConstructorFound,
            Error::DeclareMisuse { .. } => ErrorKind::DeclareMisuse,
            Error::Frozen { .. } | Error::InvalidUpdate(_) => ErrorKind::Update,
            Error::NotCallable { .. } | Error::Host(_) => ErrorKind::Host,
        }
    }

    /// The breadcrumb of the failing field, for validation errors.
    pub fn path(&self) -> Option<&TypePath> {
        match self {
            Error::BadValue { path, .. }
            | Error::UnexpectedProp { path, .. }
            | Error::NoConstructorFound { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn combinator(combinator: &'static str, message: impl Into<String>) -> Self {
        Error::CombinatorArgument {
            combinator,
            message: message.into(),
        }
    }

    pub fn invalid_update(message: impl Into<String>) -> Self {
        Error::InvalidUpdate(message.into())
    }

    pub fn host(message: impl Into<String>) -> Self {
        Error::Host(message.into())
    }
}
