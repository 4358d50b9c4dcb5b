use runtype_core::TypePath;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not well-formed JSON.
    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A container of the wrong JSON kind was found where a type expects
    /// an object or an array.
    #[error("Invalid JSON supplied to {path}: expected {expected}, found {found}")]
    Shape {
        path: TypePath,
        expected: &'static str,
        found: &'static str,
    },

    /// A registered decoder rejected its input.
    #[error("Invalid JSON supplied to {path}: {message}")]
    Custom { path: TypePath, message: String },

    /// The decoded value was rejected by its type.
    #[error(transparent)]
    Type(#[from] runtype_core::Error),
}

impl DecodeError {
    pub fn path(&self) -> Option<&TypePath> {
        match self {
            DecodeError::Syntax(_) => None,
            DecodeError::Shape { path, .. } | DecodeError::Custom { path, .. } => Some(path),
            DecodeError::Type(err) => err.path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Cannot encode cyclic value at {path}")]
    Cycle { path: String },

    #[error("Cannot encode {kind} at {path}")]
    Unsupported { kind: &'static str, path: String },
}
