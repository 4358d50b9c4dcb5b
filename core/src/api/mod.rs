//! Public API: errors, runtime context and options.
//!
//! A [`Runtime`] owns nothing but a reference to the value arena and the
//! injected [`RuntimeOptions`]; it is passed to every type call.

pub mod error;
pub mod options;
pub mod runtime;

pub use error::{DeclareMisuse, Error, ErrorKind, TypePath};
pub use options::{FailHook, RuntimeOptions};
pub use runtime::Runtime;
