#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![deny(unsafe_code)]

//! Runtime types for dynamic values.
//!
//! A [`TypeManager`] builds types out of a fixed set of irreducible types and
//! combinators (struct, tuple, list, dict, union, maybe, refinement,
//! intersection, interface, enums, func, declare). Calling a type on a raw
//! [`Value`] validates it and deep-hydrates it into a frozen instance.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use runtype_core::{Runtime, TypeManager, Value};
//!
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let rt = Runtime::new(&arena);
//!
//! let point = types
//!     .structure()
//!     .named("Point")
//!     .field("x", types.number())
//!     .field("y", types.number())
//!     .build()
//!     .unwrap()
//!     .ty();
//!
//! let raw = rt.object([("x", Value::from(1.0)), ("y", Value::from(2.0))]);
//! let p = point.call(&rt, raw).unwrap();
//! assert!(point.is(p));
//! assert!(p.is_frozen());
//! assert_eq!(point.call(&rt, p).unwrap(), p);
//!
//! let bad = rt.object([("x", rt.str("a")), ("y", Value::from(2.0))]);
//! let err = point.call(&rt, bad).unwrap_err();
//! assert_eq!(err.to_string(), r#"Invalid value "a" supplied to Point/x: Number"#);
//! ```

// This works on std and no_std and is harmless.
extern crate alloc;

// Exports some symbols publicly so that dependent crates can share them.
#[doc(hidden)]
pub mod shim {
    pub use alloc::{boxed::Box, fmt, format, string::String, string::ToString, vec, vec::Vec};
}

// Re-export (crate only) for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use shim::*;

pub mod api;
pub mod hydrate;
pub mod types;
pub mod update;
pub mod values;

pub use api::{Error, ErrorKind, Runtime, RuntimeOptions, TypePath};
pub use types::{Kind, Meta, Type, TypeManager};
pub use update::Patch;
pub use values::Value;

/// Logging setup shared by unit tests.
#[cfg(test)]
pub mod test_utils {
    /// Routes `tracing` output to the test writer. Honors `RUST_LOG` and
    /// falls back to `debug`, which shows cycle and reuse decisions made
    /// during hydration.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
