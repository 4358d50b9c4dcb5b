//! runtype - runtime type checking and hydration for dynamic values
//!
//! # Overview
//!
//! Types are built from irreducible types and combinators and live in an
//! arena. Calling a type on a raw value validates it and returns a frozen
//! instance; calling it again on the instance returns the instance itself.
//! Common uses include:
//!
//! - Validating configuration and payloads at system boundaries
//! - Building immutable domain objects from untrusted data
//! - Checking arguments and results of host functions
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use runtype::{Runtime, TypeManager, Value};
//!
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let rt = Runtime::new(&arena);
//!
//! let tree = types.declare("TreeItem");
//! let item = types
//!     .structure()
//!     .named("TreeItem")
//!     .field("id", types.number())
//!     .field("parent", types.maybe(tree.ty(), None))
//!     .field("children", types.list(tree.ty(), None))
//!     .build()
//!     .unwrap();
//! let tree = tree.define(item).unwrap();
//!
//! let child = rt.object([("id", Value::from(2)), ("children", rt.array([]))]);
//! let root = rt.object([("id", Value::from(1)), ("children", rt.array([child]))]);
//! child.as_object().unwrap().set("parent", root).unwrap();
//!
//! let result = tree.call(&rt, root).unwrap();
//! assert_eq!(result.get("children").at(0).get("parent"), result);
//! assert_eq!(tree.call(&rt, result).unwrap(), result);
//! ```
//!
//! # JSON
//!
//! ```
//! use bumpalo::Bump;
//! use runtype::{Decoder, Runtime, TypeManager, decode_date, to_json};
//!
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let rt = Runtime::new(&arena);
//! let event = types
//!     .structure()
//!     .named("Event")
//!     .field("at", types.date())
//!     .build()
//!     .unwrap()
//!     .ty();
//!
//! let decoder = Decoder::new(rt).with_decoder(types.date(), decode_date);
//! let e = decoder.decode_str(event, r#"{"at": "2024-01-01T00:00:00Z"}"#).unwrap();
//! assert_eq!(
//!     to_json(e).unwrap(),
//!     serde_json::json!({"at": "2024-01-01T00:00:00.000Z"})
//! );
//! ```

pub mod error_renderer;
pub use error_renderer::{
    CharSet, RenderConfig, render_error, render_error_to, render_value_error_to,
};

pub use runtype_core::api::{DeclareMisuse, FailHook};
pub use runtype_core::types::{
    self, Declare, DispatchFn, Func, Interface, InterfaceBuilder, Struct, StructBuilder, Union,
};
pub use runtype_core::update::{self, PatchKey, Splice};
pub use runtype_core::values::{self, NativeFn, stringify};
pub use runtype_core::{
    Error, ErrorKind, Kind, Meta, Patch, Runtime, RuntimeOptions, Type, TypeManager, TypePath,
    Value,
};

pub use runtype_json::{
    CustomDecodeFn, DecodeError, Decoder, EncodeError, decode_date, from_json, from_json_str,
    json_to_value, to_json,
};
