pub mod dynamic;
pub mod identity;
pub mod objects;
pub mod stringify;

pub use dynamic::Value;
pub use identity::{IdentityMap, IdentitySet, ValueId};
pub use objects::{ArrayObj, FuncObj, NativeFn, ObjectObj, Signature};
pub use stringify::stringify;

#[cfg(test)]
mod dynamic_test;
