//! JSON support for runtype.
//!
//! [`Decoder`] turns `serde_json` documents into typed instances by reading
//! each type's metadata; [`to_json`] goes the other way. Decoding is a plain
//! consumer of the core API: it builds raw values and lets the types validate
//! them, so every error carries the same path as a direct call would.

mod decode;
mod encode;
mod error;

pub use decode::{
    CustomDecodeFn, Decoder, decode_date, from_json, from_json_str, json_to_value,
};
pub use encode::to_json;
pub use error::{DecodeError, EncodeError};
