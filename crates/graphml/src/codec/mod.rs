//! GraphML encoding/decoding.
//!
//! [`value`] converts typed attribute values to and from text; [`decode`]
//! and [`encode`] map whole documents to and from XML.

pub mod decode;
pub mod encode;
pub mod value;

pub use decode::{DecodeOptions, UnknownElements, decode, decode_str, decode_with_options};
pub use encode::{EncodeOptions, encode, encode_to_string, encode_to_vec, encode_with_options};
pub use value::{decode_value, encode_value};
