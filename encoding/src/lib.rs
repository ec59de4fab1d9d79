//! Binary/text codec for audio payloads.
//!
//! Audio travels to and from the speech service as standard Base64 text.
//! This crate provides:
//!
//! - [`encode`] / [`decode`]: exact round-trip conversion between bytes and text
//! - [`read_to_text`]: reads an opaque binary container fully, then encodes it
//!
//! # Example
//!
//! ```rust
//! use vocalstudio_encoding::{decode, encode};
//!
//! let text = encode(&[0x00, 0x00, 0xff, 0x7f]);
//! assert_eq!(text, "AAD/fw==");
//! assert_eq!(decode(&text).unwrap(), vec![0x00, 0x00, 0xff, 0x7f]);
//! ```

mod codec;
mod error;

pub use codec::{decode, encode, read_to_text};
pub use error::CodecError;

#[cfg(test)]
mod tests;
