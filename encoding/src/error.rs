//! Codec errors.

use thiserror::Error;

/// Error type for codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not valid Base64 (bad alphabet, length, or padding).
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] base64::DecodeError),

    /// The binary container could not be read.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}
