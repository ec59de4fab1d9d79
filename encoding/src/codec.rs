//! Byte buffer <-> transport text conversion.

use base64::{Engine, engine::general_purpose::STANDARD};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::CodecError;

/// Encodes bytes as padded standard Base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes padded standard Base64 text back into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(text)?)
}

/// Reads the whole container into memory, then encodes it.
pub async fn read_to_text<R>(mut reader: R) -> Result<String, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(encode(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_vector() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "Zg==");
        assert_eq!(encode(b"fo"), "Zm8=");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode(&[0x00, 0x00, 0xff, 0x7f]), "AAD/fw==");
    }

    #[test]
    fn test_decode_rejects_bad_alphabet() {
        let err = decode("AA*=").unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }

    #[test]
    fn test_decode_rejects_bad_padding() {
        assert!(matches!(decode("Zg="), Err(CodecError::MalformedPayload(_))));
        assert!(matches!(decode("Zm9v="), Err(CodecError::MalformedPayload(_))));
    }
}
