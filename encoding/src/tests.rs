//! Tests for the audio payload codec.

use super::*;

// ============================================================================
// Round trip
// ============================================================================

/// Deterministic byte patterns covering every byte value and all three
/// padding remainders.
fn sample_buffers() -> Vec<Vec<u8>> {
    let mut buffers = vec![Vec::new(), vec![0], vec![0xff, 0xfe], vec![0x00, 0x00, 0xff, 0x7f]];
    buffers.push((0..=255u8).collect());
    let mut state = 0x2545_f491_u32;
    for len in [1usize, 2, 3, 17, 1000, 4801] {
        let buf = (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();
        buffers.push(buf);
    }
    buffers
}

#[test]
fn test_round_trip_is_exact() {
    for buf in sample_buffers() {
        let text = encode(&buf);
        assert_eq!(decode(&text).unwrap(), buf, "len={}", buf.len());
    }
}

#[test]
fn test_encode_is_deterministic() {
    let buf: Vec<u8> = (0..=255u8).rev().collect();
    assert_eq!(encode(&buf), encode(&buf));
}

#[test]
fn test_decode_rejects_whitespace() {
    assert!(matches!(decode("AAD/\nfw=="), Err(CodecError::MalformedPayload(_))));
}

#[test]
fn test_decode_rejects_url_safe_alphabet() {
    // '-' and '_' belong to the URL-safe alphabet only.
    assert!(matches!(decode("AAD_fw=="), Err(CodecError::MalformedPayload(_))));
    assert!(matches!(decode("AAD-fw=="), Err(CodecError::MalformedPayload(_))));
}

// ============================================================================
// Container reads
// ============================================================================

#[tokio::test]
async fn test_read_to_text_encodes_full_container() {
    let container: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let text = read_to_text(container.as_slice()).await.unwrap();
    assert_eq!(decode(&text).unwrap(), container);
}

#[tokio::test]
async fn test_read_to_text_empty_container() {
    let text = read_to_text(tokio::io::empty()).await.unwrap();
    assert_eq!(text, "");
}

struct RevokedReader;

impl tokio::io::AsyncRead for RevokedReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "blob handle revoked",
        )))
    }
}

#[tokio::test]
async fn test_read_to_text_read_error() {
    let err = read_to_text(RevokedReader).await.unwrap_err();
    assert!(matches!(err, CodecError::Read(_)));
    assert!(err.to_string().contains("revoked"));
}
