//! Error types for the studio.

use std::time::Duration;

use thiserror::Error;
use vocalstudio_audio::container::ContainerError;
use vocalstudio_audio::device::DeviceError;

/// Error type for catalog lookups and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown voice: {0}")]
    UnknownVoice(String),

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Speaker specs are written `NAME=VOICE`.
    #[error("invalid speaker {0:?}, expected NAME=VOICE")]
    InvalidSpeaker(String),
}

/// Error type for the remote speech service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered without a usable audio payload.
    #[error("{0}")]
    EmptyResponse(String),

    /// The request failed on the way to or from the service.
    #[error("{0}")]
    Transport(String),
}

impl From<vocalstudio_gemini::Error> for ServiceError {
    fn from(err: vocalstudio_gemini::Error) -> Self {
        match err {
            vocalstudio_gemini::Error::EmptyResponse(msg) => ServiceError::EmptyResponse(msg),
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

/// Error type for microphone capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Microphone access was refused. The engine is back to idle.
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    /// A session is already recording. Stop it first.
    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// The recorder task ended abnormally.
    #[error("recorder aborted: {0}")]
    Aborted(String),
}

/// Error type for synthesis requests.
///
/// Failures anywhere in the request, decode and playback pipeline are
/// reported as [`SynthesisError::Failed`] with the cause's message.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The request was rejected before reaching the service.
    #[error("{0}")]
    Validation(String),

    #[error("Please record a voice sample first to clone your identity.")]
    MissingSample,

    /// Another request from this studio is still outstanding.
    #[error("a synthesis request is already in progress")]
    Busy,

    #[error("{0}")]
    Failed(String),

    /// The request was abandoned by a mode switch or an explicit cancel.
    #[error("synthesis cancelled")]
    Cancelled,

    #[error("synthesis timed out after {0:?}")]
    TimedOut(Duration),

    #[error("studio is closed")]
    Closed,
}

impl SynthesisError {
    pub(crate) fn failed(err: impl std::fmt::Display) -> Self {
        SynthesisError::Failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_from_sdk() {
        let err: ServiceError =
            vocalstudio_gemini::Error::EmptyResponse("No audio data received from Gemini API".into())
                .into();
        assert!(matches!(err, ServiceError::EmptyResponse(_)));
        assert_eq!(err.to_string(), "No audio data received from Gemini API");

        let err: ServiceError =
            vocalstudio_gemini::Error::api(500, "internal", "INTERNAL", 500).into();
        assert!(matches!(err, ServiceError::Transport(_)));
        assert!(err.to_string().contains("internal"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            SynthesisError::MissingSample.to_string(),
            "Please record a voice sample first to clone your identity."
        );
        assert!(SynthesisError::failed("bad padding").to_string().contains("bad padding"));
        assert!(
            CaptureError::PermissionDenied("blocked".into())
                .to_string()
                .contains("blocked")
        );
    }
}
