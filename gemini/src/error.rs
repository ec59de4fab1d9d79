//! Error types for the Gemini API client.

use thiserror::Error;

/// Result type alias for Gemini operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Gemini API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by Gemini.
    #[error("gemini: {message} (code={code}, status={status})")]
    Api {
        code: i32,
        message: String,
        status: String,
        http_status: u16,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response carried no usable audio.
    #[error("{0}")]
    EmptyResponse(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(
        code: i32,
        message: impl Into<String>,
        status: impl Into<String>,
        http_status: u16,
    ) -> Self {
        Error::Api {
            code,
            message: message.into(),
            status: status.into(),
            http_status,
        }
    }

    /// Returns true if this is a rate limit or quota error.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Error::Api {
                status,
                http_status,
                ..
            } => *http_status == 429 || status == "RESOURCE_EXHAUSTED",
            _ => false,
        }
    }

    /// Returns true if the API key was rejected.
    pub fn is_invalid_api_key(&self) -> bool {
        match self {
            Error::Api {
                message,
                status,
                http_status,
                ..
            } => {
                *http_status == 401
                    || *http_status == 403
                    || status == "UNAUTHENTICATED"
                    || message.contains("API key not valid")
            }
            _ => false,
        }
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { http_status, .. } => *http_status >= 500,
            _ => false,
        }
    }

    /// Returns true if the service answered without audio.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Error::EmptyResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_classification() {
        let err = Error::api(429, "quota", "RESOURCE_EXHAUSTED", 429);
        assert!(err.is_rate_limit());
        assert!(!err.is_server_error());

        let err = Error::api(400, "API key not valid. Please pass a valid API key.", "INVALID_ARGUMENT", 400);
        assert!(err.is_invalid_api_key());

        let err = Error::api(503, "overloaded", "UNAVAILABLE", 503);
        assert!(err.is_server_error());
        assert_eq!(err.to_string(), "gemini: overloaded (code=503, status=UNAVAILABLE)");
    }

    #[test]
    fn test_empty_response_display() {
        let err = Error::EmptyResponse("No audio data received".to_string());
        assert!(err.is_empty_response());
        assert_eq!(err.to_string(), "No audio data received");
    }
}
