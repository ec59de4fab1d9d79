//! HTTP client implementation for the Gemini API.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use super::error::{Error, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini API.
///
/// Requests are sent once. Failures surface to the caller unchanged.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        let headers = default_headers(&api_key)?;

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// POSTs a JSON body and decodes the JSON response.
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "gemini request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handles the API response.
    async fn handle_response<R>(&self, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "gemini response");

        if !status.is_success() {
            return Err(parse_error(&body, status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(Error::from)
    }
}

/// Returns default headers for API requests.
fn default_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(api_key)
            .map_err(|e| Error::Config(format!("invalid api key: {}", e)))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("vocalstudio-gemini-rust/1.0"),
    );
    Ok(headers)
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Parses an error response body.
pub(crate) fn parse_error(body: &[u8], http_status: u16) -> Error {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let code = if envelope.error.code == 0 {
            http_status as i32
        } else {
            envelope.error.code
        };
        return Error::api(
            code,
            envelope.error.message,
            envelope.error.status,
            http_status,
        );
    }

    Error::api(
        http_status as i32,
        String::from_utf8_lossy(body).to_string(),
        "",
        http_status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_envelope() {
        let body = br#"{
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        }"#;
        let err = parse_error(body, 400);
        match &err {
            Error::Api {
                code,
                status,
                http_status,
                ..
            } => {
                assert_eq!(*code, 400);
                assert_eq!(status, "INVALID_ARGUMENT");
                assert_eq!(*http_status, 400);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_invalid_api_key());
    }

    #[test]
    fn test_parse_error_plain_body() {
        let err = parse_error(b"upstream connect error", 502);
        match err {
            Error::Api { code, message, .. } => {
                assert_eq!(code, 502);
                assert_eq!(message, "upstream connect error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers("secret").unwrap();
        assert_eq!(headers.get("x-goog-api-key").unwrap(), "secret");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_default_headers_rejects_control_chars() {
        assert!(matches!(default_headers("bad\nkey"), Err(Error::Config(_))));
    }
}
