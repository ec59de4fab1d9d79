//! Gemini API client.

use std::sync::Arc;
use std::time::Duration;

use super::{
    error::{Error, Result},
    http::HttpClient,
    speech::SpeechService,
};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for prebuilt-voice text-to-speech.
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default model for voice mirroring.
pub const DEFAULT_NATIVE_AUDIO_MODEL: &str = "gemini-2.5-flash-native-audio-preview-12-2025";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Gemini API client.
///
/// # Example
///
/// ```rust,no_run
/// use vocalstudio_gemini::Client;
///
/// # async fn run() -> vocalstudio_gemini::Result<()> {
/// let client = Client::new("your-api-key")?;
/// let audio_b64 = client.speech().synthesize_single("Hello!", "Kore").await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    config: Arc<ClientConfig>,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub(crate) struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) tts_model: String,
    pub(crate) native_audio_model: String,
}

impl Client {
    /// Creates a new client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn tts_model(&self) -> &str {
        &self.config.tts_model
    }

    pub fn native_audio_model(&self) -> &str {
        &self.config.native_audio_model
    }

    /// Returns the speech generation service.
    pub fn speech(&self) -> SpeechService {
        SpeechService::new(self.http.clone(), self.config.clone())
    }
}

/// Builder for creating a Gemini API client.
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    tts_model: String,
    native_audio_model: String,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            native_audio_model: DEFAULT_NATIVE_AUDIO_MODEL.to_string(),
        }
    }

    /// Sets a custom base URL, e.g. a regional endpoint or a proxy.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the HTTP timeout for a single request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the model used for single- and multi-speaker synthesis.
    pub fn tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    /// Sets the model used for voice mirroring.
    pub fn native_audio_model(mut self, model: impl Into<String>) -> Self {
        self.native_audio_model = model.into();
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("api_key must be non-empty".to_string()));
        }
        if self.tts_model.is_empty() || self.native_audio_model.is_empty() {
            return Err(Error::Config("model names must be non-empty".to_string()));
        }

        let base_url = self.base_url.trim_end_matches('/').to_string();
        let http = HttpClient::new(base_url.clone(), self.api_key.clone(), self.timeout)?;

        Ok(Client {
            http: Arc::new(http),
            config: Arc::new(ClientConfig {
                api_key: self.api_key,
                base_url,
                tts_model: self.tts_model,
                native_audio_model: self.native_audio_model,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = Client::new("key").unwrap();
        assert_eq!(client.api_key(), "key");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.tts_model(), DEFAULT_TTS_MODEL);
        assert_eq!(client.native_audio_model(), DEFAULT_NATIVE_AUDIO_MODEL);
    }

    #[test]
    fn test_builder_overrides() {
        let client = Client::builder("key")
            .base_url("http://localhost:8080/")
            .tts_model("tts-x")
            .native_audio_model("native-x")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.tts_model(), "tts-x");
        assert_eq!(client.native_audio_model(), "native-x");
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        assert!(matches!(Client::new(""), Err(Error::Config(_))));
    }
}
