//! Speech generation service.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    client::ClientConfig,
    error::{Error, Result},
    http::HttpClient,
    types::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Modality,
        MultiSpeakerVoiceConfig, Part, SpeakerVoiceConfig, SpeechConfig, VoiceConfig,
    },
};

const NO_AUDIO: &str = "No audio data received from Gemini API";
const NO_AUDIO_MULTI: &str = "No audio data received from Gemini API (Multi-Speaker)";
const NO_AUDIO_MIRROR: &str =
    "Could not mirror voice. Ensure the text is written in the correct script.";

/// A speaker label in a dialogue script and the prebuilt voice that reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerVoice {
    pub speaker: String,
    pub voice_name: String,
}

impl SpeakerVoice {
    pub fn new(speaker: impl Into<String>, voice_name: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            voice_name: voice_name.into(),
        }
    }
}

/// Builds the instruction sent alongside a reference sample when mirroring.
///
/// The target language is named twice so the model keeps the sampled voice
/// even when it differs from the language of the sample.
pub fn mirror_prompt(text: &str, language: &str) -> String {
    format!(
        "You are a neural voice cloning engine. \
         First, study the attached audio sample and capture the speaker's pitch, timbre, pace and emotional tone. \
         Then, keeping that exact vocal identity, speak the text below in {language}. \
         The voice must remain recognisably the same person even if the sample was spoken in another language. \
         Pronounce it with natural regional delivery for {language}. \
         Text to speak: \"{text}\""
    )
}

/// Speech generation service.
pub struct SpeechService {
    http: Arc<HttpClient>,
    config: Arc<ClientConfig>,
}

impl SpeechService {
    pub(crate) fn new(http: Arc<HttpClient>, config: Arc<ClientConfig>) -> Self {
        Self { http, config }
    }

    /// Calls `generateContent` on the given model.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let path = format!("/v1beta/models/{}:generateContent", model);
        self.http.post(&path, request).await
    }

    /// Reads `text` aloud with a single prebuilt voice.
    ///
    /// Returns the Base64 text of 24 kHz mono 16-bit PCM.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn run(client: vocalstudio_gemini::Client) -> vocalstudio_gemini::Result<()> {
    /// let audio = client.speech().synthesize_single("Hi", "Kore").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn synthesize_single(&self, text: &str, voice_name: &str) -> Result<String> {
        debug!(voice = voice_name, chars = text.len(), "synthesize single");
        let request = single_speaker_request(text, voice_name);
        let response = self.generate(&self.config.tts_model, &request).await?;
        extract_first(&response, NO_AUDIO)
    }

    /// Reads a `Name: line` script with one voice per speaker.
    ///
    /// Speaker order is preserved in the request.
    pub async fn synthesize_multi(&self, text: &str, speakers: &[SpeakerVoice]) -> Result<String> {
        if speakers.is_empty() {
            return Err(Error::Config("at least one speaker is required".to_string()));
        }
        debug!(speakers = speakers.len(), chars = text.len(), "synthesize multi");
        let request = multi_speaker_request(text, speakers);
        let response = self.generate(&self.config.tts_model, &request).await?;
        extract_first(&response, NO_AUDIO_MULTI)
    }

    /// Speaks `text` in `language` using the voice of a recorded sample.
    ///
    /// `sample` is the Base64 text of the recorded container and
    /// `mime_type` its media type.
    pub async fn mirror_voice(
        &self,
        text: &str,
        sample: &str,
        mime_type: &str,
        language: &str,
    ) -> Result<String> {
        debug!(language, mime_type, sample_chars = sample.len(), "mirror voice");
        let request = mirror_request(text, sample, mime_type, language);
        let response = self
            .generate(&self.config.native_audio_model, &request)
            .await?;
        match response.find_audio() {
            Some(data) => Ok(data.data.clone()),
            None => {
                warn!(
                    candidates = response.candidates.len(),
                    "mirror response carried no audio"
                );
                Err(Error::EmptyResponse(NO_AUDIO_MIRROR.to_string()))
            }
        }
    }
}

fn extract_first(response: &GenerateContentResponse, message: &str) -> Result<String> {
    match response.first_part_audio() {
        Some(data) => Ok(data.data.clone()),
        None => {
            warn!(candidates = response.candidates.len(), "response carried no audio");
            Err(Error::EmptyResponse(message.to_string()))
        }
    }
}

fn audio_request(parts: Vec<Part>, speech_config: Option<SpeechConfig>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::new(parts)],
        generation_config: GenerationConfig {
            response_modalities: vec![Modality::Audio],
            speech_config,
        },
    }
}

pub(crate) fn single_speaker_request(text: &str, voice_name: &str) -> GenerateContentRequest {
    audio_request(
        vec![Part::text(text)],
        Some(SpeechConfig {
            voice_config: Some(VoiceConfig::prebuilt(voice_name)),
            multi_speaker_voice_config: None,
        }),
    )
}

pub(crate) fn multi_speaker_request(
    text: &str,
    speakers: &[SpeakerVoice],
) -> GenerateContentRequest {
    let speaker_voice_configs = speakers
        .iter()
        .map(|s| SpeakerVoiceConfig {
            speaker: s.speaker.clone(),
            voice_config: VoiceConfig::prebuilt(&s.voice_name),
        })
        .collect();

    audio_request(
        vec![Part::text(text)],
        Some(SpeechConfig {
            voice_config: None,
            multi_speaker_voice_config: Some(MultiSpeakerVoiceConfig {
                speaker_voice_configs,
            }),
        }),
    )
}

pub(crate) fn mirror_request(
    text: &str,
    sample: &str,
    mime_type: &str,
    language: &str,
) -> GenerateContentRequest {
    audio_request(
        vec![
            Part::inline(mime_type, sample),
            Part::text(mirror_prompt(text, language)),
        ],
        None,
    )
}
