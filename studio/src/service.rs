//! The remote speech-generation service seen by the studio.

use async_trait::async_trait;
use vocalstudio_gemini::SpeakerVoice;

use crate::error::ServiceError;
use crate::voice::{SpeakerConfig, VoiceName};

/// Remote speech generation.
///
/// Every operation returns the Base64 text of raw 24 kHz mono 16-bit PCM.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Speaks `text` in one prebuilt voice.
    async fn synthesize_single(&self, text: &str, voice: VoiceName)
    -> Result<String, ServiceError>;

    /// Speaks a script whose turns are attributed to the given speakers.
    /// Speaker order is significant and must be kept.
    async fn synthesize_multi(
        &self,
        text: &str,
        speakers: &[SpeakerConfig],
    ) -> Result<String, ServiceError>;

    /// Speaks `text` in `language` with the vocal identity of `sample`.
    async fn mirror_voice(
        &self,
        text: &str,
        sample: &str,
        mime_type: &str,
        language: &str,
    ) -> Result<String, ServiceError>;
}

#[async_trait]
impl SpeechService for vocalstudio_gemini::Client {
    async fn synthesize_single(
        &self,
        text: &str,
        voice: VoiceName,
    ) -> Result<String, ServiceError> {
        Ok(self.speech().synthesize_single(text, voice.as_str()).await?)
    }

    async fn synthesize_multi(
        &self,
        text: &str,
        speakers: &[SpeakerConfig],
    ) -> Result<String, ServiceError> {
        let speakers: Vec<SpeakerVoice> = speakers
            .iter()
            .map(|s| SpeakerVoice::new(&s.speaker_name, s.voice.as_str()))
            .collect();
        Ok(self.speech().synthesize_multi(text, &speakers).await?)
    }

    async fn mirror_voice(
        &self,
        text: &str,
        sample: &str,
        mime_type: &str,
        language: &str,
    ) -> Result<String, ServiceError> {
        Ok(self
            .speech()
            .mirror_voice(text, sample, mime_type, language)
            .await?)
    }
}
