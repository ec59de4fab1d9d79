//! Voice, speaker, mode and language catalogs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A prebuilt synthetic voice timbre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceName {
    #[default]
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl VoiceName {
    pub const ALL: [VoiceName; 5] = [
        VoiceName::Kore,
        VoiceName::Puck,
        VoiceName::Charon,
        VoiceName::Fenrir,
        VoiceName::Zephyr,
    ];

    /// Returns the name the speech service knows the voice by.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceName::Kore => "Kore",
            VoiceName::Puck => "Puck",
            VoiceName::Charon => "Charon",
            VoiceName::Fenrir => "Fenrir",
            VoiceName::Zephyr => "Zephyr",
        }
    }

    /// Returns the catalog entry for this voice.
    pub fn option(&self) -> &'static VoiceOption {
        // VOICES holds one entry per variant in declaration order.
        &VOICES[*self as usize]
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceName::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownVoice(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("Male"),
            Gender::Female => f.write_str("Female"),
        }
    }
}

/// A voice as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub name: VoiceName,
    pub gender: Gender,
    pub description: &'static str,
}

pub const VOICES: [VoiceOption; 5] = [
    VoiceOption {
        name: VoiceName::Kore,
        gender: Gender::Female,
        description: "Warm and professional",
    },
    VoiceOption {
        name: VoiceName::Puck,
        gender: Gender::Male,
        description: "Youthful and energetic",
    },
    VoiceOption {
        name: VoiceName::Charon,
        gender: Gender::Male,
        description: "Deep and authoritative",
    },
    VoiceOption {
        name: VoiceName::Fenrir,
        gender: Gender::Male,
        description: "Friendly and conversational",
    },
    VoiceOption {
        name: VoiceName::Zephyr,
        gender: Gender::Female,
        description: "Ethereal and clear",
    },
];

/// One named participant of a dialogue script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerConfig {
    pub speaker_name: String,
    pub voice: VoiceName,
}

impl SpeakerConfig {
    pub const NEW_SPEAKER_NAME: &'static str = "New Person";

    pub fn new(speaker_name: impl Into<String>, voice: VoiceName) -> Self {
        Self {
            speaker_name: speaker_name.into(),
            voice,
        }
    }

    /// Returns the entry appended when a user adds a speaker.
    pub fn new_speaker() -> Self {
        Self::new(Self::NEW_SPEAKER_NAME, VoiceName::Fenrir)
    }
}

impl FromStr for SpeakerConfig {
    type Err = CatalogError;

    /// Parses `NAME=VOICE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, voice) = s
            .split_once('=')
            .ok_or_else(|| CatalogError::InvalidSpeaker(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidSpeaker(s.to_string()));
        }
        Ok(Self::new(name, voice.parse()?))
    }
}

/// The cast of the sample dialogue.
pub fn default_speakers() -> Vec<SpeakerConfig> {
    vec![
        SpeakerConfig::new("Narrator", VoiceName::Charon),
        SpeakerConfig::new("Aria", VoiceName::Zephyr),
        SpeakerConfig::new("Leo", VoiceName::Puck),
    ]
}

/// Synthesis mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Multi,
    Mirror,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Single => "single",
            Mode::Multi => "multi",
            Mode::Mirror => "mirror",
        }
    }

    /// Returns the text a mode starts out with.
    pub fn default_text(&self, language_id: &str) -> &'static str {
        match self {
            Mode::Single => SAMPLE_TEXT_SINGLE,
            Mode::Multi => SAMPLE_TEXT_MULTI,
            Mode::Mirror => mirror_text(language_id),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "multi" => Ok(Mode::Multi),
            "mirror" => Ok(Mode::Mirror),
            _ => Err(CatalogError::UnknownMode(s.to_string())),
        }
    }
}

/// A target language for voice mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: [Language; 8] = [
    Language { id: "english", name: "English" },
    Language { id: "hindi", name: "Hindi" },
    Language { id: "kannada", name: "Kannada" },
    Language { id: "telugu", name: "Telugu" },
    Language { id: "tamil", name: "Tamil" },
    Language { id: "malayalam", name: "Malayalam" },
    Language { id: "marathi", name: "Marathi" },
    Language { id: "lambani", name: "Lambani (Banjara)" },
];

/// Looks up a language by id, ignoring case.
pub fn language(id: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.id.eq_ignore_ascii_case(id.trim()))
}

/// Looks up a language by id. Unknown ids resolve to English.
pub fn find_language(id: &str) -> &'static Language {
    language(id).unwrap_or(&LANGUAGES[0])
}

pub const SAMPLE_TEXT_SINGLE: &str = "Hello there! I am powered by Gemini's latest text-to-speech technology. How can I help you synthesize reality today?";

pub const SAMPLE_TEXT_MULTI: &str = "Narrator: In a world of silicon and code, two voices met.\nAria: Hello? Is anyone there?\nLeo: I am here, Aria. The synthesis is complete.";

const MIRROR_TEXTS: [(&str, &str); 4] = [
    ("kannada", "ನಮಸ್ಕಾರ, ನನ್ನ ಧ್ವನಿಯನ್ನು ಈ ಭಾಷೆಯಲ್ಲಿ ಕೇಳಲು ನನಗೆ ತುಂಬಾ ಸಂತೋಷವಾಗಿದೆ."),
    ("hindi", "नमस्ते, मुझे इस भाषा में अपनी आवाज़ सुनकर बहुत खुशी हो रही है।"),
    ("lambani", "राम राम, मारी आवाज येर मा सांबळने मने गणो आनंद वेरो छ।"),
    ("english", "I am amazed to hear my own voice recreated so naturally with AI."),
];

/// Returns the starter sentence for mirroring into `language_id`, in that
/// language's script. Languages without one get the English sentence.
pub fn mirror_text(language_id: &str) -> &'static str {
    let id = language_id.trim();
    MIRROR_TEXTS
        .iter()
        .find(|(lang, _)| lang.eq_ignore_ascii_case(id))
        .or_else(|| MIRROR_TEXTS.iter().find(|(lang, _)| *lang == "english"))
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_catalog_matches_variants() {
        for voice in VoiceName::ALL {
            assert_eq!(voice.option().name, voice);
        }
        assert_eq!(VoiceName::Charon.option().description, "Deep and authoritative");
        assert_eq!(VoiceName::Zephyr.option().gender, Gender::Female);
    }

    #[test]
    fn test_voice_from_str() {
        assert_eq!("kore".parse::<VoiceName>().unwrap(), VoiceName::Kore);
        assert_eq!(" Fenrir ".parse::<VoiceName>().unwrap(), VoiceName::Fenrir);
        assert!(matches!(
            "Alloy".parse::<VoiceName>(),
            Err(CatalogError::UnknownVoice(_))
        ));
    }

    #[test]
    fn test_voice_serde() {
        assert_eq!(serde_json::to_string(&VoiceName::Puck).unwrap(), "\"Puck\"");
        let v: VoiceName = serde_json::from_str("\"Zephyr\"").unwrap();
        assert_eq!(v, VoiceName::Zephyr);
    }

    #[test]
    fn test_speaker_from_str() {
        let s: SpeakerConfig = "Narrator=charon".parse().unwrap();
        assert_eq!(s, SpeakerConfig::new("Narrator", VoiceName::Charon));
        assert!("Narrator".parse::<SpeakerConfig>().is_err());
        assert!("=Kore".parse::<SpeakerConfig>().is_err());
        assert!("Leo=Nobody".parse::<SpeakerConfig>().is_err());
    }

    #[test]
    fn test_default_speakers_order() {
        let names: Vec<_> = default_speakers()
            .into_iter()
            .map(|s| s.speaker_name)
            .collect();
        assert_eq!(names, ["Narrator", "Aria", "Leo"]);
        assert_eq!(SpeakerConfig::new_speaker().voice, VoiceName::Fenrir);
    }

    #[test]
    fn test_find_language_fallback() {
        assert_eq!(find_language("kannada").name, "Kannada");
        assert_eq!(find_language("lambani").name, "Lambani (Banjara)");
        assert_eq!(find_language("klingon").name, "English");
        assert_eq!(find_language("").name, "English");
        assert_eq!(language("Hindi").map(|l| l.id), Some("hindi"));
        assert!(language("klingon").is_none());
    }

    #[test]
    fn test_mode_default_text() {
        assert_eq!(Mode::Single.default_text("english"), SAMPLE_TEXT_SINGLE);
        assert_eq!(Mode::Multi.default_text("english"), SAMPLE_TEXT_MULTI);
        assert!(Mode::Mirror.default_text("hindi").starts_with("नमस्ते"));
        assert_eq!(
            Mode::Mirror.default_text("tamil"),
            "I am amazed to hear my own voice recreated so naturally with AI."
        );
        assert_eq!("MIRROR".parse::<Mode>().unwrap(), Mode::Mirror);
    }
}
