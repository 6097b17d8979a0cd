//! Voice configuration

use serde::{Deserialize, Serialize};

/// Voice front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Wake phrase configuration
    #[serde(default)]
    pub wake: WakeConfig,

    /// Language passed to the STT backend
    #[serde(default = "default_language")]
    pub language: String,

    /// Voice activity threshold (RMS energy, 0.0 - 1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Sample rate for audio capture
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Silence duration (ms) that ends an utterance
    #[serde(default = "default_silence_duration")]
    pub silence_duration_ms: u64,

    /// Maximum recording duration (seconds)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: u64,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_threshold() -> f32 {
    0.1
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_silence_duration() -> u64 {
    1500
}

fn default_max_duration() -> u64 {
    30
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            wake: WakeConfig::default(),
            language: default_language(),
            threshold: default_threshold(),
            sample_rate: default_sample_rate(),
            silence_duration_ms: default_silence_duration(),
            max_duration_secs: default_max_duration(),
        }
    }
}

impl VoiceConfig {
    /// Set the wake phrase
    #[must_use]
    pub fn with_wake_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.wake.phrase = phrase.into();
        self
    }

    /// Set the STT language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Wake phrase configuration.
///
/// Detection is transcript-level: the whole utterance is transcribed and
/// the phrase is matched in the text, so no acoustic keyword model is
/// needed and the command can be spoken in the same breath.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakeConfig {
    /// Primary wake phrase
    #[serde(default = "default_wake_phrase")]
    pub phrase: String,

    /// Alternative spellings the transcriber produces ("hey ora", "hey ara")
    #[serde(default = "default_wake_alternatives")]
    pub alternatives: Vec<String>,
}

fn default_wake_phrase() -> String {
    "hey aura".to_string()
}

fn default_wake_alternatives() -> Vec<String> {
    vec!["hey ora".to_string(), "hey ara".to_string()]
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            phrase: default_wake_phrase(),
            alternatives: default_wake_alternatives(),
        }
    }
}

impl WakeConfig {
    /// Create with a custom phrase and no alternatives
    #[must_use]
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            alternatives: Vec::new(),
        }
    }

    /// All phrases to match (primary + alternatives)
    #[must_use]
    pub fn all_phrases(&self) -> Vec<&str> {
        let mut phrases = vec![self.phrase.as_str()];
        phrases.extend(self.alternatives.iter().map(String::as_str));
        phrases
    }

    /// Match the wake phrase in a transcript, case-insensitively.
    ///
    /// Returns the command text that follows the phrase (trimmed of
    /// leading punctuation), or `None` when no phrase is present. An
    /// utterance that is only the wake phrase yields an empty command.
    #[must_use]
    pub fn match_command(&self, transcript: &str) -> Option<String> {
        let lower = transcript.to_lowercase();
        for phrase in self.all_phrases() {
            let needle = phrase.to_lowercase();
            if let Some(position) = lower.find(&needle) {
                let after = position + needle.len();
                // Offsets come from the lowercased copy; lowercasing can
                // change byte lengths, so fall back to the full tail.
                let tail = transcript.get(after..).unwrap_or("");
                let command = tail
                    .trim_start_matches([',', '.', '!', '?', ';', ':'])
                    .trim()
                    .to_string();
                return Some(command);
            }
        }
        None
    }
}
