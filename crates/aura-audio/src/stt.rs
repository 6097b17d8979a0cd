//! Speech-to-text via the OpenAI Whisper API
//!
//! Requires `OPENAI_API_KEY`. When the key is absent the engine is
//! constructed disabled and every transcription fails with
//! [`Error::NotEnabled`]; the agent falls back to text-only dispatch.

use crate::error::{Error, Result};
use async_openai::{
    config::OpenAIConfig,
    types::audio::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs},
    Client,
};
use tracing::{debug, info, warn};

/// Whisper API speech-to-text engine
pub struct SpeechToText {
    client: Option<Client<OpenAIConfig>>,
    language: String,
}

impl SpeechToText {
    /// Create an engine for the given language.
    ///
    /// If `OPENAI_API_KEY` is not set, transcription is disabled.
    #[must_use]
    pub fn new(language: &str) -> Self {
        let client = if std::env::var("OPENAI_API_KEY").is_ok() {
            info!(language, "STT initialized");
            Some(Client::new())
        } else {
            warn!("OPENAI_API_KEY not set, STT disabled");
            None
        };

        Self {
            client,
            language: language.to_string(),
        }
    }

    /// Whether a transcription backend is available
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Configured language
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Transcribe WAV audio to text
    pub async fn transcribe(&self, audio_bytes: &[u8]) -> Result<String> {
        if audio_bytes.len() < 44 {
            return Err(Error::Stt("audio data too short".to_string()));
        }
        if &audio_bytes[0..4] != b"RIFF" || &audio_bytes[8..12] != b"WAVE" {
            return Err(Error::Stt("invalid WAV format".to_string()));
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::NotEnabled("STT requires OPENAI_API_KEY".to_string()))?;

        debug!(bytes = audio_bytes.len(), "transcribing");

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                "audio.wav".to_string(),
                audio_bytes.to_vec(),
            ))
            .model("whisper-1")
            .language(&self.language)
            .response_format(AudioResponseFormat::Text)
            .build()
            .map_err(|e| Error::Stt(format!("failed to build request: {e}")))?;

        let response = client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(|e| Error::Stt(format!("transcription failed: {e}")))?;

        let text = response.text.trim().to_string();
        debug!(%text, "transcription result");
        Ok(text)
    }
}
