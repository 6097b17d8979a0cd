//! Application configuration
//!
//! Layered: defaults, then an optional `aura.toml`, then `AURA__`
//! environment variables (`AURA__VOICE__LANGUAGE=en`). Secrets stay in
//! the environment and never appear here.

use aura_audio::VoiceConfig;
use serde::Deserialize;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Voice front-end settings
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Gemini model override (falls back to the client default)
    #[serde(default)]
    pub model: Option<String>,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file, and the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
            None => builder.add_source(config::File::with_name("aura").required(false)),
        };

        let settings = builder
            .add_source(config::Environment::with_prefix("AURA").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.voice.wake.phrase, "hey aura");
        assert_eq!(config.voice.language, "en");
        assert!(config.model.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aura.toml");
        std::fs::write(
            &path,
            "model = \"gemini-2.5-pro\"\n\n[voice]\nlanguage = \"de\"\n\n[voice.wake]\nphrase = \"hey assistant\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.voice.language, "de");
        assert_eq!(config.voice.wake.phrase, "hey assistant");
    }
}
