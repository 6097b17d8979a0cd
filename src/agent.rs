//! The agent - registry assembly and the voice loop
//!
//! Setup failures here are fatal (a missing Gemini key means the agent
//! cannot interpret anything). Everything after setup is non-fatal: a
//! failed command is reported and the loop returns to listening.

use crate::config::AppConfig;
use anyhow::Context as _;
use aura_audio::{samples_to_wav, Chime, EnergyVad, Microphone, SpeechToText, VoiceConfig};
use aura_core::{ActionRegistry, DispatchContext, Dispatcher};
use aura_llm::{GeminiClient, GeminiConfig, LanguageModel};
use aura_mail::{GmailClient, Mailbox};
use aura_tools::{register_builtins, BuiltinsConfig, ConsoleComposer, UnavailableScreenCapture};
use std::sync::Arc;
use tracing::{info, warn};

/// The assembled assistant: dispatcher plus ambient context.
pub struct Agent {
    dispatcher: Dispatcher,
    base_context: DispatchContext,
}

impl Agent {
    /// Build the agent: model client, optional mail session, and the
    /// full capability catalog.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let mut gemini_config =
            GeminiConfig::from_env().context("Gemini API key is required to interpret commands")?;
        if let Some(model) = &config.model {
            gemini_config = gemini_config.with_model(model);
        }
        let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(gemini_config)?);

        let mailbox: Option<Arc<dyn Mailbox>> = match GmailClient::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "mail session unavailable, email actions will be refused");
                None
            }
        };

        let mut registry = ActionRegistry::new();
        register_builtins(
            &mut registry,
            &BuiltinsConfig {
                model: Arc::clone(&model),
                composer: Arc::new(ConsoleComposer),
                screen: Arc::new(UnavailableScreenCapture),
            },
        )?;
        info!(actions = registry.len(), "action catalog assembled");

        let mut base_context = DispatchContext::new();
        if let Some(mailbox) = mailbox {
            base_context = base_context.with_mailbox(mailbox);
        }

        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(registry), model),
            base_context,
        })
    }

    /// Interpret one command and return the operator-facing report.
    ///
    /// Dispatch errors become their display strings; nothing here aborts
    /// the caller's loop.
    pub async fn dispatch_text(&self, transcript: &str) -> String {
        let ctx = self.base_context.clone().with_transcript(transcript);
        match self
            .dispatcher
            .interpret_and_dispatch(transcript, &ctx)
            .await
        {
            Ok(result) => result,
            Err(e) => format!("Error: {e}"),
        }
    }

    /// The wake-phrase loop: capture, transcribe, match, dispatch, repeat.
    pub async fn run_voice_loop(&self, voice: &VoiceConfig) -> anyhow::Result<()> {
        let stt = SpeechToText::new(&voice.language);
        anyhow::ensure!(
            stt.is_enabled(),
            "OPENAI_API_KEY is required for the voice loop; use `aura dispatch <TEXT>` for text-only mode"
        );

        let mut microphone = Microphone::open(voice.sample_rate)?;
        let vad = EnergyVad::new(voice.threshold);
        let chime = match Chime::new() {
            Ok(chime) => Some(chime),
            Err(e) => {
                warn!(error = %e, "no audio output, continuing without the chime");
                None
            }
        };

        info!(phrase = %voice.wake.phrase, "listening for wake phrase");
        println!("Listening for wake phrase: '{}'...", voice.wake.phrase);

        loop {
            let samples = microphone
                .capture_utterance(&vad, voice.silence_duration_ms, voice.max_duration_secs)
                .await?;
            if samples.is_empty() {
                continue;
            }

            let wav = samples_to_wav(&samples, microphone.sample_rate())?;
            let transcript = match stt.transcribe(&wav).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "transcription failed");
                    continue;
                }
            };
            if transcript.is_empty() {
                continue;
            }
            info!(%transcript, "heard");

            let Some(mut command) = voice.wake.match_command(&transcript) else {
                continue;
            };

            if let Some(chime) = &chime {
                if let Err(e) = chime.play() {
                    warn!(error = %e, "chime failed");
                }
            }

            // The operator said only the wake phrase; record one more
            // utterance for the command itself.
            if command.is_empty() {
                println!("Say your command:");
                let samples = microphone
                    .capture_utterance(&vad, voice.silence_duration_ms, voice.max_duration_secs)
                    .await?;
                if samples.is_empty() {
                    continue;
                }
                let wav = samples_to_wav(&samples, microphone.sample_rate())?;
                command = match stt.transcribe(&wav).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "transcription failed");
                        continue;
                    }
                };
            }
            if command.is_empty() {
                continue;
            }

            println!("You said: {command}");
            let result = self.dispatch_text(&command).await;
            println!("{result}");
            println!("Listening for wake phrase: '{}'...", voice.wake.phrase);
        }
    }
}
