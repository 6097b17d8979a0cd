//! AURA Audio - the voice front end
//!
//! Capture one utterance from the microphone, transcribe it with the
//! Whisper API, and match the wake phrase in the transcript. Detection is
//! transcript-level rather than acoustic, so "hey aura, list my files"
//! works in a single breath with no keyword model on disk.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod stt;
pub mod vad;

pub use config::{VoiceConfig, WakeConfig};
pub use error::{Error, Result};
pub use input::{samples_to_wav, Microphone, Sample};
pub use output::Chime;
pub use stt::SpeechToText;
pub use vad::EnergyVad;
