//! Audio input (microphone capture)

use crate::error::{Error, Result};
use crate::vad::EnergyVad;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Audio sample type
pub type Sample = f32;

/// Microphone capture stream
pub struct Microphone {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    is_recording: Arc<AtomicBool>,
}

impl Microphone {
    /// Open the default input device at the requested sample rate
    pub fn open(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::AudioDevice("no input device found".to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        info!(device = %device_name, "using input device");

        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| Error::AudioDevice(format!("failed to get configs: {e}")))?;

        let mut selected_config = None;
        for config in supported_configs {
            if config.min_sample_rate().0 <= sample_rate
                && config.max_sample_rate().0 >= sample_rate
                && config.sample_format() == SampleFormat::F32
            {
                selected_config = Some(config.with_sample_rate(cpal::SampleRate(sample_rate)));
                break;
            }
        }

        let supported = selected_config.ok_or_else(|| {
            Error::AudioDevice(format!("no config supports {sample_rate}Hz F32"))
        })?;

        let config: StreamConfig = supported.into();
        debug!(
            channels = config.channels,
            sample_rate = config.sample_rate.0,
            "audio config selected"
        );

        Ok(Self {
            device,
            config,
            stream: None,
            is_recording: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Configured sample rate
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Whether capture is running
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Start capture and return a channel of mono sample frames
    pub fn start_recording(&mut self) -> Result<mpsc::Receiver<Vec<Sample>>> {
        if self.is_recording() {
            return Err(Error::AudioStream("already recording".to_string()));
        }

        let (tx, rx) = mpsc::channel::<Vec<Sample>>(100);
        let is_recording = self.is_recording.clone();
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_recording.load(Ordering::SeqCst) {
                        return;
                    }

                    // Downmix to mono
                    let samples: Vec<f32> = if channels > 1 {
                        data.chunks(channels)
                            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
                            .collect()
                    } else {
                        data.to_vec()
                    };

                    let _ = tx.try_send(samples);
                },
                move |err| {
                    error!(error = %err, "audio input error");
                },
                None,
            )
            .map_err(|e| Error::AudioStream(format!("failed to build stream: {e}")))?;

        stream
            .play()
            .map_err(|e| Error::AudioStream(format!("failed to start stream: {e}")))?;

        self.stream = Some(stream);
        self.is_recording.store(true, Ordering::SeqCst);

        debug!("audio recording started");
        Ok(rx)
    }

    /// Stop capture
    pub fn stop_recording(&mut self) {
        self.is_recording.store(false, Ordering::SeqCst);
        self.stream = None;
        debug!("audio recording stopped");
    }

    /// Record one utterance: capture until a stretch of silence follows
    /// speech, or the maximum duration is reached.
    pub async fn capture_utterance(
        &mut self,
        vad: &EnergyVad,
        silence_duration_ms: u64,
        max_duration_secs: u64,
    ) -> Result<Vec<Sample>> {
        let mut rx = self.start_recording()?;
        let sample_rate = self.sample_rate() as f64;

        let mut buffer = Vec::new();
        let mut silence_samples = 0u64;
        let silence_samples_threshold = (silence_duration_ms as f64 * sample_rate / 1000.0) as u64;
        let max_samples = (max_duration_secs as f64 * sample_rate) as u64;

        let deadline =
            tokio::time::Instant::now() + tokio::time::Duration::from_secs(max_duration_secs + 1);

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    debug!("max recording duration reached");
                    break;
                }
                frame = rx.recv() => {
                    let Some(frame) = frame else {
                        break;
                    };

                    if vad.is_voice(&frame) {
                        silence_samples = 0;
                    } else {
                        silence_samples += frame.len() as u64;
                        if silence_samples > silence_samples_threshold && !buffer.is_empty() {
                            debug!("silence detected, stopping recording");
                            break;
                        }
                    }

                    buffer.extend(frame);

                    if buffer.len() as u64 > max_samples {
                        debug!("max samples reached");
                        break;
                    }
                }
            }
        }

        self.stop_recording();

        // Trim trailing silence
        let trim_samples = (silence_samples_threshold / 2) as usize;
        if buffer.len() > trim_samples {
            buffer.truncate(buffer.len() - trim_samples);
        }

        Ok(buffer)
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.stop_recording();
    }
}

/// Convert mono f32 samples to 16-bit WAV bytes
pub fn samples_to_wav(samples: &[Sample], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| Error::AudioStream(format!("failed to create WAV writer: {e}")))?;

        for &sample in samples {
            let amplitude = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(amplitude)
                .map_err(|e| Error::AudioStream(format!("failed to write sample: {e}")))?;
        }

        writer
            .finalize()
            .map_err(|e| Error::AudioStream(format!("failed to finalize WAV: {e}")))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_to_wav_has_riff_header() {
        let samples = vec![0.0f32; 1600]; // 0.1 second at 16kHz
        let wav = samples_to_wav(&samples, 16000).unwrap();

        assert!(wav.len() > 44);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn test_samples_to_wav_clamps_overdriven_input() {
        let wav = samples_to_wav(&[2.0, -2.0], 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
    }
}
