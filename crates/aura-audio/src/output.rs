//! Audio output (acknowledgement chime)

use crate::error::{Error, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use tracing::debug;

/// Speaker output for the wake acknowledgement chime
pub struct Chime {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Chime {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| Error::AudioDevice(format!("failed to get output device: {e}")))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Start a short beep. Playback runs on rodio's own thread; the
    /// caller is not blocked for the beep's duration.
    pub fn play(&self) -> Result<()> {
        let wav = beep_wav()?;
        let source = Decoder::new(Cursor::new(wav))
            .map_err(|e| Error::AudioStream(format!("failed to decode chime: {e}")))?;

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| Error::AudioStream(format!("failed to create sink: {e}")))?;
        sink.append(source);
        sink.detach();

        debug!("chime started");
        Ok(())
    }
}

/// Generate a 440Hz, 100ms beep with fade in/out to avoid clicks
fn beep_wav() -> Result<Vec<u8>> {
    let sample_rate = 44100u32;
    let duration_samples = sample_rate / 10;
    let frequency = 440.0f32;

    let mut samples = Vec::with_capacity(duration_samples as usize);
    for i in 0..duration_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * frequency * t).sin();
        let envelope = if i < 1000 {
            i as f32 / 1000.0
        } else if i > duration_samples - 1000 {
            (duration_samples - i) as f32 / 1000.0
        } else {
            1.0
        };
        samples.push((sample * envelope * 0.3 * i16::MAX as f32) as i16);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| Error::AudioStream(format!("failed to create chime WAV: {e}")))?;
        for sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| Error::AudioStream(format!("failed to write chime sample: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| Error::AudioStream(format!("failed to finalize chime WAV: {e}")))?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beep_wav_is_valid_riff() {
        let wav = beep_wav().unwrap();
        assert!(wav.len() > 44);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn test_beep_is_a_tenth_of_a_second() {
        let wav = beep_wav().unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 44100);
        assert_eq!(reader.len(), 4410);
    }
}
