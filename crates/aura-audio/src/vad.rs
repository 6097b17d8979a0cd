//! Voice activity detection
//!
//! RMS energy over a frame. Good enough to end an utterance after a
//! stretch of silence; not a substitute for a trained VAD model.

/// Energy-based voice activity detector
#[derive(Debug, Clone, Copy)]
pub struct EnergyVad {
    threshold: f32,
}

impl EnergyVad {
    /// Create a detector with the given RMS threshold
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// RMS energy of a frame
    #[must_use]
    pub fn energy(frame: &[f32]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }
        (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
    }

    /// Whether a frame contains voice
    #[must_use]
    pub fn is_voice(&self, frame: &[f32]) -> bool {
        Self::energy(frame) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_not_voice() {
        let vad = EnergyVad::new(0.1);
        assert!(!vad.is_voice(&[0.0; 160]));
        assert!(!vad.is_voice(&[]));
    }

    #[test]
    fn test_loud_frame_is_voice() {
        let vad = EnergyVad::new(0.1);
        let frame: Vec<f32> = (0..160)
            .map(|i| (i as f32 * 0.3).sin() * 0.8)
            .collect();
        assert!(vad.is_voice(&frame));
    }

    #[test]
    fn test_energy_of_constant_signal() {
        let energy = EnergyVad::energy(&[0.5; 100]);
        assert!((energy - 0.5).abs() < 1e-6);
    }
}
