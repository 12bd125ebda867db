use pitch_detection::detector::autocorrelation::AutocorrelationDetector;
use pitch_detection::detector::PitchDetector;

use crate::audio::AudioData;

/// Analysis chunk length; one pitch estimate at most per chunk.
const CHUNK_SECS: f64 = 0.05;

/// A fundamental-frequency estimate tagged with its chunk start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchSample {
    pub time: f64,
    pub frequency: f32,
}

/// Detector thresholds, tunable from the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchParams {
    /// Minimum signal power for a chunk to be considered voiced.
    pub power_threshold: f32,
    /// Minimum autocorrelation clarity for an estimate to be kept.
    pub clarity_threshold: f32,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            power_threshold: 5.0,
            clarity_threshold: 0.7,
        }
    }
}

/// Runs the autocorrelation estimator over fixed 50ms chunks. Chunks where no
/// pitch is found are skipped, as is a trailing partial chunk, so the result
/// is a sparse, time-ordered sequence. Assumes monophonic content; silence is
/// rejected by the power threshold.
pub fn detect(audio: &AudioData, params: &PitchParams) -> Vec<PitchSample> {
    let chunk_size = ((audio.sample_rate as f64 * CHUNK_SECS) as usize).max(2);
    let mut detector = AutocorrelationDetector::<f32>::new(chunk_size, chunk_size / 2);

    let mut samples = Vec::new();
    let mut pos = 0;
    while pos + chunk_size <= audio.samples.len() {
        let chunk = &audio.samples[pos..pos + chunk_size];
        let time = pos as f64 / audio.sample_rate as f64;

        if let Some(pitch) = detector.get_pitch(
            chunk,
            audio.sample_rate as usize,
            params.power_threshold,
            params.clarity_threshold,
        ) {
            if pitch.frequency > 0.0 {
                samples.push(PitchSample {
                    time,
                    frequency: pitch.frequency,
                });
            }
        }

        pos += chunk_size;
    }

    samples
}
