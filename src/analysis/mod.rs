pub mod beats;
pub mod pitch;

use crate::audio::AudioData;
use beats::Beat;
use pitch::{PitchParams, PitchSample};

/// Combined offline analysis of one song.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub beats: Vec<Beat>,
    /// Tempo estimate; 0 when fewer than two beats were found.
    pub bpm: u32,
    pub pitches: Vec<PitchSample>,
}

/// Runs beat and pitch detection over the same immutable buffer. The two
/// passes share no mutable state, so they run on separate rayon workers and
/// produce the same result as a sequential scan.
pub fn analyze(audio: &AudioData, params: &PitchParams) -> Analysis {
    let ((beats, bpm), pitches) =
        rayon::join(|| beats::detect(audio), || pitch::detect(audio, params));

    log::info!(
        "Analysis: {} beats, {} BPM, {} pitch samples over {:.1}s",
        beats.len(),
        bpm,
        pitches.len(),
        audio.duration
    );

    Analysis { beats, bpm, pitches }
}
