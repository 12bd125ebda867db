use std::collections::VecDeque;

use crate::audio::AudioData;

/// Beats faster than this are treated as the same onset.
pub const MAX_BPM: f64 = 200.0;

const WINDOW_SECS: f64 = 0.25;
/// Trailing window energies kept as the moving-average baseline (~10.75s).
const ENERGY_HISTORY_LEN: usize = 43;
const BEAT_THRESHOLD: f32 = 0.15;

/// A detected onset of rhythmic emphasis in the energy signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Window start offset in seconds.
    pub time: f64,
}

/// Scans the buffer in fixed 0.25s windows and accepts a window as a beat
/// when its energy rises above the trailing moving average and the refractory
/// period of `60 / MAX_BPM` seconds since the last beat has elapsed.
///
/// Single pass, deterministic. Returns the ordered beats and the tempo
/// estimate (0 when fewer than two beats were found).
pub fn detect(audio: &AudioData) -> (Vec<Beat>, u32) {
    let window = ((audio.sample_rate as f64 * WINDOW_SECS) as usize).max(1);
    let refractory = 60.0 / MAX_BPM;

    let mut history: VecDeque<f32> = VecDeque::with_capacity(ENERGY_HISTORY_LEN + 1);
    let mut beats: Vec<Beat> = Vec::new();
    let mut last_beat = f64::NEG_INFINITY;

    let mut pos = 0;
    while pos < audio.samples.len() {
        let end = (pos + window).min(audio.samples.len());
        let chunk = &audio.samples[pos..end];

        let energy = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
        history.push_back(energy);
        if history.len() > ENERGY_HISTORY_LEN {
            history.pop_front();
        }
        // Baseline includes the current window, so a beat needs a genuine
        // jump above the recent average, not just any local maximum.
        let baseline = history.iter().sum::<f32>() / history.len() as f32;

        let time = pos as f64 / audio.sample_rate as f64;
        if energy > baseline * (1.0 + BEAT_THRESHOLD) && time - last_beat > refractory {
            beats.push(Beat { time });
            last_beat = time;
        }

        pos = end;
    }

    let bpm = estimate_bpm(&beats);
    (beats, bpm)
}

/// Tempo from the mean inter-beat interval, rounded to whole BPM.
fn estimate_bpm(beats: &[Beat]) -> u32 {
    if beats.len() < 2 {
        return 0;
    }

    let mean_interval = beats
        .windows(2)
        .map(|w| w[1].time - w[0].time)
        .sum::<f64>()
        / (beats.len() - 1) as f64;

    (60.0 / mean_interval).round() as u32
}
