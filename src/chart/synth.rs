use std::str::FromStr;

use crate::analysis::beats::Beat;
use crate::analysis::pitch::PitchSample;
use crate::chart::{Note, PitchClass, DEFAULT_VELOCITY};
use crate::error::{ChartError, Result};

/// Merges beats and pitch samples into ordered notes. Each beat takes the
/// pitch class of the pitch sample nearest in time (earlier sample wins a
/// tie) and lasts until the next beat, or one tempo period past the last
/// beat when no next beat exists.
///
/// Both inputs are time-sorted, so the nearest-pitch lookup is a two-cursor
/// merge: the pitch cursor only ever moves forward, keeping the whole pass
/// linear in `beats + pitches`.
pub fn synthesize(beats: &[Beat], pitches: &[PitchSample], bpm: u32) -> Result<Vec<Note>> {
    if pitches.is_empty() {
        return Err(ChartError::DegenerateInput(
            "no pitch samples detected; nothing to match notes against".into(),
        ));
    }
    if bpm == 0 {
        return Err(ChartError::DegenerateInput(
            "tempo estimate is zero; cannot extend the final beat".into(),
        ));
    }

    let beat_period = 60.0 / bpm as f64;
    let mut notes = Vec::with_capacity(beats.len());
    let mut cursor = 0;

    for (i, beat) in beats.iter().enumerate() {
        while cursor + 1 < pitches.len()
            && (pitches[cursor + 1].time - beat.time).abs()
                < (pitches[cursor].time - beat.time).abs()
        {
            cursor += 1;
        }

        let pitch_class = PitchClass::from_frequency(pitches[cursor].frequency);
        let end_time = match beats.get(i + 1) {
            Some(next) => next.time,
            // Assume constant tempo continues past the last detected beat
            None => beat.time + beat_period,
        };

        notes.push(Note {
            pitch_class,
            start_time: beat.time,
            duration: end_time - beat.time,
            end_time,
            velocity: DEFAULT_VELOCITY,
        });
    }

    Ok(notes)
}

/// Density rule applied before the chart is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Bucket width for the keep-one-note-per-bucket rule. `None` keeps
    /// every note.
    fn bucket_secs(self) -> Option<f64> {
        match self {
            Difficulty::Easy => Some(1.0),
            Difficulty::Medium => Some(0.5),
            Difficulty::Hard => None,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Difficulty> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ChartError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Walks notes in time order and keeps a note only when it falls in a later
/// bucket than the last kept note, trimming dense passages to at most one
/// note per bucket.
pub fn filter_by_difficulty(notes: &[Note], difficulty: Difficulty) -> Vec<Note> {
    let Some(bucket_secs) = difficulty.bucket_secs() else {
        return notes.to_vec();
    };

    let mut kept = Vec::new();
    let mut last_bucket = -1i64;
    for note in notes {
        let bucket = (note.start_time / bucket_secs).floor() as i64;
        if bucket > last_bucket {
            kept.push(note.clone());
            last_bucket = bucket;
        }
    }
    kept
}
