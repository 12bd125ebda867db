pub mod store;
pub mod synth;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audio::SongMetadata;
use crate::error::{ChartError, Result};

/// Delay between game start and audio playback start, carried in the chart
/// so the runtime never re-derives it.
pub const SONG_START_OFFSET_SECS: f64 = 2.0;
/// Projectile travel time from origin to target, also the launch lead.
pub const LAUNCH_LEAD_SECS: f64 = 3.0;

/// Note velocity is constant for every synthesized note.
pub const DEFAULT_VELOCITY: u8 = 100;

/// One of the twelve chromatic note names, octave-independent. A 12-lane
/// game only needs the pitch class, so the octave is discarded on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// MIDI note number via `round(69 + 12·log2(f/440))`, reduced mod 12.
    pub fn from_frequency(hz: f32) -> PitchClass {
        let midi = (69.0 + 12.0 * (hz as f64 / 440.0).log2()).round() as i32;
        Self::from_midi(midi)
    }

    pub fn from_midi(midi: i32) -> PitchClass {
        Self::ALL[midi.rem_euclid(12) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One chartable musical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Note {
    #[serde(rename = "note")]
    pub pitch_class: PitchClass,
    #[serde(rename = "startTime")]
    pub start_time: f64,
    pub duration: f64,
    #[serde(rename = "endTime")]
    pub end_time: f64,
    pub velocity: u8,
}

/// The persisted contract between offline analysis and real-time play.
/// Written once per song, read once at session load, never mutated by the
/// runtime (the session consumes a private queue copy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chart {
    pub duration: f64,
    pub bpm: u32,
    #[serde(rename = "songStartTime")]
    pub song_start_time: f64,
    #[serde(rename = "ballLaunchDelay")]
    pub ball_launch_delay: f64,
    pub notes: Vec<Note>,
    #[serde(default)]
    pub metadata: SongMetadata,
}

impl Chart {
    pub fn new(duration: f64, bpm: u32, notes: Vec<Note>, metadata: SongMetadata) -> Chart {
        Chart {
            duration,
            bpm,
            song_start_time: SONG_START_OFFSET_SECS,
            ball_launch_delay: LAUNCH_LEAD_SECS,
            notes,
            metadata,
        }
    }

    /// Rejects charts that would launch malformed projectiles: non-finite
    /// timings, non-positive durations, inconsistent end times or notes out
    /// of start-time order.
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ChartError::Malformed(format!(
                "invalid duration {}",
                self.duration
            )));
        }
        if !self.song_start_time.is_finite() || self.song_start_time < 0.0 {
            return Err(ChartError::Malformed(format!(
                "invalid songStartTime {}",
                self.song_start_time
            )));
        }
        if !self.ball_launch_delay.is_finite() || self.ball_launch_delay <= 0.0 {
            return Err(ChartError::Malformed(format!(
                "invalid ballLaunchDelay {}",
                self.ball_launch_delay
            )));
        }

        let mut prev_start = f64::NEG_INFINITY;
        for (i, note) in self.notes.iter().enumerate() {
            if !note.start_time.is_finite()
                || !note.end_time.is_finite()
                || !note.duration.is_finite()
            {
                return Err(ChartError::Malformed(format!(
                    "note {i} has non-finite timing"
                )));
            }
            if note.start_time < 0.0 {
                return Err(ChartError::Malformed(format!(
                    "note {i} starts before 0 ({})",
                    note.start_time
                )));
            }
            if note.duration <= 0.0 {
                return Err(ChartError::Malformed(format!(
                    "note {i} has non-positive duration ({})",
                    note.duration
                )));
            }
            if (note.end_time - note.start_time - note.duration).abs() > 1e-6 {
                return Err(ChartError::Malformed(format!(
                    "note {i} endTime does not match startTime + duration"
                )));
            }
            if note.start_time < prev_start {
                return Err(ChartError::Malformed(format!(
                    "note {i} is out of order ({} after {})",
                    note.start_time, prev_start
                )));
            }
            prev_start = note.start_time;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_maps_to_pitch_class() {
        assert_eq!(PitchClass::from_frequency(440.0), PitchClass::A);
        assert_eq!(PitchClass::from_frequency(261.63), PitchClass::C);
        assert_eq!(PitchClass::from_frequency(466.16), PitchClass::ASharp);
    }

    #[test]
    fn pitch_class_is_octave_invariant() {
        assert_eq!(PitchClass::from_frequency(880.0), PitchClass::A);
        assert_eq!(PitchClass::from_frequency(110.0), PitchClass::A);
    }

    #[test]
    fn note_uses_the_persisted_field_names() {
        let note = Note {
            pitch_class: PitchClass::FSharp,
            start_time: 1.25,
            duration: 0.5,
            end_time: 1.75,
            velocity: DEFAULT_VELOCITY,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "note": "F#",
                "startTime": 1.25,
                "duration": 0.5,
                "endTime": 1.75,
                "velocity": 100
            })
        );
    }

    #[test]
    fn chart_uses_the_persisted_field_names() {
        let chart = Chart::new(10.0, 120, Vec::new(), SongMetadata::default());
        let json = serde_json::to_value(&chart).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["duration", "bpm", "songStartTime", "ballLaunchDelay", "notes", "metadata"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 6);
    }

    fn note(start: f64, end: f64) -> Note {
        Note {
            pitch_class: PitchClass::C,
            start_time: start,
            duration: end - start,
            end_time: end,
            velocity: DEFAULT_VELOCITY,
        }
    }

    #[test]
    fn validate_rejects_out_of_order_notes() {
        let chart = Chart::new(5.0, 100, vec![note(1.0, 1.5), note(0.5, 1.0)], Default::default());
        assert!(matches!(chart.validate(), Err(ChartError::Malformed(_))));
    }

    #[test]
    fn validate_rejects_zero_duration_notes() {
        let chart = Chart::new(5.0, 100, vec![note(1.0, 1.0)], Default::default());
        assert!(matches!(chart.validate(), Err(ChartError::Malformed(_))));
    }

    #[test]
    fn validate_rejects_inconsistent_end_time() {
        let mut bad = note(1.0, 2.0);
        bad.end_time = 3.0;
        let chart = Chart::new(5.0, 100, vec![bad], Default::default());
        assert!(matches!(chart.validate(), Err(ChartError::Malformed(_))));
    }

    #[test]
    fn validate_accepts_a_well_formed_chart() {
        let chart = Chart::new(5.0, 100, vec![note(0.5, 1.0), note(1.0, 2.0)], Default::default());
        assert!(chart.validate().is_ok());
    }
}
