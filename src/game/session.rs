use std::collections::VecDeque;

use crate::chart::{Chart, Note};
use crate::game::layout::{
    layout_targets, Highlight, HighlightKind, PlayArea, Target, Vec2, HIGHLIGHT_SECS,
};
use crate::game::projectile::{Projectile, ProjectileState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
}

/// Score tallies, mutated only by tap evaluation and the miss-expiry step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub points: i64,
    pub misses: u32,
    pub good_hits: u32,
    pub perfect_hits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Perfect,
    Good,
    Miss,
}

/// What one frame update did, for the host and for deterministic tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub launched: usize,
    pub missed: usize,
    /// Set exactly once, on the frame where the clock crosses the chart's
    /// audio start offset. The host starts song playback on it.
    pub start_audio: bool,
}

/// The complete runtime state record: clock, note queue, projectiles,
/// targets and score. Driven by an external tick source; all mutation
/// happens on the caller's thread, so a tick given the same state and
/// elapsed time is fully deterministic.
pub struct GameSession {
    phase: Phase,
    clock: f64,
    queue: VecDeque<Note>,
    projectiles: Vec<Projectile>,
    targets: Vec<Target>,
    area: PlayArea,
    score: ScoreState,
    launch_lead: f64,
    song_start_offset: f64,
    audio_started: bool,
}

impl GameSession {
    /// Copies the chart's notes into a private queue; the persisted chart is
    /// never mutated during play. Timing offsets come from the chart itself.
    pub fn new(chart: &Chart, width: f32, height: f32) -> GameSession {
        let area = PlayArea { width, height };
        GameSession {
            phase: Phase::Idle,
            clock: 0.0,
            queue: chart.notes.iter().cloned().collect(),
            projectiles: Vec::new(),
            targets: layout_targets(area),
            area,
            score: ScoreState::default(),
            launch_lead: chart.ball_launch_delay,
            song_start_offset: chart.song_start_time,
            audio_started: false,
        }
    }

    /// Idle → Running, exactly once per session. Returns false when the
    /// session is already running.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }
        self.phase = Phase::Running;
        self.clock = 0.0;
        log::info!("Session started: {} notes queued", self.queue.len());
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Re-lays-out targets for the new bounds. Score and in-flight
    /// projectiles are untouched; projectiles keep the course they were
    /// launched on.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.area = PlayArea { width, height };
        self.targets = layout_targets(self.area);
    }

    /// One frame update. Per-frame order is fixed: advance clock, launch due
    /// notes, advance projectile positions, expire off-screen projectiles as
    /// Missed, expire stale highlights. Rendering happens outside, against
    /// the returned state.
    pub fn tick(&mut self, dt: f64) -> FrameReport {
        let mut report = FrameReport::default();
        if self.phase != Phase::Running {
            return report;
        }

        self.clock += dt;

        if !self.audio_started && self.clock >= self.song_start_offset {
            self.audio_started = true;
            report.start_audio = true;
        }

        // Launch every note whose lead window has opened
        while let Some(note) = self.queue.pop_front() {
            if self.clock < note.start_time - self.launch_lead {
                self.queue.push_front(note);
                break;
            }
            match self.targets.iter().find(|t| t.pitch_class == note.pitch_class) {
                Some(target) => {
                    self.projectiles.push(Projectile::new(
                        &note,
                        self.area.center(),
                        target.center(),
                        self.launch_lead,
                    ));
                    report.launched += 1;
                }
                None => {
                    // Degrade gracefully: a note with no lane is skipped
                    log::warn!(
                        "No target for pitch class {}; dropping note at {:.2}s",
                        note.pitch_class,
                        note.start_time
                    );
                }
            }
        }

        for p in &mut self.projectiles {
            if p.state == ProjectileState::Pending && p.is_launch_due(self.clock, self.launch_lead)
            {
                p.state = ProjectileState::Launched;
            }
            p.advance(dt as f32);
        }

        // Off-screen while unhit is a one-way latch to Missed
        let area = self.area;
        for p in &mut self.projectiles {
            if p.state == ProjectileState::Launched && p.is_off_screen(area) {
                p.state = ProjectileState::Missed;
                self.score.points -= 1;
                self.score.misses += 1;
                report.missed += 1;
            }
        }
        self.projectiles.retain(|p| p.is_active());

        for target in &mut self.targets {
            if target
                .highlight
                .is_some_and(|h| h.expires_at <= self.clock)
            {
                target.highlight = None;
            }
        }

        report
    }

    /// Evaluates a spatial input event against the current frame's state.
    /// Returns `None` when the point is outside every target.
    ///
    /// Among qualifying projectiles the first in iteration order wins; with
    /// launches ordered by note start time that is the longest-airborne one.
    pub fn handle_tap(&mut self, point: Vec2) -> Option<Judgment> {
        if self.phase != Phase::Running {
            return None;
        }

        let target_idx = self.targets.iter().position(|t| t.contains(point))?;

        let hit_idx = {
            let target = &self.targets[target_idx];
            self.projectiles.iter().position(|p| {
                p.state == ProjectileState::Launched
                    && p.pitch_class == target.pitch_class
                    && target.contains(p.pos)
            })
        };

        let judgment = match hit_idx {
            Some(idx) => {
                if self.targets[target_idx].in_gold_region(point) {
                    self.score.points += 5;
                    self.score.perfect_hits += 1;
                    self.projectiles[idx].state = ProjectileState::Hit;
                    Judgment::Perfect
                } else {
                    self.score.points += 1;
                    self.score.good_hits += 1;
                    self.projectiles[idx].state = ProjectileState::Hit;
                    Judgment::Good
                }
            }
            None => {
                // A tap inside a target with no reachable projectile still
                // costs a point
                self.score.points -= 1;
                self.score.misses += 1;
                Judgment::Miss
            }
        };

        let kind = match judgment {
            Judgment::Perfect => HighlightKind::Perfect,
            Judgment::Good => HighlightKind::Good,
            Judgment::Miss => HighlightKind::Miss,
        };
        self.targets[target_idx].highlight = Some(Highlight {
            kind,
            expires_at: self.clock + HIGHLIGHT_SECS,
        });

        Some(judgment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SongMetadata;
    use crate::chart::{PitchClass, DEFAULT_VELOCITY};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    fn note(pitch_class: PitchClass, start: f64) -> Note {
        Note {
            pitch_class,
            start_time: start,
            duration: 0.5,
            end_time: start + 0.5,
            velocity: DEFAULT_VELOCITY,
        }
    }

    fn chart(notes: Vec<Note>) -> Chart {
        Chart::new(10.0, 120, notes, SongMetadata::default())
    }

    fn session(notes: Vec<Note>) -> GameSession {
        let mut s = GameSession::new(&chart(notes), WIDTH, HEIGHT);
        assert!(s.start());
        s
    }

    /// Ticks in 50ms steps until the clock reaches `until`.
    fn run_until(s: &mut GameSession, until: f64) -> FrameReport {
        let mut total = FrameReport::default();
        while s.clock() < until - 1e-9 {
            let r = s.tick(0.05);
            total.launched += r.launched;
            total.missed += r.missed;
            total.start_audio |= r.start_audio;
        }
        total
    }

    fn target_center(s: &GameSession, pc: PitchClass) -> Vec2 {
        s.targets()
            .iter()
            .find(|t| t.pitch_class == pc)
            .unwrap()
            .center()
    }

    #[test]
    fn start_transitions_exactly_once() {
        let mut s = GameSession::new(&chart(vec![]), WIDTH, HEIGHT);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.start());
        assert!(!s.start());
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn ticks_before_start_do_nothing() {
        let mut s = GameSession::new(&chart(vec![note(PitchClass::C, 3.0)]), WIDTH, HEIGHT);
        let report = s.tick(1.0);
        assert_eq!(report, FrameReport::default());
        assert_eq!(s.clock(), 0.0);
        assert!(s.projectiles().is_empty());
    }

    #[test]
    fn notes_launch_one_lead_time_early() {
        let mut s = session(vec![note(PitchClass::C, 4.0)]);
        run_until(&mut s, 0.9);
        assert!(s.projectiles().is_empty());

        let report = s.tick(0.2);
        assert_eq!(report.launched, 1);
        assert_eq!(s.projectiles().len(), 1);
        assert_eq!(s.projectiles()[0].state, ProjectileState::Launched);
    }

    #[test]
    fn audio_start_fires_exactly_once_at_the_offset() {
        let mut s = session(vec![]);
        let before = run_until(&mut s, 1.95);
        assert!(!before.start_audio);

        let crossing = s.tick(0.1);
        assert!(crossing.start_audio);

        let after = run_until(&mut s, 4.0);
        assert!(!after.start_audio);
    }

    #[test]
    fn tap_at_center_with_projectile_is_perfect() {
        let mut s = session(vec![note(PitchClass::A, 3.0)]);
        // The projectile crosses the target center at the note start time
        run_until(&mut s, 3.0);

        let center = target_center(&s, PitchClass::A);
        assert_eq!(s.handle_tap(center), Some(Judgment::Perfect));

        let score = s.score();
        assert_eq!(score.points, 5);
        assert_eq!(score.perfect_hits, 1);
        assert_eq!(score.good_hits, 0);
        assert_eq!(score.misses, 0);
    }

    #[test]
    fn tap_inside_target_outside_gold_is_good() {
        let mut s = session(vec![note(PitchClass::A, 3.0)]);
        run_until(&mut s, 3.0);

        let center = target_center(&s, PitchClass::A);
        let off_gold = Vec2::new(center.x + 30.0, center.y);
        assert_eq!(s.handle_tap(off_gold), Some(Judgment::Good));

        let score = s.score();
        assert_eq!(score.points, 1);
        assert_eq!(score.good_hits, 1);
        assert_eq!(score.perfect_hits, 0);
    }

    #[test]
    fn tap_with_no_qualifying_projectile_is_a_miss() {
        let mut s = session(vec![]);
        s.tick(0.05);

        let center = target_center(&s, PitchClass::D);
        assert_eq!(s.handle_tap(center), Some(Judgment::Miss));

        let score = s.score();
        assert_eq!(score.points, -1);
        assert_eq!(score.misses, 1);
    }

    #[test]
    fn tap_outside_every_target_is_a_no_op() {
        let mut s = session(vec![]);
        s.tick(0.05);
        assert_eq!(s.handle_tap(Vec2::new(1.0, 1.0)), None);
        assert_eq!(s.score(), ScoreState::default());
    }

    #[test]
    fn a_hit_projectile_cannot_be_hit_twice() {
        let mut s = session(vec![note(PitchClass::A, 3.0)]);
        run_until(&mut s, 3.0);

        let center = target_center(&s, PitchClass::A);
        assert_eq!(s.handle_tap(center), Some(Judgment::Perfect));
        // Same tap again: the projectile is Hit, so this counts as a miss
        assert_eq!(s.handle_tap(center), Some(Judgment::Miss));

        let score = s.score();
        assert_eq!(score.points, 4);
        assert_eq!(score.perfect_hits, 1);
        assert_eq!(score.misses, 1);
    }

    #[test]
    fn offscreen_projectile_misses_exactly_once() {
        let mut s = session(vec![note(PitchClass::C, 3.0)]);
        let report = run_until(&mut s, 12.0);

        assert_eq!(report.missed, 1);
        assert!(s.projectiles().is_empty());

        let score = s.score();
        assert_eq!(score.points, -1);
        assert_eq!(score.misses, 1);

        // Nothing left to miss on later frames
        assert_eq!(run_until(&mut s, 14.0).missed, 0);
        assert_eq!(s.score().misses, 1);
    }

    #[test]
    fn highlight_expires_on_the_frame_clock() {
        let mut s = session(vec![]);
        s.tick(0.05);

        let center = target_center(&s, PitchClass::G);
        s.handle_tap(center);

        let lit = s
            .targets()
            .iter()
            .find(|t| t.pitch_class == PitchClass::G)
            .unwrap();
        let highlight = lit.highlight.expect("highlight set on judgment");
        assert_eq!(highlight.kind, HighlightKind::Miss);

        let until = s.clock() + 0.3;
        run_until(&mut s, until);
        let lit = s
            .targets()
            .iter()
            .find(|t| t.pitch_class == PitchClass::G)
            .unwrap();
        assert!(lit.highlight.is_none());
    }

    #[test]
    fn resize_preserves_score_and_projectiles() {
        let mut s = session(vec![note(PitchClass::A, 3.0), note(PitchClass::E, 20.0)]);
        run_until(&mut s, 3.0);
        let center = target_center(&s, PitchClass::A);
        s.handle_tap(Vec2::new(center.x + 30.0, center.y));
        let score_before = s.score();

        s.resize(1024.0, 768.0);

        assert_eq!(s.score(), score_before);
        let moved = target_center(&s, PitchClass::C);
        assert!((moved.x - 512.0).abs() < 1e-3);
    }

    #[test]
    fn persisted_chart_is_not_mutated_by_play() {
        let c = chart(vec![note(PitchClass::C, 3.0)]);
        let mut s = GameSession::new(&c, WIDTH, HEIGHT);
        s.start();
        run_until(&mut s, 5.0);
        assert_eq!(c.notes.len(), 1);
    }
}
