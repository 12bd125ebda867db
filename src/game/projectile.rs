use crate::chart::{Note, PitchClass};
use crate::game::layout::{PlayArea, Vec2, PROJECTILE_DIAMETER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    Pending,
    Launched,
    Hit,
    Missed,
}

/// Ephemeral moving entity representing one note awaiting a hit. Created
/// when its launch window opens, destroyed after being hit or after leaving
/// the play area.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pitch_class: PitchClass,
    pub start_time: f64,
    pub end_time: f64,
    pub pos: Vec2,
    velocity: Vec2,
    pub state: ProjectileState,
}

impl Projectile {
    /// Constant velocity covers origin to target center in exactly
    /// `travel_secs`, so the projectile crosses the center at the note's
    /// start time.
    pub fn new(note: &Note, origin: Vec2, target_center: Vec2, travel_secs: f64) -> Projectile {
        Projectile {
            pitch_class: note.pitch_class,
            start_time: note.start_time,
            end_time: note.end_time,
            pos: origin,
            velocity: (target_center - origin) / travel_secs as f32,
            state: ProjectileState::Pending,
        }
    }

    pub fn is_launch_due(&self, now: f64, lead_secs: f64) -> bool {
        now >= self.start_time - lead_secs
    }

    /// Integrates position by `velocity × dt`. Only Launched projectiles
    /// move; a Hit or Missed one is inert until swept.
    pub fn advance(&mut self, dt: f32) {
        if self.state == ProjectileState::Launched {
            self.pos += self.velocity * dt;
        }
    }

    pub fn is_off_screen(&self, area: PlayArea) -> bool {
        area.is_outside(self.pos, PROJECTILE_DIAMETER)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ProjectileState::Pending | ProjectileState::Launched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::DEFAULT_VELOCITY;

    fn note(start: f64) -> Note {
        Note {
            pitch_class: PitchClass::E,
            start_time: start,
            duration: 0.5,
            end_time: start + 0.5,
            velocity: DEFAULT_VELOCITY,
        }
    }

    #[test]
    fn reaches_the_target_center_after_the_travel_time() {
        let origin = Vec2::new(400.0, 300.0);
        let target = Vec2::new(400.0, 60.0);
        let mut p = Projectile::new(&note(3.0), origin, target, 3.0);
        p.state = ProjectileState::Launched;

        for _ in 0..60 {
            p.advance(0.05);
        }
        assert!(p.pos.dist(target) < 0.1, "ended at {:?}", p.pos);
    }

    #[test]
    fn pending_projectiles_do_not_move() {
        let origin = Vec2::new(400.0, 300.0);
        let mut p = Projectile::new(&note(3.0), origin, Vec2::new(0.0, 0.0), 3.0);
        p.advance(1.0);
        assert_eq!(p.pos, origin);
    }

    #[test]
    fn launch_window_opens_one_lead_before_the_note() {
        let p = Projectile::new(&note(5.0), Vec2::default(), Vec2::default(), 3.0);
        assert!(!p.is_launch_due(1.9, 3.0));
        assert!(p.is_launch_due(2.0, 3.0));
    }
}
