use std::ops::{Add, AddAssign, Div, Mul, Sub};

use crate::chart::PitchClass;

pub const PROJECTILE_DIAMETER: f32 = 20.0;
/// Targets are squares four projectile diameters on a side.
pub const TARGET_SIZE: f32 = PROJECTILE_DIAMETER * 4.0;
/// Radius of the concentric "gold" region scoring a Perfect hit.
pub const GOLD_RADIUS: f32 = PROJECTILE_DIAMETER * 0.625;
/// How long a target stays highlighted after a judgment.
pub const HIGHLIGHT_SECS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn dist(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// Visible play bounds; projectiles launch from its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True once a point has left the bounds by more than `margin`.
    pub fn is_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin || p.x > self.width + margin || p.y < -margin || p.y > self.height + margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Good,
    Perfect,
    Miss,
}

/// Transient judgment feedback. The expiry timestamp is checked every frame
/// instead of scheduling a revert timer, so two rapid hits on the same target
/// simply extend the highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub expires_at: f64,
}

/// Fixed screen region bound to one pitch class. Laid out once at session
/// start and again on resize; immutable otherwise apart from the highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub pitch_class: PitchClass,
    /// Top-left corner.
    pub pos: Vec2,
    pub size: f32,
    pub highlight: Option<Highlight>,
}

impl Target {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size / 2.0, self.pos.y + self.size / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x < self.pos.x + self.size
            && p.y >= self.pos.y
            && p.y < self.pos.y + self.size
    }

    pub fn in_gold_region(&self, p: Vec2) -> bool {
        p.dist(self.center()) <= GOLD_RADIUS
    }
}

/// Places the twelve targets on a circle of radius `0.4 × min(w, h)` around
/// the center, starting with C at the top and walking clockwise.
pub fn layout_targets(area: PlayArea) -> Vec<Target> {
    let center = area.center();
    let radius = area.width.min(area.height) * 0.4;
    let count = PitchClass::ALL.len();

    PitchClass::ALL
        .iter()
        .enumerate()
        .map(|(i, &pitch_class)| {
            let angle = -std::f32::consts::FRAC_PI_2
                + i as f32 / count as f32 * std::f32::consts::TAU;
            let pos = Vec2::new(
                center.x + radius * angle.cos() - TARGET_SIZE / 2.0,
                center.y + radius * angle.sin() - TARGET_SIZE / 2.0,
            );
            Target {
                pitch_class,
                pos,
                size: TARGET_SIZE,
                highlight: None,
            }
        })
        .collect()
}
