pub mod layout;
pub mod projectile;
pub mod session;

pub use layout::{HighlightKind, PlayArea, Target, Vec2};
pub use projectile::{Projectile, ProjectileState};
pub use session::{FrameReport, GameSession, Judgment, Phase, ScoreState};
