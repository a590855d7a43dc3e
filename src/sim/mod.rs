//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives through `tick`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod bullet;
pub mod collision;
pub mod difficulty;
pub mod formation;
pub mod level;
pub mod state;
pub mod tick;
pub mod timer;

pub use bullet::{Bullet, BulletOwner};
pub use collision::{Aabb, Collision};
pub use difficulty::{Difficulty, DifficultyProfile, Progression};
pub use formation::{Formation, FormationMotion, Invader};
pub use level::{FormationLayout, spawn_positions};
pub use state::{Banner, GameEvent, GameOverReason, GamePhase, GameState, Hud, Player};
pub use tick::{TickInput, tick};
pub use timer::{TimerKind, Timers};
