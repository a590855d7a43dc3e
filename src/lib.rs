//! Invader Rush - a browser Space Invaders clone
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation motion, combat state machine, level layouts)
//! - `settings`: Difficulty, field and layout configuration
//! - `audio`: Mute/unlock control and Web Audio sound cues

pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::{FieldConfig, Settings};
pub use sim::{Difficulty, GamePhase, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, the reference frame rate)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield (portrait)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Distance from the bottom edge past which an invader ends the game
    pub const BOTTOM_MARGIN: f32 = 100.0;
    /// Horizontal padding the formation reverses at
    pub const EDGE_PADDING: f32 = 20.0;

    /// Invader sprite size
    pub const INVADER_WIDTH: f32 = 30.0;
    pub const INVADER_HEIGHT: f32 = 25.0;

    /// Fraction of configured speed applied per reference frame
    pub const MARCH_TIME_SCALE: f32 = 0.05;
    /// Sideways nudge after an edge drop so the formation clears the edge
    pub const NUDGE_TIME_SCALE: f32 = 0.1;
    /// Default pause after each edge drop
    pub const DROP_SETTLE_MS: f32 = 300.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 25.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 200.0; // px/s
    pub const PLAYER_FIRE_COOLDOWN_MS: f64 = 500.0;
    pub const STARTING_LIVES: i32 = 3;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const PLAYER_BULLET_SPEED: f32 = 500.0; // px/s, upward
    pub const ENEMY_BULLET_SPEED: f32 = 200.0; // px/s, downward
    /// Spawn offset from the shooter's center
    pub const MUZZLE_OFFSET: f32 = 20.0;

    /// Points per invader, multiplied by the current level
    pub const POINTS_PER_INVADER: u64 = 10;

    /// UI timings
    pub const LEVEL_BANNER_MS: f64 = 1500.0;
    pub const BANNER_FADE_MS: f64 = 500.0;
    pub const HIT_FLASH_MS: f64 = 200.0;
}
