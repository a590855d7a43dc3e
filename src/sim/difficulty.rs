//! Difficulty presets and per-level progression
//!
//! A difficulty selects the starting invader speed, drop distance and enemy
//! fire interval. Each cleared level then makes the invaders faster and
//! trigger-happier according to [`Progression`].

use serde::{Deserialize, Serialize};

/// Difficulty selector (matches the `<select>` values in the page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Starting values for this difficulty
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                speed: 30.0,
                drop_distance: 15.0,
                shoot_delay_ms: 3000.0,
            },
            Difficulty::Normal => DifficultyProfile {
                speed: 50.0,
                drop_distance: 20.0,
                shoot_delay_ms: 2000.0,
            },
            Difficulty::Hard => DifficultyProfile {
                speed: 70.0,
                drop_distance: 25.0,
                shoot_delay_ms: 1000.0,
            },
        }
    }
}

/// Invader tuning for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Horizontal speed in configured units (see `MARCH_TIME_SCALE`)
    pub speed: f32,
    /// Pixels the formation drops on every edge hit
    pub drop_distance: f32,
    /// Minimum active time between enemy shots
    pub shoot_delay_ms: f64,
}

/// How the invaders get harder after each cleared level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    pub speed_step: f32,
    /// `None` keeps adding `speed_step` forever
    pub speed_cap: Option<f32>,
    pub delay_step_ms: f64,
    pub delay_floor_ms: f64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            speed_step: 10.0,
            speed_cap: Some(150.0),
            delay_step_ms: 100.0,
            delay_floor_ms: 500.0,
        }
    }
}

impl Progression {
    /// Speed for the level after one at `speed`
    pub fn next_speed(&self, speed: f32) -> f32 {
        let stepped = speed + self.speed_step;
        match self.speed_cap {
            Some(cap) => stepped.min(cap),
            None => stepped,
        }
    }

    /// Enemy fire delay for the level after one at `delay_ms`
    pub fn next_shoot_delay(&self, delay_ms: f64) -> f64 {
        (delay_ms - self.delay_step_ms).max(self.delay_floor_ms)
    }
}
