//! Invader formation
//!
//! The formation marches sideways as one body. When any live invader reaches
//! the edge it is heading toward, the whole formation reverses, drops by the
//! drop distance and (optionally) settles briefly before marching on.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::settings::FieldConfig;

/// A single invader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub id: u32,
    /// Sprite center
    pub pos: Vec2,
    pub alive: bool,
}

impl Invader {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(INVADER_WIDTH, INVADER_HEIGHT))
    }
}

/// Formation motion sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FormationMotion {
    /// Marching sideways
    Marching,
    /// Holding still after an edge drop
    Settling { remaining_ms: f32 },
}

/// The live invaders and their shared motion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    /// Spawn order
    pub invaders: Vec<Invader>,
    /// +1 right, -1 left
    direction: f32,
    speed: f32,
    drop_distance: f32,
    pub motion: FormationMotion,
    settle_ms: f32,
}

impl Formation {
    pub fn new(invaders: Vec<Invader>, speed: f32, drop_distance: f32, settle_ms: f32) -> Self {
        Self {
            invaders,
            direction: 1.0,
            speed,
            drop_distance,
            motion: FormationMotion::Marching,
            settle_ms: settle_ms.max(0.0),
        }
    }

    /// An empty formation (before the first spawn)
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0, 0.0, 0.0)
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn drop_distance(&self) -> f32 {
        self.drop_distance
    }

    /// Replace speed and drop distance (difficulty change mid-round)
    pub fn apply_profile(&mut self, speed: f32, drop_distance: f32) {
        self.speed = speed;
        self.drop_distance = drop_distance;
    }

    pub fn live(&self) -> impl Iterator<Item = &Invader> {
        self.invaders.iter().filter(|i| i.alive)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// True once every invader has been destroyed
    pub fn is_cleared(&self) -> bool {
        self.live_count() == 0
    }

    pub fn get(&self, id: u32) -> Option<&Invader> {
        self.invaders.iter().find(|i| i.id == id)
    }

    /// Mark an invader destroyed. Returns false if it was already gone.
    pub fn destroy(&mut self, id: u32) -> bool {
        match self.invaders.iter_mut().find(|i| i.id == id && i.alive) {
            Some(invader) => {
                invader.alive = false;
                true
            }
            None => false,
        }
    }

    /// Shift every live invader sideways for `dt_ms` of active time
    ///
    /// While settling the formation holds still and only the settle
    /// countdown advances.
    pub fn advance(&mut self, dt_ms: f32) {
        if let FormationMotion::Settling { remaining_ms } = self.motion {
            let remaining_ms = remaining_ms - dt_ms;
            self.motion = if remaining_ms > 0.0 {
                FormationMotion::Settling { remaining_ms }
            } else {
                FormationMotion::Marching
            };
            return;
        }

        // Scaled so one reference frame moves speed * MARCH_TIME_SCALE
        let dx = self.speed * MARCH_TIME_SCALE * self.direction * (dt_ms / SIM_DT_MS);
        for invader in self.invaders.iter_mut().filter(|i| i.alive) {
            invader.pos.x += dx;
        }
    }

    /// True if a live invader has reached the edge it is heading toward
    pub fn edge_hit(&self, field: &FieldConfig) -> bool {
        let right = field.right_edge();
        self.live().any(|i| {
            (i.pos.x <= EDGE_PADDING && self.direction < 0.0)
                || (i.pos.x >= right && self.direction > 0.0)
        })
    }

    /// Reverse, drop, and nudge away from the edge
    pub fn on_edge_hit(&mut self) {
        self.direction = -self.direction;
        let nudge = self.speed * NUDGE_TIME_SCALE * self.direction;
        for invader in self.invaders.iter_mut().filter(|i| i.alive) {
            invader.pos.y += self.drop_distance;
            invader.pos.x += nudge;
        }
        if self.settle_ms > 0.0 {
            self.motion = FormationMotion::Settling {
                remaining_ms: self.settle_ms,
            };
        }
    }

    /// Advance then handle an edge hit. Returns true if the formation dropped.
    pub fn step(&mut self, dt_ms: f32, field: &FieldConfig) -> bool {
        let marching = self.motion == FormationMotion::Marching;
        self.advance(dt_ms);
        if marching && self.edge_hit(field) {
            self.on_edge_hit();
            return true;
        }
        false
    }

    /// True if any live invader is below `threshold`
    pub fn bottom_breach(&self, threshold: f32) -> bool {
        self.live().any(|i| i.pos.y > threshold)
    }

    /// Choose a live invader uniformly at random
    pub fn pick_shooter<R: Rng>(&self, rng: &mut R) -> Option<&Invader> {
        let count = self.live_count();
        if count == 0 {
            return None;
        }
        let index = rng.random_range(0..count);
        self.live().nth(index)
    }

    /// Drop destroyed invaders
    pub fn reap(&mut self) {
        self.invaders.retain(|i| i.alive);
    }
}
