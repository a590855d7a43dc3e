//! Axis-aligned bounding box collision
//!
//! Detection only reports candidate pairs. Whether a pair still refers to live
//! entities is checked once, in `GameState::dispatch_collision`, so handlers
//! never see a consumed bullet or a dead invader.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletOwner};
use super::formation::Formation;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Touching edges count as overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// A reported contact between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    PlayerBulletInvader { bullet_id: u32, invader_id: u32 },
    EnemyBulletPlayer { bullet_id: u32 },
}

/// Every overlapping (player bullet, invader) pair, in bullet then spawn order
///
/// A bullet overlapping two invaders yields two pairs; dispatch resolves
/// only the first.
pub fn player_bullet_hits(bullets: &[Bullet], formation: &Formation) -> Vec<Collision> {
    let mut hits = Vec::new();
    for bullet in bullets
        .iter()
        .filter(|b| b.alive && b.owner == BulletOwner::Player)
    {
        let bounds = bullet.bounds();
        for invader in formation.live() {
            if bounds.overlaps(&invader.bounds()) {
                hits.push(Collision::PlayerBulletInvader {
                    bullet_id: bullet.id,
                    invader_id: invader.id,
                });
            }
        }
    }
    hits
}

/// Every live enemy bullet overlapping the player
pub fn enemy_bullet_hits(bullets: &[Bullet], player: &Aabb) -> Vec<Collision> {
    bullets
        .iter()
        .filter(|b| b.alive && b.owner == BulletOwner::Enemy && b.bounds().overlaps(player))
        .map(|b| Collision::EnemyBulletPlayer { bullet_id: b.id })
        .collect()
}
