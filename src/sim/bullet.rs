//! Player and enemy bullets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::settings::FieldConfig;

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A bullet travelling straight up (player) or down (enemy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Vertical velocity in px/s (negative is up)
    pub vel_y: f32,
    pub owner: BulletOwner,
    pub alive: bool,
}

impl Bullet {
    /// Fired from the player, spawned just above the ship
    pub fn player(id: u32, shooter: Vec2) -> Self {
        Self {
            id,
            pos: shooter - Vec2::new(0.0, MUZZLE_OFFSET),
            vel_y: -PLAYER_BULLET_SPEED,
            owner: BulletOwner::Player,
            alive: true,
        }
    }

    /// Fired from an invader, spawned just below it
    pub fn enemy(id: u32, shooter: Vec2) -> Self {
        Self {
            id,
            pos: shooter + Vec2::new(0.0, MUZZLE_OFFSET),
            vel_y: ENEMY_BULLET_SPEED,
            owner: BulletOwner::Enemy,
            alive: true,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.pos.y += self.vel_y * dt_ms / 1000.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }

    /// True once the bullet has left the field in its direction of travel
    pub fn off_field(&self, field: &FieldConfig) -> bool {
        match self.owner {
            BulletOwner::Player => self.pos.y < 0.0,
            BulletOwner::Enemy => self.pos.y > field.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_offsets_and_motion() {
        let mut b = Bullet::player(1, Vec2::new(200.0, 550.0));
        assert_eq!(b.pos, Vec2::new(200.0, 530.0));
        b.update(1000.0);
        assert_eq!(b.pos.y, 30.0);

        let mut e = Bullet::enemy(2, Vec2::new(100.0, 100.0));
        assert_eq!(e.pos.y, 120.0);
        e.update(500.0);
        assert_eq!(e.pos.y, 220.0);
    }

    #[test]
    fn test_off_field_uses_configured_height() {
        let tall = FieldConfig {
            width: 400.0,
            height: 800.0,
        };
        let mut e = Bullet::enemy(1, Vec2::new(100.0, 600.0));
        e.pos.y = 700.0;
        assert!(!e.off_field(&tall));
        e.pos.y = 801.0;
        assert!(e.off_field(&tall));

        let mut p = Bullet::player(2, Vec2::new(100.0, 30.0));
        assert!(!p.off_field(&tall));
        p.pos.y = -1.0;
        assert!(p.off_field(&tall));
    }
}
