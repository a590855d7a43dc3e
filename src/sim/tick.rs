//! Per-frame simulation step
//!
//! `tick` is the only entry point the host loop calls. Controls are applied
//! first, then (while playing) the player, bullets, formation, enemy fire,
//! collisions and the level-clear check run in that order.

use super::collision::{enemy_bullet_hits, player_bullet_hits};
use super::difficulty::Difficulty;
use super::formation::FormationMotion;
use super::state::{GameEvent, GameOverReason, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal steering, -1 (left) to 1 (right)
    pub move_x: f32,
    /// Fire (held or pressed)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart button
    pub restart: bool,
    /// Difficulty select changed
    pub difficulty: Option<Difficulty>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game by `dt_ms` of wall time
///
/// Time only counts toward cooldowns while playing, so pausing never shortens
/// the enemy fire delay or the player's shot cooldown.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.restart {
        state.restart();
    }

    if let Some(difficulty) = input.difficulty {
        state.set_difficulty(difficulty);
    }

    if state.phase == GamePhase::LevelTransition {
        state.finish_level_transition();
    }

    if input.pause {
        state.toggle_pause();
    }

    // Don't tick if not actively playing
    if state.phase != GamePhase::Playing {
        return;
    }

    state.active_ms += dt_ms as f64;
    state.run_timers();

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    // Player
    let field = state.settings.field;
    let half_width = PLAYER_WIDTH / 2.0;
    state.player.pos.x = (state.player.pos.x
        + input.move_x.clamp(-1.0, 1.0) * PLAYER_SPEED * dt_ms / 1000.0)
        .clamp(half_width, field.width - half_width);
    if input.fire {
        state.fire_player();
    }

    for bullet in state
        .player_bullets
        .iter_mut()
        .chain(state.enemy_bullets.iter_mut())
    {
        bullet.update(dt_ms);
    }

    // Formation
    if state.formation.step(dt_ms, &field) {
        state.events.push(GameEvent::FormationDropped);
    }
    if state.formation.bottom_breach(field.bottom_threshold()) {
        state.game_over(GameOverReason::Invaded);
        return;
    }

    state.try_enemy_fire();

    // Collisions
    let mut collisions = player_bullet_hits(&state.player_bullets, &state.formation);
    collisions.extend(enemy_bullet_hits(
        &state.enemy_bullets,
        &state.player.bounds(),
    ));
    for collision in collisions {
        state.dispatch_collision(collision);
    }

    state.sweep();

    if state.phase == GamePhase::Playing {
        state.check_level_cleared();
    }
}

/// Steer under the nearest invader and fire when lined up
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = state.player.pos;
    let target = state.formation.live().min_by(|a, b| {
        // Prefer low invaders when two are about as close
        let da = (a.pos.x - player.x).abs() - a.pos.y * 0.01;
        let db = (b.pos.x - player.x).abs() - b.pos.y * 0.01;
        da.total_cmp(&db)
    });

    let Some(target) = target else {
        input.move_x = 0.0;
        return;
    };

    // Lead by how far the formation marches while the bullet is in flight
    let flight_ms =
        (player.y - MUZZLE_OFFSET - target.pos.y).max(0.0) / PLAYER_BULLET_SPEED * 1000.0;
    let lead = if state.formation.motion == FormationMotion::Marching {
        let per_frame = state.formation.speed() * MARCH_TIME_SCALE;
        state.formation.direction() * per_frame * flight_ms / SIM_DT_MS
    } else {
        0.0
    };

    let dx = target.pos.x + lead - player.x;
    input.move_x = (dx / 20.0).clamp(-1.0, 1.0);
    input.fire = dx.abs() < INVADER_WIDTH / 3.0;
}
